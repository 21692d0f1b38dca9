use thiserror::Error;

use super::controller::LifecycleState;

/// A network fetch that produced no response at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network unavailable: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt cache entry: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid namespace name: {0}")]
    InvalidNamespace(String),
}

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Cannot {action} while {state:?}")]
    InvalidTransition {
        state: LifecycleState,
        action: &'static str,
    },
}

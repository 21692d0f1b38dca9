//! Offline cache controller.
//!
//! Intercepts GET requests for the site and serves them from one of two
//! versioned cache namespaces:
//!
//! - images and fonts: cache-first against the static namespace
//! - css/js/json: cache-first against the primary namespace
//! - everything else (page loads): network-first, falling back to the
//!   primary namespace and then to a 503
//!
//! Storage and network access are injected through the `CacheStorage` and
//! `Network` traits. `MemoryCacheStorage` and `DiskCacheStorage` are the
//! provided backends; `HttpNetwork` performs real requests.

pub mod controller;
pub mod disk;
pub mod error;
pub mod manifest;
pub mod network;
pub mod policy;
pub mod request;
pub mod storage;
pub mod strategy;

pub use controller::{ActivationReport, FetchOutcome, InstallReport, LifecycleState, OfflineController};
pub use disk::DiskCacheStorage;
pub use error::{CacheError, ControllerError, FetchError};
pub use manifest::{CacheNames, Manifest};
pub use network::{HttpNetwork, Network, Unreachable};
pub use policy::{classify, Route};
pub use request::{Destination, Request, RequestKey, Response};
pub use storage::{CacheStorage, MemoryCacheStorage};

use thiserror::Error;

use crate::error::ApiError;

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Please enter a valid email address: {0}")]
    InvalidEmail(String),

    #[error("Please enter a valid 10-digit mobile number: {0}")]
    InvalidMobile(String),

    #[error("Failed to submit form: {0}")]
    Api(#[from] ApiError),
}

impl LeadError {
    /// Validation errors need the user to change their input. Any failure to
    /// get the lead accepted by the backend, whatever the status, is offered
    /// as a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LeadError::Api(_))
    }
}

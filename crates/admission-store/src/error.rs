//! Error types for the admission store.

use thiserror::Error;

/// Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    #[error("Phone number already registered to another applicant: {0}")]
    PhoneNumberInUse(String),

    #[error("Storage error: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Persistence(format!("JSON serialization error: {}", e))
    }
}

//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Store error: {0}")]
    Store(#[from] admission_store::StoreError),

    #[error("WhatsApp bridge error: {0}")]
    Bridge(#[from] whatsapp_client::WhatsAppError),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;

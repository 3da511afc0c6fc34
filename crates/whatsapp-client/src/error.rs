//! WhatsApp bridge client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WhatsAppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bridge API error: {0}")]
    Api(String),

    #[error("Session error: {0}")]
    Session(String),
}

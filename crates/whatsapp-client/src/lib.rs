//! WhatsApp Web automation bridge client.
//!
//! The browser automation itself lives in a sidecar; this crate exposes
//! its REST API: session lifecycle, pending join requests per group, and
//! the approve action.

mod client;
mod error;
mod types;

pub use client::WhatsAppClient;
pub use error::WhatsAppError;
pub use types::*;

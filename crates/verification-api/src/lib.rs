//! Self-service verification API for admitted freshers.
//!
//! An applicant proves they are on the admission roster, registers the
//! WhatsApp number they will join with, and receives the group invite
//! links. The whitelist written here is what the approval bot consults
//! when it reconciles pending join requests.

pub mod api;
pub mod config;
pub mod error;

pub use api::{create_router, create_router_with_rate_limit, AppState, RateLimitState};
pub use config::Config;
pub use error::ApiError;

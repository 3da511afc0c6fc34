//! HTTP API for the verification service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, rate_limit_middleware, RateLimitState};
pub use types::*;

use admission_store::{RosterStore, WhitelistRegistry};
use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// The stores are internally synchronized, so the state is a cheap clone
/// per request.
#[derive(Clone)]
pub struct AppState {
    /// Admission roster (read-only here)
    pub roster: RosterStore,
    /// Whitelist registry
    pub whitelist: WhitelistRegistry,
    /// Invite links handed out after registration
    pub links: GroupLinks,
}

impl AppState {
    /// Create new application state.
    pub fn new(roster: RosterStore, whitelist: WhitelistRegistry, links: GroupLinks) -> Self {
        Self {
            roster,
            whitelist,
            links,
        }
    }
}

/// Create the API router with default rate limiting.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::new(30, 5))
}

/// Create the API router with custom rate limiting.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/roster/:applicant_id", get(handlers::get_applicant))
        .route(
            "/v1/registrations/:applicant_id",
            get(handlers::get_registration).post(handlers::register),
        )
        .layer(axum_middleware::from_fn_with_state(
            rate_limit.clone(),
            rate_limit_middleware,
        ))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

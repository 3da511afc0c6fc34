//! Rate limiting and request logging middleware.

use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::keyed::DefaultKeyedStateStore,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc};
use tracing::{debug, warn};

pub type GlobalLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;
pub type ApplicantLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Rate limiter state shared across requests.
///
/// Two quotas. The global one keeps scripted bulk submission off the
/// store. The per-applicant one stops a stuck retry loop on a single ID
/// from eating the global quota during the registration rush.
#[derive(Clone)]
pub struct RateLimitState {
    pub global: Arc<GlobalLimiter>,
    pub per_applicant: Arc<ApplicantLimiter>,
}

impl RateLimitState {
    /// Create rate limit state with the given per-minute quotas.
    pub fn new(global_per_minute: u32, per_applicant_per_minute: u32) -> Self {
        Self {
            global: Arc::new(RateLimiter::direct(Quota::per_minute(nonzero(
                global_per_minute,
                30,
            )))),
            per_applicant: Arc::new(RateLimiter::keyed(Quota::per_minute(nonzero(
                per_applicant_per_minute,
                5,
            )))),
        }
    }

    /// Quotas loose enough to never trigger in tests.
    pub fn permissive() -> Self {
        Self::new(1000, 1000)
    }

    /// Check both quotas for one request.
    pub fn check(&self, applicant_id: Option<&str>) -> Result<(), ApiError> {
        if self.global.check().is_err() {
            warn!("Global rate limit exceeded");
            return Err(ApiError::RateLimitExceeded);
        }

        if let Some(id) = applicant_id {
            if self.per_applicant.check_key(&id.to_string()).is_err() {
                warn!(applicant_id = %id, "Per-applicant rate limit exceeded");
                return Err(ApiError::RateLimitExceeded);
            }
        }

        Ok(())
    }
}

fn nonzero(value: u32, fallback: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or_else(|| NonZeroU32::new(fallback).unwrap())
}

/// The applicant ID segment of a rate-limited path, if present.
fn applicant_key(path: &str) -> Option<&str> {
    let id = path
        .strip_prefix("/v1/roster/")
        .or_else(|| path.strip_prefix("/v1/registrations/"))?;
    (!id.is_empty()).then_some(id)
}

/// Rate limiting middleware; returns 429 once a quota is exhausted.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    rate_limit.check(applicant_key(request.uri().path()))?;
    Ok(next.run(request).await)
}

/// Logging middleware for requests.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis();

    if status.is_success() {
        debug!(%method, %uri, %status, latency_ms, "Request completed");
    } else {
        warn!(%method, %uri, %status, latency_ms, "Request failed");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applicant_key_extraction() {
        assert_eq!(applicant_key("/v1/roster/20412345"), Some("20412345"));
        assert_eq!(applicant_key("/v1/registrations/20412345"), Some("20412345"));
        assert_eq!(applicant_key("/health"), None);
        assert_eq!(applicant_key("/v1/roster/"), None);
    }

    #[test]
    fn test_per_applicant_quota_is_independent() {
        let state = RateLimitState::new(1000, 1);

        assert!(state.check(Some("A")).is_ok());
        assert!(state.check(Some("A")).is_err());
        // A different applicant still has their own quota
        assert!(state.check(Some("B")).is_ok());
    }

    #[test]
    fn test_global_quota_applies_without_an_applicant() {
        let state = RateLimitState::new(2, 1000);

        assert!(state.check(None).is_ok());
        assert!(state.check(None).is_ok());
        assert!(state.check(None).is_err());
    }
}

//! Error types for the verification API.

use admission_store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Applicant not found in the admission list: {0}")]
    NotFound(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    #[error("This phone number is already registered by another student")]
    PhoneNumberInUse,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_IN_ADMISSION_LIST"),
            ApiError::InvalidPhoneNumber(_) => (StatusCode::BAD_REQUEST, "INVALID_PHONE_NUMBER"),
            ApiError::PhoneNumberInUse => (StatusCode::CONFLICT, "PHONE_NUMBER_IN_USE"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            ApiError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidPhoneNumber(reason) => ApiError::InvalidPhoneNumber(reason),
            StoreError::PhoneNumberInUse(_) => ApiError::PhoneNumberInUse,
            StoreError::Persistence(msg) => ApiError::Storage(msg),
        }
    }
}

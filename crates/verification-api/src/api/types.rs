//! API request and response types.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub roster_count: usize,
    pub whitelist_count: usize,
}

/// A roster entry as shown to the applicant for confirmation.
#[derive(Debug, Serialize)]
pub struct ApplicantResponse {
    pub applicant_id: String,
    pub full_name: String,
    pub programme: String,
}

/// Request to register a phone number for a verified applicant.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Raw phone number as typed by the applicant
    pub phone_number: String,
}

/// Group invite links handed out after successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct GroupLinks {
    pub official: String,
    pub unofficial: String,
}

/// Response after registering (or re-confirming) a phone number.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub applicant_id: String,
    pub phone_number: Option<String>,
    pub status: String,
    pub message: String,
    pub groups: GroupLinks,
}

/// Registration status for an applicant.
#[derive(Debug, Serialize)]
pub struct RegistrationStatusResponse {
    pub applicant_id: String,
    pub registered: bool,
    pub registered_at: Option<String>,
    /// Present once registered, so a returning applicant gets the links again
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<GroupLinks>,
}

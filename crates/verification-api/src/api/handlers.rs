//! HTTP request handlers.

use super::types::{
    ApplicantResponse, HealthResponse, RegisterRequest, RegisterResponse,
    RegistrationStatusResponse,
};
use super::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

/// Strip spaces and dashes from an applicant ID as typed.
fn clean_applicant_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Look up an applicant, re-reading the roster file on a miss.
///
/// Ingestion runs as a separate batch process; a miss may only mean the
/// table on disk is newer than the one loaded at startup.
async fn lookup_applicant(
    state: &AppState,
    applicant_id: &str,
) -> Option<admission_store::IdentityRecord> {
    if let Some(record) = state.roster.lookup(applicant_id).await {
        return Some(record);
    }

    if let Err(e) = state.roster.reload().await {
        warn!("Could not refresh the roster: {}", e);
    }
    state.roster.lookup(applicant_id).await
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        roster_count: state.roster.count().await,
        whitelist_count: state.whitelist.count().await,
    })
}

/// Eligibility lookup: is this applicant on the admission roster?
pub async fn get_applicant(
    State(state): State<AppState>,
    Path(applicant_id): Path<String>,
) -> Result<Json<ApplicantResponse>, ApiError> {
    let applicant_id = clean_applicant_id(&applicant_id);

    let record = lookup_applicant(&state, &applicant_id).await.ok_or_else(|| {
        warn!(applicant_id = %applicant_id, "Lookup for unknown applicant");
        ApiError::NotFound(applicant_id.clone())
    })?;

    Ok(Json(ApplicantResponse {
        applicant_id: record.applicant_id,
        full_name: record.full_name,
        programme: record.programme,
    }))
}

/// Registration status for an applicant.
///
/// A returning applicant gets the invite links again instead of being
/// pushed through the registration flow a second time.
pub async fn get_registration(
    State(state): State<AppState>,
    Path(applicant_id): Path<String>,
) -> Result<Json<RegistrationStatusResponse>, ApiError> {
    let applicant_id = clean_applicant_id(&applicant_id);

    match state.whitelist.entry_for(&applicant_id).await {
        Some(entry) => Ok(Json(RegistrationStatusResponse {
            applicant_id,
            registered: true,
            registered_at: Some(entry.registered_at.to_rfc3339()),
            groups: Some(state.links.clone()),
        })),
        None => Ok(Json(RegistrationStatusResponse {
            applicant_id,
            registered: false,
            registered_at: None,
            groups: None,
        })),
    }
}

/// Register a phone number for a verified applicant.
pub async fn register(
    State(state): State<AppState>,
    Path(applicant_id): Path<String>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let applicant_id = clean_applicant_id(&applicant_id);

    // Must be on the admission roster before anything else
    let record = lookup_applicant(&state, &applicant_id)
        .await
        .ok_or_else(|| ApiError::NotFound(applicant_id.clone()))?;

    // A repeat submission short-circuits straight to success
    if state.whitelist.is_registered(&applicant_id).await {
        info!(applicant_id = %applicant_id, "Repeat verification");
        return Ok((
            StatusCode::OK,
            Json(RegisterResponse {
                applicant_id,
                phone_number: None,
                status: "already_registered".to_string(),
                message: "You have already verified! Use the links you received earlier."
                    .to_string(),
                groups: state.links.clone(),
            }),
        ));
    }

    let entry = state
        .whitelist
        .register(&applicant_id, &request.phone_number)
        .await?;

    info!(applicant_id = %applicant_id, "Applicant verified and whitelisted");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            applicant_id,
            phone_number: Some(entry.phone_number),
            status: "registered".to_string(),
            message: format!(
                "Welcome, {}! You can now join the groups below.",
                record.full_name
            ),
            groups: state.links.clone(),
        }),
    ))
}

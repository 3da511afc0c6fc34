//! Record types shared by the three durable tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A verified admission entry, keyed by applicant ID.
///
/// Populated by ingestion; re-ingestion overwrites every field except the
/// applicant ID. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Application ID as printed on the admission letter.
    pub applicant_id: String,

    /// Full name as listed on the admissions portal.
    pub full_name: String,

    /// Declared programme of study.
    pub programme: String,

    /// Admission category (WASSCE, fee-paying, international, ...).
    pub category: String,

    /// When this record was last ingested.
    pub ingested_at: DateTime<Utc>,
}

/// One canonical phone number bound to a verified applicant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhitelistEntry {
    /// Canonical phone number (country code, no symbols, no leading zero).
    pub phone_number: String,

    /// The applicant this number belongs to.
    pub applicant_id: String,

    /// When the number was registered.
    pub registered_at: DateTime<Utc>,
}

impl WhitelistEntry {
    /// Create a new entry stamped with the current time.
    pub fn new(phone_number: String, applicant_id: String) -> Self {
        Self {
            phone_number,
            applicant_id,
            registered_at: Utc::now(),
        }
    }
}

/// A granted approval for a (phone number, group) pair.
///
/// Written only after the external approval action reports success;
/// never updated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// Canonical phone number that was approved.
    pub phone_number: String,

    /// Group the approval was granted in.
    pub group_name: String,

    /// When the approval was recorded.
    pub approved_at: DateTime<Utc>,
}

//! Whitelist registry binding canonical phone numbers to applicants.

use crate::error::StoreError;
use crate::persist::Store;
use crate::phone::NumberPlan;
use crate::types::WhitelistEntry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

/// Whitelist registry keyed by applicant ID.
///
/// At most one entry per applicant; re-registering replaces the previous
/// number (a correction is safe and idempotent from the caller's side).
/// A canonical number bound to one applicant is rejected for any other
/// applicant while that binding stands.
#[derive(Clone)]
pub struct WhitelistRegistry {
    entries: Arc<RwLock<HashMap<String, WhitelistEntry>>>,
    store: Arc<Store>,
    plan: NumberPlan,
}

impl WhitelistRegistry {
    /// Open the registry, loading any persisted table.
    pub async fn open(store: Store, plan: NumberPlan) -> Result<Self, StoreError> {
        let entries: HashMap<String, WhitelistEntry> = store.load().await?;
        info!("Whitelist loaded with {} entries", entries.len());

        Ok(Self {
            entries: Arc::new(RwLock::new(entries)),
            store: Arc::new(store),
            plan,
        })
    }

    /// Register a phone number for a verified applicant.
    ///
    /// Validates the raw number, normalizes it, and rejects a number
    /// currently bound to a different applicant without mutating state.
    #[instrument(skip(self, raw_phone))]
    pub async fn register(
        &self,
        applicant_id: &str,
        raw_phone: &str,
    ) -> Result<WhitelistEntry, StoreError> {
        self.plan
            .validate(raw_phone)
            .map_err(StoreError::InvalidPhoneNumber)?;
        let phone_number = self.plan.normalize(raw_phone);

        let mut entries = self.entries.write().await;

        let taken = entries
            .values()
            .any(|e| e.phone_number == phone_number && e.applicant_id != applicant_id);
        if taken {
            warn!(phone_number = %phone_number, "Phone number already bound to a different applicant");
            return Err(StoreError::PhoneNumberInUse(phone_number));
        }

        let entry = WhitelistEntry::new(phone_number, applicant_id.to_string());
        entries.insert(applicant_id.to_string(), entry.clone());
        self.store.save(&*entries).await?;

        info!(applicant_id = %applicant_id, "Whitelisted phone number");
        Ok(entry)
    }

    /// Re-read the table from the backing store.
    ///
    /// Registrations are written by a separate process over the same
    /// file; the approval side calls this before taking a snapshot so it
    /// sees them. On a load failure the current table stays in place.
    pub async fn reload(&self) -> Result<(), StoreError> {
        let fresh: HashMap<String, WhitelistEntry> = self.store.load().await?;
        *self.entries.write().await = fresh;
        Ok(())
    }

    /// Whether this applicant already has a registered number.
    pub async fn is_registered(&self, applicant_id: &str) -> bool {
        self.entries.read().await.contains_key(applicant_id)
    }

    /// The current entry for an applicant, if any.
    pub async fn entry_for(&self, applicant_id: &str) -> Option<WhitelistEntry> {
        self.entries.read().await.get(applicant_id).cloned()
    }

    /// Point-in-time mapping of canonical phone number -> applicant ID.
    ///
    /// The reconciliation engine takes this once per cycle and never
    /// re-queries mid-cycle; registrations committed after a cycle starts
    /// are picked up on the next one.
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.entries
            .read()
            .await
            .values()
            .map(|e| (e.phone_number.clone(), e.applicant_id.clone()))
            .collect()
    }

    /// Number of whitelist entries.
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}

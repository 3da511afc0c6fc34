//! Durable roster of verified admission entries.

use crate::error::StoreError;
use crate::persist::Store;
use crate::types::IdentityRecord;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Roster store keyed by applicant ID.
///
/// Populated by ingestion runs. Upsert semantics: re-ingesting the same
/// applicant overwrites every field except the ID, with no duplicate rows.
#[derive(Clone)]
pub struct RosterStore {
    records: Arc<RwLock<HashMap<String, IdentityRecord>>>,
    store: Arc<Store>,
}

impl RosterStore {
    /// Open the roster, loading any persisted table.
    pub async fn open(store: Store) -> Result<Self, StoreError> {
        let records: HashMap<String, IdentityRecord> = store.load().await?;
        info!("Roster loaded with {} records", records.len());

        Ok(Self {
            records: Arc::new(RwLock::new(records)),
            store: Arc::new(store),
        })
    }

    /// Insert or update an admission record. Last write wins.
    ///
    /// A persistence failure is reported to the caller; the ingestion
    /// collaborator owns retry policy.
    #[instrument(skip(self, full_name, programme, category))]
    pub async fn upsert(
        &self,
        applicant_id: &str,
        full_name: &str,
        programme: &str,
        category: &str,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(
            applicant_id.to_string(),
            IdentityRecord {
                applicant_id: applicant_id.to_string(),
                full_name: full_name.to_string(),
                programme: programme.to_string(),
                category: category.to_string(),
                ingested_at: Utc::now(),
            },
        );
        self.store.save(&*records).await?;

        debug!("Upserted roster record for {}", applicant_id);
        Ok(())
    }

    /// Re-read the table from the backing store.
    ///
    /// Ingestion runs as a separate batch process over the same file;
    /// readers call this to pick up rows written since they opened the
    /// roster. On a load failure the current table stays in place.
    pub async fn reload(&self) -> Result<(), StoreError> {
        let fresh: HashMap<String, IdentityRecord> = self.store.load().await?;
        *self.records.write().await = fresh;
        Ok(())
    }

    /// Look up an applicant by ID.
    pub async fn lookup(&self, applicant_id: &str) -> Option<IdentityRecord> {
        self.records.read().await.get(applicant_id).cloned()
    }

    /// Number of roster records.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

//! Approval ledger: the idempotency anchor against duplicate approvals.

use crate::error::StoreError;
use crate::persist::Store;
use crate::types::ApprovalRecord;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Outcome of recording an approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// This call created the record.
    Inserted,
    /// The pair was already recorded. Not an error and not a retry signal.
    AlreadyPresent,
}

/// Durable ledger of granted approvals, unique on (phone number, group).
///
/// Rows are created only after the external approval action reports
/// success and are never updated or deleted. Everything else the
/// reconciliation engine works with is re-derived each cycle.
#[derive(Clone)]
pub struct ApprovalLedger {
    records: Arc<RwLock<HashMap<(String, String), ApprovalRecord>>>,
    store: Arc<Store>,
}

impl ApprovalLedger {
    /// Open the ledger, loading any persisted rows.
    pub async fn open(store: Store) -> Result<Self, StoreError> {
        let rows: Vec<ApprovalRecord> = store.load().await?;
        let records: HashMap<(String, String), ApprovalRecord> = rows
            .into_iter()
            .map(|r| ((r.phone_number.clone(), r.group_name.clone()), r))
            .collect();
        info!("Approval ledger loaded with {} records", records.len());

        Ok(Self {
            records: Arc::new(RwLock::new(records)),
            store: Arc::new(store),
        })
    }

    /// Whether an approval was already granted for this pair.
    pub async fn has_approved(&self, phone_number: &str, group_name: &str) -> bool {
        self.records
            .read()
            .await
            .contains_key(&(phone_number.to_string(), group_name.to_string()))
    }

    /// Record an approval, inserting only if absent.
    ///
    /// Repeated or concurrent calls converge to exactly one row. The
    /// ledger must never claim an approval it did not persist, so a save
    /// failure rolls the in-memory insert back and surfaces the error.
    pub async fn record(
        &self,
        phone_number: &str,
        group_name: &str,
    ) -> Result<RecordOutcome, StoreError> {
        let key = (phone_number.to_string(), group_name.to_string());
        let mut records = self.records.write().await;

        if records.contains_key(&key) {
            debug!(phone_number = %phone_number, group_name = %group_name, "Approval already recorded");
            return Ok(RecordOutcome::AlreadyPresent);
        }

        records.insert(
            key.clone(),
            ApprovalRecord {
                phone_number: phone_number.to_string(),
                group_name: group_name.to_string(),
                approved_at: Utc::now(),
            },
        );

        let rows: Vec<ApprovalRecord> = records.values().cloned().collect();
        if let Err(e) = self.store.save(&rows).await {
            records.remove(&key);
            return Err(e);
        }

        info!(phone_number = %phone_number, group_name = %group_name, "Approval recorded");
        Ok(RecordOutcome::Inserted)
    }

    /// Number of ledger rows.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

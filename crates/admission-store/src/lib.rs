//! Shared data model for freshers verification.
//!
//! Three durable, uniquely-keyed tables tie the independent actors
//! together: the roster of verified admissions, the whitelist of
//! registered phone numbers, and the approval ledger. All writers go
//! through idempotent insert/replace operations so the actors converge
//! without any shared lock or transaction.

mod error;
mod ledger;
mod persist;
mod phone;
mod roster;
mod types;
mod whitelist;

pub use error::StoreError;
pub use ledger::{ApprovalLedger, RecordOutcome};
pub use persist::Store;
pub use phone::NumberPlan;
pub use roster::RosterStore;
pub use types::{ApprovalRecord, IdentityRecord, WhitelistEntry};
pub use whitelist::WhitelistRegistry;

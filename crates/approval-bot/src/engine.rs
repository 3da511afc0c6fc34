//! Reconciliation engine: sweeps pending join requests against the whitelist.
//!
//! Everything except the approval ledger is re-derived every cycle from
//! the fresh pending list and a whitelist snapshot taken at cycle start.
//! A failure stays scoped to its item or its group; only shutdown stops
//! the sweep loop.

use admission_store::{ApprovalLedger, NumberPlan, WhitelistRegistry};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};
use whatsapp_client::{PendingRequest, WhatsAppClient, WhatsAppError};

/// Seam to the external approval surface.
///
/// Implemented by the bridge client in production and mocked in tests.
#[async_trait]
pub trait GroupGateway: Send + Sync {
    /// Pending join requests for a group, observed fresh each cycle.
    async fn pending_requests(&self, group: &str) -> Result<Vec<PendingRequest>, WhatsAppError>;

    /// Execute the approve action for one request.
    async fn approve(&self, group: &str, request_id: &str) -> Result<(), WhatsAppError>;
}

#[async_trait]
impl GroupGateway for WhatsAppClient {
    async fn pending_requests(&self, group: &str) -> Result<Vec<PendingRequest>, WhatsAppError> {
        WhatsAppClient::pending_requests(self, group).await
    }

    async fn approve(&self, group: &str, request_id: &str) -> Result<(), WhatsAppError> {
        WhatsAppClient::approve(self, group, request_id).await
    }
}

/// What a pending request's fields resolved to.
///
/// "No contact determined" is kept distinct from "contact determined but
/// not whitelisted": an unresolved extraction is skipped and logged,
/// never counted as ineligible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactResolution {
    /// No phone number could be extracted from the request.
    NoContact,
    /// A number was extracted but is not in the whitelist snapshot.
    NotWhitelisted(String),
    /// The extracted number matches a whitelisted applicant.
    Whitelisted {
        phone_number: String,
        applicant_id: String,
    },
}

/// Resolve a pending request against the cycle's whitelist snapshot.
///
/// Extraction ladder: the bridge's own phone field, then the element
/// title, then a digit-run scan of the visible text. All best-effort;
/// the fields are untrusted and often missing.
pub fn resolve_contact(
    request: &PendingRequest,
    plan: &NumberPlan,
    snapshot: &HashMap<String, String>,
) -> ContactResolution {
    let raw = request
        .phone
        .as_deref()
        .or(request.title.as_deref())
        .map(String::from)
        .or_else(|| request.subtitle.as_deref().and_then(scan_for_number));

    let phone_number = match raw {
        Some(raw) => plan.normalize(&raw),
        None => return ContactResolution::NoContact,
    };
    if phone_number.is_empty() {
        return ContactResolution::NoContact;
    }

    match snapshot.get(&phone_number) {
        Some(applicant_id) => ContactResolution::Whitelisted {
            phone_number,
            applicant_id: applicant_id.clone(),
        },
        None => ContactResolution::NotWhitelisted(phone_number),
    }
}

/// Find the first plausible phone number in free text.
///
/// Accepts runs of digits with `+`, space, and dash separators carrying
/// 9 to 15 digits, the same shapes people paste into a join request.
fn scan_for_number(text: &str) -> Option<String> {
    let mut run = String::new();

    for c in text.chars().chain(std::iter::once('\n')) {
        if c.is_ascii_digit() || c == '+' || c == '-' || c == ' ' {
            run.push(c);
        } else {
            let digits = run.chars().filter(|c| c.is_ascii_digit()).count();
            if (9..=15).contains(&digits) {
                return Some(run.trim().to_string());
            }
            run.clear();
        }
    }
    None
}

/// Cycle processing limits and targets.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Groups to sweep, in fixed order.
    pub groups: Vec<String>,
    /// Cap on approval attempts per group per cycle.
    pub max_approvals_per_cycle: usize,
    /// Bound on each external action.
    pub action_timeout: Duration,
}

/// Per-group outcome counters for one cycle.
#[derive(Debug, Default, Clone)]
pub struct GroupReport {
    pub approved: usize,
    pub already_approved: usize,
    pub not_whitelisted: usize,
    pub unresolved: usize,
    pub failed_attempts: usize,
    /// The group's pending list could not be fetched this cycle.
    pub fetch_failed: bool,
}

/// Outcome of one full sweep across all configured groups.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub groups: HashMap<String, GroupReport>,
}

impl CycleReport {
    /// Total approvals granted this cycle.
    pub fn total_approved(&self) -> usize {
        self.groups.values().map(|g| g.approved).sum()
    }
}

/// The approval-side polling core.
pub struct ReconciliationEngine<G> {
    gateway: G,
    whitelist: WhitelistRegistry,
    ledger: ApprovalLedger,
    plan: NumberPlan,
    config: EngineConfig,
}

impl<G: GroupGateway> ReconciliationEngine<G> {
    /// Create an engine over a gateway and the shared stores.
    pub fn new(
        gateway: G,
        whitelist: WhitelistRegistry,
        ledger: ApprovalLedger,
        plan: NumberPlan,
        config: EngineConfig,
    ) -> Self {
        Self {
            gateway,
            whitelist,
            ledger,
            plan,
            config,
        }
    }

    /// Run one reconciliation cycle across all configured groups.
    ///
    /// The whitelist snapshot is taken once at cycle start and never
    /// re-queried mid-cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        // Registrations land in the shared table from another process;
        // refresh before snapshotting. A failed refresh means one stale
        // cycle, not an aborted sweep.
        if let Err(e) = self.whitelist.reload().await {
            warn!("Could not refresh the whitelist, using the last table: {}", e);
        }
        let snapshot = self.whitelist.snapshot().await;
        debug!("Whitelist snapshot has {} verified numbers", snapshot.len());

        let mut report = CycleReport::default();
        for group in &self.config.groups {
            let group_report = self.process_group(group, &snapshot).await;
            report.groups.insert(group.clone(), group_report);
        }
        report
    }

    #[instrument(skip(self, snapshot))]
    async fn process_group(&self, group: &str, snapshot: &HashMap<String, String>) -> GroupReport {
        let mut report = GroupReport::default();

        let requests = match timeout(
            self.config.action_timeout,
            self.gateway.pending_requests(group),
        )
        .await
        {
            Ok(Ok(requests)) => requests,
            Ok(Err(e)) => {
                warn!("Could not fetch pending requests for {}: {}", group, e);
                report.fetch_failed = true;
                return report;
            }
            Err(_) => {
                warn!("Timed out fetching pending requests for {}", group);
                report.fetch_failed = true;
                return report;
            }
        };

        debug!("Found {} pending request(s) in {}", requests.len(), group);

        let mut attempts = 0;
        for request in &requests {
            if attempts >= self.config.max_approvals_per_cycle {
                debug!("Approval cap reached for {}, deferring the rest", group);
                break;
            }

            match resolve_contact(request, &self.plan, snapshot) {
                ContactResolution::NoContact => {
                    debug!(
                        "Could not extract a phone number from request {} in {}",
                        request.request_id, group
                    );
                    report.unresolved += 1;
                }
                ContactResolution::NotWhitelisted(phone_number) => {
                    debug!(phone_number = %phone_number, "Not in whitelist");
                    report.not_whitelisted += 1;
                }
                ContactResolution::Whitelisted {
                    phone_number,
                    applicant_id,
                } => {
                    if self.ledger.has_approved(&phone_number, group).await {
                        debug!(phone_number = %phone_number, "Already approved for {}", group);
                        report.already_approved += 1;
                        continue;
                    }

                    attempts += 1;
                    match timeout(
                        self.config.action_timeout,
                        self.gateway.approve(group, &request.request_id),
                    )
                    .await
                    {
                        Ok(Ok(())) => match self.ledger.record(&phone_number, group).await {
                            Ok(_) => {
                                info!(
                                    phone_number = %phone_number,
                                    applicant_id = %applicant_id,
                                    "Approved in {}", group
                                );
                                report.approved += 1;
                            }
                            Err(e) => {
                                // Approved externally but not recorded; the
                                // next sweep may re-approve. The ledger stays
                                // duplicate-free either way.
                                warn!(
                                    phone_number = %phone_number,
                                    "Approval granted but not recorded: {}", e
                                );
                                report.failed_attempts += 1;
                            }
                        },
                        Ok(Err(e)) => {
                            warn!(
                                "Approve failed for request {} in {}: {}",
                                request.request_id, group, e
                            );
                            report.failed_attempts += 1;
                        }
                        Err(_) => {
                            warn!(
                                "Approve timed out for request {} in {}",
                                request.request_id, group
                            );
                            report.failed_attempts += 1;
                        }
                    }
                }
            }
        }

        report
    }
}

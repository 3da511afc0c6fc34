//! WhatsApp bridge HTTP client.

use crate::error::WhatsAppError;
use crate::types::*;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

/// Client for the WhatsApp Web automation bridge.
///
/// The bridge drives the actual browser session; this client only speaks
/// its REST surface. Group names go into paths URL-encoded because they
/// routinely contain spaces and braces.
#[derive(Clone)]
pub struct WhatsAppClient {
    client: Client,
    base_url: String,
}

impl WhatsAppClient {
    /// Create a new bridge client with a bounded request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WhatsAppError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Check if the bridge is reachable.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/v1/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Acquire the browser session.
    ///
    /// Fails if the bridge cannot produce a logged-in WhatsApp Web
    /// session; the caller treats this as fatal at startup.
    #[instrument(skip(self))]
    pub async fn open_session(&self) -> Result<SessionStatus, WhatsAppError> {
        let response = self
            .client
            .post(format!("{}/v1/session", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(WhatsAppError::Session(msg));
        }

        let status: SessionStatus = response.json().await?;
        if !status.logged_in {
            return Err(WhatsAppError::Session(
                "bridge has no logged-in WhatsApp Web session".into(),
            ));
        }

        debug!("Bridge session open");
        Ok(status)
    }

    /// Release the browser session.
    #[instrument(skip(self))]
    pub async fn close_session(&self) -> Result<(), WhatsAppError> {
        let response = self
            .client
            .delete(format!("{}/v1/session", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(WhatsAppError::Api(msg));
        }

        debug!("Bridge session closed");
        Ok(())
    }

    /// Fetch the pending join requests for a group.
    ///
    /// A group the bridge cannot open, or whose pending section it cannot
    /// locate, comes back as an API error; the caller skips that group for
    /// the cycle.
    #[instrument(skip(self))]
    pub async fn pending_requests(&self, group: &str) -> Result<Vec<PendingRequest>, WhatsAppError> {
        let response = self
            .client
            .get(format!(
                "{}/v1/groups/{}/pending",
                self.base_url,
                encode(group)
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(WhatsAppError::Api(msg));
        }

        let requests: Vec<PendingRequest> = response.json().await?;
        debug!("Found {} pending request(s) in {}", requests.len(), group);
        Ok(requests)
    }

    /// Approve a pending join request.
    #[instrument(skip(self))]
    pub async fn approve(&self, group: &str, request_id: &str) -> Result<(), WhatsAppError> {
        let response = self
            .client
            .post(format!(
                "{}/v1/groups/{}/pending/{}/approve",
                self.base_url,
                encode(group),
                encode(request_id)
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            warn!("Approve failed in {}: {}", group, msg);
            return Err(WhatsAppError::Api(msg));
        }

        debug!("Approved request {} in {}", request_id, group);
        Ok(())
    }
}

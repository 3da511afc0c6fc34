//! WhatsApp bridge API types.

use serde::Deserialize;

/// A pending join request as reported by the bridge.
///
/// The bridge scrapes these out of the group info panel, so every field
/// beyond the element handle is best-effort and may be absent or
/// malformed. Nothing here is trusted until it matches the whitelist.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingRequest {
    /// Bridge-assigned handle for the request element, used to address
    /// the approve action within the current cycle.
    pub request_id: String,

    /// Title attribute of the request element (often the phone number).
    #[serde(default)]
    pub title: Option<String>,

    /// Visible text of the request element.
    #[serde(default)]
    pub subtitle: Option<String>,

    /// Phone number if the bridge resolved one itself.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Session state reported by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatus {
    /// Whether WhatsApp Web is logged in and ready.
    pub logged_in: bool,
}

//! One facade per audience. Each method maps to exactly one endpoint.

pub mod admin;
pub mod play;
pub mod staff;

pub use admin::AdminService;
pub use play::PlayService;
pub use staff::StaffService;

use crate::error::{Result, ScratchError};
use crate::session::{Portal, SessionContext};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub redeemed_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Reject ids that would escape their path segment. Dot segments are
/// resolved by the URL parser and `\` reads as `/` in http URLs.
pub(crate) fn path_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\', '?', '#', '%']) {
        return Err(ScratchError::config(format!("Invalid identifier: '{}'", id)));
    }
    Ok(id)
}

pub(crate) fn require_portal(session: &Arc<SessionContext>, portal: Portal) -> Result<()> {
    if session.portal() != portal {
        return Err(ScratchError::config(format!(
            "{} service needs a {} session, got {}",
            portal,
            portal,
            session.portal()
        )));
    }
    Ok(())
}

use super::{path_id, require_portal, RedeemRequest};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::ApiClient;
use crate::session::{Portal, SessionContext};
use crate::types::PlaySummary;
use std::sync::Arc;

pub struct StaffService {
    client: ApiClient,
}

impl StaffService {
    pub fn new(config: &ClientConfig, session: Arc<SessionContext>) -> Result<Self> {
        require_portal(&session, Portal::Staff)?;
        Ok(Self {
            client: ApiClient::new(config, Some(session))?,
        })
    }

    /// Search by result code, phone number or email.
    pub async fn search_play(&self, query: &str) -> Result<Vec<PlaySummary>> {
        self.client
            .get(
                "/api/staff/play/search",
                &vec![("query", query.trim().to_string())],
            )
            .await
    }

    pub async fn get_play(&self, play_id: &str) -> Result<PlaySummary> {
        let path = format!("/api/staff/play/{}", path_id(play_id)?);
        self.client.get(&path, &Vec::new()).await
    }

    pub async fn redeem_play(&self, play_id: &str, request: &RedeemRequest) -> Result<serde_json::Value> {
        let path = format!("/api/staff/play/{}/redeem", path_id(play_id)?);
        let result = self.client.post(&path, request).await?;
        tracing::info!("Play {} redeemed by {}", play_id, request.redeemed_by);
        Ok(result)
    }
}

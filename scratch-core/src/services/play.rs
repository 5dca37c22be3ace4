use super::path_id;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{ApiClient, Query};
use crate::types::{PlayClaimRequest, PlayResult, PlayStatus, TokenValidation};
use serde_json::json;

/// Player-facing endpoints. No session is involved.
pub struct PlayService {
    client: ApiClient,
}

impl PlayService {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(config, None)?,
        })
    }

    pub async fn validate_token(&self, token: &str) -> Result<TokenValidation> {
        self.client
            .post("/api/play/validate-token", &json!({ "token": token }))
            .await
    }

    /// Redeem the token and play. The backend picks the result.
    pub async fn claim(&self, request: &PlayClaimRequest) -> Result<PlayResult> {
        let result: PlayResult = self.client.post("/api/play/claim", request).await?;
        tracing::info!(
            "Play {} claimed, winner: {}",
            result.play_id,
            result.result.is_winner
        );
        Ok(result)
    }

    pub async fn play_status(&self, play_id: &str) -> Result<PlayStatus> {
        let path = format!("/api/play/{}/status", path_id(play_id)?);
        self.client.get(&path, &Query::new()).await
    }
}

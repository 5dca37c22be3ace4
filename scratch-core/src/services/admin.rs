use super::{path_id, require_portal, RedeemRequest};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{ApiClient, Query};
use crate::session::{Portal, SessionContext, StoredSession};
use crate::types::{
    Account, DashboardStats, LoginRequest, LoginResponse, Page, PlayFilters, PlaySummary,
    PrizeDraft, PrizeUpdate, ResultType, Token, UploadSummary,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

pub const DEFAULT_PAGE_SIZE: u32 = 50;

pub struct AdminService {
    client: ApiClient,
    session: Arc<SessionContext>,
}

impl AdminService {
    pub fn new(config: &ClientConfig, session: Arc<SessionContext>) -> Result<Self> {
        require_portal(&session, Portal::Admin)?;
        Ok(Self {
            client: ApiClient::new(config, Some(session.clone()))?,
            session,
        })
    }

    // Session

    /// Log in and persist the returned token for later requests.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        let response: LoginResponse = self.client.post("/api/admin/login", credentials).await?;

        self.session
            .establish(StoredSession::new(
                response.token.clone(),
                Some(response.admin.clone()),
            ))
            .await?;

        tracing::info!("Logged in as {}", response.admin.email);
        Ok(response)
    }

    pub async fn logout(&self) -> Result<()> {
        self.session.end().await
    }

    pub async fn profile(&self) -> Result<Account> {
        self.client.get("/api/admin/profile", &Query::new()).await
    }

    pub async fn dashboard(&self) -> Result<DashboardStats> {
        self.client.get("/api/admin/dashboard", &Query::new()).await
    }

    // Token management

    pub async fn tokens(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
        is_used: Option<bool>,
    ) -> Result<Page<Token>> {
        self.client
            .get("/api/admin/tokens", &token_query(page, limit, search, is_used))
            .await
    }

    /// Upload a file of token codes as multipart field `file`.
    pub async fn upload_tokens(&self, file_name: &str, contents: Vec<u8>) -> Result<UploadSummary> {
        let part = reqwest::multipart::Part::bytes(contents).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let summary: UploadSummary = self
            .client
            .post_multipart("/api/admin/tokens/upload", form)
            .await?;
        tracing::info!("Uploaded {} tokens from {}", summary.count, file_name);
        Ok(summary)
    }

    pub async fn create_tokens(
        &self,
        count: u32,
        expires_at: Option<DateTime<Utc>>,
        metadata: Option<Value>,
    ) -> Result<Value> {
        let mut body = json!({ "count": count });
        if let Some(expires_at) = expires_at {
            body["expiresAt"] = json!(expires_at);
        }
        if let Some(metadata) = metadata {
            body["metadata"] = metadata;
        }
        self.client.post("/api/admin/tokens/create", &body).await
    }

    pub async fn token_stats(&self) -> Result<Value> {
        self.client.get("/api/admin/tokens/stats", &Query::new()).await
    }

    pub async fn delete_tokens(&self, token_ids: &[String]) -> Result<Value> {
        self.client
            .delete_with_body("/api/admin/tokens", &json!({ "tokenIds": token_ids }))
            .await
    }

    // Prize management

    pub async fn prizes(&self, include_inactive: bool) -> Result<Vec<ResultType>> {
        let mut query = Query::new();
        if include_inactive {
            query.push(("includeInactive", "true".to_string()));
        }
        self.client.get("/api/admin/prizes", &query).await
    }

    pub async fn prize(&self, id: &str) -> Result<ResultType> {
        let path = format!("/api/admin/prizes/{}", path_id(id)?);
        self.client.get(&path, &Query::new()).await
    }

    pub async fn create_prize(&self, draft: &PrizeDraft) -> Result<ResultType> {
        self.client.post("/api/admin/prizes", draft).await
    }

    pub async fn update_prize(&self, id: &str, update: &PrizeUpdate) -> Result<ResultType> {
        let path = format!("/api/admin/prizes/{}", path_id(id)?);
        self.client.put(&path, update).await
    }

    pub async fn delete_prize(&self, id: &str) -> Result<Value> {
        let path = format!("/api/admin/prizes/{}", path_id(id)?);
        self.client.delete(&path).await
    }

    pub async fn prize_stats(&self) -> Result<Value> {
        self.client.get("/api/admin/prizes/stats", &Query::new()).await
    }

    pub async fn update_prize_stock(&self, id: &str, stock_limit: u64) -> Result<Value> {
        let path = format!("/api/admin/prizes/{}/stock", path_id(id)?);
        self.client
            .put(&path, &json!({ "stockLimit": stock_limit }))
            .await
    }

    pub async fn validate_prize_configuration(&self) -> Result<Value> {
        self.client
            .get("/api/admin/prizes/validate", &Query::new())
            .await
    }

    // Plays

    pub async fn plays(&self, page: u32, limit: u32, filters: &PlayFilters) -> Result<Page<PlaySummary>> {
        self.client
            .get("/api/admin/plays", &play_query(page, limit, filters))
            .await
    }

    /// CSV export of plays. The redemption filter does not apply here.
    pub async fn export_plays(&self, filters: &PlayFilters) -> Result<Vec<u8>> {
        self.client
            .get_bytes("/api/admin/exports/plays.csv", &export_query(filters))
            .await
    }

    pub async fn redeem_play(&self, play_id: &str, request: &RedeemRequest) -> Result<Value> {
        let path = format!("/api/admin/play/{}/redeem", path_id(play_id)?);
        let result = self.client.post(&path, request).await?;
        tracing::info!("Play {} redeemed by {}", play_id, request.redeemed_by);
        Ok(result)
    }
}

fn page_query(page: u32, limit: u32) -> Query {
    vec![
        ("page", page.max(1).to_string()),
        ("limit", limit.max(1).to_string()),
    ]
}

pub fn token_query(page: u32, limit: u32, search: Option<&str>, is_used: Option<bool>) -> Query {
    let mut query = page_query(page, limit);
    if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
        query.push(("search", search.to_string()));
    }
    if let Some(is_used) = is_used {
        query.push(("isUsed", is_used.to_string()));
    }
    query
}

pub fn play_query(page: u32, limit: u32, filters: &PlayFilters) -> Query {
    let mut query = page_query(page, limit);
    query.extend(export_query(filters));
    if let Some(is_redeemed) = filters.is_redeemed {
        query.push(("isRedeemed", is_redeemed.to_string()));
    }
    query
}

pub fn export_query(filters: &PlayFilters) -> Query {
    let mut query = Query::new();
    let fields = [
        ("from", &filters.from),
        ("to", &filters.to),
        ("prizeType", &filters.prize_type),
    ];
    for (key, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            query.push((key, value.to_string()));
        }
    }
    query
}

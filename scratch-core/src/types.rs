use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayClaimRequest {
    pub token: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub age: u32,
    pub accept_terms: bool,
}

/// What the scratch surface hides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayOutcome {
    pub prize_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_winner: bool,
    pub result_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResult {
    pub play_id: String,
    pub result: PlayOutcome,
    #[serde(default)]
    pub email_sent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidation {
    pub valid: bool,
    #[serde(default)]
    pub token: Option<serde_json::Value>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A play as seen by the status, staff and admin endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaySummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub result_code: String,
    pub prize_type: String,
    pub is_winner: bool,
    pub is_redeemed: bool,
    #[serde(default)]
    pub redeemed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub type PlayStatus = PlaySummary;

impl PlaySummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Only unredeemed winning plays can be handed a prize.
    pub fn is_redeemable(&self) -> bool {
        self.is_winner && !self.is_redeemed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultType {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prize_value: Option<String>,
    pub weight: f64,
    #[serde(default)]
    pub stock_limit: Option<u64>,
    #[serde(default)]
    pub distributed_count: u64,
    #[serde(default)]
    pub redeemed_count: u64,
    pub is_prize: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResultType {
    /// Units left before the stock limit, `None` when unlimited.
    pub fn remaining_stock(&self) -> Option<u64> {
        self.stock_limit
            .map(|limit| limit.saturating_sub(self.distributed_count))
    }
}

/// Fields accepted when creating a prize type. Updates send the same shape
/// with every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrizeDraft {
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize_value: Option<String>,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_limit: Option<u64>,
    pub is_prize: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrizeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_prize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    pub is_used: bool,
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub play: Option<PlaySummary>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Staff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: Account,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCounts {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCounts {
    pub total: u64,
    pub today: u64,
    pub this_week: u64,
    pub redeemed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultTypeUsage {
    #[serde(flatten)]
    pub result_type: ResultType,
    #[serde(default)]
    pub plays_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub tokens: TokenCounts,
    pub plays: PlayCounts,
    #[serde(default)]
    pub result_types: Vec<ResultTypeUsage>,
}

/// One page of a paginated admin listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "tokens", alias = "plays")]
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(default)]
    pub pages: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    #[serde(default)]
    pub message: String,
    pub count: u64,
}

/// Filters shared by the admin play listing and CSV export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayFilters {
    pub from: Option<String>,
    pub to: Option<String>,
    pub prize_type: Option<String>,
    pub is_redeemed: Option<bool>,
}

/// Presentation bucket for a result. The original prize names are matched
/// case-insensitively; every other winning type falls into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrizeTier {
    Grand,
    Medium,
    Small,
    Other,
    NoPrize,
}

impl PlayOutcome {
    pub fn tier(&self) -> PrizeTier {
        if !self.is_winner {
            return PrizeTier::NoPrize;
        }
        match self.prize_type.to_lowercase().as_str() {
            "grand prize" => PrizeTier::Grand,
            "medium prize" => PrizeTier::Medium,
            "small prize" => PrizeTier::Small,
            _ => PrizeTier::Other,
        }
    }
}

//! Forms used by the staff and admin portals.

use super::{FieldCheck, FieldRule, FieldValue, Form};
use crate::services::RedeemRequest;
use crate::types::PrizeDraft;
use chrono::{DateTime, Utc};

pub const MAX_TOKEN_BATCH: i64 = 10_000;

const QUERY: &[FieldRule] = &[FieldRule::Required("Please enter a search query")];
const REDEEMED_BY: &[FieldRule] = &[FieldRule::Required("Please enter your name")];
const PRIZE_NAME: &[FieldRule] = &[FieldRule::Required("Name is required")];
const PRIZE_CODE: &[FieldRule] = &[FieldRule::Required("Code is required")];
const PRIZE_WEIGHT: &[FieldRule] = &[
    FieldRule::Required("Weight is required"),
    FieldRule::Min(0.0, "Weight cannot be negative"),
];
const PRIZE_STOCK: &[FieldRule] = &[FieldRule::Min(0.0, "Stock limit cannot be negative")];
const TOKEN_COUNT: &[FieldRule] = &[
    FieldRule::Required("Count is required"),
    FieldRule::Min(1.0, "Create at least one token"),
    FieldRule::Max(MAX_TOKEN_BATCH as f64, "At most 10000 tokens per batch"),
];

fn trimmed(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Staff search by result code, phone number or email.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchForm {
    pub query: String,
}

impl Form for SearchForm {
    type Payload = String;

    fn fields(&self) -> Vec<FieldCheck<'_>> {
        vec![FieldCheck {
            name: "query",
            value: FieldValue::Text(&self.query),
            rules: QUERY,
        }]
    }

    fn payload(&self) -> String {
        self.query.trim().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedeemForm {
    pub redeemed_by: String,
    pub notes: String,
}

impl Form for RedeemForm {
    type Payload = RedeemRequest;

    fn fields(&self) -> Vec<FieldCheck<'_>> {
        vec![FieldCheck {
            name: "redeemedBy",
            value: FieldValue::Text(&self.redeemed_by),
            rules: REDEEMED_BY,
        }]
    }

    fn payload(&self) -> RedeemRequest {
        RedeemRequest {
            redeemed_by: self.redeemed_by.trim().to_string(),
            notes: trimmed(&self.notes),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrizeForm {
    pub name: String,
    pub code: String,
    pub description: String,
    pub prize_value: String,
    pub weight: Option<f64>,
    pub stock_limit: Option<i64>,
    pub is_prize: bool,
    pub is_active: bool,
}

impl Default for PrizeForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            code: String::new(),
            description: String::new(),
            prize_value: String::new(),
            weight: Some(1.0),
            stock_limit: None,
            is_prize: true,
            is_active: true,
        }
    }
}

impl Form for PrizeForm {
    type Payload = PrizeDraft;

    fn fields(&self) -> Vec<FieldCheck<'_>> {
        vec![
            FieldCheck {
                name: "name",
                value: FieldValue::Text(&self.name),
                rules: PRIZE_NAME,
            },
            FieldCheck {
                name: "code",
                value: FieldValue::Text(&self.code),
                rules: PRIZE_CODE,
            },
            FieldCheck {
                name: "weight",
                value: FieldValue::Number(self.weight),
                rules: PRIZE_WEIGHT,
            },
            FieldCheck {
                name: "stockLimit",
                value: FieldValue::Number(self.stock_limit.map(|s| s as f64)),
                rules: PRIZE_STOCK,
            },
        ]
    }

    fn payload(&self) -> PrizeDraft {
        PrizeDraft {
            name: self.name.trim().to_string(),
            code: self.code.trim().to_string(),
            description: trimmed(&self.description),
            prize_value: trimmed(&self.prize_value),
            weight: self.weight.unwrap_or_default(),
            stock_limit: self.stock_limit.map(|s| s.max(0) as u64),
            is_prize: self.is_prize,
            is_active: Some(self.is_active),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenBatch {
    pub count: u32,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenBatchForm {
    pub count: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Form for TokenBatchForm {
    type Payload = TokenBatch;

    fn fields(&self) -> Vec<FieldCheck<'_>> {
        vec![FieldCheck {
            name: "count",
            value: FieldValue::Number(self.count.map(|c| c as f64)),
            rules: TOKEN_COUNT,
        }]
    }

    fn payload(&self) -> TokenBatch {
        TokenBatch {
            count: self.count.unwrap_or(1).clamp(1, MAX_TOKEN_BATCH) as u32,
            expires_at: self.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormState;

    #[test]
    fn test_search_requires_non_blank_query() {
        let mut state = FormState::new(SearchForm::default());
        assert!(!state.can_submit());

        state.update(|f| f.query = "   ".to_string());
        assert_eq!(
            state.errors().for_field("query"),
            Some("Please enter a search query")
        );

        state.update(|f| f.query = "  RC-77 ".to_string());
        assert_eq!(state.submit().unwrap(), "RC-77");
    }

    #[test]
    fn test_redeem_blank_notes_become_none() {
        let state = FormState::new(RedeemForm {
            redeemed_by: " Sam ".to_string(),
            notes: "  ".to_string(),
        });
        let req = state.submit().unwrap();
        assert_eq!(req.redeemed_by, "Sam");
        assert!(req.notes.is_none());

        let state = FormState::new(RedeemForm::default());
        assert_eq!(
            state.errors().for_field("redeemedBy"),
            Some("Please enter your name")
        );
    }

    #[test]
    fn test_prize_form() {
        let mut state = FormState::new(PrizeForm::default());
        assert!(state.errors().for_field("name").is_some());

        state.update(|f| {
            f.name = "Grand Prize".to_string();
            f.code = "GRAND".to_string();
            f.weight = Some(-1.0);
        });
        assert_eq!(
            state.errors().for_field("weight"),
            Some("Weight cannot be negative")
        );

        state.update(|f| {
            f.weight = Some(0.5);
            f.stock_limit = Some(10);
        });
        let draft = state.submit().unwrap();
        assert_eq!(draft.stock_limit, Some(10));
        assert!(draft.description.is_none());
    }

    #[test]
    fn test_token_batch_bounds() {
        let mut state = FormState::new(TokenBatchForm::default());
        assert_eq!(state.errors().for_field("count"), Some("Count is required"));

        state.update(|f| f.count = Some(0));
        assert!(!state.can_submit());

        state.update(|f| f.count = Some(MAX_TOKEN_BATCH + 1));
        assert!(!state.can_submit());

        state.update(|f| f.count = Some(250));
        assert_eq!(state.submit().unwrap().count, 250);
    }
}

use super::{FieldCheck, FieldRule, FieldValue, Form};
use crate::types::PlayClaimRequest;
use serde::{Deserialize, Serialize};

pub const MIN_AGE: i64 = 18;
pub const MAX_AGE: i64 = 120;

const TOKEN: &[FieldRule] = &[FieldRule::Required("Token is required")];
const FIRST_NAME: &[FieldRule] = &[
    FieldRule::Required("First name is required"),
    FieldRule::MaxLength(50, "First name too long"),
];
const LAST_NAME: &[FieldRule] = &[
    FieldRule::Required("Last name is required"),
    FieldRule::MaxLength(50, "Last name too long"),
];
const PHONE: &[FieldRule] = &[
    FieldRule::MinLength(10, "Phone number must be at least 10 digits"),
    FieldRule::MaxLength(20, "Phone number too long"),
];
const EMAIL: &[FieldRule] = &[
    FieldRule::Required("Email is required"),
    FieldRule::Email("Invalid email address"),
];
const AGE: &[FieldRule] = &[
    FieldRule::Required("Age is required"),
    FieldRule::Min(MIN_AGE as f64, "You must be at least 18 years old"),
    FieldRule::Max(MAX_AGE as f64, "Invalid age"),
];
const ACCEPT_TERMS: &[FieldRule] = &[FieldRule::MustBeTrue(
    "You must accept the terms and conditions",
)];

/// Player intake form submitted before a play is claimed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerForm {
    pub token: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub age: Option<i64>,
    pub accept_terms: bool,
}

impl Default for PlayerForm {
    fn default() -> Self {
        Self {
            token: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            email: String::new(),
            age: Some(MIN_AGE),
            accept_terms: false,
        }
    }
}

impl PlayerForm {
    /// Start a form, prefilled with the token from a play link when present.
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token: token.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }

    /// Set the age from raw text input; anything unparsable clears it.
    pub fn set_age_input(&mut self, input: &str) {
        self.age = input.trim().parse().ok();
    }
}

impl Form for PlayerForm {
    type Payload = PlayClaimRequest;

    fn fields(&self) -> Vec<FieldCheck<'_>> {
        vec![
            FieldCheck {
                name: "token",
                value: FieldValue::Text(&self.token),
                rules: TOKEN,
            },
            FieldCheck {
                name: "firstName",
                value: FieldValue::Text(&self.first_name),
                rules: FIRST_NAME,
            },
            FieldCheck {
                name: "lastName",
                value: FieldValue::Text(&self.last_name),
                rules: LAST_NAME,
            },
            FieldCheck {
                name: "phone",
                value: FieldValue::Text(&self.phone),
                rules: PHONE,
            },
            FieldCheck {
                name: "email",
                value: FieldValue::Text(&self.email),
                rules: EMAIL,
            },
            FieldCheck {
                name: "age",
                value: FieldValue::Number(self.age.map(|a| a as f64)),
                rules: AGE,
            },
            FieldCheck {
                name: "acceptTerms",
                value: FieldValue::Flag(self.accept_terms),
                rules: ACCEPT_TERMS,
            },
        ]
    }

    fn payload(&self) -> PlayClaimRequest {
        PlayClaimRequest {
            token: self.token.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            age: self.age.unwrap_or(MIN_AGE).clamp(MIN_AGE, MAX_AGE) as u32,
            accept_terms: self.accept_terms,
        }
    }
}

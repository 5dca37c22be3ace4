//! Client-side form validation.
//!
//! Every field declares its rules up front. A [`FormState`] re-runs them on
//! each change and refuses to hand out a payload while any rule fails, so no
//! request is sent for input the backend would reject anyway.

pub mod login;
pub mod player;
pub mod portal;

pub use login::LoginForm;
pub use player::PlayerForm;
pub use portal::{PrizeForm, RedeemForm, SearchForm, TokenBatch, TokenBatchForm};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A single declarative constraint with the message shown when it fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRule {
    Required(&'static str),
    MinLength(usize, &'static str),
    MaxLength(usize, &'static str),
    Email(&'static str),
    Min(f64, &'static str),
    Max(f64, &'static str),
    MustBeTrue(&'static str),
}

/// Current value of a field as the rules see it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(Option<f64>),
    Flag(bool),
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

impl FieldRule {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Required(m)
            | Self::MinLength(_, m)
            | Self::MaxLength(_, m)
            | Self::Email(m)
            | Self::Min(_, m)
            | Self::Max(_, m)
            | Self::MustBeTrue(m) => m,
        }
    }

    /// `true` when `value` satisfies the rule. Rules that do not apply to a
    /// value's kind pass, and optional empties only fail `Required`.
    pub fn check(&self, value: FieldValue<'_>) -> bool {
        match (self, value) {
            (Self::Required(_), FieldValue::Text(s)) => !s.trim().is_empty(),
            (Self::Required(_), FieldValue::Number(n)) => n.is_some_and(f64::is_finite),
            (Self::MinLength(min, _), FieldValue::Text(s)) => s.chars().count() >= *min,
            (Self::MaxLength(max, _), FieldValue::Text(s)) => s.chars().count() <= *max,
            (Self::Email(_), FieldValue::Text(s)) => s.is_empty() || email_regex().is_match(s),
            (Self::Min(min, _), FieldValue::Number(n)) => n.map_or(true, |n| n >= *min),
            (Self::Max(max, _), FieldValue::Number(n)) => n.map_or(true, |n| n <= *max),
            (Self::MustBeTrue(_), FieldValue::Flag(b)) => b,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Per-field violations, at most one per field, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.violations.iter()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// One field, its current value and its rules.
pub struct FieldCheck<'a> {
    pub name: &'static str,
    pub value: FieldValue<'a>,
    pub rules: &'static [FieldRule],
}

pub trait Form {
    type Payload;

    fn fields(&self) -> Vec<FieldCheck<'_>>;

    /// Build the submission payload. Only called once every rule passes.
    fn payload(&self) -> Self::Payload;

    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for field in self.fields() {
            if let Some(rule) = field.rules.iter().find(|r| !r.check(field.value)) {
                errors.push(field.name, rule.message());
            }
        }
        errors
    }
}

/// A form plus the violations from its last change.
#[derive(Debug, Clone)]
pub struct FormState<F: Form> {
    form: F,
    errors: ValidationErrors,
}

impl<F: Form> FormState<F> {
    pub fn new(form: F) -> Self {
        let errors = form.validate();
        Self { form, errors }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Apply a change and re-validate the whole form.
    pub fn update(&mut self, change: impl FnOnce(&mut F)) -> &ValidationErrors {
        change(&mut self.form);
        self.errors = self.form.validate();
        &self.errors
    }

    pub fn can_submit(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn submit(&self) -> Result<F::Payload, ValidationErrors> {
        if self.can_submit() {
            Ok(self.form.payload())
        } else {
            Err(self.errors.clone())
        }
    }

    pub fn into_inner(self) -> F {
        self.form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules() {
        assert!(!FieldRule::Required("r").check(FieldValue::Text("   ")));
        assert!(!FieldRule::Required("r").check(FieldValue::Number(None)));
        assert!(FieldRule::MinLength(3, "m").check(FieldValue::Text("abc")));
        assert!(!FieldRule::MaxLength(2, "m").check(FieldValue::Text("abc")));
        assert!(FieldRule::Email("e").check(FieldValue::Text("a@b.co")));
        assert!(!FieldRule::Email("e").check(FieldValue::Text("a@b")));
        assert!(!FieldRule::Email("e").check(FieldValue::Text("a b@c.de")));
        assert!(!FieldRule::Min(18.0, "m").check(FieldValue::Number(Some(17.0))));
        assert!(FieldRule::Max(120.0, "m").check(FieldValue::Number(Some(120.0))));
        assert!(!FieldRule::MustBeTrue("t").check(FieldValue::Flag(false)));
    }

    #[test]
    fn test_length_counts_characters() {
        let name = "é".repeat(50);
        assert!(FieldRule::MaxLength(50, "m").check(FieldValue::Text(&name)));
    }
}

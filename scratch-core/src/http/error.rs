//! Turning backend failure responses into one message.

use crate::error::{ApiErrorKind, ScratchError};
use crate::routes::Route;
use serde::Deserialize;
use serde_json::Value;

/// Every field an error body is known to carry, read in one pass. A body may
/// mix shapes, so [`ErrorBody::shapes`] lists each one it matches.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    errors: Option<Value>,
    #[serde(default)]
    success: Option<Value>,
}

/// Known backend error shapes, in match priority.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorShape {
    /// `{ "error": { "message": X } }`
    Nested(String),
    /// `{ "message": X }`
    Flat(String),
    /// `{ "errors": [...] }`
    List(Vec<String>),
    /// `{ "success": false, "error": X }`
    Failure(String),
}

impl ErrorShape {
    /// Trimmed message, or `None` when blank.
    pub fn message(&self) -> Option<String> {
        let message = match self {
            Self::Nested(m) | Self::Flat(m) | Self::Failure(m) => m.trim().to_string(),
            Self::List(entries) => entries
                .iter()
                .map(|e| e.trim())
                .filter(|e| !e.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        };
        (!message.is_empty()).then_some(message)
    }
}

impl ErrorBody {
    /// Parse a JSON object body. Anything else carries no usable message.
    pub fn parse(body: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<Value>(body).ok()? {
            value @ Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    pub fn shapes(&self) -> Vec<ErrorShape> {
        let mut shapes = Vec::new();
        if let Some(Value::Object(map)) = &self.error {
            if let Some(Value::String(m)) = map.get("message") {
                shapes.push(ErrorShape::Nested(m.clone()));
            }
        }
        if let Some(Value::String(m)) = &self.message {
            shapes.push(ErrorShape::Flat(m.clone()));
        }
        if let Some(Value::Array(errors)) = &self.errors {
            shapes.push(ErrorShape::List(errors.iter().map(list_entry).collect()));
        }
        if let (Some(Value::Bool(false)), Some(Value::String(m))) = (&self.success, &self.error) {
            shapes.push(ErrorShape::Failure(m.clone()));
        }
        shapes
    }

    /// First non-blank message among the matched shapes.
    pub fn message(&self) -> Option<String> {
        self.shapes().iter().find_map(ErrorShape::message)
    }
}

fn list_entry(entry: &Value) -> String {
    match entry {
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(s)) => s.trim().to_string(),
            _ => entry.to_string(),
        },
        other => other.to_string(),
    }
}

pub fn status_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request. Please check your input.",
        401 => "Unauthorized access.",
        403 => "Access denied.",
        404 => "Resource not found.",
        500..=599 => "Server error. Please try again later.",
        _ => "An unexpected error occurred",
    }
}

/// User-facing message for a failed response: the body's own message when it
/// has a known shape, otherwise the status default.
pub fn normalize_message(status: u16, body: &[u8]) -> String {
    ErrorBody::parse(body)
        .and_then(|b| b.message())
        .unwrap_or_else(|| status_message(status).to_string())
}

/// Build the error for a non-success response. 401 is returned as
/// `Unauthenticated` so the caller can route to `login_route`.
pub fn from_response(status: u16, body: &[u8], login_route: Option<Route>) -> ScratchError {
    let message = normalize_message(status, body);

    if status == 401 {
        if let Some(login_route) = login_route {
            return ScratchError::Unauthenticated {
                message,
                login_route,
            };
        }
    }

    ScratchError::api(ApiErrorKind::from_status(status), Some(status), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_shapes() {
        assert_eq!(
            normalize_message(400, br#"{"error":{"message":"Token already used"}}"#),
            "Token already used"
        );
        assert_eq!(
            normalize_message(400, br#"{"message":"Token expired"}"#),
            "Token expired"
        );
        assert_eq!(
            normalize_message(422, br#"{"errors":["A","B"]}"#),
            "A, B"
        );
        assert_eq!(
            normalize_message(409, br#"{"success":false,"error":"Out of stock"}"#),
            "Out of stock"
        );
    }

    #[test]
    fn test_nested_wins_over_flat() {
        let body = br#"{"message":"outer","error":{"message":"inner"}}"#;
        assert_eq!(normalize_message(400, body), "inner");
    }

    #[test]
    fn test_mixed_body_lists_every_shape() {
        let body = ErrorBody::parse(br#"{"message":"","errors":["A",{"message":"B"}]}"#).unwrap();
        assert_eq!(
            body.shapes(),
            vec![
                ErrorShape::Flat(String::new()),
                ErrorShape::List(vec!["A".to_string(), "B".to_string()]),
            ]
        );
        assert!(ErrorBody::parse(b"[1, 2]").is_none());
    }

    #[test]
    fn test_bare_status_fallbacks() {
        assert_eq!(normalize_message(404, b""), "Resource not found.");
        assert_eq!(normalize_message(403, b"   "), "Access denied.");
        assert_eq!(normalize_message(503, b"<html>Bad Gateway</html>"), "Server error. Please try again later.");
        assert_eq!(normalize_message(418, b"{}"), "An unexpected error occurred");
    }

    #[test]
    fn test_blank_or_odd_messages_fall_back() {
        assert_eq!(normalize_message(400, br#"{"message":"  "}"#), "Invalid request. Please check your input.");
        assert_eq!(normalize_message(400, br#"{"errors":[]}"#), "Invalid request. Please check your input.");
        assert_eq!(
            normalize_message(400, br#"{"errors":[{"field":"age","message":"too young"}, 7]}"#),
            "too young, 7"
        );
        assert_eq!(
            normalize_message(500, br#"{"success":true,"error":"odd"}"#),
            "Server error. Please try again later."
        );
        assert_eq!(normalize_message(422, br#"{"message":"","errors":["A","B"]}"#), "A, B");
        assert_eq!(normalize_message(400, br#"{"error":{"message":""},"message":"X"}"#), "X");
        assert_eq!(
            normalize_message(409, br#"{"error":{"message":" "},"errors":[],"success":false}"#),
            "An unexpected error occurred"
        );
        assert_eq!(
            normalize_message(400, br#"{"message":42,"success":false,"error":"Out of stock"}"#),
            "Out of stock"
        );
        assert_eq!(normalize_message(404, br#"["not","an","object"]"#), "Resource not found.");
    }

    #[test]
    fn test_messages_are_deterministic() {
        let bodies: [&[u8]; 4] = [
            br#"{"error":{"message":"X"}}"#,
            br#"{"message":"X"}"#,
            br#"{"errors":["A","B"]}"#,
            b"",
        ];
        for body in bodies {
            let first = normalize_message(404, body);
            assert!(!first.is_empty());
            assert_eq!(first, normalize_message(404, body));
        }
    }

    #[test]
    fn test_unauthorized_maps_to_login_route() {
        let err = from_response(401, br#"{"message":"Invalid credentials"}"#, Some(Route::AdminLogin));
        match err {
            ScratchError::Unauthenticated { message, login_route } => {
                assert_eq!(message, "Invalid credentials");
                assert_eq!(login_route, Route::AdminLogin);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = from_response(401, b"", None);
        assert!(matches!(
            err,
            ScratchError::Api { kind: ApiErrorKind::Other, status: Some(401), .. }
        ));
    }
}

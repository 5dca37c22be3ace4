use crate::forms::ValidationErrors;
use crate::routes::Route;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScratchError>;

/// Category of a non-401 failure reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Forbidden,
    NotFound,
    Server,
    Other,
}

impl ApiErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }
}

#[derive(Error, Debug)]
pub enum ScratchError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{message}")]
    Unauthenticated { message: String, login_route: Route },

    #[error("{message}")]
    Api {
        kind: ApiErrorKind,
        status: Option<u16>,
        message: String,
    },

    #[error("Network connection error: {0}")]
    NetworkConnection(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScratchError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn network_connection(msg: impl Into<String>) -> Self {
        Self::NetworkConnection(msg.into())
    }

    pub fn dialog(msg: impl Into<String>) -> Self {
        Self::Dialog(msg.into())
    }

    pub fn api(kind: ApiErrorKind, status: Option<u16>, msg: impl Into<String>) -> Self {
        Self::Api {
            kind,
            status,
            message: msg.into(),
        }
    }

    /// Message suitable for a transient notification.
    ///
    /// Storage, serialization and internal failures are not meaningful to a
    /// player, so they collapse into the generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors.to_string(),
            Self::Unauthenticated { message, .. } | Self::Api { message, .. } => message.clone(),
            Self::NetworkConnection(_) => {
                "Unable to reach the server. Please check your connection and try again."
                    .to_string()
            }
            Self::Config(msg) => format!("Invalid configuration: {}", msg),
            _ => "An unexpected error occurred".to_string(),
        }
    }

    /// Login route to send the user to, when this error ended their session.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::Unauthenticated { login_route, .. } => Some(*login_route),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ScratchError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<reqwest::Error> for ScratchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::internal(format!("Malformed response body: {}", err));
        }
        Self::NetworkConnection(err.to_string())
    }
}

// conversion from dialoguer::Error
impl From<dialoguer::Error> for ScratchError {
    fn from(err: dialoguer::Error) -> Self {
        ScratchError::Dialog(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_kinds() {
        assert_eq!(ApiErrorKind::from_status(400), ApiErrorKind::BadRequest);
        assert_eq!(ApiErrorKind::from_status(403), ApiErrorKind::Forbidden);
        assert_eq!(ApiErrorKind::from_status(404), ApiErrorKind::NotFound);
        assert_eq!(ApiErrorKind::from_status(502), ApiErrorKind::Server);
        assert_eq!(ApiErrorKind::from_status(409), ApiErrorKind::Other);
    }

    #[test]
    fn test_user_message_hides_internal_detail() {
        let err = ScratchError::internal("sqlite pool poisoned");
        assert_eq!(err.user_message(), "An unexpected error occurred");

        let err = ScratchError::api(ApiErrorKind::NotFound, Some(404), "Play not found");
        assert_eq!(err.user_message(), "Play not found");
        assert!(err.redirect().is_none());
    }
}

//! Error types for PetCare gateway operations.

use std::collections::BTreeMap;
use thiserror::Error;

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Coarse classification surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response was received.
    TransportFailure,
    /// Non-2xx response without a more specific meaning.
    ServerError,
    /// 401 from any endpoint. The session has already been cleared.
    AuthorizationExpired,
    /// 4xx carrying field-level messages.
    ValidationError,
    /// Local failure unrelated to the server (session hand-off).
    Internal,
}

/// Errors that can occur during gateway operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    AuthorizationExpired(String),

    #[error("{message}")]
    Validation {
        status: u16,
        message: String,
        fields: BTreeMap<String, String>,
    },

    #[error("Unexpected response body: {0}")]
    InvalidBody(String),

    #[error("Session error: {0}")]
    Session(String),
}

impl GatewayError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Transport(_) => ErrorKind::TransportFailure,
            GatewayError::Server { .. } | GatewayError::InvalidBody(_) => ErrorKind::ServerError,
            GatewayError::AuthorizationExpired(_) => ErrorKind::AuthorizationExpired,
            GatewayError::Validation { .. } => ErrorKind::ValidationError,
            GatewayError::Session(_) => ErrorKind::Internal,
        }
    }

    /// Single human-readable message for display.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            GatewayError::Transport(msg)
            | GatewayError::AuthorizationExpired(msg)
            | GatewayError::Server { message: msg, .. }
            | GatewayError::Validation { message: msg, .. } => msg.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status, when the error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Server { status, .. } | GatewayError::Validation { status, .. } => {
                Some(*status)
            }
            GatewayError::AuthorizationExpired(_) => Some(401),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_authorization_expired(&self) -> bool {
        matches!(self, GatewayError::AuthorizationExpired(_))
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::InvalidBody(err.to_string())
    }
}

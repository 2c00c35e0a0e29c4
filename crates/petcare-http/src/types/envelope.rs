//! Tagged success/failure view of a response, parsed once per call.

use crate::error::GatewayError;
use crate::types::ApiResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// Message used when the server gave neither a message field nor a body.
pub const GENERIC_FAILURE: &str = "Request failed";

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
    Empty,
}

impl Body {
    pub fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        if text.trim().is_empty() {
            return Body::Empty;
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Null) => Body::Empty,
            Ok(value) => Body::Json(value),
            Err(_) => Body::Text(text.into_owned()),
        }
    }

    /// Decode the JSON payload into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, GatewayError> {
        match self {
            Body::Json(value) => Ok(serde_json::from_value(value)?),
            Body::Text(text) => Err(GatewayError::InvalidBody(format!(
                "expected JSON, got {:?}",
                truncate(&text, 80)
            ))),
            Body::Empty => Err(GatewayError::InvalidBody("empty body".into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub status: u16,
    pub message: String,
    pub field_errors: BTreeMap<String, String>,
}

impl Failure {
    fn from_body(status: u16, body: Body, raw: &str) -> Self {
        let (message, field_errors) = match body {
            Body::Json(value) => {
                let message = value
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| raw.trim().to_string());
                (message, field_errors(&value))
            }
            Body::Text(text) => (text, BTreeMap::new()),
            Body::Empty => (GENERIC_FAILURE.to_string(), BTreeMap::new()),
        };
        Failure {
            status,
            message,
            field_errors,
        }
    }

    #[inline]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Classify into the gateway taxonomy. Side effects for 401 are the caller's job.
    pub fn to_error(&self) -> GatewayError {
        if self.is_unauthorized() {
            return GatewayError::AuthorizationExpired(self.message.clone());
        }
        if (400..500).contains(&self.status) && !self.field_errors.is_empty() {
            return GatewayError::Validation {
                status: self.status,
                message: self.message.clone(),
                fields: self.field_errors.clone(),
            };
        }
        GatewayError::Server {
            status: self.status,
            message: self.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success { status: u16, body: Body },
    Failure(Failure),
}

impl Envelope {
    pub fn from_response(response: &ApiResponse) -> Self {
        let body = Body::parse(&response.body);
        if response.is_success() {
            Envelope::Success {
                status: response.status,
                body,
            }
        } else {
            Envelope::Failure(Failure::from_body(response.status, body, &response.text()))
        }
    }
}

/// Collect field-level messages from the common Spring-style shapes:
/// `{"errors": {"name": "..."}}`, `{"errors": [{"field": .., "message": ..}]}`,
/// `{"fieldErrors": [{"field": .., "defaultMessage": ..}]}`.
fn field_errors(value: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for key in ["errors", "fieldErrors"] {
        match value.get(key) {
            Some(Value::Object(map)) => {
                for (field, msg) in map {
                    if let Some(text) = message_text(msg) {
                        out.insert(field.clone(), text);
                    }
                }
            }
            Some(Value::Array(items)) => {
                for item in items {
                    let field = item.get("field").and_then(Value::as_str);
                    let msg = item
                        .get("message")
                        .or_else(|| item.get("defaultMessage"))
                        .and_then(message_text);
                    if let (Some(field), Some(msg)) = (field, msg) {
                        out.insert(field.to_string(), msg);
                    }
                }
            }
            _ => {}
        }
    }
    out
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

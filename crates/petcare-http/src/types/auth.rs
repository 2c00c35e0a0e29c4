//! Identity, credential and auth payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Role assigned when the login response omits roles.
pub const DEFAULT_ROLE: &str = "ROLE_USER";

/// Opaque bearer token.
///
/// Construction strips one pair of surrounding quote characters and trims
/// whitespace, so values written by older clients as JSON strings still work.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    /// Normalize a raw token. Returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let token = strip_quotes(raw).trim();
        if token.is_empty() {
            None
        } else {
            Some(Credential(token.to_string()))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

fn is_quote(c: u8) -> bool {
    c == b'"' || c == b'\''
}

fn strip_quotes(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 3 && is_quote(bytes[0]) && is_quote(bytes[bytes.len() - 1]) {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

/// Who is signed in, as reported by the server at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub username: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl UserIdentity {
    pub fn new<I, S>(username: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Body of `/auth/login` and `/auth/register`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw `/auth/login` success body. Only `accessToken` is required in practice.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

impl AuthResponse {
    /// Normalize into a session pair, filling gaps from the submitted form.
    pub fn into_session(self, submitted_username: &str) -> Option<(UserIdentity, Credential)> {
        let credential = self
            .access_token
            .as_deref()
            .and_then(Credential::parse)
            .or_else(|| self.token.as_deref().and_then(Credential::parse))?;

        let username = self
            .username
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| submitted_username.to_string());
        let roles = self
            .roles
            .unwrap_or_else(|| vec![DEFAULT_ROLE.to_string()]);

        Some((UserIdentity::new(username, roles), credential))
    }
}

/// Generic `{ "message": ... }` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

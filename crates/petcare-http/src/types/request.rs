//! Outgoing request description handed to a [`crate::traits::PetNetwork`].

use http::Method;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base URL, starting with `/`.
    pub path: String,
    pub body: Option<bytes::Bytes>,
    /// Whether the session credential should be attached.
    pub authorized: bool,
    pub headers: BTreeMap<String, String>,
}

impl ApiRequest {
    #[inline]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            authorized: true,
            headers: BTreeMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Mark as a public endpoint; no `Authorization` header is sent.
    pub fn anonymous(mut self) -> Self {
        self.authorized = false;
        self
    }

    pub fn with_json<T: serde::Serialize>(mut self, body: &T) -> serde_json::Result<Self> {
        self.body = Some(serde_json::to_vec(body)?.into());
        Ok(self)
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = ApiRequest::post("/auth/login")
            .anonymous()
            .with_json(&serde_json::json!({"username": "a"}))
            .unwrap()
            .with_header("Accept", "application/json");

        assert_eq!(req.method, Method::POST);
        assert!(!req.authorized);
        assert!(req.has_body());
        assert_eq!(req.header("accept"), Some("application/json"));
    }

    #[test]
    fn test_defaults_to_authorized() {
        let req = ApiRequest::get("/pets");
        assert!(req.authorized);
        assert!(!req.has_body());
    }
}

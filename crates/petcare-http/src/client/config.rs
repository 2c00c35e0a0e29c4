//! Configuration for the PetCare gateway.

/// Configuration for the PetCare gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without trailing slash, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    /// Log every request and response line at debug level.
    pub enable_logging: bool,
    /// User-Agent sent by the native network.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: petcare_common::api_base_url(),
            enable_logging: false,
            user_agent: format!("petcare/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl AsRef<str>) -> Self {
        ClientConfig {
            base_url: petcare_common::normalize_base_url(base_url.as_ref()),
            ..Default::default()
        }
    }

    /// Absolute URL for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

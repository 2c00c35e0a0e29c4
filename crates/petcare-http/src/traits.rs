use crate::error::Result;
use crate::types::{ApiRequest, ApiResponse, Credential, UserIdentity};
use async_trait::async_trait;

/// Abstraction for network operations.
///
/// Implementations return `Ok` for every response that arrived, whatever its
/// status, and `GatewayError::Transport` only when nothing came back.
#[async_trait]
pub trait PetNetwork: Send + Sync + 'static {
    async fn fetch(&self, url: &str, request: ApiRequest) -> Result<ApiResponse>;
}

/// The session owner, as seen from the gateway.
///
/// The gateway never touches storage or navigation directly: it reads the
/// current credential, hands off a successful login, and reports 401s here.
pub trait SessionHooks: Send + Sync + 'static {
    /// Credential to attach to authorized requests, read fresh for every call.
    fn credential(&self) -> Option<Credential>;

    /// Persist a new session. Must be durable before returning `Ok`.
    fn signed_in(
        &self,
        identity: UserIdentity,
        credential: Credential,
    ) -> std::result::Result<(), String>;

    /// A request came back 401. Called once per failing call.
    fn unauthorized(&self);
}

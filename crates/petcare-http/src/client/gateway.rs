//! Typed gateway: one method per server capability.

use crate::client::config::ClientConfig;
use crate::client::headers;
use crate::client::native_network::NativeNetwork;
use crate::error::{GatewayError, Result};
use crate::traits::{PetNetwork, SessionHooks};
use crate::types::{
    ApiRequest, ApiResponse, AuthResponse, Body, Credentials, Envelope, MessageResponse,
    PetAction, PetId, PetRequest, PetResponse, UserIdentity,
};
use serde_json::Value;
use std::sync::Arc;

/// The PetCare API client
#[derive(Clone)]
pub struct PetGateway {
    network: Arc<dyn PetNetwork>,
    config: Arc<ClientConfig>,
    session: Arc<dyn SessionHooks>,
}

impl PetGateway {
    pub fn new(session: Arc<dyn SessionHooks>) -> Result<Self> {
        Self::with_config(ClientConfig::default(), session)
    }

    /// Build over reqwest. No request timeout is set: a hung call only blocks its caller.
    pub fn with_config(config: ClientConfig, session: Arc<dyn SessionHooks>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self::with_network(
            Arc::new(NativeNetwork::new(client)),
            config,
            session,
        ))
    }

    pub fn with_network(
        network: Arc<dyn PetNetwork>,
        config: ClientConfig,
        session: Arc<dyn SessionHooks>,
    ) -> Self {
        PetGateway {
            network,
            config: Arc::new(config),
            session,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // --- Auth ---

    /// Create an account. Does not sign in.
    ///
    /// Any 2xx counts as created, whatever the body looks like.
    pub async fn register(&self, credentials: &Credentials) -> Result<MessageResponse> {
        let request = ApiRequest::post("/auth/register")
            .anonymous()
            .with_json(credentials)?;
        let response = match self.send(request).await? {
            Body::Json(Value::String(message)) | Body::Text(message) => {
                MessageResponse { message }
            }
            Body::Json(value @ Value::Object(_)) => {
                serde_json::from_value(value).unwrap_or_default()
            }
            Body::Json(_) | Body::Empty => MessageResponse::default(),
        };
        Ok(response)
    }

    /// Sign in and hand the new session to the session owner before returning.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserIdentity> {
        let request = ApiRequest::post("/auth/login")
            .anonymous()
            .with_json(credentials)?;
        let body = self.send(request).await?;
        let auth: AuthResponse = match body {
            Body::Json(value) => serde_json::from_value(value)?,
            _ => AuthResponse::default(),
        };

        let (identity, credential) = auth.into_session(&credentials.username).ok_or_else(|| {
            GatewayError::Server {
                status: 200,
                message: "Login response did not include an access token".to_string(),
            }
        })?;

        self.session
            .signed_in(identity.clone(), credential)
            .map_err(GatewayError::Session)?;
        tracing::info!("Signed in as {}", identity.username);
        Ok(identity)
    }

    // --- Pets ---

    /// Pets owned by the caller. Failures other than 401 yield an empty list.
    pub async fn list_own_pets(&self) -> Result<Vec<PetResponse>> {
        self.list("/pets").await
    }

    /// Every pet in the system. Same failure policy as [`Self::list_own_pets`].
    pub async fn list_all_pets(&self) -> Result<Vec<PetResponse>> {
        self.list("/pets/all").await
    }

    pub async fn create_pet(&self, pet: &PetRequest) -> Result<PetResponse> {
        let request = ApiRequest::post("/pets").with_json(pet)?;
        self.send(request).await?.decode()
    }

    pub async fn update_pet(&self, id: PetId, pet: &PetRequest) -> Result<PetResponse> {
        let request = ApiRequest::put(format!("/pets/{}", id)).with_json(pet)?;
        self.send(request).await?.decode()
    }

    pub async fn perform_pet_action(&self, id: PetId, action: PetAction) -> Result<PetResponse> {
        let request = ApiRequest::post(format!("/pets/{}/{}", id, action.as_str()))
            .with_json(&serde_json::json!({}))?;
        self.send(request).await?.decode()
    }

    pub async fn delete_pet(&self, id: PetId) -> Result<()> {
        self.send(ApiRequest::delete(format!("/pets/{}", id)))
            .await
            .map(|_| ())
    }

    async fn list(&self, path: &str) -> Result<Vec<PetResponse>> {
        match self.send(ApiRequest::get(path)).await {
            Ok(Body::Json(value)) if value.is_array() => {
                serde_json::from_value(value).or_else(|e| {
                    tracing::warn!("Discarding undecodable pet list from {}: {}", path, e);
                    Ok(Vec::new())
                })
            }
            Ok(_) => Ok(Vec::new()),
            Err(e) if e.is_authorization_expired() => Err(e),
            Err(e) => {
                tracing::warn!("Pet listing {} failed, showing empty list: {}", path, e);
                Ok(Vec::new())
            }
        }
    }

    /// Send one request, parse the envelope once, and apply the 401 policy.
    async fn send(&self, request: ApiRequest) -> Result<Body> {
        let url = self.config.endpoint(&request.path);
        let credential = if request.authorized {
            self.session.credential()
        } else {
            None
        };
        let request = headers::decorate(request, credential.as_ref());

        self.log_request(&url, &request);
        let response = self.network.fetch(&url, request).await?;
        self.log_response(&url, &response);

        match Envelope::from_response(&response) {
            Envelope::Success { body, .. } => Ok(body),
            Envelope::Failure(failure) => {
                if failure.is_unauthorized() {
                    tracing::info!("{} returned 401, ending session", url);
                    self.session.unauthorized();
                }
                Err(failure.to_error())
            }
        }
    }

    fn log_request(&self, url: &str, request: &ApiRequest) {
        if self.config.enable_logging {
            tracing::debug!(
                "{} {} authorized={}",
                request.method,
                url,
                request.header(headers::AUTHORIZATION).is_some()
            );
        }
    }

    fn log_response(&self, url: &str, response: &ApiResponse) {
        if self.config.enable_logging {
            tracing::debug!("{} -> {} ({} bytes)", url, response.status, response.body.len());
        }
    }
}

//! Dashboard controller: what a front end calls for every screen action.
//!
//! Listing follows the capability tier (administrators see every pet), and
//! each successful mutation is followed by exactly one refresh.

use crate::roles::CapabilityTier;
use crate::session::{Navigator, SessionManager};
use crate::store::CredentialStore;
use petcare_http::{
    ClientConfig, Credentials, PetAction, PetGateway, PetId, PetRequest, PetResponse,
    UserIdentity,
};
use std::sync::Arc;
use tracing::info;

pub struct Dashboard {
    gateway: PetGateway,
    session: Arc<SessionManager>,
}

impl Dashboard {
    pub fn new(gateway: PetGateway, session: Arc<SessionManager>) -> Self {
        Self { gateway, session }
    }

    /// Wire a session over `store` into a reqwest-backed gateway and bootstrap it.
    pub fn connect(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> petcare_http::Result<Self> {
        let session = Arc::new(SessionManager::new(store, navigator));
        let gateway = PetGateway::with_config(config, session.clone())?;
        session.bootstrap();
        Ok(Self::new(gateway, session))
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn gateway(&self) -> &PetGateway {
        &self.gateway
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> petcare_http::Result<UserIdentity> {
        self.gateway
            .login(&Credentials::new(username, password))
            .await
    }

    /// Register, then sign in with the same credentials.
    pub async fn sign_up(&self, username: &str, password: &str) -> petcare_http::Result<UserIdentity> {
        let credentials = Credentials::new(username, password);
        let created = self.gateway.register(&credentials).await?;
        if !created.message.is_empty() {
            info!("Registered {}: {}", username, created.message);
        }
        self.gateway.login(&credentials).await
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    /// Pets visible to the current user. Empty without a network call when signed out.
    pub async fn refresh(&self) -> petcare_http::Result<Vec<PetResponse>> {
        match self.session.tier() {
            None => Ok(Vec::new()),
            Some(CapabilityTier::Administrative) => self.gateway.list_all_pets().await,
            Some(CapabilityTier::Standard) => self.gateway.list_own_pets().await,
        }
    }

    pub async fn create(&self, pet: &PetRequest) -> petcare_http::Result<Vec<PetResponse>> {
        self.gateway.create_pet(pet).await?;
        self.refresh().await
    }

    pub async fn update(&self, id: PetId, pet: &PetRequest) -> petcare_http::Result<Vec<PetResponse>> {
        self.gateway.update_pet(id, pet).await?;
        self.refresh().await
    }

    pub async fn act(&self, id: PetId, action: PetAction) -> petcare_http::Result<Vec<PetResponse>> {
        self.gateway.perform_pet_action(id, action).await?;
        self.refresh().await
    }

    pub async fn delete(&self, id: PetId) -> petcare_http::Result<Vec<PetResponse>> {
        self.gateway.delete_pet(id).await?;
        self.refresh().await
    }
}

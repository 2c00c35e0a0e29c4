//! Session lifecycle: bootstrap from storage, login hand-off, explicit and forced logout.
//!
//! ```text
//! Bootstrapping ──read ok──────────▶ Authenticated
//!       │                                 │  ▲
//!       └──none / corrupt──▶ Anonymous ◀──┘  │ set_user
//!                               └────────────┘
//! ```
//!
//! The manager never blocks rendering while bootstrapping. Front ends branch on
//! [`SessionSnapshot::is_loading`].

mod navigator;

pub use navigator::{Navigator, NoopNavigator};

use crate::error::StoreError;
use crate::roles::{self, CapabilityTier};
use crate::store::CredentialStore;
use parking_lot::{Mutex, RwLock};
use petcare_http::{Credential, SessionHooks, UserIdentity};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Who is signed in. Never partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated {
        identity: UserIdentity,
        credential: Credential,
    },
}

impl Session {
    pub fn identity(&self) -> Option<&UserIdentity> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { identity, .. } => Some(identity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Bootstrapping,
    Ready(Session),
}

/// What a front end renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub identity: Option<UserIdentity>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The user asked to sign out.
    Explicit,
    /// A request came back 401.
    Unauthorized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(UserIdentity),
    SignedOut(LogoutReason),
}

pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    state: RwLock<SessionState>,
    // held across a store operation and the matching state update
    transition: Mutex<()>,
    bootstrapped: AtomicBool,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            store,
            navigator,
            state: RwLock::new(SessionState::Bootstrapping),
            transition: Mutex::new(()),
            bootstrapped: AtomicBool::new(false),
            events,
        }
    }

    /// Load the persisted session. Runs once; later calls return the current snapshot.
    pub fn bootstrap(&self) -> SessionSnapshot {
        let _transition = self.transition.lock();
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return self.snapshot();
        }

        let session = match self.store.read() {
            Ok(Some((identity, credential))) => {
                info!("Restored session for {}", identity.username);
                Session::Authenticated {
                    identity,
                    credential,
                }
            }
            Ok(None) => Session::Anonymous,
            Err(e) => {
                warn!("Error loading session, clearing storage: {}", e);
                if let Err(e) = self.store.clear() {
                    error!("Failed to clear corrupt session: {}", e);
                }
                Session::Anonymous
            }
        };

        *self.state.write() = SessionState::Ready(session);
        self.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        match &*self.state.read() {
            SessionState::Bootstrapping => SessionSnapshot {
                identity: None,
                is_loading: true,
            },
            SessionState::Ready(session) => SessionSnapshot {
                identity: session.identity().cloned(),
                is_loading: false,
            },
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    /// Current session; `Anonymous` while still bootstrapping.
    pub fn session(&self) -> Session {
        match &*self.state.read() {
            SessionState::Bootstrapping => Session::Anonymous,
            SessionState::Ready(session) => session.clone(),
        }
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.session().identity().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.session(), Session::Authenticated { .. })
    }

    /// Tier of the signed-in user, `None` when anonymous.
    pub fn tier(&self) -> Option<CapabilityTier> {
        self.identity().map(|identity| roles::resolve(&identity.roles))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Store first, then memory. On failure nothing changes.
    pub fn set_user(&self, identity: UserIdentity, credential: Credential) -> Result<(), StoreError> {
        {
            let _transition = self.transition.lock();
            self.store.write(&identity, &credential)?;
            self.bootstrapped.store(true, Ordering::SeqCst);
            *self.state.write() = SessionState::Ready(Session::Authenticated {
                identity: identity.clone(),
                credential,
            });
        }
        info!("Session started for {}", identity.username);
        let _ = self.events.send(SessionEvent::SignedIn(identity));
        Ok(())
    }

    /// User-initiated sign out. Safe to call when already signed out.
    pub fn logout(&self) {
        self.end_session(LogoutReason::Explicit);
    }

    /// Sign out because the server rejected the credential.
    pub fn force_logout(&self) {
        self.end_session(LogoutReason::Unauthorized);
    }

    fn end_session(&self, reason: LogoutReason) {
        let was_signed_in = {
            let _transition = self.transition.lock();
            if let Err(e) = self.store.clear() {
                error!("Failed to clear stored session: {}", e);
            }
            let mut state = self.state.write();
            let was = matches!(
                &*state,
                SessionState::Ready(Session::Authenticated { .. })
            );
            *state = SessionState::Ready(Session::Anonymous);
            self.bootstrapped.store(true, Ordering::SeqCst);
            was
        };

        if was_signed_in {
            info!("Session ended ({:?})", reason);
            let _ = self.events.send(SessionEvent::SignedOut(reason));
        }
        self.navigator.to_entry();
    }
}

impl SessionHooks for SessionManager {
    fn credential(&self) -> Option<Credential> {
        match self.store.read() {
            Ok(pair) => pair.map(|(_, credential)| credential),
            Err(e) => {
                warn!("Stored credential unreadable: {}", e);
                None
            }
        }
    }

    fn signed_in(&self, identity: UserIdentity, credential: Credential) -> Result<(), String> {
        self.set_user(identity, credential).map_err(|e| e.to_string())
    }

    fn unauthorized(&self) {
        self.force_logout();
    }
}

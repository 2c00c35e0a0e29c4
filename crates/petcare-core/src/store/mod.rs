//! Persisted identity and bearer credential.
//!
//! Identity and token live under separate keys so a token can be rotated
//! without rewriting the identity. A pair is only ever handed out whole.

mod kv;

pub use kv::{FileKv, KeyValueStore, MemoryKv};

use crate::error::{Result, StoreError};
use parking_lot::Mutex;
use petcare_http::{Credential, UserIdentity};
use tracing::warn;

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";

pub trait CredentialStore: Send + Sync + 'static {
    /// The stored pair, `Ok(None)` when absent or half-present (and cleaned up),
    /// `Err` when present but unreadable.
    fn read(&self) -> Result<Option<(UserIdentity, Credential)>>;
    fn write(&self, identity: &UserIdentity, credential: &Credential) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// [`CredentialStore`] over any [`KeyValueStore`].
pub struct KvCredentialStore<B: KeyValueStore> {
    backend: B,
    // serializes read/write/clear so no caller sees a torn pair
    lock: Mutex<()>,
}

impl<B: KeyValueStore> KvCredentialStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn clear_locked(&self) -> Result<()> {
        self.backend.remove(USER_KEY)?;
        self.backend.remove(TOKEN_KEY)?;
        Ok(())
    }
}

impl KvCredentialStore<MemoryKv> {
    pub fn in_memory() -> Self {
        Self::new(MemoryKv::new())
    }
}

impl<B: KeyValueStore> CredentialStore for KvCredentialStore<B> {
    fn read(&self) -> Result<Option<(UserIdentity, Credential)>> {
        let _guard = self.lock.lock();
        let user = self.backend.get(USER_KEY)?;
        let token = self.backend.get(TOKEN_KEY)?;

        match (user, token) {
            (None, None) => Ok(None),
            (Some(user), Some(token)) => {
                let identity: UserIdentity = serde_json::from_str(&user)?;
                let credential = Credential::parse(&token)
                    .ok_or_else(|| StoreError::Corrupt("empty token".to_string()))?;
                Ok(Some((identity, credential)))
            }
            _ => {
                warn!("Found half a stored session, clearing it");
                self.clear_locked()?;
                Ok(None)
            }
        }
    }

    fn write(&self, identity: &UserIdentity, credential: &Credential) -> Result<()> {
        let _guard = self.lock.lock();
        let user = serde_json::to_string(identity)?;
        self.backend.set(USER_KEY, &user)?;
        if let Err(e) = self.backend.set(TOKEN_KEY, credential.as_str()) {
            // never leave a fresh identity next to a stale token
            let _ = self.clear_locked();
            return Err(e);
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock();
        self.clear_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> UserIdentity {
        UserIdentity::new("alice", ["ROLE_USER"])
    }

    #[test]
    fn test_write_then_read() {
        let store = KvCredentialStore::in_memory();
        let cred = Credential::parse("t1").unwrap();
        store.write(&identity(), &cred).unwrap();

        let (id, c) = store.read().unwrap().unwrap();
        assert_eq!(id, identity());
        assert_eq!(c, cred);
        assert_eq!(
            store.backend().get(TOKEN_KEY).unwrap().as_deref(),
            Some("t1")
        );
    }

    #[test]
    fn test_token_only_is_cleared() {
        let store = KvCredentialStore::in_memory();
        store.backend().set(TOKEN_KEY, "t1").unwrap();
        assert!(store.read().unwrap().is_none());
        assert!(store.backend().is_empty());
    }

    #[test]
    fn test_user_only_is_cleared() {
        let store = KvCredentialStore::in_memory();
        store
            .backend()
            .set(USER_KEY, r#"{"username":"a","roles":[]}"#)
            .unwrap();
        assert!(store.read().unwrap().is_none());
        assert!(store.backend().is_empty());
    }

    #[test]
    fn test_quoted_token_is_unwrapped() {
        let store = KvCredentialStore::in_memory();
        store
            .backend()
            .set(USER_KEY, r#"{"username":"a","roles":["ROLE_USER"]}"#)
            .unwrap();
        store.backend().set(TOKEN_KEY, "\"t1\"").unwrap();
        let (_, cred) = store.read().unwrap().unwrap();
        assert_eq!(cred.as_str(), "t1");
    }

    #[test]
    fn test_malformed_identity_is_an_error() {
        let store = KvCredentialStore::in_memory();
        store.backend().set(USER_KEY, "{not json").unwrap();
        store.backend().set(TOKEN_KEY, "t1").unwrap();
        let err = store.read().unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = KvCredentialStore::in_memory();
        store
            .write(&identity(), &Credential::parse("t1").unwrap())
            .unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.read().unwrap().is_none());
    }
}

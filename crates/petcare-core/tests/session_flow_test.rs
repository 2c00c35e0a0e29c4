//! Session + gateway working together against a scripted server.

use async_trait::async_trait;
use petcare_core::store::{KeyValueStore, TOKEN_KEY, USER_KEY};
use petcare_core::{
    CapabilityTier, CredentialStore, Dashboard, FileKv, KvCredentialStore, MemoryKv, Navigator,
    Session, SessionManager,
};
use petcare_http::types::{ApiRequest, ApiResponse};
use petcare_http::{
    ClientConfig, Credential, ErrorKind, GatewayError, PetAction, PetGateway, PetNetwork,
    PetRequest, UserIdentity,
};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ScriptedServer {
    replies: Mutex<VecDeque<ApiResponse>>,
    seen: Mutex<Vec<(String, ApiRequest)>>,
}

impl ScriptedServer {
    fn json(&self, status: u16, body: serde_json::Value) {
        self.replies
            .lock()
            .unwrap()
            .push_back(ApiResponse::json(status, &body));
    }

    fn empty(&self, status: u16) {
        self.replies
            .lock()
            .unwrap()
            .push_back(ApiResponse::new(status, ""));
    }

    fn requests(&self) -> Vec<(String, ApiRequest)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl PetNetwork for ScriptedServer {
    async fn fetch(&self, url: &str, request: ApiRequest) -> petcare_http::Result<ApiResponse> {
        self.seen.lock().unwrap().push((url.to_string(), request));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GatewayError::Transport("connection refused".into()))
    }
}

#[derive(Default)]
struct CountingNavigator(AtomicUsize);

impl Navigator for CountingNavigator {
    fn to_entry(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    server: Arc<ScriptedServer>,
    store: Arc<KvCredentialStore<MemoryKv>>,
    nav: Arc<CountingNavigator>,
    dashboard: Dashboard,
}

fn harness() -> Harness {
    let server = Arc::new(ScriptedServer::default());
    let store = Arc::new(KvCredentialStore::in_memory());
    let nav = Arc::new(CountingNavigator::default());
    let session = Arc::new(SessionManager::new(store.clone(), nav.clone()));
    session.bootstrap();
    let gateway = PetGateway::with_network(
        server.clone(),
        ClientConfig::with_base_url("http://pets.test/api"),
        session.clone(),
    );
    Harness {
        server,
        store,
        nav,
        dashboard: Dashboard::new(gateway, session),
    }
}

fn pet(id: i64, owner: &str) -> serde_json::Value {
    json!({
        "id": id, "name": "Rex", "species": "dog",
        "hunger": 10, "happiness": 70, "energy": 50, "health": 95,
        "ownerUsername": owner
    })
}

fn sign_in_as(h: &Harness, username: &str, roles: &[&str], token: &str) {
    h.dashboard
        .session()
        .set_user(
            UserIdentity::new(username, roles.iter().copied()),
            Credential::parse(token).unwrap(),
        )
        .unwrap();
}

#[tokio::test]
async fn test_root_login_scenario() {
    let h = harness();
    h.server.json(
        200,
        json!({"accessToken": "t1", "username": "root", "roles": ["ROLE_ADMIN"]}),
    );
    h.server.json(200, json!([pet(1, "alice"), pet(2, "bob")]));

    h.dashboard.sign_in("root", "pw").await.unwrap();

    let session = h.dashboard.session();
    match session.session() {
        Session::Authenticated {
            identity,
            credential,
        } => {
            assert_eq!(identity, UserIdentity::new("root", ["ROLE_ADMIN"]));
            assert_eq!(credential.as_str(), "t1");
        }
        other => panic!("expected authenticated, got {:?}", other),
    }
    assert_eq!(session.tier(), Some(CapabilityTier::Administrative));

    let pets = h.dashboard.refresh().await.unwrap();
    assert_eq!(pets.len(), 2);
    let (url, req) = h.server.requests().pop().unwrap();
    assert_eq!(url, "http://pets.test/api/pets/all");
    assert_eq!(req.header("Authorization"), Some("Bearer t1"));
}

#[tokio::test]
async fn test_standard_user_refresh_lists_own_pets() {
    let h = harness();
    sign_in_as(&h, "alice", &["ROLE_USER"], "t2");
    h.server.json(200, json!([pet(1, "alice")]));

    h.dashboard.refresh().await.unwrap();
    let (url, _) = h.server.requests().pop().unwrap();
    assert_eq!(url, "http://pets.test/api/pets");
}

#[tokio::test]
async fn test_anonymous_refresh_makes_no_request() {
    let h = harness();
    assert!(h.dashboard.refresh().await.unwrap().is_empty());
    assert!(h.server.requests().is_empty());
}

#[tokio::test]
async fn test_sign_up_registers_then_logs_in() {
    let h = harness();
    h.server.json(200, json!({"message": "User registered successfully"}));
    h.server.json(200, json!({"accessToken": "t3"}));

    let identity = h.dashboard.sign_up("carol", "pw").await.unwrap();
    assert_eq!(identity.username, "carol");
    assert!(identity.has_role("ROLE_USER"));

    let paths: Vec<String> = h.server.requests().into_iter().map(|(u, _)| u).collect();
    assert_eq!(
        paths,
        vec![
            "http://pets.test/api/auth/register",
            "http://pets.test/api/auth/login"
        ]
    );
    assert_eq!(
        h.store.backend().get(TOKEN_KEY).unwrap().as_deref(),
        Some("t3")
    );
}

#[tokio::test]
async fn test_failed_registration_does_not_log_in() {
    let h = harness();
    h.server.json(400, json!({"message": "Username is already taken"}));

    let err = h.dashboard.sign_up("carol", "pw").await.unwrap_err();
    assert_eq!(err.message(), "Username is already taken");
    assert_eq!(h.server.requests().len(), 1);
    assert!(!h.dashboard.session().is_authenticated());
}

#[tokio::test]
async fn test_401_on_every_operation_forces_logout() {
    let h = harness();
    let pet_req = PetRequest::new("Rex", "dog");

    for step in 0..6 {
        sign_in_as(&h, "alice", &["ROLE_USER"], "t1");
        let navigations = h.nav.0.load(Ordering::SeqCst);
        h.server.json(401, json!({"message": "Token expired"}));

        let result = match step {
            0 => h.dashboard.refresh().await.map(|_| ()),
            1 => h.dashboard.gateway().list_all_pets().await.map(|_| ()),
            2 => h.dashboard.create(&pet_req).await.map(|_| ()),
            3 => h.dashboard.update(1, &pet_req).await.map(|_| ()),
            4 => h.dashboard.act(1, PetAction::Play).await.map(|_| ()),
            _ => h.dashboard.delete(1).await.map(|_| ()),
        };

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthorizationExpired, "step {}", step);
        assert_eq!(h.dashboard.session().session(), Session::Anonymous);
        assert!(h.store.backend().get(USER_KEY).unwrap().is_none());
        assert!(h.store.backend().get(TOKEN_KEY).unwrap().is_none());
        assert_eq!(h.nav.0.load(Ordering::SeqCst), navigations + 1);
    }
}

#[tokio::test]
async fn test_delete_refreshes_exactly_once() {
    let h = harness();
    sign_in_as(&h, "alice", &["ROLE_USER"], "t1");
    h.server.empty(204);
    h.server.json(200, json!([]));

    let pets = h.dashboard.delete(7).await.unwrap();
    assert!(pets.is_empty());

    let requests = h.server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].1.method.as_str(), "DELETE");
    let refreshes = requests
        .iter()
        .filter(|(url, req)| url.ends_with("/pets") && req.method.as_str() == "GET")
        .count();
    assert_eq!(refreshes, 1);
}

#[tokio::test]
async fn test_forbidden_delete_propagates_without_refresh() {
    let h = harness();
    sign_in_as(&h, "alice", &["ROLE_USER"], "t1");
    h.server.json(403, json!({"message": "You do not own this pet"}));

    let err = h.dashboard.delete(7).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerError);
    assert_eq!(err.message(), "You do not own this pet");
    assert_eq!(h.server.requests().len(), 1);
    assert!(h.dashboard.session().is_authenticated());
}

#[tokio::test]
async fn test_unreachable_server_lists_empty() {
    let h = harness();
    sign_in_as(&h, "alice", &["ROLE_USER"], "t1");

    assert!(h.dashboard.refresh().await.unwrap().is_empty());
    assert!(h.dashboard.session().is_authenticated());
}

#[tokio::test]
async fn test_session_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let nav = Arc::new(CountingNavigator::default());

    {
        let store = Arc::new(KvCredentialStore::new(FileKv::new(dir.path())));
        let session = SessionManager::new(store, nav.clone());
        session.bootstrap();
        session
            .set_user(
                UserIdentity::new("alice", ["ROLE_USER"]),
                Credential::parse("t1").unwrap(),
            )
            .unwrap();
    }

    let store = Arc::new(KvCredentialStore::new(FileKv::new(dir.path())));
    let session = SessionManager::new(store.clone(), nav.clone());
    let snap = session.bootstrap();
    assert_eq!(snap.identity.unwrap().username, "alice");

    session.logout();
    assert!(store.read().unwrap().is_none());
    assert!(!dir.path().join(USER_KEY).exists());
    assert!(!dir.path().join(TOKEN_KEY).exists());
}

#[tokio::test]
async fn test_sign_up_with_json_string_body_still_logs_in() {
    let h = harness();
    h.server.json(200, json!("User registered successfully"));
    h.server.json(200, json!({"accessToken": "t4", "username": "dave"}));

    let identity = h.dashboard.sign_up("dave", "pw").await.unwrap();
    assert_eq!(identity.username, "dave");
    assert_eq!(h.server.requests().len(), 2);
    assert!(h.dashboard.session().is_authenticated());
}

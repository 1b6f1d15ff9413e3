//! Shared fixtures: sessions, a scripted transport, and a wired client.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::http::{ApiClient, ApiRequest, RawResponse, Transport, TransportError};
use crate::nav::MemoryNavigator;
use crate::session::{MemoryStore, Role, Session, SessionStore, SessionUser};

pub const BASE_URL: &str = "http://api.test";

pub fn patient_session() -> Session {
    Session {
        token: "tok-paciente".into(),
        user: SessionUser {
            id: Some(12),
            name: "Ana Torres".into(),
            email: "ana@example.com".into(),
            role: Role::Paciente,
        },
    }
}

pub fn admin_session() -> Session {
    Session {
        token: "tok-admin".into(),
        user: SessionUser {
            id: Some(1),
            name: "Admin".into(),
            email: "admin@clinica.pe".into(),
            role: Role::Admin,
        },
    }
}

pub fn store_with(session: &Session) -> (Arc<MemoryStore>, SessionStore) {
    let kv = Arc::new(MemoryStore::default());
    let store = SessionStore::new(kv.clone());
    store.save(session).expect("save session");
    (kv, store)
}

// =============================================================================
// MOCK TRANSPORT
// =============================================================================

/// Replays scripted responses in order and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn push(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse { status, body: body.to_string() }));
    }

    pub fn push_json(&self, status: u16, body: &Value) {
        self.push(status, &body.to_string());
    }

    pub fn push_err(&self, err: TransportError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests().pop().expect("no request was sent")
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".into())))
    }
}

// =============================================================================
// WIRED CLIENT
// =============================================================================

pub struct TestClient {
    pub api: ApiClient,
    pub transport: Arc<MockTransport>,
    pub nav: Arc<MemoryNavigator>,
    pub kv: Arc<MemoryStore>,
}

impl TestClient {
    pub fn store(&self) -> &SessionStore {
        self.api.session()
    }
}

/// Client whose navigator starts at `path`, logged in as `session` if given.
pub fn client_at(path: &str, session: Option<&Session>) -> TestClient {
    let (kv, store) = match session {
        Some(session) => store_with(session),
        None => {
            let kv = Arc::new(MemoryStore::default());
            let store = SessionStore::new(kv.clone());
            (kv, store)
        }
    };
    let transport = Arc::new(MockTransport::default());
    let nav = Arc::new(MemoryNavigator::at(path));
    let api = ApiClient::with_transport(BASE_URL, transport.clone(), store, nav.clone());
    TestClient { api, transport, nav, kv }
}

/// Logged-in patient on the given page.
pub fn patient_client_at(path: &str) -> TestClient {
    client_at(path, Some(&patient_session()))
}

/// Logged-in admin on the given page.
pub fn admin_client_at(path: &str) -> TestClient {
    client_at(path, Some(&admin_session()))
}

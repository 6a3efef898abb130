//! Shared fakes for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use crate::error::AuthError;
use crate::net::api::{AuthApi, FetchError, Introspection, ResourceApi, ResourceRequest};
use crate::net::types::{LoginRequest, LoginResponse};
use crate::routes::{Navigator, Route};
use crate::session::SessionStore;
use crate::storage::{CookieJar, MemoryStorage, REFRESH_COOKIE, RefreshCredential, SessionStorage};

/// Build an unsigned compact JWT carrying the given claims.
pub fn make_token(role: Option<&str>, exp: Option<i64>) -> String {
    let mut payload = serde_json::Map::new();
    payload.insert("id".into(), Value::from(7));
    if let Some(role) = role {
        payload.insert("role".into(), Value::from(role));
    }
    if let Some(exp) = exp {
        payload.insert("exp".into(), Value::from(exp));
    }
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(Value::Object(payload).to_string());
    format!("{header}.{body}.signature")
}

/// In-memory session plus handles to both backing maps.
pub struct MemorySession {
    pub store: SessionStore,
    pub local: Arc<MemoryStorage>,
    pub cookies: Arc<MemoryStorage>,
}

pub fn memory_session() -> MemorySession {
    let local = Arc::new(MemoryStorage::new());
    let cookies = Arc::new(MemoryStorage::new());
    let store = SessionStore::new(local.clone(), Arc::new(CookieJar::new(cookies.clone())));
    MemorySession { store, local, cookies }
}

impl MemorySession {
    pub fn with_access(self, token: &str) -> Self {
        self.local.set(crate::storage::ACCESS_TOKEN_KEY, token);
        self
    }

    pub fn with_refresh(self, token: &str) -> Self {
        self.cookies.set(REFRESH_COOKIE, token);
        self
    }
}

// =============================================================================
// FakeAuthApi
// =============================================================================

/// Scripted auth endpoints. Empty scripts answer `Valid` / `NoCredential`.
#[derive(Default)]
pub struct FakeAuthApi {
    pub introspections: Mutex<VecDeque<Result<Introspection, AuthError>>>,
    pub refreshes: Mutex<VecDeque<Result<String, AuthError>>>,
    pub login_response: Mutex<Option<Result<LoginResponse, AuthError>>>,
    pub logout_result: Mutex<Option<AuthError>>,
    pub check_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub bearers: Mutex<Vec<String>>,
    pub refresh_credentials: Mutex<Vec<RefreshCredential>>,
}

impl FakeAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn introspect(self, result: Result<Introspection, AuthError>) -> Self {
        self.introspections.lock().unwrap().push_back(result);
        self
    }

    pub fn refresh(self, result: Result<&str, AuthError>) -> Self {
        self.refreshes.lock().unwrap().push_back(result.map(str::to_owned));
        self
    }

    pub fn login(self, result: Result<LoginResponse, AuthError>) -> Self {
        *self.login_response.lock().unwrap() = Some(result);
        self
    }

    pub fn checks(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    pub fn refreshes_made(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AuthApi for FakeAuthApi {
    async fn check_token(&self, access_token: &str) -> Result<Introspection, AuthError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        self.bearers.lock().unwrap().push(access_token.to_owned());
        self.introspections
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Introspection::Valid))
    }

    async fn refresh(&self, credential: &RefreshCredential) -> Result<String, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_credentials.lock().unwrap().push(credential.clone());
        self.refreshes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AuthError::RefreshFailure { status: 401 }))
    }

    async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        self.login_response
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(AuthError::LoginRejected("Неверный Email или пароль".into())))
    }

    async fn logout(&self, _credential: Option<&RefreshCredential>) -> Result<(), AuthError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        match self.logout_result.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// =============================================================================
// FakeResourceApi
// =============================================================================

/// Resource endpoints keyed by path; unknown paths answer 404.
#[derive(Default)]
pub struct FakeResourceApi {
    pub responses: Mutex<HashMap<String, Result<Value, FetchError>>>,
    pub requests: Mutex<Vec<ResourceRequest>>,
}

impl FakeResourceApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, path: &str, result: Result<Value, FetchError>) -> Self {
        self.responses.lock().unwrap().insert(path.to_owned(), result);
        self
    }

    pub fn requests(&self) -> Vec<ResourceRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ResourceApi for FakeResourceApi {
    async fn send(&self, request: ResourceRequest) -> Result<Value, FetchError> {
        let result = self
            .responses
            .lock()
            .unwrap()
            .get(&request.path)
            .cloned()
            .unwrap_or(Err(FetchError::Status { status: 404, message: "not found".into() }));
        self.requests.lock().unwrap().push(request);
        result
    }
}

// =============================================================================
// RecordingNavigator
// =============================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    pub routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

//! In-process mock backend for exercising the client over real HTTP
//!
//! Binds `127.0.0.1:0`, records every request it receives and answers with
//! whatever the test's responder returns for it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use recruit_auth::TokenStore;
use recruit_session::{AuthSession, NavigationLog};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::client::{ClientConfig, HttpClient};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path relative to the API base, e.g. `/jobs/`
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

impl Recorded {
    pub fn bearer(&self) -> Option<&str> {
        self.authorization
            .as_deref()
            .and_then(|h| h.strip_prefix("Bearer "))
    }
}

type Responder = dyn Fn(&Recorded) -> (StatusCode, Value) + Send + Sync;

#[derive(Clone)]
struct MockState {
    log: Arc<Mutex<Vec<Recorded>>>,
    responder: Arc<Responder>,
}

pub struct MockBackend {
    pub base_url: String,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    pub async fn start(
        responder: impl Fn(&Recorded) -> (StatusCode, Value) + Send + Sync + 'static,
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            log: log.clone(),
            responder: Arc::new(responder),
        };

        tokio::spawn(async move {
            let app = axum::Router::new().fallback(handle).with_state(state);
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            log,
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    /// `"METHOD /path"` for every call, in arrival order.
    pub fn routes(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| format!("{} {}", c.method, c.path))
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }
}

async fn handle(State(state): State<MockState>, request: Request) -> impl IntoResponse {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, 1024 * 1024)
        .await
        .unwrap_or_default();
    let recorded = Recorded {
        method: parts.method.to_string(),
        path: parts
            .uri
            .path()
            .trim_start_matches("/api/v1")
            .to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    };
    state.log.lock().unwrap().push(recorded.clone());
    let (status, value) = (state.responder)(&recorded);
    (status, Json(value))
}

/// Client wired to a mock backend with fresh in-memory session state.
pub struct Harness {
    pub client: HttpClient,
    pub tokens: Arc<TokenStore>,
    pub session: Arc<AuthSession>,
    pub navigator: Arc<NavigationLog>,
    pub backend: MockBackend,
}

pub async fn harness(
    responder: impl Fn(&Recorded) -> (StatusCode, Value) + Send + Sync + 'static,
) -> Harness {
    let backend = MockBackend::start(responder).await;
    let config = ClientConfig {
        base_url: backend.base_url.clone(),
        timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    };
    harness_with(backend, config)
}

pub fn harness_with(backend: MockBackend, config: ClientConfig) -> Harness {
    let tokens = Arc::new(TokenStore::memory());
    let session = Arc::new(AuthSession::new());
    let navigator = Arc::new(NavigationLog::new());
    let client = HttpClient::new(&config, tokens.clone(), session.clone(), navigator.clone())
        .expect("client builds");
    Harness {
        client,
        tokens,
        session,
        navigator,
        backend,
    }
}

/// A `/users/me/`-shaped user payload.
pub fn user_json(role: &str) -> Value {
    json!({
        "id": "3f2504e0-4f89-41d3-9a0c-0305e82c3301",
        "email": format!("{}@example.com", role.to_lowercase()),
        "first_name": "Test",
        "last_name": role,
        "full_name": format!("Test {role}"),
        "role": role,
        "status": "ACTIVE",
        "email_verified": true,
        "is_active": true
    })
}

pub fn unauthorized() -> (StatusCode, Value) {
    (
        StatusCode::UNAUTHORIZED,
        json!({"detail": "Given token not valid for any token type"}),
    )
}

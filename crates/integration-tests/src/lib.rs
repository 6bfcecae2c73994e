//! Integration tests for Skymates.
//!
//! Every test spawns its own site on an ephemeral port, wired to in-process
//! fakes of the passenger store and the identity provider, and drives it over
//! HTTP with a cookie-keeping client, the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p skymates-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use skymates_web::config::{IdentityConfig, SkymatesConfig};
use skymates_web::state::AppState;

/// Provider session the fake identity provider treats as signed in.
pub const ACTIVE_SESSION: &str = "sess_active";
pub const TEST_USER_ID: &str = "user_2abc";
pub const TEST_FIRST_NAME: &str = "Sita";
pub const TEST_EMAIL: &str = "sita@example.org";
const HOSTED_PAGES_HOST: &str = "accounts.example.org";
pub const SIGN_IN_PAGE: &str = "https://accounts.example.org/sign-in";
pub const SIGN_UP_PAGE: &str = "https://accounts.example.org/sign-up";

// =============================================================================
// Fake passenger store
// =============================================================================

/// What the fake store holds and what it has seen.
#[derive(Debug, Default)]
pub struct StoreState {
    pub passengers: Vec<Value>,
    /// Answer list requests with a 500.
    pub fail_list: bool,
    /// Answer create requests with a 400 carrying these details.
    pub reject_create: Option<String>,
    pub list_calls: usize,
    pub created: Vec<Value>,
    /// `Authorization` headers of create requests, in order.
    pub authorizations: Vec<String>,
}

/// In-process passenger store.
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<StoreState>>,
}

impl FakeStore {
    #[must_use]
    pub fn with_passengers(passengers: Vec<Value>) -> Self {
        let store = Self::default();
        store.lock().passengers = passengers;
        store
    }

    pub fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("store state poisoned")
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/passengers", get(list_passengers).post(create_passenger))
            .with_state(self.clone())
    }
}

async fn list_passengers(State(store): State<FakeStore>) -> Response {
    let mut state = store.lock();
    state.list_calls += 1;
    if state.fail_list {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    Json(Value::Array(state.passengers.clone())).into_response()
}

async fn create_passenger(
    State(store): State<FakeStore>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let mut state = store.lock();
    if let Some(auth) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        state.authorizations.push(auth.to_string());
    }
    if let Some(details) = state.reject_create.clone() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "details": details }))).into_response();
    }

    let id = format!("p{}", state.passengers.len() + 1);
    if let Some(record) = body.as_object_mut() {
        record.insert("id".to_string(), Value::String(id));
    }
    state.created.push(body.clone());
    state.passengers.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

/// A stored record with the fields the board shows.
#[must_use]
pub fn passenger(id: &str, kind: &str, name: &str, date: &str) -> Value {
    json!({
        "id": id,
        "type": kind,
        "name": name,
        "age": 68,
        "date": date,
        "fromCity": "Kathmandu",
        "toCity": "New York",
        "phone": "(714) 485-9360",
        "email": "family@example.org",
        "airlines": "Qatar Airways",
        "comments": ""
    })
}

// =============================================================================
// Fake identity provider
// =============================================================================

/// In-process identity provider backend API.
#[derive(Clone, Default)]
pub struct FakeIdentity {
    revoked: Arc<Mutex<Vec<String>>>,
}

impl FakeIdentity {
    /// Sessions revoked so far.
    #[must_use]
    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().expect("identity state poisoned").clone()
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/sessions/{id}", get(get_session))
            .route("/sessions/{id}/tokens", post(create_token))
            .route("/sessions/{id}/revoke", post(revoke_session))
            .route("/users/{id}", get(get_user))
            .with_state(self.clone())
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "errors": [{ "message": "Resource not found", "code": "resource_not_found" }]
        })),
    )
        .into_response()
}

async fn get_session(Path(id): Path<String>) -> Response {
    if id != ACTIVE_SESSION {
        return not_found();
    }
    Json(json!({ "id": id, "user_id": TEST_USER_ID, "status": "active" })).into_response()
}

async fn create_token(Path(id): Path<String>) -> Response {
    if id != ACTIVE_SESSION {
        return not_found();
    }
    Json(json!({ "object": "token", "jwt": format!("jwt-for-{id}") })).into_response()
}

async fn revoke_session(State(identity): State<FakeIdentity>, Path(id): Path<String>) -> Response {
    identity
        .revoked
        .lock()
        .expect("identity state poisoned")
        .push(id.clone());
    Json(json!({ "id": id, "status": "revoked" })).into_response()
}

async fn get_user(Path(id): Path<String>) -> Response {
    if id != TEST_USER_ID {
        return not_found();
    }
    Json(json!({
        "id": id,
        "first_name": TEST_FIRST_NAME,
        "username": "sita",
        "primary_email_address_id": "idn_1",
        "email_addresses": [
            { "id": "idn_0", "email_address": "old@example.org" },
            { "id": "idn_1", "email_address": TEST_EMAIL }
        ]
    }))
    .into_response()
}

// =============================================================================
// Site under test
// =============================================================================

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test server error");
    });
    addr
}

/// A running site plus its fakes and a browser-like client.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: FakeStore,
    pub identity: FakeIdentity,
}

impl TestApp {
    /// Start a site backed by `store`.
    pub async fn spawn(store: FakeStore) -> Self {
        let identity = FakeIdentity::default();
        let store_addr = serve(store.router()).await;
        let identity_addr = serve(identity.router()).await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind site listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let base_url = format!("http://{addr}");

        let config = SkymatesConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: base_url.clone(),
            store_url: format!("http://{store_addr}"),
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../web/static")),
            identity: IdentityConfig {
                api_url: format!("http://{identity_addr}"),
                secret_key: SecretString::from("sk_test_9fK2qLm7XvB3nR8tWc1Y"),
                sign_in_url: SIGN_IN_PAGE.to_string(),
                sign_up_url: SIGN_UP_PAGE.to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let app = skymates_web::app(AppState::new(config));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Site server error");
        });

        let client = browser();

        Self {
            base_url,
            client,
            store,
            identity,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a page (following redirects) and return its body.
    pub async fn get_page(&self, path: &str) -> String {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        assert!(
            response.status().is_success(),
            "GET {path} returned {}",
            response.status()
        );
        response.text().await.expect("Failed to read body")
    }

    /// POST a form and return the body of the page it redirects to.
    pub async fn post_form<T>(&self, path: &str, form: &T) -> String
    where
        T: serde::Serialize + ?Sized,
    {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Request failed");
        assert!(
            response.status().is_success(),
            "POST {path} returned {}",
            response.status()
        );
        response.text().await.expect("Failed to read body")
    }

    /// POST a button-only form and return the page it redirects to.
    pub async fn click(&self, path: &str) -> String {
        let response = self
            .client
            .post(self.url(path))
            .send()
            .await
            .expect("Request failed");
        assert!(
            response.status().is_success(),
            "POST {path} returned {}",
            response.status()
        );
        response.text().await.expect("Failed to read body")
    }

    /// Start sign-in and return the callback URL the hosted page would send
    /// this browser back to, before the provider adds its `session_id`.
    pub async fn start_sign_in(&self) -> String {
        let response = self
            .client
            .get(self.url("/auth/sign-in"))
            .send()
            .await
            .expect("Request failed");
        assert!(response.status().is_redirection());

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("Location header");
        let hosted = reqwest::Url::parse(location).expect("Hosted page URL");
        hosted
            .query_pairs()
            .find(|(key, _)| key == "redirect_url")
            .map(|(_, value)| value.into_owned())
            .expect("redirect_url parameter")
    }

    /// Sign in through the hosted page with an active session.
    pub async fn sign_in(&self) -> String {
        let callback = self.start_sign_in().await;
        self.get_page(&self.path_of(&format!("{callback}&session_id={ACTIVE_SESSION}")))
            .await
    }

    /// The site-relative part of an absolute URL on this site.
    #[must_use]
    pub fn path_of(&self, url: &str) -> String {
        url.strip_prefix(&self.base_url)
            .expect("URL on this site")
            .to_string()
    }
}

/// A cookie-keeping client that stops at the identity provider's hosted
/// pages, like a browser whose user has not signed in there yet.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::custom(|attempt| {
            if attempt.url().host_str() == Some(HOSTED_PAGES_HOST) {
                attempt.stop()
            } else {
                attempt.follow()
            }
        }))
        .build()
        .expect("Failed to create HTTP client")
}

/// A complete, valid submission form.
#[must_use]
pub fn full_form(name: &str) -> Vec<(&'static str, String)> {
    vec![
        ("type", "needFriend".to_string()),
        ("name", name.to_string()),
        ("age", "74".to_string()),
        ("date", "2024-07-15".to_string()),
        ("fromCity", "Kathmandu".to_string()),
        ("toCity", "Dallas".to_string()),
        ("airlines", "Emirates".to_string()),
        ("phone", "7144859360".to_string()),
        ("comments", "Wheelchair at Doha".to_string()),
    ]
}

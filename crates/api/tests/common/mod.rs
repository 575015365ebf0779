#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use questline_api::app::build_app;
use jsonwebtoken::{encode, EncodingKey, Header};
use questline_api::auth::jwt::{Claims, JwtConfig};
use questline_api::config::ServerConfig;
use questline_api::state::AppState;
use questline_core::types::{DbId, Points};
use questline_db::ledger::MemoryLedger;
use questline_db::models::shop_item::CreateShopItem;
use questline_db::models::task::{CreateTask, Task};
use questline_db::models::user::CreateUser;

const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        default_task_language: "ru".to_string(),
        db_max_connections: 1,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            leeway_secs: 0,
        },
    }
}

/// The full application router over a fresh in-memory ledger.
///
/// Goes through the same `build_app` as `main.rs`, so tests exercise the
/// production middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery).
pub struct TestApp {
    pub ledger: Arc<MemoryLedger>,
    pub router: Router,
}

pub fn build_test_app() -> TestApp {
    let ledger = Arc::new(MemoryLedger::new());
    let state = AppState::new(ledger.clone(), test_config());
    TestApp {
        ledger,
        router: build_app(state),
    }
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub async fn student(&self, username: &str) -> DbId {
        self.ledger
            .insert_user(CreateUser {
                username: username.to_string(),
                first_name: username.to_string(),
                ..Default::default()
            })
            .await
            .id
    }

    pub async fn admin(&self, username: &str) -> DbId {
        self.ledger
            .insert_user(CreateUser {
                username: username.to_string(),
                role: Some("admin".to_string()),
                ..Default::default()
            })
            .await
            .id
    }

    pub async fn quiz(&self, position: i32, options: &[&str], correct_answer: &str, reward: Points) -> Task {
        self.ledger
            .insert_task(CreateTask {
                title: format!("Quiz {position}"),
                description: "Pick one".to_string(),
                task_type: "quiz".to_string(),
                question: "Which keyword declares a variable?".to_string(),
                options: options.iter().map(|o| o.to_string()).collect(),
                correct_answer: correct_answer.to_string(),
                questions: Vec::new(),
                reward,
                position,
                language: "ru".to_string(),
            })
            .await
    }

    pub async fn item(&self, name: &str, price: Points, stock: i32) -> DbId {
        self.ledger
            .insert_shop_item(CreateShopItem {
                name: name.to_string(),
                description: String::new(),
                price,
                image: String::new(),
                stock,
            })
            .await
            .id
    }
}

/// Sign an access token the way the identity service does.
pub fn token_for(user_id: DbId, role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + 3600,
        iat: Some(now),
        jti: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Send a GET request without credentials.
pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

/// Send a POST request with a JSON body and no credentials.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

/// Send a POST request with a JSON body and a Bearer token.
pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

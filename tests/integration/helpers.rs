//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use postify_api::AppState;
use postify_auth::jwt::JwtEncoder;
use postify_core::config::AppConfig;
use postify_database::DatabasePool;

/// Strong enough for the zxcvbn floor.
pub const PASSWORD: &str = "correct-horse-battery-staple";

/// Configuration shared by every integration test.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.database.connect_timeout_seconds = 2;
    config.database.min_connections = 0;
    config.generation.api_url = "http://127.0.0.1:1/unused".to_string();
    config.generation.timeout_seconds = 2;
    if let Ok(url) = std::env::var("POSTIFY_TEST_DATABASE_URL") {
        config.database.url = url;
    }
    config
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state behind the router
    pub state: AppState,
}

impl TestApp {
    /// App backed by the PostgreSQL at `POSTIFY_TEST_DATABASE_URL`, migrated.
    pub async fn new() -> Self {
        let config = test_config();
        assert!(
            std::env::var("POSTIFY_TEST_DATABASE_URL").is_ok(),
            "POSTIFY_TEST_DATABASE_URL must be set for database tests"
        );

        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        postify_database::migration::run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        Self::with_pool(config, db)
    }

    /// App whose pool never connects. For routes that fail before any query.
    pub fn offline() -> Self {
        Self::offline_with(test_config())
    }

    /// Offline app with a customised configuration.
    pub fn offline_with(config: AppConfig) -> Self {
        let db = DatabasePool::connect_lazy(&config.database).expect("Invalid database URL");
        Self::with_pool(config, db)
    }

    fn with_pool(config: AppConfig, db: DatabasePool) -> Self {
        let state = AppState::new(config, db).expect("Failed to build state");
        let router = postify_api::build_app(state.clone());
        Self { router, state }
    }

    /// A bearer token for an arbitrary user ID, signed with the test secret.
    pub fn token_for(&self, user_id: Uuid, username: &str) -> String {
        JwtEncoder::new(&self.state.config.auth)
            .issue(user_id, username)
            .expect("Failed to issue token")
            .token
    }

    /// Registers a fresh user and returns `(id, username, token)`.
    pub async fn register(&self, prefix: &str) -> (Uuid, String, String) {
        let username = unique(prefix);
        let response = self
            .request(
                "POST",
                "/api/users/register",
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{username}@test.com"),
                    "password": PASSWORD,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Registration failed: {:?}",
            response.body
        );

        let data = &response.body["data"];
        let id = data["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("No id in register response");
        let token = data["token"]
            .as_str()
            .expect("No token in register response")
            .to_string();

        (id, username, token)
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            content_type,
            body,
        }
    }

    /// Serves the app on an ephemeral port.
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server failed");
        });
        addr
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header, if any
    pub content_type: Option<String>,
    /// Parsed JSON body
    pub body: Value,
}

/// `prefix` plus a random suffix, short enough for the username rules.
pub fn unique(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &suffix[..8])
}

/// Polls `check` until it holds or two seconds pass.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

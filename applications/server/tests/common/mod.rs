//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use jukebox_core::{QueueStore, UserId};
use jukebox_server::{build_state, create_router, AppState, ServerConfig};
use jukebox_storage::SqliteQueueStore;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key";

/// Configuration used by every test app
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.scheduler.tick_interval_ms = 10;
    config
}

/// Router over a fresh file-backed database
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<SqliteQueueStore>,
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: ServerConfig) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

        let pool = jukebox_storage::create_pool(&db_url).await.unwrap();
        jukebox_storage::run_migrations(&pool).await.unwrap();

        let store = Arc::new(SqliteQueueStore::new(pool.clone()));
        let state = build_state(Arc::clone(&store) as Arc<dyn QueueStore>, &config);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            store,
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Bearer token for `user`
    pub fn token(&self, user: &str) -> String {
        self.state
            .auth_service
            .create_access_token(&UserId::new(user))
            .unwrap()
    }

    /// Send a request as `user` (anonymous when `None`) and decode the JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user)));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, user: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(user), None).await
    }

    pub async fn post(&self, uri: &str, user: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(user), Some(body)).await
    }

    /// Create a playlist as `owner`, returning its id
    pub async fn create_playlist(&self, owner: &str, body: Value) -> String {
        let (status, json) = self.post("/api/playlists", owner, body).await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["id"].as_str().unwrap().to_string()
    }

    /// Add a track as `user`, returning its id
    pub async fn add_track(&self, playlist: &str, user: &str, title: &str) -> String {
        let (status, json) = self
            .post(
                &format!("/api/playlists/{playlist}/tracks"),
                user,
                serde_json::json!({ "title": title, "artist": "Artist" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["id"].as_str().unwrap().to_string()
    }

    /// Titles in play order
    pub async fn titles(&self, playlist: &str, user: &str) -> Vec<String> {
        let (status, json) = self
            .get(&format!("/api/playlists/{playlist}/tracks"), user)
            .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        json.as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap().to_string())
            .collect()
    }
}

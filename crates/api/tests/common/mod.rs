#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use muebles_core::assets::LocalAssetStore;
use muebles_core::memory::{InMemoryInquiryStore, InMemoryProjectStore, StaticAdminDirectory};
use muebles_core::store::{AdminAccount, ProjectStore};
use tempfile::TempDir;
use tower::ServiceExt;

use muebles_api::auth::identity::IdentityProvider;
use muebles_api::auth::jwt::JwtConfig;
use muebles_api::auth::password::hash_password;
use muebles_api::config::{ServerConfig, StoreBackend};
use muebles_api::gallery::GalleryRegistry;
use muebles_api::router::build_app_router;
use muebles_api::state::AppState;

pub const ADMIN_EMAIL: &str = "taller@example.com";
pub const ADMIN_PASSWORD: &str = "nogal-y-roble-2024";

/// Build a test `ServerConfig` on the memory backend with assets under
/// `asset_dir`.
pub fn test_config(asset_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        database_url: None,
        asset_dir: asset_dir.to_path_buf(),
        asset_base_url: "/assets".to_string(),
        max_upload_bytes: 64 * 1024,
        gallery_session_ttl_secs: 60,
        max_gallery_sessions: 8,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
    }
}

/// A running app plus handles on its state.
///
/// Keeps the asset directory alive for the lifetime of the test.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _asset_dir: TempDir,
}

impl TestApp {
    /// A fresh handle on the router for one request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn asset_dir(&self) -> &Path {
        self._asset_dir.path()
    }
}

/// App over the sample projects.
pub fn build_test_app() -> TestApp {
    build_test_app_with(Arc::new(InMemoryProjectStore::with_sample_projects()))
}

/// Build the full application router with all middleware layers over
/// in-memory stores.
///
/// Uses the same [`build_app_router`] as `main.rs`, so integration tests
/// exercise the production middleware stack.
pub fn build_test_app_with(projects: Arc<dyn ProjectStore>) -> TestApp {
    let asset_dir = tempfile::tempdir().expect("tempdir should be created");
    let config = test_config(asset_dir.path());

    let directory = StaticAdminDirectory::new(vec![AdminAccount {
        id: 1,
        email: ADMIN_EMAIL.to_string(),
        password_hash: hash_password(ADMIN_PASSWORD).expect("hashing should succeed"),
        is_active: true,
    }]);
    let identity = Arc::new(IdentityProvider::new(
        Arc::new(directory),
        config.jwt.clone(),
    ));

    let state = AppState {
        pool: None,
        config: Arc::new(config.clone()),
        projects,
        inquiries: Arc::new(InMemoryInquiryStore::new()),
        assets: Arc::new(LocalAssetStore::new(asset_dir.path(), &config.asset_base_url)),
        identity,
        galleries: Arc::new(GalleryRegistry::new(config.max_gallery_sessions)),
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        _asset_dir: asset_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri, None, None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, None, Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None, None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Sign in as the test admin and return the access token.
pub async fn login(app: &TestApp) -> String {
    let response = post_json(
        app.app(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["data"]["access_token"]
        .as_str()
        .expect("login should return an access token")
        .to_string()
}

/// Ids of a JSON project array, in order.
pub fn ids(projects: &serde_json::Value) -> Vec<i64> {
    projects
        .as_array()
        .expect("expected a project array")
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

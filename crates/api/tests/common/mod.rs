#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use portal_api::auth::jwt::{generate_access_token, JwtConfig};
use portal_api::auth::password::hash_password;
use portal_api::config::{DriveConfig, ServerConfig};
use portal_api::router::build_app_router;
use portal_api::state::AppState;
use portal_core::file_sync::RemoteFileLister;
use portal_core::roles::{ROLE_ADMIN, ROLE_CLIENT};
use portal_core::types::DbId;
use portal_db::models::project::{CreateProject, Project};
use portal_db::models::user::{CreateUser, User};
use portal_db::repositories::{ProjectRepo, RoleRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:3000` as CORS origin (matching the dev default).
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        secure_cookies: false,
        jwt: JwtConfig {
            secret: "test-secret-do-not-use-in-production".to_string(),
            expiry_hours: 1,
        },
        drive: DriveConfig::default(),
    }
}

/// Full application router without a Drive integration.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(pool, None)
}

/// Full application router with `lister` standing in for Google Drive.
pub fn build_test_app_with_drive(pool: PgPool, lister: Arc<dyn RemoteFileLister>) -> Router {
    build_app(pool, Some(lister))
}

fn build_app(pool: PgPool, drive: Option<Arc<dyn RemoteFileLister>>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        drive,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and the given role name.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    role: &str,
    company_id: Option<DbId>,
) -> User {
    let role = RoleRepo::find_by_name(pool, role)
        .await
        .unwrap()
        .expect("role is seeded");
    let input = CreateUser {
        email: email.to_string(),
        name: email.split('@').next().unwrap_or(email).to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role_id: role.id,
        avatar: None,
        company_id,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

pub async fn create_admin(pool: &PgPool) -> User {
    create_user(pool, "admin@example.com", ROLE_ADMIN, None).await
}

pub async fn create_client(pool: &PgPool, email: &str, company_id: Option<DbId>) -> User {
    create_user(pool, email, ROLE_CLIENT, company_id).await
}

/// A bearer token for `user` carrying the given role claim.
pub fn token_with_role(user: &User, role: &str) -> String {
    generate_access_token(user.id, &user.email, role, &test_config().jwt)
        .expect("token generation should succeed")
}

pub fn admin_token(user: &User) -> String {
    token_with_role(user, ROLE_ADMIN)
}

pub fn client_token(user: &User) -> String {
    token_with_role(user, ROLE_CLIENT)
}

/// Insert a project directly, bypassing the API.
pub async fn create_project(
    pool: &PgPool,
    admin: &User,
    client: &User,
    company_id: Option<DbId>,
    drive_folder_id: Option<&str>,
) -> Project {
    let input = CreateProject {
        name: "Brand refresh".to_string(),
        description: Some("Logo and guidelines".to_string()),
        status: None,
        start_date: None,
        end_date: None,
        drive_folder_id: drive_folder_id.map(str::to_string),
        drive_folder_url: None,
        admin_id: admin.id,
        client_id: client.id,
        company_id,
    };
    ProjectRepo::create(pool, &input)
        .await
        .expect("project creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

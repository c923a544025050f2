//! HTTP-level integration tests for Drive file synchronization, using an
//! in-memory lister in place of Google Drive.

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{
    admin_token, body_json, client_token, create_admin, create_client, create_project, get_auth,
    post_auth,
};
use portal_core::error::CoreError;
use portal_core::file_sync::{RemoteFile, RemoteFileLister};
use portal_db::repositories::{ProjectFileRepo, ProjectRepo};
use sqlx::PgPool;

/// Serves a fixed listing and records which folders were requested.
struct StubLister {
    files: Vec<RemoteFile>,
    requested: Mutex<Vec<String>>,
}

impl StubLister {
    fn new(ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            files: ids.iter().map(|id| remote(id)).collect(),
            requested: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl RemoteFileLister for StubLister {
    async fn list_files(&self, folder_id: &str) -> Result<Vec<RemoteFile>, CoreError> {
        self.requested.lock().unwrap().push(folder_id.to_string());
        Ok(self.files.clone())
    }
}

/// Always fails, as an expired credential or quota error would.
struct FailingLister;

#[async_trait]
impl RemoteFileLister for FailingLister {
    async fn list_files(&self, _folder_id: &str) -> Result<Vec<RemoteFile>, CoreError> {
        Err(CoreError::IntegrationFailure("Drive API error (403): quota".into()))
    }
}

fn remote(id: &str) -> RemoteFile {
    RemoteFile {
        id: id.to_string(),
        name: format!("{id}.pdf"),
        mime_type: Some("application/pdf".to_string()),
        size: Some("2048".to_string()),
        web_view_link: Some(format!("https://drive.google.com/file/d/{id}/view")),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sync_is_insert_only_and_idempotent(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let client = create_client(&pool, "client@example.com", None).await;
    let project = create_project(&pool, &admin, &client, None, Some("folder-1")).await;
    ProjectFileRepo::insert_if_absent(
        &pool,
        project.id,
        &portal_core::file_sync::NewSyncedFile {
            name: "A.pdf".to_string(),
            drive_file_id: "A".to_string(),
            drive_file_url: String::new(),
            mime_type: None,
            size_bytes: None,
        },
    )
    .await
    .unwrap();

    let lister = StubLister::new(&["A", "B"]);
    let token = admin_token(&admin);
    let uri = format!("/api/v1/projects/{}/sync-files", project.id);

    let app = common::build_test_app_with_drive(pool.clone(), lister.clone());
    let response = post_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "Sync complete. 1 new file added.");
    assert_eq!(json["data"]["synced_files"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["synced_files"][0]["drive_file_id"], "B");
    assert_eq!(json["data"]["synced_files"][0]["size_bytes"], 2048);
    assert_eq!(json["data"]["total_files"], 2);

    let app = common::build_test_app_with_drive(pool.clone(), lister.clone());
    let response = post_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "Sync complete. No new files.");
    assert!(json["data"]["synced_files"].as_array().unwrap().is_empty());
    assert_eq!(json["data"]["total_files"], 2);

    // The pre-existing row keeps its original metadata.
    let files = ProjectFileRepo::list_by_project(&pool, project.id).await.unwrap();
    let a = files.iter().find(|f| f.drive_file_id == "A").unwrap();
    assert_eq!(a.size_bytes, None);

    assert_eq!(*lister.requested.lock().unwrap(), ["folder-1", "folder-1"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sync_with_empty_listing_changes_nothing(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let client = create_client(&pool, "client@example.com", None).await;
    let project = create_project(&pool, &admin, &client, None, Some("folder-1")).await;

    let app = common::build_test_app_with_drive(pool.clone(), StubLister::new(&[]));
    let uri = format!("/api/v1/projects/{}/sync-files", project.id);
    let response = post_auth(app, &uri, &admin_token(&admin)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_files"], 0);
    assert!(json["data"]["files"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sync_resolves_folder_from_url(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let client = create_client(&pool, "client@example.com", None).await;
    let project = create_project(&pool, &admin, &client, None, None).await;
    sqlx::query("UPDATE projects SET drive_folder_url = $2 WHERE id = $1")
        .bind(project.id)
        .bind("https://drive.google.com/drive/folders/fromUrl42")
        .execute(&pool)
        .await
        .unwrap();

    let lister = StubLister::new(&["X"]);
    let app = common::build_test_app_with_drive(pool.clone(), lister.clone());
    let uri = format!("/api/v1/projects/{}/sync-files", project.id);
    let response = post_auth(app, &uri, &admin_token(&admin)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*lister.requested.lock().unwrap(), ["fromUrl42"]);
    let stored = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(stored.drive_folder_id.as_deref(), Some("fromUrl42"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sync_without_folder_is_400(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let client = create_client(&pool, "client@example.com", None).await;
    let project = create_project(&pool, &admin, &client, None, None).await;

    let app = common::build_test_app_with_drive(pool, StubLister::new(&["A"]));
    let uri = format!("/api/v1/projects/{}/sync-files", project.id);
    let response = post_auth(app, &uri, &admin_token(&admin)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sync_without_integration_is_503(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let client = create_client(&pool, "client@example.com", None).await;
    let project = create_project(&pool, &admin, &client, None, Some("folder-1")).await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/projects/{}/sync-files", project.id);
    let response = post_auth(app, &uri, &admin_token(&admin)).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTEGRATION_NOT_CONFIGURED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sync_remote_failure_is_502_and_inserts_nothing(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let client = create_client(&pool, "client@example.com", None).await;
    let project = create_project(&pool, &admin, &client, None, Some("folder-1")).await;

    let app = common::build_test_app_with_drive(pool.clone(), Arc::new(FailingLister));
    let uri = format!("/api/v1/projects/{}/sync-files", project.id);
    let response = post_auth(app, &uri, &admin_token(&admin)).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTEGRATION_FAILURE");
    assert!(
        !json["error"].as_str().unwrap().contains("quota"),
        "provider details must not leak"
    );
    assert!(ProjectFileRepo::list_by_project(&pool, project.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_sync_keeps_folder_id_unresolved(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let client = create_client(&pool, "client@example.com", None).await;
    let project = create_project(&pool, &admin, &client, None, None).await;
    sqlx::query("UPDATE projects SET drive_folder_url = $2 WHERE id = $1")
        .bind(project.id)
        .bind("https://drive.google.com/drive/folders/fromUrl42")
        .execute(&pool)
        .await
        .unwrap();

    let app = common::build_test_app_with_drive(pool.clone(), Arc::new(FailingLister));
    let uri = format!("/api/v1/projects/{}/sync-files", project.id);
    let response = post_auth(app, &uri, &admin_token(&admin)).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let stored = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(stored.drive_folder_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sync_missing_project_is_404(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let app = common::build_test_app_with_drive(pool, StubLister::new(&[]));
    let response = post_auth(app, "/api/v1/projects/777/sync-files", &admin_token(&admin)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_lists_files_but_cannot_sync(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let client = create_client(&pool, "client@example.com", None).await;
    let project = create_project(&pool, &admin, &client, None, Some("folder-1")).await;
    let token = client_token(&client);

    let app = common::build_test_app_with_drive(pool.clone(), StubLister::new(&["A"]));
    let uri = format!("/api/v1/projects/{}/sync-files", project.id);
    let response = post_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/projects/{}/files", project.id);
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

//! Drive folder to `project_files` reconciliation.
//!
//! Steps:
//! 1. Read the Drive file ids already recorded for the project.
//! 2. List the remote folder. A failure aborts before any insert.
//! 3. Insert one row per remote file whose id is not yet recorded, in
//!    listing order. Each insert commits on its own; the unique
//!    `(project_id, drive_file_id)` constraint absorbs concurrent syncs.
//! 4. Return the refreshed file list, newest first.

use portal_core::file_sync::{plan_new_files, RemoteFileLister};
use portal_core::types::DbId;
use portal_db::models::project_file::ProjectFile;
use portal_db::repositories::ProjectFileRepo;
use sqlx::PgPool;

use crate::error::AppResult;

/// What a reconciliation pass did.
#[derive(Debug)]
pub struct SyncOutcome {
    /// Rows created by this pass.
    pub inserted: Vec<ProjectFile>,
    /// Every file of the project after the pass, newest first.
    pub files: Vec<ProjectFile>,
}

/// Reconcile `project_id`'s files with the remote folder `folder_id`.
pub async fn reconcile(
    pool: &PgPool,
    lister: &dyn RemoteFileLister,
    project_id: DbId,
    folder_id: &str,
) -> AppResult<SyncOutcome> {
    let local_ids = ProjectFileRepo::list_drive_ids(pool, project_id).await?;
    let remote = lister.list_files(folder_id).await?;

    let planned = plan_new_files(local_ids.iter().map(String::as_str), &remote);

    let mut inserted = Vec::with_capacity(planned.len());
    for file in &planned {
        if let Some(row) = ProjectFileRepo::insert_if_absent(pool, project_id, file).await? {
            inserted.push(row);
        }
    }

    let files = ProjectFileRepo::list_by_project(pool, project_id).await?;

    tracing::info!(
        project_id,
        folder_id,
        remote = remote.len(),
        inserted = inserted.len(),
        total = files.len(),
        "Project files reconciled",
    );

    Ok(SyncOutcome { inserted, files })
}

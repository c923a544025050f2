//! Project entity model, DTOs, and visibility scope.

use serde::Serialize;
use sqlx::FromRow;
use portal_core::types::{DbId, Timestamp};

/// A project row from the `projects` table.
///
/// `progress` is derived from the project's steps and has no setter outside
/// [`ProjectRepo::set_progress`](crate::repositories::ProjectRepo::set_progress).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub progress: i32,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub drive_folder_id: Option<String>,
    pub drive_folder_url: Option<String>,
    pub admin_id: DbId,
    pub client_id: DbId,
    pub company_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `NOT_STARTED` if omitted.
    pub status: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub drive_folder_id: Option<String>,
    pub drive_folder_url: Option<String>,
    pub admin_id: DbId,
    pub client_id: DbId,
    pub company_id: Option<DbId>,
}

/// DTO for editing a project.
///
/// `name`, `client_id`, the dates, and `company_id` are replaced as given;
/// the remaining `Option` fields keep their stored value when `None`.
#[derive(Debug, Clone)]
pub struct UpdateProject {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub drive_folder_id: Option<String>,
    pub drive_folder_url: Option<String>,
    pub client_id: DbId,
    pub company_id: Option<DbId>,
}

/// Which projects a caller may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectScope {
    /// Every project (administrators).
    All,
    /// Projects the user is the client of, or that belong to their company.
    VisibleTo {
        user_id: DbId,
        company_id: Option<DbId>,
    },
}

impl ProjectScope {
    /// Whether this scope can read the given project.
    pub fn permits(&self, project: &Project) -> bool {
        match *self {
            ProjectScope::All => true,
            ProjectScope::VisibleTo {
                user_id,
                company_id,
            } => {
                project.client_id == user_id
                    || (company_id.is_some() && project.company_id == company_id)
            }
        }
    }

    /// Bind values for the shared `SCOPE_FILTER` predicate:
    /// `(all_access, user_id, company_id)`.
    pub(crate) fn binds(&self) -> (bool, DbId, Option<DbId>) {
        match *self {
            ProjectScope::All => (true, 0, None),
            ProjectScope::VisibleTo {
                user_id,
                company_id,
            } => (false, user_id, company_id),
        }
    }
}

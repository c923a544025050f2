//! Handlers for the `/projects` resource.
//!
//! Reads are open to any authenticated user and narrowed by
//! [`AuthUser::project_scope`]; writes require the `admin` role.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use portal_core::error::CoreError;
use portal_core::file_sync::parse_drive_folder_id;
use portal_core::project::{
    require_non_blank, validate_action_type, validate_project_name, validate_project_status,
};
use portal_core::types::{DbId, Timestamp};
use portal_db::models::company::CompanySummary;
use portal_db::models::project::{CreateProject, Project, UpdateProject};
use portal_db::models::project_action::{NewProjectAction, ProjectAction};
use portal_db::models::project_file::ProjectFile;
use portal_db::models::project_step::{NewProjectStep, ProjectStep};
use portal_db::models::user::UserSummary;
use portal_db::repositories::{
    CompanyRepo, ProjectActionRepo, ProjectFileRepo, ProjectRepo, ProjectStepRepo, UserRepo,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::engine::progress::refresh_progress;
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::handlers::users::ensure_company_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, SuccessMessage};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// One step of a create/edit request. List position becomes its order.
#[derive(Debug, Deserialize)]
pub struct StepInput {
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    #[serde(default)]
    pub completed: bool,
}

/// One action of a create/edit request. List position becomes its order.
#[derive(Debug, Deserialize)]
pub struct ActionInput {
    pub title: String,
    pub description: Option<String>,
    #[serde(alias = "type")]
    pub action_type: String,
    #[serde(default)]
    pub completed: bool,
    pub due_date: Option<Timestamp>,
}

/// Request body for `POST /projects` and `PUT /projects/{id}`.
///
/// On edit, `steps`/`actions` replace the whole list when present and leave
/// it untouched when absent.
#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub client_id: Option<DbId>,
    pub company_id: Option<DbId>,
    pub status: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub drive_folder_id: Option<String>,
    pub drive_folder_url: Option<String>,
    pub steps: Option<Vec<StepInput>>,
    pub actions: Option<Vec<ActionInput>>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A project with everything the project page shows.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub client: Option<UserSummary>,
    pub admin: Option<UserSummary>,
    pub company: Option<CompanySummary>,
    pub steps: Vec<ProjectStep>,
    pub actions: Vec<ProjectAction>,
    pub files: Vec<ProjectFile>,
    pub ticket_count: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ProjectDetail>>>> {
    let projects = ProjectRepo::list(&state.pool, &user.project_scope()).await?;
    let data = load_details(&state.pool, projects).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/projects
///
/// The caller becomes the project's admin. Progress is derived from the
/// initial steps.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<ProjectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectDetail>>)> {
    let validated = validate_request(&state.pool, input).await?;

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            name: validated.name,
            description: validated.description,
            status: validated.status,
            start_date: validated.start_date,
            end_date: validated.end_date,
            drive_folder_id: validated.drive_folder_id,
            drive_folder_url: validated.drive_folder_url,
            admin_id: admin.user_id,
            client_id: validated.client_id,
            company_id: validated.company_id,
        },
    )
    .await?;

    if let Some(steps) = &validated.steps {
        ProjectStepRepo::replace_all(&state.pool, project.id, steps, Utc::now()).await?;
    }
    if let Some(actions) = &validated.actions {
        ProjectActionRepo::replace_all(&state.pool, project.id, actions).await?;
    }
    let project = refresh_progress(&state.pool, project.id).await?;

    tracing::info!(project_id = project.id, admin_id = admin.user_id, "Project created");

    let data = load_detail(&state.pool, project).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = find_project(&state.pool, id).await?;
    user.ensure_can_view(&project)?;

    let data = load_detail(&state.pool, project).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/projects/{id}
///
/// A `steps` list replaces every existing step and recomputes progress.
/// Returns the project as stored after the edit.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ProjectRequest>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    find_project(&state.pool, id).await?;
    let validated = validate_request(&state.pool, input).await?;

    let mut project = ProjectRepo::update(
        &state.pool,
        id,
        &UpdateProject {
            name: validated.name,
            description: validated.description,
            status: validated.status,
            start_date: validated.start_date,
            end_date: validated.end_date,
            drive_folder_id: validated.drive_folder_id,
            drive_folder_url: validated.drive_folder_url,
            client_id: validated.client_id,
            company_id: validated.company_id,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    }))?;

    if let Some(steps) = &validated.steps {
        ProjectStepRepo::replace_all(&state.pool, id, steps, Utc::now()).await?;
        project = refresh_progress(&state.pool, id).await?;
    }
    if let Some(actions) = &validated.actions {
        ProjectActionRepo::replace_all(&state.pool, id, actions).await?;
    }

    tracing::info!(
        project_id = id,
        updated_by = admin.user_id,
        steps_replaced = validated.steps.is_some(),
        actions_replaced = validated.actions.is_some(),
        "Project updated",
    );

    let data = load_detail(&state.pool, project).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SuccessMessage>>> {
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }

    tracing::info!(project_id = id, deleted_by = admin.user_id, "Project deleted");
    Ok(Json(DataResponse {
        data: SuccessMessage::new("Project deleted"),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn find_project(pool: &PgPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// A [`ProjectRequest`] after validation and normalization.
struct ValidatedProject {
    name: String,
    description: Option<String>,
    client_id: DbId,
    company_id: Option<DbId>,
    status: Option<String>,
    start_date: Option<Timestamp>,
    end_date: Option<Timestamp>,
    drive_folder_id: Option<String>,
    drive_folder_url: Option<String>,
    steps: Option<Vec<NewProjectStep>>,
    actions: Option<Vec<NewProjectAction>>,
}

async fn validate_request(pool: &PgPool, input: ProjectRequest) -> AppResult<ValidatedProject> {
    validate_project_name(&input.name)?;

    let client_id = input
        .client_id
        .ok_or_else(|| AppError::Core(CoreError::Validation("client_id is required".into())))?;
    if UserRepo::find_by_id(pool, client_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "client_id {client_id} does not reference an existing user"
        ))));
    }
    ensure_company_exists(pool, input.company_id).await?;

    if let Some(status) = input.status.as_deref() {
        validate_project_status(status)?;
    }

    let drive_folder_url = input
        .drive_folder_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());
    let drive_folder_id = match input
        .drive_folder_id
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
    {
        Some(id) => Some(id),
        None => match drive_folder_url.as_deref() {
            Some(url) => Some(parse_drive_folder_id(url).ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "drive_folder_url is not a Google Drive folder link".into(),
                ))
            })?),
            None => None,
        },
    };

    let steps = input
        .steps
        .map(|steps| {
            steps
                .into_iter()
                .map(|s| {
                    require_non_blank("step title", &s.title)?;
                    Ok(NewProjectStep {
                        title: s.title.trim().to_string(),
                        description: s.description,
                        start_date: s.start_date,
                        end_date: s.end_date,
                        completed: s.completed,
                    })
                })
                .collect::<Result<Vec<_>, CoreError>>()
        })
        .transpose()?;

    let actions = input
        .actions
        .map(|actions| {
            actions
                .into_iter()
                .map(|a| {
                    require_non_blank("action title", &a.title)?;
                    validate_action_type(&a.action_type)?;
                    Ok(NewProjectAction {
                        title: a.title.trim().to_string(),
                        description: a.description,
                        action_type: a.action_type,
                        completed: a.completed,
                        due_date: a.due_date,
                    })
                })
                .collect::<Result<Vec<_>, CoreError>>()
        })
        .transpose()?;

    Ok(ValidatedProject {
        name: input.name.trim().to_string(),
        description: input.description,
        client_id,
        company_id: input.company_id,
        status: input.status,
        start_date: input.start_date,
        end_date: input.end_date,
        drive_folder_id,
        drive_folder_url,
        steps,
        actions,
    })
}

async fn load_detail(pool: &PgPool, project: Project) -> AppResult<ProjectDetail> {
    load_details(pool, vec![project])
        .await?
        .pop()
        .ok_or_else(|| AppError::InternalError("Project detail assembly failed".into()))
}

/// Attach people, steps, actions, files, and ticket counts to projects,
/// with one query per relation.
async fn load_details(pool: &PgPool, projects: Vec<Project>) -> AppResult<Vec<ProjectDetail>> {
    if projects.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();

    let mut user_ids: Vec<DbId> = projects
        .iter()
        .flat_map(|p| [p.client_id, p.admin_id])
        .collect();
    user_ids.sort_unstable();
    user_ids.dedup();
    let users: HashMap<DbId, UserSummary> = UserRepo::list_summaries(pool, &user_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut company_ids: Vec<DbId> = projects.iter().filter_map(|p| p.company_id).collect();
    company_ids.sort_unstable();
    company_ids.dedup();
    let companies: HashMap<DbId, CompanySummary> = CompanyRepo::list_summaries(pool, &company_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut steps = group_by_project(
        ProjectStepRepo::list_by_projects(pool, &ids).await?,
        |s| s.project_id,
    );
    let mut actions = group_by_project(
        ProjectActionRepo::list_by_projects(pool, &ids).await?,
        |a| a.project_id,
    );
    let mut files = group_by_project(
        ProjectFileRepo::list_by_projects(pool, &ids).await?,
        |f| f.project_id,
    );
    let ticket_counts: HashMap<DbId, i64> = ProjectRepo::ticket_counts(pool, &ids)
        .await?
        .into_iter()
        .collect();

    Ok(projects
        .into_iter()
        .map(|project| {
            let id = project.id;
            ProjectDetail {
                client: users.get(&project.client_id).cloned(),
                admin: users.get(&project.admin_id).cloned(),
                company: project.company_id.and_then(|c| companies.get(&c).cloned()),
                steps: steps.remove(&id).unwrap_or_default(),
                actions: actions.remove(&id).unwrap_or_default(),
                files: files.remove(&id).unwrap_or_default(),
                ticket_count: ticket_counts.get(&id).copied().unwrap_or(0),
                project,
            }
        })
        .collect())
}

/// Bucket rows by project id, keeping their query order within a bucket.
fn group_by_project<T>(rows: Vec<T>, key: impl Fn(&T) -> DbId) -> HashMap<DbId, Vec<T>> {
    let mut grouped: HashMap<DbId, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}

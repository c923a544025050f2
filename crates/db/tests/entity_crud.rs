use chrono::Utc;
use portal_core::file_sync::NewSyncedFile;
use portal_core::roles::{ROLE_ADMIN, ROLE_CLIENT};
use portal_core::types::DbId;
use portal_db::models::company::CompanyInput;
use portal_db::models::project::{CreateProject, ProjectScope, UpdateProject};
use portal_db::models::project_action::NewProjectAction;
use portal_db::models::project_step::NewProjectStep;
use portal_db::models::ticket::{CreateTicket, UpdateTicket};
use portal_db::models::user::CreateUser;
use portal_db::repositories::*;
use sqlx::PgPool;

async fn role_id(pool: &PgPool, name: &str) -> DbId {
    RoleRepo::find_by_name(pool, name).await.unwrap().unwrap().id
}

async fn user(pool: &PgPool, email: &str, role: &str, company_id: Option<DbId>) -> DbId {
    let input = CreateUser {
        email: email.to_string(),
        name: email.split('@').next().unwrap().to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role_id: role_id(pool, role).await,
        avatar: None,
        company_id,
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

async fn project(pool: &PgPool, admin: DbId, client: DbId, company: Option<DbId>) -> DbId {
    let input = CreateProject {
        name: "Website".to_string(),
        description: Some("Marketing site".to_string()),
        status: None,
        start_date: None,
        end_date: None,
        drive_folder_id: None,
        drive_folder_url: None,
        admin_id: admin,
        client_id: client,
        company_id: company,
    };
    ProjectRepo::create(pool, &input).await.unwrap().id
}

fn step(title: &str, completed: bool) -> NewProjectStep {
    NewProjectStep {
        title: title.to_string(),
        description: None,
        start_date: None,
        end_date: None,
        completed,
    }
}

fn synced(id: &str) -> NewSyncedFile {
    NewSyncedFile {
        name: format!("{id}.pdf"),
        drive_file_id: id.to_string(),
        drive_file_url: format!("https://drive.google.com/file/d/{id}/view"),
        mime_type: Some("application/pdf".to_string()),
        size_bytes: Some(10),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    user(&pool, "a@example.com", ROLE_CLIENT, None).await;
    let dup = CreateUser {
        email: "a@example.com".to_string(),
        name: "again".to_string(),
        password_hash: "x".to_string(),
        role_id: role_id(&pool, ROLE_CLIENT).await,
        avatar: None,
        company_id: None,
    };
    let err = UserRepo::create(&pool, &dup).await.unwrap_err();
    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_list_filters_by_role(pool: PgPool) {
    user(&pool, "admin@example.com", ROLE_ADMIN, None).await;
    user(&pool, "c1@example.com", ROLE_CLIENT, None).await;
    user(&pool, "c2@example.com", ROLE_CLIENT, None).await;

    let clients = UserRepo::list(&pool, Some(role_id(&pool, ROLE_CLIENT).await))
        .await
        .unwrap();
    assert_eq!(clients.len(), 2);
    assert_eq!(UserRepo::list(&pool, None).await.unwrap().len(), 3);

    let admin_role = role_id(&pool, ROLE_ADMIN).await;
    assert!(UserRepo::exists_with_role(&pool, admin_role).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_defaults(pool: PgPool) {
    let admin = user(&pool, "admin@example.com", ROLE_ADMIN, None).await;
    let client = user(&pool, "c@example.com", ROLE_CLIENT, None).await;
    let id = project(&pool, admin, client, None).await;

    let row = ProjectRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, "NOT_STARTED");
    assert_eq!(row.progress, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_scope_visibility(pool: PgPool) {
    let acme = CompanyRepo::create(
        &pool,
        &CompanyInput {
            name: "Acme".to_string(),
            description: None,
            logo: None,
        },
    )
    .await
    .unwrap();

    let admin = user(&pool, "admin@example.com", ROLE_ADMIN, None).await;
    let owner = user(&pool, "owner@example.com", ROLE_CLIENT, Some(acme.id)).await;
    let colleague = user(&pool, "colleague@example.com", ROLE_CLIENT, Some(acme.id)).await;
    let outsider = user(&pool, "outsider@example.com", ROLE_CLIENT, None).await;

    project(&pool, admin, owner, Some(acme.id)).await;
    project(&pool, admin, outsider, None).await;

    let scope = |user_id, company_id| ProjectScope::VisibleTo {
        user_id,
        company_id,
    };
    assert_eq!(ProjectRepo::list(&pool, &ProjectScope::All).await.unwrap().len(), 2);
    assert_eq!(
        ProjectRepo::list(&pool, &scope(owner, Some(acme.id))).await.unwrap().len(),
        1
    );
    assert_eq!(
        ProjectRepo::list(&pool, &scope(colleague, Some(acme.id))).await.unwrap().len(),
        1
    );
    assert_eq!(
        ProjectRepo::list(&pool, &scope(outsider, None)).await.unwrap().len(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_leaves_progress_alone(pool: PgPool) {
    let admin = user(&pool, "admin@example.com", ROLE_ADMIN, None).await;
    let client = user(&pool, "c@example.com", ROLE_CLIENT, None).await;
    let id = project(&pool, admin, client, None).await;
    ProjectRepo::set_progress(&pool, id, 40).await.unwrap();

    let edit = UpdateProject {
        name: "Renamed".to_string(),
        description: None,
        status: Some("IN_PROGRESS".to_string()),
        start_date: None,
        end_date: None,
        drive_folder_id: None,
        drive_folder_url: None,
        client_id: client,
        company_id: None,
    };
    let row = ProjectRepo::update(&pool, id, &edit).await.unwrap().unwrap();
    assert_eq!(row.name, "Renamed");
    assert_eq!(row.description, None);
    assert_eq!(row.status, "IN_PROGRESS");
    assert_eq!(row.progress, 40);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_step_replace_and_toggle(pool: PgPool) {
    let admin = user(&pool, "admin@example.com", ROLE_ADMIN, None).await;
    let client = user(&pool, "c@example.com", ROLE_CLIENT, None).await;
    let id = project(&pool, admin, client, None).await;
    let now = Utc::now();

    let steps = ProjectStepRepo::replace_all(
        &pool,
        id,
        &[step("Kickoff", true), step("Design", false), step("Build", false)],
        now,
    )
    .await
    .unwrap();
    let orders: Vec<i32> = steps.iter().map(|s| s.sort_order).collect();
    assert_eq!(orders, [0, 1, 2]);
    assert!(steps[0].completed_at.is_some());
    assert!(steps[1].completed_at.is_none());

    let replaced = ProjectStepRepo::replace_all(&pool, id, &[step("Only", false)], now)
        .await
        .unwrap();
    assert_eq!(replaced.len(), 1);
    assert_eq!(ProjectStepRepo::list_by_project(&pool, id).await.unwrap().len(), 1);

    let toggled = ProjectStepRepo::set_completed(&pool, id, replaced[0].id, true, now)
        .await
        .unwrap()
        .unwrap();
    assert!(toggled.completed);
    assert!(toggled.completed_at.is_some());

    let cleared = ProjectStepRepo::set_completed(&pool, id, replaced[0].id, false, now)
        .await
        .unwrap()
        .unwrap();
    assert!(cleared.completed_at.is_none());

    // Step id scoped to its own project.
    let other = project(&pool, admin, client, None).await;
    assert!(ProjectStepRepo::set_completed(&pool, other, replaced[0].id, true, now)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_action_replace_keeps_given_order(pool: PgPool) {
    let admin = user(&pool, "admin@example.com", ROLE_ADMIN, None).await;
    let client = user(&pool, "c@example.com", ROLE_CLIENT, None).await;
    let id = project(&pool, admin, client, None).await;

    let action = |title: &str, action_type: &str| NewProjectAction {
        title: title.to_string(),
        description: None,
        action_type: action_type.to_string(),
        completed: false,
        due_date: None,
    };

    ProjectActionRepo::replace_all(&pool, id, &[action("Old", "CLIENT")])
        .await
        .unwrap();
    ProjectActionRepo::replace_all(
        &pool,
        id,
        &[action("Send logo", "CLIENT"), action("Draft copy", "LEXIA")],
    )
    .await
    .unwrap();

    let actions = ProjectActionRepo::list_by_project(&pool, id).await.unwrap();
    let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["Send logo", "Draft copy"]);
    assert_eq!(actions[1].sort_order, 1);

    // Unknown action types are rejected by the table constraint.
    assert!(ProjectActionRepo::replace_all(&pool, id, &[action("Bad", "OTHER")])
        .await
        .is_err());
    assert_eq!(ProjectActionRepo::list_by_project(&pool, id).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_file_insert_is_idempotent(pool: PgPool) {
    let admin = user(&pool, "admin@example.com", ROLE_ADMIN, None).await;
    let client = user(&pool, "c@example.com", ROLE_CLIENT, None).await;
    let id = project(&pool, admin, client, None).await;

    let first = ProjectFileRepo::insert_if_absent(&pool, id, &synced("A")).await.unwrap();
    assert!(first.is_some());
    let second = ProjectFileRepo::insert_if_absent(&pool, id, &synced("A")).await.unwrap();
    assert!(second.is_none());

    assert_eq!(ProjectFileRepo::list_by_project(&pool, id).await.unwrap().len(), 1);
    assert_eq!(
        ProjectFileRepo::list_drive_ids(&pool, id).await.unwrap(),
        vec!["A".to_string()]
    );

    // The same Drive file may be recorded under another project.
    let other = project(&pool, admin, client, None).await;
    assert!(ProjectFileRepo::insert_if_absent(&pool, other, &synced("A"))
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_company_delete_detaches(pool: PgPool) {
    let acme = CompanyRepo::create(
        &pool,
        &CompanyInput {
            name: "Acme".to_string(),
            description: Some("Widgets".to_string()),
            logo: None,
        },
    )
    .await
    .unwrap();
    let admin = user(&pool, "admin@example.com", ROLE_ADMIN, None).await;
    let client = user(&pool, "c@example.com", ROLE_CLIENT, Some(acme.id)).await;
    let project_id = project(&pool, admin, client, Some(acme.id)).await;

    let counted = CompanyRepo::find_by_id(&pool, acme.id).await.unwrap().unwrap();
    assert_eq!((counted.user_count, counted.project_count), (1, 1));

    let detached = CompanyRepo::delete_detaching(&pool, acme.id).await.unwrap().unwrap();
    assert_eq!((detached.users, detached.projects), (1, 1));

    assert!(CompanyRepo::find_by_id(&pool, acme.id).await.unwrap().is_none());
    let client_row = UserRepo::find_by_id(&pool, client).await.unwrap().unwrap();
    assert_eq!(client_row.company_id, None);
    let project_row = ProjectRepo::find_by_id(&pool, project_id).await.unwrap().unwrap();
    assert_eq!(project_row.company_id, None);

    assert!(CompanyRepo::delete_detaching(&pool, acme.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tickets_and_replies(pool: PgPool) {
    let admin = user(&pool, "admin@example.com", ROLE_ADMIN, None).await;
    let client = user(&pool, "c@example.com", ROLE_CLIENT, None).await;
    let other = user(&pool, "o@example.com", ROLE_CLIENT, None).await;

    let ticket = TicketRepo::create(
        &pool,
        &CreateTicket {
            subject: "Broken link".to_string(),
            message: "The footer link 404s".to_string(),
            status: None,
            priority: "HIGH".to_string(),
            user_id: client,
            project_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(ticket.status, "OPEN");

    assert_eq!(TicketRepo::list(&pool, Some(client)).await.unwrap().len(), 1);
    assert!(TicketRepo::list(&pool, Some(other)).await.unwrap().is_empty());

    let updated = TicketRepo::update(
        &pool,
        ticket.id,
        &UpdateTicket {
            status: Some("RESOLVED".to_string()),
            priority: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.status, "RESOLVED");
    assert_eq!(updated.priority, "HIGH");

    let reply = TicketReplyRepo::create(&pool, ticket.id, admin, "Fixed").await.unwrap();
    assert_eq!(reply.user_role, "admin");
    let replies = TicketReplyRepo::list_by_tickets(&pool, &[ticket.id]).await.unwrap();
    assert_eq!(replies.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_is_case_insensitive_and_scoped(pool: PgPool) {
    let admin = user(&pool, "admin@example.com", ROLE_ADMIN, None).await;
    let client = user(&pool, "c@example.com", ROLE_CLIENT, None).await;
    let outsider = user(&pool, "o@example.com", ROLE_CLIENT, None).await;
    project(&pool, admin, client, None).await;

    let hits = SearchRepo::projects(&pool, &ProjectScope::All, "WEBSITE", 10)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].client_name, "c");

    let outsider_scope = ProjectScope::VisibleTo {
        user_id: outsider,
        company_id: None,
    };
    assert!(SearchRepo::projects(&pool, &outsider_scope, "website", 10)
        .await
        .unwrap()
        .is_empty());

    // Wildcards in the term are literal.
    assert!(SearchRepo::projects(&pool, &ProjectScope::All, "%", 10)
        .await
        .unwrap()
        .is_empty());
}

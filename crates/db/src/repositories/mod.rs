//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod comment_repo;
pub mod company_repo;
pub mod project_action_repo;
pub mod project_file_repo;
pub mod project_repo;
pub mod project_step_repo;
pub mod role_repo;
pub mod search_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use company_repo::CompanyRepo;
pub use project_action_repo::ProjectActionRepo;
pub use project_file_repo::ProjectFileRepo;
pub use project_repo::ProjectRepo;
pub use project_step_repo::ProjectStepRepo;
pub use role_repo::RoleRepo;
pub use search_repo::SearchRepo;
pub use ticket_repo::{TicketReplyRepo, TicketRepo};
pub use user_repo::UserRepo;

/// Predicate restricting `projects p` rows to a [`ProjectScope`].
///
/// Expects three consecutive binds starting at the given position:
/// `all_access BOOLEAN, user_id BIGINT, company_id BIGINT NULL`.
///
/// [`ProjectScope`]: crate::models::project::ProjectScope
pub(crate) fn scope_filter(first_bind: usize) -> String {
    let (all, user, company) = (first_bind, first_bind + 1, first_bind + 2);
    format!(
        "(${all}::BOOLEAN OR p.client_id = ${user} \
          OR (${company}::BIGINT IS NOT NULL AND p.company_id = ${company}))"
    )
}

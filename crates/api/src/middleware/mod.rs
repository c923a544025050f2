//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from the session token and
//!   reloads their role from the database.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
pub mod rbac;

//! Well-known role name constants.
//!
//! These must match the seed data in `20250101000001_create_roles_and_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CLIENT: &str = "client";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_CLIENT];

/// Whether a role name carries elevated (administrator) rights.
pub fn is_elevated(role: &str) -> bool {
    role == ROLE_ADMIN
}

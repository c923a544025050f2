//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO where the entity is editable

pub mod comment;
pub mod company;
pub mod project;
pub mod project_action;
pub mod project_file;
pub mod project_step;
pub mod role;
pub mod search;
pub mod ticket;
pub mod user;

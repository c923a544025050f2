pub mod auth;
pub mod comments;
pub mod companies;
pub mod files;
pub mod projects;
pub mod search;
pub mod setup;
pub mod steps;
pub mod tickets;
pub mod users;

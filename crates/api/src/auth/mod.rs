//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`cookie`] -- the `auth-token` cookie carrying the JWT.

pub mod cookie;
pub mod jwt;
pub mod password;

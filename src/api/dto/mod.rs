//! Data Transfer Objects for HTTP requests and responses.
//!
//! All DTOs use Serde for serialization and validator for form input.

pub mod admin;
pub mod health;

//! # Click Tracker
//!
//! A URL redirect service that records a click for every redirect, built
//! with Axum and SQLite.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, repository traits and the click worker
//! - **Application Layer** ([`application`]) - Link and click services, recording policy
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite pool and repositories
//! - **API Layer** ([`api`]) - Handlers, DTOs and middleware
//!
//! ## Features
//!
//! - `GET /{slug}` answers `302 Found` and records ip, user agent, referrer
//!   and `campaign` tag
//! - Asynchronous (queued) or synchronous click recording, both with bounded
//!   write time; a failed click never fails the redirect
//! - Shared-secret admin surface for click reports and link upserts
//! - Health endpoint exposing recorded / failed / dropped click counters
//!
//! ## Quick Start
//!
//! ```bash
//! export ADMIN_TOKEN="change-me"
//! export DATABASE_URL="sqlite://clicks.db"
//!
//! cargo run --bin admin -- link add promo https://example.com/spring
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AuthService, ClickDispatcher, ClickService, DispatchOutcome, LinkService,
    };
    pub use crate::config::RecordingMode;
    pub use crate::domain::entities::{Click, ClickId, Link, NewClick, NewLink};
    pub use crate::error::AppError;
    pub use crate::state::{AppState, ClickPipelineSettings};
}

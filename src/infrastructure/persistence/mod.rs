//! SQLite repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries with bound parameters.
//!
//! # Repositories
//!
//! - [`SqliteLinkRepository`] - Link storage and retrieval
//! - [`SqliteClickRepository`] - Click log and aggregate queries
//!
//! Pool construction and migrations live in [`pool`].

pub mod pool;
pub mod sqlite_click_repository;
pub mod sqlite_link_repository;

pub use pool::{PoolSettings, connect, run_migrations};
pub use sqlite_click_repository::SqliteClickRepository;
pub use sqlite_link_repository::SqliteLinkRepository;

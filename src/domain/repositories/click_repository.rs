//! Repository trait for the click event log.

use crate::domain::entities::{Click, ClickId, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Click total for one registered link.
///
/// Produced by a left join from links to clicks, so links without clicks
/// appear with `clicks == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClickCount {
    pub slug: String,
    pub destination: String,
    pub clicks: i64,
}

/// Repository interface for the append-only click log.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteClickRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_click.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click and returns its store-assigned id.
    ///
    /// Ids are unique and strictly increasing across concurrent writers.
    /// The slug is not checked against the link store.
    ///
    /// Idempotent on `new_click.event_key`: a repeated call stores nothing
    /// and returns the existing id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    async fn record_click(&self, new_click: NewClick) -> Result<ClickId, AppError>;

    /// Per-link click totals for every registered link, ordered by clicks
    /// descending then slug ascending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    async fn counts_by_slug(&self) -> Result<Vec<LinkClickCount>, AppError>;

    /// Most recent clicks first (descending id), at most `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    async fn recent(&self, limit: i64) -> Result<Vec<Click>, AppError>;

    /// Counts all recorded clicks, including those whose link is gone.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    async fn count_all(&self) -> Result<i64, AppError>;
}

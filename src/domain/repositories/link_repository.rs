//! Repository trait for slug → destination mappings.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the link store.
///
/// Every method is a single statement against the store, so a lookup never
/// observes a half-applied upsert.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteLinkRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts the mapping or replaces destination and description of an
    /// existing slug. `created_at` survives an update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    async fn upsert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by slug.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError>;

    /// Lists every link ordered by slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    async fn list_all(&self) -> Result<Vec<Link>, AppError>;

    /// Removes a mapping. Recorded clicks for the slug are kept.
    ///
    /// Returns `Ok(false)` if the slug was not registered.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    async fn remove(&self, slug: &str) -> Result<bool, AppError>;

    /// Round-trips a trivial query to check the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}

//! Link management and resolution service.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::slug::validate_slug;
use crate::utils::url_normalizer::normalize_destination;
use serde_json::json;

/// Service for maintaining and resolving slug → destination mappings.
///
/// Input is validated here, so the repository only ever sees trimmed slugs
/// and normalized destinations.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Creates the mapping or replaces the destination of an existing slug.
    ///
    /// Blank descriptions are stored as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - The slug is empty, too long, has disallowed characters or is reserved
    /// - The destination is missing or not an absolute HTTP(S) URL
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    pub async fn upsert(
        &self,
        slug: &str,
        destination: &str,
        description: Option<&str>,
    ) -> Result<Link, AppError> {
        let slug = validate_slug(slug)?;

        let destination = normalize_destination(destination).map_err(|e| {
            AppError::bad_request(
                "Invalid destination URL",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        self.link_repository
            .upsert(NewLink {
                slug,
                destination,
                description,
            })
            .await
    }

    /// Resolves a slug to its link.
    ///
    /// The slug is matched exactly, without trimming or validation: anything
    /// that was never stored simply does not resolve.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is not registered.
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    pub async fn resolve(&self, slug: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "slug": slug })))
    }

    /// Lists every link ordered by slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    pub async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_all().await
    }

    /// Removes a mapping; recorded clicks are kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is not registered.
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    pub async fn remove(&self, slug: &str) -> Result<(), AppError> {
        if self.link_repository.remove(slug).await? {
            Ok(())
        } else {
            Err(AppError::not_found(
                "Link not found",
                json!({ "slug": slug }),
            ))
        }
    }

    /// Checks that the link store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] if the store does not answer.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;

    fn stored(new_link: NewLink) -> Link {
        let now = Utc::now();
        Link::new(
            new_link.slug,
            new_link.destination,
            new_link.description,
            now,
            now,
        )
    }

    #[tokio::test]
    async fn test_upsert_success() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_upsert()
            .withf(|l| {
                l.slug == "promo"
                    && l.destination == "https://example.com/a"
                    && l.description.as_deref() == Some("Spring")
            })
            .times(1)
            .returning(|l| Ok(stored(l)));

        let service = LinkService::new(Arc::new(mock_repo));

        let link = service
            .upsert("promo", "https://example.com/a", Some("Spring"))
            .await
            .unwrap();

        assert_eq!(link.slug, "promo");
        assert_eq!(link.destination, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_upsert_normalizes_input() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_upsert()
            .withf(|l| {
                l.slug == "promo"
                    && l.destination == "https://example.com/Path#top"
                    && l.description.is_none()
            })
            .times(1)
            .returning(|l| Ok(stored(l)));

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service
            .upsert(" promo ", "HTTPS://EXAMPLE.COM:443/Path#top", Some("   "))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_upsert_rejects_missing_destination() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_upsert().times(0);

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service.upsert("promo", "  ", None).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_destination() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_upsert().times(0);

        let service = LinkService::new(Arc::new(mock_repo));

        for destination in ["not-a-url", "javascript:alert(1)", "ftp://example.com/"] {
            let result = service.upsert("promo", destination, None).await;
            assert!(
                matches!(result, Err(AppError::Validation { .. })),
                "{destination} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_slug() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_upsert().times(0);

        let service = LinkService::new(Arc::new(mock_repo));

        for slug in ["", "a/b", "admin"] {
            let result = service.upsert(slug, "https://example.com", None).await;
            assert!(matches!(result, Err(AppError::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_slug()
            .withf(|slug| slug == "promo")
            .times(1)
            .returning(|_| {
                Ok(Some(stored(NewLink {
                    slug: "promo".to_string(),
                    destination: "https://example.com/b".to_string(),
                    description: None,
                })))
            });

        let service = LinkService::new(Arc::new(mock_repo));

        let link = service.resolve("promo").await.unwrap();
        assert_eq!(link.destination, "https://example.com/b");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_slug()
            .times(1)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo));

        let err = service.resolve("nonexistent-slug").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_resolve_storage_error() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_slug()
            .times(1)
            .returning(|_| Err(AppError::storage_unavailable("down", json!({}))));

        let service = LinkService::new(Arc::new(mock_repo));

        let err = service.resolve("promo").await.unwrap_err();
        assert!(err.is_storage());
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_remove().times(1).returning(|_| Ok(false));

        let service = LinkService::new(Arc::new(mock_repo));

        assert!(service.remove("ghost").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_remove_existing() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_remove()
            .withf(|slug| slug == "promo")
            .times(1)
            .returning(|_| Ok(true));

        let service = LinkService::new(Arc::new(mock_repo));

        assert!(service.remove("promo").await.is_ok());
    }
}

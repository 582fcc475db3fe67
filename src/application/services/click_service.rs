//! Click recording and reporting service.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{Click, ClickId, NewClick};
use crate::domain::repositories::{ClickRepository, LinkClickCount};
use crate::error::AppError;
use serde_json::json;

/// Upper bound for a single `recent` query.
pub const MAX_RECENT_LIMIT: i64 = 1000;

/// Service in front of the click log.
///
/// Every write is bounded by `write_timeout`: a stalled store turns into
/// [`AppError::StorageUnavailable`] instead of holding the caller.
pub struct ClickService<R: ClickRepository + ?Sized> {
    repository: Arc<R>,
    write_timeout: Duration,
}

impl<R: ClickRepository + ?Sized> ClickService<R> {
    /// Creates a new click service.
    pub fn new(repository: Arc<R>, write_timeout: Duration) -> Self {
        Self {
            repository,
            write_timeout,
        }
    }

    /// Appends a click and returns its id.
    ///
    /// Does not require the slug to be registered. Recording a click whose
    /// `event_key` is already stored returns the existing id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] if the store fails or the
    /// write does not finish within the configured timeout.
    pub async fn record(&self, new_click: NewClick) -> Result<ClickId, AppError> {
        match tokio::time::timeout(self.write_timeout, self.repository.record_click(new_click))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(AppError::storage_unavailable(
                "Click write timed out",
                json!({ "timeout_ms": self.write_timeout.as_millis() as u64 }),
            )),
        }
    }

    /// Click count per registered slug; slugs without clicks map to 0.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    pub async fn counts_by_slug(&self) -> Result<BTreeMap<String, i64>, AppError> {
        Ok(self
            .repository
            .counts_by_slug()
            .await?
            .into_iter()
            .map(|c| (c.slug, c.clicks))
            .collect())
    }

    /// Per-link totals with destinations, busiest links first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    pub async fn totals(&self) -> Result<Vec<LinkClickCount>, AppError> {
        self.repository.counts_by_slug().await
    }

    /// Most recent clicks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `limit` is negative or above
    /// [`MAX_RECENT_LIMIT`].
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Click>, AppError> {
        if !(0..=MAX_RECENT_LIMIT).contains(&limit) {
            return Err(AppError::bad_request(
                format!("Limit must be between 0 and {}", MAX_RECENT_LIMIT),
                json!({ "limit": limit }),
            ));
        }

        if limit == 0 {
            return Ok(Vec::new());
        }

        self.repository.recent(limit).await
    }

    /// Total number of recorded clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] on database errors.
    pub async fn count_all(&self) -> Result<i64, AppError> {
        self.repository.count_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockClickRepository;
    use async_trait::async_trait;
    use chrono::Utc;

    fn service(mock_repo: MockClickRepository) -> ClickService<MockClickRepository> {
        ClickService::new(Arc::new(mock_repo), Duration::from_secs(1))
    }

    fn click(id: ClickId, slug: &str) -> Click {
        Click {
            id,
            clicked_at: Utc::now(),
            slug: slug.to_string(),
            ip: None,
            user_agent: None,
            referrer: None,
            campaign: None,
        }
    }

    #[tokio::test]
    async fn test_record_returns_store_id() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo
            .expect_record_click()
            .withf(|c| c.slug == "promo" && c.campaign.as_deref() == Some("spring"))
            .times(1)
            .returning(|_| Ok(42));

        let mut new_click = NewClick::bare("promo");
        new_click.campaign = Some("spring".to_string());

        let id = service(mock_repo).record(new_click).await.unwrap();
        assert_eq!(id, 42);
    }

    #[tokio::test]
    async fn test_record_propagates_storage_error() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo
            .expect_record_click()
            .times(1)
            .returning(|_| Err(AppError::storage_unavailable("down", json!({}))));

        let result = service(mock_repo).record(NewClick::bare("promo")).await;
        assert!(matches!(result, Err(AppError::StorageUnavailable { .. })));
    }

    struct StalledRepository;

    #[async_trait]
    impl ClickRepository for StalledRepository {
        async fn record_click(&self, _new_click: NewClick) -> Result<ClickId, AppError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(1)
        }

        async fn counts_by_slug(&self) -> Result<Vec<LinkClickCount>, AppError> {
            Ok(vec![])
        }

        async fn recent(&self, _limit: i64) -> Result<Vec<Click>, AppError> {
            Ok(vec![])
        }

        async fn count_all(&self) -> Result<i64, AppError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_record_times_out_on_stalled_store() {
        let service = ClickService::new(Arc::new(StalledRepository), Duration::from_millis(50));

        let started = std::time::Instant::now();
        let result = service.record(NewClick::bare("promo")).await;

        assert!(matches!(result, Err(AppError::StorageUnavailable { .. })));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_counts_by_slug_includes_zero_counts() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo.expect_counts_by_slug().times(1).returning(|| {
            Ok(vec![
                LinkClickCount {
                    slug: "promo".to_string(),
                    destination: "https://example.com/a".to_string(),
                    clicks: 3,
                },
                LinkClickCount {
                    slug: "idle".to_string(),
                    destination: "https://example.com/idle".to_string(),
                    clicks: 0,
                },
            ])
        });

        let counts = service(mock_repo).counts_by_slug().await.unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts["promo"], 3);
        assert_eq!(counts["idle"], 0);
    }

    #[tokio::test]
    async fn test_recent_passes_limit() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo
            .expect_recent()
            .withf(|limit| *limit == 2)
            .times(1)
            .returning(|_| Ok(vec![click(9, "a"), click(8, "b")]));

        let recent = service(mock_repo).recent(2).await.unwrap();
        assert_eq!(recent.iter().map(|c| c.id).collect::<Vec<_>>(), vec![9, 8]);
    }

    #[tokio::test]
    async fn test_recent_zero_skips_store() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo.expect_recent().times(0);

        let recent = service(mock_repo).recent(0).await.unwrap();
        assert!(recent.is_empty());
    }

    #[tokio::test]
    async fn test_recent_rejects_out_of_range_limit() {
        let mock_repo = MockClickRepository::new();
        let service = service(mock_repo);

        assert!(matches!(
            service.recent(-1).await,
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            service.recent(MAX_RECENT_LIMIT + 1).await,
            Err(AppError::Validation { .. })
        ));
    }
}

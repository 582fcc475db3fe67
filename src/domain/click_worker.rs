//! Background worker draining the click queue.
//!
//! Events are written with bounded concurrency. Storage failures are retried
//! with jittered exponential backoff; once the attempts are used up the click
//! is counted as failed and logged, never re-queued. Every attempt carries the
//! event's `event_key`, so an attempt that timed out but still committed is
//! not stored twice by the next one.
//!
//! The worker returns after every sender is dropped and all in-flight writes
//! have finished, which is what gives graceful shutdown its drain.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::application::services::ClickService;
use crate::domain::click_counters::ClickCounters;
use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Tuning knobs for [`run_click_worker`].
#[derive(Debug, Clone)]
pub struct ClickWorkerConfig {
    /// Maximum number of concurrent writes.
    pub concurrency: usize,
    /// Total attempts per click, including the first one.
    pub retry_attempts: usize,
    /// Upper bound for a single backoff delay.
    pub max_backoff: Duration,
}

impl Default for ClickWorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            retry_attempts: 3,
            max_backoff: Duration::from_secs(1),
        }
    }
}

impl ClickWorkerConfig {
    /// Delays between attempts: 20ms, 40ms, 80ms ... capped at `max_backoff`.
    fn backoff(&self) -> impl Iterator<Item = Duration> + use<> {
        ExponentialBackoff::from_millis(2)
            .factor(10)
            .max_delay(self.max_backoff)
            .map(jitter)
            .take(self.retry_attempts.saturating_sub(1))
    }
}

/// Consumes click events until the channel closes.
pub async fn run_click_worker<R>(
    mut rx: mpsc::Receiver<ClickEvent>,
    service: Arc<ClickService<R>>,
    counters: Arc<ClickCounters>,
    config: ClickWorkerConfig,
) where
    R: ClickRepository + ?Sized + 'static,
{
    let concurrency = config.concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let service = service.clone();
        let counters = counters.clone();
        let config = config.clone();

        tokio::spawn(async move {
            let _permit = permit;
            persist_click(&service, &counters, &config, event).await;
        });
    }

    // Wait for in-flight writes before reporting the worker as stopped.
    let _ = permits.acquire_many(concurrency as u32).await;
    info!("Click worker stopped");
}

async fn persist_click<R>(
    service: &ClickService<R>,
    counters: &ClickCounters,
    config: &ClickWorkerConfig,
    event: ClickEvent,
) where
    R: ClickRepository + ?Sized,
{
    let slug = event.slug.clone();
    let new_click: NewClick = event.into();

    let result = RetryIf::spawn(
        config.backoff(),
        || service.record(new_click.clone()),
        |e: &AppError| e.is_storage(),
    )
    .await;

    match result {
        Ok(id) => {
            counters.record_success();
            debug!(%slug, click_id = id, "Click recorded");
        }
        Err(e) => {
            counters.record_failure();
            error!(%slug, error = %e, "Failed to record click, dropping it");
        }
    }
}

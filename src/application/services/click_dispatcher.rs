//! Recording policy between the redirect handler and the click recorder.
//!
//! In queued mode the dispatcher never waits on storage: events go into a
//! bounded channel drained by [`crate::domain::click_worker::run_click_worker`].
//! In direct mode it awaits a single bounded write. Neither mode returns an
//! error to the caller; failures end up in [`ClickCounters`] and the logs.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{error, warn};

use crate::application::services::ClickService;
use crate::domain::click_counters::{ClickCounters, ClickCountersSnapshot};
use crate::domain::click_event::ClickEvent;
use crate::domain::entities::ClickId;
use crate::domain::repositories::ClickRepository;

/// What happened to a dispatched click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Accepted by the queue; the worker will write it.
    Queued,
    /// Written synchronously with the given id.
    Recorded(ClickId),
    /// Discarded because the queue was full or closed.
    Dropped,
    /// The synchronous write failed or timed out.
    Failed,
}

/// Queue occupancy reported on `/health`.
#[derive(Debug, Clone, Serialize)]
pub struct QueueStatus {
    pub mode: &'static str,
    pub capacity: usize,
    pub available: usize,
    pub closed: bool,
}

enum Strategy {
    Queue(mpsc::Sender<ClickEvent>),
    Direct(Arc<ClickService<dyn ClickRepository>>),
}

/// Hands click events to the recorder according to the configured mode.
pub struct ClickDispatcher {
    strategy: Strategy,
    counters: Arc<ClickCounters>,
}

impl ClickDispatcher {
    /// Dispatcher that enqueues events for the background worker.
    pub fn queued(sender: mpsc::Sender<ClickEvent>, counters: Arc<ClickCounters>) -> Self {
        Self {
            strategy: Strategy::Queue(sender),
            counters,
        }
    }

    /// Dispatcher that writes each event before returning.
    pub fn direct(
        service: Arc<ClickService<dyn ClickRepository>>,
        counters: Arc<ClickCounters>,
    ) -> Self {
        Self {
            strategy: Strategy::Direct(service),
            counters,
        }
    }

    /// Records or enqueues one click.
    pub async fn dispatch(&self, event: ClickEvent) -> DispatchOutcome {
        match &self.strategy {
            Strategy::Queue(sender) => match sender.try_send(event) {
                Ok(()) => DispatchOutcome::Queued,
                Err(TrySendError::Full(event)) => {
                    self.counters.record_drop();
                    warn!(slug = %event.slug, "Click queue full, dropping click");
                    DispatchOutcome::Dropped
                }
                Err(TrySendError::Closed(event)) => {
                    self.counters.record_drop();
                    warn!(slug = %event.slug, "Click queue closed, dropping click");
                    DispatchOutcome::Dropped
                }
            },
            Strategy::Direct(service) => {
                let slug = event.slug.clone();
                match service.record(event.into()).await {
                    Ok(id) => {
                        self.counters.record_success();
                        DispatchOutcome::Recorded(id)
                    }
                    Err(e) => {
                        self.counters.record_failure();
                        error!(%slug, error = %e, "Failed to record click");
                        DispatchOutcome::Failed
                    }
                }
            }
        }
    }

    pub fn counters(&self) -> ClickCountersSnapshot {
        self.counters.snapshot()
    }

    pub fn queue_status(&self) -> QueueStatus {
        match &self.strategy {
            Strategy::Queue(sender) => QueueStatus {
                mode: "async",
                capacity: sender.max_capacity(),
                available: sender.capacity(),
                closed: sender.is_closed(),
            },
            Strategy::Direct(_) => QueueStatus {
                mode: "sync",
                capacity: 0,
                available: 0,
                closed: false,
            },
        }
    }
}

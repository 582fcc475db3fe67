//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::services::{AuthService, ClickDispatcher, ClickService, LinkService};
use crate::config::RecordingMode;
use crate::domain::click_counters::ClickCounters;
use crate::domain::click_event::ClickEvent;
use crate::domain::click_worker::{ClickWorkerConfig, run_click_worker};
use crate::domain::repositories::{ClickRepository, LinkRepository};

/// Services shared by all requests. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub click_service: Arc<ClickService<dyn ClickRepository>>,
    pub auth_service: Arc<AuthService>,
    pub clicks: Arc<ClickDispatcher>,
}

/// How clicks flow from the redirect handler to the store.
#[derive(Debug, Clone)]
pub struct ClickPipelineSettings {
    pub mode: RecordingMode,
    pub queue_capacity: usize,
    pub write_timeout: Duration,
    pub worker: ClickWorkerConfig,
}

impl Default for ClickPipelineSettings {
    fn default() -> Self {
        Self {
            mode: RecordingMode::Async,
            queue_capacity: 10_000,
            write_timeout: Duration::from_secs(2),
            worker: ClickWorkerConfig::default(),
        }
    }
}

impl AppState {
    /// Wires services around the given repositories.
    ///
    /// In [`RecordingMode::Async`] this spawns the click worker and returns
    /// its handle. The worker stops once every clone of the returned state has
    /// been dropped and the queue is drained.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn build(
        link_repository: Arc<dyn LinkRepository>,
        click_repository: Arc<dyn ClickRepository>,
        auth_service: AuthService,
        settings: &ClickPipelineSettings,
    ) -> (Self, Option<JoinHandle<()>>) {
        let link_service = Arc::new(LinkService::new(link_repository));
        let click_service = Arc::new(ClickService::new(
            click_repository,
            settings.write_timeout,
        ));
        let counters = Arc::new(ClickCounters::new());

        let (clicks, worker) = match settings.mode {
            RecordingMode::Async => {
                let (tx, rx) = mpsc::channel::<ClickEvent>(settings.queue_capacity.max(1));
                let worker = tokio::spawn(run_click_worker(
                    rx,
                    click_service.clone(),
                    counters.clone(),
                    settings.worker.clone(),
                ));
                (ClickDispatcher::queued(tx, counters), Some(worker))
            }
            RecordingMode::Sync => (
                ClickDispatcher::direct(click_service.clone(), counters),
                None,
            ),
        };

        let state = Self {
            link_service,
            click_service,
            auth_service: Arc::new(auth_service),
            clicks: Arc::new(clicks),
        };

        (state, worker)
    }
}

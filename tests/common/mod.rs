#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo};
use chrono::Utc;
use click_tracker::api::middleware::rate_limit::RateLimitSettings;
use click_tracker::application::services::AuthService;
use click_tracker::config::RecordingMode;
use click_tracker::domain::entities::{Click, ClickId, Link, NewClick, NewLink, new_event_key};
use click_tracker::domain::repositories::{ClickRepository, LinkClickCount, LinkRepository};
use click_tracker::error::AppError;
use click_tracker::infrastructure::persistence::{SqliteClickRepository, SqliteLinkRepository};
use click_tracker::routes::app_router;
use click_tracker::state::{AppState, ClickPipelineSettings};
use serde_json::json;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower::Layer;

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub const PEER_ADDR: &str = "127.0.0.1:12345";

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Click store that fails every call, for failure injection.
pub struct FailingClickRepository;

#[async_trait]
impl ClickRepository for FailingClickRepository {
    async fn record_click(&self, _new_click: NewClick) -> Result<ClickId, AppError> {
        Err(AppError::storage_unavailable("disk I/O error", json!({})))
    }

    async fn counts_by_slug(&self) -> Result<Vec<LinkClickCount>, AppError> {
        Err(AppError::storage_unavailable("disk I/O error", json!({})))
    }

    async fn recent(&self, _limit: i64) -> Result<Vec<Click>, AppError> {
        Err(AppError::storage_unavailable("disk I/O error", json!({})))
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        Err(AppError::storage_unavailable("disk I/O error", json!({})))
    }
}

/// Link store that fails every call, for lookup-failure injection.
pub struct FailingLinkRepository;

#[async_trait]
impl LinkRepository for FailingLinkRepository {
    async fn upsert(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(AppError::storage_unavailable("no such table: links", json!({})))
    }

    async fn find_by_slug(&self, _slug: &str) -> Result<Option<Link>, AppError> {
        Err(AppError::storage_unavailable("no such table: links", json!({})))
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        Err(AppError::storage_unavailable("no such table: links", json!({})))
    }

    async fn remove(&self, _slug: &str) -> Result<bool, AppError> {
        Err(AppError::storage_unavailable("no such table: links", json!({})))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::storage_unavailable("no such table: links", json!({})))
    }
}

/// Click store whose writes hang far longer than any write timeout.
pub struct StalledClickRepository;

#[async_trait]
impl ClickRepository for StalledClickRepository {
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

pub fn pipeline(mode: RecordingMode) -> ClickPipelineSettings {
    let mut settings = ClickPipelineSettings {
        mode,
        ..ClickPipelineSettings::default()
    };
    settings.worker.max_backoff = Duration::from_millis(10);
    settings
}

pub fn create_test_state(
    pool: SqlitePool,
    mode: RecordingMode,
) -> (AppState, Option<JoinHandle<()>>) {
    let pool = Arc::new(pool);
    let click_repo: Arc<dyn ClickRepository> = Arc::new(SqliteClickRepository::new(pool.clone()));
    create_state_with_click_repo(pool, click_repo, mode)
}

pub fn create_state_with_click_repo(
    pool: Arc<SqlitePool>,
    click_repo: Arc<dyn ClickRepository>,
    mode: RecordingMode,
) -> (AppState, Option<JoinHandle<()>>) {
    let link_repo: Arc<dyn LinkRepository> = Arc::new(SqliteLinkRepository::new(pool));
    create_state_with_repos(link_repo, click_repo, &pipeline(mode))
}

pub fn create_state_with_repos(
    link_repo: Arc<dyn LinkRepository>,
    click_repo: Arc<dyn ClickRepository>,
    settings: &ClickPipelineSettings,
) -> (AppState, Option<JoinHandle<()>>) {
    let auth_service = AuthService::new(ADMIN_TOKEN).unwrap();

    AppState::build(link_repo, click_repo, auth_service, settings)
}

/// Full application router with a generous admin rate limit and a fixed
/// peer address.
pub fn test_router(state: AppState) -> Router {
    let rate_limit = RateLimitSettings {
        per_second: 1,
        burst: 1000,
    };

    app_router(state, rate_limit)
        .unwrap()
        .layer(MockConnectInfoLayer)
}

pub async fn create_test_link(pool: &SqlitePool, slug: &str, destination: &str) {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO links (slug, destination, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(slug)
    .bind(destination)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn create_test_click(pool: &SqlitePool, slug: &str, ip: &str) {
    sqlx::query("INSERT INTO clicks (event_key, clicked_at, slug, ip) VALUES (?1, ?2, ?3, ?4)")
        .bind(new_event_key())
        .bind(Utc::now())
        .bind(slug)
        .bind(ip)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count_all_clicks(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_clicks(pool: &SqlitePool, slug: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM clicks WHERE slug = ?1")
        .bind(slug)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Polls until `slug` has `expected` clicks or two seconds pass.
pub async fn wait_for_clicks(pool: &SqlitePool, slug: &str, expected: i64) -> i64 {
    let mut count = 0;
    for _ in 0..100 {
        count = count_clicks(pool, slug).await;
        if count >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    count
}

/// Polls the dispatcher counters until `failed` reaches `expected`.
pub async fn wait_for_failed(state: &AppState, expected: u64) -> u64 {
    let mut failed = 0;
    for _ in 0..100 {
        failed = state.clicks.counters().failed;
        if failed >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    failed
}

mod common;

use click_tracker::application::services::ClickService;
use click_tracker::domain::click_counters::ClickCounters;
use click_tracker::domain::click_event::ClickEvent;
use click_tracker::domain::click_worker::{ClickWorkerConfig, run_click_worker};
use click_tracker::infrastructure::persistence::SqliteClickRepository;
use sqlx::SqlitePool;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqlitePoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Second pool on the same database file with its own lock wait.
async fn writer_pool(pool: &SqlitePool, busy_timeout: Duration) -> SqlitePool {
    let options = (*pool.connect_options()).clone().busy_timeout(busy_timeout);

    SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .unwrap()
}

/// Takes the database write lock until the returned connection commits.
async fn hold_write_lock(pool: &SqlitePool) -> PoolConnection<Sqlite> {
    let mut conn = pool.acquire().await.unwrap();
    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut *conn)
        .await
        .unwrap();
    conn
}

async fn release_write_lock(mut conn: PoolConnection<Sqlite>) {
    sqlx::query("COMMIT").execute(&mut *conn).await.unwrap();
}

fn event(slug: &str) -> ClickEvent {
    ClickEvent::new(slug.to_string(), None, Some("Mozilla/5.0"), None, None)
}

#[sqlx::test]
async fn test_retried_timeouts_store_one_row(pool: SqlitePool) {
    // Lock wait longer than the write timeout: every attempt gives up on the
    // Rust side while its INSERT is still pending on the connection.
    let writer = writer_pool(&pool, Duration::from_secs(5)).await;
    let service = Arc::new(ClickService::new(
        Arc::new(SqliteClickRepository::new(Arc::new(writer.clone()))),
        Duration::from_millis(100),
    ));
    let counters = Arc::new(ClickCounters::new());
    let config = ClickWorkerConfig {
        concurrency: 1,
        retry_attempts: 3,
        max_backoff: Duration::from_millis(50),
    };

    let lock = hold_write_lock(&pool).await;

    let (tx, rx) = mpsc::channel(4);
    let worker = tokio::spawn(run_click_worker(rx, service, counters.clone(), config));
    tx.send(event("promo")).await.unwrap();
    drop(tx);

    tokio::time::sleep(Duration::from_millis(290)).await;
    release_write_lock(lock).await;
    worker.await.unwrap();

    // Give pending statements time to run after the lock is released.
    common::wait_for_clicks(&pool, "promo", 1).await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(common::count_clicks(&pool, "promo").await <= 1);
    let snapshot = counters.snapshot();
    assert_eq!(snapshot.recorded + snapshot.failed, 1);

    writer.close().await;
}

#[sqlx::test]
async fn test_lock_wait_below_write_timeout_fails_without_late_row(pool: SqlitePool) {
    let writer = writer_pool(&pool, Duration::from_millis(50)).await;
    let service = Arc::new(ClickService::new(
        Arc::new(SqliteClickRepository::new(Arc::new(writer.clone()))),
        Duration::from_secs(1),
    ));
    let counters = Arc::new(ClickCounters::new());
    let config = ClickWorkerConfig {
        concurrency: 1,
        retry_attempts: 1,
        max_backoff: Duration::from_millis(10),
    };

    let lock = hold_write_lock(&pool).await;

    let (tx, rx) = mpsc::channel(4);
    let worker = tokio::spawn(run_click_worker(rx, service, counters.clone(), config));
    tx.send(event("promo")).await.unwrap();
    drop(tx);

    // SQLite reports the lock before the write timeout fires.
    worker.await.unwrap();
    release_write_lock(lock).await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(counters.snapshot().failed, 1);
    assert_eq!(counters.snapshot().recorded, 0);
    assert_eq!(common::count_clicks(&pool, "promo").await, 0);

    writer.close().await;
}

#[sqlx::test]
async fn test_click_service_retry_after_commit_returns_same_id(pool: SqlitePool) {
    let service = ClickService::new(
        Arc::new(SqliteClickRepository::new(Arc::new(pool.clone()))),
        Duration::from_secs(1),
    );

    let click: click_tracker::domain::entities::NewClick = event("promo").into();

    let first = service.record(click.clone()).await.unwrap();
    let second = service.record(click).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(common::count_clicks(&pool, "promo").await, 1);
}

//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts. A `.env` file in the working directory is honoured (loaded by
//! `main.rs` via `dotenvy`).
//!
//! ```bash
//! export ADMIN_TOKEN="change-me"
//! export DATABASE_URL="sqlite://clicks.db"
//! export CLICK_RECORDING_MODE="async"
//! ```
//!
//! ## Required Variables
//!
//! - `ADMIN_TOKEN` - Shared secret for the `/admin` routes (non-empty)
//!
//! ## Optional Variables
//!
//! - `DATABASE_URL` - SQLite URL (default: `sqlite://clicks.db`)
//! - `LISTEN` - Bind address; falls back to `0.0.0.0:$PORT`, then `0.0.0.0:5000`
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `CLICK_RECORDING_MODE` - `async` (queue + worker) or `sync` (default: `async`)
//! - `CLICK_QUEUE_CAPACITY` - Click event buffer size (default: 10000, range: 100-1000000)
//! - `CLICK_WORKER_CONCURRENCY` - Concurrent click writes (default: 4, range: 1-256)
//! - `CLICK_WRITE_TIMEOUT_MS` - Upper bound for one click write (default: 2000)
//! - `CLICK_RETRY_ATTEMPTS` - Attempts per queued click (default: 3)
//! - `ADMIN_RATE_PER_SECOND` / `ADMIN_RATE_BURST` - Admin rate limit per peer IP:
//!   seconds per replenished request and bucket size (default: 2 / 20)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `DB_CONNECT_TIMEOUT` - Pool acquire timeout in seconds (default: 30)
//! - `DB_BUSY_TIMEOUT_MS` - SQLite lock wait (default: 1000); must be below
//!   `CLICK_WRITE_TIMEOUT_MS`

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::api::middleware::rate_limit::RateLimitSettings;
use crate::domain::click_worker::ClickWorkerConfig;
use crate::infrastructure::persistence::PoolSettings;
use crate::state::ClickPipelineSettings;

/// How the redirect handler hands clicks to the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingMode {
    /// Enqueue and return; a background worker writes the click.
    #[default]
    Async,
    /// Await one bounded write before responding.
    Sync,
}

impl FromStr for RecordingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "async" => Ok(Self::Async),
            "sync" => Ok(Self::Sync),
            other => anyhow::bail!(
                "CLICK_RECORDING_MODE must be 'async' or 'sync', got '{}'",
                other
            ),
        }
    }
}

impl fmt::Display for RecordingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Async => f.write_str("async"),
            Self::Sync => f.write_str("sync"),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Shared secret for the admin surface (`ADMIN_TOKEN`).
    pub admin_token: String,
    pub click_recording_mode: RecordingMode,
    pub click_queue_capacity: usize,
    /// Maximum number of click events written concurrently by the background worker.
    pub click_worker_concurrency: usize,
    pub click_write_timeout_ms: u64,
    /// Attempts per queued click, including the first.
    pub click_retry_attempts: usize,
    pub admin_rate_per_second: u64,
    pub admin_rate_burst: u32,

    // ── SqlitePool settings ─────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 10).
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection from the pool in seconds
    /// (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,
    /// How long SQLite waits on a locked database in milliseconds
    /// (`DB_BUSY_TIMEOUT_MS`, default: 1000). Kept below the click write
    /// timeout so a locked write fails inside SQLite instead of committing
    /// after the caller gave up.
    pub db_busy_timeout_ms: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Numeric variables that fail to parse fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `ADMIN_TOKEN` is missing or
    /// `CLICK_RECORDING_MODE` has an unknown value.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://clicks.db".to_string());
        let listen_addr = Self::load_listen_addr();
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let admin_token = env::var("ADMIN_TOKEN").context("ADMIN_TOKEN must be set")?;

        let click_recording_mode = match env::var("CLICK_RECORDING_MODE") {
            Ok(value) => value.parse()?,
            Err(_) => RecordingMode::default(),
        };

        Ok(Self {
            database_url,
            listen_addr,
            log_level,
            log_format,
            admin_token,
            click_recording_mode,
            click_queue_capacity: parse_or("CLICK_QUEUE_CAPACITY", 10_000),
            click_worker_concurrency: parse_or("CLICK_WORKER_CONCURRENCY", 4),
            click_write_timeout_ms: parse_or("CLICK_WRITE_TIMEOUT_MS", 2_000),
            click_retry_attempts: parse_or("CLICK_RETRY_ATTEMPTS", 3),
            admin_rate_per_second: parse_or("ADMIN_RATE_PER_SECOND", 2),
            admin_rate_burst: parse_or("ADMIN_RATE_BURST", 20),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10),
            db_connect_timeout: parse_or("DB_CONNECT_TIMEOUT", 30),
            db_busy_timeout_ms: parse_or("DB_BUSY_TIMEOUT_MS", 1_000),
        })
    }

    /// Resolves the bind address.
    ///
    /// Priority:
    /// 1. `LISTEN`
    /// 2. `0.0.0.0:$PORT`
    /// 3. `0.0.0.0:5000`
    fn load_listen_addr() -> String {
        if let Ok(listen) = env::var("LISTEN") {
            return listen;
        }

        match env::var("PORT") {
            Ok(port) => format!("0.0.0.0:{}", port),
            Err(_) => "0.0.0.0:5000".to_string(),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `click_queue_capacity` is outside 100-1000000
    /// - `click_worker_concurrency` is outside 1-256
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `database_url` is not a SQLite URL
    /// - `admin_token` is empty
    /// - `db_busy_timeout_ms` is not below `click_write_timeout_ms`
    /// - A timeout, attempt count, rate or pool size is zero
    pub fn validate(&self) -> Result<()> {
        if self.click_queue_capacity < 100 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY must be at least 100, got {}",
                self.click_queue_capacity
            );
        }

        if self.click_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY is too large (max: 1000000), got {}",
                self.click_queue_capacity
            );
        }

        if self.click_worker_concurrency == 0 || self.click_worker_concurrency > 256 {
            anyhow::bail!(
                "CLICK_WORKER_CONCURRENCY must be between 1 and 256, got {}",
                self.click_worker_concurrency
            );
        }

        if self.click_write_timeout_ms == 0 {
            anyhow::bail!("CLICK_WRITE_TIMEOUT_MS must be greater than 0");
        }

        if self.db_busy_timeout_ms >= self.click_write_timeout_ms {
            anyhow::bail!(
                "DB_BUSY_TIMEOUT_MS ({}) must be lower than CLICK_WRITE_TIMEOUT_MS ({})",
                self.db_busy_timeout_ms,
                self.click_write_timeout_ms
            );
        }

        if self.click_retry_attempts == 0 {
            anyhow::bail!("CLICK_RETRY_ATTEMPTS must be at least 1");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if self.admin_token.is_empty() {
            anyhow::bail!("ADMIN_TOKEN must not be empty");
        }

        if self.admin_rate_per_second == 0 || self.admin_rate_burst == 0 {
            anyhow::bail!("ADMIN_RATE_PER_SECOND and ADMIN_RATE_BURST must be greater than 0");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    pub fn click_write_timeout(&self) -> Duration {
        Duration::from_millis(self.click_write_timeout_ms)
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_connect_timeout),
            busy_timeout: Duration::from_millis(self.db_busy_timeout_ms),
        }
    }

    pub fn click_worker_config(&self) -> ClickWorkerConfig {
        ClickWorkerConfig {
            concurrency: self.click_worker_concurrency,
            retry_attempts: self.click_retry_attempts,
            ..ClickWorkerConfig::default()
        }
    }

    pub fn admin_rate_limit(&self) -> RateLimitSettings {
        RateLimitSettings {
            per_second: self.admin_rate_per_second,
            burst: self.admin_rate_burst,
        }
    }

    pub fn click_pipeline(&self) -> ClickPipelineSettings {
        ClickPipelineSettings {
            mode: self.click_recording_mode,
            queue_capacity: self.click_queue_capacity,
            write_timeout: self.click_write_timeout(),
            worker: self.click_worker_config(),
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  Admin token: {}", mask_secret(&self.admin_token));
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Click recording mode: {}", self.click_recording_mode);
        tracing::info!("  Click queue capacity: {}", self.click_queue_capacity);
        tracing::info!("  Click worker concurrency: {}", self.click_worker_concurrency);
        tracing::info!("  Click write timeout: {}ms", self.click_write_timeout_ms);
        tracing::info!(
            "  Admin rate limit: 1 request every {}s (burst {})",
            self.admin_rate_per_second,
            self.admin_rate_burst
        );
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn mask_secret(secret: &str) -> String {
    format!("*** ({} chars)", secret.chars().count())
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

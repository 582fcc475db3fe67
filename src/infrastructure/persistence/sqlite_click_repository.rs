//! SQLite implementation of the click log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{Click, ClickId, NewClick};
use crate::domain::repositories::{ClickRepository, LinkClickCount};
use crate::error::AppError;

/// SQLite repository for recorded clicks.
///
/// Ids come from the `AUTOINCREMENT` primary key, so they are never reused
/// and grow across all concurrent writers. Inserts are keyed on `event_key`:
/// recording the same click again returns the id of the stored row.
pub struct SqliteClickRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    clicked_at: DateTime<Utc>,
    slug: String,
    ip: Option<String>,
    user_agent: Option<String>,
    referrer: Option<String>,
    campaign: Option<String>,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click {
            id: r.id,
            clicked_at: r.clicked_at,
            slug: r.slug,
            ip: r.ip,
            user_agent: r.user_agent,
            referrer: r.referrer,
            campaign: r.campaign,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CountRow {
    slug: String,
    destination: String,
    clicks: i64,
}

#[async_trait]
impl ClickRepository for SqliteClickRepository {
    async fn record_click(&self, new_click: NewClick) -> Result<ClickId, AppError> {
        let inserted: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO clicks (event_key, clicked_at, slug, ip, user_agent, referrer, campaign)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(event_key) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&new_click.event_key)
        .bind(new_click.clicked_at)
        .bind(&new_click.slug)
        .bind(&new_click.ip)
        .bind(&new_click.user_agent)
        .bind(&new_click.referrer)
        .bind(&new_click.campaign)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some(id) = inserted {
            return Ok(id);
        }

        // An earlier attempt of this click already landed.
        let id = sqlx::query_scalar("SELECT id FROM clicks WHERE event_key = ?1")
            .bind(&new_click.event_key)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(id)
    }

    async fn counts_by_slug(&self) -> Result<Vec<LinkClickCount>, AppError> {
        let rows = sqlx::query_as::<_, CountRow>(
            r#"
            SELECT l.slug AS slug, l.destination AS destination, COUNT(c.id) AS clicks
            FROM links l
            LEFT JOIN clicks c ON c.slug = l.slug
            GROUP BY l.slug, l.destination
            ORDER BY clicks DESC, l.slug ASC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| LinkClickCount {
                slug: r.slug,
                destination: r.destination,
                clicks: r.clicks,
            })
            .collect())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Click>, AppError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, clicked_at, slug, ip, user_agent, referrer, campaign
            FROM clicks
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clicks")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

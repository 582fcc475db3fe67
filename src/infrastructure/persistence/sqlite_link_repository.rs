//! SQLite implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// SQLite repository for slug → destination mappings.
///
/// Each operation is a single statement, so readers never observe a
/// half-applied upsert.
pub struct SqliteLinkRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    slug: String,
    destination: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.slug,
            r.destination,
            r.description,
            r.created_at,
            r.updated_at,
        )
    }
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn upsert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (slug, destination, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(slug) DO UPDATE SET
                destination = excluded.destination,
                description = excluded.description,
                updated_at = excluded.updated_at
            RETURNING slug, destination, description, created_at, updated_at
            "#,
        )
        .bind(&new_link.slug)
        .bind(&new_link.destination)
        .bind(&new_link.description)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT slug, destination, description, created_at, updated_at
            FROM links
            WHERE slug = ?1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT slug, destination, description, created_at, updated_at
            FROM links
            ORDER BY slug ASC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn remove(&self, slug: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE slug = ?1")
            .bind(slug)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(())
    }
}

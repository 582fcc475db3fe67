//! DTOs for the admin endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};
use std::sync::LazyLock;
use validator::Validate;

use crate::application::services::MAX_RECENT_LIMIT;
use crate::domain::entities::{Click, Link};
use crate::domain::repositories::LinkClickCount;
use crate::error::AppError;

/// Default number of recent clicks on the dashboard.
pub const DEFAULT_RECENT_LIMIT: i64 = 100;

/// Slug characters, tolerating the surrounding whitespace the service trims.
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[A-Za-z0-9_.-]+\s*$").unwrap());

/// Dashboard query parameters.
///
/// `token` is consumed by the auth middleware and ignored here.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

impl DashboardQuery {
    /// Returns the recent-click limit.
    ///
    /// # Defaults
    ///
    /// - `limit`: [`DEFAULT_RECENT_LIMIT`]
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] unless `1 <= limit <= 1000`.
    pub fn recent_limit(&self) -> Result<i64, AppError> {
        let limit = self.limit.unwrap_or(DEFAULT_RECENT_LIMIT);

        if !(1..=MAX_RECENT_LIMIT).contains(&limit) {
            return Err(AppError::bad_request(
                format!("Limit must be between 1 and {}", MAX_RECENT_LIMIT),
                json!({ "limit": limit }),
            ));
        }

        Ok(limit)
    }
}

/// Aggregated click report.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Every registered link with its click count, busiest first.
    pub totals: Vec<LinkTotal>,
    /// Newest clicks first.
    pub recent: Vec<Click>,
    /// All recorded clicks, including those of removed links.
    pub total_clicks: i64,
}

#[derive(Debug, Serialize)]
pub struct LinkTotal {
    pub slug: String,
    pub destination: String,
    pub clicks: i64,
}

impl From<LinkClickCount> for LinkTotal {
    fn from(c: LinkClickCount) -> Self {
        Self {
            slug: c.slug,
            destination: c.destination,
            clicks: c.clicks,
        }
    }
}

/// Form body for `POST /admin/add`.
///
/// Missing fields deserialize as empty and fail validation with a 400.
/// Length and reserved-name rules for the slug are applied by
/// [`crate::application::services::LinkService::upsert`] after trimming.
#[derive(Debug, Deserialize, Validate)]
pub struct AddLinkForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "slug is required"))]
    #[validate(regex(
        path = "*SLUG_REGEX",
        message = "slug may only contain letters, digits, '-', '_' and '.'"
    ))]
    pub slug: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 2048, message = "target_url is required"))]
    pub target_url: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub slug: String,
    pub destination: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            slug: link.slug,
            destination: link.destination,
            description: link.description,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<i64>) -> DashboardQuery {
        DashboardQuery { limit }
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(query(None).recent_limit().unwrap(), DEFAULT_RECENT_LIMIT);
    }

    #[test]
    fn test_limit_bounds() {
        assert_eq!(query(Some(1)).recent_limit().unwrap(), 1);
        assert_eq!(query(Some(1000)).recent_limit().unwrap(), 1000);
        assert!(query(Some(0)).recent_limit().is_err());
        assert!(query(Some(1001)).recent_limit().is_err());
        assert!(query(Some(-5)).recent_limit().is_err());
    }

    #[test]
    fn test_query_parses_limit_from_string() {
        let q: DashboardQuery =
            serde_json::from_value(json!({ "limit": "25", "token": "x" })).unwrap();
        assert_eq!(q.limit, Some(25));
    }

    fn form(slug: &str, target_url: &str) -> AddLinkForm {
        AddLinkForm {
            slug: slug.to_string(),
            target_url: target_url.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_form_valid() {
        assert!(form("promo", "https://example.com").validate().is_ok());
        assert!(form(" promo ", "https://example.com").validate().is_ok());
    }

    #[test]
    fn test_form_missing_fields() {
        assert!(form("", "https://example.com").validate().is_err());
        assert!(form("promo", "").validate().is_err());
    }

    #[test]
    fn test_form_bad_slug_characters() {
        let errors = form("a/b", "https://example.com").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("slug"));
    }
}

//! Handler for the click report.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde_json::json;

use crate::api::dto::admin::{DashboardQuery, DashboardResponse, LinkTotal};
use crate::error::AppError;
use crate::state::AppState;

/// Returns per-link click totals and the most recent clicks.
///
/// # Endpoint
///
/// `GET /admin?limit=100`
///
/// # Query Parameters
///
/// - `limit` (optional): number of recent clicks, 1-1000 (default: 100)
/// - `token` (optional): admin secret, if not sent as a Bearer token
///
/// # Response
///
/// ```json
/// {
///   "totals": [
///     { "slug": "promo", "destination": "https://example.com/b", "clicks": 3 },
///     { "slug": "idle", "destination": "https://example.com/idle", "clicks": 0 }
///   ],
///   "recent": [
///     {
///       "id": 3,
///       "clicked_at": "2025-01-15T10:30:00Z",
///       "slug": "promo",
///       "ip": "203.0.113.7",
///       "user_agent": "Mozilla/5.0",
///       "referrer": null,
///       "campaign": "spring"
///     }
///   ],
///   "total_clicks": 3
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `limit` is not a number in range.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<DashboardResponse>, AppError> {
    let Query(query) = query.map_err(|e| {
        AppError::bad_request(
            "Invalid query parameters",
            json!({ "reason": e.body_text() }),
        )
    })?;

    let limit = query.recent_limit()?;

    let totals = state.click_service.totals().await?;
    let recent = state.click_service.recent(limit).await?;
    let total_clicks = state.click_service.count_all().await?;

    Ok(Json(DashboardResponse {
        totals: totals.into_iter().map(LinkTotal::from).collect(),
        recent,
        total_clicks,
    }))
}

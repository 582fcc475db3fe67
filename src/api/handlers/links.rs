//! Handlers for link management endpoints (list, upsert, remove).

use axum::{
    Form, Json,
    extract::{Path, State, rejection::FormRejection},
    http::StatusCode,
};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::api::dto::admin::{AddLinkForm, LinkListResponse, LinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists every link ordered by slug.
///
/// # Endpoint
///
/// `GET /admin/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_all().await?;

    Ok(Json(LinkListResponse {
        total: links.len(),
        items: links.into_iter().map(LinkResponse::from).collect(),
    }))
}

/// Creates a link or replaces the destination of an existing slug.
///
/// # Endpoint
///
/// `POST /admin/add` (`application/x-www-form-urlencoded`)
///
/// # Form Fields
///
/// - `slug` (required)
/// - `target_url` (required): absolute HTTP(S) URL
/// - `description` (optional)
///
/// # Response
///
/// `200 OK` with `Added/updated {slug} -> {destination}` as plain text.
///
/// # Errors
///
/// Returns 400 Bad Request if the form is malformed, the slug is invalid or
/// reserved, or the target URL is not an absolute HTTP(S) URL.
pub async fn add_link_handler(
    State(state): State<AppState>,
    form: Result<Form<AddLinkForm>, FormRejection>,
) -> Result<String, AppError> {
    let Form(form) = form.map_err(|e| {
        AppError::bad_request("Invalid form body", json!({ "reason": e.body_text() }))
    })?;

    form.validate()?;

    let link = state
        .link_service
        .upsert(&form.slug, &form.target_url, form.description.as_deref())
        .await?;

    info!(slug = %link.slug, destination = %link.destination, "Link upserted");

    Ok(format!("Added/updated {} -> {}", link.slug, link.destination))
}

/// Removes a link. Its recorded clicks are kept.
///
/// # Endpoint
///
/// `DELETE /admin/links/{slug}`
///
/// # Errors
///
/// Returns 404 Not Found if the slug is not registered.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state.link_service.remove(&slug).await?;

    info!(%slug, "Link removed");

    Ok(StatusCode::NO_CONTENT)
}

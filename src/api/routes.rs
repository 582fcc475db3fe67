//! Admin route configuration.
//!
//! All admin endpoints require the shared secret via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    add_link_handler, dashboard_handler, delete_link_handler, list_links_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// All admin routes, protected by the shared secret.
///
/// # Endpoints
///
/// - `GET    /admin`               - Click totals and recent clicks
/// - `GET    /admin/links`         - List links
/// - `POST   /admin/add`           - Create or update a link (form body)
/// - `DELETE /admin/links/{slug}`  - Remove a link, keeping its clicks
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard_handler))
        .route("/admin/links", get(list_links_handler))
        .route("/admin/add", post(add_link_handler))
        .route("/admin/links/{slug}", delete(delete_link_handler))
}

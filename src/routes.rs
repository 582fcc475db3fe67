//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`         - Liveness banner (public)
//! - `GET  /{slug}`   - Redirect and record a click (public)
//! - `GET  /health`   - Health check: DB, click queue, click counters (public)
//! - `/admin*`        - Reporting and link management (shared secret required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on admin routes
//! - **Authentication** - Shared secret on admin routes
//!
//! Trailing-slash normalization is applied around the whole router by
//! [`crate::server::run`].

use crate::api;
use crate::api::handlers::{health_handler, index_handler, redirect_handler};
use crate::api::middleware::rate_limit::{self, RateLimitSettings};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use anyhow::Result;
use axum::routing::get;
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
///
/// Handlers expect `ConnectInfo<SocketAddr>` in request extensions, so the
/// router must be served with `into_make_service_with_connect_info`.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `admin_rate_limit` - token bucket for the admin routes
///
/// # Errors
///
/// Returns an error if the rate limit settings are invalid.
pub fn app_router(state: AppState, admin_rate_limit: RateLimitSettings) -> Result<Router> {
    let admin_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer(admin_rate_limit)?);

    let router = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/{slug}", get(redirect_handler))
        .merge(admin_router)
        .with_state(state)
        .layer(tracing::layer());

    Ok(router)
}

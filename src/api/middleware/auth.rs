//! Admin shared-secret authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Query parameter accepted as an alternative to the `Authorization` header.
pub const TOKEN_PARAM: &str = "token";

/// Authenticates admin requests against the configured shared secret.
///
/// # Token Sources
///
/// ```text
/// Authorization: Bearer <token>
/// GET /admin?token=<token>
/// ```
///
/// The header wins when both are present.
///
/// # Errors
///
/// Returns `401 Unauthorized` if no token is supplied or it does not match.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let admin = Router::new()
///     .route("/admin", get(dashboard_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => Some(token),
        Err(_) => token_from_query(parts.uri.query()),
    }
    .ok_or_else(|| {
        AppError::unauthorized(
            "Unauthorized",
            json!({ "reason": "Admin token is missing" }),
        )
    })?;

    st.auth_service.authenticate(&token)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

fn token_from_query(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
}

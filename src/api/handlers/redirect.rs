//! Handler for slug redirects.
//!
//! This is the public hot path. Visitors only ever see three outcomes:
//! `302` to the destination, `404 Link not found`, or
//! `500 Internal server error`. Error details go to the logs.

use axum::{
    extract::{ConnectInfo, Path, RawQuery, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tracing::{debug, error};

use crate::domain::click_event::ClickEvent;
use crate::state::AppState;
use crate::utils::client_meta;

const NOT_FOUND_BODY: &str = "Link not found";
const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// Redirects a slug to its destination and records the click.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Request Flow
///
/// 1. Resolve the slug through the link service
/// 2. Build a [`ClickEvent`] from the request metadata
/// 3. Dispatch it (queued or written, per recording mode)
/// 4. Return 302 Found with `Location: destination`
///
/// # Click Tracking
///
/// Exactly one click is dispatched per successful redirect and none for an
/// unknown slug. A failed or dropped click never changes the response.
///
/// # Metadata
///
/// - `ip`: `X-Forwarded-For` verbatim if present, else the peer address
/// - `user_agent` / `referrer`: request headers verbatim
/// - `campaign`: first `campaign` query parameter, percent-decoded
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Response {
    let link = match state.link_service.resolve(&slug).await {
        Ok(link) => link,
        Err(e) if e.is_not_found() => {
            debug!(%slug, "Unknown slug");
            return (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response();
        }
        Err(e) => {
            error!(%slug, error = %e, "Link lookup failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response();
        }
    };

    let location = match HeaderValue::from_str(&link.destination) {
        Ok(value) => value,
        Err(e) => {
            error!(%slug, error = %e, "Stored destination is not a valid header value");
            return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response();
        }
    };

    let user_agent = client_meta::user_agent(&headers);
    let referrer = client_meta::referrer(&headers);

    let click_event = ClickEvent::new(
        slug,
        client_meta::client_ip(&headers, Some(addr)),
        user_agent.as_deref(),
        referrer.as_deref(),
        client_meta::campaign(query.as_deref()),
    );

    state.clicks.dispatch(click_event).await;

    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

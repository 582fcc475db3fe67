//! Request metadata captured with each click.
//!
//! All values are untrusted and returned as received. Nothing here parses,
//! trims or validates them beyond decoding bytes to text.

use axum::http::{HeaderMap, HeaderName, header};
use std::net::SocketAddr;

/// Name of the query parameter recorded as the click's campaign tag.
pub const CAMPAIGN_PARAM: &str = "campaign";

/// Returns the client address for a request.
///
/// The `X-Forwarded-For` header wins when present and is returned verbatim,
/// including any proxy chain (`"203.0.113.7, 10.0.0.2"`). Otherwise the peer
/// socket's IP is used.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
///
/// let ip = client_ip(&headers, Some("10.0.0.1:5000".parse().unwrap()));
/// assert_eq!(ip.as_deref(), Some("203.0.113.7"));
/// ```
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    header_text(headers, &HeaderName::from_static("x-forwarded-for"))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

/// Returns the `User-Agent` header as text.
pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    header_text(headers, &header::USER_AGENT)
}

/// Returns the `Referer` header as text.
pub fn referrer(headers: &HeaderMap) -> Option<String> {
    header_text(headers, &header::REFERER)
}

/// Returns the first `campaign` value of a raw query string, percent-decoded.
///
/// `?campaign=a&campaign=b` yields `"a"`; `?campaign=` yields `""`.
pub fn campaign(raw_query: Option<&str>) -> Option<String> {
    let query = raw_query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == CAMPAIGN_PARAM)
        .map(|(_, value)| value.into_owned())
}

// Header bytes that are not UTF-8 are kept with replacement characters
// rather than discarded.
fn header_text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

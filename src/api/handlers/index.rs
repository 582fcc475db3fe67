//! Liveness banner at the root path.

/// `GET /`
pub async fn index_handler() -> &'static str {
    "Click tracker is running"
}

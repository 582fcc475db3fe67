//! Rate limiting middleware using token bucket algorithm.

use anyhow::{Result, anyhow};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Token bucket parameters for the admin routes.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    /// Seconds per replenished token.
    pub per_second: u64,
    pub burst: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            per_second: 2,
            burst: 20,
        }
    }
}

/// Creates the rate limiter for admin endpoints.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Limits apply per peer socket IP; `X-Forwarded-For` is ignored.
///
/// The public redirect path is not rate limited.
///
/// # Errors
///
/// Returns an error if `per_second` or `burst` is zero.
///
/// # Example
///
/// ```rust,ignore
/// let admin = Router::new()
///     .route("/admin/add", post(add_link_handler))
///     .layer(rate_limit::secure_layer(RateLimitSettings::default())?);
/// ```
pub fn secure_layer(
    settings: RateLimitSettings,
) -> Result<GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(settings.per_second)
        .burst_size(settings.burst)
        .finish()
        .ok_or_else(|| {
            anyhow!(
                "Invalid rate limit: per_second={} burst={}",
                settings.per_second,
                settings.burst
            )
        })?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}

//! Click event model passed from the redirect handler to the recorder.

use chrono::{DateTime, Utc};

use crate::domain::entities::{NewClick, new_event_key};

/// An in-memory click captured by the redirect handler.
///
/// The timestamp and `event_key` are taken when the event is created, not
/// when it is persisted, so queue latency does not skew `clicked_at` and every
/// retry of the write carries the same key.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler with request metadata
/// 2. Handed to [`crate::application::services::ClickDispatcher`]
/// 3. Queued for [`crate::domain::click_worker::run_click_worker`] or written
///    directly, depending on the recording mode
/// 4. Converted to [`NewClick`] for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub event_key: String,
    pub slug: String,
    pub clicked_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub campaign: Option<String>,
}

impl ClickEvent {
    /// Creates a new click event stamped with the current UTC time.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     "promo".to_string(),
    ///     Some("192.168.1.1".to_string()),
    ///     Some("Mozilla/5.0"),
    ///     Some("https://google.com"),
    ///     Some("spring".to_string()),
    /// );
    /// ```
    pub fn new(
        slug: String,
        ip: Option<String>,
        user_agent: Option<&str>,
        referrer: Option<&str>,
        campaign: Option<String>,
    ) -> Self {
        Self {
            event_key: new_event_key(),
            slug,
            clicked_at: Utc::now(),
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referrer: referrer.map(|s| s.to_string()),
            campaign,
        }
    }
}

impl From<ClickEvent> for NewClick {
    fn from(ev: ClickEvent) -> Self {
        NewClick {
            event_key: ev.event_key,
            slug: ev.slug,
            clicked_at: ev.clicked_at,
            ip: ev.ip,
            user_agent: ev.user_agent,
            referrer: ev.referrer,
            campaign: ev.campaign,
        }
    }
}

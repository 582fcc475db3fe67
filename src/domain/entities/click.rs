//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Store-assigned click identifier. Strictly increasing across all writers.
pub type ClickId = i64;

/// A recorded visit.
///
/// `ip`, `user_agent`, `referrer` and `campaign` come straight from the
/// request and are stored byte-for-byte; nothing downstream may interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Click {
    pub id: ClickId,
    pub clicked_at: DateTime<Utc>,
    pub slug: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub campaign: Option<String>,
}

/// Input data for recording a click.
///
/// `slug` is a soft reference: the recorder does not check that the link
/// exists, and clicks survive removal of their link.
///
/// `event_key` identifies the visit. Writing the same `NewClick` twice
/// stores one row, so a write that timed out can be retried safely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub event_key: String,
    pub slug: String,
    pub clicked_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub campaign: Option<String>,
}

impl NewClick {
    /// Creates a click stamped with the current time and no request metadata.
    pub fn bare(slug: impl Into<String>) -> Self {
        Self {
            event_key: new_event_key(),
            slug: slug.into(),
            clicked_at: Utc::now(),
            ip: None,
            user_agent: None,
            referrer: None,
            campaign: None,
        }
    }
}

/// Mints a fresh idempotency key for a click.
pub fn new_event_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_click_has_no_metadata() {
        let before = Utc::now();
        let click = NewClick::bare("promo");

        assert_eq!(click.slug, "promo");
        assert!(click.clicked_at >= before);
        assert!(click.ip.is_none());
        assert!(click.user_agent.is_none());
        assert!(click.referrer.is_none());
        assert!(click.campaign.is_none());
    }

    #[test]
    fn test_each_click_gets_its_own_event_key() {
        let a = NewClick::bare("promo");
        let b = NewClick::bare("promo");

        assert_ne!(a.event_key, b.event_key);
    }

    #[test]
    fn test_click_serializes_metadata_verbatim() {
        let click = Click {
            id: 7,
            clicked_at: Utc::now(),
            slug: "promo".to_string(),
            ip: Some("10.0.0.1".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
            referrer: None,
            campaign: Some("<script>alert(1)</script>".to_string()),
        };

        let value = serde_json::to_value(&click).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["campaign"], "<script>alert(1)</script>");
        assert!(value["referrer"].is_null());
    }
}

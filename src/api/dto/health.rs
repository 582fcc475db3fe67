//! DTOs for health check endpoint.

use serde::Serialize;

use crate::application::services::QueueStatus;
use crate::domain::click_counters::ClickCountersSnapshot;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
    /// Click outcomes since process start.
    pub clicks: ClickCountersSnapshot,
}

/// Health status for each system component.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub click_queue: QueueCheck,
}

/// Individual component health status.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Click queue status together with its occupancy.
#[derive(Debug, Serialize)]
pub struct QueueCheck {
    #[serde(flatten)]
    pub check: CheckStatus,

    #[serde(flatten)]
    pub queue: QueueStatus,
}

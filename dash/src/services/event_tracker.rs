//! Analytics events

use chrono::{DateTime, Utc};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackedEvent {
    ApiError {
        request_id: Option<String>,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

impl TrackedEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TrackedEvent::ApiError { .. } => "API_ERROR",
        }
    }
}

pub trait EventTracker: Send + Sync {
    fn track(&self, event: TrackedEvent);
}

pub struct TracingEventTracker;

impl EventTracker for TracingEventTracker {
    fn track(&self, event: TrackedEvent) {
        match &event {
            TrackedEvent::ApiError {
                request_id,
                error_message,
                timestamp,
            } => info!(
                event = event.name(),
                request_id = request_id.as_deref().unwrap_or("-"),
                timestamp = %timestamp.to_rfc2822(),
                "{}",
                error_message
            ),
        }
    }
}

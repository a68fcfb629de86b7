//! User-facing notifications

use chrono::{DateTime, Utc};
use tracing::warn;

/// An error toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short title; the backend error code when there is one
    pub message: String,
    /// Error message, followed by request id and timestamp when known
    pub description: String,
    pub request_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn error(
        message: String,
        error_message: String,
        request_id: Option<String>,
        time: DateTime<Utc>,
    ) -> Self {
        match request_id {
            Some(id) => Self {
                message,
                description: format!(
                    "Error Message: {}\nRequest ID: {}\nTimestamp: {}",
                    error_message,
                    id,
                    time.to_rfc2822()
                ),
                request_id: Some(id),
                timestamp: Some(time),
            },
            None => Self {
                message,
                description: error_message,
                request_id: None,
                timestamp: None,
            },
        }
    }
}

pub trait Notifier: Send + Sync {
    fn error(&self, notification: Notification);
}

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, notification: Notification) {
        warn!("{}: {}", notification.message, notification.description);
    }
}

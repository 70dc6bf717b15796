use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::webhook::WebhookRequest;

/// A dead-letter queue entry: the original webhook payload, plus the error
/// that caused it to be postponed (if any).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
    pub payload: WebhookRequest,
    #[serde(default)]
    pub error: Option<SyncError>,
    pub enqueued_at: DateTime<Utc>,
}

impl QueueItem {
    #[must_use]
    pub fn postponed(payload: WebhookRequest, enqueued_at: DateTime<Utc>) -> Self {
        Self {
            payload,
            error: None,
            enqueued_at,
        }
    }

    #[must_use]
    pub fn failed(payload: WebhookRequest, error: SyncError, enqueued_at: DateTime<Utc>) -> Self {
        Self {
            payload,
            error: Some(error),
            enqueued_at,
        }
    }

    /// `event.time`, authoritative for per-bug FIFO ordering.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.payload.event.time
    }

    /// `{event.time}-{bug.id}-{event.action}-{"error"|"postponed"}`, also
    /// used as the on-disk filename stem so lexicographic sort matches
    /// `(event.time, bug.id, action, kind)` ordering.
    #[must_use]
    pub fn identifier(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true),
            self.payload.bug.id,
            self.payload.event.action.as_str(),
            if self.error.is_some() {
                "error"
            } else {
                "postponed"
            }
        )
    }
}

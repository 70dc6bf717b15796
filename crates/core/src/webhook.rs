use serde::{Deserialize, Serialize};

use crate::bug::Bug;
use crate::event::Event;

/// The parsed envelope of a source-tracker webhook notification.
///
/// `(bug.id, event.time)` is the logical key used for deduplication and
/// ordering throughout the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookRequest {
    pub webhook_id: u64,
    pub webhook_name: String,
    pub bug: Bug,
    pub event: Event,
}

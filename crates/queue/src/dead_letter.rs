use std::collections::HashMap;

use chrono::{DateTime, Utc};
use issuesync_core::{BugId, QueueItem, SyncError, WebhookRequest};

use crate::backend::QueueBackend;
use crate::error::{InvalidQueueDsn, QueueError};
use crate::filesystem::FilesystemQueueBackend;

/// Front door onto a `QueueBackend`: the postpone/track-failed/is-blocked
/// vocabulary the webhook intake and retry worker actually call,
/// independent of which backend is plugged in.
pub struct DeadLetterQueue {
    backend: Box<dyn QueueBackend>,
}

impl DeadLetterQueue {
    #[must_use]
    pub fn new(backend: Box<dyn QueueBackend>) -> Self {
        Self { backend }
    }

    /// Parses a `file://` DSN and builds a filesystem-backed queue.
    /// Unknown schemes fail startup with `InvalidQueueDsn`.
    pub async fn from_dsn(dsn: &str) -> Result<Self, InvalidQueueDsnOrIo> {
        let Some(path) = dsn.strip_prefix("file://") else {
            let scheme = dsn.split_once("://").map_or(dsn, |(s, _)| s).to_owned();
            return Err(InvalidQueueDsnOrIo::Dsn(InvalidQueueDsn::UnsupportedScheme(
                scheme,
            )));
        };
        if path.is_empty() {
            return Err(InvalidQueueDsnOrIo::Dsn(InvalidQueueDsn::MissingPath(
                dsn.to_owned(),
            )));
        }
        let backend = FilesystemQueueBackend::new(path)
            .await
            .map_err(InvalidQueueDsnOrIo::Io)?;
        Ok(Self::new(Box::new(backend)))
    }

    /// Postpones live processing of `payload`: append it to the queue
    /// unconditionally.
    pub async fn postpone(
        &self,
        payload: WebhookRequest,
        now: DateTime<Utc>,
    ) -> Result<(), QueueError> {
        self.backend.put(QueueItem::postponed(payload, now)).await
    }

    /// Records a failed live-processing attempt for later retry.
    pub async fn track_failed(
        &self,
        payload: WebhookRequest,
        error: SyncError,
        now: DateTime<Utc>,
    ) -> Result<(), QueueError> {
        self.backend.put(QueueItem::failed(payload, error, now)).await
    }

    /// Whether a bug already has queued items, meaning a new live request for
    /// it must be postponed rather than processed.
    pub async fn is_blocked(&self, bug_id: BugId) -> Result<bool, QueueError> {
        Ok(self.backend.size(Some(bug_id)).await? > 0)
    }

    /// Marks `item` as successfully processed, removing it from the queue.
    pub async fn done(&self, item: &QueueItem) -> Result<(), QueueError> {
        self.backend
            .remove(item.payload.bug.id, &item.identifier())
            .await
    }

    pub async fn ping(&self) -> bool {
        self.backend.ping().await
    }

    pub async fn clear(&self) -> Result<(), QueueError> {
        self.backend.clear().await
    }

    pub async fn get_all(&self) -> Result<HashMap<BugId, Vec<QueueItem>>, QueueError> {
        self.backend.get_all().await
    }

    pub async fn list(&self, bug_id: BugId) -> Result<Vec<String>, QueueError> {
        self.backend.list(bug_id).await
    }

    pub async fn list_all(&self) -> Result<HashMap<BugId, Vec<String>>, QueueError> {
        self.backend.list_all().await
    }

    pub async fn size(&self, bug_id: Option<BugId>) -> Result<usize, QueueError> {
        self.backend.size(bug_id).await
    }

    pub async fn remove(&self, bug_id: BugId, identifier: &str) -> Result<(), QueueError> {
        self.backend.remove(bug_id, identifier).await
    }
}

/// Union of the two ways `from_dsn` can fail: a bad DSN, or an I/O failure
/// standing up the backend it names.
#[derive(Debug, thiserror::Error)]
pub enum InvalidQueueDsnOrIo {
    #[error(transparent)]
    Dsn(#[from] InvalidQueueDsn),

    #[error(transparent)]
    Io(#[from] QueueError),
}

#[cfg(test)]
mod tests {
    use issuesync_core::{Bug, BugId, Event, EventAction, EventTarget, EventUser};

    use super::*;
    use crate::memory::MemoryQueueBackend;

    fn payload(bug_id: u64) -> WebhookRequest {
        WebhookRequest {
            webhook_id: 1,
            webhook_name: "bugzilla".into(),
            bug: Bug {
                id: BugId(bug_id),
                summary: String::new(),
                status: String::new(),
                resolution: String::new(),
                assigned_to: String::new(),
                whiteboard: String::new(),
                see_also: Vec::new(),
                is_private: false,
                comment: None,
                component: String::new(),
                product: String::new(),
                priority: String::new(),
                severity: String::new(),
            },
            event: Event {
                action: EventAction::Modify,
                time: Utc::now(),
                user: EventUser { login: "a@b.com".into() },
                changes: Vec::new(),
                target: EventTarget::Bug,
                routing_key: None,
            },
        }
    }

    #[tokio::test]
    async fn is_blocked_reflects_queue_contents() {
        let dlq = DeadLetterQueue::new(Box::new(MemoryQueueBackend::new()));
        assert!(!dlq.is_blocked(BugId(1)).await.unwrap());
        dlq.postpone(payload(1), Utc::now()).await.unwrap();
        assert!(dlq.is_blocked(BugId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn done_removes_the_item() {
        let dlq = DeadLetterQueue::new(Box::new(MemoryQueueBackend::new()));
        dlq.postpone(payload(1), Utc::now()).await.unwrap();
        let items = dlq.get_all().await.unwrap();
        let item = &items[&BugId(1)][0];
        dlq.done(item).await.unwrap();
        assert!(!dlq.is_blocked(BugId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn from_dsn_rejects_unknown_scheme() {
        let err = DeadLetterQueue::from_dsn("redis://localhost").await.unwrap_err();
        assert!(matches!(err, InvalidQueueDsnOrIo::Dsn(InvalidQueueDsn::UnsupportedScheme(s)) if s == "redis"));
    }

    #[tokio::test]
    async fn from_dsn_accepts_file_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let dsn = format!("file://{}", dir.path().display());
        let dlq = DeadLetterQueue::from_dsn(&dsn).await.unwrap();
        assert!(dlq.ping().await);
    }
}

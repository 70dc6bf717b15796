use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use issuesync_core::{BugId, QueueItem};

use crate::backend::QueueBackend;
use crate::error::QueueError;

/// In-memory queue backend for tests and the worker's own unit tests. Mirrors
/// `FilesystemQueueBackend`'s ordering contract without touching disk.
#[derive(Default)]
pub struct MemoryQueueBackend {
    items: Mutex<HashMap<BugId, Vec<QueueItem>>>,
}

impl MemoryQueueBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueueBackend for MemoryQueueBackend {
    async fn ping(&self) -> bool {
        true
    }

    async fn clear(&self) -> Result<(), QueueError> {
        self.items.lock().unwrap().clear();
        Ok(())
    }

    async fn put(&self, item: QueueItem) -> Result<(), QueueError> {
        let mut items = self.items.lock().unwrap();
        let bucket = items.entry(item.payload.bug.id).or_default();
        bucket.push(item);
        bucket.sort_by_key(|i| (i.timestamp(), i.identifier()));
        Ok(())
    }

    async fn remove(&self, bug_id: BugId, identifier: &str) -> Result<(), QueueError> {
        let mut items = self.items.lock().unwrap();
        if let Some(bucket) = items.get_mut(&bug_id) {
            bucket.retain(|i| i.identifier() != identifier);
            if bucket.is_empty() {
                items.remove(&bug_id);
            }
        }
        Ok(())
    }

    async fn get(&self, bug_id: BugId) -> Result<Vec<QueueItem>, QueueError> {
        Ok(self.items.lock().unwrap().get(&bug_id).cloned().unwrap_or_default())
    }

    async fn get_all(&self) -> Result<HashMap<BugId, Vec<QueueItem>>, QueueError> {
        Ok(self.items.lock().unwrap().clone())
    }

    async fn list(&self, bug_id: BugId) -> Result<Vec<String>, QueueError> {
        Ok(self.get(bug_id).await?.iter().map(QueueItem::identifier).collect())
    }

    async fn list_all(&self) -> Result<HashMap<BugId, Vec<String>>, QueueError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .map(|(bug_id, items)| {
                (bug_id, items.iter().map(QueueItem::identifier).collect())
            })
            .collect())
    }

    async fn size(&self, bug_id: Option<BugId>) -> Result<usize, QueueError> {
        match bug_id {
            Some(bug_id) => Ok(self.get(bug_id).await?.len()),
            None => Ok(self.items.lock().unwrap().values().map(Vec::len).sum()),
        }
    }
}

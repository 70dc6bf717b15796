use std::collections::HashMap;

use async_trait::async_trait;
use issuesync_core::{BugId, QueueItem};

use crate::error::QueueError;

/// Persistent, per-bug ordered store of pending dead-letter items.
/// Implementations must guarantee that, for a given bug,
/// items come back from `get`/`get_all` in ascending `(timestamp, identifier)`
/// order.
#[async_trait]
pub trait QueueBackend: Send + Sync {
    /// Proves writability without corrupting existing state.
    async fn ping(&self) -> bool;

    /// Remove everything. Test/admin use only.
    async fn clear(&self) -> Result<(), QueueError>;

    /// Append `item`, preserving per-bug ordering.
    async fn put(&self, item: QueueItem) -> Result<(), QueueError>;

    /// Remove one item. Idempotent: removing an absent item is not an error.
    /// Removing the last item for a bug also removes the bug's container.
    async fn remove(&self, bug_id: BugId, identifier: &str) -> Result<(), QueueError>;

    /// All items queued for one bug, ascending `(timestamp, identifier)`.
    /// A corrupt item is logged and skipped rather than aborting the read.
    async fn get(&self, bug_id: BugId) -> Result<Vec<QueueItem>, QueueError>;

    /// All items in the queue, grouped by bug. Iteration order across bugs
    /// is unspecified; within a bug, ascending `(timestamp, identifier)`.
    async fn get_all(&self) -> Result<HashMap<BugId, Vec<QueueItem>>, QueueError>;

    /// Identifiers queued for one bug, in the same order as `get`.
    async fn list(&self, bug_id: BugId) -> Result<Vec<String>, QueueError>;

    /// Identifiers for every bug in the queue.
    async fn list_all(&self) -> Result<HashMap<BugId, Vec<String>>, QueueError>;

    /// Count of queued items, optionally filtered to one bug.
    async fn size(&self, bug_id: Option<BugId>) -> Result<usize, QueueError>;
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use issuesync_core::{BugId, QueueItem};
use tokio::fs;

use crate::backend::QueueBackend;
use crate::error::QueueError;

/// Filesystem-backed queue: one directory per bug id under `root`, one file
/// per item named `<identifier>.json`. Ordering derives
/// from lexicographic filename sort, which by construction matches
/// `(event.time, bug.id, action, kind)` because `QueueItem::identifier`
/// leads with an RFC3339 millisecond timestamp.
pub struct FilesystemQueueBackend {
    root: PathBuf,
}

impl FilesystemQueueBackend {
    /// Creates `root` (and parents) if it does not already exist.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, QueueError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn bug_dir(&self, bug_id: BugId) -> PathBuf {
        self.root.join(bug_id.get().to_string())
    }

    fn item_path(&self, bug_id: BugId, identifier: &str) -> PathBuf {
        self.bug_dir(bug_id).join(format!("{identifier}.json"))
    }

    /// Reads every `*.json` file under `dir` in filename order, logging and
    /// skipping any that fail to parse rather than aborting the read.
    async fn read_sorted(dir: &Path) -> Result<Vec<QueueItem>, QueueError> {
        let mut names = Vec::new();
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                names.push(path);
            }
        }
        names.sort();

        let mut items = Vec::with_capacity(names.len());
        for path in names {
            let raw = fs::read_to_string(&path).await?;
            match serde_json::from_str::<QueueItem>(&raw) {
                Ok(item) => items.push(item),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping corrupt queue item");
                }
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl QueueBackend for FilesystemQueueBackend {
    async fn ping(&self) -> bool {
        let probe = self.root.join(".ping");
        match fs::write(&probe, b"").await {
            Ok(()) => {
                let _ = fs::remove_file(&probe).await;
                true
            }
            Err(err) => {
                tracing::warn!(%err, "queue backend failed writability check");
                false
            }
        }
    }

    async fn clear(&self) -> Result<(), QueueError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                fs::remove_dir_all(entry.path()).await?;
            } else {
                fs::remove_file(entry.path()).await?;
            }
        }
        Ok(())
    }

    async fn put(&self, item: QueueItem) -> Result<(), QueueError> {
        let bug_id = item.payload.bug.id;
        let dir = self.bug_dir(bug_id);
        fs::create_dir_all(&dir).await?;
        let path = self.item_path(bug_id, &item.identifier());
        let body = serde_json::to_string(&item).expect("QueueItem always serializes");
        fs::write(&path, body).await?;
        tracing::debug!(bug_id = %bug_id, path = %path.display(), "wrote queue item");
        Ok(())
    }

    async fn remove(&self, bug_id: BugId, identifier: &str) -> Result<(), QueueError> {
        let path = self.item_path(bug_id, identifier);
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        let dir = self.bug_dir(bug_id);
        if let Ok(mut entries) = fs::read_dir(&dir).await {
            if entries.next_entry().await?.is_none() {
                let _ = fs::remove_dir(&dir).await;
            }
        }
        Ok(())
    }

    async fn get(&self, bug_id: BugId) -> Result<Vec<QueueItem>, QueueError> {
        Self::read_sorted(&self.bug_dir(bug_id)).await
    }

    async fn get_all(&self) -> Result<HashMap<BugId, Vec<QueueItem>>, QueueError> {
        let mut result = HashMap::new();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(result),
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let Some(bug_id) = entry
                .file_name()
                .to_str()
                .and_then(|s| s.parse::<u64>().ok())
                .map(BugId)
            else {
                continue;
            };
            let items = Self::read_sorted(&entry.path()).await?;
            result.insert(bug_id, items);
        }
        Ok(result)
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
            None => Ok(self.get_all().await?.values().map(Vec::len).sum()),
        }
    }
}

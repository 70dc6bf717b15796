use async_trait::async_trait;
use issuesync_core::{Bug, BugId, Comment};

use crate::error::ClientError;

/// Strongly-typed client over the source (Bugzilla-like) tracker, with native
/// `async fn` methods. Not object-safe; see [`DynSourceTrackerClient`] for the
/// `dyn`-compatible counterpart, implemented automatically via a blanket impl.
pub trait SourceTrackerClient: Send + Sync {
    /// Re-fetch a bug by id, used to get a consistent view before
    /// `maybe_delete_duplicate` decides whether to delete a freshly created
    /// issue.
    fn get_bug(
        &self,
        id: BugId,
    ) -> impl std::future::Future<Output = Result<Bug, ClientError>> + Send;

    /// Fetch all comments on a bug, oldest first. Used by `create_issue` to
    /// source the Jira issue description from the first comment.
    fn get_comments(
        &self,
        id: BugId,
    ) -> impl std::future::Future<Output = Result<Vec<Comment>, ClientError>> + Send;

    /// Apply a partial field update to a bug (e.g. appending a see-also URL).
    fn update_bug(
        &self,
        id: BugId,
        fields: serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;
}

/// Object-safe counterpart of [`SourceTrackerClient`], for use behind
/// `Arc<dyn DynSourceTrackerClient>`.
#[async_trait]
pub trait DynSourceTrackerClient: Send + Sync {
    async fn get_bug(&self, id: BugId) -> Result<Bug, ClientError>;
    async fn get_comments(&self, id: BugId) -> Result<Vec<Comment>, ClientError>;
    async fn update_bug(&self, id: BugId, fields: serde_json::Value) -> Result<(), ClientError>;
}

#[async_trait]
impl<T: SourceTrackerClient + Sync> DynSourceTrackerClient for T {
    async fn get_bug(&self, id: BugId) -> Result<Bug, ClientError> {
        SourceTrackerClient::get_bug(self, id).await
    }

    async fn get_comments(&self, id: BugId) -> Result<Vec<Comment>, ClientError> {
        SourceTrackerClient::get_comments(self, id).await
    }

    async fn update_bug(&self, id: BugId, fields: serde_json::Value) -> Result<(), ClientError> {
        SourceTrackerClient::update_bug(self, id, fields).await
    }
}

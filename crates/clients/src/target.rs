use async_trait::async_trait;
use issuesync_core::IssueKey;

use crate::error::ClientError;

/// Strongly-typed client over the target (Jira-like) tracker, with native
/// `async fn` methods. Not object-safe; see [`DynTargetTrackerClient`].
pub trait TargetTrackerClient: Send + Sync {
    /// Create an issue from a field payload and return its key.
    fn create_issue(
        &self,
        fields: serde_json::Value,
    ) -> impl std::future::Future<Output = Result<IssueKey, ClientError>> + Send;

    /// Fetch an issue's current field payload, or `None` if it no longer
    /// exists. Used by `maybe_delete_duplicate`.
    fn get_issue(
        &self,
        issue: &IssueKey,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, ClientError>> + Send;

    /// Apply a partial field update (summary, labels, components, ...).
    fn update_issue_fields(
        &self,
        issue: &IssueKey,
        fields: serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Transition the issue to a new workflow status.
    fn set_issue_status(
        &self,
        issue: &IssueKey,
        status: &str,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Set the issue resolution.
    fn set_issue_resolution(
        &self,
        issue: &IssueKey,
        resolution: &str,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Append a comment.
    fn add_comment(
        &self,
        issue: &IssueKey,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Add a remote link (used to point the Jira issue back at the
    /// Bugzilla ticket).
    fn add_remote_link(
        &self,
        issue: &IssueKey,
        url: &str,
        title: &str,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Resolve a tracker assignee account id from an email address, or
    /// `None` if no matching user exists.
    fn find_user(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, ClientError>> + Send;

    /// Assign the issue to a resolved account id.
    fn assign_user(
        &self,
        issue: &IssueKey,
        account_id: &str,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Clear the issue's assignee.
    fn clear_assignee(
        &self,
        issue: &IssueKey,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Delete an issue (used when two issues were created for the same bug).
    fn delete_issue(
        &self,
        issue: &IssueKey,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;
}

/// Object-safe counterpart of [`TargetTrackerClient`], for use behind
/// `Arc<dyn DynTargetTrackerClient>`.
#[async_trait]
pub trait DynTargetTrackerClient: Send + Sync {
    async fn create_issue(&self, fields: serde_json::Value) -> Result<IssueKey, ClientError>;
    async fn get_issue(
        &self,
        issue: &IssueKey,
    ) -> Result<Option<serde_json::Value>, ClientError>;
    async fn update_issue_fields(
        &self,
        issue: &IssueKey,
        fields: serde_json::Value,
    ) -> Result<(), ClientError>;
    async fn set_issue_status(&self, issue: &IssueKey, status: &str) -> Result<(), ClientError>;
    async fn set_issue_resolution(
        &self,
        issue: &IssueKey,
        resolution: &str,
    ) -> Result<(), ClientError>;
    async fn add_comment(&self, issue: &IssueKey, text: &str) -> Result<(), ClientError>;
    async fn add_remote_link(
        &self,
        issue: &IssueKey,
        url: &str,
        title: &str,
    ) -> Result<(), ClientError>;
    async fn find_user(&self, email: &str) -> Result<Option<String>, ClientError>;
    async fn assign_user(&self, issue: &IssueKey, account_id: &str) -> Result<(), ClientError>;
    async fn clear_assignee(&self, issue: &IssueKey) -> Result<(), ClientError>;
    async fn delete_issue(&self, issue: &IssueKey) -> Result<(), ClientError>;
}

#[async_trait]
impl<T: TargetTrackerClient + Sync> DynTargetTrackerClient for T {
    async fn create_issue(&self, fields: serde_json::Value) -> Result<IssueKey, ClientError> {
        TargetTrackerClient::create_issue(self, fields).await
    }

    async fn get_issue(
        &self,
        issue: &IssueKey,
    ) -> Result<Option<serde_json::Value>, ClientError> {
        TargetTrackerClient::get_issue(self, issue).await
    }

    async fn update_issue_fields(
        &self,
        issue: &IssueKey,
        fields: serde_json::Value,
    ) -> Result<(), ClientError> {
        TargetTrackerClient::update_issue_fields(self, issue, fields).await
    }

    async fn set_issue_status(&self, issue: &IssueKey, status: &str) -> Result<(), ClientError> {
        TargetTrackerClient::set_issue_status(self, issue, status).await
    }

    async fn set_issue_resolution(
        &self,
        issue: &IssueKey,
        resolution: &str,
    ) -> Result<(), ClientError> {
        TargetTrackerClient::set_issue_resolution(self, issue, resolution).await
    }

    async fn add_comment(&self, issue: &IssueKey, text: &str) -> Result<(), ClientError> {
        TargetTrackerClient::add_comment(self, issue, text).await
    }

    async fn add_remote_link(
        &self,
        issue: &IssueKey,
        url: &str,
        title: &str,
    ) -> Result<(), ClientError> {
        TargetTrackerClient::add_remote_link(self, issue, url, title).await
    }

    async fn find_user(&self, email: &str) -> Result<Option<String>, ClientError> {
        TargetTrackerClient::find_user(self, email).await
    }

    async fn assign_user(&self, issue: &IssueKey, account_id: &str) -> Result<(), ClientError> {
        TargetTrackerClient::assign_user(self, issue, account_id).await
    }

    async fn clear_assignee(&self, issue: &IssueKey) -> Result<(), ClientError> {
        TargetTrackerClient::clear_assignee(self, issue).await
    }

    async fn delete_issue(&self, issue: &IssueKey) -> Result<(), ClientError> {
        TargetTrackerClient::delete_issue(self, issue).await
    }
}

//! In-memory fakes standing in for the real Bugzilla/Jira REST clients.
//!
//! Client wrappers over the two tracker REST APIs are explicitly out of
//! scope for this crate; these fakes back the pipeline and runner tests
//! instead of a `reqwest`-based implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use issuesync_core::{Bug, BugId, Comment, IssueKey};

use crate::error::ClientError;
use crate::source::SourceTrackerClient;
use crate::target::TargetTrackerClient;

/// An in-memory stand-in for the source tracker, keyed by bug id.
#[derive(Default)]
pub struct FakeSourceTrackerClient {
    bugs: Mutex<HashMap<u64, Bug>>,
    comments: Mutex<HashMap<u64, Vec<Comment>>>,
}

impl FakeSourceTrackerClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_bug(&self, bug: Bug) {
        self.bugs.lock().unwrap().insert(bug.id.get(), bug);
    }

    pub fn seed_comments(&self, id: BugId, comments: Vec<Comment>) {
        self.comments.lock().unwrap().insert(id.get(), comments);
    }
}

impl SourceTrackerClient for FakeSourceTrackerClient {
    async fn get_bug(&self, id: BugId) -> Result<Bug, ClientError> {
        self.bugs
            .lock()
            .unwrap()
            .get(&id.get())
            .cloned()
            .ok_or_else(|| ClientError::NotFound(id.to_string()))
    }

    async fn get_comments(&self, id: BugId) -> Result<Vec<Comment>, ClientError> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .get(&id.get())
            .cloned()
            .unwrap_or_default())
    }

    async fn update_bug(&self, id: BugId, fields: serde_json::Value) -> Result<(), ClientError> {
        let mut bugs = self.bugs.lock().unwrap();
        let bug = bugs
            .get_mut(&id.get())
            .ok_or_else(|| ClientError::NotFound(id.to_string()))?;
        if let Some(see_also) = fields.get("see_also").and_then(|v| v.as_array()) {
            for url in see_also {
                if let Some(url) = url.as_str() {
                    if !bug.see_also.iter().any(|existing| existing == url) {
                        bug.see_also.push(url.to_owned());
                    }
                }
            }
        }
        Ok(())
    }
}

struct FakeIssue {
    fields: serde_json::Value,
    status: Option<String>,
    resolution: Option<String>,
    assignee: Option<String>,
    comments: Vec<String>,
    remote_links: Vec<(String, String)>,
    deleted: bool,
}

/// An in-memory stand-in for the target tracker, auto-assigning
/// `FAKE-<n>` keys in creation order.
pub struct FakeTargetTrackerClient {
    issues: Mutex<HashMap<String, FakeIssue>>,
    next_id: Mutex<u64>,
    users: Mutex<HashMap<String, String>>,
}

impl Default for FakeTargetTrackerClient {
    fn default() -> Self {
        Self {
            issues: Mutex::new(HashMap::new()),
            next_id: Mutex::new(1),
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl FakeTargetTrackerClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an email -> account-id mapping resolvable via `find_user`.
    pub fn seed_user(&self, email: impl Into<String>, account_id: impl Into<String>) {
        self.users
            .lock()
            .unwrap()
            .insert(email.into(), account_id.into());
    }

    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.issues.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_deleted(&self, issue: &IssueKey) -> bool {
        self.issues
            .lock()
            .unwrap()
            .get(issue.as_str())
            .is_some_and(|i| i.deleted)
    }

    #[must_use]
    pub fn assignee(&self, issue: &IssueKey) -> Option<String> {
        self.issues
            .lock()
            .unwrap()
            .get(issue.as_str())
            .and_then(|i| i.assignee.clone())
    }

    #[must_use]
    pub fn status(&self, issue: &IssueKey) -> Option<String> {
        self.issues
            .lock()
            .unwrap()
            .get(issue.as_str())
            .and_then(|i| i.status.clone())
    }

    #[must_use]
    pub fn resolution(&self, issue: &IssueKey) -> Option<String> {
        self.issues
            .lock()
            .unwrap()
            .get(issue.as_str())
            .and_then(|i| i.resolution.clone())
    }

    #[must_use]
    pub fn comments(&self, issue: &IssueKey) -> Vec<String> {
        self.issues
            .lock()
            .unwrap()
            .get(issue.as_str())
            .map(|i| i.comments.clone())
            .unwrap_or_default()
    }
}

impl TargetTrackerClient for FakeTargetTrackerClient {
    async fn create_issue(&self, fields: serde_json::Value) -> Result<IssueKey, ClientError> {
        let mut next_id = self.next_id.lock().unwrap();
        let key = IssueKey::new(format!("FAKE-{next_id}"));
        *next_id += 1;
        self.issues.lock().unwrap().insert(
            key.as_str().to_owned(),
            FakeIssue {
                fields,
                status: None,
                resolution: None,
                assignee: None,
                comments: Vec::new(),
                remote_links: Vec::new(),
                deleted: false,
            },
        );
        Ok(key)
    }

    async fn get_issue(
        &self,
        issue: &IssueKey,
    ) -> Result<Option<serde_json::Value>, ClientError> {
        Ok(self
            .issues
            .lock()
            .unwrap()
            .get(issue.as_str())
            .filter(|i| !i.deleted)
            .map(|i| i.fields.clone()))
    }

    async fn update_issue_fields(
        &self,
        issue: &IssueKey,
        fields: serde_json::Value,
    ) -> Result<(), ClientError> {
        let mut issues = self.issues.lock().unwrap();
        let entry = issues
            .get_mut(issue.as_str())
            .ok_or_else(|| ClientError::NotFound(issue.to_string()))?;
        if let (Some(existing), Some(incoming)) =
            (entry.fields.as_object_mut(), fields.as_object())
        {
            for (k, v) in incoming {
                existing.insert(k.clone(), v.clone());
            }
        }
        Ok(())
    }

    async fn set_issue_status(&self, issue: &IssueKey, status: &str) -> Result<(), ClientError> {
        let mut issues = self.issues.lock().unwrap();
        let entry = issues
            .get_mut(issue.as_str())
            .ok_or_else(|| ClientError::NotFound(issue.to_string()))?;
        entry.status = Some(status.to_owned());
        Ok(())
    }

    async fn set_issue_resolution(
        &self,
        issue: &IssueKey,
        resolution: &str,
    ) -> Result<(), ClientError> {
        let mut issues = self.issues.lock().unwrap();
        let entry = issues
            .get_mut(issue.as_str())
            .ok_or_else(|| ClientError::NotFound(issue.to_string()))?;
        entry.resolution = Some(resolution.to_owned());
        Ok(())
    }

    async fn add_comment(&self, issue: &IssueKey, text: &str) -> Result<(), ClientError> {
        let mut issues = self.issues.lock().unwrap();
        let entry = issues
            .get_mut(issue.as_str())
            .ok_or_else(|| ClientError::NotFound(issue.to_string()))?;
        entry.comments.push(text.to_owned());
        Ok(())
    }

    async fn add_remote_link(
        &self,
        issue: &IssueKey,
        url: &str,
        title: &str,
    ) -> Result<(), ClientError> {
        let mut issues = self.issues.lock().unwrap();
        let entry = issues
            .get_mut(issue.as_str())
            .ok_or_else(|| ClientError::NotFound(issue.to_string()))?;
        entry.remote_links.push((url.to_owned(), title.to_owned()));
        Ok(())
    }

    async fn find_user(&self, email: &str) -> Result<Option<String>, ClientError> {
        Ok(self.users.lock().unwrap().get(email).cloned())
    }

    async fn assign_user(&self, issue: &IssueKey, account_id: &str) -> Result<(), ClientError> {
        let mut issues = self.issues.lock().unwrap();
        let entry = issues
            .get_mut(issue.as_str())
            .ok_or_else(|| ClientError::NotFound(issue.to_string()))?;
        entry.assignee = Some(account_id.to_owned());
        Ok(())
    }

    async fn clear_assignee(&self, issue: &IssueKey) -> Result<(), ClientError> {
        let mut issues = self.issues.lock().unwrap();
        let entry = issues
            .get_mut(issue.as_str())
            .ok_or_else(|| ClientError::NotFound(issue.to_string()))?;
        entry.assignee = None;
        Ok(())
    }

    async fn delete_issue(&self, issue: &IssueKey) -> Result<(), ClientError> {
        let mut issues = self.issues.lock().unwrap();
        let entry = issues
            .get_mut(issue.as_str())
            .ok_or_else(|| ClientError::NotFound(issue.to_string()))?;
        entry.deleted = true;
        Ok(())
    }
}

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::comment::Comment;
use crate::types::{BugId, IssueKey};

static BRACKET_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]*)(?:\]|$)").expect("valid regex"));

static ISSUE_KEY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+-?\d+$").expect("valid regex"));

/// Immutable snapshot of a source-tracker bug at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    pub id: BugId,
    pub summary: String,
    pub status: String,
    #[serde(default)]
    pub resolution: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub whiteboard: String,
    #[serde(default)]
    pub see_also: Vec<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub comment: Option<Comment>,
    #[serde(default)]
    pub component: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub severity: String,
}

impl Bug {
    /// Whether the bug has an assignee.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        !self.assigned_to.is_empty()
    }

    /// Tags derived from the whiteboard: the literal `bugzilla` tag first,
    /// then bracketed segments with interior spaces replaced by dots (in
    /// order of appearance), then those same segments in their bracketed
    /// form. A final, unterminated `[...` segment is treated as closed at
    /// end-of-string rather than dropped.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let mut raw_tokens = Vec::new();
        let mut bracketed = Vec::new();

        for caps in BRACKET_SEGMENT.captures_iter(&self.whiteboard) {
            let inner = &caps[1];
            let token = inner.replace(' ', ".");
            if !raw_tokens.contains(&token) {
                bracketed.push(format!("[{token}]"));
                raw_tokens.push(token);
            }
        }

        let mut tags = vec!["bugzilla".to_string()];
        tags.extend(raw_tokens);
        tags.extend(bracketed);
        tags
    }

    /// The first `see_also` URL whose host contains `target_host` and whose
    /// final path segment looks like a tracker issue key (`[A-Z]+-?\d+`).
    #[must_use]
    pub fn linked_issue_key(&self, target_host: &str) -> Option<IssueKey> {
        self.see_also.iter().find_map(|url| {
            if !url.contains(target_host) {
                return None;
            }
            let last_segment = url.rsplit('/').next()?;
            if ISSUE_KEY_SUFFIX.is_match(last_segment) {
                Some(IssueKey::new(last_segment))
            } else {
                None
            }
        })
    }
}

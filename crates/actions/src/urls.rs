use issuesync_core::{BugId, IssueKey};

/// Base URLs for the two trackers (`JIRA_BASE_URL`/`BUGZILLA_BASE_URL`), used
/// by the link-exchange steps to build and recognize the reciprocal
/// `see_also`/remote-link URLs.
#[derive(Debug, Clone)]
pub struct TrackerUrls {
    pub jira_base_url: String,
    pub bugzilla_base_url: String,
}

impl TrackerUrls {
    #[must_use]
    pub fn new(jira_base_url: impl Into<String>, bugzilla_base_url: impl Into<String>) -> Self {
        Self {
            jira_base_url: jira_base_url.into(),
            bugzilla_base_url: bugzilla_base_url.into(),
        }
    }

    /// `<jira_base_url>/browse/<key>`.
    #[must_use]
    pub fn issue_url(&self, key: &IssueKey) -> String {
        format!("{}/browse/{}", self.jira_base_url.trim_end_matches('/'), key.as_str())
    }

    /// `<bugzilla_base_url>/show_bug.cgi?id=<id>`.
    #[must_use]
    pub fn bug_url(&self, id: BugId) -> String {
        format!(
            "{}/show_bug.cgi?id={}",
            self.bugzilla_base_url.trim_end_matches('/'),
            id
        )
    }

    /// `<bugzilla_base_url>/favicon.ico`.
    #[must_use]
    pub fn bugzilla_favicon_url(&self) -> String {
        format!("{}/favicon.ico", self.bugzilla_base_url.trim_end_matches('/'))
    }

    /// Host portion of `jira_base_url`, for matching against `see_also` URLs
    /// in [`issuesync_core::Bug::linked_issue_key`].
    #[must_use]
    pub fn jira_host(&self) -> &str {
        strip_scheme(&self.jira_base_url)
    }
}

fn strip_scheme(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> TrackerUrls {
        TrackerUrls::new("https://jira.example.com", "https://bugzilla.example.com")
    }

    #[test]
    fn issue_url_builds_browse_link() {
        assert_eq!(
            urls().issue_url(&IssueKey::new("JBI-1")),
            "https://jira.example.com/browse/JBI-1"
        );
    }

    #[test]
    fn bug_url_builds_show_bug_link() {
        assert_eq!(
            urls().bug_url(BugId(42)),
            "https://bugzilla.example.com/show_bug.cgi?id=42"
        );
    }

    #[test]
    fn jira_host_strips_scheme() {
        assert_eq!(urls().jira_host(), "jira.example.com");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let u = TrackerUrls::new("https://jira.example.com/", "https://bugzilla.example.com/");
        assert_eq!(u.issue_url(&IssueKey::new("JBI-1")), "https://jira.example.com/browse/JBI-1");
    }
}

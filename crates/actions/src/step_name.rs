use std::str::FromStr;

use crate::error::ConfigError;

/// Closed set of step identifiers. Configuration carries step lists as plain
/// strings; this is where those strings are resolved into a tagged dispatch
/// table, failing loudly on anything unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepName {
    CreateIssue,
    MaybeDeleteDuplicate,
    AddLinkToBugzilla,
    AddLinkToJira,
    SyncWhiteboardLabels,
    UpdateIssueSummary,
    UpdateIssue,
    CreateComment,
    AddJiraCommentsForChanges,
    MaybeAssignJiraUser,
    MaybeUpdateIssueStatus,
    MaybeUpdateIssueResolution,
}

impl StepName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateIssue => "create_issue",
            Self::MaybeDeleteDuplicate => "maybe_delete_duplicate",
            Self::AddLinkToBugzilla => "add_link_to_bugzilla",
            Self::AddLinkToJira => "add_link_to_jira",
            Self::SyncWhiteboardLabels => "sync_whiteboard_labels",
            Self::UpdateIssueSummary => "update_issue_summary",
            Self::UpdateIssue => "update_issue",
            Self::CreateComment => "create_comment",
            Self::AddJiraCommentsForChanges => "add_jira_comments_for_changes",
            Self::MaybeAssignJiraUser => "maybe_assign_jira_user",
            Self::MaybeUpdateIssueStatus => "maybe_update_issue_status",
            Self::MaybeUpdateIssueResolution => "maybe_update_issue_resolution",
        }
    }
}

impl FromStr for StepName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create_issue" => Ok(Self::CreateIssue),
            "maybe_delete_duplicate" => Ok(Self::MaybeDeleteDuplicate),
            "add_link_to_bugzilla" => Ok(Self::AddLinkToBugzilla),
            "add_link_to_jira" => Ok(Self::AddLinkToJira),
            "sync_whiteboard_labels" => Ok(Self::SyncWhiteboardLabels),
            "update_issue_summary" => Ok(Self::UpdateIssueSummary),
            "update_issue" => Ok(Self::UpdateIssue),
            "create_comment" => Ok(Self::CreateComment),
            "add_jira_comments_for_changes" => Ok(Self::AddJiraCommentsForChanges),
            "maybe_assign_jira_user" => Ok(Self::MaybeAssignJiraUser),
            "maybe_update_issue_status" => Ok(Self::MaybeUpdateIssueStatus),
            "maybe_update_issue_resolution" => Ok(Self::MaybeUpdateIssueResolution),
            other => Err(ConfigError::UnknownStep(other.to_owned())),
        }
    }
}

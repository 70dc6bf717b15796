use issuesync_core::{ActionContext, ActionParameters, StepResponse};

use super::StepEnv;
use crate::error::StepError;

/// Fields tracked for `add_jira_comments_for_changes`: the ones a human
/// reviewing the Jira issue cares about seeing called out explicitly.
const TRACKED_CHANGE_FIELDS: &[&str] = &["assigned_to", "status", "resolution"];

/// Posts `ctx.bug.comment` (if present) to the linked issue, quoted.
pub async fn create_comment(
    ctx: ActionContext,
    _params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    let Some(issue) = ctx.jira.issue.clone() else {
        return Ok((ctx, Vec::new()));
    };
    let Some(comment) = ctx.bug.comment.clone() else {
        return Ok((ctx, Vec::new()));
    };

    let body = format!(
        "*({})* commented:\n{{quote}}\n{}\n{{quote}}",
        comment.author, comment.text
    );
    env.target.add_comment(&issue, &body).await?;
    let response = StepResponse::new("create_comment", serde_json::json!({"issue": issue.as_str()}));
    Ok((ctx, vec![response]))
}

/// Posts one comment per tracked field change (assignee, status,
/// resolution), rendering each as a small JSON document.
pub async fn add_jira_comments_for_changes(
    ctx: ActionContext,
    _params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    let Some(issue) = ctx.jira.issue.clone() else {
        return Ok((ctx, Vec::new()));
    };

    let mut responses = Vec::new();
    for change in &ctx.event.changes {
        if !TRACKED_CHANGE_FIELDS.contains(&change.field.as_str()) {
            continue;
        }
        let body = serde_json::to_string_pretty(&serde_json::json!({
            "field": change.field,
            "removed": change.removed,
            "added": change.added,
        }))
        .expect("json object always serializes");
        env.target.add_comment(&issue, &body).await?;
        responses.push(StepResponse::new(
            "add_jira_comments_for_changes",
            serde_json::json!({"field": change.field}),
        ));
    }
    Ok((ctx, responses))
}

#[cfg(test)]
mod tests {
    use issuesync_clients::{FakeSourceTrackerClient, FakeTargetTrackerClient};
    use issuesync_core::{
        ActionConfig, BugId, Comment, Event, EventAction, EventTarget, EventUser, FieldChange,
        JiraContext, Operation, ProjectKey,
    };

    use super::*;
    use crate::urls::TrackerUrls;

    fn ctx(comment: Option<Comment>, changes: Vec<FieldChange>) -> ActionContext {
        ActionContext {
            bug: issuesync_core::Bug {
                id: BugId(1),
                summary: "x".into(),
                status: String::new(),
                resolution: String::new(),
                assigned_to: String::new(),
                whiteboard: String::new(),
                see_also: Vec::new(),
                is_private: false,
                comment,
                component: String::new(),
                product: String::new(),
                priority: String::new(),
                severity: String::new(),
            },
            event: Event {
                action: EventAction::Modify,
                time: chrono::Utc::now(),
                user: EventUser { login: "a@b.com".into() },
                changes,
                target: EventTarget::Comment,
                routing_key: None,
            },
            operation: Operation::Comment,
            jira: JiraContext {
                project: ProjectKey::new("JBI"),
                issue: Some(issuesync_core::IssueKey::new("JBI-1")),
            },
            action: ActionConfig {
                whiteboard_tag: "devtest".into(),
                jira_project_key: ProjectKey::new("JBI"),
                allow_private: false,
                parameters: issuesync_core::ActionParameters::default(),
                steps: Default::default(),
            },
            extra: Default::default(),
            responses: Vec::new(),
        }
    }

    fn env<'a>(source: &'a FakeSourceTrackerClient, target: &'a FakeTargetTrackerClient, urls: &'a TrackerUrls) -> StepEnv<'a> {
        StepEnv { source, target, urls }
    }

    #[tokio::test]
    async fn create_comment_posts_quoted_body() {
        let source = FakeSourceTrackerClient::new();
        let target = FakeTargetTrackerClient::new();
        target.create_issue(serde_json::json!({})).await.unwrap();
        let urls = TrackerUrls::new("https://jira.example.com", "https://bugzilla.example.com");
        let e = env(&source, &target, &urls);

        let comment = Comment {
            id: 1,
            text: "hello".into(),
            author: "dev@example.com".into(),
            time: chrono::Utc::now(),
            is_private: false,
        };
        let (_, responses) = create_comment(ctx(Some(comment), vec![]), &issuesync_core::ActionParameters::default(), &e)
            .await
            .unwrap();
        assert_eq!(responses.len(), 1);
        let key = issuesync_core::IssueKey::new("JBI-1");
        assert_eq!(target.comments(&key).len(), 1);
        assert!(target.comments(&key)[0].contains("hello"));
    }

    #[tokio::test]
    async fn create_comment_is_noop_without_comment() {
        let source = FakeSourceTrackerClient::new();
        let target = FakeTargetTrackerClient::new();
        let urls = TrackerUrls::new("https://jira.example.com", "https://bugzilla.example.com");
        let e = env(&source, &target, &urls);

        let (_, responses) = create_comment(ctx(None, vec![]), &issuesync_core::ActionParameters::default(), &e)
            .await
            .unwrap();
        assert!(responses.is_empty());
    }

    #[tokio::test]
    async fn add_jira_comments_for_changes_filters_tracked_fields() {
        let source = FakeSourceTrackerClient::new();
        let target = FakeTargetTrackerClient::new();
        target.create_issue(serde_json::json!({})).await.unwrap();
        let urls = TrackerUrls::new("https://jira.example.com", "https://bugzilla.example.com");
        let e = env(&source, &target, &urls);

        let changes = vec![
            FieldChange { field: "status".into(), removed: "NEW".into(), added: "ASSIGNED".into() },
            FieldChange { field: "whiteboard".into(), removed: String::new(), added: "[devtest]".into() },
        ];
        let (_, responses) = add_jira_comments_for_changes(ctx(None, changes), &issuesync_core::ActionParameters::default(), &e)
            .await
            .unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].body["field"], "status");
    }
}

use issuesync_core::{ActionContext, ActionParameters, Operation, StepResponse};

use super::StepEnv;
use crate::error::StepError;

/// Mirrors the Bugzilla assignee onto the Jira issue by email lookup. On
/// `create`, sets the assignee only if the bug is assigned and the email
/// resolves to exactly one Jira account. On `update`, only acts when
/// `assigned_to` changed; clears the assignee if unassigned, and on lookup
/// failure falls back to clearing rather than leaving a stale assignee.
pub async fn maybe_assign_jira_user(
    ctx: ActionContext,
    _params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    let Some(issue) = ctx.jira.issue.clone() else {
        return Ok((ctx, Vec::new()));
    };

    match ctx.operation {
        Operation::Create => {
            if !ctx.bug.is_assigned() {
                return Ok((ctx, Vec::new()));
            }
            match env.target.find_user(&ctx.bug.assigned_to).await {
                Ok(Some(account_id)) => {
                    env.target.assign_user(&issue, &account_id).await?;
                    let response = StepResponse::new(
                        "maybe_assign_jira_user",
                        serde_json::json!({"assigned": account_id}),
                    );
                    Ok((ctx, vec![response]))
                }
                Ok(None) => {
                    tracing::debug!(bug_id = %ctx.bug.id, "no matching jira user for assignee");
                    Ok((ctx, Vec::new()))
                }
                Err(err) => {
                    tracing::debug!(%err, "failed to resolve jira user on create, leaving unset");
                    Ok((ctx, Vec::new()))
                }
            }
        }
        Operation::Update => {
            if !ctx.event.changed_fields().iter().any(|f| f == "assigned_to") {
                return Ok((ctx, Vec::new()));
            }

            if !ctx.bug.is_assigned() {
                env.target.clear_assignee(&issue).await?;
                let response =
                    StepResponse::new("maybe_assign_jira_user", serde_json::json!({"cleared": true}));
                return Ok((ctx, vec![response]));
            }

            match env.target.find_user(&ctx.bug.assigned_to).await {
                Ok(Some(account_id)) => {
                    env.target.assign_user(&issue, &account_id).await?;
                    let response = StepResponse::new(
                        "maybe_assign_jira_user",
                        serde_json::json!({"assigned": account_id}),
                    );
                    Ok((ctx, vec![response]))
                }
                _ => {
                    tracing::debug!(bug_id = %ctx.bug.id, "falling back to clearing jira assignee");
                    env.target.clear_assignee(&issue).await?;
                    let response =
                        StepResponse::new("maybe_assign_jira_user", serde_json::json!({"cleared": true}));
                    Ok((ctx, vec![response]))
                }
            }
        }
        _ => Ok((ctx, Vec::new())),
    }
}

#[cfg(test)]
mod tests {
    use issuesync_clients::{FakeSourceTrackerClient, FakeTargetTrackerClient};
    use issuesync_core::{
        ActionConfig, BugId, Event, EventAction, EventTarget, EventUser, FieldChange, JiraContext,
        ProjectKey,
    };

    use super::*;
    use crate::urls::TrackerUrls;

    fn ctx(operation: Operation, assigned_to: &str, changes: Vec<FieldChange>) -> ActionContext {
        ActionContext {
            bug: issuesync_core::Bug {
                id: BugId(1),
                summary: String::new(),
                status: String::new(),
                resolution: String::new(),
                assigned_to: assigned_to.into(),
                whiteboard: String::new(),
                see_also: Vec::new(),
                is_private: false,
                comment: None,
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
                target: EventTarget::Bug,
                routing_key: None,
            },
            operation,
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

    #[tokio::test]
    async fn create_assigns_when_user_resolves() {
        let source = FakeSourceTrackerClient::new();
        let target = FakeTargetTrackerClient::new();
        target.create_issue(serde_json::json!({})).await.unwrap();
        target.seed_user("dev@example.com", "acc-1");
        let urls = TrackerUrls::new("https://jira.example.com", "https://bugzilla.example.com");
        let env = StepEnv { source: &source, target: &target, urls: &urls };

        let (_, responses) = maybe_assign_jira_user(
            ctx(Operation::Create, "dev@example.com", vec![]),
            &issuesync_core::ActionParameters::default(),
            &env,
        )
        .await
        .unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(
            target.assignee(&issuesync_core::IssueKey::new("JBI-1")),
            Some("acc-1".into())
        );
    }

    #[tokio::test]
    async fn create_leaves_unset_when_user_not_found() {
        let source = FakeSourceTrackerClient::new();
        let target = FakeTargetTrackerClient::new();
        target.create_issue(serde_json::json!({})).await.unwrap();
        let urls = TrackerUrls::new("https://jira.example.com", "https://bugzilla.example.com");
        let env = StepEnv { source: &source, target: &target, urls: &urls };

        let (_, responses) = maybe_assign_jira_user(
            ctx(Operation::Create, "dev@example.com", vec![]),
            &issuesync_core::ActionParameters::default(),
            &env,
        )
        .await
        .unwrap();
        assert!(responses.is_empty());
        assert_eq!(target.assignee(&issuesync_core::IssueKey::new("JBI-1")), None);
    }

    #[tokio::test]
    async fn update_ignores_unrelated_field_changes() {
        let source = FakeSourceTrackerClient::new();
        let target = FakeTargetTrackerClient::new();
        target.create_issue(serde_json::json!({})).await.unwrap();
        let urls = TrackerUrls::new("https://jira.example.com", "https://bugzilla.example.com");
        let env = StepEnv { source: &source, target: &target, urls: &urls };

        let changes = vec![FieldChange { field: "status".into(), removed: String::new(), added: String::new() }];
        let (_, responses) = maybe_assign_jira_user(
            ctx(Operation::Update, "dev@example.com", changes),
            &issuesync_core::ActionParameters::default(),
            &env,
        )
        .await
        .unwrap();
        assert!(responses.is_empty());
    }

    #[tokio::test]
    async fn update_clears_assignee_when_unassigned() {
        let source = FakeSourceTrackerClient::new();
        let target = FakeTargetTrackerClient::new();
        target.create_issue(serde_json::json!({})).await.unwrap();
        let key = issuesync_core::IssueKey::new("JBI-1");
        target.assign_user(&key, "acc-1").await.unwrap();
        let urls = TrackerUrls::new("https://jira.example.com", "https://bugzilla.example.com");
        let env = StepEnv { source: &source, target: &target, urls: &urls };

        let changes = vec![FieldChange { field: "assigned_to".into(), removed: "dev@example.com".into(), added: String::new() }];
        let (_, responses) = maybe_assign_jira_user(
            ctx(Operation::Update, "", changes),
            &issuesync_core::ActionParameters::default(),
            &env,
        )
        .await
        .unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(target.assignee(&key), None);
    }

    #[tokio::test]
    async fn update_falls_back_to_clearing_on_lookup_miss() {
        let source = FakeSourceTrackerClient::new();
        let target = FakeTargetTrackerClient::new();
        target.create_issue(serde_json::json!({})).await.unwrap();
        let key = issuesync_core::IssueKey::new("JBI-1");
        target.assign_user(&key, "acc-1").await.unwrap();
        let urls = TrackerUrls::new("https://jira.example.com", "https://bugzilla.example.com");
        let env = StepEnv { source: &source, target: &target, urls: &urls };

        let changes = vec![FieldChange { field: "assigned_to".into(), removed: "old@example.com".into(), added: "new@example.com".into() }];
        let (_, responses) = maybe_assign_jira_user(
            ctx(Operation::Update, "new@example.com", changes),
            &issuesync_core::ActionParameters::default(),
            &env,
        )
        .await
        .unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(target.assignee(&key), None);
    }
}

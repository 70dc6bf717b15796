use issuesync_core::{ActionContext, ActionParameters, StepResponse};

use super::StepEnv;
use crate::error::StepError;

const MAX_DESCRIPTION_CHARS: usize = 32_767;

fn create_fields(ctx: &ActionContext, params: &ActionParameters, description: String) -> serde_json::Value {
    let mut fields = serde_json::json!({
        "summary": ctx.bug.summary,
        "issuetype": {"name": "Bug"},
        "description": description,
        "project": {"key": ctx.jira.project.as_str()},
    });
    if params.sync_whiteboard_labels {
        fields["labels"] = serde_json::json!(ctx.bug.tags());
    }
    fields
}

/// Fetches comments for `ctx.bug.id`, takes the first comment's text
/// (truncated to 32,767 chars) as the description, and creates the target
/// issue. Assigns the returned key to `ctx.jira.issue`.
pub async fn create_issue(
    ctx: ActionContext,
    params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    let comments = env.source.get_comments(ctx.bug.id).await?;
    let mut description = comments.into_iter().next().map(|c| c.text).unwrap_or_default();
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        description = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
    }

    let fields = create_fields(&ctx, params, description);

    let issue_key = env
        .target
        .create_issue(fields)
        .await
        .map_err(|err| StepError::CreateError(err.to_string()))?;

    let response = StepResponse::new(
        "create_issue",
        serde_json::json!({"key": issue_key.as_str()}),
    );
    let ctx = ctx.with_issue(issue_key);
    Ok((ctx, vec![response]))
}

/// Re-fetches the source bug and, if its `see_also` already links a
/// *different* target issue than the one just created on `ctx.jira.issue`,
/// deletes the newly created issue (rollback for the create/link race
/// window). A same-key duplicate is treated as a no-op.
pub async fn maybe_delete_duplicate(
    ctx: ActionContext,
    _params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    let Some(current_issue) = ctx.jira.issue.clone() else {
        return Ok((ctx, Vec::new()));
    };

    let latest_bug = env.source.get_bug(ctx.bug.id).await?;
    let Some(linked) = latest_bug.linked_issue_key(env.urls.jira_host()) else {
        return Ok((ctx, Vec::new()));
    };

    if linked == current_issue {
        return Ok((ctx, Vec::new()));
    }

    env.target.delete_issue(&current_issue).await?;
    let response = StepResponse::new(
        "maybe_delete_duplicate",
        serde_json::json!({"deleted": current_issue.as_str()}),
    );
    Ok((ctx, vec![response]))
}

fn labels_or_none(ctx: &ActionContext, sync_whiteboard_labels: bool) -> Option<serde_json::Value> {
    sync_whiteboard_labels.then(|| serde_json::json!(ctx.bug.tags()))
}

async fn update_issue_fields(
    ctx: ActionContext,
    env: &StepEnv<'_>,
    step_name: &'static str,
    mut fields: serde_json::Map<String, serde_json::Value>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    let Some(issue) = ctx.jira.issue.clone() else {
        return Ok((ctx, Vec::new()));
    };
    fields.insert("summary".into(), serde_json::json!(ctx.bug.summary));
    env.target
        .update_issue_fields(&issue, serde_json::Value::Object(fields))
        .await?;
    let response = StepResponse::new(step_name, serde_json::json!({"issue": issue.as_str()}));
    Ok((ctx, vec![response]))
}

/// Updates the issue's summary only.
pub async fn update_issue_summary(
    ctx: ActionContext,
    _params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    update_issue_fields(ctx, env, "update_issue_summary", serde_json::Map::new()).await
}

/// Updates the issue's summary and, when enabled, its whiteboard-derived
/// labels, in a single call.
pub async fn update_issue(
    ctx: ActionContext,
    params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    let mut fields = serde_json::Map::new();
    if let Some(labels) = labels_or_none(&ctx, params.sync_whiteboard_labels) {
        fields.insert("labels".into(), labels);
    }
    update_issue_fields(ctx, env, "update_issue", fields).await
}

/// Syncs whiteboard-derived labels onto the issue, independent of the
/// summary. Configured as its own default step for update operations.
pub async fn sync_whiteboard_labels(
    ctx: ActionContext,
    params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    if !params.sync_whiteboard_labels {
        return Ok((ctx, Vec::new()));
    }
    let Some(issue) = ctx.jira.issue.clone() else {
        return Ok((ctx, Vec::new()));
    };
    let labels = serde_json::json!(ctx.bug.tags());
    env.target
        .update_issue_fields(&issue, serde_json::json!({"labels": labels}))
        .await?;
    let response = StepResponse::new(
        "sync_whiteboard_labels",
        serde_json::json!({"issue": issue.as_str(), "labels": labels}),
    );
    Ok((ctx, vec![response]))
}

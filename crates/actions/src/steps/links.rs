use issuesync_core::{ActionContext, ActionParameters, StepResponse};

use super::StepEnv;
use crate::error::StepError;

/// Adds a remote link on the target issue pointing back at the source bug.
pub async fn add_link_to_bugzilla(
    ctx: ActionContext,
    _params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    let Some(issue) = ctx.jira.issue.clone() else {
        return Ok((ctx, Vec::new()));
    };
    let url = env.urls.bug_url(ctx.bug.id);
    env.target
        .add_remote_link(&issue, &url, &env.urls.bugzilla_favicon_url())
        .await?;
    let response = StepResponse::new("add_link_to_bugzilla", serde_json::json!({"url": url}));
    Ok((ctx, vec![response]))
}

/// Appends the target issue's URL to the source bug's `see_also` field.
pub async fn add_link_to_jira(
    ctx: ActionContext,
    _params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    let Some(issue) = ctx.jira.issue.clone() else {
        return Ok((ctx, Vec::new()));
    };
    let url = env.urls.issue_url(&issue);
    env.source
        .update_bug(ctx.bug.id, serde_json::json!({"see_also": [url.clone()]}))
        .await?;
    let response = StepResponse::new("add_link_to_jira", serde_json::json!({"url": url}));
    Ok((ctx, vec![response]))
}

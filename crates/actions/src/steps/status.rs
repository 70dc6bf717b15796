use issuesync_core::{ActionContext, ActionParameters, Operation, StepResponse};

use super::StepEnv;
use crate::error::StepError;

/// Maps the bug's resolution (or status, if resolution is empty) through
/// `status_map` onto the issue's workflow status. On `update`, only applies
/// when `status` or `resolution` changed.
pub async fn maybe_update_issue_status(
    ctx: ActionContext,
    params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    let Some(issue) = ctx.jira.issue.clone() else {
        return Ok((ctx, Vec::new()));
    };

    let source_key = if ctx.bug.resolution.is_empty() {
        &ctx.bug.status
    } else {
        &ctx.bug.resolution
    };
    let Some(target_status) = params.status_map.get(source_key) else {
        tracing::debug!(bug_id = %ctx.bug.id, source_key, "bug status was not in the status map");
        return Ok((ctx, Vec::new()));
    };

    let should_apply = match ctx.operation {
        Operation::Create => true,
        Operation::Update => {
            let changed = ctx.event.changed_fields();
            changed.iter().any(|f| f == "status" || f == "resolution")
        }
        _ => false,
    };
    if !should_apply {
        return Ok((ctx, Vec::new()));
    }

    env.target.set_issue_status(&issue, target_status).await?;
    let response = StepResponse::new(
        "maybe_update_issue_status",
        serde_json::json!({"status": target_status}),
    );
    Ok((ctx, vec![response]))
}

/// Maps the bug's resolution through `resolution_map` onto the issue's
/// resolution. On `update`, only applies when `resolution` changed.
pub async fn maybe_update_issue_resolution(
    ctx: ActionContext,
    params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<StepResponse>), StepError> {
    let Some(issue) = ctx.jira.issue.clone() else {
        return Ok((ctx, Vec::new()));
    };

    let Some(target_resolution) = params.resolution_map.get(&ctx.bug.resolution) else {
        tracing::debug!(bug_id = %ctx.bug.id, "bug resolution was not in the resolution map");
        return Ok((ctx, Vec::new()));
    };

    let should_apply = match ctx.operation {
        Operation::Create => true,
        Operation::Update => ctx.event.changed_fields().iter().any(|f| f == "resolution"),
        _ => false,
    };
    if !should_apply {
        return Ok((ctx, Vec::new()));
    }

    env.target
        .set_issue_resolution(&issue, target_resolution)
        .await?;
    let response = StepResponse::new(
        "maybe_update_issue_resolution",
        serde_json::json!({"resolution": target_resolution}),
    );
    Ok((ctx, vec![response]))
}

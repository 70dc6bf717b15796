use issuesync_core::{ActionContext, ActionParameters};

use crate::error::StepError;
use crate::step_name::StepName;
use crate::steps::{self, StepEnv};

/// Runs an ordered step list against `ctx`, threading the context through
/// each step in turn and accumulating every `StepResponse` onto it. Aborts on
/// the first step error without rolling back prior steps' side effects;
/// steps are not transactional.
pub async fn run_pipeline(
    mut ctx: ActionContext,
    step_list: &[StepName],
    params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<ActionContext, StepError> {
    for step in step_list {
        let (next_ctx, responses) = dispatch(*step, ctx, params, env).await?;
        ctx = next_ctx;
        ctx.push_responses(responses);
    }
    Ok(ctx)
}

async fn dispatch(
    step: StepName,
    ctx: ActionContext,
    params: &ActionParameters,
    env: &StepEnv<'_>,
) -> Result<(ActionContext, Vec<issuesync_core::StepResponse>), StepError> {
    match step {
        StepName::CreateIssue => steps::create_issue(ctx, params, env).await,
        StepName::MaybeDeleteDuplicate => steps::maybe_delete_duplicate(ctx, params, env).await,
        StepName::AddLinkToBugzilla => steps::add_link_to_bugzilla(ctx, params, env).await,
        StepName::AddLinkToJira => steps::add_link_to_jira(ctx, params, env).await,
        StepName::SyncWhiteboardLabels => steps::sync_whiteboard_labels(ctx, params, env).await,
        StepName::UpdateIssueSummary => steps::update_issue_summary(ctx, params, env).await,
        StepName::UpdateIssue => steps::update_issue(ctx, params, env).await,
        StepName::CreateComment => steps::create_comment(ctx, params, env).await,
        StepName::AddJiraCommentsForChanges => {
            steps::add_jira_comments_for_changes(ctx, params, env).await
        }
        StepName::MaybeAssignJiraUser => steps::maybe_assign_jira_user(ctx, params, env).await,
        StepName::MaybeUpdateIssueStatus => steps::maybe_update_issue_status(ctx, params, env).await,
        StepName::MaybeUpdateIssueResolution => {
            steps::maybe_update_issue_resolution(ctx, params, env).await
        }
    }
}

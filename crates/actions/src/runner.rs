use issuesync_core::{
    ActionContext, Event, EventTarget, JiraContext, Operation, StepResponse, WebhookRequest,
};

use crate::error::{LookupError, RunnerError};
use crate::pipeline::run_pipeline;
use crate::registry::ActionRegistry;
use crate::steps::StepEnv;

/// What a `WebhookIntake` decided to do with one inbound request. The intake
/// surface (an HTTP handler, not implemented here) always answers 2xx to the
/// sender regardless of which of these it hits; only a malformed envelope —
/// rejected before this type is ever produced — gets a 422.
#[derive(Debug)]
pub enum IntakeOutcome {
    /// The pipeline ran inline and completed (or was classified `ignore`).
    Processed(Vec<StepResponse>),
    /// The bug already had queued items, so this request was appended without
    /// being processed live.
    Postponed,
    /// Live processing raised a non-ignore error; the request was enqueued
    /// with the captured error for the retry worker to replay.
    TrackedFailed,
}

/// Describes, in trait form, the postpone-vs-process decision that sits in
/// front of `ActionRunner::execute`. Deliberately abstract over the queue
/// backend: an implementation is expected to hold a `issuesync-queue` handle
/// and an `ActionRunner`, check `queue.size(bug_id)` before running live, and
/// `queue.put(...)` on either a non-empty queue or a non-ignore failure. No
/// HTTP framework is wired up here.
#[async_trait::async_trait]
pub trait WebhookIntake: Send + Sync {
    async fn handle(&self, request: WebhookRequest) -> IntakeOutcome;
}

/// Classifies an inbound webhook, resolves it to a configured action, and
/// invokes the step pipeline for the derived operation.
pub struct ActionRunner<'a> {
    registry: &'a ActionRegistry,
}

impl<'a> ActionRunner<'a> {
    #[must_use]
    pub fn new(registry: &'a ActionRegistry) -> Self {
        Self { registry }
    }

    /// Runs one webhook request to completion. Returns `(handled, responses)`
    /// on success. `IgnoreInvalidRequest` is the only error variant callers
    /// are expected to swallow into a 200 response; everything else is the
    /// caller's responsibility to enqueue.
    pub async fn execute(
        &self,
        request: WebhookRequest,
        env: &StepEnv<'_>,
    ) -> Result<(bool, Vec<StepResponse>), RunnerError> {
        let mut bug = request.bug;

        if bug.is_private {
            bug = env
                .source
                .get_bug(bug.id)
                .await
                .map_err(|err| RunnerError::IgnoreInvalidRequest(err.to_string()))?;
        }

        let action = self.registry.lookup(&bug).map_err(|err| match err {
            LookupError::ActionNotFound => {
                RunnerError::IgnoreInvalidRequest("no action matches this bug's whiteboard".into())
            }
        })?;

        if bug.is_private && !action.config.allow_private {
            return Err(RunnerError::IgnoreInvalidRequest(
                "private bug under an action that does not allow private bugs".into(),
            ));
        }

        let linked_issue = bug.linked_issue_key(env.urls.jira_host());

        let mut ctx = ActionContext {
            jira: JiraContext {
                project: action.config.jira_project_key.clone(),
                issue: linked_issue.clone(),
            },
            operation: Operation::Ignore,
            bug,
            event: request.event,
            action: action.config.clone(),
            extra: Default::default(),
            responses: Vec::new(),
        };

        let operation = classify(&ctx.event, linked_issue.is_some())?;
        ctx = ctx.with_operation(operation);
        if operation == Operation::Update {
            ctx.extra.insert(
                "changed_fields".into(),
                ctx.event.changed_fields().join(","),
            );
        }

        tracing::info!(bug_id = %ctx.bug.id, operation = operation.as_str(), "dispatching pipeline");

        let step_list = action.steps_for(operation);
        let params = action.config.parameters.clone();
        let result = run_pipeline(ctx, step_list, &params, env).await?;

        tracing::info!(bug_id = %result.bug.id, "pipeline completed");
        Ok((true, result.responses))
    }
}

fn classify(event: &Event, has_linked_issue: bool) -> Result<Operation, RunnerError> {
    match (&event.target, has_linked_issue) {
        (EventTarget::Bug, false) => Ok(Operation::Create),
        (EventTarget::Bug, true) => Ok(Operation::Update),
        (EventTarget::Comment, _) => Ok(Operation::Comment),
        _ => Err(RunnerError::IgnoreInvalidRequest(format!(
            "unclassifiable event target {:?}",
            event.target
        ))),
    }
}

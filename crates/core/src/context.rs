use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::action_config::ActionConfig;
use crate::bug::Bug;
use crate::event::Event;
use crate::operation::Operation;
use crate::types::{IssueKey, ProjectKey};

/// Target-tracker addressing carried through a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraContext {
    pub project: ProjectKey,
    pub issue: Option<IssueKey>,
}

/// An opaque response record returned by a step and accumulated by the
/// pipeline executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResponse {
    pub step: String,
    pub body: serde_json::Value,
}

impl StepResponse {
    #[must_use]
    pub fn new(step: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            step: step.into(),
            body,
        }
    }
}

/// Mutable per-invocation record threaded through all steps of one pipeline
/// run. Conceptually single-owner: never shared across requests. Each step
/// takes ownership of the context and returns an updated one, matching the
/// "explicit immutable updates" design note rather than mutating in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionContext {
    pub bug: Bug,
    pub event: Event,
    pub operation: Operation,
    pub jira: JiraContext,
    pub action: ActionConfig,
    #[serde(default)]
    pub extra: HashMap<String, String>,
    #[serde(default)]
    pub responses: Vec<StepResponse>,
}

impl ActionContext {
    #[must_use]
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    #[must_use]
    pub fn with_issue(mut self, issue: IssueKey) -> Self {
        self.jira.issue = Some(issue);
        self
    }

    pub fn push_responses(&mut self, responses: impl IntoIterator<Item = StepResponse>) {
        self.responses.extend(responses);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_config::ActionParameters;
    use crate::event::{EventAction, EventTarget, EventUser};
    use crate::types::BugId;
    use chrono::Utc;

    fn ctx() -> ActionContext {
        ActionContext {
            bug: Bug {
                id: BugId(1),
                summary: String::new(),
                status: String::new(),
                resolution: String::new(),
                assigned_to: String::new(),
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
                action: EventAction::Create,
                time: Utc::now(),
                user: EventUser {
                    login: "a@b.com".into(),
                },
                changes: Vec::new(),
                target: EventTarget::Bug,
                routing_key: None,
            },
            operation: Operation::Ignore,
            jira: JiraContext {
                project: ProjectKey::new("JBI"),
                issue: None,
            },
            action: ActionConfig {
                whiteboard_tag: "devtest".into(),
                jira_project_key: ProjectKey::new("JBI"),
                allow_private: false,
                parameters: ActionParameters::default(),
                steps: Default::default(),
            },
            extra: HashMap::new(),
            responses: Vec::new(),
        }
    }

    #[test]
    fn with_operation_updates_copy() {
        let context = ctx().with_operation(Operation::Create);
        assert_eq!(context.operation, Operation::Create);
    }

    #[test]
    fn with_issue_sets_jira_issue() {
        let context = ctx().with_issue(IssueKey::new("JBI-9"));
        assert_eq!(context.jira.issue, Some(IssueKey::new("JBI-9")));
    }

    #[test]
    fn push_responses_accumulates() {
        let mut context = ctx();
        context.push_responses(vec![StepResponse::new("create_issue", serde_json::json!({}))]);
        context.push_responses(vec![StepResponse::new("add_link", serde_json::json!({}))]);
        assert_eq!(context.responses.len(), 2);
    }
}

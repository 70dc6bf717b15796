use std::collections::HashMap;
use std::str::FromStr;

use issuesync_core::{ActionConfig, Bug, Operation};

use crate::error::{ConfigError, LookupError};
use crate::step_name::StepName;

fn default_steps(operation: Operation) -> &'static [&'static str] {
    match operation {
        Operation::Create => &[
            "create_issue",
            "maybe_delete_duplicate",
            "add_link_to_bugzilla",
            "add_link_to_jira",
            "sync_whiteboard_labels",
        ],
        Operation::Update => &[
            "update_issue_summary",
            "sync_whiteboard_labels",
            "add_jira_comments_for_changes",
        ],
        Operation::Comment => &["create_comment"],
        _ => &[],
    }
}

fn group_operation(group: &str) -> Result<Operation, ConfigError> {
    match group {
        "new" => Ok(Operation::Create),
        "existing" => Ok(Operation::Update),
        "comment" => Ok(Operation::Comment),
        other => Err(ConfigError::UnknownGroup(other.to_owned())),
    }
}

/// One `ActionConfig` resolved into closed, per-operation step lists.
pub struct ResolvedAction {
    pub config: ActionConfig,
    pub steps: HashMap<Operation, Vec<StepName>>,
}

impl ResolvedAction {
    fn new(config: ActionConfig) -> Result<Self, ConfigError> {
        let mut steps = HashMap::new();
        for operation in [Operation::Create, Operation::Update, Operation::Comment] {
            steps.insert(operation, Vec::new());
        }

        for (group, raw_steps) in &config.steps {
            let operation = group_operation(group)?;
            let resolved = raw_steps
                .iter()
                .map(|s| StepName::from_str(s))
                .collect::<Result<Vec<_>, _>>()?;
            steps.insert(operation, resolved);
        }

        for operation in [Operation::Create, Operation::Update, Operation::Comment] {
            let group_configured = config.steps.keys().any(|g| {
                group_operation(g)
                    .map(|op| op == operation)
                    .unwrap_or(false)
            });
            if !group_configured {
                let resolved = default_steps(operation)
                    .iter()
                    .map(|s| StepName::from_str(s).expect("default steps are always valid"))
                    .collect();
                steps.insert(operation, resolved);
            }
        }

        Ok(Self { config, steps })
    }

    #[must_use]
    pub fn steps_for(&self, operation: Operation) -> &[StepName] {
        self.steps.get(&operation).map_or(&[], Vec::as_slice)
    }
}

/// Loads configured actions at startup and resolves a bug to at most one
/// action via whiteboard-tag lookup.
pub struct ActionRegistry {
    actions: Vec<ResolvedAction>,
}

impl ActionRegistry {
    /// Validate and resolve a list of action configurations. Fails loudly on
    /// an unknown step-group key or step name, naming the offender.
    pub fn new(configs: Vec<ActionConfig>) -> Result<Self, ConfigError> {
        let mut seen_tags = std::collections::HashSet::new();
        let mut actions = Vec::with_capacity(configs.len());
        for config in configs {
            let tag_lower = config.whiteboard_tag.to_lowercase();
            if !seen_tags.insert(tag_lower) {
                return Err(ConfigError::DuplicateTag(config.whiteboard_tag));
            }
            actions.push(ResolvedAction::new(config)?);
        }
        Ok(Self { actions })
    }

    /// Iterate `bug.tags()` in their deterministic order and return the first
    /// action whose `whiteboard_tag` matches case-insensitively.
    pub fn lookup(&self, bug: &Bug) -> Result<&ResolvedAction, LookupError> {
        for tag in bug.tags() {
            let tag_lower = tag.to_lowercase();
            if let Some(action) = self
                .actions
                .iter()
                .find(|a| a.config.whiteboard_tag.to_lowercase() == tag_lower)
            {
                return Ok(action);
            }
        }
        Err(LookupError::ActionNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use issuesync_core::{ActionParameters, ProjectKey, StepGroupsRaw};

    fn config(tag: &str, steps: StepGroupsRaw) -> ActionConfig {
        ActionConfig {
            whiteboard_tag: tag.into(),
            jira_project_key: ProjectKey::new("JBI"),
            allow_private: false,
            parameters: ActionParameters::default(),
            steps,
        }
    }

    fn bug_with_whiteboard(whiteboard: &str) -> Bug {
        Bug {
            id: issuesync_core::BugId(1),
            summary: String::new(),
            status: String::new(),
            resolution: String::new(),
            assigned_to: String::new(),
            whiteboard: whiteboard.into(),
            see_also: Vec::new(),
            is_private: false,
            comment: None,
            component: String::new(),
            product: String::new(),
            priority: String::new(),
            severity: String::new(),
        }
    }

    #[test]
    fn unspecified_group_falls_back_to_default_steps() {
        let registry = ActionRegistry::new(vec![config("devtest", StepGroupsRaw::new())]).unwrap();
        let action = registry.lookup(&bug_with_whiteboard("[devtest]")).unwrap();
        assert_eq!(
            action.steps_for(Operation::Create),
            &[
                StepName::CreateIssue,
                StepName::MaybeDeleteDuplicate,
                StepName::AddLinkToBugzilla,
                StepName::AddLinkToJira,
                StepName::SyncWhiteboardLabels,
            ]
        );
        assert_eq!(
            action.steps_for(Operation::Comment),
            &[StepName::CreateComment]
        );
    }

    #[test]
    fn configured_group_overrides_default() {
        let mut raw = StepGroupsRaw::new();
        raw.insert("new".into(), vec!["create_issue".into()]);
        let registry = ActionRegistry::new(vec![config("devtest", raw)]).unwrap();
        let action = registry.lookup(&bug_with_whiteboard("[devtest]")).unwrap();
        assert_eq!(action.steps_for(Operation::Create), &[StepName::CreateIssue]);
    }

    #[test]
    fn unknown_group_key_fails_validation() {
        let mut raw = StepGroupsRaw::new();
        raw.insert("unsupported".into(), vec!["create_issue".into()]);
        let err = ActionRegistry::new(vec![config("devtest", raw)]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownGroup(g) if g == "unsupported"));
    }

    #[test]
    fn unknown_step_name_fails_validation() {
        let mut raw = StepGroupsRaw::new();
        raw.insert("new".into(), vec!["delete_everything".into()]);
        let err = ActionRegistry::new(vec![config("devtest", raw)]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownStep(s) if s == "delete_everything"));
    }

    #[test]
    fn lookup_prefers_deterministic_tag_order() {
        let registry = ActionRegistry::new(vec![
            config("devtest", StepGroupsRaw::new()),
            config("other", StepGroupsRaw::new()),
        ])
        .unwrap();
        let action = registry
            .lookup(&bug_with_whiteboard("[devtest] [other]"))
            .unwrap();
        assert_eq!(action.config.whiteboard_tag, "devtest");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = ActionRegistry::new(vec![config("DevTest", StepGroupsRaw::new())]).unwrap();
        assert!(registry.lookup(&bug_with_whiteboard("[devtest]")).is_ok());
    }

    #[test]
    fn lookup_fails_when_no_tag_matches() {
        let registry = ActionRegistry::new(vec![config("devtest", StepGroupsRaw::new())]).unwrap();
        let err = registry
            .lookup(&bug_with_whiteboard("[unrelated]"))
            .unwrap_err();
        assert!(matches!(err, LookupError::ActionNotFound));
    }

    #[test]
    fn duplicate_whiteboard_tag_fails_validation() {
        let err = ActionRegistry::new(vec![
            config("devtest", StepGroupsRaw::new()),
            config("DevTest", StepGroupsRaw::new()),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTag(_)));
    }
}

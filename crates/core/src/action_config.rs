use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::ProjectKey;

/// Custom-component configuration recognized under the `jira_components`
/// parameter key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraComponentsConfig {
    #[serde(default)]
    pub set_custom_components: Vec<String>,
}

/// Recognized `parameters` keys, plus any unrecognized keys retained
/// verbatim so the runner can surface them in `ctx.extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionParameters {
    #[serde(default = "default_true")]
    pub sync_whiteboard_labels: bool,
    #[serde(default)]
    pub status_map: HashMap<String, String>,
    #[serde(default)]
    pub resolution_map: HashMap<String, String>,
    #[serde(default)]
    pub jira_components: Option<JiraComponentsConfig>,
    /// Unknown keys: ignored by steps but retained for `ctx.extra`.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl Default for ActionParameters {
    fn default() -> Self {
        Self {
            sync_whiteboard_labels: true,
            status_map: HashMap::new(),
            resolution_map: HashMap::new(),
            jira_components: None,
            extra: HashMap::new(),
        }
    }
}

/// Raw, unvalidated step lists as they appear in configuration: group name
/// (`new` | `existing` | `comment`) to an ordered list of step-name strings.
/// `issuesync-actions::registry` resolves these into a closed `StepName` enum
/// at load time and fails loudly on unknown groups or names.
pub type StepGroupsRaw = HashMap<String, Vec<String>>;

/// A configured translation policy keyed by a whiteboard tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    pub whiteboard_tag: String,
    pub jira_project_key: ProjectKey,
    #[serde(default)]
    pub allow_private: bool,
    #[serde(default)]
    pub parameters: ActionParameters,
    #[serde(default)]
    pub steps: StepGroupsRaw,
}

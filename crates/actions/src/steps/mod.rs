//! The canonical step library: a named, pure-of-side-effects-beyond-clients
//! set of step functions, each `(ctx, params) -> (ctx', responses)`. Every
//! step must be idempotent under retry against an unchanged bug state.

mod assignment;
mod comments;
mod issue;
mod links;
mod status;

pub use assignment::maybe_assign_jira_user;
pub use comments::{add_jira_comments_for_changes, create_comment};
pub use issue::{
    create_issue, maybe_delete_duplicate, sync_whiteboard_labels, update_issue,
    update_issue_summary,
};
pub use links::{add_link_to_bugzilla, add_link_to_jira};
pub use status::{maybe_update_issue_resolution, maybe_update_issue_status};

use issuesync_clients::{DynSourceTrackerClient, DynTargetTrackerClient};

use crate::urls::TrackerUrls;

/// Bundles the tracker clients and base URLs every step needs, so step
/// signatures don't balloon with individual parameters.
pub struct StepEnv<'a> {
    pub source: &'a dyn DynSourceTrackerClient,
    pub target: &'a dyn DynTargetTrackerClient,
    pub urls: &'a TrackerUrls,
}

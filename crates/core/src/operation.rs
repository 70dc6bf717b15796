use serde::{Deserialize, Serialize};

/// The logical classification of a webhook request as it moves through the
/// runner and pipeline. `Create`, `Update`, `Comment`, and `Ignore` drive
/// dispatch; the rest are log-only tags used to annotate runner context at
/// different stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Comment,
    Ignore,
    Handle,
    Execute,
    Success,
    Link,
    Delete,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Comment => "comment",
            Self::Ignore => "ignore",
            Self::Handle => "handle",
            Self::Execute => "execute",
            Self::Success => "success",
            Self::Link => "link",
            Self::Delete => "delete",
        }
    }
}

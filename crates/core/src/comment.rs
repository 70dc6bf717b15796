use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single comment on a source-tracker bug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub text: String,
    pub author: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub is_private: bool,
}

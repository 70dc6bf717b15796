use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The kind of mutation a webhook event represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventAction {
    Create,
    Modify,
    CommentCreate,
    Other(String),
}

impl EventAction {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::CommentCreate => "comment_create",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for EventAction {
    fn from(value: &str) -> Self {
        match value {
            "create" => Self::Create,
            "modify" => Self::Modify,
            "comment_create" => Self::CommentCreate,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for EventAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from(String::deserialize(deserializer)?.as_str()))
    }
}

/// What part of the bug the event targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTarget {
    Bug,
    Comment,
    Other(String),
}

impl EventTarget {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bug => "bug",
            Self::Comment => "comment",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for EventTarget {
    fn from(value: &str) -> Self {
        match value {
            "bug" => Self::Bug,
            "comment" => Self::Comment,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for EventTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from(String::deserialize(deserializer)?.as_str()))
    }
}

/// A single field mutation carried by an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    #[serde(default)]
    pub removed: String,
    #[serde(default)]
    pub added: String,
}

/// A source-tracker webhook event: what changed, when, and by whom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub action: EventAction,
    pub time: DateTime<Utc>,
    pub user: EventUser,
    #[serde(default)]
    pub changes: Vec<FieldChange>,
    pub target: EventTarget,
    #[serde(default)]
    pub routing_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventUser {
    pub login: String,
}

impl Event {
    /// Union of `changes[*].field` and any field name embedded in
    /// `routing_key` after the colon (e.g. `bug.modify:status,resolution`).
    #[must_use]
    pub fn changed_fields(&self) -> Vec<String> {
        let mut fields: BTreeSet<String> = self.changes.iter().map(|c| c.field.clone()).collect();

        if let Some(routing_key) = &self.routing_key {
            if let Some((_, suffix)) = routing_key.split_once(':') {
                for field in suffix.split(',') {
                    let field = field.trim();
                    if !field.is_empty() {
                        fields.insert(field.to_string());
                    }
                }
            }
        }

        fields.into_iter().collect()
    }
}

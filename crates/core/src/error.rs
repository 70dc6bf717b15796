use serde::{Deserialize, Serialize};

/// Captured information about a Rust error that caused a webhook to fail
/// processing, stored alongside the queue item (the original's
/// `PythonException`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncError {
    pub kind: String,
    pub description: String,
    pub details: String,
}

impl SyncError {
    #[must_use]
    pub fn from_display(kind: impl Into<String>, err: &(dyn std::error::Error + 'static)) -> Self {
        Self {
            kind: kind.into(),
            description: err.to_string(),
            details: format!("{err:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "boom")
        }
    }

    impl std::error::Error for Boom {}

    #[test]
    fn from_display_captures_message() {
        let err = SyncError::from_display("CreateError", &Boom);
        assert_eq!(err.kind, "CreateError");
        assert_eq!(err.description, "boom");
        assert!(err.details.contains("Boom"));
    }

    #[test]
    fn sync_error_serde_roundtrip() {
        let err = SyncError {
            kind: "CreateError".into(),
            description: "d".into(),
            details: "tb".into(),
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: SyncError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}

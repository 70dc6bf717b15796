use issuesync_clients::ClientError;
use issuesync_core::SyncError;
use thiserror::Error;

/// Errors raised while validating an `ActionRegistry` at load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported step group {0:?}, expected one of new/existing/comment")]
    UnknownGroup(String),

    #[error("unsupported step name {0:?}")]
    UnknownStep(String),

    #[error("duplicate whiteboard tag {0:?}")]
    DuplicateTag(String),
}

/// Errors raised by an individual step function.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("tracker client error: {0}")]
    Client(#[from] ClientError),

    #[error("target tracker rejected the create: {0}")]
    CreateError(String),
}

/// Errors raised resolving a bug to a configured action.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no action matches the bug's whiteboard tags")]
    ActionNotFound,
}

/// Errors raised by the action runner. `IgnoreInvalidRequest` is the sole
/// variant the caller is expected to swallow into a 200 response and an
/// "ignored" counter increment; everything else propagates to the caller's
/// enqueue-on-failure policy.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("ignoring invalid request: {0}")]
    IgnoreInvalidRequest(String),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl RunnerError {
    #[must_use]
    pub fn is_ignore(&self) -> bool {
        matches!(self, Self::IgnoreInvalidRequest(_))
    }

    /// Capture this error for storage on a `QueueItem` destined for the
    /// dead-letter queue. Callers should not call this for
    /// `IgnoreInvalidRequest`, which is dropped rather than queued.
    #[must_use]
    pub fn to_sync_error(&self) -> SyncError {
        SyncError::from_display(self.kind(), self)
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::IgnoreInvalidRequest(_) => "IgnoreInvalidRequest",
            Self::Step(StepError::CreateError(_)) => "CreateError",
            Self::Step(StepError::Client(_)) | Self::Client(_) => "ClientError",
        }
    }
}

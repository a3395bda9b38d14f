use crate::types::ActionType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmrError {
    #[error("unknown action type: {0}")]
    UnknownActionType(String),

    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("preset not found: {0}")]
    PresetNotFound(String),

    #[error("duplicate action id: {0}")]
    DuplicateActionId(String),

    #[error("invalid {action_type} action: missing {}", .missing.join(", "))]
    ValidationFailed {
        action_type: ActionType,
        missing: Vec<String>,
    },

    #[error("workflow has no actions")]
    EmptyWorkflow,

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("instance not found: {0}")]
    InstanceNotFound(String),

    #[error("{operation} failed: {message}")]
    Service { operation: String, message: String },
}

impl AmrError {
    /// Shorthand for the service-boundary error category, the only one
    /// surfaced to an operator rather than treated as a caller bug.
    pub fn service(operation: impl Into<String>, message: impl Into<String>) -> Self {
        AmrError::Service {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AmrError>;

use thiserror::Error;

/// Failures the engine reports to its caller.
///
/// An unreachable target is not an error; planners report it in their result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A subject, target or grading config is outside the numeric domain.
    /// `field` is the path of the offending value, e.g. `subjects[1].see`.
    #[error("{field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// The requested subject code is not among the subjects.
    #[error("unknown subject '{code}'")]
    UnknownSubject { code: String },
}

impl EngineError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Path of the offending value, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            EngineError::InvalidInput { field, .. } => Some(field),
            EngineError::UnknownSubject { .. } => None,
        }
    }
}

//! Error types for the production pipeline.

use thiserror::Error;

use crate::pipeline::stage::Stage;

/// Result type alias for studio operations.
pub type StudioResult<T> = Result<T, StudioError>;

/// Errors that can occur while driving the pipeline.
///
/// None of these are fatal: every one is recoverable by supplying the missing
/// precondition or retrying the action.
#[derive(Error, Debug)]
pub enum StudioError {
    /// An entity id was not present in its collection.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A stage's primary action was invoked without its required input.
    #[error("Action blocked: {0}")]
    Blocked(#[from] Blocked),

    /// A batch action for this stage is already in flight.
    #[error("{0} generation already in progress")]
    Busy(Stage),

    /// Configuration file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Filesystem error while reading config or writing exports.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON export failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StudioError {
    /// Creates a NotFound error.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Creates a Blocked error.
    pub fn blocked(reason: Blocked) -> Self {
        Self::Blocked(reason)
    }
}

/// Missing precondition for a stage's primary action.
///
/// Returned by `PipelineController::check_ready` as a plain value; only
/// surfaced as an error when a generation action is invoked regardless.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    /// Script drafting needs at least one approved idea.
    #[error("no approved ideas")]
    NoApprovedIdeas,

    /// Prompt synthesis needs a non-empty script draft.
    #[error("script draft is empty")]
    EmptyScript,

    /// Script has no content lines once markers and blanks are dropped.
    #[error("script has no content lines")]
    NoScriptLines,

    /// Video rendering needs at least one b-roll prompt.
    #[error("no b-roll prompts")]
    NoPrompts,

    /// Video rendering needs a configured generation credential.
    #[error("generation credential is not configured")]
    MissingCredential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StudioError::not_found("clip", "clip-1");
        assert_eq!(err.to_string(), "clip not found: clip-1");

        let err = StudioError::blocked(Blocked::MissingCredential);
        assert_eq!(
            err.to_string(),
            "Action blocked: generation credential is not configured"
        );

        let err = StudioError::Busy(Stage::BRoll);
        assert_eq!(err.to_string(), "B-roll Prompting generation already in progress");
    }
}

//! Assessment error types.
//!
//! These represent caller misuse of the engine. The decision logic itself is
//! total over well-formed input, so nothing here is transient or retryable.

use thiserror::Error;
use uuid::Uuid;

use crate::session::AssessmentState;

/// Errors returned by the assessment engine and session registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    /// The operation is not allowed in the session's current state.
    #[error("invalid state: session is {state}")]
    InvalidState { state: AssessmentState },

    /// A level, rule, snapshot, or answer input is out of range or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No session is registered under this id.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),
}

impl AssessmentError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        AssessmentError::InvalidArgument(message.into())
    }

    /// Returns `true` if the error comes from a completed session being reused.
    pub fn is_completed_session(&self) -> bool {
        matches!(
            self,
            AssessmentError::InvalidState {
                state: AssessmentState::Completed
            }
        )
    }
}

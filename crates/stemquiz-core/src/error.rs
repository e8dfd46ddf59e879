//! Error types for loading question sets and driving sessions.
//!
//! Validation failures are recoverable and shown to the user. Transition
//! errors mean a caller broke the session contract and should end the
//! session.

use thiserror::Error;

use crate::schema::Violation;

/// Errors surfaced while turning raw input into a playable question set.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The input could not be decoded as JSON.
    #[error("Invalid JSON format: {0}")]
    MalformedInput(String),

    /// The input decoded but broke one or more schema rules.
    #[error("question set has {} violation(s)", .0.len())]
    SchemaViolation(Vec<Violation>),

    /// A session was driven outside its contract.
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
}

impl QuizError {
    /// Human-readable messages, one per line of user feedback.
    pub fn messages(&self) -> Vec<String> {
        match self {
            QuizError::SchemaViolation(violations) => {
                violations.iter().map(ToString::to_string).collect()
            }
            other => vec![other.to_string()],
        }
    }
}

/// Contract violations of the session state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// `submit_answer` was called after the last question was answered.
    #[error("session is already complete")]
    SessionComplete,

    /// The transcript was requested before every question was answered.
    #[error("session is still in progress ({answered}/{total} answered)")]
    SessionInProgress { answered: usize, total: usize },

    /// The selection was not a non-negative integer.
    #[error("invalid answer selection: {0:?}")]
    InvalidSelection(String),
}

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        QuizError::MalformedInput(err.to_string())
    }
}

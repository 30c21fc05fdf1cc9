//! Error types for the quiz engine.
//!
//! Question errors are raised when a question is materialized, never when it
//! is scored. Bank errors live here rather than in `quizkit-bank` so callers
//! holding a `dyn QuestionSource` can match on them without string inspection.

use thiserror::Error;

/// Errors raised while turning a question description into a scorable unit.
#[derive(Debug, Error)]
pub enum QuestionError {
    /// The question is malformed (missing options, answer/type mismatch, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The `type` tag is not one the engine knows how to score.
    #[error("unsupported question type: {0}")]
    UnsupportedType(String),

    /// A question inside a pool failed to materialize.
    #[error("question {index}: {source}")]
    InPool {
        index: usize,
        #[source]
        source: Box<QuestionError>,
    },
}

impl QuestionError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        QuestionError::Configuration(message.into())
    }

    /// The innermost error, skipping pool position wrappers.
    pub fn root(&self) -> &QuestionError {
        match self {
            QuestionError::InPool { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Errors that can occur when fetching questions from a question bank.
#[derive(Debug, Error)]
pub enum BankError {
    /// HTTP 200, but the body's `status` field was not `"success"`.
    #[error("question bank answered HTTP 200 with status {status:?}")]
    Protocol { status: String },

    /// Any HTTP status other than 200 or 204.
    #[error("question bank request failed (HTTP {status})")]
    Transport { status: u16 },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred before a status was received.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not a valid question bank document.
    #[error("failed to decode question bank response: {0}")]
    Decode(String),

    /// The configured base URL cannot carry a query path.
    #[error("invalid question bank URL: {0}")]
    InvalidUrl(String),
}

impl BankError {
    /// The HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            BankError::Transport { status } => Some(*status),
            BankError::Protocol { .. } | BankError::Decode(_) => Some(200),
            _ => None,
        }
    }
}

/// Errors returned by invalid actions on a quiz session.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("slot {slot} is out of range ({len} questions displayed)")]
    SlotOutOfRange { slot: usize, len: usize },

    #[error("slot {slot} expects {expected} input")]
    InputMismatch { slot: usize, expected: &'static str },

    #[error("cannot {action} while session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("slot {slot} has no notes to reveal")]
    NoNotes { slot: usize },
}

/// Errors returned by a rendering collaborator.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot display {0}")]
    Unsupported(String),
}

//! Bank error types.
//!
//! The error enum is defined in `quizkit-core` so that engine callers holding
//! a `dyn QuestionSource` can match on it.

pub use quizkit_core::error::BankError;

/// Map a `reqwest` send failure onto the bank error taxonomy.
pub(crate) fn from_send_error(error: reqwest::Error, timeout_secs: u64) -> BankError {
    if error.is_timeout() {
        BankError::Timeout(timeout_secs)
    } else {
        BankError::Network(error.to_string())
    }
}

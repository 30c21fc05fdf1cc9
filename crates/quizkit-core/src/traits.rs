//! Collaborator traits: where questions come from and where they are drawn.
//!
//! `QuestionSource` is implemented by `quizkit-bank`, `Renderer` by
//! `quizkit-report`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{BankError, DisplayError, QuestionError};
use crate::model::{QuestionPool, WireQuestion};
use crate::session::{QuestionFrame, SubmitOutcome};

// ---------------------------------------------------------------------------
// Question source trait
// ---------------------------------------------------------------------------

/// A remote or in-memory question bank searched by free-text query.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. "faceit").
    fn name(&self) -> &str;

    /// Fetch the questions matching `query`.
    async fn fetch(&self, query: &str) -> Result<FetchOutcome, BankError>;
}

/// Result of a question bank search. An empty result is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "questions", rename_all = "snake_case")]
pub enum FetchOutcome {
    Questions(Vec<WireQuestion>),
    NoResults,
}

impl FetchOutcome {
    pub fn len(&self) -> usize {
        match self {
            FetchOutcome::Questions(questions) => questions.len(),
            FetchOutcome::NoResults => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn questions(&self) -> &[WireQuestion] {
        match self {
            FetchOutcome::Questions(questions) => questions,
            FetchOutcome::NoResults => &[],
        }
    }

    /// Materialize the fetched questions into a pool.
    pub fn into_pool(self) -> Result<QuestionPool, QuestionError> {
        match self {
            FetchOutcome::Questions(questions) => QuestionPool::from_wire(&questions),
            FetchOutcome::NoResults => Ok(QuestionPool::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer trait
// ---------------------------------------------------------------------------

/// The rendering collaborator of a quiz session.
///
/// Failures are returned rather than swallowed; the caller decides whether to
/// show a fallback notice.
pub trait Renderer {
    /// What a successful render produces (markup, nothing, ...).
    type Output;

    /// Draw the questions of the current cycle with their live input.
    fn render_frame(&mut self, frame: &QuestionFrame<'_>) -> Result<Self::Output, DisplayError>;

    /// Draw per-question feedback and the group verdict.
    fn render_outcome(&mut self, outcome: &SubmitOutcome) -> Result<Self::Output, DisplayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_results_is_an_empty_pool() {
        let outcome = FetchOutcome::NoResults;
        assert!(outcome.is_empty());
        assert!(outcome.questions().is_empty());
        assert!(outcome.into_pool().unwrap().is_empty());
    }

    #[test]
    fn questions_materialize() {
        let wire: WireQuestion = serde_json::from_value(serde_json::json!({
            "type": "NUMERIC", "body": "6*7", "answer": "42"
        }))
        .unwrap();
        let outcome = FetchOutcome::Questions(vec![wire]);
        assert_eq!(outcome.len(), 1);
        assert_eq!(outcome.into_pool().unwrap().len(), 1);
    }

    #[test]
    fn invalid_fetched_question_fails_loudly() {
        let wire: WireQuestion = serde_json::from_value(serde_json::json!({
            "type": "ESSAY", "body": "Discuss"
        }))
        .unwrap();
        let err = FetchOutcome::Questions(vec![wire]).into_pool().unwrap_err();
        assert!(matches!(err.root(), QuestionError::UnsupportedType(_)));
    }
}

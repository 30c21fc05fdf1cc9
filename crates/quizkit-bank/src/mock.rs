//! In-memory question source for tests and offline use.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use quizkit_core::model::WireQuestion;
use quizkit_core::traits::{FetchOutcome, QuestionSource};

use crate::error::BankError;

/// A question source backed by a fixed query → questions map.
///
/// Unknown queries answer `NoResults`, like the bank's 204.
#[derive(Default)]
pub struct StaticSource {
    /// Map of query → questions.
    questions: HashMap<String, Vec<WireQuestion>>,
    /// Simulated HTTP failure status.
    fail_with: Option<u16>,
    /// Number of fetches made.
    call_count: AtomicU32,
    /// Last query received.
    last_query: Mutex<Option<String>>,
}

impl StaticSource {
    pub fn new(questions: HashMap<String, Vec<WireQuestion>>) -> Self {
        Self {
            questions,
            ..Self::default()
        }
    }

    /// Add the questions answered for `query`.
    pub fn with_questions(mut self, query: impl Into<String>, questions: Vec<WireQuestion>) -> Self {
        self.questions.insert(query.into(), questions);
        self
    }

    /// A source whose every fetch fails with `BankError::Transport { status }`.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    /// Get the number of fetches made against this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last query made against this source.
    pub fn last_query(&self) -> Option<String> {
        self.last_query
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl QuestionSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, query: &str) -> Result<FetchOutcome, BankError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_query
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(query.to_string());

        if let Some(status) = self.fail_with {
            return Err(BankError::Transport { status });
        }

        Ok(match self.questions.get(query) {
            Some(questions) if !questions.is_empty() => FetchOutcome::Questions(questions.clone()),
            _ => FetchOutcome::NoResults,
        })
    }
}

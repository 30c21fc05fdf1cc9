//! The quiz session state machine.
//!
//! ```text
//! Rendering -> AwaitingSubmit -> Evaluating -> Approved
//!     ^                                    \-> Rejected
//!     \_______________ retry() _______________/
//! ```
//!
//! All transitions happen synchronously inside one `&mut self` call, so
//! `Rendering` and `Evaluating` are never observable from outside.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{aggregate, GroupOutcome, Verdict};
use crate::error::SessionError;
use crate::evaluator::{evaluate, Evaluation};
use crate::feedback::{group_feedback, question_feedback, Feedback};
use crate::model::{DisplayPhase, InputState, Question, QuestionKind, QuestionPool};
use crate::registry::FunctionRegistry;
use crate::selector::Selector;

/// Configuration for a quiz session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    /// Questions shown per cycle (None = the whole eligible pool).
    pub display_count: Option<NonZeroUsize>,
    /// Seed for reproducible draws.
    pub seed: Option<u64>,
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Rendering,
    AwaitingSubmit,
    Evaluating,
    Approved,
    Rejected,
}

impl SessionState {
    fn name(self) -> &'static str {
        match self {
            SessionState::Rendering => "rendering",
            SessionState::AwaitingSubmit => "awaiting submit",
            SessionState::Evaluating => "evaluating",
            SessionState::Approved => "approved",
            SessionState::Rejected => "rejected",
        }
    }

    pub fn verdict(self) -> Verdict {
        match self {
            SessionState::Approved => Verdict::Approved,
            SessionState::Rejected => Verdict::Rejected,
            _ => Verdict::Unchecked,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One displayed question as seen by a renderer.
#[derive(Debug, Clone, Copy)]
pub struct SlotView<'a> {
    pub slot: usize,
    pub question: &'a Question,
    pub input: &'a InputState,
    pub notes_revealed: bool,
}

/// Everything a renderer needs to draw the current cycle.
#[derive(Debug, Clone)]
pub struct QuestionFrame<'a> {
    pub attempt: u32,
    pub slots: Vec<SlotView<'a>>,
}

/// Per-question result of a submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedQuestion {
    pub slot: usize,
    pub evaluation: Evaluation,
    pub feedback: Feedback,
    /// Notes shown after the quiz is approved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub explanation: Vec<String>,
}

/// Result of one submit action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub attempt: u32,
    pub graded: Vec<GradedQuestion>,
    pub group: GroupOutcome,
    pub feedback: Feedback,
}

impl SubmitOutcome {
    pub fn verdict(&self) -> Verdict {
        self.group.verdict
    }
}

/// Serializable snapshot of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub attempts: u32,
    pub verdict: Verdict,
    pub state: SessionState,
    pub displayed: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<SubmitOutcome>,
}

/// A stateful quiz over a shared question pool.
pub struct QuizSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    pool: QuestionPool,
    selector: Selector,
    registry: Arc<FunctionRegistry>,
    rng: StdRng,
    state: SessionState,
    attempt: u32,
    displayed: Vec<usize>,
    inputs: Vec<InputState>,
    revealed: Vec<bool>,
    last_outcome: Option<SubmitOutcome>,
}

impl QuizSession {
    /// Create a session and draw its first subset.
    pub fn new(pool: QuestionPool, config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            pool,
            selector: Selector::new(config.display_count),
            registry: Arc::new(FunctionRegistry::new()),
            rng,
            state: SessionState::Rendering,
            attempt: 1,
            displayed: Vec::new(),
            inputs: Vec::new(),
            revealed: Vec::new(),
            last_outcome: None,
        };
        session.render(DisplayPhase::Initial);
        session
    }

    /// Use `registry` to resolve code question answers.
    pub fn with_registry(mut self, registry: Arc<FunctionRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn verdict(&self) -> Verdict {
        self.state.verdict()
    }

    /// 1-based display cycle counter.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    /// Questions in the current cycle, in display order.
    pub fn displayed(&self) -> impl Iterator<Item = &Question> + '_ {
        self.displayed.iter().filter_map(|&i| self.pool.get(i))
    }

    pub fn len(&self) -> usize {
        self.displayed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displayed.is_empty()
    }

    pub fn input(&self, slot: usize) -> Option<&InputState> {
        self.inputs.get(slot)
    }

    pub fn last_outcome(&self) -> Option<&SubmitOutcome> {
        self.last_outcome.as_ref()
    }

    /// The current cycle for the rendering collaborator.
    pub fn frame(&self) -> QuestionFrame<'_> {
        let slots = self
            .displayed()
            .zip(self.inputs.iter().zip(&self.revealed))
            .enumerate()
            .map(|(slot, (question, (input, revealed)))| SlotView {
                slot,
                question,
                input,
                notes_revealed: *revealed,
            })
            .collect();

        QuestionFrame {
            attempt: self.attempt,
            slots,
        }
    }

    /// Record the learner's input for `slot`.
    pub fn set_input(&mut self, slot: usize, input: InputState) -> Result<(), SessionError> {
        self.ensure_state("change input", SessionState::AwaitingSubmit)?;
        let question = self.question_at(slot)?;
        if !input.fits(question.kind()) {
            return Err(SessionError::InputMismatch {
                slot,
                expected: question.kind().expected_input(),
            });
        }
        self.inputs[slot] = input;
        Ok(())
    }

    pub fn clear_input(&mut self, slot: usize) -> Result<(), SessionError> {
        self.set_input(slot, InputState::Empty)
    }

    /// Show or hide the notes of an informational question. Returns the new
    /// visibility.
    pub fn toggle_notes(&mut self, slot: usize) -> Result<bool, SessionError> {
        let question = self.question_at(slot)?;
        if !matches!(question.kind(), QuestionKind::Informational) || question.notes().is_empty() {
            return Err(SessionError::NoNotes { slot });
        }
        let revealed = &mut self.revealed[slot];
        *revealed = !*revealed;
        Ok(*revealed)
    }

    /// Evaluate every displayed question and decide the verdict.
    ///
    /// Submitting again without changing input (a double click, or a submit
    /// after the verdict) re-evaluates and yields the same verdict.
    pub fn submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        match self.state {
            SessionState::AwaitingSubmit => {
                self.transition(SessionState::Evaluating);
                let mut outcome = self.evaluate_all();
                let next = match outcome.verdict() {
                    Verdict::Approved => SessionState::Approved,
                    _ => SessionState::Rejected,
                };
                self.transition(next);
                if next == SessionState::Approved {
                    self.explain(&mut outcome);
                }
                self.last_outcome = Some(outcome.clone());
                Ok(outcome)
            }
            SessionState::Approved | SessionState::Rejected => {
                let mut outcome = self.evaluate_all();
                if self.state == SessionState::Approved {
                    self.explain(&mut outcome);
                }
                self.last_outcome = Some(outcome.clone());
                Ok(outcome)
            }
            state => Err(SessionError::InvalidTransition {
                action: "submit",
                state: state.name(),
            }),
        }
    }

    /// Draw a fresh subset after a rejected submit, discarding all input.
    pub fn retry(&mut self) -> Result<(), SessionError> {
        self.ensure_state("retry", SessionState::Rejected)?;
        self.attempt += 1;
        self.render(DisplayPhase::Retry);
        Ok(())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            started_at: self.started_at,
            attempts: self.attempt,
            verdict: self.verdict(),
            state: self.state,
            displayed: self.displayed().map(|q| q.prompt().to_string()).collect(),
            last_outcome: self.last_outcome.clone(),
        }
    }

    fn render(&mut self, phase: DisplayPhase) {
        self.transition(SessionState::Rendering);
        self.displayed = self
            .selector
            .draw(self.pool.as_slice(), phase, &mut self.rng);
        self.inputs = vec![InputState::Empty; self.displayed.len()];
        self.revealed = vec![false; self.displayed.len()];
        self.last_outcome = None;
        tracing::debug!(
            session = %self.id,
            attempt = self.attempt,
            %phase,
            displayed = self.displayed.len(),
            "drew question subset"
        );
        self.transition(SessionState::AwaitingSubmit);
    }

    fn evaluate_all(&self) -> SubmitOutcome {
        let graded: Vec<GradedQuestion> = self
            .displayed()
            .zip(&self.inputs)
            .enumerate()
            .map(|(slot, (question, input))| {
                let evaluation = evaluate(question, input, &self.registry);
                GradedQuestion {
                    slot,
                    evaluation,
                    feedback: question_feedback(question, evaluation),
                    explanation: Vec::new(),
                }
            })
            .collect();

        let evaluations: Vec<Evaluation> = graded.iter().map(|g| g.evaluation).collect();
        let group = aggregate(&evaluations);

        SubmitOutcome {
            attempt: self.attempt,
            graded,
            group,
            feedback: group_feedback(group.verdict),
        }
    }

    /// Attach notes of scored questions as post-hoc explanation.
    fn explain(&self, outcome: &mut SubmitOutcome) {
        for (graded, question) in outcome.graded.iter_mut().zip(self.displayed()) {
            if !matches!(question.kind(), QuestionKind::Informational) {
                graded.explanation = question.notes().to_vec();
            }
        }
    }

    fn question_at(&self, slot: usize) -> Result<&Question, SessionError> {
        self.displayed
            .get(slot)
            .and_then(|&i| self.pool.get(i))
            .ok_or(SessionError::SlotOutOfRange {
                slot,
                len: self.displayed.len(),
            })
    }

    fn ensure_state(&self, action: &'static str, expected: SessionState) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                state: self.state.name(),
            })
        }
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(session = %self.id, from = %self.state, to = %next, "session transition");
        self.state = next;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("attempt", &self.attempt)
            .field("displayed", &self.displayed)
            .finish_non_exhaustive()
    }
}

//! Scoring strategies, one per question kind.
//!
//! Every evaluator is a pure read of an [`InputState`]: running it twice on
//! the same input gives the same [`Evaluation`].

use serde::{Deserialize, Serialize};

use crate::model::{CodeCase, InputState, Question, QuestionKind};
use crate::registry::FunctionRegistry;

/// A normalized score, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    pub const ZERO: Score = Score(0.0);
    pub const FULL: Score = Score(1.0);

    /// Clamp `value` into `[0, 1]`. NaN becomes zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Score::ZERO
        } else {
            Score(value.clamp(0.0, 1.0))
        }
    }

    pub fn from_bool(correct: bool) -> Self {
        if correct {
            Score::FULL
        } else {
            Score::ZERO
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_full(self) -> bool {
        self.0 == 1.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Score::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// The result of evaluating one question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "score", rename_all = "snake_case")]
pub enum Evaluation {
    /// No input was given. Distinct from a score of zero.
    Unanswered,
    Scored(Score),
}

impl Evaluation {
    pub fn score(self) -> Option<Score> {
        match self {
            Evaluation::Scored(score) => Some(score),
            Evaluation::Unanswered => None,
        }
    }

    /// Contribution to a group total; unanswered counts as zero.
    pub fn points(self) -> f64 {
        self.score().map_or(0.0, Score::value)
    }

    pub fn is_answered(self) -> bool {
        matches!(self, Evaluation::Scored(_))
    }

    pub fn is_full(self) -> bool {
        self.score().is_some_and(Score::is_full)
    }
}

/// Evaluate `question` against the current `input`.
///
/// Input whose shape does not fit the question kind is treated as unanswered.
pub fn evaluate(question: &Question, input: &InputState, registry: &FunctionRegistry) -> Evaluation {
    if !input.fits(question.kind()) {
        tracing::debug!(
            kind = question.kind().label(),
            ?input,
            "input does not fit question kind, treating as unanswered"
        );
        return Evaluation::Unanswered;
    }

    match question.kind() {
        QuestionKind::SingleChoice { answer, .. } => single_choice(answer, input),
        QuestionKind::MultiChoice { answers, .. } => multi_choice(answers, input),
        QuestionKind::Numeric { answer } => numeric(*answer, input),
        QuestionKind::Informational => informational(),
        QuestionKind::Code { tests } => code(tests, input, registry),
    }
}

/// 1.0 if the chosen option is the answer, 0.0 for any other choice.
pub fn single_choice(answer: &str, input: &InputState) -> Evaluation {
    match input {
        InputState::Choice(chosen) => Evaluation::Scored(Score::from_bool(chosen == answer)),
        _ => Evaluation::Unanswered,
    }
}

/// Fraction of the correct options that were toggled.
///
/// Toggled wrong options never enter the numerator, and the result is
/// clamped, so over-selection cannot push the score outside `[0, 1]`.
pub fn multi_choice(answers: &[String], input: &InputState) -> Evaluation {
    let InputState::Toggled(chosen) = input else {
        return Evaluation::Unanswered;
    };
    if chosen.is_empty() {
        return Evaluation::Unanswered;
    }
    if answers.is_empty() {
        return Evaluation::Scored(Score::ZERO);
    }

    let hits = answers
        .iter()
        .filter(|a| chosen.contains(a.as_str()))
        .count();
    Evaluation::Scored(Score::new(hits as f64 / answers.len() as f64))
}

/// Exact float equality.
pub fn numeric(answer: f64, input: &InputState) -> Evaluation {
    match input {
        InputState::Number(value) => Evaluation::Scored(Score::from_bool(*value == answer)),
        _ => Evaluation::Unanswered,
    }
}

/// Informational questions always give full credit.
pub fn informational() -> Evaluation {
    Evaluation::Scored(Score::FULL)
}

/// Resolve the named function and check it against every test case.
pub fn code(tests: &[CodeCase], input: &InputState, registry: &FunctionRegistry) -> Evaluation {
    let InputState::Function(name) = input else {
        return Evaluation::Unanswered;
    };
    let name = name.trim();
    if name.is_empty() {
        return Evaluation::Unanswered;
    }

    let Some(function) = registry.resolve(name) else {
        tracing::debug!(function = name, "no function registered under this name");
        return Evaluation::Unanswered;
    };

    let passed = tests.iter().all(|case| function(case.args.as_slice()) == case.expected);
    Evaluation::Scored(Score::from_bool(passed))
}

//! Human-readable feedback for scores and verdicts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregate::Verdict;
use crate::evaluator::Evaluation;
use crate::model::{Question, QuestionKind};

/// How a piece of feedback should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Neutral,
    Incorrect,
    Partial,
    Correct,
}

impl Severity {
    /// CSS colour name used to border feedback of this severity.
    pub fn color(self) -> &'static str {
        match self {
            Severity::Neutral => "lightgrey",
            Severity::Incorrect => "lightcoral",
            Severity::Partial => "yellow",
            Severity::Correct => "lightgreen",
        }
    }

    pub fn for_evaluation(evaluation: Evaluation) -> Self {
        match evaluation.score() {
            None => Severity::Neutral,
            Some(score) if score.is_zero() => Severity::Incorrect,
            Some(score) if score.is_full() => Severity::Correct,
            Some(_) => Severity::Partial,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Neutral => write!(f, "neutral"),
            Severity::Incorrect => write!(f, "incorrect"),
            Severity::Partial => write!(f, "partial"),
            Severity::Correct => write!(f, "correct"),
        }
    }
}

/// A message plus its severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    pub severity: Severity,
}

impl Feedback {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Generic feedback for any score.
pub fn score_feedback(evaluation: Evaluation) -> Feedback {
    let severity = Severity::for_evaluation(evaluation);
    let message = match (severity, evaluation.score()) {
        (Severity::Partial, Some(score)) => {
            format!("Partially correct ({:.0}%)", score.value() * 100.0)
        }
        (Severity::Neutral, _) => "No answer selected".to_string(),
        (Severity::Incorrect, _) => "Wrong answer!".to_string(),
        _ => "Correct!".to_string(),
    };
    Feedback::new(message, severity)
}

/// Feedback worded for the kind of `question`.
pub fn question_feedback(question: &Question, evaluation: Evaluation) -> Feedback {
    let severity = Severity::for_evaluation(evaluation);
    match question.kind() {
        QuestionKind::MultiChoice { answers, .. } => {
            let message = match (severity, evaluation.score()) {
                (Severity::Neutral, _) => "Please pick an answer".to_string(),
                (Severity::Incorrect, _) => "Incorrect answer".to_string(),
                (Severity::Partial, Some(score)) => {
                    let hits = (score.value() * answers.len() as f64).round() as usize;
                    format!("Correct answers: {hits}/{}", answers.len())
                }
                _ => "Correct!".to_string(),
            };
            Feedback::new(message, severity)
        }
        QuestionKind::Code { .. } if severity == Severity::Neutral => Feedback::new(
            "No function defined with that name. Define the function and try again.",
            severity,
        ),
        QuestionKind::Code { .. } if severity == Severity::Incorrect => {
            Feedback::new("Incorrect answer!", severity)
        }
        QuestionKind::Informational => Feedback::new("No answer required", severity),
        _ => score_feedback(evaluation),
    }
}

/// Feedback for the group as a whole.
pub fn group_feedback(verdict: Verdict) -> Feedback {
    match verdict {
        Verdict::Approved => Feedback::new("All questions are correct!", Severity::Correct),
        Verdict::Rejected => {
            Feedback::new("Some answers are wrong. Try again!", Severity::Incorrect)
        }
        Verdict::Unchecked => Feedback::new("Not checked yet", Severity::Neutral),
    }
}

//! Core data model types for quizkit.
//!
//! A [`Question`] is built either from its typed constructors or from the
//! JSON wire schema ([`WireQuestion`]). Both paths validate eagerly, so a
//! question that exists is always scorable.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::QuestionError;

/// Which display cycle a question is reserved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayPhase {
    /// The first draw of a session.
    Initial,
    /// Draws that follow a rejected submit.
    Retry,
}

impl fmt::Display for DisplayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayPhase::Initial => write!(f, "initial"),
            DisplayPhase::Retry => write!(f, "retry"),
        }
    }
}

impl FromStr for DisplayPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "initial" | "first" => Ok(DisplayPhase::Initial),
            "retry" => Ok(DisplayPhase::Retry),
            other => Err(format!("unknown display phase: {other}")),
        }
    }
}

/// One expected call of a code question: `f(args...) == expected`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeCase {
    /// Positional arguments passed to the learner's function.
    #[serde(default)]
    pub args: Vec<Value>,
    /// The value the function must return.
    pub expected: Value,
}

/// The scorable shape of a question. Each variant carries only what its
/// evaluator needs.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    SingleChoice {
        options: Vec<String>,
        answer: String,
    },
    MultiChoice {
        options: Vec<String>,
        /// Correct options in declaration order, without duplicates.
        answers: Vec<String>,
    },
    Numeric {
        answer: f64,
    },
    Informational,
    Code {
        tests: Vec<CodeCase>,
    },
}

impl QuestionKind {
    /// Human-readable kind name.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice { .. } => "single choice",
            QuestionKind::MultiChoice { .. } => "multiple choice",
            QuestionKind::Numeric { .. } => "numeric",
            QuestionKind::Informational => "informational",
            QuestionKind::Code { .. } => "code",
        }
    }

    /// The `type` tag used by the wire schema.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice { .. } | QuestionKind::MultiChoice { .. } => {
                WIRE_MULTIPLE_CHOICE
            }
            QuestionKind::Numeric { .. } => WIRE_NUMERIC,
            QuestionKind::Informational => WIRE_TEXT,
            QuestionKind::Code { .. } => WIRE_CODE,
        }
    }

    /// The options offered to the learner, for choice questions.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            QuestionKind::SingleChoice { options, .. }
            | QuestionKind::MultiChoice { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Describes the input a learner provides for this kind.
    pub fn expected_input(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice { .. } => "a single option",
            QuestionKind::MultiChoice { .. } => "a set of options",
            QuestionKind::Numeric { .. } => "a number",
            QuestionKind::Informational => "no",
            QuestionKind::Code { .. } => "a function name",
        }
    }
}

pub const WIRE_MULTIPLE_CHOICE: &str = "MULTIPLE_CHOICE";
pub const WIRE_NUMERIC: &str = "NUMERIC";
pub const WIRE_TEXT: &str = "TEXT";
pub const WIRE_CODE: &str = "CODE";

/// An immutable, validated quiz question.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    prompt: String,
    kind: QuestionKind,
    notes: Vec<String>,
    phase: Option<DisplayPhase>,
    /// `answers`/`answer` exactly as read from a wire document.
    source: Option<WireFields>,
}

#[derive(Debug, Clone, PartialEq)]
struct WireFields {
    answers: Option<Vec<String>>,
    answer: Option<WireAnswer>,
}

impl Question {
    fn with_kind(prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            prompt: prompt.into(),
            kind,
            notes: Vec::new(),
            phase: None,
            source: None,
        }
    }

    /// A choice question with exactly one correct option.
    pub fn single_choice(
        prompt: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let answer = answer.into();
        check_options(&options, std::slice::from_ref(&answer))?;
        Ok(Self::with_kind(
            prompt,
            QuestionKind::SingleChoice { options, answer },
        ))
    }

    /// A choice question where every correct option must be toggled.
    pub fn multi_choice(
        prompt: impl Into<String>,
        options: Vec<String>,
        answers: Vec<String>,
    ) -> Result<Self, QuestionError> {
        if answers.is_empty() {
            return Err(QuestionError::config(
                "multiple choice question needs at least one correct answer",
            ));
        }
        check_options(&options, &answers)?;

        let mut seen = BTreeSet::new();
        let answers = answers
            .into_iter()
            .filter(|a| seen.insert(a.clone()))
            .collect();
        Ok(Self::with_kind(
            prompt,
            QuestionKind::MultiChoice { options, answers },
        ))
    }

    /// A question answered with a number, graded by exact equality.
    pub fn numeric(prompt: impl Into<String>, answer: f64) -> Result<Self, QuestionError> {
        if !answer.is_finite() {
            return Err(QuestionError::config(format!(
                "numeric answer must be finite, got {answer}"
            )));
        }
        Ok(Self::with_kind(prompt, QuestionKind::Numeric { answer }))
    }

    /// A question with no input; `notes` are revealed on demand.
    pub fn informational(prompt: impl Into<String>, notes: Vec<String>) -> Self {
        Self::with_kind(prompt, QuestionKind::Informational).with_notes(notes)
    }

    /// A question graded by calling a learner-defined function.
    pub fn code(prompt: impl Into<String>, tests: Vec<CodeCase>) -> Result<Self, QuestionError> {
        if tests.is_empty() {
            return Err(QuestionError::config(
                "code question needs at least one test case",
            ));
        }
        Ok(Self::with_kind(prompt, QuestionKind::Code { tests }))
    }

    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_phase(mut self, phase: DisplayPhase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn phase(&self) -> Option<DisplayPhase> {
        self.phase
    }

    /// Untagged questions show in every phase; tagged ones only in theirs.
    pub fn shows_in(&self, phase: DisplayPhase) -> bool {
        self.phase.map_or(true, |p| p == phase)
    }

    /// Materialize a wire question, validating it.
    pub fn from_wire(wire: &WireQuestion) -> Result<Self, QuestionError> {
        let question = match wire.kind.as_str() {
            WIRE_MULTIPLE_CHOICE => {
                let options = wire.answers.clone().unwrap_or_default();
                match &wire.answer {
                    Some(WireAnswer::Text(answer)) => {
                        Question::single_choice(&wire.body, options, answer.clone())?
                    }
                    Some(WireAnswer::List(list)) if list.is_empty() => {
                        return Err(QuestionError::config(
                            "multiple choice answer list is empty",
                        ));
                    }
                    Some(WireAnswer::List(list)) if list.len() == 1 => {
                        Question::single_choice(&wire.body, options, list[0].clone())?
                    }
                    Some(WireAnswer::List(list)) => {
                        Question::multi_choice(&wire.body, options, list.clone())?
                    }
                    Some(WireAnswer::Number(_)) => {
                        return Err(QuestionError::config(
                            "multiple choice answer must be a string or a list of strings",
                        ));
                    }
                    None => {
                        return Err(QuestionError::config(
                            "multiple choice question has no answer",
                        ));
                    }
                }
            }
            WIRE_NUMERIC => {
                let answer = match &wire.answer {
                    Some(WireAnswer::Text(text)) => text.trim().parse::<f64>().map_err(|_| {
                        QuestionError::config(format!("numeric answer {text:?} is not a number"))
                    })?,
                    Some(WireAnswer::Number(n)) => n.as_f64().ok_or_else(|| {
                        QuestionError::config(format!("numeric answer {n} is out of range"))
                    })?,
                    Some(WireAnswer::List(_)) => {
                        return Err(QuestionError::config(
                            "numeric answer should not be a list",
                        ));
                    }
                    None => {
                        return Err(QuestionError::config("numeric question has no answer"));
                    }
                };
                Question::numeric(&wire.body, answer)?
            }
            WIRE_TEXT => Question::with_kind(&wire.body, QuestionKind::Informational),
            WIRE_CODE => Question::code(&wire.body, wire.tests.clone().unwrap_or_default())?,
            other => return Err(QuestionError::UnsupportedType(other.to_string())),
        };

        let mut question = question.with_notes(wire.notes.clone().unwrap_or_default());
        question.phase = wire.phase;
        question.source = Some(WireFields {
            answers: wire.answers.clone(),
            answer: wire.answer.clone(),
        });
        Ok(question)
    }

    /// Serialize back to the wire form.
    ///
    /// Questions read with [`Question::from_wire`] give back `answers` and
    /// `answer` as they were written. Constructed questions use the canonical
    /// form: a one-element list for single choice and a decimal string for
    /// numeric answers.
    pub fn to_wire(&self) -> WireQuestion {
        let (answers, answer, tests) = match &self.kind {
            QuestionKind::SingleChoice { options, answer } => (
                Some(options.clone()),
                Some(WireAnswer::List(vec![answer.clone()])),
                None,
            ),
            QuestionKind::MultiChoice { options, answers } => (
                Some(options.clone()),
                Some(WireAnswer::List(answers.clone())),
                None,
            ),
            QuestionKind::Numeric { answer } => {
                (None, Some(WireAnswer::Text(answer.to_string())), None)
            }
            QuestionKind::Informational => (None, None, None),
            QuestionKind::Code { tests } => (None, None, Some(tests.clone())),
        };
        let (answers, answer) = match &self.source {
            Some(source) => (source.answers.clone(), source.answer.clone()),
            None => (answers, answer),
        };

        WireQuestion {
            kind: self.kind.wire_tag().to_string(),
            body: self.prompt.clone(),
            answers,
            answer,
            notes: (!self.notes.is_empty()).then(|| self.notes.clone()),
            phase: self.phase,
            tests,
        }
    }
}

fn check_options(options: &[String], correct: &[String]) -> Result<(), QuestionError> {
    if options.is_empty() {
        return Err(QuestionError::config(
            "multiple choice question needs a non-empty list of options",
        ));
    }
    if let Some(missing) = correct.iter().find(|a| !options.contains(a)) {
        return Err(QuestionError::config(format!(
            "answer {missing:?} is not among the options"
        )));
    }
    Ok(())
}

/// The `answer` field of a wire question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireAnswer {
    Text(String),
    List(Vec<String>),
    /// Kept as written so `4` and `4.0` serialize back unchanged.
    Number(serde_json::Number),
}

/// A question as it appears in a question bank document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireQuestion {
    /// `MULTIPLE_CHOICE`, `NUMERIC`, `TEXT` or `CODE`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The prompt.
    pub body: String,
    /// Options for choice questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<String>>,
    /// Correct answer(s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<WireAnswer>,
    /// Explanatory notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    /// Restricts the question to one display phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<DisplayPhase>,
    /// Expected calls for `CODE` questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<CodeCase>>,
}

/// The full, read-only set of questions a quiz draws from.
///
/// Cloning is cheap and shares the underlying questions.
#[derive(Debug, Clone)]
pub struct QuestionPool {
    questions: Arc<[Question]>,
}

impl QuestionPool {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: questions.into(),
        }
    }

    /// Materialize every wire question, failing on the first invalid one.
    pub fn from_wire(wire: &[WireQuestion]) -> Result<Self, QuestionError> {
        let questions = wire
            .iter()
            .enumerate()
            .map(|(index, q)| {
                Question::from_wire(q).map_err(|e| QuestionError::InPool {
                    index,
                    source: Box::new(e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(questions))
    }

    pub fn to_wire(&self) -> Vec<WireQuestion> {
        self.questions.iter().map(Question::to_wire).collect()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }
}

impl Default for QuestionPool {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FromIterator<Question> for QuestionPool {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Live input for one displayed question, as reported by the renderer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// Nothing entered yet.
    #[default]
    Empty,
    /// The chosen option of a single choice question.
    Choice(String),
    /// The toggled options of a multiple choice question.
    Toggled(BTreeSet<String>),
    /// The value typed into a numeric field.
    Number(f64),
    /// The name of the learner's function for a code question.
    Function(String),
}

impl InputState {
    /// Whether this input has the right shape for `kind`.
    pub fn fits(&self, kind: &QuestionKind) -> bool {
        matches!(
            (self, kind),
            (InputState::Empty, _)
                | (InputState::Choice(_), QuestionKind::SingleChoice { .. })
                | (InputState::Toggled(_), QuestionKind::MultiChoice { .. })
                | (InputState::Number(_), QuestionKind::Numeric { .. })
                | (InputState::Function(_), QuestionKind::Code { .. })
        )
    }

    /// Flip `option` in a multiple choice selection.
    pub fn toggle(&mut self, option: &str) {
        match self {
            InputState::Toggled(chosen) => {
                if !chosen.remove(option) {
                    chosen.insert(option.to_string());
                }
            }
            other => {
                *other = InputState::Toggled(BTreeSet::from([option.to_string()]));
            }
        }
    }
}

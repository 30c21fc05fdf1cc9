//! Group verdicts over the displayed subset.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::evaluator::Evaluation;

/// Group-level outcome of a submit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// No submit has happened yet.
    #[default]
    Unchecked,
    Approved,
    Rejected,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Unchecked => write!(f, "unchecked"),
            Verdict::Approved => write!(f, "approved"),
            Verdict::Rejected => write!(f, "rejected"),
        }
    }
}

/// Combined scores of one group of questions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupOutcome {
    /// Sum of scores, unanswered counting as zero.
    pub total: f64,
    /// Number of questions in the group.
    pub count: usize,
    /// Number of questions with any input.
    pub answered: usize,
    pub verdict: Verdict,
}

impl GroupOutcome {
    pub fn is_approved(&self) -> bool {
        self.verdict == Verdict::Approved
    }
}

/// Aggregate per-question evaluations into a verdict.
///
/// Approval requires every question to score exactly 1.0, i.e.
/// `total == count`. Partial credit never passes the group. The check is done
/// per question so that float summation cannot round a near miss up to a pass.
pub fn aggregate(evaluations: &[Evaluation]) -> GroupOutcome {
    let total = evaluations.iter().map(|e| e.points()).sum();
    let answered = evaluations.iter().filter(|e| e.is_answered()).count();
    let verdict = if evaluations.iter().all(|e| e.is_full()) {
        Verdict::Approved
    } else {
        Verdict::Rejected
    };

    GroupOutcome {
        total,
        count: evaluations.len(),
        answered,
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Score;

    fn scored(values: &[f64]) -> Vec<Evaluation> {
        values
            .iter()
            .map(|v| Evaluation::Scored(Score::new(*v)))
            .collect()
    }

    #[test]
    fn all_full_is_approved() {
        let outcome = aggregate(&scored(&[1.0, 1.0, 1.0]));
        assert_eq!(outcome.verdict, Verdict::Approved);
        assert_eq!(outcome.total, 3.0);
        assert_eq!(outcome.count, 3);
    }

    #[test]
    fn partial_credit_is_rejected() {
        let outcome = aggregate(&scored(&[1.0, 0.5, 1.0]));
        assert_eq!(outcome.verdict, Verdict::Rejected);
        assert_eq!(outcome.total, 2.5);
    }

    #[test]
    fn unanswered_counts_as_zero() {
        let mut evals = scored(&[1.0, 1.0]);
        evals.push(Evaluation::Unanswered);
        let outcome = aggregate(&evals);
        assert_eq!(outcome.verdict, Verdict::Rejected);
        assert_eq!(outcome.total, 2.0);
        assert_eq!(outcome.answered, 2);
    }

    #[test]
    fn near_miss_does_not_round_up() {
        let almost = 1.0 - f64::EPSILON / 2.0;
        let outcome = aggregate(&scored(&[1.0, almost]));
        assert_eq!(outcome.verdict, Verdict::Rejected);
    }

    #[test]
    fn empty_group_is_vacuously_approved() {
        let outcome = aggregate(&[]);
        assert!(outcome.is_approved());
        assert_eq!(outcome.count, 0);
    }

    #[test]
    fn verdict_display() {
        assert_eq!(Verdict::Approved.to_string(), "approved");
        assert_eq!(Verdict::default(), Verdict::Unchecked);
    }
}

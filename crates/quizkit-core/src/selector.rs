//! Random subset selection for each display cycle.

use std::num::NonZeroUsize;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{DisplayPhase, Question};

/// Draws a bounded, shuffled subset of a question pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selector {
    count: Option<NonZeroUsize>,
}

impl Selector {
    /// `count = None` displays every eligible question.
    pub fn new(count: Option<NonZeroUsize>) -> Self {
        Self { count }
    }

    pub fn count(&self) -> Option<NonZeroUsize> {
        self.count
    }

    /// Indices into `pool` for one display cycle.
    ///
    /// The result is a fresh random permutation of the questions eligible for
    /// `phase`, truncated to the configured count, without duplicates. The
    /// pool itself is never reordered. When no question is tagged for `phase`
    /// the whole pool is eligible.
    pub fn draw<R>(&self, pool: &[Question], phase: DisplayPhase, rng: &mut R) -> Vec<usize>
    where
        R: Rng + ?Sized,
    {
        let mut eligible: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, q)| q.shows_in(phase))
            .map(|(i, _)| i)
            .collect();

        if eligible.is_empty() && !pool.is_empty() {
            tracing::debug!(%phase, "no question eligible for phase, drawing from whole pool");
            eligible = (0..pool.len()).collect();
        }

        eligible.shuffle(rng);
        if let Some(count) = self.count {
            eligible.truncate(count.get());
        }
        eligible
    }
}

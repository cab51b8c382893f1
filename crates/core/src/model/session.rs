use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::model::ids::{FINALE_INDEX, StepId, StepPosition, WELCOME_INDEX};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("step index {0} is outside 0..=10")]
    StepOutOfRange(u8),

    #[error("perfect_score is {perfect_score} but {total_errors} errors are recorded")]
    ScoreMismatch {
        perfect_score: bool,
        total_errors: u64,
    },
}

/// Progress of one player through the quiz.
///
/// Mutators enforce the session invariants: the step only moves forward,
/// attempt counters only grow, and the perfect-score flag flips to `false`
/// on the first incorrect attempt and stays there until [`SessionState::fresh`]
/// builds a new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    step: u8,
    attempts: BTreeMap<StepId, u32>,
    hints_used: u32,
    hints_shown: BTreeSet<StepId>,
    perfect_score: bool,
    show_photo: BTreeMap<StepId, bool>,
    started_at: DateTime<Utc>,
    dedication_shown: bool,
}

impl SessionState {
    /// A brand-new session sitting on the welcome screen.
    #[must_use]
    pub fn fresh(started_at: DateTime<Utc>) -> Self {
        Self {
            step: WELCOME_INDEX,
            attempts: BTreeMap::new(),
            hints_used: 0,
            hints_shown: BTreeSet::new(),
            perfect_score: true,
            show_photo: BTreeMap::new(),
            started_at,
            dedication_shown: false,
        }
    }

    /// Rehydrate a session from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::StepOutOfRange` if `step > 10` and
    /// `SessionStateError::ScoreMismatch` if the perfect-score flag disagrees with
    /// the recorded attempts.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        step: u8,
        attempts: BTreeMap<StepId, u32>,
        hints_used: u32,
        hints_shown: BTreeSet<StepId>,
        perfect_score: bool,
        show_photo: BTreeMap<StepId, bool>,
        started_at: DateTime<Utc>,
        dedication_shown: bool,
    ) -> Result<Self, SessionStateError> {
        if step > FINALE_INDEX {
            return Err(SessionStateError::StepOutOfRange(step));
        }

        let state = Self {
            step,
            attempts,
            hints_used,
            hints_shown,
            perfect_score,
            show_photo,
            started_at,
            dedication_shown,
        };
        let total_errors = state.total_errors();
        if perfect_score != (total_errors == 0) {
            return Err(SessionStateError::ScoreMismatch {
                perfect_score,
                total_errors,
            });
        }
        Ok(state)
    }

    #[must_use]
    pub fn step(&self) -> u8 {
        self.step
    }

    #[must_use]
    pub fn position(&self) -> StepPosition {
        // `step` never leaves 0..=10, see `from_persisted` and `advance`.
        StepPosition::from_index(self.step).unwrap_or(StepPosition::Finale)
    }

    #[must_use]
    pub fn attempts(&self) -> &BTreeMap<StepId, u32> {
        &self.attempts
    }

    /// Incorrect attempts recorded for `step` (0 if never answered).
    #[must_use]
    pub fn attempts_for(&self, step: StepId) -> u32 {
        self.attempts.get(&step).copied().unwrap_or(0)
    }

    /// Sum of incorrect attempts across every step.
    #[must_use]
    pub fn total_errors(&self) -> u64 {
        self.attempts.values().map(|&count| u64::from(count)).sum()
    }

    #[must_use]
    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    #[must_use]
    pub fn hints_shown(&self) -> &BTreeSet<StepId> {
        &self.hints_shown
    }

    #[must_use]
    pub fn hint_shown(&self, step: StepId) -> bool {
        self.hints_shown.contains(&step)
    }

    #[must_use]
    pub fn perfect_score(&self) -> bool {
        self.perfect_score
    }

    #[must_use]
    pub fn show_photo(&self) -> &BTreeMap<StepId, bool> {
        &self.show_photo
    }

    #[must_use]
    pub fn is_revealed(&self, step: StepId) -> bool {
        self.show_photo.get(&step).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn dedication_shown(&self) -> bool {
        self.dedication_shown
    }

    /// Move one step forward. Returns `false` (and changes nothing) at the finale.
    pub fn advance(&mut self) -> bool {
        match self.position().next() {
            Some(next) => {
                self.step = next.index();
                true
            }
            None => false,
        }
    }

    /// Leave the welcome screen, starting the timer at `now`.
    ///
    /// Returns `false` if the session is not on the welcome screen.
    pub fn begin(&mut self, now: DateTime<Utc>) -> bool {
        if self.position() != StepPosition::Welcome {
            return false;
        }
        self.started_at = now;
        self.advance()
    }

    /// Record one evaluated submission for `step`.
    pub fn record_attempt(&mut self, step: StepId, correct: bool) {
        let count = self.attempts.entry(step).or_insert(0);
        if !correct {
            *count = count.saturating_add(1);
            self.perfect_score = false;
        }
    }

    /// Mark the hint for `step` as used. Only the first call per step counts.
    ///
    /// Returns `true` if this call incremented the hint counter.
    pub fn mark_hint_shown(&mut self, step: StepId) -> bool {
        if !self.hints_shown.insert(step) {
            return false;
        }
        self.hints_used = self.hints_used.saturating_add(1);
        true
    }

    /// Open the bonus reveal for `step`.
    pub fn reveal(&mut self, step: StepId) {
        self.show_photo.insert(step, true);
    }

    /// Mark the finale dedication as played.
    ///
    /// Returns `true` only for the first call.
    pub fn mark_dedication_shown(&mut self) -> bool {
        !std::mem::replace(&mut self.dedication_shown, true)
    }
}

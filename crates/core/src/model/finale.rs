use chrono::{DateTime, Duration, Utc};

use crate::model::session::SessionState;
use crate::model::step::{ClosingMessages, FinaleContent};

/// Middle badge of the finale: perfect run or error count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBanner {
    Perfect,
    Errors(u64),
}

/// Which closing line the finale ends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosingTone {
    Perfect,
    FewErrors,
    ManyErrors,
}

impl ClosingTone {
    #[must_use]
    pub fn message(self, messages: &ClosingMessages) -> &str {
        match self {
            Self::Perfect => &messages.perfect,
            Self::FewErrors => &messages.few_errors,
            Self::ManyErrors => &messages.many_errors,
        }
    }
}

/// Aggregate results shown on the finale screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinaleSummary {
    elapsed: Duration,
    total_errors: u64,
    hints_used: u32,
    banner: ScoreBanner,
    closing: ClosingTone,
}

impl FinaleSummary {
    /// Summarize `state` as of `now`.
    #[must_use]
    pub fn from_state(state: &SessionState, content: &FinaleContent, now: DateTime<Utc>) -> Self {
        let elapsed = (now - state.started_at()).max(Duration::zero());
        let total_errors = state.total_errors();

        let banner = if state.perfect_score() {
            ScoreBanner::Perfect
        } else {
            ScoreBanner::Errors(total_errors)
        };
        let closing = if state.perfect_score() {
            ClosingTone::Perfect
        } else if total_errors <= u64::from(content.few_errors_threshold) {
            ClosingTone::FewErrors
        } else {
            ClosingTone::ManyErrors
        };

        Self {
            elapsed,
            total_errors,
            hints_used: state.hints_used(),
            banner,
            closing,
        }
    }

    /// Whole minutes of the elapsed time.
    #[must_use]
    pub fn minutes(&self) -> i64 {
        self.elapsed.num_minutes()
    }

    /// Seconds past the last whole minute.
    #[must_use]
    pub fn seconds(&self) -> i64 {
        self.elapsed.num_seconds() % 60
    }

    #[must_use]
    pub fn total_errors(&self) -> u64 {
        self.total_errors
    }

    #[must_use]
    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    #[must_use]
    pub fn banner(&self) -> ScoreBanner {
        self.banner
    }

    #[must_use]
    pub fn closing(&self) -> ClosingTone {
        self.closing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuizDefinition, StepId};
    use crate::time::fixed_now;

    fn finished(errors: u32) -> SessionState {
        let mut state = SessionState::fresh(fixed_now());
        let step = StepId::new(1).unwrap();
        for _ in 0..errors {
            state.record_attempt(step, false);
        }
        state.record_attempt(step, true);
        state
    }

    #[test]
    fn perfect_run_gets_perfect_banner() {
        let content = QuizDefinition::builtin().finale;
        let now = fixed_now() + Duration::seconds(185);
        let summary = FinaleSummary::from_state(&finished(0), &content, now);

        assert_eq!(summary.banner(), ScoreBanner::Perfect);
        assert_eq!(summary.closing(), ClosingTone::Perfect);
        assert_eq!(summary.minutes(), 3);
        assert_eq!(summary.seconds(), 5);
    }

    #[test]
    fn closing_depends_on_error_count() {
        let content = QuizDefinition::builtin().finale;
        let few = FinaleSummary::from_state(&finished(3), &content, fixed_now());
        assert_eq!(few.banner(), ScoreBanner::Errors(3));
        assert_eq!(few.closing(), ClosingTone::FewErrors);

        let many = FinaleSummary::from_state(&finished(4), &content, fixed_now());
        assert_eq!(many.closing(), ClosingTone::ManyErrors);
        assert_eq!(
            many.closing().message(&content.closing),
            content.closing.many_errors
        );
    }
}

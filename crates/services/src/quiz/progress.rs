use quiz_core::model::{QUESTION_COUNT, StepId};

/// Position within the question steps, useful for a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub step: u8,
    pub total: u8,
}

impl QuizProgress {
    #[must_use]
    pub fn at(step: StepId) -> Self {
        Self {
            step: step.index(),
            total: QUESTION_COUNT,
        }
    }

    /// Completed share of the quiz in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        f32::from(self.step) / f32::from(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_question_is_full_bar() {
        let progress = QuizProgress::at(StepId::new(9).unwrap());
        assert_eq!(progress.total, 9);
        assert!((progress.fraction() - 1.0).abs() < f32::EPSILON);
    }
}

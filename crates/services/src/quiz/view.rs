use quiz_core::model::{
    BonusReveal, FinaleContent, FinaleSummary, SessionState, StepConfig, WelcomeContent,
};

use super::progress::QuizProgress;

/// Presentation-agnostic description of the current screen.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no styling or layout assumptions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen<'a> {
    Welcome(&'a WelcomeContent),
    Question(QuestionScreen<'a>),
    Finale(FinaleScreen<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionScreen<'a> {
    pub config: &'a StepConfig,
    pub progress: QuizProgress,
    /// The hint was already requested on this step.
    pub hint_requested: bool,
    /// Open bonus reveal awaiting a continue, if any.
    pub reveal: Option<&'a BonusReveal>,
}

impl<'a> QuestionScreen<'a> {
    pub(crate) fn new(config: &'a StepConfig, state: &SessionState) -> Self {
        let reveal = config
            .reveal
            .as_ref()
            .filter(|_| state.is_revealed(config.id));
        Self {
            config,
            progress: QuizProgress::at(config.id),
            hint_requested: state.hint_shown(config.id),
            reveal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinaleScreen<'a> {
    pub content: &'a FinaleContent,
    pub summary: FinaleSummary,
    pub closing: &'a str,
}

impl<'a> FinaleScreen<'a> {
    pub(crate) fn new(content: &'a FinaleContent, summary: FinaleSummary) -> Self {
        let closing = summary.closing().message(&content.closing);
        Self {
            content,
            summary,
            closing,
        }
    }
}

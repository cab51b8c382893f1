use std::sync::Arc;

use quiz_core::model::{
    AnswerRule, BonusReveal, DefinitionError, Evaluation, FinaleSummary, QuizDefinition,
    SessionState, StepId, StepPosition,
};
use rand::seq::IndexedRandom;
use storage::SnapshotStore;
use tracing::{debug, info};

use super::bridge::PersistenceBridge;
use super::progress::QuizProgress;
use super::view::{FinaleScreen, QuestionScreen, Screen};
use crate::Clock;

/// Result of submitting an answer for the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was evaluated and the session is unchanged.
    Ignored,
    /// Wrong answer; `attempts` is the step's updated mistake count.
    Incorrect { feedback: String, attempts: u32 },
    /// Right answer; the session moved on to `position`.
    Advanced {
        feedback: String,
        position: StepPosition,
    },
    /// Right answer; the bonus reveal is open and waits for a continue.
    Revealed {
        feedback: String,
        reveal: BonusReveal,
    },
}

/// How the finale dedication should be shown on this render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedicationPlayback {
    /// First time: play the typewriter effect.
    Animate(String),
    /// Already played once: show the text as is.
    Static(String),
}

/// Orchestrates one player's walk through the quiz.
///
/// The service holds no session data itself: every action takes the live
/// `SessionState` by mutable reference and persists it through the bridge
/// after mutating it.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    definition: Arc<QuizDefinition>,
    bridge: PersistenceBridge,
}

impl QuizLoopService {
    /// Build the service over a validated definition.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError` if `definition` fails validation.
    pub fn new(
        clock: Clock,
        definition: QuizDefinition,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Result<Self, DefinitionError> {
        definition.validate()?;
        Ok(Self {
            clock,
            definition: Arc::new(definition),
            bridge: PersistenceBridge::new(clock, snapshots),
        })
    }

    #[must_use]
    pub fn definition(&self) -> &QuizDefinition {
        &self.definition
    }

    #[must_use]
    pub fn bridge(&self) -> &PersistenceBridge {
        &self.bridge
    }

    //
    // ─── LIFECYCLE ────────────────────────────────────────────────────────────
    //

    /// Fresh process start: drop any stored snapshot and begin on the welcome screen.
    pub async fn open_fresh(&self) -> SessionState {
        self.bridge.clear().await;
        SessionState::fresh(self.clock.now())
    }

    /// Reload: continue from the stored snapshot, or start fresh without one.
    pub async fn resume(&self) -> SessionState {
        match self.bridge.load().await {
            Some(state) => {
                info!(step = state.step(), "resumed session from snapshot");
                state
            }
            None => SessionState::fresh(self.clock.now()),
        }
    }

    /// Explicit restart: clear storage and replace `state` with a new session.
    pub async fn restart(&self, state: &mut SessionState) {
        self.bridge.clear().await;
        *state = SessionState::fresh(self.clock.now());
        info!("session restarted");
    }

    //
    // ─── PROGRESSION ──────────────────────────────────────────────────────────
    //

    /// Welcome action: start the timer and move to the first question.
    ///
    /// Does nothing outside the welcome screen.
    pub async fn start(&self, state: &mut SessionState) -> StepPosition {
        if state.begin(self.clock.now()) {
            debug!(started_at = %state.started_at(), "quiz started");
            self.bridge.save(state).await;
        }
        state.position()
    }

    /// Move one step forward and persist. A no-op on the finale.
    pub async fn advance(&self, state: &mut SessionState) -> StepPosition {
        let from = state.step();
        if state.advance() {
            debug!(from, to = state.step(), "advanced");
            self.bridge.save(state).await;
        }
        state.position()
    }

    /// Continue past an open bonus reveal on `step`.
    ///
    /// Returns the new position, or `None` if `step` is not the current step or
    /// its reveal is not open.
    pub async fn continue_after_reveal(
        &self,
        state: &mut SessionState,
        step: StepId,
    ) -> Option<StepPosition> {
        let has_reveal = self
            .definition
            .step(step)
            .is_some_and(|config| config.reveal.is_some());
        if state.position() != StepPosition::Question(step)
            || !has_reveal
            || !state.is_revealed(step)
        {
            return None;
        }
        Some(self.advance(state).await)
    }

    //
    // ─── ANSWERS ──────────────────────────────────────────────────────────────
    //

    /// Check `submitted` against the expected answer for `step`.
    #[must_use]
    pub fn evaluate(&self, step: StepId, submitted: &str) -> Evaluation {
        self.definition
            .step(step)
            .map_or(Evaluation::Ignored, |config| config.rule.evaluate(submitted))
    }

    /// Count one evaluated submission for `step` and persist.
    pub async fn record_attempt(&self, state: &mut SessionState, step: StepId, correct: bool) {
        state.record_attempt(step, correct);
        if !correct {
            debug!(%step, attempts = state.attempts_for(step), "incorrect attempt");
        }
        self.bridge.save(state).await;
    }

    /// Live feedback for a value on a scale step, before it is submitted.
    ///
    /// `None` for other step kinds, unparseable or out-of-range values, and
    /// steps without configured levels.
    #[must_use]
    pub fn scale_feedback(&self, step: StepId, value: &str) -> Option<&str> {
        let config = self.definition.step(step)?;
        let AnswerRule::Scale { min, max, .. } = &config.rule else {
            return None;
        };
        let value = value.trim().parse::<u32>().ok()?;
        if !(*min..=*max).contains(&value) {
            return None;
        }
        config.feedback.level_for(value)
    }

    /// Evaluate an answer for the current step and apply its consequences.
    ///
    /// Submissions for any other step, or after the step's reveal opened, are
    /// ignored, as are submissions the rule does not evaluate.
    pub async fn submit_answer(
        &self,
        state: &mut SessionState,
        step: StepId,
        submitted: &str,
    ) -> SubmitOutcome {
        let Some(config) = self.definition.step(step) else {
            return SubmitOutcome::Ignored;
        };
        let reveal_open = config.reveal.is_some() && state.is_revealed(step);
        if state.position() != StepPosition::Question(step) || reveal_open {
            debug!(%step, current = state.step(), "ignoring submission for inactive step");
            return SubmitOutcome::Ignored;
        }

        let evaluation = self.evaluate(step, submitted);
        if !evaluation.is_attempt() {
            return SubmitOutcome::Ignored;
        }

        let correct = evaluation.is_correct();
        self.record_attempt(state, step, correct).await;
        if !correct {
            return SubmitOutcome::Incorrect {
                feedback: config.feedback.incorrect_for(submitted).to_owned(),
                attempts: state.attempts_for(step),
            };
        }

        let feedback = config.feedback.correct.clone();
        match &config.reveal {
            Some(reveal) => {
                state.reveal(step);
                self.bridge.save(state).await;
                SubmitOutcome::Revealed {
                    feedback,
                    reveal: reveal.clone(),
                }
            }
            None => SubmitOutcome::Advanced {
                feedback,
                position: self.advance(state).await,
            },
        }
    }

    /// Hint text for `step`. Only the first request per step is counted.
    ///
    /// Returns `None` for steps without a hint.
    pub async fn request_hint(&self, state: &mut SessionState, step: StepId) -> Option<String> {
        let hint = self.definition.step(step)?.hint.clone()?;
        if state.mark_hint_shown(step) {
            debug!(%step, hints_used = state.hints_used(), "hint used");
            self.bridge.save(state).await;
        }
        Some(hint)
    }

    //
    // ─── FINALE ───────────────────────────────────────────────────────────────
    //

    /// Results for the finale screen; `None` before the finale.
    #[must_use]
    pub fn finale_summary(&self, state: &SessionState) -> Option<FinaleSummary> {
        (state.position() == StepPosition::Finale).then(|| {
            FinaleSummary::from_state(state, &self.definition.finale, self.clock.now())
        })
    }

    /// Dedication for the finale, animated only the first time it is shown.
    pub async fn play_dedication(&self, state: &mut SessionState) -> Option<DedicationPlayback> {
        if state.position() != StepPosition::Finale {
            return None;
        }
        let text = self.definition.finale.dedication.clone();
        if state.mark_dedication_shown() {
            self.bridge.save(state).await;
            Some(DedicationPlayback::Animate(text))
        } else {
            Some(DedicationPlayback::Static(text))
        }
    }

    /// One of the finale's secret messages, picked at random.
    #[must_use]
    pub fn secret_message(&self) -> Option<&str> {
        self.definition
            .finale
            .secret_messages
            .choose(&mut rand::rng())
            .map(String::as_str)
    }

    //
    // ─── VIEWS ────────────────────────────────────────────────────────────────
    //

    /// Progress through the questions; `None` on the welcome and finale screens.
    #[must_use]
    pub fn progress(&self, state: &SessionState) -> Option<QuizProgress> {
        state.position().question().map(QuizProgress::at)
    }

    /// What the presentation layer should render for `state`.
    #[must_use]
    pub fn screen<'a>(&'a self, state: &SessionState) -> Screen<'a> {
        match state.position() {
            StepPosition::Welcome => Screen::Welcome(&self.definition.welcome),
            StepPosition::Question(step) => match self.definition.step(step) {
                Some(config) => Screen::Question(QuestionScreen::new(config, state)),
                None => Screen::Welcome(&self.definition.welcome),
            },
            StepPosition::Finale => {
                let summary =
                    FinaleSummary::from_state(state, &self.definition.finale, self.clock.now());
                Screen::Finale(FinaleScreen::new(&self.definition.finale, summary))
            }
        }
    }
}

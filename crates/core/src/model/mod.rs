mod answer;
mod finale;
mod ids;
mod session;
mod step;

pub use answer::{AnswerRule, Evaluation, normalize_passphrase};
pub use finale::{ClosingTone, FinaleSummary, ScoreBanner};
pub use ids::{
    FINALE_INDEX, QUESTION_COUNT, StepId, StepIdError, StepPosition, WELCOME_INDEX,
};
pub use session::{SessionState, SessionStateError};
pub use step::{
    BonusReveal, ClosingMessages, DefinitionError, FinaleContent, QuizDefinition, ScaleLevel,
    StepConfig, StepFeedback, WelcomeContent,
};

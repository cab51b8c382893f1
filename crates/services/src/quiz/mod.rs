mod bridge;
mod progress;
mod view;
mod workflow;

// Public API of the quiz subsystem.
pub use bridge::{PersistOutcome, PersistenceBridge};
pub use progress::QuizProgress;
pub use view::{FinaleScreen, QuestionScreen, Screen};
pub use workflow::{DedicationPlayback, QuizLoopService, SubmitOutcome};

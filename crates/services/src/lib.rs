#![forbid(unsafe_code)]

pub mod assets;
pub mod definition_loader;
pub mod error;
pub mod quiz;

pub use quiz_core::Clock;

pub use assets::{Asset, AssetStore};
pub use definition_loader::load_definition;
pub use error::DefinitionLoadError;
pub use quiz::{
    DedicationPlayback, FinaleScreen, PersistOutcome, PersistenceBridge, QuestionScreen,
    QuizLoopService, QuizProgress, Screen, SubmitOutcome,
};

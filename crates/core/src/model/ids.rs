use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of question steps between the welcome screen and the finale.
pub const QUESTION_COUNT: u8 = 9;

/// Step index of the welcome screen.
pub const WELCOME_INDEX: u8 = 0;

/// Step index of the finale screen.
pub const FINALE_INDEX: u8 = QUESTION_COUNT + 1;

const STEP_KEY_PREFIX: &str = "step";
const HINT_FLAG_PREFIX: &str = "hint_shown_";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepIdError {
    #[error("question index {0} is outside 1..=9")]
    OutOfRange(u8),

    #[error("unrecognized step key: {0:?}")]
    InvalidKey(String),
}

/// Identifier of one question step (1..=9).
///
/// Serialized as its integer index in quiz definitions and as its string key
/// (`step1`, `step2`, ...) inside session snapshots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StepId(u8);

impl StepId {
    /// Creates a `StepId` for the given question index.
    ///
    /// # Errors
    ///
    /// Returns `StepIdError::OutOfRange` unless `1 <= index <= QUESTION_COUNT`.
    pub fn new(index: u8) -> Result<Self, StepIdError> {
        if (1..=QUESTION_COUNT).contains(&index) {
            Ok(Self(index))
        } else {
            Err(StepIdError::OutOfRange(index))
        }
    }

    /// Returns the question index (1-based).
    #[must_use]
    pub fn index(&self) -> u8 {
        self.0
    }

    /// String key used for per-step maps (`step3`).
    #[must_use]
    pub fn key(&self) -> String {
        format!("{STEP_KEY_PREFIX}{}", self.0)
    }

    /// Key of the one-time hint flag for this step (`hint_shown_step3`).
    #[must_use]
    pub fn hint_flag_key(&self) -> String {
        format!("{HINT_FLAG_PREFIX}{}", self.key())
    }

    /// Parses a hint flag key back into the step it guards.
    ///
    /// # Errors
    ///
    /// Returns `StepIdError::InvalidKey` if the key lacks the flag prefix or names
    /// no valid step.
    pub fn from_hint_flag_key(raw: &str) -> Result<Self, StepIdError> {
        raw.strip_prefix(HINT_FLAG_PREFIX)
            .ok_or_else(|| StepIdError::InvalidKey(raw.to_owned()))?
            .parse()
    }

    /// All question steps in play order.
    pub fn all() -> impl Iterator<Item = StepId> {
        (1..=QUESTION_COUNT).map(StepId)
    }
}

impl TryFrom<u8> for StepId {
    type Error = StepIdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StepId> for u8 {
    fn from(id: StepId) -> Self {
        id.0
    }
}

impl FromStr for StepId {
    type Err = StepIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StepIdError::InvalidKey(s.to_owned());
        let digits = s.strip_prefix(STEP_KEY_PREFIX).ok_or_else(invalid)?;
        let index: u8 = digits.parse().map_err(|_| invalid())?;
        Self::new(index).map_err(|_| invalid())
    }
}

impl fmt::Debug for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StepId({})", self.0)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{STEP_KEY_PREFIX}{}", self.0)
    }
}

//
// ─── POSITION ─────────────────────────────────────────────────────────────────
//

/// Where a session currently is in the linear quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPosition {
    Welcome,
    Question(StepId),
    Finale,
}

impl StepPosition {
    /// Maps a raw step index (0..=10) to a position.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            WELCOME_INDEX => Some(Self::Welcome),
            FINALE_INDEX => Some(Self::Finale),
            other => StepId::new(other).ok().map(Self::Question),
        }
    }

    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Self::Welcome => WELCOME_INDEX,
            Self::Question(id) => id.index(),
            Self::Finale => FINALE_INDEX,
        }
    }

    #[must_use]
    pub fn question(self) -> Option<StepId> {
        match self {
            Self::Question(id) => Some(id),
            _ => None,
        }
    }

    /// The position a forward transition leads to; `None` at the finale.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Finale => None,
            other => Self::from_index(other.index() + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_keys_round_trip() {
        let id = StepId::new(3).unwrap();
        assert_eq!(id.key(), "step3");
        assert_eq!(id.hint_flag_key(), "hint_shown_step3");
        assert_eq!("step3".parse::<StepId>().unwrap(), id);
        assert_eq!(StepId::from_hint_flag_key("hint_shown_step3").unwrap(), id);
    }

    #[test]
    fn rejects_keys_outside_the_quiz() {
        assert!(StepId::new(0).is_err());
        assert!(StepId::new(10).is_err());
        assert!("step10".parse::<StepId>().is_err());
        assert!("stepx".parse::<StepId>().is_err());
        assert!(StepId::from_hint_flag_key("step3").is_err());
    }

    #[test]
    fn positions_walk_from_welcome_to_finale() {
        let mut position = StepPosition::Welcome;
        let mut visited = vec![position.index()];
        while let Some(next) = position.next() {
            position = next;
            visited.push(position.index());
        }
        assert_eq!(visited, (0..=10).collect::<Vec<u8>>());
        assert_eq!(position, StepPosition::Finale);
        assert_eq!(StepPosition::from_index(11), None);
    }
}

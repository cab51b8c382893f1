use chrono::{DateTime, Utc};
use quiz_core::model::{SessionState, StepId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::repository::StorageError;

/// Flat persisted shape of a `SessionState`.
///
/// Per-step maps are keyed by the step's string key (`step3`) and hint flags by
/// their flag key (`hint_shown_step3`), so the record stays readable and matches
/// what earlier versions of the quiz wrote. Every field may be missing on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub step: u8,

    #[serde(default)]
    pub attempts: BTreeMap<String, u32>,

    #[serde(default)]
    pub hints_used: u32,

    #[serde(default = "default_perfect_score")]
    pub perfect_score: bool,

    #[serde(default)]
    pub show_photo: BTreeMap<String, bool>,

    #[serde(default)]
    pub hints_shown: BTreeMap<String, bool>,

    #[serde(default, with = "iso_timestamp")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default, rename = "dedica_shown")]
    pub dedication_shown: bool,
}

fn default_perfect_score() -> bool {
    true
}

impl SessionSnapshot {
    #[must_use]
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            step: state.step(),
            attempts: state
                .attempts()
                .iter()
                .map(|(id, count)| (id.key(), *count))
                .collect(),
            hints_used: state.hints_used(),
            perfect_score: state.perfect_score(),
            show_photo: state
                .show_photo()
                .iter()
                .map(|(id, shown)| (id.key(), *shown))
                .collect(),
            hints_shown: state
                .hints_shown()
                .iter()
                .map(|id| (id.hint_flag_key(), true))
                .collect(),
            start_time: Some(state.started_at()),
            dedication_shown: state.dedication_shown(),
        }
    }

    /// Convert the record back into a domain `SessionState`.
    ///
    /// A missing `start_time` falls back to `now`. A hint flag counts as fired
    /// whenever its key is present.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for unknown step keys and
    /// `StorageError::InvalidState` if the rehydrated state breaks an invariant.
    pub fn into_state(self, now: DateTime<Utc>) -> Result<SessionState, StorageError> {
        let attempts = self
            .attempts
            .into_iter()
            .map(|(key, count)| Ok((parse_step_key(&key)?, count)))
            .collect::<Result<BTreeMap<_, _>, StorageError>>()?;
        let show_photo = self
            .show_photo
            .into_iter()
            .map(|(key, shown)| Ok((parse_step_key(&key)?, shown)))
            .collect::<Result<BTreeMap<_, _>, StorageError>>()?;
        let hints_shown = self
            .hints_shown
            .into_keys()
            .map(|key| {
                StepId::from_hint_flag_key(&key)
                    .map_err(|err| StorageError::Serialization(err.to_string()))
            })
            .collect::<Result<BTreeSet<_>, StorageError>>()?;

        Ok(SessionState::from_persisted(
            self.step,
            attempts,
            self.hints_used,
            hints_shown,
            self.perfect_score,
            show_photo,
            self.start_time.unwrap_or(now),
            self.dedication_shown,
        )?)
    }
}

fn parse_step_key(key: &str) -> Result<StepId, StorageError> {
    key.parse()
        .map_err(|err: quiz_core::model::StepIdError| StorageError::Serialization(err.to_string()))
}

/// ISO-8601 timestamps: written as RFC 3339, read as RFC 3339 or as an
/// offset-less `YYYY-MM-DDTHH:MM:SS[.f]` taken to be UTC.
mod iso_timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => {
                serializer.serialize_some(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|raw| parse(&raw).map_err(de::Error::custom))
            .transpose()
    }

    pub(super) fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|at| at.with_timezone(&Utc))
            .or_else(|_| NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT).map(|at| at.and_utc()))
    }
}

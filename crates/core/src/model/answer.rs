use serde::{Deserialize, Serialize};

/// Outcome of checking one submission against a step's rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Correct,
    Incorrect,
    /// Nothing usable was submitted (e.g. an empty selection). Not an attempt.
    Ignored,
}

impl Evaluation {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }

    /// Whether this outcome is recorded by the attempt tracker.
    #[must_use]
    pub fn is_attempt(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// How a step's expected answer is matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerRule {
    /// Pick one of `options`; exact match against `correct`.
    Choice { options: Vec<String>, correct: String },
    /// Integer slider in `min..=max`; correct only at `target`.
    Scale { min: u32, max: u32, target: u32 },
    /// Free text, trimmed and case-folded before comparison.
    Passphrase { accepted: Vec<String> },
}

impl AnswerRule {
    /// Check a raw submission.
    ///
    /// Choice and scale steps ignore values the presentation layer could not
    /// have produced (empty selection, unknown option, out-of-range number).
    /// A passphrase step always evaluates, so an empty password counts as wrong.
    #[must_use]
    pub fn evaluate(&self, submitted: &str) -> Evaluation {
        match self {
            Self::Choice { options, correct } => {
                if submitted.is_empty() || !options.iter().any(|option| option == submitted) {
                    Evaluation::Ignored
                } else if submitted == correct {
                    Evaluation::Correct
                } else {
                    Evaluation::Incorrect
                }
            }
            Self::Scale { min, max, target } => {
                let Ok(value) = submitted.trim().parse::<u32>() else {
                    return Evaluation::Ignored;
                };
                if !(*min..=*max).contains(&value) {
                    Evaluation::Ignored
                } else if value == *target {
                    Evaluation::Correct
                } else {
                    Evaluation::Incorrect
                }
            }
            Self::Passphrase { accepted } => {
                let candidate = normalize_passphrase(submitted);
                if accepted
                    .iter()
                    .any(|phrase| normalize_passphrase(phrase) == candidate)
                {
                    Evaluation::Correct
                } else {
                    Evaluation::Incorrect
                }
            }
        }
    }

    /// Options to present, if this is a choice step.
    #[must_use]
    pub fn options(&self) -> &[String] {
        match self {
            Self::Choice { options, .. } => options,
            _ => &[],
        }
    }
}

/// Normalization applied to password-style answers.
#[must_use]
pub fn normalize_passphrase(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice() -> AnswerRule {
        AnswerRule::Choice {
            options: vec!["Atina".into(), "Vasto".into(), "Pescara".into()],
            correct: "Pescara".into(),
        }
    }

    #[test]
    fn choice_is_exact_match() {
        assert_eq!(choice().evaluate("Pescara"), Evaluation::Correct);
        assert_eq!(choice().evaluate("Vasto"), Evaluation::Incorrect);
        assert_eq!(choice().evaluate("pescara"), Evaluation::Ignored);
        assert_eq!(choice().evaluate(""), Evaluation::Ignored);
    }

    #[test]
    fn scale_requires_target() {
        let rule = AnswerRule::Scale {
            min: 0,
            max: 100,
            target: 100,
        };
        assert_eq!(rule.evaluate("100"), Evaluation::Correct);
        assert_eq!(rule.evaluate("99"), Evaluation::Incorrect);
        assert_eq!(rule.evaluate("101"), Evaluation::Ignored);
        assert_eq!(rule.evaluate("lots"), Evaluation::Ignored);
    }

    #[test]
    fn passphrase_normalizes_case_and_whitespace() {
        let rule = AnswerRule::Passphrase {
            accepted: vec!["amore".into(), "Disco".into()],
        };
        assert_eq!(rule.evaluate("  AMORE "), Evaluation::Correct);
        assert_eq!(rule.evaluate("disco"), Evaluation::Correct);
        assert_eq!(rule.evaluate("a more"), Evaluation::Incorrect);
        assert_eq!(rule.evaluate(""), Evaluation::Incorrect);
    }

    #[test]
    fn rule_deserializes_from_tagged_json() {
        let rule: AnswerRule =
            serde_json::from_str(r#"{"kind":"scale","min":0,"max":10,"target":7}"#).unwrap();
        assert_eq!(
            rule,
            AnswerRule::Scale {
                min: 0,
                max: 10,
                target: 7
            }
        );
    }
}

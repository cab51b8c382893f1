use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::answer::AnswerRule;
use crate::model::ids::{QUESTION_COUNT, StepId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DefinitionError {
    #[error("expected {expected} steps, found {found}")]
    StepCount { expected: usize, found: usize },

    #[error("step at position {position} has id {found}")]
    OutOfOrder { position: usize, found: StepId },

    #[error("{step}: choice step has no options")]
    NoOptions { step: StepId },

    #[error("{step}: correct answer {correct:?} is not one of the options")]
    CorrectNotOffered { step: StepId, correct: String },

    #[error("{step}: scale target {target} is outside {min}..={max}")]
    TargetOutOfRange {
        step: StepId,
        min: u32,
        max: u32,
        target: u32,
    },

    #[error("{step}: passphrase step accepts nothing")]
    NoPassphrase { step: StepId },

    #[error("{step}: feedback given for {option:?}, which is not one of the options")]
    FeedbackForUnknownOption { step: StepId, option: String },

    #[error("{step}: scale levels must have increasing bounds")]
    UnorderedScaleLevels { step: StepId },

    #[error("finale has no secret messages")]
    NoSecretMessages,
}

/// Toast-style feedback shown after a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFeedback {
    pub correct: String,
    pub incorrect: String,
    /// Choice steps: wrong options with their own message instead of `incorrect`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub incorrect_by_option: BTreeMap<String, String>,
    /// Scale steps: message for the value currently selected, lowest band first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scale_levels: Vec<ScaleLevel>,
}

impl StepFeedback {
    /// Message for a wrong `submitted` answer.
    #[must_use]
    pub fn incorrect_for(&self, submitted: &str) -> &str {
        self.incorrect_by_option
            .get(submitted)
            .map_or(self.incorrect.as_str(), String::as_str)
    }

    /// Live message for a scale value; `None` when no level is configured.
    #[must_use]
    pub fn level_for(&self, value: u32) -> Option<&str> {
        self.scale_levels
            .iter()
            .find(|level| level.below.is_none_or(|bound| value < bound))
            .map(|level| level.message.as_str())
    }
}

/// One band of scale feedback: applies to values under `below`, or to every
/// remaining value when `below` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleLevel {
    #[serde(default)]
    pub below: Option<u32>,
    pub message: String,
}

/// Memory photo unlocked by a correct answer; needs an explicit continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusReveal {
    pub heading: String,
    pub photo: String,
    pub caption: String,
    pub continue_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    pub id: StepId,
    pub title: String,
    pub prompt: String,
    #[serde(default)]
    pub hint: Option<String>,
    pub rule: AnswerRule,
    pub feedback: StepFeedback,
    #[serde(default)]
    pub reveal: Option<BonusReveal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeContent {
    pub title: String,
    pub subtitle: String,
    pub intro: String,
    pub start_label: String,
}

/// Closing line picked by how the quiz went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingMessages {
    pub perfect: String,
    pub few_errors: String,
    pub many_errors: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinaleContent {
    pub title: String,
    pub dedication_heading: String,
    pub dedication: String,
    pub couple_photo: String,
    #[serde(default)]
    pub song: Option<String>,
    pub secret_messages: Vec<String>,
    pub closing: ClosingMessages,
    /// Highest error count still answered with the "few errors" closing.
    #[serde(default = "default_few_errors_threshold")]
    pub few_errors_threshold: u32,
}

fn default_few_errors_threshold() -> u32 {
    3
}

/// Declarative content of the whole quiz: one entry per question step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDefinition {
    pub welcome: WelcomeContent,
    pub steps: Vec<StepConfig>,
    pub finale: FinaleContent,
}

impl QuizDefinition {
    /// Check structural rules the workflow relies on.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError` if the steps are not exactly 1..=9 in order, if
    /// any answer rule cannot be satisfied, or if the finale has no secret message.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let expected = usize::from(QUESTION_COUNT);
        if self.steps.len() != expected {
            return Err(DefinitionError::StepCount {
                expected,
                found: self.steps.len(),
            });
        }

        for (position, (step, id)) in self.steps.iter().zip(StepId::all()).enumerate() {
            if step.id != id {
                return Err(DefinitionError::OutOfOrder {
                    position,
                    found: step.id,
                });
            }
            validate_rule(step.id, &step.rule)?;
            validate_feedback(step)?;
        }

        if self.finale.secret_messages.is_empty() {
            return Err(DefinitionError::NoSecretMessages);
        }
        Ok(())
    }

    /// Config for a question step. Always present in a validated definition.
    #[must_use]
    pub fn step(&self, id: StepId) -> Option<&StepConfig> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// The quiz as it ships.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            welcome: WelcomeContent {
                title: "Love Quiz".into(),
                subtitle: "Un quiz speciale, fatto con il cuore, solo per te.".into(),
                intro: "Rispondi alle domande dischetto...\nCi saranno 9 sfide da superare! 🌹"
                    .into(),
                start_label: "❤️ Cominciamo botolina!".into(),
            },
            steps: builtin_steps(),
            finale: FinaleContent {
                title: "Buon San Valentino! 🌹".into(),
                dedication_heading: "Per l'amore mio...".into(),
                dedication: "Ciao, volevo farti un piccolo regalo che fosse diverso dai soliti. \
                    So che non è molto ma mi sono divertito tanto a creare questo gioco. \
                    Ti ho pensato tanto in questi giorni e vorrei solo stare con te adesso. \
                    Buon San Valentino amore! Ti amo."
                    .into(),
                couple_photo: "vostra_foto.jpeg".into(),
                song: Some("canzone.mp3".into()),
                secret_messages: vec![
                    "Preparati a ricevere tanto amore una volta che ci vediamo...".into(),
                ],
                closing: ClosingMessages {
                    perfect: "🏆 Complimenti! Sei il dischetto numero 1! ❤️".into(),
                    few_errors: "😊 Ottimo lavoro! Giusto qualche errore".into(),
                    many_errors: "Dobbiamo passare più tempo insieme! Ma ti amo lo stesso! 💕"
                        .into(),
                },
                few_errors_threshold: default_few_errors_threshold(),
            },
        }
    }
}

fn validate_rule(step: StepId, rule: &AnswerRule) -> Result<(), DefinitionError> {
    match rule {
        AnswerRule::Choice { options, correct } => {
            if options.is_empty() {
                return Err(DefinitionError::NoOptions { step });
            }
            if !options.contains(correct) {
                return Err(DefinitionError::CorrectNotOffered {
                    step,
                    correct: correct.clone(),
                });
            }
        }
        AnswerRule::Scale { min, max, target } => {
            if !(*min..=*max).contains(target) {
                return Err(DefinitionError::TargetOutOfRange {
                    step,
                    min: *min,
                    max: *max,
                    target: *target,
                });
            }
        }
        AnswerRule::Passphrase { accepted } => {
            if accepted.iter().all(|phrase| phrase.trim().is_empty()) {
                return Err(DefinitionError::NoPassphrase { step });
            }
        }
    }
    Ok(())
}

fn validate_feedback(step: &StepConfig) -> Result<(), DefinitionError> {
    let options = step.rule.options();
    if let Some(option) = step
        .feedback
        .incorrect_by_option
        .keys()
        .find(|option| !options.contains(option))
    {
        return Err(DefinitionError::FeedbackForUnknownOption {
            step: step.id,
            option: option.clone(),
        });
    }

    let bounds: Vec<Option<u32>> = step
        .feedback
        .scale_levels
        .iter()
        .map(|level| level.below)
        .collect();
    let ordered = bounds.windows(2).all(|pair| match pair {
        [Some(low), Some(high)] => low < high,
        [Some(_), None] => true,
        _ => false,
    });
    if !ordered {
        return Err(DefinitionError::UnorderedScaleLevels { step: step.id });
    }
    Ok(())
}

//
// ─── BUILT-IN CONTENT ─────────────────────────────────────────────────────────
//

fn id(index: u8) -> StepId {
    StepId::new(index).unwrap_or_else(|_| unreachable!("built-in step {index} is in range"))
}

fn choice(options: &[&str], correct: &str) -> AnswerRule {
    AnswerRule::Choice {
        options: options.iter().map(|&option| option.to_owned()).collect(),
        correct: correct.to_owned(),
    }
}

fn feedback(correct: &str, incorrect: &str) -> StepFeedback {
    StepFeedback {
        correct: correct.to_owned(),
        incorrect: incorrect.to_owned(),
        incorrect_by_option: BTreeMap::new(),
        scale_levels: Vec::new(),
    }
}

fn level(below: Option<u32>, message: &str) -> ScaleLevel {
    ScaleLevel {
        below,
        message: message.to_owned(),
    }
}

fn reveal(heading: &str, photo: &str, caption: &str, continue_label: &str) -> Option<BonusReveal> {
    Some(BonusReveal {
        heading: heading.to_owned(),
        photo: photo.to_owned(),
        caption: caption.to_owned(),
        continue_label: continue_label.to_owned(),
    })
}

#[allow(clippy::too_many_lines)]
fn builtin_steps() -> Vec<StepConfig> {
    vec![
        StepConfig {
            id: id(1),
            title: "🏙️ La città dove tutto è cominciato".into(),
            prompt: "Partiamo dalle domande semplici, dove è cominciato tutto?".into(),
            hint: Some("Legame particolare con Chieti... 💕".into()),
            rule: choice(&["Atina", "Vasto", "Pescara", "Chieti"], "Pescara"),
            feedback: feedback("Esatto! Pescara! ❤️", "Non è questa!"),
            reveal: None,
        },
        StepConfig {
            id: id(2),
            title: "✈️ Il nostro primo viaggio insieme".into(),
            prompt: "Cosa mi è piaciuto di più del nostro viaggio a Valencia?".into(),
            hint: Some("Tips...".into()),
            rule: choice(
                &["Cibo", "Oceanografico", "Mare", "La stanza d'hotel"],
                "Oceanografico",
            ),
            feedback: feedback("Sì! Oceanografico!", "Riprova!"),
            reveal: reveal(
                "Fochette indimenticabili...",
                "foto_step_2.jpeg",
                "Il nostro primo viaggio",
                "➡️ Continua",
            ),
        },
        StepConfig {
            id: id(3),
            title: "Città dove vorremmo vivere insieme".into(),
            prompt: "Seleziona la città dove vorremmo vivere insieme".into(),
            hint: Some("Non Padova...".into()),
            rule: choice(&["Padova", "Frosinone", "Los Angeles", "Pescara"], "Pescara"),
            feedback: feedback("Esatto! Pescara! 🌴", "Non quella!"),
            reveal: None,
        },
        StepConfig {
            id: id(4),
            title: "Devozione e cani 🐶".into(),
            prompt: "In termini di devozione, quale di questi è il doggo più devoto?".into(),
            hint: Some("Poldo... 🦴".into()),
            rule: choice(&["Bulldog", "Poldo", "Succhetto", "Beagle"], "Poldo"),
            feedback: StepFeedback {
                incorrect_by_option: [
                    ("Bulldog", "Assolutamente no!"),
                    ("Succhetto", "No! Ma vicino!"),
                    ("Beagle", "Troppo casino!"),
                ]
                .into_iter()
                .map(|(option, message)| (option.to_owned(), message.to_owned()))
                .collect(),
                ..feedback("La devozione fatta cane!", "Assolutamente no!")
            },
            reveal: None,
        },
        StepConfig {
            id: id(5),
            title: "Da 0 a 100 quante coccole mi farai appena ci rivedremo?".into(),
            prompt: "Attendo con impazienza...".into(),
            hint: None,
            rule: AnswerRule::Scale {
                min: 0,
                max: 100,
                target: 100,
            },
            feedback: StepFeedback {
                scale_levels: vec![
                    level(Some(50), "😢 Non mi ami più?!"),
                    level(Some(80), "🤔 Mmm... si può fare di più!"),
                    level(Some(100), "😊 Quasi perfetto..."),
                    level(None, "😍 L'amore regna!"),
                ],
                ..feedback("Risposta corretta! ❤️", "Solo?? Metti 100!")
            },
            reveal: None,
        },
        StepConfig {
            id: id(6),
            title: "Titolo nobiliare".into(),
            prompt: "Qual è il mio titolo nobiliare preferito?".into(),
            hint: Some("Non è dottore bis!".into()),
            rule: choice(
                &["Sir botulus", "Stupido botolo", "Botolo", "Dottore bis"],
                "Botolo",
            ),
            feedback: feedback("L'unico e inimitabile!", "No!"),
            reveal: reveal("💕 L'autore...", "foto_step6.jpeg", "Me", "➡️ Continua"),
        },
        StepConfig {
            id: id(7),
            title: "Completa la frase".into(),
            prompt: "Non lungo che tocchi, non largo che tappi...?".into(),
            hint: Some("Gennari docet...".into()),
            rule: choice(
                &[
                    "ma giusto che passi!",
                    "ma stretto che abbracci!",
                    "ma dritto che serva!",
                    "ma duro che duri!",
                ],
                "ma duro che duri!",
            ),
            feedback: feedback("Gennari sarebbe fiero! 🥰", "Poche idee, ma confuse!"),
            reveal: None,
        },
        StepConfig {
            id: id(8),
            title: "Password 🔐".into(),
            prompt: "Qual è il mio soprannome preferito per te?".into(),
            hint: Some("Semplice e dolce".into()),
            rule: AnswerRule::Passphrase {
                accepted: vec!["amore".into(), "tips".into(), "botola".into(), "disco".into()],
            },
            feedback: feedback("Accesso consentito! 💕", "Accesso Negato!"),
            reveal: reveal(
                "💕 La mia persona speciale...",
                "foto_step8.jpeg",
                "Mio amori",
                "➡️ Avanti! 🎉",
            ),
        },
        StepConfig {
            id: id(9),
            title: "La canzone del disco".into(),
            prompt: "Quale canzone è dedicata a te?".into(),
            hint: Some("La sua voce ha ispirato milioni di persone... 🎤".into()),
            rule: choice(
                &[
                    "Sono solo un botolino - Il botolo",
                    "Piccola tippete dove sei andata - Il botolo",
                    "Poldo il bovaro - Il botolo",
                    "L'emozione non ha voce - Celentano feat Paolo e me",
                ],
                "Piccola tippete dove sei andata - Il botolo",
            ),
            feedback: feedback("Esatto! 🎶", "Non è questa!"),
            reveal: reveal(
                "💕 La canzone per quando sei via...",
                "foto_step9.jpeg",
                "NOI!",
                "➡️ Al Finale! 🎉",
            ),
        },
    ]
}

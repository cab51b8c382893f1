use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

/// Command-line arguments for love-quiz.
#[derive(Parser, Debug)]
#[command(name = "love-quiz")]
#[command(about = "A small personal quiz that ends with a dedication")]
#[command(version)]
pub struct QuizConfig {
    /// JSON file holding the session snapshot
    #[arg(long, default_value = "quiz_state.json", env = "LOVE_QUIZ_STATE_FILE", global = true)]
    pub state_file: PathBuf,

    /// Directory with the photos and the song
    #[arg(long, default_value = ".", env = "LOVE_QUIZ_ASSETS", global = true)]
    pub assets: PathBuf,

    /// Custom quiz definition (JSON); the built-in quiz is used otherwise
    #[arg(long, env = "LOVE_QUIZ_DEFINITION", global = true)]
    pub definition: Option<PathBuf>,

    /// Milliseconds per character of the typewriter effect
    #[arg(long, default_value_t = 40, env = "LOVE_QUIZ_PACE_MS", global = true)]
    pub pace_ms: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play the quiz (default)
    Play {
        /// Continue from the saved snapshot instead of starting over
        #[arg(long)]
        resume: bool,
    },
    /// Delete the saved snapshot
    Reset,
    /// Print the built-in quiz definition as JSON, as a template for --definition
    DumpDefinition,
}

impl QuizConfig {
    /// The subcommand to run; plain `love-quiz` plays a fresh game.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Play { resume: false })
    }

    #[must_use]
    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_a_fresh_game() {
        let config = QuizConfig::try_parse_from(["love-quiz"]).unwrap();
        assert_eq!(config.command(), Command::Play { resume: false });
        assert_eq!(config.state_file, PathBuf::from("quiz_state.json"));
        assert!(config.definition.is_none());
    }

    #[test]
    fn parses_resume_and_paths() {
        let config = QuizConfig::try_parse_from([
            "love-quiz",
            "play",
            "--resume",
            "--state-file",
            "/tmp/quiz.json",
            "--pace-ms",
            "0",
        ])
        .unwrap();
        assert_eq!(config.command(), Command::Play { resume: true });
        assert_eq!(config.state_file, PathBuf::from("/tmp/quiz.json"));
        assert_eq!(config.pace(), Duration::ZERO);
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(QuizConfig::try_parse_from(["love-quiz", "--pace", "fast"]).is_err());
    }
}

mod config;
mod terminal;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use quiz_core::model::QuizDefinition;
use services::{AssetStore, Clock, QuizLoopService, load_definition};
use storage::repository::Storage;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Command, QuizConfig};
use crate::terminal::{SessionEnd, Terminal};

const DEFAULT_LOG_FILTER: &str = "love_quiz=info,services=info";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn prepare_state_dir(state_file: &Path) -> Result<()> {
    if let Some(parent) = state_file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

async fn definition(config: &QuizConfig) -> Result<QuizDefinition> {
    match &config.definition {
        Some(path) => load_definition(path)
            .await
            .with_context(|| format!("failed to load quiz definition {}", path.display())),
        None => Ok(QuizDefinition::builtin()),
    }
}

async fn run(config: QuizConfig) -> Result<()> {
    match config.command() {
        Command::DumpDefinition => {
            let json = serde_json::to_string_pretty(&definition(&config).await?)
                .context("failed to serialize quiz definition")?;
            println!("{json}");
        }
        Command::Reset => {
            let storage = Storage::json_file(&config.state_file);
            storage
                .snapshots
                .clear_snapshot()
                .await
                .with_context(|| format!("failed to delete {}", config.state_file.display()))?;
            info!(path = %config.state_file.display(), "saved session deleted");
        }
        Command::Play { resume } => {
            prepare_state_dir(&config.state_file).await?;
            let storage = Storage::json_file(&config.state_file);
            let service =
                QuizLoopService::new(Clock::default(), definition(&config).await?, storage.snapshots)
                    .context("invalid quiz definition")?;

            let mut state = if resume {
                service.resume().await
            } else {
                service.open_fresh().await
            };
            info!(
                step = state.step(),
                state_file = %config.state_file.display(),
                "session opened"
            );

            let mut terminal = Terminal::new(
                service,
                AssetStore::new(&config.assets),
                config.pace(),
                BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
            );
            let end = terminal.run(&mut state).await.context("terminal i/o failed")?;
            match end {
                SessionEnd::Finished => info!("quiz finished"),
                SessionEnd::Quit => info!(step = state.step(), "quiz left; `play --resume` continues"),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    let config = QuizConfig::parse();
    if let Err(err) = run(config).await {
        eprintln!("error: {err:#}");
        std::process::exit(2);
    }
}

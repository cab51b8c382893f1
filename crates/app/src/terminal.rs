use std::io;
use std::time::Duration;

use quiz_core::model::{AnswerRule, BonusReveal, ScoreBanner, SessionState, StepConfig, StepId};
use services::{
    Asset, AssetStore, DedicationPlayback, FinaleScreen, QuestionScreen, QuizLoopService, Screen,
    SubmitOutcome,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// One line of player input, already classified.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Hint,
    Quit,
    Restart,
    Secret,
    Text(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "?" => Self::Hint,
            ":q" | ":quit" => Self::Quit,
            ":restart" => Self::Restart,
            ":segreto" => Self::Secret,
            other => Self::Text(other.to_owned()),
        }
    }
}

/// How a terminal session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The player left with `:q` or closed the input.
    Quit,
    /// The finale was shown and the player left from there.
    Finished,
}

/// Line-based presenter driving `QuizLoopService` from a reader and a writer.
pub struct Terminal<R, W> {
    service: QuizLoopService,
    assets: AssetStore,
    pace: Duration,
    input: R,
    output: W,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        service: QuizLoopService,
        assets: AssetStore,
        pace: Duration,
        input: R,
        output: W,
    ) -> Self {
        Self {
            service,
            assets,
            pace,
            input,
            output,
        }
    }

    /// Play until the player quits or leaves the finale.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if reading input or writing output fails.
    pub async fn run(&mut self, state: &mut SessionState) -> io::Result<SessionEnd> {
        let service = self.service.clone();
        'session: loop {
            let step = match service.screen(state) {
                Screen::Welcome(welcome) => {
                    self.line("").await?;
                    self.line(&format!("💕 {}", welcome.title)).await?;
                    self.line(&welcome.subtitle).await?;
                    self.line("").await?;
                    self.line(&welcome.intro).await?;
                    self.line(&format!("[invio] {}", welcome.start_label)).await?;
                    match self.read_input().await? {
                        None | Some(Input::Quit) => return Ok(SessionEnd::Quit),
                        Some(Input::Restart) => service.restart(state).await,
                        Some(_) => {
                            service.start(state).await;
                        }
                    }
                    continue;
                }
                Screen::Question(question) => {
                    if let Some(reveal) = question.reveal {
                        let step = question.config.id;
                        self.show_reveal(reveal).await?;
                        match self.read_input().await? {
                            None | Some(Input::Quit) => return Ok(SessionEnd::Quit),
                            Some(Input::Restart) => service.restart(state).await,
                            Some(_) => {
                                service.continue_after_reveal(state, step).await;
                            }
                        }
                        continue;
                    }
                    self.show_question(&question).await?;
                    question.config
                }
                Screen::Finale(finale) => {
                    self.show_finale(&finale).await?;
                    if let Some(playback) = service.play_dedication(state).await {
                        self.show_dedication(&finale, playback).await?;
                    }
                    self.line("").await?;
                    self.line(finale.closing).await?;
                    self.line("").await?;
                    self.line(":segreto per un messaggio segreto").await?;
                    self.line(":restart per ricominciare, invio per uscire").await?;
                    loop {
                        match self.read_input().await? {
                            Some(Input::Secret) => {
                                if let Some(secret) = service.secret_message() {
                                    self.line(&format!("🔒 {secret}")).await?;
                                }
                            }
                            Some(Input::Restart) => {
                                service.restart(state).await;
                                continue 'session;
                            }
                            _ => return Ok(SessionEnd::Finished),
                        }
                    }
                }
            };

            match self.read_input().await? {
                None | Some(Input::Quit) => return Ok(SessionEnd::Quit),
                Some(Input::Restart) => service.restart(state).await,
                Some(Input::Hint) => self.hint(state, step.id).await?,
                Some(Input::Secret) => {}
                Some(Input::Text(text)) => {
                    if let Some(level) = service.scale_feedback(step.id, &text) {
                        self.line(level).await?;
                    }
                    let answer = resolve_answer(step, &text);
                    let outcome = service.submit_answer(state, step.id, &answer).await;
                    self.show_outcome(outcome).await?;
                }
            }
        }
    }

    //
    // ─── RENDERING ────────────────────────────────────────────────────────────
    //

    async fn show_question(&mut self, question: &QuestionScreen<'_>) -> io::Result<()> {
        let config = question.config;
        self.line("").await?;
        self.line(&format!(
            "[{}/{}] {}",
            question.progress.step, question.progress.total, config.title
        ))
        .await?;
        self.line(&config.prompt).await?;
        match &config.rule {
            AnswerRule::Choice { options, .. } => {
                for (index, option) in options.iter().enumerate() {
                    self.line(&format!("  {}. {option}", index + 1)).await?;
                }
            }
            AnswerRule::Scale { min, max, .. } => {
                self.line(&format!("  ({min}-{max})")).await?;
            }
            AnswerRule::Passphrase { .. } => {}
        }
        if config.hint.is_some() && !question.hint_requested {
            self.line("  ? per un indizio").await?;
        }
        self.write("> ").await
    }

    async fn show_outcome(&mut self, outcome: SubmitOutcome) -> io::Result<()> {
        match outcome {
            SubmitOutcome::Ignored => Ok(()),
            SubmitOutcome::Incorrect { feedback, attempts } => {
                debug!(attempts, "wrong answer shown");
                self.line(&feedback).await
            }
            SubmitOutcome::Advanced { feedback, .. } | SubmitOutcome::Revealed { feedback, .. } => {
                self.line(&feedback).await
            }
        }
    }

    async fn show_reveal(&mut self, reveal: &BonusReveal) -> io::Result<()> {
        self.line("").await?;
        self.line(&reveal.heading).await?;
        self.show_asset(&reveal.photo).await?;
        self.line(&reveal.caption).await?;
        self.line(&format!("[invio] {}", reveal.continue_label)).await
    }

    async fn show_finale(&mut self, finale: &FinaleScreen<'_>) -> io::Result<()> {
        let summary = &finale.summary;
        self.line("").await?;
        self.line(&finale.content.title).await?;
        self.line(&format!(
            "⏱️ {} min {} s · 💡 {} indizi",
            summary.minutes(),
            summary.seconds(),
            summary.hints_used()
        ))
        .await?;
        match summary.banner() {
            ScoreBanner::Perfect => self.line("🏆 Punteggio perfetto!").await?,
            ScoreBanner::Errors(count) => {
                self.line(&format!("❌ {count} errori")).await?;
            }
        }
        self.show_asset(&finale.content.couple_photo).await?;
        if let Some(song) = &finale.content.song {
            self.show_asset(song).await?;
        }
        Ok(())
    }

    async fn show_dedication(
        &mut self,
        finale: &FinaleScreen<'_>,
        playback: DedicationPlayback,
    ) -> io::Result<()> {
        self.line("").await?;
        self.line(&finale.content.dedication_heading).await?;
        match playback {
            DedicationPlayback::Animate(text) => self.typewriter(&text).await,
            DedicationPlayback::Static(text) => self.line(&text).await,
        }
    }

    async fn show_asset(&mut self, file_name: &str) -> io::Result<()> {
        match self.assets.lookup(file_name).await {
            Asset::Found(path) => self.line(&format!("🖼️ {}", path.display())).await,
            Asset::Missing { fallback, .. } => self.line(&fallback).await,
        }
    }

    async fn hint(&mut self, state: &mut SessionState, step: StepId) -> io::Result<()> {
        let service = self.service.clone();
        match service.request_hint(state, step).await {
            Some(hint) => self.line(&format!("💡 {hint}")).await,
            None => self.line("Nessun indizio per questa domanda.").await,
        }
    }

    //
    // ─── IO ───────────────────────────────────────────────────────────────────
    //

    async fn read_input(&mut self) -> io::Result<Option<Input>> {
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(Input::parse(&line)))
    }

    async fn typewriter(&mut self, text: &str) -> io::Result<()> {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            self.output.write_all(ch.encode_utf8(&mut buf).as_bytes()).await?;
            self.output.flush().await?;
            if !self.pace.is_zero() {
                tokio::time::sleep(self.pace).await;
            }
        }
        self.line("").await
    }

    async fn line(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }

    async fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await
    }
}

/// Map what the player typed onto the value the answer rule expects.
///
/// For choice steps a 1-based option number selects that option; anything else
/// is submitted as typed.
fn resolve_answer(step: &StepConfig, text: &str) -> String {
    if let AnswerRule::Choice { options, .. } = &step.rule {
        if let Some(option) = text
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| options.get(index))
        {
            return option.clone();
        }
    }
    text.to_owned()
}

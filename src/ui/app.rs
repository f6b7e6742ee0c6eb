//! The interaction loop.

use crate::history::ConversationLog;
use crate::inference::GoalResponder;
use crate::session::{Exchange, submit_goal};
use crate::ui::console::Console;
use crate::ui::mode::{InputMode, MenuChoice, menu_prompt, parse_menu_choice};
use crate::ui::render::{ASSISTANT_LABEL, render_history};
use crate::ui::selector::{GoalSources, select_goal};
use crate::voice::VoiceCapability;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::io::AsyncBufRead;
use tracing::info;

pub const TITLE: &str = "🤖 Simple Auto-GPT with local models + Voice + File Goals";

/// Everything one interactive session needs besides its log.
pub struct App {
    responder: Box<dyn GoalResponder>,
    voice: VoiceCapability,
    goals_file: PathBuf,
}

impl App {
    pub fn new(
        responder: Box<dyn GoalResponder>,
        voice: VoiceCapability,
        goals_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            responder,
            voice,
            goals_file: goals_file.into(),
        }
    }

    /// Run interactions until the user quits or input ends.
    ///
    /// Each round: pick a mode, obtain a goal, answer it, redraw the log.
    ///
    /// # Errors
    ///
    /// Returns an error only if the console fails.
    pub async fn run<R, W>(
        &self,
        console: &mut Console<R, W>,
        log: &mut ConversationLog,
    ) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        console.line(TITLE)?;
        if let Some(reason) = self.voice.unavailable_reason() {
            console.line(format!("(voice off: {reason})"))?;
        }
        console.blank()?;

        let mut mode = InputMode::default();
        let sources = GoalSources {
            voice: &self.voice,
            goals_file: &self.goals_file,
        };

        loop {
            let Some(answer) = console.prompt(&menu_prompt(mode)).await? else {
                break;
            };

            match parse_menu_choice(&answer, mode) {
                MenuChoice::Mode(selected) => mode = selected,
                MenuChoice::Quit => break,
                MenuChoice::Invalid(other) => {
                    console.line(format!("⚠️ Unknown choice '{other}'."))?;
                    continue;
                }
            }

            let Some(goal) = select_goal(console, mode, &sources).await? else {
                break;
            };

            if !goal.is_empty() {
                self.handle_goal(console, log, &goal).await?;
            }

            render_history(log, console.output_mut())?;
        }

        info!("session ended after {} goal(s)", log.exchange_count());
        Ok(())
    }

    /// Answer one goal: record it, show the reply, speak it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the console fails.
    pub async fn handle_goal<R, W>(
        &self,
        console: &mut Console<R, W>,
        log: &mut ConversationLog,
        goal: &str,
    ) -> io::Result<Exchange>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let exchange = submit_goal(self.responder.as_ref(), log, goal).await;

        match exchange.answer() {
            Some(reply) => {
                console.line(format!("{ASSISTANT_LABEL}: {reply}"))?;
                self.voice.speak(reply).await;
            }
            None => console.line(exchange.display_text())?,
        }

        Ok(exchange)
    }
}

//! Goal acquisition for each input mode.

use crate::goals::read_goals_from_file;
use crate::ui::console::Console;
use crate::ui::mode::InputMode;
use crate::voice::VoiceCapability;
use std::io::{self, Write};
use std::path::Path;
use tokio::io::AsyncBufRead;
use tracing::warn;

pub const GOAL_PROMPT: &str = "🧠 What is your goal today?";
pub const VOICE_UNAVAILABLE_WARNING: &str = "🎤 Voice input is not available in this environment.";

/// Where goals can come from besides the keyboard.
pub struct GoalSources<'a> {
    pub voice: &'a VoiceCapability,
    pub goals_file: &'a Path,
}

/// Obtain one goal using `mode`.
///
/// Returns `Some("")` when no goal is available this round (empty line,
/// voice unavailable or not understood, empty goal file) and `None` at end
/// of input. Typed goals are returned exactly as entered, whitespace included.
///
/// # Errors
///
/// Returns an error only if the console itself fails.
pub async fn select_goal<R, W>(
    console: &mut Console<R, W>,
    mode: InputMode,
    sources: &GoalSources<'_>,
) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match mode {
        InputMode::Type => type_goal(console).await,
        InputMode::Voice => voice_goal(console, sources.voice).await,
        InputMode::File => file_goal(console, sources.goals_file).await,
    }
}

async fn type_goal<R, W>(console: &mut Console<R, W>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Some(answer) = console.prompt(GOAL_PROMPT).await? else {
        return Ok(None);
    };
    Ok(Some(answer))
}

async fn voice_goal<R, W>(
    console: &mut Console<R, W>,
    voice: &VoiceCapability,
) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if !voice.is_available() {
        console.line(VOICE_UNAVAILABLE_WARNING)?;
        return Ok(Some(String::new()));
    }

    let Some(answer) = console
        .prompt("🎙️ Press Enter to speak now (or type 'skip'):")
        .await?
    else {
        return Ok(None);
    };
    if answer.trim().eq_ignore_ascii_case("skip") {
        return Ok(Some(String::new()));
    }

    console.line("🎤 Listening for your voice...")?;
    match voice.listen().await {
        Ok(text) => {
            console.line(format!("🗣️ You said: {text}"))?;
            Ok(Some(text))
        }
        Err(e) => {
            console.line(format!("❌ {e}"))?;
            Ok(Some(String::new()))
        }
    }
}

async fn file_goal<R, W>(console: &mut Console<R, W>, path: &Path) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let goals = match read_goals_from_file(path) {
        Ok(goals) => goals,
        Err(e) => {
            warn!("cannot read goal file {}: {e}", path.display());
            console.line(format!("⚠️ Cannot read {}: {e}", path.display()))?;
            return Ok(Some(String::new()));
        }
    };

    if goals.is_empty() {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        console.line(format!("📁 No {name} file found or it's empty."))?;
        return Ok(Some(String::new()));
    }

    console.line("📄 Choose a goal from file:")?;
    for (i, goal) in goals.iter().enumerate() {
        console.line(format!("  {}. {goal}", i + 1))?;
    }

    let Some(answer) = console.prompt("Goal number [1]:").await? else {
        return Ok(None);
    };

    match pick_goal(&goals, &answer) {
        Some(goal) => Ok(Some(goal.to_owned())),
        None => {
            console.line(format!(
                "⚠️ '{}' is not a goal number between 1 and {}.",
                answer.trim(),
                goals.len()
            ))?;
            Ok(Some(String::new()))
        }
    }
}

/// Resolve a drop-down answer: blank picks the first goal.
fn pick_goal<'a>(goals: &'a [String], answer: &str) -> Option<&'a str> {
    let answer = answer.trim();
    if answer.is_empty() {
        return goals.first().map(String::as_str);
    }
    let index: usize = answer.parse().ok()?;
    goals.get(index.checked_sub(1)?).map(String::as_str)
}

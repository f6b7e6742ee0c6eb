//! Text-to-speech through the platform's speech command.
//!
//! macOS ships `say`; Linux desktops usually have `espeak-ng`, `espeak`, or
//! speech-dispatcher's `spd-say`. The first one found on `PATH` wins unless
//! the config names a command.

use crate::config::SynthesisConfig;
use crate::error::{GoalError, Result};
use crate::voice::SpeechSynthesizer;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tracing::{debug, info};

/// Synthesisers probed in order when none is configured.
const DEFAULT_SYNTHESIZERS: &[&str] = &["say", "espeak-ng", "espeak", "spd-say"];

/// Speaks text by running an external command with the text as last argument.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Locate a synthesiser according to `config`.
    ///
    /// Returns `None` if the configured command (or every default) is missing.
    pub fn discover(config: &SynthesisConfig) -> Option<Self> {
        let found = match config.command.as_deref() {
            Some(cmd) => which::which(cmd).ok(),
            None => DEFAULT_SYNTHESIZERS
                .iter()
                .find_map(|cmd| which::which(cmd).ok()),
        }?;

        info!("speech synthesiser: {}", found.display());
        Some(Self::new(found, config.args.clone()))
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn speak(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        debug!("speaking {} chars via {}", text.len(), self.program.display());
        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                GoalError::Tts(format!(
                    "failed to run {}: {e}",
                    self.program.display()
                ))
            })?;

        if !status.success() {
            return Err(GoalError::Tts(format!(
                "{} exited with status {}",
                self.program.display(),
                status
                    .code()
                    .map_or_else(|| "unknown".to_owned(), |c| c.to_string())
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn discover_missing_command_is_none() {
        let config = SynthesisConfig {
            command: Some("autogoal-no-such-synthesiser".to_owned()),
            args: Vec::new(),
        };
        assert!(CommandSynthesizer::discover(&config).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn discover_configured_command_keeps_args() {
        let config = SynthesisConfig {
            command: Some("true".to_owned()),
            args: vec!["-v".to_owned()],
        };
        let synth = CommandSynthesizer::discover(&config).unwrap();
        assert!(synth.program.ends_with("true"));
        assert_eq!(synth.args, vec!["-v"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn speak_succeeds_when_command_exits_zero() {
        let synth = CommandSynthesizer::discover(&SynthesisConfig {
            command: Some("true".to_owned()),
            args: Vec::new(),
        })
        .unwrap();
        assert!(synth.speak("hello").await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn speak_fails_when_command_fails() {
        let synth = CommandSynthesizer::discover(&SynthesisConfig {
            command: Some("false".to_owned()),
            args: Vec::new(),
        })
        .unwrap();
        let err = synth.speak("hello").await.unwrap_err();
        assert!(matches!(err, GoalError::Tts(_)));
    }

    #[tokio::test]
    async fn speak_skips_blank_text() {
        let synth = CommandSynthesizer::new("/nonexistent/synth", Vec::new());
        assert!(synth.speak("   ").await.is_ok());
    }

    #[tokio::test]
    async fn speak_reports_missing_program() {
        let synth = CommandSynthesizer::new("/nonexistent/synth", Vec::new());
        assert!(synth.speak("hi").await.is_err());
    }
}

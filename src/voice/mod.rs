//! Optional voice capability: microphone goals and spoken replies.
//!
//! Voice is resolved once at start by [`VoiceCapability::detect`]. When the
//! synthesiser or microphone is missing the capability is
//! [`VoiceCapability::Unavailable`]; callers keep working and
//! [`VoiceCapability::speak`] becomes a no-op.

pub mod capture;
pub mod stt;
pub mod tts;
pub mod vad;

use crate::config::VoiceConfig;
use crate::error::Result;
use async_trait::async_trait;
use capture::MicrophoneCapture;
use std::time::Duration;
use stt::HttpTranscriber;
use tracing::{info, warn};
use tts::CommandSynthesizer;
use vad::PhraseConfig;

/// Why `listen` produced no goal. The messages are shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListenError {
    /// Voice is not available in this environment.
    #[error("Voice input not supported in this environment.")]
    Unavailable,

    /// Nobody spoke before the listen timeout.
    #[error("No speech heard within {0} seconds.")]
    NoSpeech(u64),

    /// Audio was captured but no words were recognised.
    #[error("Could not understand audio.")]
    Unintelligible,

    /// The recognition service failed.
    #[error("Recognition error: {0}")]
    Service(String),

    /// The microphone could not be read.
    #[error("Microphone error: {0}")]
    Device(String),
}

/// Turns text into audible speech.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text`, returning once playback has finished.
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Turns one spoken phrase into text.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Capture and transcribe one phrase.
    async fn listen(&self) -> std::result::Result<String, ListenError>;
}

/// Microphone capture followed by remote transcription.
pub struct MicrophoneRecognizer {
    capture: MicrophoneCapture,
    phrase: PhraseConfig,
    listen_timeout: Duration,
    transcriber: HttpTranscriber,
}

impl MicrophoneRecognizer {
    /// # Errors
    ///
    /// Returns an error if the transcription client cannot be built.
    pub fn new(config: &VoiceConfig) -> Result<Self> {
        Ok(Self {
            capture: MicrophoneCapture::new(config),
            phrase: PhraseConfig::from_voice_config(config),
            listen_timeout: Duration::from_secs(config.listen_timeout_secs),
            transcriber: HttpTranscriber::new(&config.transcription)?,
        })
    }
}

#[async_trait]
impl SpeechRecognizer for MicrophoneRecognizer {
    async fn listen(&self) -> std::result::Result<String, ListenError> {
        let capture = self.capture.clone();
        let phrase = self.phrase;
        let timeout = self.listen_timeout;

        let recorded =
            tokio::task::spawn_blocking(move || capture.record_phrase(&phrase, timeout))
                .await
                .map_err(|e| ListenError::Device(format!("capture task failed: {e}")))?
                .map_err(|e| ListenError::Device(e.to_string()))?;

        let Some(samples) = recorded else {
            return Err(ListenError::NoSpeech(timeout.as_secs()));
        };

        self.transcriber
            .transcribe(&samples, self.capture.sample_rate())
            .await
    }
}

/// The engines behind an available voice capability.
pub struct VoiceBridge {
    synthesizer: Box<dyn SpeechSynthesizer>,
    recognizer: Box<dyn SpeechRecognizer>,
}

impl VoiceBridge {
    pub fn new(
        synthesizer: Box<dyn SpeechSynthesizer>,
        recognizer: Box<dyn SpeechRecognizer>,
    ) -> Self {
        Self {
            synthesizer,
            recognizer,
        }
    }
}

/// Voice support resolved at start.
pub enum VoiceCapability {
    /// Speaking and listening both work.
    Available(VoiceBridge),
    /// Voice is off; `reason` says why.
    Unavailable { reason: String },
}

impl VoiceCapability {
    /// Probe the environment once and decide whether voice is usable.
    ///
    /// Needs a speech synthesiser on `PATH` and an input device. The
    /// recognition service is not contacted here; its failures surface per
    /// `listen` call.
    pub fn detect(config: &VoiceConfig) -> Self {
        if !config.enabled {
            return Self::unavailable("voice disabled in config");
        }

        let Some(synthesizer) = CommandSynthesizer::discover(&config.synthesis) else {
            let reason = match config.synthesis.command.as_deref() {
                Some(cmd) => format!("speech synthesiser '{cmd}' not found"),
                None => "no speech synthesiser found (say, espeak-ng, espeak, spd-say)".to_owned(),
            };
            return Self::unavailable(reason);
        };

        let recognizer = match MicrophoneRecognizer::new(config) {
            Ok(recognizer) => recognizer,
            Err(e) => return Self::unavailable(format!("speech recognition unavailable: {e}")),
        };
        match recognizer.capture.probe() {
            Ok(device) => info!("voice enabled: microphone {device}"),
            Err(e) => return Self::unavailable(format!("no microphone: {e}")),
        }

        Self::Available(VoiceBridge::new(
            Box::new(synthesizer),
            Box::new(recognizer),
        ))
    }

    /// Build an unavailable capability.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        info!("voice unavailable: {reason}");
        Self::Unavailable { reason }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Why voice is off, if it is.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            Self::Available(_) => None,
            Self::Unavailable { reason } => Some(reason),
        }
    }

    /// Speak `text` and wait for playback to finish.
    ///
    /// Silently does nothing when voice is unavailable. Synthesiser errors
    /// are logged, not returned.
    pub async fn speak(&self, text: &str) {
        let Self::Available(bridge) = self else {
            return;
        };
        if let Err(e) = bridge.synthesizer.speak(text).await {
            warn!("speech output failed: {e}");
        }
    }

    /// Capture one spoken phrase as text.
    ///
    /// # Errors
    ///
    /// Returns [`ListenError::Unavailable`] when voice is off, otherwise
    /// whatever the recogniser reports.
    pub async fn listen(&self) -> std::result::Result<String, ListenError> {
        match self {
            Self::Available(bridge) => bridge.recognizer.listen().await,
            Self::Unavailable { .. } => Err(ListenError::Unavailable),
        }
    }
}

//! Configuration types for autogoal.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Local inference endpoint settings.
    pub inference: InferenceConfig,
    /// Optional voice capability settings.
    pub voice: VoiceConfig,
    /// Goal file settings.
    pub goals: GoalsConfig,
}

/// Local inference endpoint configuration (Ollama generate API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL of the model server.
    pub api_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Request timeout in seconds. `None` waits indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:11434".to_owned(),
            model: "mistral".to_owned(),
            request_timeout_secs: None,
        }
    }
}

/// Voice capability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Whether to try enabling voice at all.
    pub enabled: bool,
    /// How long to wait for speech to start, in seconds.
    pub listen_timeout_secs: u64,
    /// Maximum length of one captured phrase, in seconds.
    pub phrase_time_limit_secs: u64,
    /// Trailing silence that ends a phrase, in milliseconds.
    pub pause_ms: u32,
    /// Phrases shorter than this are discarded, in milliseconds.
    pub min_phrase_ms: u32,
    /// RMS energy above which a chunk counts as speech.
    ///
    /// Typical values for f32 samples in \[-1, 1\]:
    ///   - 0.005: very sensitive
    ///   - 0.01:  normal (default)
    ///   - 0.03:  noisy rooms
    pub energy_threshold: f32,
    /// Sample rate delivered to the recogniser, in Hz.
    pub input_sample_rate: u32,
    /// Input device name (None = system default).
    pub input_device: Option<String>,
    /// Speech recognition service.
    pub transcription: TranscriptionConfig,
    /// Speech synthesis command.
    pub synthesis: SynthesisConfig,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen_timeout_secs: 5,
            phrase_time_limit_secs: 15,
            pause_ms: 800,
            min_phrase_ms: 250,
            energy_threshold: 0.01,
            input_sample_rate: 16_000,
            input_device: None,
            transcription: TranscriptionConfig::default(),
            synthesis: SynthesisConfig::default(),
        }
    }
}

/// OpenAI-compatible transcription endpoint (whisper.cpp server,
/// faster-whisper-server, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Base URL of the recognition service.
    pub api_url: String,
    /// Model name sent in the form.
    pub model: String,
    /// Optional spoken-language hint (ISO 639-1).
    pub language: Option<String>,
    /// Optional bearer token.
    pub api_key: Option<String>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_owned(),
            model: "whisper-1".to_owned(),
            language: None,
            api_key: None,
        }
    }
}

/// Speech synthesis command configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Synthesiser program. `None` picks the first of `say`, `espeak-ng`,
    /// `espeak`, `spd-say` found on `PATH`.
    pub command: Option<String>,
    /// Extra arguments placed before the text.
    pub args: Vec<String>,
}

/// Goal file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalsConfig {
    /// Path of the goal list, relative to the working directory.
    pub file: PathBuf,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("goals.txt"),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::GoalError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::GoalError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/autogoal/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_file()
    }
}

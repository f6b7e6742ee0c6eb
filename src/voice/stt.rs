//! Speech-to-text through an OpenAI-compatible transcription service.
//!
//! Phrases are encoded as 16-bit mono WAV and uploaded to
//! `POST {api_url}/v1/audio/transcriptions` (whisper.cpp server,
//! faster-whisper-server, and similar local services speak this API).

use crate::config::TranscriptionConfig;
use crate::error::{GoalError, Result};
use crate::voice::ListenError;
use std::io::Cursor;
use std::time::Instant;
use tracing::{debug, info};

/// Client for the recognition service.
#[derive(Debug, Clone)]
pub struct HttpTranscriber {
    url: String,
    model: String,
    language: Option<String>,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpTranscriber {
    /// # Errors
    ///
    /// Returns [`GoalError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &TranscriptionConfig) -> Result<Self> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            GoalError::Config(format!("cannot build transcription HTTP client: {e}"))
        })?;

        let base = config.api_url.trim_end_matches('/');
        Ok(Self {
            url: format!("{base}/v1/audio/transcriptions"),
            model: config.model.clone(),
            language: config.language.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            client,
        })
    }

    /// Full URL of the transcription endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Transcribe mono `samples` recorded at `sample_rate`.
    ///
    /// # Errors
    ///
    /// Returns [`ListenError::Unintelligible`] when the service hears no
    /// words and [`ListenError::Service`] for transport or HTTP failures.
    pub async fn transcribe(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> std::result::Result<String, ListenError> {
        let wav = encode_wav(samples, sample_rate).map_err(|e| ListenError::Device(e.to_string()))?;
        let start = Instant::now();
        debug!("uploading {} bytes of audio to {}", wav.len(), self.url);

        let part = reqwest::multipart::Part::bytes(wav)
            .file_name("speech.wav")
            .mime_str("audio/wav")
            .map_err(|e| ListenError::Service(e.to_string()))?;
        let mut form = reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part("file", part);
        if let Some(ref language) = self.language {
            form = form.text("language", language.clone());
        }

        let mut request = self.client.post(&self.url).multipart(form);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ListenError::Service(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail: String = body.chars().take(200).collect();
            return Err(ListenError::Service(format!(
                "HTTP {}: {detail}",
                status.as_u16()
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ListenError::Service(format!("invalid response: {e}")))?;

        let text = json
            .get("text")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ListenError::Unintelligible);
        }

        info!(
            "transcribed in {:.0}ms: \"{text}\"",
            start.elapsed().as_millis()
        );
        Ok(text.to_owned())
    }
}

/// Encode mono f32 samples as a 16-bit PCM WAV file in memory.
fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| GoalError::Stt(format!("failed to create wav writer: {e}")))?;

    for &s in samples {
        let clamped = s.clamp(-1.0, 1.0);
        let v = (clamped * i16::MAX as f32).round() as i16;
        writer
            .write_sample(v)
            .map_err(|e| GoalError::Stt(format!("failed to write wav sample: {e}")))?;
    }
    writer
        .finalize()
        .map_err(|e| GoalError::Stt(format!("failed to finalize wav: {e}")))?;

    Ok(cursor.into_inner())
}

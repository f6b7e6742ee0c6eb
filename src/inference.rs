//! Client for the local inference endpoint.
//!
//! Each goal becomes one non-streaming `POST /api/generate` request against
//! an Ollama-compatible server. The reply comes back as a tagged
//! [`Result`]: a missing `response` field is still an answer (the fixed
//! placeholder), while transport, status, and decoding problems are
//! [`InferenceError`]s.
//!
//! # Example
//!
//! ```rust,no_run
//! use autogoal::config::InferenceConfig;
//! use autogoal::inference::InferenceClient;
//!
//! # async fn example() {
//! let client = InferenceClient::new(&InferenceConfig::default()).unwrap();
//! match client.generate("Summarise the Rust book in one line").await {
//!     Ok(text) => println!("{text}"),
//!     Err(e) => eprintln!("inference failed: {e}"),
//! }
//! # }
//! ```

use crate::config::InferenceConfig;
use crate::error::GoalError;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Reply used when the server answers without a `response` field.
pub const NO_RESPONSE_PLACEHOLDER: &str = "⚠️ No response from the model.";

/// Prefix of the display text for a failed request.
pub const ERROR_MARKER: &str = "❌ Error:";

/// Longest error body carried into an [`InferenceError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Why a goal produced no answer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InferenceError {
    /// The request never completed (connection refused, reset, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided error text.
        message: String,
    },

    /// The body was not valid JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Something that can answer a goal.
///
/// [`InferenceClient`] is the production implementation; the session only
/// depends on this trait.
#[async_trait]
pub trait GoalResponder: Send + Sync {
    /// Produce a reply for `goal`.
    async fn respond(&self, goal: &str) -> Result<String, InferenceError>;
}

/// Request body for `/api/generate`.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Reachability of the inference endpoint, as seen by [`InferenceClient::probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointStatus {
    /// Server is up; lists the installed models.
    Available { models: Vec<String> },
    /// Connection refused / unreachable.
    NotRunning,
    /// No response within the probe deadline.
    Timeout,
    /// Server answered with an error status.
    Unhealthy { status_code: u16, message: String },
}

impl EndpointStatus {
    /// Returns `true` if the server answered and listed its models.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Returns `true` if `model` is among the listed models.
    ///
    /// Ollama reports tagged names (`mistral:latest`), so a bare name
    /// matches any tag of the same model.
    pub fn has_model(&self, model: &str) -> bool {
        match self {
            Self::Available { models } => models.iter().any(|m| {
                m == model
                    || m.split_once(':')
                        .is_some_and(|(base, _)| !model.contains(':') && base == model)
            }),
            _ => false,
        }
    }
}

impl fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { models } => write!(f, "available ({} model(s))", models.len()),
            Self::NotRunning => write!(f, "not running (connection refused)"),
            Self::Timeout => write!(f, "timeout (no response)"),
            Self::Unhealthy {
                status_code,
                message,
            } => write!(f, "unhealthy (HTTP {status_code}): {message}"),
        }
    }
}

/// HTTP client for an Ollama-compatible generate endpoint.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    api_url: String,
    model: String,
    client: reqwest::Client,
}

impl InferenceClient {
    /// Create a client for the configured endpoint and model.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::Config`] if the HTTP client cannot be built
    /// (for example, the TLS backend fails to initialise).
    pub fn new(config: &InferenceConfig) -> crate::error::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            GoalError::Config(format!("cannot build inference HTTP client: {e}"))
        })?;

        info!(
            "inference configured: {} model={}",
            config.api_url, config.model
        );

        Ok(Self {
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            model: config.model.clone(),
            client,
        })
    }

    /// Base URL of the model server.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the generate endpoint.
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.api_url)
    }

    /// Send `goal` as a single non-streaming prompt and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns an [`InferenceError`] if the request fails, the server answers
    /// with a non-success status, or the body is not JSON.
    pub async fn generate(&self, goal: &str) -> Result<String, InferenceError> {
        let url = self.generate_url();
        let body = GenerateRequest {
            model: &self.model,
            prompt: goal,
            stream: false,
        };

        debug!("POST {url} ({} chars)", goal.len());
        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = extract_error_message(&text)
                .unwrap_or_else(|| text.chars().take(MAX_ERROR_BODY_CHARS).collect());
            warn!("inference returned HTTP {}: {message}", status.as_u16());
            return Err(InferenceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let reply = parse_generate_response(&text)?;
        info!(
            "inference answered in {:.1}s ({} chars)",
            start.elapsed().as_secs_f64(),
            reply.len()
        );
        Ok(reply)
    }

    /// Check whether the endpoint is reachable and list its models.
    ///
    /// Sends one `GET /api/tags`; no retries.
    pub async fn probe(&self) -> EndpointStatus {
        let url = format!("{}/api/tags", self.api_url);
        let request = self.client.get(&url).timeout(Duration::from_secs(3));

        match request.send().await {
            Ok(resp) if resp.status().is_success() => {
                let body = resp.text().await.unwrap_or_default();
                EndpointStatus::Available {
                    models: parse_tags_response(&body),
                }
            }
            Ok(resp) => {
                let status_code = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                EndpointStatus::Unhealthy {
                    status_code,
                    message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                }
            }
            Err(e) if e.is_timeout() => EndpointStatus::Timeout,
            Err(_) => EndpointStatus::NotRunning,
        }
    }
}

#[async_trait]
impl GoalResponder for InferenceClient {
    async fn respond(&self, goal: &str) -> Result<String, InferenceError> {
        self.generate(goal).await
    }
}

/// Ask `responder` about `goal` and flatten the outcome into display text.
///
/// Success yields the reply; failure yields [`ERROR_MARKER`] followed by the
/// error. Never fails.
pub async fn process_goal(responder: &dyn GoalResponder, goal: &str) -> String {
    display_reply(&responder.respond(goal).await)
}

/// Display text for an inference outcome.
pub fn display_reply(outcome: &Result<String, InferenceError>) -> String {
    match outcome {
        Ok(text) => text.clone(),
        Err(e) => format!("{ERROR_MARKER} {e}"),
    }
}

/// Extract the reply from a `/api/generate` body.
fn parse_generate_response(body: &str) -> Result<String, InferenceError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| InferenceError::Decode(e.to_string()))?;

    Ok(json
        .get("response")
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| NO_RESPONSE_PLACEHOLDER.to_owned(), str::to_owned))
}

/// Ollama reports failures as `{"error": "..."}`.
fn extract_error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json.get("error")?.as_str().map(str::to_owned)
}

/// Parse an Ollama `/api/tags` body: `{"models": [{"name": "..."}, ...]}`.
fn parse_tags_response(body: &str) -> Vec<String> {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return Vec::new();
    };
    json.get("models")
        .and_then(serde_json::Value::as_array)
        .map(|models| {
            models
                .iter()
                .filter_map(|m| m.get("name")?.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

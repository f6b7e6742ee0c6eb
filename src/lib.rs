//! autogoal: send goals to a local language model and read (or hear) the answer.
//!
//! A goal is typed, dictated, or picked from `goals.txt`, posted to an
//! Ollama-compatible `/api/generate` endpoint, and the reply is shown,
//! optionally spoken, and appended to a session-scoped conversation log.
//!
//! # Architecture
//!
//! - **Input selector** ([`ui::selector`]): one goal per interaction from the
//!   active [`ui::InputMode`]
//! - **Voice** ([`voice`]): optional capability detected once at start;
//!   `cpal` microphone capture, HTTP transcription, system speech command
//! - **Goal file** ([`goals`]): newline-delimited goals, re-read every time
//! - **Inference** ([`inference`]): one non-streaming request per goal,
//!   tagged success/failure result
//! - **History** ([`history`]): caller-owned, append-only log

pub mod app_dirs;
pub mod config;
pub mod error;
pub mod goals;
pub mod history;
pub mod inference;
pub mod session;
pub mod ui;
pub mod voice;

pub use config::AppConfig;
pub use error::{GoalError, Result};
pub use history::{ConversationLog, HistoryEntry, Role};
pub use inference::{GoalResponder, InferenceClient, InferenceError, process_goal};
pub use session::{Exchange, submit_goal};
pub use voice::{ListenError, VoiceCapability};

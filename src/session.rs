//! One goal in, one reply out.
//!
//! [`submit_goal`] is the whole control flow behind an interaction: log the
//! goal, ask the responder, log the reply. Speaking the reply and rendering
//! the log are left to the front-end.

use crate::history::ConversationLog;
use crate::inference::{GoalResponder, InferenceError, display_reply};
use tracing::{info, warn};

/// Outcome of one submitted goal.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// The goal as submitted.
    pub goal: String,
    /// Tagged inference result.
    pub outcome: Result<String, InferenceError>,
}

impl Exchange {
    /// Returns `true` if the responder produced an answer.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The answer, if any.
    pub fn answer(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    /// Text recorded in the log for this exchange.
    pub fn display_text(&self) -> String {
        display_reply(&self.outcome)
    }
}

/// Submit `goal` to `responder`, recording the goal and its reply in `log`.
///
/// The goal is logged before the request is sent. Failures are recorded as
/// their display text so the log always gains exactly two entries; the
/// returned [`Exchange`] keeps the tagged outcome.
pub async fn submit_goal(
    responder: &dyn GoalResponder,
    log: &mut ConversationLog,
    goal: &str,
) -> Exchange {
    log.push_user(goal);

    let outcome = responder.respond(goal).await;
    match &outcome {
        Ok(text) => info!("goal answered ({} chars)", text.len()),
        Err(e) => warn!("goal failed: {e}"),
    }

    let exchange = Exchange {
        goal: goal.to_owned(),
        outcome,
    };
    log.push_assistant(exchange.display_text());
    exchange
}

//! Conversation history rendering.
//!
//! The whole log is redrawn after every interaction.

use crate::history::{ConversationLog, HistoryEntry, Role};
use std::io::{self, Write};

pub const USER_LABEL: &str = "🧠 You";
pub const ASSISTANT_LABEL: &str = "🤖 Auto-GPT";
pub const HISTORY_HEADING: &str = "🕓 Conversation History";

/// One history line: `<label>: <content>`.
pub fn format_entry(entry: &HistoryEntry) -> String {
    let label = match entry.role {
        Role::User => USER_LABEL,
        Role::Assistant => ASSISTANT_LABEL,
    };
    format!("{label}: {}", entry.content)
}

/// Write the full history to `out`. Writes nothing for an empty log.
pub fn render_history(log: &ConversationLog, out: &mut impl Write) -> io::Result<()> {
    if log.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "── {HISTORY_HEADING} ──")?;
    for entry in log {
        writeln!(out, "{}", format_entry(entry))?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn empty_log_renders_nothing() {
        let mut out = Vec::new();
        render_history(&ConversationLog::new(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn entries_render_in_order_with_labels() {
        let mut log = ConversationLog::new();
        log.record_exchange("plan a trip", "Go to Lisbon.");

        let mut out = Vec::new();
        render_history(&log, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let heading = text.find(HISTORY_HEADING).unwrap();
        let user = text.find("🧠 You: plan a trip").unwrap();
        let reply = text.find("🤖 Auto-GPT: Go to Lisbon.").unwrap();
        assert!(heading < user && user < reply);
    }
}

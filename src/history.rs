//! Session-scoped conversation log.
//!
//! The log is owned by whoever runs the session and handed to the renderer
//! by reference. Entries can only be appended; dropping the log ends the
//! conversation.

use serde::{Deserialize, Serialize};

/// Who produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person submitting goals.
    User,
    /// The model's reply.
    Assistant,
}

/// A single turn in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only conversation history for one session.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    entries: Vec<HistoryEntry>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the submitted goal.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(HistoryEntry::user(content));
    }

    /// Append the reply shown for the most recent goal.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.entries.push(HistoryEntry::assistant(content));
    }

    /// Append one goal/reply pair.
    pub fn record_exchange(&mut self, goal: impl Into<String>, reply: impl Into<String>) {
        self.push_user(goal);
        self.push_assistant(reply);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of completed goal/reply pairs.
    pub fn exchange_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.role == Role::Assistant)
            .count()
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

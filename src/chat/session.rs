//! Conversation log and submission flow of the chat terminal

use super::persona::{BOOT_LINES, FAILURE_MESSAGE, PERSONA_PROMPT};
use super::{ChatCompleter, ChatMessage, CompletionRequest};
use crate::config::ChatConfig;
use crate::metrics::metrics;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Kind of a terminal log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    System,
    User,
    Assistant,
}

impl EntryKind {
    /// Prompt glyph shown before the line
    pub fn prefix(&self) -> char {
        match self {
            EntryKind::User => '>',
            EntryKind::Assistant => '#',
            EntryKind::System => '$',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub kind: EntryKind,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl LogEntry {
    fn new(kind: EntryKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            at: Utc::now(),
        }
    }

    pub fn render(&self) -> String {
        format!("{} {}", self.kind.prefix(), self.content)
    }

    /// Conversation message, for user and assistant lines only
    fn as_message(&self) -> Option<ChatMessage> {
        match self.kind {
            EntryKind::User => Some(ChatMessage::user(self.content.clone())),
            EntryKind::Assistant => Some(ChatMessage::assistant(self.content.clone())),
            EntryKind::System => None,
        }
    }
}

/// Completion parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 150,
        }
    }
}

impl From<&ChatConfig> for ChatSettings {
    fn from(config: &ChatConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Result of [`ChatSession::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, nothing sent
    Ignored,
    /// Assistant reply appended
    Replied,
    /// API answered without content; only the user line was appended
    NoReply,
    /// Completion failed; the failure line was appended
    Failed,
}

pub struct ChatSession {
    id: Uuid,
    completer: Arc<dyn ChatCompleter>,
    settings: ChatSettings,
    log: Vec<LogEntry>,
}

impl ChatSession {
    pub fn new(completer: Arc<dyn ChatCompleter>, settings: ChatSettings) -> Self {
        let log = BOOT_LINES
            .iter()
            .map(|line| LogEntry::new(EntryKind::System, *line))
            .collect();

        Self {
            id: Uuid::new_v4(),
            completer,
            settings,
            log,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Rendered terminal lines
    pub fn render(&self) -> Vec<String> {
        self.log.iter().map(LogEntry::render).collect()
    }

    /// Request for the current conversation: persona, then every user and
    /// assistant line in order
    pub fn build_request(&self) -> CompletionRequest {
        let mut messages = Vec::with_capacity(self.log.len() + 1);
        messages.push(ChatMessage::system(PERSONA_PROMPT));
        messages.extend(self.log.iter().filter_map(LogEntry::as_message));

        CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    /// Send one user message. Failures never propagate; they become a log line.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        if input.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }

        self.log.push(LogEntry::new(EntryKind::User, input));
        let request = self.build_request();

        let m = metrics();
        m.chat_requests.inc();
        debug!(session = %self.id, messages = request.messages.len(), "Submitting chat message");

        match self.completer.complete(&request).await {
            Ok(Some(reply)) if !reply.is_empty() => {
                self.log.push(LogEntry::new(EntryKind::Assistant, reply));
                SubmitOutcome::Replied
            }
            Ok(_) => SubmitOutcome::NoReply,
            Err(err) => {
                m.chat_failures.inc();
                warn!(session = %self.id, error = %err, "Chat completion failed");
                self.log.push(LogEntry::new(EntryKind::System, FAILURE_MESSAGE));
                SubmitOutcome::Failed
            }
        }
    }
}

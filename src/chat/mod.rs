//! Chat Terminal Module
//!
//! Proxies user messages to an OpenAI-compatible chat completion API under a
//! fixed persona, keeping the conversation log the terminal renders.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Submodules
pub mod openai;
pub mod persona;
pub mod session;

// Re-exports for convenience
pub use openai::OpenAiCompleter;
pub use persona::{BOOT_LINES, FAILURE_MESSAGE, PERSONA_PROMPT};
pub use session::{ChatSession, ChatSettings, EntryKind, LogEntry, SubmitOutcome};

/// Role of a message sent to the completion API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

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

/// Body of a chat completion call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Chat completion failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Network failure or request could not be sent
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("Completion API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// No API key configured
    #[error("Chat API key is not configured")]
    MissingApiKey,
}

/// Chat completion boundary
///
/// Returns the assistant text, or `None` when the API answered without content.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, ChatError>;
}

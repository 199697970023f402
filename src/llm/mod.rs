//! LLM provider clients: embedding generation and one-shot chat completion
//! against an OpenAI-compatible or Ollama API.

pub mod chat;
pub mod embeddings;

use serde::{Deserialize, Serialize};

/// A single chat turn sent to the completion API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

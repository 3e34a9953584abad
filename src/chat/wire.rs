//! JSON shapes exchanged with HTTP clients.

use serde::{Deserialize, Serialize};

/// Who sent a wire turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    /// Any other sender string; dropped on the way in, never produced.
    #[serde(other)]
    Unknown,
}

/// One message as the client sees it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub sender: Sender,
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub chat_history: Vec<ChatTurn>,
}

/// Reply to `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub response: String,
    pub chat_history: Vec<ChatTurn>,
}

//! The chat exchange: wire types, translation, and answer extraction.

pub mod translate;
pub mod wire;

use tracing::debug;

use crate::agent::ChatAgent;
use crate::error::SafinaError;
use crate::types::ConversationMessage;

pub use translate::{to_internal, to_wire};
pub use wire::{ChatRequest, ChatResponse, ChatTurn, Sender};

/// Reply used when the conversation holds no final assistant answer.
pub const THINKING_PLACEHOLDER: &str =
    "Thinking... (AI is processing tool output or waiting for more context.)";

/// Find the agent's answer to the latest human turn.
///
/// Scans backwards, skipping tool results and assistant turns that still
/// request tools, and stops at the first human message.
pub fn extract_answer(messages: &[ConversationMessage]) -> Option<&str> {
    for msg in messages.iter().rev() {
        match msg {
            ConversationMessage::Assistant {
                content,
                tool_calls,
            } if tool_calls.is_empty() => return Some(content),
            ConversationMessage::Human { .. } => return None,
            ConversationMessage::Assistant { .. } | ConversationMessage::ToolResult { .. } => {}
        }
    }
    None
}

/// Run one chat exchange against `agent`.
pub async fn respond(agent: &dyn ChatAgent, request: ChatRequest) -> Result<ChatResponse, SafinaError> {
    let messages = to_internal(&request.chat_history, &request.message);
    debug!(history = request.chat_history.len(), "Running chat agent");

    let final_messages = agent.run(messages).await?;

    let response = extract_answer(&final_messages)
        .unwrap_or(THINKING_PLACEHOLDER)
        .to_string();

    Ok(ChatResponse {
        response,
        chat_history: to_wire(&final_messages),
    })
}

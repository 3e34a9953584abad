//! Conversion between wire turns and internal conversation messages.

use tracing::warn;

use super::wire::{ChatTurn, Sender};
use crate::types::{ConversationMessage, ToolCall};

/// Build the conversation handed to the agent: the history in order, then the
/// new user message.
///
/// Turns with an unrecognized sender are dropped.
pub fn to_internal(turns: &[ChatTurn], new_message: &str) -> Vec<ConversationMessage> {
    let mut messages = Vec::with_capacity(turns.len() + 1);
    for (index, turn) in turns.iter().enumerate() {
        match turn.sender {
            Sender::User => messages.push(ConversationMessage::human(&turn.content)),
            Sender::Bot => messages.push(ConversationMessage::assistant_with_calls(
                &turn.content,
                turn.tool_calls.iter().map(record_to_call).collect(),
            )),
            Sender::Unknown => {
                warn!(index, "Dropping history turn with unrecognized sender");
            }
        }
    }
    messages.push(ConversationMessage::human(new_message));
    messages
}

/// Flatten a conversation into wire turns, one per message.
pub fn to_wire(messages: &[ConversationMessage]) -> Vec<ChatTurn> {
    messages
        .iter()
        .map(|msg| match msg {
            ConversationMessage::Human { content } => ChatTurn::user(content),
            ConversationMessage::Assistant {
                content,
                tool_calls,
            } => ChatTurn {
                tool_calls: tool_calls.iter().map(ToolCall::to_record).collect(),
                ..ChatTurn::bot(content)
            },
            ConversationMessage::ToolResult {
                tool_call_id,
                content,
            } => ChatTurn::bot(format!("*(Tool Output for {tool_call_id}): {content}*")),
        })
        .collect()
}

fn record_to_call(record: &serde_json::Map<String, serde_json::Value>) -> ToolCall {
    // Every ToolCall field has a default, so any object converts.
    serde_json::from_value(serde_json::Value::Object(record.clone())).unwrap_or_else(|_| {
        ToolCall::new(
            record.get("id").and_then(|v| v.as_str()).unwrap_or_default(),
            record.get("name").and_then(|v| v.as_str()).unwrap_or_default(),
            serde_json::Value::Object(Default::default()),
        )
    })
}

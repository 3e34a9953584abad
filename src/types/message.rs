//! Conversation messages exchanged with the agent runtime.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SafinaError};

/// One turn of the internal conversation.
///
/// This is the shape the agent runtime and model providers consume. The wire
/// representation clients see lives in [`crate::chat::wire`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ConversationMessage {
    Human {
        content: String,
    },
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    ToolResult {
        tool_call_id: String,
        content: String,
    },
}

impl ConversationMessage {
    /// Create a human message.
    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    /// Create an assistant message with no pending tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create an assistant message requesting tool calls.
    pub fn assistant_with_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls,
        }
    }

    /// Create a tool result message.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    /// Text content of the message.
    pub fn content(&self) -> &str {
        match self {
            Self::Human { content }
            | Self::Assistant { content, .. }
            | Self::ToolResult { content, .. } => content,
        }
    }

    /// Pending tool calls (empty for anything but an assistant message).
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            Self::Human { .. } | Self::ToolResult { .. } => &[],
        }
    }
}

/// A tool call requested by the model.
///
/// Every field defaults so that loosely shaped records from clients still
/// deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "empty_args")]
    pub args: serde_json::Value,
}

fn empty_args() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args,
        }
    }

    /// Plain mapping form used on the wire.
    pub fn to_record(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut record = serde_json::Map::new();
        record.insert("name".into(), self.name.clone().into());
        record.insert("args".into(), self.args.clone());
        record.insert("id".into(), self.id.clone().into());
        record.insert("type".into(), "tool_call".into());
        record
    }
}

/// Append-only conversation that enforces tool-result pairing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<ConversationMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing messages, checking the pairing invariant.
    pub fn from_messages(messages: Vec<ConversationMessage>) -> Result<Self> {
        let mut conversation = Self::new();
        for message in messages {
            conversation.push(message)?;
        }
        Ok(conversation)
    }

    /// Append a message.
    ///
    /// A tool result must answer a call made by an earlier assistant message.
    pub fn push(&mut self, message: ConversationMessage) -> Result<()> {
        if let ConversationMessage::ToolResult { tool_call_id, .. } = &message {
            if self.find_call(tool_call_id).is_none() {
                return Err(SafinaError::InvalidState(format!(
                    "tool result '{tool_call_id}' has no matching tool call"
                )));
            }
        }
        self.messages.push(message);
        Ok(())
    }

    /// Find the tool call with the given id, searching newest first.
    pub fn find_call(&self, tool_call_id: &str) -> Option<&ToolCall> {
        find_call(&self.messages, tool_call_id)
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ConversationMessage> {
        self.messages
    }
}

/// Find the tool call with the given id in `messages`, searching newest first.
pub fn find_call<'a>(messages: &'a [ConversationMessage], tool_call_id: &str) -> Option<&'a ToolCall> {
    messages
        .iter()
        .rev()
        .flat_map(|m| m.tool_calls().iter())
        .find(|tc| tc.id == tool_call_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_result_requires_prior_call() {
        let mut conversation = Conversation::new();
        conversation.push(ConversationMessage::human("hi")).unwrap();
        let err = conversation
            .push(ConversationMessage::tool_result("call_1", "output"))
            .unwrap_err();
        assert!(matches!(err, SafinaError::InvalidState(_)));
        assert_eq!(conversation.messages().len(), 1);
    }

    #[test]
    fn tool_result_after_matching_call_is_accepted() {
        let conversation = Conversation::from_messages(vec![
            ConversationMessage::human("hi"),
            ConversationMessage::assistant_with_calls(
                "",
                vec![ToolCall::new("call_1", "web_search", json!({"query": "rust"}))],
            ),
            ConversationMessage::tool_result("call_1", "results"),
        ])
        .unwrap();

        assert_eq!(conversation.messages().len(), 3);
        assert_eq!(conversation.find_call("call_1").unwrap().name, "web_search");
    }

    #[test]
    fn tool_call_tolerates_missing_fields() {
        let call: ToolCall = serde_json::from_value(json!({"name": "web_search"})).unwrap();
        assert_eq!(call.id, "");
        assert_eq!(call.args, json!({}));
    }

    #[test]
    fn tool_call_record_has_plain_mapping_shape() {
        let record = ToolCall::new("call_9", "web_search", json!({"query": "q"})).to_record();
        assert_eq!(
            serde_json::Value::Object(record),
            json!({"name": "web_search", "args": {"query": "q"}, "id": "call_9", "type": "tool_call"})
        );
    }

    #[test]
    fn accessors_cover_every_variant() {
        let call = ToolCall::new("c", "t", json!({}));
        let assistant = ConversationMessage::assistant_with_calls("thinking", vec![call]);
        assert_eq!(assistant.content(), "thinking");
        assert_eq!(assistant.tool_calls().len(), 1);
        assert!(ConversationMessage::human("x").tool_calls().is_empty());
        assert_eq!(ConversationMessage::tool_result("c", "out").content(), "out");
    }
}

//! Convenience re-exports for common use.

pub use crate::agent::{AgentRunner, ChatAgent};
pub use crate::chat::{ChatRequest, ChatResponse, ChatTurn, Sender};
pub use crate::config::AppConfig;
pub use crate::error::{Result, SafinaError};
pub use crate::provider::{GoogleProvider, ModelProvider};
pub use crate::tools::{SearchCapability, Tool, ToolRegistry};
pub use crate::types::{ConversationMessage, GenerationSettings, ToolCall};

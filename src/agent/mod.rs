//! Agent runtime.

pub mod runner;

use async_trait::async_trait;

use crate::error::SafinaError;
use crate::types::ConversationMessage;

pub use runner::{AgentRunner, DEFAULT_MAX_ITERATIONS};

/// Something that takes a conversation and returns it extended with the
/// agent's turns.
#[async_trait]
pub trait ChatAgent: Send + Sync {
    /// Run the agent over `messages`; the returned conversation starts with
    /// `messages` unchanged.
    async fn run(
        &self,
        messages: Vec<ConversationMessage>,
    ) -> Result<Vec<ConversationMessage>, SafinaError>;
}

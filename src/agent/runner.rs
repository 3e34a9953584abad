//! Bounded tool-calling loop over a model provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ChatAgent;
use crate::error::SafinaError;
use crate::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use crate::tools::ToolRegistry;
use crate::types::*;

/// Default cap on model calls per run.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

enum Step {
    Query,
    Dispatch(Vec<ToolCall>),
    Done,
}

/// Runs the agent loop: query the model, execute any tool calls it asks for,
/// feed the results back, and repeat until it answers without tool calls.
pub struct AgentRunner {
    provider: Arc<dyn ModelProvider>,
    tools: ToolRegistry,
    settings: GenerationSettings,
    max_iterations: usize,
}

impl AgentRunner {
    pub fn new(provider: Arc<dyn ModelProvider>, tools: ToolRegistry) -> Self {
        Self {
            provider,
            tools,
            settings: GenerationSettings::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Cap on model calls per run (at least one).
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    fn tool_definitions(&self) -> Option<Vec<ToolDefinition>> {
        if self.tools.is_empty() {
            None
        } else {
            Some(self.tools.definitions())
        }
    }
}

#[async_trait]
impl ChatAgent for AgentRunner {
    async fn run(
        &self,
        messages: Vec<ConversationMessage>,
    ) -> Result<Vec<ConversationMessage>, SafinaError> {
        let mut conversation = Conversation::from_messages(messages)?;
        let tool_defs = self.tool_definitions();
        let mut total_usage = Usage::default();
        let mut iterations = 0;
        let mut step = Step::Query;

        loop {
            step = match step {
                Step::Query if iterations >= self.max_iterations => {
                    warn!(
                        max_iterations = self.max_iterations,
                        "Agent loop hit iteration limit without a final answer"
                    );
                    Step::Done
                }
                Step::Query => {
                    iterations += 1;
                    let request = ProviderRequest {
                        messages: conversation.messages().to_vec(),
                        settings: self.settings.clone(),
                        tools: tool_defs.clone(),
                    };

                    debug!(
                        iteration = iterations,
                        provider = self.provider.provider_name(),
                        model = self.provider.model_id(),
                        "Agent loop: calling provider"
                    );
                    let response = self.provider.generate_text(&request).await?;
                    total_usage.merge(&response.usage);
                    if let Some(reason) = response.finish_reason.filter(|r| r.is_truncated()) {
                        warn!(finish_reason = %reason, "Model stopped before completing its turn");
                    }

                    let calls = response.tool_calls.clone();
                    conversation.push(ConversationMessage::assistant_with_calls(
                        response.text,
                        response.tool_calls,
                    ))?;

                    if calls.is_empty() {
                        Step::Done
                    } else {
                        Step::Dispatch(calls)
                    }
                }
                Step::Dispatch(calls) => {
                    for call in &calls {
                        debug!(tool = %call.name, id = %call.id, "Agent loop: executing tool");
                        let output = self.tools.dispatch(call).await;
                        conversation.push(ConversationMessage::tool_result(&call.id, output))?;
                    }
                    Step::Query
                }
                Step::Done => break,
            };
        }

        debug!(
            iterations,
            input_tokens = total_usage.input_tokens,
            output_tokens = total_usage.output_tokens,
            "Agent loop finished"
        );
        Ok(conversation.into_messages())
    }
}

impl std::fmt::Debug for AgentRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRunner")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_id())
            .field("tools", &self.tools)
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}

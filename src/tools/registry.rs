//! The set of tools exposed to the agent.

use std::sync::Arc;

use tracing::warn;

use crate::provider::format::tool_result_to_string;
use crate::provider::ToolDefinition;
use crate::tools::arguments::ToolArguments;
use crate::tools::search::{web_search_tool, SearchCapability};
use crate::tools::tool::Tool;
use crate::types::ToolCall;

/// Named tools available to the agent, in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Registry holding the `web_search` tool in the form chosen at startup.
    pub fn new(search: SearchCapability) -> Self {
        Self::empty().with_tool(web_search_tool(search))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a tool. Lookups return the first tool registered under a name.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions sent to the model provider.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters().schema.clone(),
            })
            .collect()
    }

    /// Execute a call and return its output text.
    ///
    /// Unknown tools and tool errors become output text so one bad call
    /// never aborts the agent loop.
    pub async fn dispatch(&self, call: &ToolCall) -> String {
        let Some(tool) = self.get(&call.name) else {
            warn!(tool = %call.name, "Tool not found");
            return format!("Error: tool '{}' not found", call.name);
        };

        let args = ToolArguments::new(call.args.clone());
        match tool.execute(&args).await {
            Ok(value) => tool_result_to_string(&value),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                format!("Error: {e}")
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

//! Tool system for function calling.

pub mod arguments;
pub mod registry;
pub mod search;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
pub use registry::ToolRegistry;
pub use search::{SearchCapability, TavilyClient};
pub use tool::{AgentTool, Tool};
pub use types::AgentToolParameters;

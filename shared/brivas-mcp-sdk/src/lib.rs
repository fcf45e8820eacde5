//! BRIVAS MCP SDK
//!
//! Model Context Protocol implementation for LLM integration.

pub mod protocol;
pub mod tool;
pub mod resource;
pub mod prompt;
pub mod transport;

pub use protocol::{McpRequest, McpResponse, McpNotification};
pub use tool::{Tool, ToolResult, ToolError};
pub use resource::{Resource, ResourceContent};
pub use prompt::{Prompt, PromptMessage, PromptArgument};

//! MCP (Model Context Protocol) server implementation
//!
//! Exposes Twitter search over stdio as a single `searchTwitter` tool.

mod server;
mod tools;
mod types;

pub use server::{McpServer, PROTOCOL_VERSION};
pub use tools::{get_tool_definitions, handle_search, handle_tool_call, parse_search_args};
pub use types::{McpError, McpRequest, McpResponse, ToolContent, ToolDefinition, ToolResult};

//! JSON-RPC 2.0 message types for the MCP stdio transport

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
}

impl McpError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::with_code(Self::PARSE_ERROR, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_code(Self::INVALID_REQUEST, msg)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::with_code(
            Self::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        )
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::with_code(Self::INVALID_PARAMS, msg)
    }
}

impl fmt::Display for McpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for McpError {}

// Transport and encoding failures are on our side of the pipe
impl From<std::io::Error> for McpError {
    fn from(e: std::io::Error) -> Self {
        Self::with_code(Self::INTERNAL_ERROR, e.to_string())
    }
}

impl From<serde_json::Error> for McpError {
    fn from(e: serde_json::Error) -> Self {
        Self::with_code(Self::INTERNAL_ERROR, e.to_string())
    }
}

/// A call that expects a response
#[derive(Debug, Clone)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    pub params: Option<Value>,
}

/// A call without an id; never answered
#[derive(Debug, Clone)]
pub struct McpNotification {
    pub method: String,
    pub params: Option<Value>,
}

/// An incoming line, classified by which members it carries
#[derive(Debug, Clone)]
pub enum McpMessage {
    Request(McpRequest),
    Notification(McpNotification),
    Response { id: Option<Value> },
}

/// Every member any message kind may carry. `id`, `result` and `error`
/// distinguish "present as null" from "absent".
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    jsonrpc: String,
    #[serde(default, deserialize_with = "present")]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    error: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl<'de> Deserialize<'de> for McpMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let envelope = Envelope::deserialize(deserializer)?;

        if envelope.result.is_some() || envelope.error.is_some() {
            return Ok(McpMessage::Response { id: envelope.id });
        }

        let method = envelope
            .method
            .ok_or_else(|| serde::de::Error::missing_field("method"))?;

        Ok(match envelope.id {
            Some(id) => McpMessage::Request(McpRequest {
                jsonrpc: envelope.jsonrpc,
                id,
                method,
                params: envelope.params,
            }),
            None => McpMessage::Notification(McpNotification {
                method,
                params: envelope.params,
            }),
        })
    }
}

/// Outgoing response; exactly one of `result` or `error`
#[derive(Debug, Clone, Serialize)]
pub struct McpResponse {
    jsonrpc: &'static str,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(McpError),
}

impl McpResponse {
    pub fn new(id: Value, outcome: Result<Value, McpError>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: match outcome {
                Ok(value) => Outcome::Result(value),
                Err(e) => Outcome::Error(e),
            },
        }
    }

    pub fn success(id: Value, result: Value) -> Self {
        Self::new(id, Ok(result))
    }

    pub fn error(id: Value, error: McpError) -> Self {
        Self::new(id, Err(error))
    }
}

/// `initialize` result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: &'static str,
    pub capabilities: Value,
    pub server_info: Implementation,
    pub instructions: &'static str,
}

/// Name and version of an MCP peer
#[derive(Debug, Serialize)]
pub struct Implementation {
    pub name: String,
    pub version: &'static str,
}

/// Tool definition as listed by `tools/list`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Tool call result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: None,
        }
    }

    /// The text of the first content item
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|content| match content {
            ToolContent::Text { text } => text.as_str(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

//! MCP stdio server implementation

use super::tools::{get_tool_definitions, handle_tool_call};
use super::types::{
    Implementation, InitializeResult, McpError, McpMessage, McpNotification, McpRequest,
    McpResponse, JSONRPC_VERSION,
};
use crate::search::SearchBackend;
use serde_json::{json, Map, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

const INSTRUCTIONS: &str = "Tools for searching Twitter. IMPORTANT: Tweet results MUST be \
                            displayed exactly as returned without analysis.";

/// MCP Server implementation
pub struct McpServer<B> {
    backend: B,
    name: String,
}

impl<B: SearchBackend> McpServer<B> {
    /// Create a new MCP server
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            name: env!("CARGO_PKG_NAME").to_string(),
        }
    }

    /// Run the MCP server loop over the process stdio
    pub async fn run(&self) -> Result<(), McpError> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        self.serve(stdin.lock(), &mut stdout).await
    }

    /// Serve line-delimited JSON-RPC messages until `input` is exhausted
    pub async fn serve<R, W>(&self, input: R, output: &mut W) -> Result<(), McpError>
    where
        R: BufRead,
        W: Write,
    {
        info!("MCP server starting on stdio");

        for line in input.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    error!("Failed to read line: {}", e);
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            let message: McpMessage = match serde_json::from_str(&line) {
                Ok(m) => m,
                Err(e) => {
                    error!("Failed to parse message: {}", e);
                    let response = McpResponse::error(
                        Value::Null,
                        McpError::parse_error(format!("Parse error: {}", e)),
                    );
                    write_message(output, &response)?;
                    continue;
                }
            };

            match message {
                McpMessage::Request(req) => {
                    let response = self.handle_request(req).await;
                    write_message(output, &response)?;
                }
                McpMessage::Notification(notif) => {
                    self.handle_notification(notif);
                }
                McpMessage::Response { id } => {
                    warn!("Unexpected response message received (id: {:?})", id);
                }
            }
        }

        info!("MCP server shutting down");
        Ok(())
    }

    /// Handle an MCP request
    async fn handle_request(&self, request: McpRequest) -> McpResponse {
        let id = request.id;

        if request.jsonrpc != JSONRPC_VERSION {
            let message = format!("Unsupported jsonrpc version: {:?}", request.jsonrpc);
            return McpResponse::error(id, McpError::invalid_request(message));
        }

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": get_tool_definitions() })),
            "tools/call" => self.handle_tools_call(request.params).await,
            "resources/list" => Ok(json!({ "resources": [] })),
            "prompts/list" => Ok(json!({ "prompts": [] })),
            _ => Err(McpError::method_not_found(&request.method)),
        };

        McpResponse::new(id, result)
    }

    /// Handle notifications (fire-and-forget)
    fn handle_notification(&self, notification: McpNotification) {
        match notification.method.as_str() {
            "notifications/initialized" => {
                info!("Client initialized");
            }
            "notifications/cancelled" => {
                info!("Request cancelled");
            }
            _ => {
                debug!("Unknown notification: {}", notification.method);
            }
        }
    }

    fn handle_initialize(&self) -> Result<Value, McpError> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION,
            capabilities: json!({ "tools": { "listChanged": false } }),
            server_info: Implementation {
                name: self.name.clone(),
                version: env!("CARGO_PKG_VERSION"),
            },
            instructions: INSTRUCTIONS,
        };
        Ok(serde_json::to_value(result)?)
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params = params.ok_or_else(|| McpError::invalid_params("Missing params"))?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return Err(McpError::invalid_params("Tool arguments must be an object")),
        };

        debug!("Calling tool: {} with args: {:?}", name, arguments);

        let result = handle_tool_call(name, arguments, &self.backend).await?;
        Ok(serde_json::to_value(result)?)
    }
}

fn write_message<W: Write>(output: &mut W, response: &McpResponse) -> Result<(), McpError> {
    let response_str = serde_json::to_string(response)?;
    debug!("Sending: {}", response_str);
    writeln!(output, "{}", response_str)?;
    output.flush()?;
    Ok(())
}

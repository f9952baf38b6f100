//! MCP tool definitions and handlers

use super::types::{McpError, ToolDefinition, ToolResult};
use crate::format::format_results;
use crate::models::{SearchRequest, Section, DEFAULT_LIMIT};
use crate::search::{paginate, SearchBackend};
use serde::Deserialize;
use serde_json::{json, Map, Number, Value};
use tracing::error;

pub const SEARCH_TWITTER: &str = "searchTwitter";

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition {
        name: SEARCH_TWITTER.to_string(),
        description: "Search Twitter for recent or top tweets matching a query. \
                      Results must be displayed exactly as returned."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Search query"
                },
                "section": {
                    "type": "string",
                    "enum": ["latest", "top"],
                    "default": "latest",
                    "description": "Rank by recency (latest) or relevance (top)"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "default": DEFAULT_LIMIT,
                    "description": "Maximum number of tweets to return (default: 20)"
                }
            },
            "required": ["query"]
        }),
    }]
}

#[derive(Debug, Deserialize)]
struct SearchTwitterArgs {
    query: String,
    #[serde(default)]
    section: Section,
    /// Any JSON number with an integral value, so `20.0` counts as `20`
    #[serde(default)]
    limit: Option<Number>,
}

fn limit_from_number(number: &Number) -> Result<usize, McpError> {
    let limit = match number.as_u64() {
        Some(n) => usize::try_from(n).ok(),
        None => number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= usize::MAX as f64)
            .map(|f| f as usize),
    };
    limit.ok_or_else(|| {
        McpError::invalid_params(format!("limit must be a positive integer, got {}", number))
    })
}

/// Validate `searchTwitter` arguments into a request
pub fn parse_search_args(arguments: Map<String, Value>) -> Result<SearchRequest, McpError> {
    let args: SearchTwitterArgs =
        serde_json::from_value(Value::Object(arguments)).map_err(|e| {
            McpError::invalid_params(format!("Invalid arguments for {}: {}", SEARCH_TWITTER, e))
        })?;

    let limit = match &args.limit {
        Some(number) => limit_from_number(number)?,
        None => DEFAULT_LIMIT,
    };

    SearchRequest::new(args.query, args.section, limit)
        .map_err(|e| McpError::invalid_params(e.to_string()))
}

/// Handle a tool call. Argument problems are protocol errors; search
/// failures are reported inside an ordinary text result.
pub async fn handle_tool_call<B>(
    name: &str,
    arguments: Map<String, Value>,
    backend: &B,
) -> Result<ToolResult, McpError>
where
    B: SearchBackend + ?Sized,
{
    match name {
        SEARCH_TWITTER => {
            let request = parse_search_args(arguments)?;
            Ok(handle_search(&request, backend).await)
        }
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

/// Run the search and render it
pub async fn handle_search<B>(request: &SearchRequest, backend: &B) -> ToolResult
where
    B: SearchBackend + ?Sized,
{
    match paginate(backend, request).await {
        Ok(tweets) => ToolResult::text(format_results(
            request.query(),
            request.section(),
            &tweets,
        )),
        Err(e) => {
            error!(error = %e, "Error searching Twitter");
            ToolResult::text(format!("Error searching Twitter: {}", e))
        }
    }
}

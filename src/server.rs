//! Tool-calling server over stdio.
//!
//! Exposes one [`ToolRegistry`] through the rmcp `ServerHandler`. Tool
//! failures come back as results flagged `is_error` carrying the inline
//! error object. stdout carries frames only, so logging goes to stderr.

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler};
use serde_json::Value;

use crate::tools::ToolRegistry;

/// Serves one tool registry to a connected client.
pub struct Server {
    name: String,
    registry: ToolRegistry,
}

impl Server {
    pub fn new(name: impl Into<String>, registry: ToolRegistry) -> Self {
        Self {
            name: name.into(),
            registry,
        }
    }

    /// Run a tool by name and wrap the outcome as a call result.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let arguments = arguments.map(Value::Object).unwrap_or(Value::Null);
        match self.registry.call(name, arguments).await {
            Ok(output) => CallToolResult::structured(output),
            Err(e) => {
                log::info!("Server: {} failed: {}", name, e);
                CallToolResult::structured_error(e.to_payload())
            }
        }
    }
}

impl ServerHandler for Server {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.registry.list()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        log::debug!("Server: tools/call {}", request.name);
        Ok(self.dispatch(&request.name, request.arguments).await)
    }
}

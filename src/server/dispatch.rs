//! Tool call dispatch
//!
//! [`ToolDispatcher`] checks call arguments against the compiled shape of
//! the target tool and forwards only accepted calls to the hub. The hub
//! connection itself sits behind the [`HubTransport`] trait.

use crate::config::ProxyMode;
use crate::error::{ProxyError, Result};
use crate::server::models::ServerDescriptor;
use crate::server::schema_validation::ToolSchemaRegistry;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Connection to the MCP Hub
#[async_trait]
pub trait HubTransport: Send + Sync {
    /// Fetch the `structuredContent` describing a server's tools
    async fn list_tools(&self, server: &str) -> Result<Value>;

    /// Invoke `tool` on `server` with already validated arguments
    async fn call_tool(&self, server: &str, tool: &str, arguments: Value) -> Result<Value>;
}

/// Validates tool calls before they reach the hub
pub struct ToolDispatcher<T: HubTransport> {
    transport: T,
    mode: ProxyMode,
    registry: RwLock<ToolSchemaRegistry>,
}

impl<T: HubTransport> ToolDispatcher<T> {
    pub fn new(transport: T, mode: ProxyMode) -> Self {
        Self::with_registry(transport, mode, ToolSchemaRegistry::new())
    }

    pub fn with_registry(transport: T, mode: ProxyMode, registry: ToolSchemaRegistry) -> Self {
        Self {
            transport,
            mode,
            registry: RwLock::new(registry),
        }
    }

    pub fn mode(&self) -> &ProxyMode {
        &self.mode
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Register a server's tools, namespaced in gateway mode
    pub async fn register_server(&self, descriptor: &ServerDescriptor) {
        let mut registry = self.registry.write().await;
        if self.mode.is_gateway() {
            registry.register_server_namespaced(descriptor);
        } else {
            registry.register_server(descriptor);
        }
    }

    /// Fetch a server's tools from the hub and register them
    ///
    /// Returns the number of tools registered.
    pub async fn load_server(&self, server: &str) -> Result<usize> {
        if let Some(expected) = self.mode.server() {
            if expected != server {
                return Err(ProxyError::invalid_input(format!(
                    "Proxy is bound to server '{expected}', cannot load '{server}'"
                )));
            }
        }

        let content = self.transport.list_tools(server).await?;
        let descriptor = ServerDescriptor::from_structured_content(content)?;
        if descriptor.server != server {
            warn!(
                "Hub answered for server '{}' when asked for '{}'",
                descriptor.server, server
            );
        }

        self.register_server(&descriptor).await;
        Ok(descriptor.tools.len())
    }

    /// Exposed names of every registered tool
    pub async fn tool_names(&self) -> Vec<String> {
        let registry = self.registry.read().await;
        registry.tool_names().map(str::to_string).collect()
    }

    /// Forget a tool and its compiled shape
    pub async fn deregister_tool(&self, name: &str) -> bool {
        self.registry.write().await.deregister_tool(name).is_some()
    }

    /// Validate arguments and forward the call
    ///
    /// On a validation failure the hub is never contacted.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value> {
        let (server, tool, parsed) = {
            let registry = self.registry.read().await;
            let parsed = registry.validate_tool_arguments(name, &arguments)?;
            let registered = registry
                .get(name)
                .ok_or_else(|| ProxyError::tool_not_found(name))?;
            (registered.server.clone(), registered.tool.clone(), parsed)
        };

        debug!("Forwarding '{}' to {}/{}", name, server, tool);
        let result = self.transport.call_tool(&server, &tool, parsed).await;
        match &result {
            Ok(_) => info!("Tool call '{}' completed", name),
            Err(e) => warn!("Tool call '{}' failed: {}", name, e),
        }
        result
    }
}

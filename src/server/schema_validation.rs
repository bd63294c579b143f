//! Per-tool argument validation
//!
//! Holds one compiled [`Shape`] per registered tool so that each tool's
//! schema is compiled once at registration and reused for every call.

use crate::error::{ProxyError, Result};
use crate::server::models::{ServerDescriptor, ToolDescriptor};
use crate::validation::{
    infer_shape_with, FieldPath, IssueKind, SchemaCompiler, Shape, ValidationFailure,
    ValidationIssue,
};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Separator between server and tool names in gateway mode
pub const NAMESPACE_SEPARATOR: &str = "__";

/// Build the gateway-mode name of a tool
pub fn namespaced(server: &str, tool: &str) -> String {
    format!("{server}{NAMESPACE_SEPARATOR}{tool}")
}

/// Split a gateway-mode name into `(server, tool)`
///
/// Splits at the first separator, so tool names may themselves contain it.
pub fn split_namespaced(name: &str) -> Option<(&str, &str)> {
    name.split_once(NAMESPACE_SEPARATOR)
        .filter(|(server, tool)| !server.is_empty() && !tool.is_empty())
}

/// A tool as kept by the registry
#[derive(Debug, Clone)]
pub struct RegisteredTool {
    /// Server that owns the tool
    pub server: String,
    /// Name on the owning server
    pub tool: String,
    pub description: String,
    pub shape: Shape,
    /// JSON-Schema form of the inputs, for tool listings
    pub input_schema: Value,
}

/// Compiled argument shapes keyed by exposed tool name
#[derive(Debug, Default)]
pub struct ToolSchemaRegistry {
    compiler: SchemaCompiler,
    tools: IndexMap<String, RegisteredTool>,
}

impl ToolSchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose shapes are compiled by `compiler`
    pub fn with_compiler(compiler: SchemaCompiler) -> Self {
        Self {
            compiler,
            tools: IndexMap::new(),
        }
    }

    /// Register one tool under `exposed_name`, replacing any previous entry
    pub fn register_tool<S: Into<String>>(
        &mut self,
        exposed_name: S,
        server: &str,
        tool: &ToolDescriptor,
    ) {
        let exposed_name = exposed_name.into();
        let shape = infer_shape_with(
            &self.compiler,
            &tool.input_schema,
            tool.required_inputs.as_slice(),
        );
        debug!(
            "Registered tool '{}' with {} parameters ({} required)",
            exposed_name,
            shape.len(),
            shape.required_names().count()
        );

        let previous = self.tools.insert(
            exposed_name.clone(),
            RegisteredTool {
                server: server.to_string(),
                tool: tool.name.clone(),
                description: tool.description.clone(),
                shape,
                input_schema: tool.input_schema_json(),
            },
        );
        if previous.is_some() {
            warn!("Tool '{}' was already registered, replaced", exposed_name);
        }
    }

    /// Register every tool of a server under its own name
    pub fn register_server(&mut self, descriptor: &ServerDescriptor) {
        for tool in &descriptor.tools {
            self.register_tool(tool.name.clone(), &descriptor.server, tool);
        }
        info!(
            "Registered {} tools from server '{}'",
            descriptor.tools.len(),
            descriptor.server
        );
    }

    /// Register every tool of a server as `{server}__{tool}`
    pub fn register_server_namespaced(&mut self, descriptor: &ServerDescriptor) {
        for tool in &descriptor.tools {
            let name = namespaced(&descriptor.server, &tool.name);
            self.register_tool(name, &descriptor.server, tool);
        }
        info!(
            "Registered {} namespaced tools from server '{}'",
            descriptor.tools.len(),
            descriptor.server
        );
    }

    /// Drop a tool and its compiled shape
    pub fn deregister_tool(&mut self, name: &str) -> Option<RegisteredTool> {
        let removed = self.tools.shift_remove(name);
        if removed.is_some() {
            debug!("Deregistered tool '{}'", name);
        }
        removed
    }

    /// Drop every tool owned by `server`, returning how many were removed
    pub fn deregister_server(&mut self, server: &str) -> usize {
        let before = self.tools.len();
        self.tools.retain(|_, tool| tool.server != server);
        before - self.tools.len()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate call arguments for a registered tool
    ///
    /// Returns the parsed arguments to forward.
    pub fn validate_tool_arguments(&self, name: &str, arguments: &Value) -> Result<Value> {
        debug!("Validating arguments for tool: {}", name);

        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ProxyError::tool_not_found(name))?;

        if !arguments.is_object() {
            return Err(ValidationFailure::single(ValidationIssue::new(
                FieldPath::root(),
                IssueKind::InvalidType {
                    expected: "object".to_string(),
                    received: crate::validation::type_name(arguments).to_string(),
                },
            ))
            .into());
        }

        tool.shape.validate(arguments).map_err(|failure| {
            debug!("Tool '{}' arguments rejected: {}", name, failure);
            ProxyError::from(failure)
        })
    }
}

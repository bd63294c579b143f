//! Descriptor models returned by the MCP Hub
//!
//! The hub answers tool, resource and discovery requests with a
//! `structuredContent` payload. These types parse that payload strictly:
//! anything that does not match is reported as a malformed descriptor.

use crate::error::{ProxyError, Result};
use crate::validation::{infer_shape, SchemaNode, Shape};
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error text used for every hub reply that does not parse
pub const MALFORMED_HUB_RESPONSE: &str = "Invalid response format from MCP-HUB";

/// Parse a hub `structuredContent` payload into `T`
pub fn from_structured_content<T: DeserializeOwned>(content: Value) -> Result<T> {
    serde_json::from_value(content).map_err(|e| {
        tracing::debug!("Rejected hub payload: {}", e);
        ProxyError::malformed_descriptor(MALFORMED_HUB_RESPONSE)
    })
}

/// A tool exposed by a hub server
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// Parameter name to schema node
    #[schemars(with = "std::collections::BTreeMap<String, serde_json::Value>")]
    pub input_schema: IndexMap<String, SchemaNode>,
    pub required_inputs: Vec<String>,
}

impl ToolDescriptor {
    /// Compile this tool's parameters
    pub fn shape(&self) -> Shape {
        infer_shape(&self.input_schema, self.required_inputs.as_slice())
    }

    /// Input schema rendered as a JSON-Schema object, as MCP clients expect
    pub fn input_schema_json(&self) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .input_schema
            .iter()
            .map(|(name, node)| (name.clone(), node.to_value()))
            .collect();
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": self.required_inputs,
        })
    }
}

/// One hub server and its tools
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ServerDescriptor {
    pub id: String,
    pub server: String,
    pub tools: Vec<ToolDescriptor>,
}

impl ServerDescriptor {
    pub fn from_structured_content(content: Value) -> Result<Self> {
        from_structured_content(content)
    }

    pub fn tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.name == name)
    }
}

/// Resource listed by a hub server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub uri: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResourcesDescriptor {
    pub id: String,
    pub server: String,
    pub resources: Vec<Resource>,
}

impl ResourcesDescriptor {
    pub fn from_structured_content(content: Value) -> Result<Self> {
        from_structured_content(content)
    }
}

/// Body of a read resource; carries `text`, `blob` (base64) or both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
}

impl ResourceContent {
    /// Parse and require at least one of `text` and `blob`
    pub fn from_structured_content(content: Value) -> Result<Self> {
        let parsed: Self = from_structured_content(content)?;
        if parsed.text.is_none() && parsed.blob.is_none() {
            return Err(ProxyError::malformed_descriptor(MALFORMED_HUB_RESPONSE));
        }
        Ok(parsed)
    }
}

/// Latency percentiles in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LatencyStats {
    pub avg: f64,
    pub p90: f64,
    pub p99: f64,
    pub p999: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallStats {
    pub calls: u64,
    pub latency_usec: LatencyStats,
    pub coverage: f64,
    pub errors: u64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolStats {
    pub tool_name: String,
    pub stats: ToolCallStats,
    pub timestamp: String,
}

impl ToolStats {
    /// `timestamp` as RFC 3339, when it parses
    pub fn recorded_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).ok()
    }

    pub fn error_rate(&self) -> f64 {
        if self.stats.calls == 0 {
            0.0
        } else {
            self.stats.errors as f64 / self.stats.calls as f64
        }
    }
}

/// A server as returned by hub discovery
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerDiscovery {
    pub id: String,
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub price_per_call: f64,
    pub tool_count: u64,
    pub tool_stats: Vec<ToolStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryDescriptor {
    pub servers: Vec<ServerDiscovery>,
    pub total_count: u64,
}

impl DiscoveryDescriptor {
    pub fn from_structured_content(content: Value) -> Result<Self> {
        from_structured_content(content)
    }
}

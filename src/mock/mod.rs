//! Mock implementations for testing
//!
//! [`MockHubTransport`] serves canned tool listings and records every
//! forwarded call instead of talking to a hub.

use crate::error::{ProxyError, Result};
use crate::server::dispatch::HubTransport;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// A call that reached the transport
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub server: String,
    pub tool: String,
    pub arguments: Value,
}

/// Mock hub transport for testing
#[derive(Debug, Default)]
pub struct MockHubTransport {
    servers: HashMap<String, Value>,
    failure: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockHubTransport {
    /// Create new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `listing` as the tool listing of `server`
    pub fn with_server<S: Into<String>>(mut self, server: S, listing: Value) -> Self {
        self.servers.insert(server.into(), listing);
        self
    }

    /// Make every call fail with a hub error
    pub fn failing<S: Into<String>>(mut self, message: S) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Calls received so far
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl HubTransport for MockHubTransport {
    async fn list_tools(&self, server: &str) -> Result<Value> {
        self.servers
            .get(server)
            .cloned()
            .ok_or_else(|| ProxyError::hub(format!("Unknown server '{server}'")))
    }

    async fn call_tool(&self, server: &str, tool: &str, arguments: Value) -> Result<Value> {
        self.calls.lock().await.push(RecordedCall {
            server: server.to_string(),
            tool: tool.to_string(),
            arguments: arguments.clone(),
        });

        if let Some(message) = &self.failure {
            return Err(ProxyError::hub(message.clone()));
        }

        Ok(json!({
            "content": [{"type": "text", "text": format!("{server}/{tool}")}],
            "structuredContent": arguments,
        }))
    }
}

//! MCP Hive proxy core
//!
//! This crate compiles the JSON-Schema-like input descriptors that MCP Hub
//! tool providers publish into reusable validators, and checks tool call
//! arguments against them before a call is forwarded to the hub.
//!
//! # Features
//!
//! - Schema compiler covering primitives, objects, records, arrays, tuples,
//!   unions, intersections, literals, nullability and string formats
//! - Shape inference over a tool's parameter map and required list
//! - Structured validation failures with field paths
//! - Hub descriptor models and a tool registry with gateway namespacing
//! - A dispatch guard that never forwards rejected arguments

// Core modules
pub mod config;
pub mod error;
pub mod server;
pub mod validation;

// Test support modules - available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

// Re-export main types for convenience
pub use config::{ProxyArgs, ProxyConfig, ProxyMode};
pub use error::{ErrorCode, ProxyError, Result};
pub use server::{HubTransport, ToolDispatcher, ToolSchemaRegistry};
pub use validation::{
    compile_schema, infer_shape, SchemaCompiler, SchemaNode, Shape, ValidationFailure, Validator,
};

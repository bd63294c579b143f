//! Server-side components of the proxy
//!
//! Hub descriptor models, the per-tool schema registry and the dispatch
//! guard that validates arguments before a call leaves the proxy.

pub mod dispatch;
pub mod models;
pub mod schema_validation;

pub use dispatch::{HubTransport, ToolDispatcher};
pub use models::*;
pub use schema_validation::{namespaced, split_namespaced, RegisteredTool, ToolSchemaRegistry};

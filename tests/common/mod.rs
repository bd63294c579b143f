//! Common test utilities
//!
//! Shared rstest fixtures for hub descriptors and a shorthand for
//! compiling raw schema JSON.

#![allow(dead_code)]

use mcp_hive_proxy::server::ServerDescriptor;
use mcp_hive_proxy::validation::{SchemaCompiler, Validator};
use rstest::*;
use serde_json::{json, Value};

/// Compile a raw schema node with the default compiler
pub fn compile(raw: Value) -> Validator {
    SchemaCompiler::new().scan_value(&raw)
}

/// Listing of a weather server with one tool and mixed parameter kinds
#[fixture]
pub fn weather_listing() -> Value {
    json!({
        "id": "srv-weather",
        "server": "weather",
        "tools": [
            {
                "name": "forecast",
                "description": "Daily forecast for a city",
                "input_schema": {
                    "city": {"type": "string", "description": "City name", "minLength": 1},
                    "days": {"type": "integer", "minimum": 1, "maximum": 14},
                    "units": {"type": "string", "enum": ["metric", "imperial"], "nullable": true}
                },
                "required_inputs": ["city"]
            },
            {
                "name": "alerts",
                "description": "Active weather alerts",
                "input_schema": {
                    "region": {"type": "string", "pattern": "[A-Z]{2}"}
                },
                "required_inputs": ["region"]
            }
        ]
    })
}

#[fixture]
pub fn weather_server(weather_listing: Value) -> ServerDescriptor {
    ServerDescriptor::from_structured_content(weather_listing).expect("valid weather listing")
}

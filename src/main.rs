//! MCP Hive proxy - command line entry point
//!
//! Offline tooling around the schema compiler: inspect the compiled shape
//! of every tool in a hub server descriptor, or dry-run argument
//! validation for a tool call exactly as the proxy would before
//! forwarding it.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use mcp_hive_proxy::{
    server::{ServerDescriptor, ToolDispatcher},
    validation::{Validator, ValidatorKind},
    HubTransport, ProxyArgs, ProxyConfig, ProxyError, Result,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// MCP Hive proxy tooling
#[derive(Parser, Debug)]
#[command(name = "mcp-hive-proxy")]
#[command(about = "Tool schema compiler and argument validator for the MCP Hive proxy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    proxy: ProxyArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate tool call arguments against a server descriptor
    Check {
        /// Server descriptor (hub `structuredContent`) as JSON
        descriptor: PathBuf,

        /// Exposed tool name (`server__tool` in gateway mode)
        tool: String,

        /// Arguments as inline JSON
        #[arg(long, conflicts_with = "args_file", default_value = "{}")]
        args: String,

        /// Read arguments from a JSON file instead
        #[arg(long)]
        args_file: Option<PathBuf>,
    },
    /// Print the compiled parameters of every tool in a server descriptor
    Inspect {
        /// Server descriptor (hub `structuredContent`) as JSON
        descriptor: PathBuf,
    },
    /// Print the JSON Schema of the server descriptor format
    Schema,
}

impl Cli {
    /// Initialize logging based on verbose flag
    fn initialize_logging(&self) {
        let filter = if self.proxy.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

/// Serves one descriptor from disk and echoes accepted arguments back
struct DryRunTransport {
    listing: Value,
}

#[async_trait]
impl HubTransport for DryRunTransport {
    async fn list_tools(&self, _server: &str) -> Result<Value> {
        Ok(self.listing.clone())
    }

    async fn call_tool(&self, server: &str, tool: &str, arguments: Value) -> Result<Value> {
        debug!("Dry run, not forwarding {}/{}", server, tool);
        Ok(arguments)
    }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

async fn check(
    config: &ProxyConfig,
    descriptor: &Path,
    tool: &str,
    arguments: Value,
) -> anyhow::Result<()> {
    let listing = read_json(descriptor)?;
    let server = listing
        .get("server")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProxyError::malformed_descriptor("descriptor has no server name"))?;

    let dispatcher = ToolDispatcher::new(DryRunTransport { listing }, config.mode.clone());
    let count = dispatcher.load_server(&server).await?;
    info!("Loaded {} tools from '{}'", count, server);

    match dispatcher.call(tool, arguments).await {
        Ok(parsed) => {
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(())
        }
        Err(ProxyError::Validation(failure)) => {
            let report = json!({ "tool": tool, "issues": failure.issues() });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Err(anyhow!("arguments rejected: {failure}"))
        }
        Err(e) => Err(e.into()),
    }
}

fn describe(validator: &Validator) -> Value {
    let mut summary = json!({
        "kind": validator.kind_name(),
        "nullable": validator.is_nullable(),
        "description": validator.description(),
    });

    let inner = match validator.kind() {
        ValidatorKind::Nullable(inner) => inner.kind(),
        kind => kind,
    };
    match inner {
        ValidatorKind::Nullable(_) => {}
        ValidatorKind::Object(shape) => {
            let fields: serde_json::Map<String, Value> = shape
                .fields
                .iter()
                .map(|(name, field)| {
                    let mut entry = describe(&field.validator);
                    entry["optional"] = Value::Bool(field.optional);
                    (name.clone(), entry)
                })
                .collect();
            summary["fields"] = Value::Object(fields);
        }
        ValidatorKind::Array(rules) => {
            if let Some(items) = &rules.items {
                summary["items"] = describe(items);
            }
        }
        ValidatorKind::Tuple(slots)
        | ValidatorKind::Union(slots)
        | ValidatorKind::Intersection(slots) => {
            summary["branches"] = slots.iter().map(describe).collect();
        }
        ValidatorKind::Record(values) => summary["values"] = describe(values),
        ValidatorKind::Literal(value) => summary["value"] = value.clone(),
        _ => {}
    }
    summary
}

fn inspect(descriptor: &Path) -> anyhow::Result<()> {
    let descriptor = ServerDescriptor::from_structured_content(read_json(descriptor)?)?;

    let tools: Vec<Value> = descriptor
        .tools
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "arguments": describe(&tool.shape().into_validator()),
            })
        })
        .collect();

    let report = json!({ "server": descriptor.server, "tools": tools });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_arguments(args: &str, args_file: Option<&Path>) -> anyhow::Result<Value> {
    match args_file {
        Some(path) => read_json(path),
        None => serde_json::from_str(args).context("Invalid JSON in --args"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.initialize_logging();

    let config = ProxyConfig::from_args(&cli.proxy)?;
    debug!("Resolved configuration: {:?}", config);

    match &cli.command {
        Command::Check {
            descriptor,
            tool,
            args,
            args_file,
        } => {
            let arguments = read_arguments(args, args_file.as_deref())?;
            check(&config, descriptor, tool, arguments).await
        }
        Command::Inspect { descriptor } => inspect(descriptor),
        Command::Schema => {
            let schema = schemars::schema_for!(ServerDescriptor);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

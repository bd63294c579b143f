//! Proxy configuration
//!
//! Command line flags are parsed by [`ProxyArgs`] and resolved into a
//! [`ProxyConfig`]. Without `--server` the proxy runs in gateway mode and
//! exposes the tools of every hub server under namespaced names.

use crate::error::{ProxyError, Result};
use clap::Args;
use std::fmt;

/// Environment variable holding hub credentials
pub const CREDENTIALS_ENV: &str = "MCP_HIVE_CREDENTIALS";

/// Proxy connection flags
#[derive(Args, Debug, Clone, Default)]
pub struct ProxyArgs {
    /// Name of the MCP server to proxy to (omit for gateway mode)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Expose all servers with namespaced tools
    #[arg(long, global = true)]
    pub gateway: bool,

    /// Connect to a local MCP server
    #[arg(long, global = true)]
    pub local: bool,

    /// Hub credentials
    #[arg(long, global = true, env = CREDENTIALS_ENV, default_value = "", hide_env_values = true)]
    pub credentials: String,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Which hub tools the proxy exposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyMode {
    /// Every server, tools named `{server}__{tool}`
    Gateway,
    /// One server, tools under their own names
    Single(String),
}

impl ProxyMode {
    pub fn is_gateway(&self) -> bool {
        matches!(self, ProxyMode::Gateway)
    }

    pub fn server(&self) -> Option<&str> {
        match self {
            ProxyMode::Gateway => None,
            ProxyMode::Single(server) => Some(server),
        }
    }
}

/// Resolved proxy configuration
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub mode: ProxyMode,
    pub local: bool,
    pub credentials: String,
    pub verbose: bool,
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let credentials = if self.credentials.is_empty() {
            "<none>"
        } else {
            "<redacted>"
        };
        f.debug_struct("ProxyConfig")
            .field("mode", &self.mode)
            .field("local", &self.local)
            .field("credentials", &credentials)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl ProxyConfig {
    /// Resolve and validate parsed flags
    pub fn from_args(args: &ProxyArgs) -> Result<Self> {
        if let Some(server) = &args.server {
            if server.trim().is_empty() {
                return Err(ProxyError::config("--server must not be empty"));
            }
        }

        // --gateway wins over --server
        let mode = match &args.server {
            Some(server) if !args.gateway => ProxyMode::Single(server.clone()),
            _ => ProxyMode::Gateway,
        };

        Ok(Self {
            mode,
            local: args.local,
            credentials: args.credentials.clone(),
            verbose: args.verbose,
        })
    }

    pub fn has_credentials(&self) -> bool {
        !self.credentials.is_empty()
    }
}

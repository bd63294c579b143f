//! Error types for the MCP Hive proxy core
//!
//! Structured error handling with machine-readable error codes. Argument
//! validation failures keep their full issue list so callers can report
//! the offending field path and the violated constraint.

use crate::validation::ValidationFailure;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for proxy operations
pub type Result<T> = std::result::Result<T, ProxyError>;

/// Error types for proxy operations
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Tool arguments were rejected by the compiled schema
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tool is not registered
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Hub reply did not match the expected descriptor shape
    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the hub transport
    #[error("Hub request failed: {0}")]
    Hub(String),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structured error code for machine-readable error handling
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Configuration errors (1200-1299)
    ConfigurationInvalid,

    // Data errors (1400-1499)
    ParsingFailed,
    InvalidInput,
    ValidationFailed,

    // Service errors (1600-1699)
    ExternalServiceError,

    // Protocol errors (1700-1799)
    UnsupportedOperation,
    MessageMalformed,

    // Internal errors (1900-1999)
    InternalError,
}

impl ErrorCode {
    /// Get numeric error code
    pub fn as_number(&self) -> u32 {
        match self {
            ErrorCode::ConfigurationInvalid => 1202,
            ErrorCode::ParsingFailed => 1401,
            ErrorCode::InvalidInput => 1402,
            ErrorCode::ValidationFailed => 1403,
            ErrorCode::ExternalServiceError => 1603,
            ErrorCode::UnsupportedOperation => 1702,
            ErrorCode::MessageMalformed => 1703,
            ErrorCode::InternalError => 1901,
        }
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        match self.as_number() {
            1200..=1299 => "configuration",
            1400..=1499 => "data",
            1600..=1699 => "service",
            1700..=1799 => "protocol",
            1900..=1999 => "internal",
            _ => "unknown",
        }
    }
}

impl ProxyError {
    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a tool-not-found error
    pub fn tool_not_found<S: Into<String>>(name: S) -> Self {
        Self::ToolNotFound(name.into())
    }

    /// Create a malformed descriptor error
    pub fn malformed_descriptor<S: Into<String>>(msg: S) -> Self {
        Self::MalformedDescriptor(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a hub transport error
    pub fn hub<S: Into<String>>(msg: S) -> Self {
        Self::Hub(msg.into())
    }

    /// Map ProxyError to structured error code
    pub fn to_error_code(&self) -> ErrorCode {
        match self {
            ProxyError::Validation(_) => ErrorCode::ValidationFailed,
            ProxyError::InvalidInput(_) => ErrorCode::InvalidInput,
            ProxyError::ToolNotFound(_) => ErrorCode::UnsupportedOperation,
            ProxyError::MalformedDescriptor(_) => ErrorCode::MessageMalformed,
            ProxyError::Config(_) => ErrorCode::ConfigurationInvalid,
            ProxyError::Hub(_) => ErrorCode::ExternalServiceError,
            ProxyError::Json(_) => ErrorCode::ParsingFailed,
            ProxyError::Io(_) => ErrorCode::InternalError,
        }
    }

    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProxyError::Hub(_) | ProxyError::Io(_))
    }

    /// Validation issues, when this error came from argument checking
    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            ProxyError::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}

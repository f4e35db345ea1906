//! Error types for QuantumHierarchy
//!
//! This module defines the error types used by the logger hierarchy.
//! Appender failures raised during dispatch are recovered locally and never
//! reach these types; everything here is returned to the caller.

use crate::appender::AppenderError;
use thiserror::Error;

/// Main error type for hierarchy operations
#[derive(Error, Debug)]
pub enum HierarchyError {
    /// Logger name with invalid syntax (empty segment, leading or trailing delimiter)
    #[error("Invalid logger name: {0:?}")]
    InvalidLoggerName(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// 根 logger 的级别不能是 UNSET
    #[error("Root logger level cannot be UNSET")]
    InvalidRootLevel,

    /// Structural invariant violated while building a node
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigFileMissing(String),

    /// I/O errors (reading configuration files)
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlError {
        #[from]
        source: toml::de::Error,
    },

    /// Appender errors surfaced outside of dispatch (close on shutdown, ...)
    #[error("Appender error: {source}")]
    AppenderError {
        #[from]
        source: AppenderError,
    },
}

/// Result type alias for hierarchy operations
pub type Result<T> = std::result::Result<T, HierarchyError>;

impl HierarchyError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new invalid-name error
    pub fn invalid_name<S: Into<String>>(name: S) -> Self {
        Self::InvalidLoggerName(name.into())
    }

    /// Create a new invariant violation
    pub fn invariant<S: Into<String>>(msg: S) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Check if this error is recoverable
    ///
    /// Usage and configuration errors are fixed by the caller; an invariant
    /// violation means the hierarchy itself is broken.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::IoError { .. } | Self::AppenderError { .. })
    }

    /// Get the error category for logging purposes
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidLoggerName(_) | Self::InvalidLogLevel(_) | Self::InvalidRootLevel => {
                "usage"
            }
            Self::InvariantViolation(_) => "invariant",
            Self::ConfigError(_) | Self::ConfigFileMissing(_) => "config",
            Self::IoError { .. } => "io",
            Self::TomlError { .. } => "toml",
            Self::AppenderError { .. } => "appender",
        }
    }
}

//! Error types for portcheck.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-port connection
//! failures are modelled separately as [`ProbeFailure`] values: they are
//! reportable outcomes, not errors.

use crate::types::PortError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent a scan from starting or completing.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("no ports specified")]
    NoPorts,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("invalid port: {0}")]
    InvalidPort(#[from] PortError),

    #[error("scan incomplete: expected {expected} outcomes, received {received}")]
    Incomplete { expected: usize, received: usize },
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Why a single probe did not produce a connection.
///
/// Kept for diagnostics only. Every variant maps to a `closed` port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProbeFailure {
    /// No connection within the configured timeout.
    Timeout,
    /// The peer answered with a reset.
    Refused,
    /// Host or network unreachable.
    Unreachable(String),
    /// The host name could not be resolved.
    Resolution(String),
    /// The host/port pair is not a dialable address (e.g. a non-numeric port).
    InvalidAddress(String),
    /// Anything else reported by the OS.
    Other(String),
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out"),
            Self::Refused => write!(f, "connection refused"),
            Self::Unreachable(reason) => write!(f, "unreachable: {}", reason),
            Self::Resolution(reason) => write!(f, "name resolution failed: {}", reason),
            Self::InvalidAddress(reason) => write!(f, "invalid address: {}", reason),
            Self::Other(reason) => write!(f, "{}", reason),
        }
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid configuration format: {0}")]
    InvalidFormat(String),

    #[error("invalid timeout '{value}': {reason}")]
    InvalidTimeout { value: String, reason: String },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for the command layer.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for command execution.
pub type CliResult<T> = Result<T, CliError>;

//! Prober trait abstraction and probe outcome types.
//!
//! The dispatcher only talks to a [`Prober`], so the TCP implementation can
//! be swapped for a test double without touching the fan-out logic.

use crate::error::ProbeFailure;
use crate::types::PortLabel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Reported state of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// A TCP connection was established.
    Open,
    /// Anything else: refused, timed out, unreachable, unresolvable, invalid.
    Closed,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Result of probing a single port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Position of the port in the request.
    pub index: usize,
    /// The port label as requested.
    pub port: PortLabel,
    /// Whether the connection succeeded.
    pub reachable: bool,
    /// Failure detail, for diagnostics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ProbeFailure>,
    /// Time until the probe resolved, in milliseconds.
    pub elapsed_ms: u64,
}

impl ProbeOutcome {
    /// A successful connection.
    pub fn open(port: PortLabel) -> Self {
        Self {
            index: 0,
            port,
            reachable: true,
            failure: None,
            elapsed_ms: 0,
        }
    }

    /// A failed connection attempt.
    pub fn closed(port: PortLabel, failure: ProbeFailure) -> Self {
        Self {
            index: 0,
            port,
            reachable: false,
            failure: Some(failure),
            elapsed_ms: 0,
        }
    }

    /// Set the request position.
    pub fn at_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Set the elapsed time.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed_ms = elapsed.as_millis() as u64;
        self
    }

    /// Two-state status derived from reachability.
    pub fn status(&self) -> PortStatus {
        if self.reachable {
            PortStatus::Open
        } else {
            PortStatus::Closed
        }
    }
}

/// Order in which outcomes are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanOrder {
    /// Completion order: whichever probe finishes first is reported first.
    #[default]
    Arrival,
    /// Request order, re-sorted once every outcome has arrived.
    Input,
}

impl fmt::Display for ScanOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrival => write!(f, "arrival"),
            Self::Input => write!(f, "input"),
        }
    }
}

/// Trait for single-port reachability probes.
///
/// Implementations must be safe to call concurrently from many tasks
/// against the same host and must never fail: every failure is folded
/// into the returned outcome.
///
/// # Example
///
/// ```ignore
/// use portcheck::scanner::{Prober, TcpProber};
///
/// let outcome = TcpProber.probe("127.0.0.1", &"22".into(), timeout).await;
/// println!("Port {}: {}", outcome.port, outcome.status());
/// ```
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one host:port pair, bounded by `timeout`.
    async fn probe(&self, host: &str, port: &PortLabel, timeout: Duration) -> ProbeOutcome;
}

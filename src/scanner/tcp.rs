//! TCP connect probe.
//!
//! Performs a plain connect() through the operating system's socket API,
//! bounded by a timeout that covers name resolution and the handshake.
//! No data is exchanged: the connection is dropped as soon as it is up.

use crate::error::ProbeFailure;
use crate::scanner::traits::{ProbeOutcome, Prober};
use crate::types::PortLabel;
use async_trait::async_trait;
use std::io;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// TCP connect prober.
///
/// Stateless, so one instance can be shared by any number of tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProber;

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, host: &str, port: &PortLabel, timeout: Duration) -> ProbeOutcome {
        probe(host, port, timeout).await
    }
}

/// Attempt one bounded-time TCP connection to `host:port`.
///
/// Never fails: refused, timed out, unreachable, unresolvable and
/// undialable addresses all come back as an unreachable outcome carrying
/// the failure detail.
pub async fn probe(host: &str, port: &PortLabel, limit: Duration) -> ProbeOutcome {
    let addr = join_host_port(host, port.as_str());
    let start = Instant::now();

    let outcome = match attempt_connect(&addr, limit).await {
        Ok(stream) => {
            // Dropping closes the socket; nothing to report if that fails.
            drop(stream);
            ProbeOutcome::open(port.clone())
        }
        Err(failure) => {
            debug!(%addr, %failure, "probe failed");
            ProbeOutcome::closed(port.clone(), failure)
        }
    };

    outcome.with_elapsed(start.elapsed())
}

/// Attempt to connect to the target address.
async fn attempt_connect(addr: &str, limit: Duration) -> Result<TcpStream, ProbeFailure> {
    match timeout(limit, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(classify(&e)),
        Err(_) => Err(ProbeFailure::Timeout),
    }
}

/// Map a connect error to a failure reason.
fn classify(err: &io::Error) -> ProbeFailure {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => ProbeFailure::Refused,
        io::ErrorKind::TimedOut => ProbeFailure::Timeout,
        io::ErrorKind::InvalidInput => ProbeFailure::InvalidAddress(err.to_string()),
        _ => {
            let reason = err.to_string();
            let lower = reason.to_lowercase();
            if lower.contains("unreachable") {
                ProbeFailure::Unreachable(reason)
            } else if lower.contains("lookup")
                || lower.contains("resolve")
                || lower.contains("name or service not known")
                || lower.contains("nodename nor servname")
            {
                ProbeFailure::Resolution(reason)
            } else {
                ProbeFailure::Other(reason)
            }
        }
    }
}

/// Combine host and port into a dialable `host:port` string.
///
/// IPv6 literals are wrapped in brackets.
pub fn join_host_port(host: &str, port: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

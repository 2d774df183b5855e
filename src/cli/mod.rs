//! Command-line interface definitions.
//!
//! Every scan flag is optional: values missing on the command line come
//! from the settings file, then from built-in defaults.

mod scan;

pub use scan::ScanOptions;

use crate::config::{parse_timeout, AppSettings};
use crate::error::ConfigResult;
use crate::output::OutputFormat;
use crate::scanner::ScanOrder;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Check which TCP ports on a host accept connections.
///
/// Every port is probed concurrently; each probe gets at most TIMEOUT to
/// connect. Ports that accept a connection are reported open, anything
/// else (refused, timed out, unreachable, invalid) is reported closed.
#[derive(Parser, Debug)]
#[command(name = "portcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concurrent TCP port reachability checker", long_about = None)]
pub struct Cli {
    /// Host to scan, hostname or IP literal [default: 127.0.0.1]
    #[arg(short = 'H', long, env = "PORTCHECK_HOST")]
    pub host: Option<String>,

    /// Comma-separated ports to check (e.g. "22,80,443") [default: 22,80]
    #[arg(short, long, env = "PORTCHECK_PORTS")]
    pub ports: Option<String>,

    /// Connection timeout per port (e.g. "1s", "250ms") [default: 1s]
    #[arg(short, long, value_parser = parse_timeout, env = "PORTCHECK_TIMEOUT")]
    pub timeout: Option<Duration>,

    /// Maximum number of probes in flight, 0 for unbounded [default: 0]
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Order of reported ports [default: arrival]
    #[arg(long, value_enum)]
    pub order: Option<ScanOrder>,

    /// Output format for results [default: plain]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Reject ports that are not numbers in 1-65535 instead of reporting them closed
    #[arg(long, overrides_with = "no_strict")]
    pub strict: bool,

    /// Report invalid ports as closed even if the settings file enables strict mode
    #[arg(long = "no-strict", overrides_with = "strict")]
    pub no_strict: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress the summary line printed before scanning
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Merge flags over settings.
    pub fn resolve(&self, settings: &AppSettings) -> ConfigResult<ScanOptions> {
        let timeout = match self.timeout {
            Some(timeout) => timeout,
            None => settings.timeout()?,
        };

        Ok(ScanOptions {
            host: self.host.clone().unwrap_or_else(|| settings.host.clone()),
            ports: self.ports.clone().unwrap_or_else(|| settings.ports.clone()),
            timeout,
            concurrency: self.concurrency.unwrap_or(settings.concurrency),
            order: self.order.unwrap_or(settings.order),
            output: self.output.unwrap_or(settings.output),
            strict: self.strict || (settings.strict_ports && !self.no_strict),
            quiet: self.quiet,
        })
    }
}

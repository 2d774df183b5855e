//! Plain text output formatting.
//!
//! One `Port <label>: <open|closed>` line per outcome, coloured when the
//! terminal supports it.

use crate::scanner::{PortStatus, ProbeOutcome, ScanReport};
use console::{style, Style};
use std::io::{self, Write};
use std::time::Duration;

/// Write the summary line printed before scanning begins.
pub fn write_scan_header<W: Write>(
    mut out: W,
    host: &str,
    ports: &str,
    timeout: Duration,
) -> io::Result<()> {
    writeln!(
        out,
        "Scanning host {} on ports: {} (timeout {})",
        host,
        ports,
        humantime::format_duration(timeout)
    )
}

/// Write a single outcome line.
pub fn write_outcome<W: Write>(mut out: W, outcome: &ProbeOutcome) -> io::Result<()> {
    let status = outcome.status();
    let status_style = match status {
        PortStatus::Open => Style::new().green().bold(),
        PortStatus::Closed => Style::new().red(),
    };

    writeln!(out, "Port {}: {}", outcome.port, status_style.apply_to(status))
}

/// Write every outcome of a finished report, in reporting order.
pub fn write_plain<W: Write>(mut out: W, report: &ScanReport) -> io::Result<()> {
    for outcome in &report.outcomes {
        write_outcome(&mut out, outcome)?;
    }
    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

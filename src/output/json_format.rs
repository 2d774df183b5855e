//! JSON output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Write the full report as pretty-printed JSON.
pub fn write_json<W: Write>(mut out: W, report: &ScanReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)
}

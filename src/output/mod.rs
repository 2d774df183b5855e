//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan reports.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{print_error, print_warning, write_outcome, write_plain, write_scan_header};

use crate::error::CliResult;
use crate::scanner::ScanReport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Format a finished report according to the specified format.
pub fn write_report<W: Write>(out: W, report: &ScanReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Plain => plain::write_plain(out, report)?,
        OutputFormat::Json => json_format::write_json(out, report)?,
        OutputFormat::Csv => csv_format::write_csv(out, report)?,
    }
    Ok(())
}

//! CSV output formatting.

use crate::scanner::ScanReport;
use std::io::Write;

/// Write one row per outcome, in reporting order.
pub fn write_csv<W: Write>(out: W, report: &ScanReport) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["index", "port", "status", "failure", "elapsed_ms"])?;

    for outcome in &report.outcomes {
        let failure = outcome.failure.as_ref().map_or(String::new(), |f| f.to_string());
        wtr.write_record([
            outcome.index.to_string().as_str(),
            outcome.port.as_str(),
            outcome.status().to_string().as_str(),
            failure.as_str(),
            outcome.elapsed_ms.to_string().as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

//! Scan execution.
//!
//! Builds the request, prints the header, runs the scan and renders the
//! outcomes. Plain output in arrival order is streamed line by line as
//! probes finish; every other combination waits for the full report.

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use crate::scanner::{Dispatcher, Prober, ScanOrder, ScanReport};
use crate::types::{PortList, ScanRequest};
use std::io::{self, Write};
use std::time::Duration;

/// Fully resolved scan options.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    pub host: String,
    pub ports: String,
    pub timeout: Duration,
    pub concurrency: usize,
    pub order: ScanOrder,
    pub output: OutputFormat,
    pub strict: bool,
    pub quiet: bool,
}

impl ScanOptions {
    /// Validate the options into a scan request.
    pub fn request(&self) -> CliResult<ScanRequest> {
        let ports = PortList::parse(&self.ports);
        let request = ScanRequest::new(&self.host, ports, self.timeout)?
            .with_concurrency(self.concurrency);

        if self.strict {
            Ok(request.strict()?)
        } else {
            Ok(request)
        }
    }

    /// Run the scan against stdout.
    pub async fn execute<P: Prober + 'static>(
        &self,
        dispatcher: &Dispatcher<P>,
    ) -> CliResult<ScanReport> {
        self.execute_to(dispatcher, io::stdout()).await
    }

    /// Run the scan, writing everything to `out`.
    pub async fn execute_to<P, W>(
        &self,
        dispatcher: &Dispatcher<P>,
        mut out: W,
    ) -> CliResult<ScanReport>
    where
        P: Prober + 'static,
        W: Write,
    {
        let request = self.request()?;

        if !self.quiet && self.output == OutputFormat::Plain {
            output::write_scan_header(&mut out, request.host(), &self.ports, request.timeout())?;
        }

        let mut stream = dispatcher.dispatch(&request);

        if self.output == OutputFormat::Plain && self.order == ScanOrder::Arrival {
            let mut outcomes = Vec::with_capacity(stream.expected());
            while let Some(outcome) = stream.next().await {
                output::write_outcome(&mut out, &outcome)?;
                out.flush()?;
                outcomes.push(outcome);
            }
            return Ok(stream.finish(outcomes, self.order)?);
        }

        let report = stream.into_report(self.order).await?;
        output::write_report(&mut out, &report, self.output)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CliError, ProbeFailure, ScanError};
    use crate::scanner::ProbeOutcome;
    use crate::types::{PortError, PortLabel};
    use async_trait::async_trait;

    /// Finishes later ports first, so arrival order is the reverse of input.
    struct Reversed;

    #[async_trait]
    impl Prober for Reversed {
        async fn probe(&self, _host: &str, port: &PortLabel, _timeout: Duration) -> ProbeOutcome {
            let n: u64 = port.as_str().parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(100 - n)).await;
            if n % 2 == 0 {
                ProbeOutcome::open(port.clone())
            } else {
                ProbeOutcome::closed(port.clone(), ProbeFailure::Refused)
            }
        }
    }

    fn options(ports: &str) -> ScanOptions {
        ScanOptions {
            host: "127.0.0.1".into(),
            ports: ports.into(),
            timeout: Duration::from_secs(1),
            concurrency: 0,
            order: ScanOrder::Arrival,
            output: OutputFormat::Plain,
            strict: false,
            quiet: false,
        }
    }

    async fn run(opts: &ScanOptions) -> (CliResult<ScanReport>, String) {
        let mut buf = Vec::new();
        let result = opts.execute_to(&Dispatcher::new(Reversed), &mut buf).await;
        let text = console::strip_ansi_codes(&String::from_utf8(buf).unwrap()).into_owned();
        (result, text)
    }

    #[tokio::test(start_paused = true)]
    async fn test_plain_arrival_streams_in_completion_order() {
        let (result, text) = run(&options("1,2,3")).await;

        assert_eq!(
            text,
            "Scanning host 127.0.0.1 on ports: 1,2,3 (timeout 1s)\n\
             Port 3: closed\nPort 2: open\nPort 1: closed\n"
        );
        assert_eq!(result.unwrap().ports_scanned, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_plain_input_order() {
        let opts = ScanOptions {
            order: ScanOrder::Input,
            quiet: true,
            ..options("1,2,3")
        };
        let (_, text) = run(&opts).await;

        assert_eq!(text, "Port 1: closed\nPort 2: open\nPort 3: closed\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_json_has_no_header() {
        let opts = ScanOptions {
            output: OutputFormat::Json,
            ..options("1,2")
        };
        let (_, text) = run(&opts).await;

        assert!(text.trim_start().starts_with('{'));
        assert!(!text.contains("Scanning host"));
    }

    #[tokio::test]
    async fn test_strict_rejects_before_probing() {
        let opts = ScanOptions {
            strict: true,
            ..options("80,http")
        };
        let (result, text) = run(&opts).await;

        assert!(matches!(
            result,
            Err(CliError::Scan(ScanError::InvalidPort(PortError::InvalidFormat(_))))
        ));
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_empty_host_is_an_input_error() {
        let opts = ScanOptions {
            host: " ".into(),
            ..options("80")
        };
        let (result, text) = run(&opts).await;

        assert!(matches!(result, Err(CliError::Scan(ScanError::EmptyHost))));
        assert!(text.is_empty());
    }
}

//! Validated scan request.

use super::port::{PortLabel, PortList};
use crate::error::{ScanError, ScanResult};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

/// Everything a scan needs, fixed for the lifetime of the scan.
///
/// The host is opaque: it is trimmed and checked for emptiness but never
/// resolved here. Name resolution happens inside each probe.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    host: Arc<str>,
    ports: Vec<PortLabel>,
    timeout: Duration,
    concurrency: Option<NonZeroUsize>,
}

impl ScanRequest {
    /// Create a request with no concurrency limit.
    pub fn new(host: &str, ports: PortList, timeout: Duration) -> ScanResult<Self> {
        let host = host.trim();
        if host.is_empty() {
            return Err(ScanError::EmptyHost);
        }
        if ports.is_empty() {
            return Err(ScanError::NoPorts);
        }
        if timeout.is_zero() {
            return Err(ScanError::ZeroTimeout);
        }

        Ok(Self {
            host: Arc::from(host),
            ports: ports.into_labels(),
            timeout,
            concurrency: None,
        })
    }

    /// Cap the number of probes in flight. `0` means unbounded.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = NonZeroUsize::new(limit);
        self
    }

    /// Reject port labels that are not numbers in 1-65535.
    pub fn strict(self) -> ScanResult<Self> {
        for label in &self.ports {
            label.as_number()?;
        }
        Ok(self)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Shared handle to the host, cheap to clone into tasks.
    pub fn shared_host(&self) -> Arc<str> {
        Arc::clone(&self.host)
    }

    pub fn ports(&self) -> &[PortLabel] {
        &self.ports
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn concurrency(&self) -> Option<NonZeroUsize> {
        self.concurrency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PortError;

    fn ports(spec: &str) -> PortList {
        PortList::parse(spec)
    }

    #[test]
    fn test_request_trims_host() {
        let req = ScanRequest::new(" localhost ", ports("80"), Duration::from_secs(1)).unwrap();
        assert_eq!(req.host(), "localhost");
        assert_eq!(req.ports().len(), 1);
        assert!(req.concurrency().is_none());
    }

    #[test]
    fn test_request_rejects_empty_host() {
        let err = ScanRequest::new("  ", ports("80"), Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ScanError::EmptyHost));
    }

    #[test]
    fn test_request_rejects_no_ports() {
        let err = ScanRequest::new("127.0.0.1", PortList::default(), Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, ScanError::NoPorts));
    }

    #[test]
    fn test_request_rejects_zero_timeout() {
        let err = ScanRequest::new("127.0.0.1", ports("80"), Duration::ZERO).unwrap_err();
        assert!(matches!(err, ScanError::ZeroTimeout));
    }

    #[test]
    fn test_concurrency_zero_is_unbounded() {
        let req = ScanRequest::new("127.0.0.1", ports("80"), Duration::from_secs(1))
            .unwrap()
            .with_concurrency(0);
        assert!(req.concurrency().is_none());

        let req = req.with_concurrency(8);
        assert_eq!(req.concurrency().map(NonZeroUsize::get), Some(8));
    }

    #[test]
    fn test_strict_rejects_bad_labels() {
        let req = ScanRequest::new("127.0.0.1", ports("80,ssh"), Duration::from_secs(1)).unwrap();
        let err = req.strict().unwrap_err();
        assert!(matches!(
            err,
            ScanError::InvalidPort(PortError::InvalidFormat(ref s)) if s == "ssh"
        ));
    }

    #[test]
    fn test_lenient_keeps_bad_labels() {
        let req = ScanRequest::new("127.0.0.1", ports(",80,"), Duration::from_secs(1)).unwrap();
        assert_eq!(req.ports().len(), 3);
    }
}

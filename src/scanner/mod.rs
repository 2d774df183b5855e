//! Scanner module - fans probes out and collects their outcomes.
//!
//! Every requested port gets its own tokio task. Tasks report through a
//! bounded mpsc channel sized to the number of ports, so no task ever waits
//! to hand off its outcome. Each task holds a sender clone; the receiver
//! ends once the last task has reported, which is how the aggregator knows
//! the scan is complete.

pub mod tcp;
pub mod traits;

pub use tcp::{probe, TcpProber};
pub use traits::{PortStatus, ProbeOutcome, Prober, ScanOrder};

use crate::error::{ScanError, ScanResult};
use crate::types::{PortLabel, ScanId, ScanRequest};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, trace};

/// Launches probes and hands back their outcomes.
pub struct Dispatcher<P> {
    prober: Arc<P>,
}

impl<P: Prober + 'static> Dispatcher<P> {
    /// Create a dispatcher around a prober.
    pub fn new(prober: P) -> Self {
        Self {
            prober: Arc::new(prober),
        }
    }

    /// Spawn one probe task per requested port.
    ///
    /// Must be called from within a tokio runtime. Outcomes become
    /// available on the returned stream as probes finish.
    pub fn dispatch(&self, request: &ScanRequest) -> OutcomeStream {
        let expected = request.ports().len();
        let (tx, rx) = mpsc::channel(expected.max(1));
        let limiter = request
            .concurrency()
            .map(|limit| Arc::new(Semaphore::new(limit.get())));
        let timeout = request.timeout();

        info!(
            host = request.host(),
            ports = expected,
            timeout_ms = timeout.as_millis() as u64,
            concurrency = request.concurrency().map_or(0, |c| c.get()),
            "dispatching probes"
        );

        for (index, port) in request.ports().iter().cloned().enumerate() {
            let tx = tx.clone();
            let prober = Arc::clone(&self.prober);
            let host = request.shared_host();
            let limiter = limiter.clone();

            tokio::spawn(async move {
                // Held until the probe finishes. The semaphore is never
                // closed, so acquiring can only fail if that changes.
                let _permit = match &limiter {
                    Some(sem) => sem.acquire().await.ok(),
                    None => None,
                };

                trace!(index, port = %port, "probe started");
                let outcome = prober.probe(&host, &port, timeout).await.at_index(index);

                // The receiver only goes away if the caller stopped listening.
                let _ = tx.send(outcome).await;
            });
        }

        OutcomeStream {
            rx,
            host: request.shared_host(),
            timeout_ms: timeout.as_millis() as u64,
            expected,
            received: 0,
            started_at: Utc::now(),
            start: Instant::now(),
        }
    }

    /// Run a full scan and return the finished report.
    pub async fn scan(&self, request: &ScanRequest, order: ScanOrder) -> ScanResult<ScanReport> {
        self.dispatch(request).into_report(order).await
    }
}

impl Default for Dispatcher<TcpProber> {
    fn default() -> Self {
        Self::new(TcpProber)
    }
}

/// Scan with the TCP connect prober.
pub async fn scan(request: &ScanRequest, order: ScanOrder) -> ScanResult<ScanReport> {
    Dispatcher::default().scan(request, order).await
}

/// Live stream of outcomes from a dispatched scan, in completion order.
pub struct OutcomeStream {
    rx: mpsc::Receiver<ProbeOutcome>,
    host: Arc<str>,
    timeout_ms: u64,
    expected: usize,
    received: usize,
    started_at: DateTime<Utc>,
    start: Instant,
}

impl OutcomeStream {
    /// Wait for the next outcome. `None` once every task has reported.
    pub async fn next(&mut self) -> Option<ProbeOutcome> {
        let outcome = self.rx.recv().await?;
        self.received += 1;
        Some(outcome)
    }

    /// Number of outcomes the scan will produce.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Number of outcomes received so far.
    pub fn received(&self) -> usize {
        self.received
    }

    /// Drain the stream and build the report.
    ///
    /// Fails if the channel closed before every port reported, which
    /// means a probe task died without producing an outcome.
    pub async fn into_report(mut self, order: ScanOrder) -> ScanResult<ScanReport> {
        let mut outcomes = Vec::with_capacity(self.expected);
        while let Some(outcome) = self.next().await {
            outcomes.push(outcome);
        }
        self.finish(outcomes, order)
    }

    /// Build the report from outcomes already taken off this stream.
    pub fn finish(
        self,
        mut outcomes: Vec<ProbeOutcome>,
        order: ScanOrder,
    ) -> ScanResult<ScanReport> {
        if outcomes.len() != self.expected {
            return Err(ScanError::Incomplete {
                expected: self.expected,
                received: outcomes.len(),
            });
        }

        if order == ScanOrder::Input {
            outcomes.sort_by_key(|o| o.index);
        }

        let report = ScanReport::new(
            self.host.to_string(),
            self.timeout_ms,
            self.started_at,
            self.start.elapsed().as_millis() as u64,
            outcomes,
        );

        info!(
            scan_id = %report.id.short(),
            open = report.open_ports,
            closed = report.closed_ports,
            duration_ms = report.duration_ms,
            "scan complete"
        );

        Ok(report)
    }
}

/// Finished scan: one outcome per requested port.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub id: ScanId,
    pub host: String,
    pub timeout_ms: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub ports_scanned: usize,
    pub open_ports: usize,
    pub closed_ports: usize,
    /// Outcomes in reporting order.
    pub outcomes: Vec<ProbeOutcome>,
}

impl ScanReport {
    fn new(
        host: String,
        timeout_ms: u64,
        started_at: DateTime<Utc>,
        duration_ms: u64,
        outcomes: Vec<ProbeOutcome>,
    ) -> Self {
        let open_ports = outcomes.iter().filter(|o| o.reachable).count();
        Self {
            id: ScanId::new(),
            host,
            timeout_ms,
            started_at,
            completed_at: Utc::now(),
            duration_ms,
            ports_scanned: outcomes.len(),
            open_ports,
            closed_ports: outcomes.len() - open_ports,
            outcomes,
        }
    }

    /// Status of a port label. For duplicated labels, open if any probe
    /// of that label connected.
    pub fn status_of(&self, port: &str) -> Option<PortStatus> {
        self.statuses().get(port).copied()
    }

    /// Per-label status, independent of emission order.
    pub fn statuses(&self) -> BTreeMap<&str, PortStatus> {
        let mut map = BTreeMap::new();
        for outcome in &self.outcomes {
            let entry = map.entry(outcome.port.as_str()).or_insert(PortStatus::Closed);
            if outcome.reachable {
                *entry = PortStatus::Open;
            }
        }
        map
    }

    /// Labels of the ports that accepted a connection.
    pub fn open(&self) -> impl Iterator<Item = &PortLabel> {
        self.outcomes.iter().filter(|o| o.reachable).map(|o| &o.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeFailure;
    use crate::types::PortList;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Opens the listed ports; every probe takes the given delay.
    struct FakeProber {
        open: HashSet<&'static str>,
        delay: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FakeProber {
        fn new(open: &[&'static str], delay: Duration) -> Self {
            Self {
                open: open.iter().copied().collect(),
                delay,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Prober for FakeProber {
        async fn probe(&self, _host: &str, port: &PortLabel, _timeout: Duration) -> ProbeOutcome {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.open.contains(port.as_str()) {
                ProbeOutcome::open(port.clone())
            } else {
                ProbeOutcome::closed(port.clone(), ProbeFailure::Refused)
            }
        }
    }

    fn request(ports: &str) -> ScanRequest {
        ScanRequest::new("127.0.0.1", PortList::parse(ports), Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn test_one_outcome_per_port() {
        let dispatcher = Dispatcher::new(FakeProber::new(&["80"], Duration::ZERO));
        let report = dispatcher
            .scan(&request("22,80,80,443"), ScanOrder::Arrival)
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.ports_scanned, 4);
        assert_eq!(report.open_ports, 2);
        assert_eq!(report.closed_ports, 2);
    }

    #[tokio::test]
    async fn test_status_set() {
        let dispatcher = Dispatcher::new(FakeProber::new(&["80"], Duration::ZERO));
        let report = dispatcher
            .scan(&request("22,80"), ScanOrder::Arrival)
            .await
            .unwrap();

        assert_eq!(report.status_of("22"), Some(PortStatus::Closed));
        assert_eq!(report.status_of("80"), Some(PortStatus::Open));
        assert_eq!(report.status_of("443"), None);
        assert_eq!(report.open().map(|p| p.as_str()).collect::<Vec<_>>(), ["80"]);
    }

    #[tokio::test]
    async fn test_input_order_sorts_by_index() {
        let dispatcher = Dispatcher::new(FakeProber::new(&[], Duration::ZERO));
        let report = dispatcher
            .scan(&request("9,8,7,6,5,4,3,2,1"), ScanOrder::Input)
            .await
            .unwrap();

        let indices: Vec<usize> = report.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indices, (0..9).collect::<Vec<_>>());
        assert_eq!(report.outcomes[0].port.as_str(), "9");
    }

    #[tokio::test(start_paused = true)]
    async fn test_probes_run_in_parallel() {
        let delay = Duration::from_secs(1);
        let dispatcher = Dispatcher::new(FakeProber::new(&[], delay));
        let ports: Vec<String> = (1..=50).map(|p| p.to_string()).collect();

        let start = tokio::time::Instant::now();
        let report = dispatcher
            .scan(&request(&ports.join(",")), ScanOrder::Arrival)
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 50);
        assert!(start.elapsed() < delay * 2);
        assert_eq!(dispatcher.prober.peak.load(Ordering::SeqCst), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_limit() {
        let dispatcher = Dispatcher::new(FakeProber::new(&[], Duration::from_millis(100)));
        let ports: Vec<String> = (1..=20).map(|p| p.to_string()).collect();
        let req = request(&ports.join(",")).with_concurrency(3);

        let report = dispatcher.scan(&req, ScanOrder::Arrival).await.unwrap();

        assert_eq!(report.outcomes.len(), 20);
        assert!(dispatcher.prober.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_stream_counts_received() {
        let dispatcher = Dispatcher::new(FakeProber::new(&[], Duration::ZERO));
        let mut stream = dispatcher.dispatch(&request(",80,"));

        assert_eq!(stream.expected(), 3);
        let mut seen = Vec::new();
        while let Some(outcome) = stream.next().await {
            seen.push(outcome);
        }
        assert_eq!(stream.received(), 3);
        assert!(seen.iter().filter(|o| o.port.is_empty()).count() == 2);

        let report = stream.finish(seen, ScanOrder::Arrival).unwrap();
        assert_eq!(report.ports_scanned, 3);
    }

    #[tokio::test]
    async fn test_finish_detects_missing_outcomes() {
        let dispatcher = Dispatcher::new(FakeProber::new(&[], Duration::ZERO));
        let mut stream = dispatcher.dispatch(&request("1,2"));
        let first = stream.next().await.unwrap();

        let err = stream.finish(vec![first], ScanOrder::Arrival).unwrap_err();
        assert!(matches!(
            err,
            ScanError::Incomplete {
                expected: 2,
                received: 1
            }
        ));
    }
}

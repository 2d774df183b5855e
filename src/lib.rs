//! # portcheck - Concurrent TCP Port Reachability Checker
//!
//! Given a host and a list of ports, portcheck tries a TCP connection to
//! every port at once and reports each one as `open` or `closed` within a
//! bounded time budget.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portcheck::scanner::{scan, ScanOrder};
//! use portcheck::types::{PortList, ScanRequest};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let request = ScanRequest::new(
//!         "127.0.0.1",
//!         PortList::parse("22,80"),
//!         Duration::from_secs(1),
//!     )
//!     .unwrap();
//!
//!     let report = scan(&request, ScanOrder::Arrival).await.unwrap();
//!     for outcome in &report.outcomes {
//!         println!("Port {}: {}", outcome.port, outcome.status());
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Port labels, port list parsing and the scan request
//! - [`scanner`] - TCP probe, the `Prober` trait and the fan-out dispatcher
//! - [`output`] - Plain text, JSON and CSV rendering
//! - [`config`] - Settings file
//! - [`cli`] - Command-line flags and scan execution
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ProbeFailure, ScanError};
pub use scanner::{PortStatus, ProbeOutcome, Prober, ScanOrder, ScanReport};
pub use types::{PortLabel, PortList, ScanRequest};

//! Core type definitions.
//!
//! Port labels, the port list parser, the validated scan request and the
//! scan identifier.

mod port;
mod request;
mod scan_id;

pub use port::{PortError, PortLabel, PortList};
pub use request::ScanRequest;
pub use scan_id::ScanId;

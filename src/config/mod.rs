//! Configuration management for portcheck.
//!
//! Provides the XDG-compliant settings file that supplies defaults for
//! command-line flags.

mod settings;

pub use settings::{parse_timeout, AppSettings, Paths};

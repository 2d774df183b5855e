//! Port labels and port list parsing.
//!
//! A `PortLabel` keeps the port exactly as the user typed it (minus
//! surrounding whitespace) so reports echo the input, even when the label
//! is not a dialable port number. `PortList` is the ordered sequence of
//! labels parsed from a comma-separated specification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest port number accepted by strict validation.
pub const MIN_PORT: u16 = 1;

/// A port as given in input, trimmed of surrounding whitespace.
///
/// No numeric validation is applied on construction; an empty or
/// non-numeric label simply fails to dial.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortLabel(String);

impl PortLabel {
    /// Create a label, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    /// The label text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the label is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Interpret the label as a port number in 1-65535.
    pub fn as_number(&self) -> Result<u16, PortError> {
        if self.0.is_empty() {
            return Err(PortError::Empty);
        }
        if !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PortError::InvalidFormat(self.0.clone()));
        }
        match self.0.parse::<u16>() {
            Ok(port) if port >= MIN_PORT => Ok(port),
            _ => Err(PortError::OutOfRange(self.0.clone())),
        }
    }
}

impl fmt::Display for PortLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PortLabel {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u16> for PortLabel {
    fn from(value: u16) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for PortLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error type for strict port validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("invalid port number: '{0}'")]
    InvalidFormat(String),
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(String),
    #[error("empty port in port list")]
    Empty,
}

/// An ordered list of port labels.
///
/// Order and duplicates are preserved:
/// - `"22,80"` yields `22`, `80`
/// - `"80, 80"` yields `80`, `80`
/// - `",80,"` yields an empty label, `80`, and another empty label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortList {
    labels: Vec<PortLabel>,
}

impl PortList {
    /// Parse a comma-separated port specification. Never fails.
    pub fn parse(spec: &str) -> Self {
        Self {
            labels: spec.split(',').map(PortLabel::new).collect(),
        }
    }

    /// Number of labels, duplicates included.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the list holds no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over the labels in input order.
    pub fn iter(&self) -> impl Iterator<Item = &PortLabel> {
        self.labels.iter()
    }

    /// Consume the list into its labels.
    pub fn into_labels(self) -> Vec<PortLabel> {
        self.labels
    }
}

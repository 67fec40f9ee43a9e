//! Error types shared by the locator, the decoders and the content builder.
//!
//! Failures are reported at two levels:
//!
//! - [`DecodeError`]: raised by a table decoder for the one block it was given
//!   (no data rows, or a row that does not fit the table layout)
//! - [`NboError`]: raised by the public entry points; decoder failures are
//!   wrapped with the identity of the section and occurrence that failed

use crate::sections::SectionMarker;
use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

/// Error raised while decoding a single section block.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The block holds the section header but no data rows
    #[error("section contains no data rows")]
    EmptySection,
    /// A data row does not match the table layout
    #[error("malformed row at line {line}: {reason} in `{text}`")]
    MalformedRow {
        /// 1-based line number of the row in the log
        line: usize,
        /// Row text after continuation lines were merged
        text: String,
        /// What did not match
        reason: String,
    },
}

/// Error type for all public parsing operations.
#[derive(Error, Debug)]
pub enum NboError {
    /// Input does not carry the expected `.log` extension or shape
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// The given path does not resolve to an existing file
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// Reading the log failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serializing decoded content failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A required section occurrence is absent from the log
    #[error("Section not found: {marker} (occurrence #{occurrence} requested, {found} present)")]
    SectionNotFound {
        /// Section that was requested
        marker: SectionMarker,
        /// Zero-based occurrence that was requested
        occurrence: usize,
        /// Number of occurrences present in the log
        found: usize,
    },
    /// A section was found but could not be decoded
    #[error("Error parsing {marker}: {source}")]
    Section {
        /// Section that failed
        marker: SectionMarker,
        /// Zero-based occurrence that failed
        occurrence: usize,
        /// Decoder failure
        #[source]
        source: DecodeError,
    },
}

/// Type alias for results of public parsing operations
pub type Result<T> = std::result::Result<T, NboError>;

impl NboError {
    /// Section the error is attributed to, if any.
    pub fn marker(&self) -> Option<SectionMarker> {
        match self {
            NboError::SectionNotFound { marker, .. } | NboError::Section { marker, .. } => {
                Some(*marker)
            }
            _ => None,
        }
    }

    /// Message of the innermost error in the source chain.
    pub fn root_cause(&self) -> String {
        let mut current: &dyn StdError = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_error_keeps_marker_and_cause() {
        let err = NboError::Section {
            marker: SectionMarker::NhoDirectionality,
            occurrence: 0,
            source: DecodeError::EmptySection,
        };
        assert_eq!(err.marker(), Some(SectionMarker::NhoDirectionality));
        assert!(err.to_string().contains("NHO directionality"));
        assert_eq!(err.root_cause(), "section contains no data rows");
    }

    #[test]
    fn test_root_cause_of_leaf_error_is_itself() {
        let err = NboError::InvalidFormat("NBO log file required".into());
        assert_eq!(err.root_cause(), err.to_string());
        assert_eq!(err.marker(), None);
    }
}

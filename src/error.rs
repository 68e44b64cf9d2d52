//! Error types for the pagelayout library.

use thiserror::Error;

/// Result type alias for pagelayout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during layout analysis.
#[derive(Error, Debug)]
pub enum Error {
    /// Page dimensions are zero or negative.
    #[error("Invalid page dimensions: {width} x {height}")]
    InvalidPageDimensions {
        /// Page width as given in the input
        width: f32,
        /// Page height as given in the input
        height: f32,
    },

    /// A rectangle with inverted bounds was supplied as input.
    #[error("Invalid rectangle bounds: ({min_x}, {min_y}) - ({max_x}, {max_y})")]
    InvalidRect {
        /// Left bound
        min_x: f32,
        /// Top bound
        min_y: f32,
        /// Right bound
        max_x: f32,
        /// Bottom bound
        max_y: f32,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// A non-fatal, per-unit problem encountered during analysis.
///
/// Failures are scoped to the smallest subtree possible: a malformed region
/// or chunk is dropped from its parent with a diagnostic while sibling
/// subtrees continue to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Page number (1-indexed) the problem occurred on
    pub page: u32,
    /// What happened and what was dropped or substituted
    pub message: String,
    /// Severity of the problem
    pub severity: Severity,
}

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational, nothing was dropped
    Info,
    /// A unit was dropped or a fallback classification was used
    Warning,
}

impl Diagnostic {
    /// Create a warning diagnostic.
    pub fn warning(page: u32, message: impl Into<String>) -> Self {
        Self {
            page,
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Create an informational diagnostic.
    pub fn info(page: u32, message: impl Into<String>) -> Self {
        Self {
            page,
            message: message.into(),
            severity: Severity::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidPageDimensions {
            width: 0.0,
            height: 792.0,
        };
        assert_eq!(err.to_string(), "Invalid page dimensions: 0 x 792");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_diagnostic_severity() {
        let d = Diagnostic::warning(1, "dropped empty region");
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.page, 1);
    }
}

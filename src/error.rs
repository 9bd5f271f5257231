//! Error types for the single-line text converter.
//!
//! Only whole-operation failures are errors: unreadable XML, a font that could
//! not be loaded, an invalid configuration. Per-run problems (missing glyphs,
//! degenerate boxes, clamped scales, rotation) are reported through
//! [`crate::diagnostics::Diagnostics`] and never abort a render pass.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading fonts or converting documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed XML in a font or source document
    #[error("XML error: {0}")]
    Xml(String),

    /// Font source parsed but contained no usable font data
    #[error("Invalid font: {0}")]
    InvalidFont(String),

    /// Operation needs a font that has not finished loading
    #[error("Font not ready: {0}")]
    FontNotReady(String),

    /// Font load attempt failed (terminal for that attempt)
    #[error("Font load failed: {0}")]
    FontLoadFailed(String),

    /// Font did not become ready before the polling deadline
    #[error("Font load timed out after {millis} ms: {name}")]
    FontLoadTimeout {
        /// Font name being waited on
        name: String,
        /// Timeout that elapsed, in milliseconds
        millis: u64,
    },

    /// Path data could not be tokenized
    #[error("Invalid path data at byte {offset}: {reason}")]
    PathData {
        /// Byte offset where parsing stopped
        offset: usize,
        /// Reason for the failure
        reason: String,
    },

    /// Transform list could not be parsed
    #[error("Invalid transform list: {0}")]
    Transform(String),

    /// Invalid configuration value or render stage misuse
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error
    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

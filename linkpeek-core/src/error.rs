//! Error types for linkpeek.
//!
//! These never cross the coalescing core: by the time a value reaches the
//! cache every failure has been folded into a [`LinkPreview`](crate::LinkPreview)
//! payload. They are used at the edges, for input validation and setup.

use thiserror::Error;

/// Result type alias using `LinkpeekError`.
pub type Result<T> = std::result::Result<T, LinkpeekError>;

/// Main error type for linkpeek operations.
#[derive(Debug, Error)]
pub enum LinkpeekError {
    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The requested URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The requested URL uses a scheme other than http(s).
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Building or using the HTTP client failed.
    #[error("HTTP client error: {0}")]
    HttpError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // I/O ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// I/O error (binding the listener, serving connections).
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl LinkpeekError {
    /// Returns true if this error was caused by the caller's input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            LinkpeekError::InvalidUrl { .. } | LinkpeekError::UnsupportedScheme(_)
        )
    }
}

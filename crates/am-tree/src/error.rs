//! Export error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while exporting an authentication tree.
///
/// Every variant is fatal: the traversal stops at the first error and
/// files written before it stay on disk.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Authentication failed or no session has been established.
    #[error("session error: {0}")]
    Session(String),

    /// The remote service answered with a non-success status.
    #[error("failed to get {url}\nstatus: {status}\nbody: {body}")]
    Transport {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// A directory or file could not be written.
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        /// Path being created or written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Connection-level HTTP failure (DNS, TLS, reset).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A success response whose body is not the expected JSON.
    #[error("invalid response from {url}: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A child reference that cannot be resolved.
    #[error("invalid reference in {entity}: {message}")]
    Schema {
        /// Entity holding the reference, as `type/id`.
        entity: String,
        /// What is wrong with it.
        message: String,
    },

    /// Invalid base URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Wraps an IO error with the path it happened on.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

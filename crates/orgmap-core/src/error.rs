//! Centralized error types for graph sources.

use thiserror::Error;

/// Errors a backing source can produce before or during a query.
///
/// These never cross an adapter boundary as `Err`: every adapter converts
/// them into a `mode = error` envelope at its outermost function.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query rejected: mutation keyword '{0}' is not allowed in read-only traversals")]
    QueryRejected(String),

    #[error("{source_name} unavailable: {message}")]
    RemoteUnavailable { source_name: String, message: String },
}

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

impl SourceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a remote-unavailable error for a named source.
    pub fn remote(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            source_name: source.into(),
            message: message.into(),
        }
    }
}

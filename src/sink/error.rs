//! Sink error types

use thiserror::Error;

/// Failures reported by a sink implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    /// The external system is not reachable
    #[error("sink disconnected: {peer}")]
    Disconnected { peer: String },

    /// The external system refused the call
    #[error("{operation} rejected: {reason}")]
    Rejected { operation: String, reason: String },

    /// Writing to the underlying transport failed
    #[error("sink I/O error: {0}")]
    Io(String),

    /// The call could not be encoded
    #[error("sink serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for SinkError {
    fn from(error: std::io::Error) -> Self {
        SinkError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(error: serde_json::Error) -> Self {
        SinkError::Serialization(error.to_string())
    }
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

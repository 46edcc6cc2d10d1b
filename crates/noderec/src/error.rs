//! Error types for node-level operations.

use thiserror::Error;

/// Errors from node views, the text form and local node configuration.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The record itself was rejected.
    #[error("record error: {0}")]
    Record(#[from] noderec_core::Error),

    /// Text form without the "enr:" prefix.
    #[error("missing \"enr:\" prefix")]
    MissingPrefix,

    /// Text form with a malformed base64 body.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The scheme produced a node address that is not 32 bytes.
    #[error("node address has length {0}, expected 32")]
    NodeIdLength(usize),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for node-level operations.
pub type Result<T> = std::result::Result<T, NodeError>;

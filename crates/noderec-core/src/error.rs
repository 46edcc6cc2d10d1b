//! Error types for node records.

use thiserror::Error;

use crate::record::SIZE_LIMIT;

/// Errors produced while decoding canonical RLP values or entry values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("input ended before the value was complete")]
    UnexpectedEnd,

    #[error("non-canonical size information")]
    CanonSize,

    #[error("non-canonical integer (leading zero bytes)")]
    CanonInt,

    #[error("integer does not fit in {0} bits")]
    UintOverflow(u32),

    #[error("expected byte string, found list")]
    ExpectedString,

    #[error("expected list, found byte string")]
    ExpectedList,

    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("{0}")]
    Custom(String),
}

/// Errors that can occur while building, signing, loading or decoding a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested key is not present in the record.
    #[error("missing entry {key:?}")]
    NotFound { key: String },

    /// The key is present but its value does not decode into the requested type.
    #[error("invalid entry {key:?}: {source}")]
    Entry {
        key: String,
        #[source]
        source: DecodeError,
    },

    #[error("record bigger than {} bytes", SIZE_LIMIT)]
    TooBig,

    #[error("unknown identity scheme {0:?}")]
    UnknownScheme(String),

    #[error("invalid record: {0}")]
    Invalid(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("can't encode unsigned record")]
    UnsignedRecord,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid private key")]
    InvalidPrivateKey,
}

impl Error {
    /// True if this error reports a missing key rather than a malformed value.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Invalid(e.to_string())
    }
}

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, Error>;

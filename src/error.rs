//! Error types for the request codec
//!
//! Provides a unified error type for encoding, decoding and the flat-file store.

use thiserror::Error;

/// Result type alias using ReqError
pub type Result<T> = std::result::Result<T, ReqError>;

/// Unified error type for request codec operations
#[derive(Debug, Error)]
pub enum ReqError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Encode Errors
    // -------------------------------------------------------------------------
    #[error("Command not supported: '{verb}'")]
    NotSupported { verb: String },

    #[error("Unknown attribute: '{0}'")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Out of memory: cannot grow request buffer to {requested} bytes")]
    OutOfMemory { requested: usize },

    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    #[error("Malformed stream: {0}")]
    MalformedStream(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

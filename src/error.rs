//! Error types for tablewire
//!
//! Every failure a request can hit is one variant of [`TableWireError`].
//! Callers that only care about the failure class use [`TableWireError::kind`].

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using TableWireError
pub type Result<T> = std::result::Result<T, TableWireError>;

/// Coarse failure classes reported to the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or truncated payload, or unknown message type
    Protocol,
    /// A required field is missing or invalid
    Validation,
    /// The named table is not registered
    NotFound,
    /// The table could not be closed
    Close,
    /// A stream write or filesystem operation failed
    Io,
    /// Invalid configuration
    Config,
}

/// Unified error type for tablewire operations
#[derive(Debug, Error)]
pub enum TableWireError {
    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),

    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Table already exists: {0}")]
    TableExists(String),

    // -------------------------------------------------------------------------
    // Table Errors
    // -------------------------------------------------------------------------
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Unable to close table: {0}")]
    Close(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Unable to delete {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TableWireError {
    /// The failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TableWireError::Protocol(_) | TableWireError::UnknownMessageType(_) => {
                ErrorKind::Protocol
            }
            TableWireError::Validation(_) | TableWireError::TableExists(_) => {
                ErrorKind::Validation
            }
            TableWireError::TableNotFound(_) => ErrorKind::NotFound,
            TableWireError::Close(_) => ErrorKind::Close,
            TableWireError::Delete { .. }
            | TableWireError::Io(_)
            | TableWireError::Storage(_) => ErrorKind::Io,
            TableWireError::Config(_) => ErrorKind::Config,
        }
    }
}

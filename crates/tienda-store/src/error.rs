//! Error types for tienda storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted document failed to parse. The store refuses to start
    /// rather than reinitialize and discard history; restoring the document
    /// is an operator task.
    #[error("corrupt document {doc}: {message}")]
    Corrupt {
        /// The document that failed to parse.
        doc: String,
        /// Parser error message.
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),
}

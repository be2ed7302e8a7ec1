//! Error types for the certificate store.

use thiserror::Error;

/// Errors that can occur during certificate store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store at the connection target could not be reached.
    #[error("cannot connect to certificate store {target:?}: {reason}")]
    Connect { target: String, reason: String },

    /// The certificate table could not be created or checked.
    #[error("schema error: {0}")]
    Schema(String),

    /// A certificate row could not be written.
    #[error("insert failed: {0}")]
    Insert(String),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

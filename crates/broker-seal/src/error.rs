//! Error types for broker-seal startup.

use broker_seal_core::CryptoError;
use broker_seal_store::StoreError;
use thiserror::Error;

/// Errors that abort startup of the signing subsystem.
///
/// There is no degraded mode: if any of these occur, no envelopes are
/// signed. Per-message failures are reported as
/// [`broker_seal_core::EnvelopeError`] instead.
#[derive(Debug, Error)]
pub enum SealError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Key generation error.
    #[error("key generation error: {0}")]
    Crypto(#[from] CryptoError),

    /// Certificate store error.
    #[error("certificate store error: {0}")]
    Store(#[from] StoreError),
}

impl SealError {
    /// The startup step that failed, for diagnostics.
    pub fn step(&self) -> &'static str {
        match self {
            SealError::Config(_) => "config",
            SealError::Crypto(_) => "keygen",
            SealError::Store(StoreError::Connect { .. }) => "store connect",
            SealError::Store(StoreError::Schema(_)) => "schema",
            SealError::Store(_) => "insert",
        }
    }
}

/// Result type for startup operations.
pub type Result<T> = std::result::Result<T, SealError>;

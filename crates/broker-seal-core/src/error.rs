//! Error types for broker-seal core.

use thiserror::Error;

/// Errors from key generation and key handling.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The entropy source could not be used.
    #[error("crypto initialisation failed: {0}")]
    CryptoInit(String),

    /// A keypair could not be produced from the entropy that was read.
    #[error("key generation failed: {0}")]
    KeyGen(String),

    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature")]
    InvalidSignature,
}

/// Per-message errors raised while augmenting, signing or opening an envelope.
///
/// None of these are fatal to the host: the offending message is rejected
/// and the next one is processed normally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// A required input was absent or empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("expected a map, found {found}")]
    NotAMap { found: &'static str },

    /// Only indefinite-length maps may be augmented.
    #[error("map uses a definite-length encoding")]
    DefiniteMap,

    #[error("cannot insert {key:?}: map is full at {capacity} entries")]
    CapacityExceeded { key: String, capacity: usize },

    #[error("encoding error: {0}")]
    EncodingError(String),

    /// The signing library reported an error; no signature was produced.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
}

impl EnvelopeError {
    /// The processing step that rejected the message, for log context.
    pub fn step(&self) -> &'static str {
        match self {
            EnvelopeError::InvalidArgument(_) => "argument",
            EnvelopeError::DecodingError(_) => "decode",
            EnvelopeError::NotAMap { .. } => "type",
            EnvelopeError::DefiniteMap => "shape",
            EnvelopeError::CapacityExceeded { .. } => "capacity",
            EnvelopeError::EncodingError(_) => "encode",
            EnvelopeError::SigningFailed(_) => "sign",
            EnvelopeError::MalformedEnvelope(_) => "envelope",
        }
    }

    /// True when the caller passed bad arguments rather than bad data.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, EnvelopeError::InvalidArgument(_))
    }
}

/// Errors converting between unix time and ISO-8601 strings.
#[derive(Debug, Error)]
pub enum TimeError {
    #[error("timestamp out of range: {0}")]
    OutOfRange(u64),

    #[error("cannot parse timestamp {value:?}: {reason}")]
    Unparsable { value: String, reason: String },

    #[error("unknown time zone {0:?}")]
    UnknownZone(String),
}

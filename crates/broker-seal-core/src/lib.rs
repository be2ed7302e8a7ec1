//! # broker-seal core
//!
//! Pure primitives for sealing broker messages: keypairs, the structured-map
//! codec, and the signed-envelope algorithm.
//!
//! This crate contains no I/O, no storage, no networking. Every function is
//! safe to call concurrently; the only shared state is the read-only
//! [`Keypair`].
//!
//! ## Key Types
//!
//! - [`Keypair`] - The in-memory Ed25519 signing key
//! - [`StructuredMap`] - An ordered CBOR map that remembers its framing
//! - [`OpenedEnvelope`] - An envelope split into signed bytes and signature
//! - [`Clock`] - Wall-clock source for certificate and ingestion times
//!
//! ## Envelope format
//!
//! See the [`envelope`] module.

pub mod codec;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod time;

pub use codec::{decode, Field, Item, MapEncoding, StructuredMap};
pub use crypto::{
    Blake3Hash, Ed25519PublicKey, Ed25519Signature, Keypair, PUBLIC_KEY_LENGTH,
    SECRET_KEY_LENGTH, SIGNATURE_LENGTH,
};
pub use envelope::{
    augment_and_sign, open_envelope, seal, sign_map, sign_map_in_place, verify, verify_envelope,
    OpenedEnvelope, DEFAULT_SIGNATURE_FIELD, INGESTION_TIME_KEY,
};
pub use error::{CryptoError, EnvelopeError, TimeError};
pub use time::{Clock, CreateTimeZone, FixedClock, SystemClock};

/// Re-exported so callers can build map values without a direct dependency.
pub use ciborium::value::Value;

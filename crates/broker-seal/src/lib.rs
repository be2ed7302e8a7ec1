//! # broker-seal
//!
//! Signed message envelopes for message brokers.
//!
//! ## Overview
//!
//! At startup the broker generates an Ed25519 keypair and records the public
//! half as a certificate in a relational store. Each incoming message that is
//! an indefinite-length CBOR map is then augmented with an ingestion
//! timestamp and a detached signature:
//!
//! ```text
//! { ...original fields..., "INGESTION_TIME": ms, "VERIFICATION_TOKEN": sig }
//! ```
//!
//! Consumers look up the certificate to verify where a message came from and
//! when it was accepted.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use broker_seal::{SealConfig, SealService};
//!
//! let config = SealConfig::from_options([("db_connection_string", "certs.db")]).unwrap();
//! let service = SealService::start(&config).unwrap();
//!
//! let payload = [0xbf, 0x61, 0x61, 0x01, 0xff];
//! match service.seal(&payload) {
//!     Ok(envelope) => assert!(service.verify(&envelope)),
//!     Err(_) => { /* forward the original payload */ }
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `broker_seal::core` - Keypairs, the map codec and the envelope algorithm
//! - `broker_seal::store` - The certificate store contract and backends

pub mod config;
pub mod error;
pub mod issuer;
pub mod service;

pub use broker_seal_core as core;
pub use broker_seal_store as store;

pub use config::{SealConfig, DEFAULT_ENTITY};
pub use error::{Result, SealError};
pub use issuer::{CertificateIssuer, IssuedKey};
pub use service::SealService;

pub use broker_seal_core::{
    augment_and_sign, open_envelope, sign_map_in_place, verify, verify_envelope, EnvelopeError,
    Keypair, DEFAULT_SIGNATURE_FIELD, INGESTION_TIME_KEY,
};
pub use broker_seal_store::{Certificate, CertificateStore, StoreConnector};

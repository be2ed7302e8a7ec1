//! # broker-seal testkit
//!
//! Testing utilities for broker-seal.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Envelopes with byte-exact expected output, signed
//!   with the RFC 8032 TEST 1 key
//! - **Generators**: Proptest strategies for CBOR maps, keys and timestamps
//! - **Fixtures**: A seeded keypair, an in-memory store, and a connector that
//!   fails on demand
//!
//! ## Golden Vectors
//!
//! ```rust
//! use broker_seal_core::augment_and_sign;
//! use broker_seal_testkit::fixtures::TestFixture;
//! use broker_seal_testkit::vectors::{envelope_vectors, unhex};
//!
//! let fixture = TestFixture::rfc8032();
//! for v in envelope_vectors() {
//!     let out = augment_and_sign(
//!         &unhex(v.payload),
//!         &fixture.private_key(),
//!         v.ingestion_time_ms,
//!         v.signature_field,
//!     )
//!     .unwrap();
//!     assert_eq!(hex::encode(&out), v.envelope);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use broker_seal_testkit::generators::{indefinite_map_bytes, keypair};
//!
//! proptest! {
//!     #[test]
//!     fn sealed_envelopes_verify(kp in keypair(), payload in indefinite_map_bytes()) {
//!         let envelope = broker_seal_core::seal(&payload, &kp, 0, "SIG").unwrap();
//!         prop_assert!(broker_seal_core::verify_envelope(&envelope, "SIG", &kp.public_key()));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{Fault, FaultyConnector, FaultyStore, TestFixture, FIXTURE_TIME_MS};

//! # broker-seal store
//!
//! Durable registration of signing keys. Each broker start appends one
//! `(entity, creation time, public key)` row to an append-only table.
//!
//! ## Key Types
//!
//! - [`CertificateStore`] - The contract every backend implements
//! - [`StoreConnector`] - Opens a store handle from a connection target
//! - [`SqliteCertificateStore`] - SQLite-backed store
//! - [`MemoryCertificateStore`] - In-memory store for tests
//! - [`Certificate`] - The record being stored
//!
//! ## Usage
//!
//! ```rust,no_run
//! use broker_seal_store::{Certificate, CertificateStore, SqliteConnector, StoreConnector};
//! use broker_seal_core::Ed25519PublicKey;
//!
//! let mut store = SqliteConnector::default().connect("certs.db").unwrap();
//! store.ensure_schema().unwrap();
//!
//! let pk = Ed25519PublicKey::from_bytes([0u8; 32]);
//! store.insert(&Certificate::new("broker", 1733393632, &pk)).unwrap();
//! store.close().unwrap();
//! ```
//!
//! ## Table
//!
//! ```text
//! entity_certificates(
//!   entity       text                      NOT NULL,
//!   create_time  timestamp with time zone  NOT NULL,   -- YYYY-MM-DDTHH:MM:SSZ
//!   public_key   text                      NOT NULL    -- hex
//! )
//! ```

pub mod certificate;
pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use certificate::Certificate;
pub use error::{Result, StoreError};
pub use memory::{MemoryCertificateStore, MemoryConnector};
pub use sqlite::{SqliteCertificateStore, SqliteConnector, MEMORY_TARGET};
pub use traits::{CertificateStore, StoreConnector};

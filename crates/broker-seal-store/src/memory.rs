//! In-memory implementation of the certificate store.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! (insert before `ensure_schema` fails) and counts how many handles were
//! opened and released, so tests can check the scoped-release discipline.

use std::sync::{Arc, RwLock};

use crate::certificate::Certificate;
use crate::error::{Result, StoreError};
use crate::traits::{CertificateStore, StoreConnector};

#[derive(Debug, Default)]
struct MemoryState {
    schema_created: bool,
    rows: Vec<Certificate>,
    opened: usize,
    released: usize,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::InvalidData("memory store lock poisoned".into())
}

/// Opens handles onto one shared in-memory table.
///
/// Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryConnector {
    /// Create a connector with an empty, schema-less table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row ever inserted, in order.
    pub fn rows(&self) -> Result<Vec<Certificate>> {
        Ok(self.state.read().map_err(poisoned)?.rows.clone())
    }

    /// Whether the table exists.
    pub fn schema_created(&self) -> Result<bool> {
        Ok(self.state.read().map_err(poisoned)?.schema_created)
    }

    /// Handles opened minus handles released.
    pub fn open_handles(&self) -> Result<usize> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.opened.saturating_sub(state.released))
    }

    /// Total handles opened so far.
    pub fn connections_opened(&self) -> Result<usize> {
        Ok(self.state.read().map_err(poisoned)?.opened)
    }
}

impl StoreConnector for MemoryConnector {
    type Store = MemoryCertificateStore;

    fn connect(&self, _target: &str) -> Result<Self::Store> {
        self.state.write().map_err(poisoned)?.opened += 1;
        Ok(MemoryCertificateStore {
            state: Arc::clone(&self.state),
        })
    }
}

/// A handle onto a [`MemoryConnector`]'s table.
#[derive(Debug)]
pub struct MemoryCertificateStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryCertificateStore {
    /// Open a standalone in-memory store.
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
        }
    }
}

impl Default for MemoryCertificateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateStore for MemoryCertificateStore {
    fn ensure_schema(&mut self) -> Result<()> {
        self.state.write().map_err(poisoned)?.schema_created = true;
        Ok(())
    }

    fn insert(&mut self, certificate: &Certificate) -> Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.schema_created {
            return Err(StoreError::Insert(
                "no such table: entity_certificates".into(),
            ));
        }
        state.rows.push(certificate.clone());
        Ok(())
    }

    fn certificates_for(&self, entity: &str) -> Result<Vec<Certificate>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .rows
            .iter()
            .filter(|c| c.entity == entity)
            .cloned()
            .collect())
    }
}

impl Drop for MemoryCertificateStore {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.write() {
            state.released += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broker_seal_core::Ed25519PublicKey;

    fn cert(entity: &str, create_time: u64) -> Certificate {
        Certificate::new(entity, create_time, &Ed25519PublicKey::from_bytes([7; 32]))
    }

    #[test]
    fn test_insert_requires_schema() {
        let mut store = MemoryCertificateStore::new();
        assert!(matches!(store.insert(&cert("a", 1)), Err(StoreError::Insert(_))));

        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();
        store.insert(&cert("a", 1)).unwrap();
        assert_eq!(store.certificates_for("a").unwrap().len(), 1);
    }

    #[test]
    fn test_handles_share_table() {
        let connector = MemoryConnector::new();

        let mut store = connector.connect("mem").unwrap();
        store.ensure_schema().unwrap();
        store.insert(&cert("a", 1)).unwrap();
        store.close().unwrap();

        let mut store = connector.connect("mem").unwrap();
        store.insert(&cert("a", 2)).unwrap();
        store.insert(&cert("b", 3)).unwrap();

        assert_eq!(store.certificates_for("a").unwrap().len(), 2);
        assert_eq!(connector.rows().unwrap().len(), 3);
    }

    #[test]
    fn test_release_counting() {
        let connector = MemoryConnector::new();
        let store = connector.connect("mem").unwrap();
        assert_eq!(connector.open_handles().unwrap(), 1);

        drop(store);
        assert_eq!(connector.open_handles().unwrap(), 0);
        assert_eq!(connector.connections_opened().unwrap(), 1);
    }
}

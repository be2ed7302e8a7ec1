//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use broker_seal_core::{Ed25519PublicKey, FixedClock, Keypair};
use broker_seal_store::{
    Certificate, CertificateStore, MemoryCertificateStore, MemoryConnector, StoreConnector,
    StoreError,
};

use crate::vectors::RFC8032_SEED;

/// 2024-12-05T10:13:52Z.
pub const FIXTURE_TIME_MS: u64 = 1733393632000;

/// A keypair, an in-memory store and a frozen clock.
pub struct TestFixture {
    pub keypair: Keypair,
    pub connector: MemoryConnector,
    pub clock: FixedClock,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate().expect("os entropy unavailable"),
            connector: MemoryConnector::new(),
            clock: FixedClock::from_millis(FIXTURE_TIME_MS),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
            connector: MemoryConnector::new(),
            clock: FixedClock::from_millis(FIXTURE_TIME_MS),
        }
    }

    /// The RFC 8032 TEST 1 key, matching the golden vectors.
    pub fn rfc8032() -> Self {
        Self::with_seed(RFC8032_SEED)
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// The 64-byte secret in the form the raw signing functions take.
    pub fn private_key(&self) -> Vec<u8> {
        self.keypair.secret_bytes().to_vec()
    }

    /// A certificate for this fixture's key at the fixture time.
    pub fn certificate(&self, entity: &str) -> Certificate {
        Certificate::new(entity, FIXTURE_TIME_MS / 1000, &self.public_key())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// The store operation a [`FaultyConnector`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Connect,
    Schema,
    Insert,
    /// Everything succeeds but releasing the handle reports an error.
    Close,
}

/// A memory-backed connector that fails one chosen step.
///
/// Handle accounting still goes through the inner [`MemoryConnector`], so
/// tests can check that a failed issuance released its connection.
#[derive(Debug, Clone)]
pub struct FaultyConnector {
    pub inner: MemoryConnector,
    pub fault: Fault,
}

impl FaultyConnector {
    pub fn new(fault: Fault) -> Self {
        Self {
            inner: MemoryConnector::new(),
            fault,
        }
    }
}

/// Store handle produced by [`FaultyConnector`].
#[derive(Debug)]
pub struct FaultyStore {
    inner: MemoryCertificateStore,
    fault: Fault,
}

impl StoreConnector for FaultyConnector {
    type Store = FaultyStore;

    fn connect(&self, target: &str) -> Result<FaultyStore, StoreError> {
        if self.fault == Fault::Connect {
            return Err(StoreError::Connect {
                target: target.to_string(),
                reason: "injected fault".into(),
            });
        }
        Ok(FaultyStore {
            inner: self.inner.connect(target)?,
            fault: self.fault,
        })
    }
}

impl CertificateStore for FaultyStore {
    fn ensure_schema(&mut self) -> Result<(), StoreError> {
        if self.fault == Fault::Schema {
            return Err(StoreError::Schema("injected fault".into()));
        }
        self.inner.ensure_schema()
    }

    fn insert(&mut self, certificate: &Certificate) -> Result<(), StoreError> {
        if self.fault == Fault::Insert {
            return Err(StoreError::Insert("injected fault".into()));
        }
        self.inner.insert(certificate)
    }

    fn certificates_for(&self, entity: &str) -> Result<Vec<Certificate>, StoreError> {
        self.inner.certificates_for(entity)
    }

    fn close(self) -> Result<(), StoreError> {
        let fault = self.fault;
        self.inner.close()?;
        if fault == Fault::Close {
            return Err(StoreError::InvalidData("injected close fault".into()));
        }
        Ok(())
    }
}

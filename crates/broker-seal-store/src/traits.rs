//! The certificate store contract.
//!
//! A store handle is opened once at startup, used for the schema check and
//! one insert, then closed. Handles are not shared between threads.

use crate::certificate::Certificate;
use crate::error::Result;

/// An append-only log of certificates.
pub trait CertificateStore {
    /// Create the certificate table if it does not exist.
    ///
    /// Idempotent: calling it again leaves the table as it was.
    fn ensure_schema(&mut self) -> Result<()>;

    /// Append one certificate.
    ///
    /// There is no uniqueness constraint: issuing for the same entity twice
    /// yields two rows.
    fn insert(&mut self, certificate: &Certificate) -> Result<()>;

    /// All certificates recorded for `entity`, oldest first.
    fn certificates_for(&self, entity: &str) -> Result<Vec<Certificate>>;

    /// Release the handle, reporting any failure to close it.
    ///
    /// Dropping a handle also releases it; this only surfaces the error.
    fn close(self) -> Result<()>
    where
        Self: Sized,
    {
        drop(self);
        Ok(())
    }
}

/// Opens store handles from an opaque connection target.
pub trait StoreConnector {
    type Store: CertificateStore;

    /// Open a handle, failing with [`crate::StoreError::Connect`] if the
    /// target cannot be reached.
    fn connect(&self, target: &str) -> Result<Self::Store>;
}

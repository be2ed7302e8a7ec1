//! Certificate issuance: generate the broker keypair and register its
//! public half before any message is signed.

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use broker_seal_core::{Clock, Keypair};
use broker_seal_store::{Certificate, CertificateStore, StoreConnector};

use crate::error::{Result, SealError};

/// A keypair together with the certificate that registered it.
#[derive(Debug)]
pub struct IssuedKey {
    pub keypair: Keypair,
    pub certificate: Certificate,
}

/// Generates the signing keypair and records its certificate.
///
/// Runs once, synchronously, at startup. Failures are not retried.
pub struct CertificateIssuer<C: StoreConnector> {
    connector: C,
    clock: Arc<dyn Clock>,
}

impl<C: StoreConnector> CertificateIssuer<C> {
    pub fn new(connector: C, clock: Arc<dyn Clock>) -> Self {
        Self { connector, clock }
    }

    /// Generate a keypair from OS entropy and register it for `entity_id`.
    pub fn issue_and_register(&self, entity_id: &str, connection_target: &str) -> Result<IssuedKey> {
        self.issue_and_register_with(&mut OsRng, entity_id, connection_target)
    }

    /// [`Self::issue_and_register`] with an explicit CSPRNG.
    pub fn issue_and_register_with<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        entity_id: &str,
        connection_target: &str,
    ) -> Result<IssuedKey> {
        self.issue(rng, entity_id, connection_target)
            .map_err(|e| {
                tracing::error!(
                    step = e.step(),
                    entity = entity_id,
                    error = %e,
                    "certificate issuance failed"
                );
                e
            })
    }

    fn issue<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        entity_id: &str,
        connection_target: &str,
    ) -> Result<IssuedKey> {
        if entity_id.is_empty() {
            return Err(SealError::Config("entity is empty".into()));
        }

        let keypair = Keypair::generate_with(rng)?;
        let certificate = Certificate::new(entity_id, self.clock.now_secs(), &keypair.public_key());

        tracing::info!(
            entity = entity_id,
            create_time = certificate.create_time,
            fingerprint = ?keypair.public_key().fingerprint(),
            "generated signing keypair"
        );

        let mut store = self.connector.connect(connection_target)?;
        let outcome = store
            .ensure_schema()
            .and_then(|()| store.insert(&certificate));

        // Released on every path, before the outcome is inspected.
        if let Err(e) = store.close() {
            tracing::warn!(error = %e, "failed to release certificate store");
        }
        outcome?;

        tracing::info!(entity = entity_id, "registered signing certificate");
        Ok(IssuedKey {
            keypair,
            certificate,
        })
    }
}

//! The SealService: the signing context a broker holds for its lifetime.
//!
//! Built once at startup, read-only afterwards. Cloning is cheap and every
//! clone shares the same keypair, so one instance can serve all publish
//! handlers concurrently.

use std::sync::Arc;

use bytes::Bytes;

use broker_seal_core::{
    open_envelope, seal, Clock, Ed25519PublicKey, EnvelopeError, Keypair, OpenedEnvelope,
    SystemClock,
};
use broker_seal_store::{Certificate, SqliteConnector, StoreConnector};

use crate::config::SealConfig;
use crate::error::Result;
use crate::issuer::{CertificateIssuer, IssuedKey};

/// Seals broker messages with the key registered at startup.
#[derive(Clone)]
pub struct SealService {
    /// The signing keypair. Never leaves this process.
    keypair: Arc<Keypair>,
    /// The certificate that registered `keypair`.
    certificate: Certificate,
    signature_field: String,
    clock: Arc<dyn Clock>,
}

impl SealService {
    /// Issue a keypair, register it in the configured SQLite store, and
    /// return a service ready to seal messages.
    pub fn start(config: &SealConfig) -> Result<Self> {
        Self::start_with(
            config,
            SqliteConnector::new(config.create_time_zone),
            Arc::new(SystemClock),
        )
    }

    /// [`Self::start`] against any store backend and clock.
    pub fn start_with<C: StoreConnector>(
        config: &SealConfig,
        connector: C,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        let IssuedKey {
            keypair,
            certificate,
        } = CertificateIssuer::new(connector, Arc::clone(&clock))
            .issue_and_register(&config.entity, &config.connection_target)?;

        tracing::info!(
            entity = %certificate.entity,
            signature_field = %config.signature_field,
            "seal service started"
        );

        Ok(Self {
            keypair: Arc::new(keypair),
            certificate,
            signature_field: config.signature_field.clone(),
            clock,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn signature_field(&self) -> &str {
        &self.signature_field
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sealing
    // ─────────────────────────────────────────────────────────────────────────

    /// Seal a payload stamped with the current time.
    ///
    /// On error the caller should forward the original payload unchanged.
    pub fn seal(&self, payload: &[u8]) -> std::result::Result<Bytes, EnvelopeError> {
        self.seal_at(payload, self.clock.now_millis())
    }

    /// Seal a payload with an explicit ingestion time in milliseconds.
    pub fn seal_at(
        &self,
        payload: &[u8],
        ingestion_time_ms: u64,
    ) -> std::result::Result<Bytes, EnvelopeError> {
        match seal(payload, &self.keypair, ingestion_time_ms, &self.signature_field) {
            Ok(envelope) => {
                tracing::debug!(
                    payload_len = payload.len(),
                    envelope_len = envelope.len(),
                    ingestion_time = ingestion_time_ms,
                    "sealed message"
                );
                Ok(envelope)
            }
            Err(e) => {
                tracing::warn!(
                    step = e.step(),
                    payload_len = payload.len(),
                    error = %e,
                    "message left unsealed"
                );
                Err(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Open an envelope sealed by this service and check its signature.
    pub fn open(&self, envelope: &[u8]) -> std::result::Result<OpenedEnvelope, EnvelopeError> {
        let opened = open_envelope(envelope, &self.signature_field)?;
        opened
            .verify(&self.public_key())
            .map_err(|e| EnvelopeError::MalformedEnvelope(e.to_string()))?;
        Ok(opened)
    }

    /// True iff `envelope` was sealed by this service and is unmodified.
    pub fn verify(&self, envelope: &[u8]) -> bool {
        self.open(envelope).is_ok()
    }
}

impl std::fmt::Debug for SealService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealService")
            .field("keypair", &self.keypair)
            .field("certificate", &self.certificate)
            .field("signature_field", &self.signature_field)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broker_seal_core::{FixedClock, INGESTION_TIME_KEY};
    use broker_seal_store::MemoryConnector;

    const NOW_MS: u64 = 1733393632000;
    const HELLO: &str = "bf676d6573736167656d48656c6c6f2c20576f726c6421ff";

    fn service() -> (SealService, MemoryConnector) {
        let connector = MemoryConnector::new();
        let service = SealService::start_with(
            &SealConfig::new("mem"),
            connector.clone(),
            Arc::new(FixedClock::from_millis(NOW_MS)),
        )
        .unwrap();
        (service, connector)
    }

    #[test]
    fn test_start_registers_certificate() {
        let (service, connector) = service();
        let rows = connector.rows().unwrap();

        assert_eq!(rows, vec![service.certificate().clone()]);
        assert_eq!(rows[0].entity, "MOSQUITTO_MQTT_BROKER");
        assert_eq!(rows[0].create_time, NOW_MS / 1000);
        assert_eq!(rows[0].decode_public_key().unwrap(), service.public_key());
    }

    #[test]
    fn test_seal_uses_clock() {
        let (service, _) = service();
        let envelope = service.seal(&hex::decode(HELLO).unwrap()).unwrap();

        let opened = service.open(&envelope).unwrap();
        assert_eq!(opened.ingestion_time(), Some(NOW_MS));
        assert!(opened.map.get(INGESTION_TIME_KEY).is_some());
    }

    #[test]
    fn test_seal_failure_reports_step() {
        let (service, _) = service();
        let err = service.seal(&[0xa0]).unwrap_err();
        assert_eq!(err, EnvelopeError::DefiniteMap);
    }

    #[test]
    fn test_verify_rejects_other_service() {
        let (a, _) = service();
        let (b, _) = service();
        let envelope = a.seal(&hex::decode(HELLO).unwrap()).unwrap();

        assert!(a.verify(&envelope));
        assert!(!b.verify(&envelope));
    }

    #[test]
    fn test_invalid_config_rejected_before_connect() {
        let connector = MemoryConnector::new();
        let mut config = SealConfig::new("mem");
        config.signature_field.clear();

        let err = SealService::start_with(&config, connector.clone(), Arc::new(SystemClock))
            .unwrap_err();
        assert_eq!(err.step(), "config");
        assert_eq!(connector.connections_opened().unwrap(), 0);
    }

    #[test]
    fn test_debug_hides_secret() {
        let (service, _) = service();
        let debug = format!("{service:?}");
        let secret = hex::encode(&service.keypair.secret_bytes()[..32]);
        assert!(!debug.contains(&secret));
    }
}

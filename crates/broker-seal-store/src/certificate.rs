//! The certificate record.

use serde::{Deserialize, Serialize};

use broker_seal_core::Ed25519PublicKey;

use crate::error::{Result, StoreError};

/// A durable binding of an entity and a creation time to a public key.
///
/// Immutable once built. The store is the system of record; rows are never
/// updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Who the key was issued for.
    pub entity: String,
    /// Creation time in unix seconds.
    pub create_time: u64,
    /// Hex encoding of the raw 32-byte public key.
    pub public_key: String,
}

impl Certificate {
    pub fn new(entity: impl Into<String>, create_time: u64, public_key: &Ed25519PublicKey) -> Self {
        Self {
            entity: entity.into(),
            create_time,
            public_key: public_key.to_hex(),
        }
    }

    /// Decode the stored public key.
    pub fn decode_public_key(&self) -> Result<Ed25519PublicKey> {
        Ed25519PublicKey::from_hex(&self.public_key)
            .map_err(|e| StoreError::InvalidData(format!("public key {:?}: {e}", self.public_key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_key_is_hex() {
        let pk = Ed25519PublicKey::from_bytes([0xab; 32]);
        let cert = Certificate::new("broker", 1733393632, &pk);
        assert_eq!(cert.public_key, "ab".repeat(32));
        assert_eq!(cert.decode_public_key().unwrap(), pk);
    }

    #[test]
    fn test_bad_public_key_is_invalid_data() {
        let cert = Certificate {
            entity: "broker".into(),
            create_time: 0,
            public_key: "zz".into(),
        };
        assert!(matches!(cert.decode_public_key(), Err(StoreError::InvalidData(_))));
    }
}

//! Signed envelopes: ingestion timestamp plus detached Ed25519 signature.
//!
//! An envelope is the original message map with two entries appended:
//!
//! ```text
//! { ...original fields..., "INGESTION_TIME": uint, <signature field>: bstr(64) }
//! ```
//!
//! The signature covers the encoding of the map after `INGESTION_TIME` was
//! appended and before the signature entry was. The original fields keep
//! their exact bytes; see [`crate::codec`] for the encoding rules.
//!
//! Only indefinite-length maps are accepted by [`augment_and_sign`];
//! [`sign_map_in_place`] signs any map.

use bytes::Bytes;
use ciborium::value::Value;

use crate::codec::{self, Item, StructuredMap};
use crate::crypto::{Ed25519PublicKey, Ed25519Signature, Keypair, SIGNATURE_LENGTH};
use crate::error::{CryptoError, EnvelopeError};

/// Key of the ingestion timestamp entry.
pub const INGESTION_TIME_KEY: &str = "INGESTION_TIME";

/// Signature field name used when none is configured.
pub const DEFAULT_SIGNATURE_FIELD: &str = "VERIFICATION_TOKEN";

/// Augment a raw message with an ingestion time and a signature.
///
/// `private_key` is the 64-byte expanded Ed25519 secret. Either the whole
/// envelope is returned or an error; never a partial result.
pub fn augment_and_sign(
    payload: &[u8],
    private_key: &[u8],
    ingestion_time_ms: u64,
    signature_field: &str,
) -> Result<Bytes, EnvelopeError> {
    let keypair = parse_private_key(private_key)?;
    seal(payload, &keypair, ingestion_time_ms, signature_field)
}

/// [`augment_and_sign`] with an already-loaded keypair.
pub fn seal(
    payload: &[u8],
    keypair: &Keypair,
    ingestion_time_ms: u64,
    signature_field: &str,
) -> Result<Bytes, EnvelopeError> {
    check_field_name(signature_field)?;

    let mut map = codec::decode(payload)?.into_map()?;
    if !map.is_indefinite() {
        return Err(EnvelopeError::DefiniteMap);
    }

    map.insert(INGESTION_TIME_KEY, Value::Integer(ingestion_time_ms.into()))?;
    sign_map(&mut map, keypair, signature_field)?;

    Ok(Bytes::from(map.to_bytes()?))
}

/// Sign a map and append the signature under `signature_field`.
///
/// Works on definite and indefinite maps alike, including a map held as a
/// plain [`Value::Map`], which becomes a definite [`Item::Map`] once signed.
/// A CBOR `null` item counts as an absent map. On any error the item is left
/// unmodified.
pub fn sign_map_in_place(
    item: &mut Item,
    private_key: &[u8],
    signature_field: &str,
) -> Result<Ed25519Signature, EnvelopeError> {
    check_field_name(signature_field)?;
    let keypair = parse_private_key(private_key)?;

    match item {
        Item::Map(map) => sign_map(map, &keypair, signature_field),
        Item::Value(Value::Map(entries)) => {
            let mut map = StructuredMap::from_values(entries)?;
            let signature = sign_map(&mut map, &keypair, signature_field)?;
            *item = Item::Map(map);
            Ok(signature)
        }
        Item::Value(Value::Null) => Err(EnvelopeError::InvalidArgument("map is absent")),
        Item::Value(other) => Err(EnvelopeError::NotAMap {
            found: codec::value_type_name(other),
        }),
    }
}

/// Serialize, sign and append. The map only changes if every step succeeds.
pub fn sign_map(
    map: &mut StructuredMap,
    keypair: &Keypair,
    signature_field: &str,
) -> Result<Ed25519Signature, EnvelopeError> {
    if !map.has_room() {
        return Err(EnvelopeError::CapacityExceeded {
            key: signature_field.to_string(),
            capacity: map.len(),
        });
    }

    let message = map.to_bytes()?;
    let signature = keypair
        .try_sign(&message)
        .map_err(|e| EnvelopeError::SigningFailed(e.to_string()))?;

    map.insert(signature_field, Value::Bytes(signature.0.to_vec()))?;
    Ok(signature)
}

/// True iff `signature` was made over exactly `message` by the holder of
/// the secret matching `public_key`. Malformed keys or signatures are false.
pub fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    let (Ok(public_key), Ok(signature)) = (
        Ed25519PublicKey::from_slice(public_key),
        Ed25519Signature::from_slice(signature),
    ) else {
        return false;
    };
    public_key.verify(message, &signature).is_ok()
}

/// An envelope taken apart for verification.
#[derive(Debug, Clone)]
pub struct OpenedEnvelope {
    /// The map without its signature entry.
    pub map: StructuredMap,
    /// The exact bytes the signature was computed over.
    pub signed_bytes: Vec<u8>,
    pub signature: Ed25519Signature,
}

impl OpenedEnvelope {
    /// The ingestion time, if the envelope carries one.
    pub fn ingestion_time(&self) -> Option<u64> {
        match self.map.get(INGESTION_TIME_KEY) {
            Some(Value::Integer(i)) => u64::try_from(i).ok(),
            _ => None,
        }
    }

    pub fn verify(&self, public_key: &Ed25519PublicKey) -> Result<(), CryptoError> {
        public_key.verify(&self.signed_bytes, &self.signature)
    }
}

/// Split an envelope into its signed bytes and signature.
///
/// The signature entry must be the last one and the map header must be the
/// one this crate writes, so the signed bytes are fully determined by the
/// envelope bytes. Field bytes are taken as they are.
pub fn open_envelope(envelope: &[u8], signature_field: &str) -> Result<OpenedEnvelope, EnvelopeError> {
    check_field_name(signature_field)?;

    let mut map = codec::decode(envelope)?.into_map()?;
    if map.to_bytes()? != envelope {
        return Err(EnvelopeError::MalformedEnvelope(
            "not in canonical encoding".into(),
        ));
    }

    let last = map.pop().filter(|field| field.has_key(signature_field));
    let signature = match last.map(|field| field.value()) {
        Some(Ok(Value::Bytes(sig))) => Ed25519Signature::from_slice(&sig).map_err(|_| {
            EnvelopeError::MalformedEnvelope(format!(
                "signature must be {SIGNATURE_LENGTH} bytes, got {}",
                sig.len()
            ))
        })?,
        _ => {
            return Err(EnvelopeError::MalformedEnvelope(format!(
                "last entry is not the {signature_field:?} signature"
            )))
        }
    };

    let signed_bytes = map.to_bytes()?;
    Ok(OpenedEnvelope {
        map,
        signed_bytes,
        signature,
    })
}

/// Open and verify an envelope in one step.
pub fn verify_envelope(envelope: &[u8], signature_field: &str, public_key: &Ed25519PublicKey) -> bool {
    open_envelope(envelope, signature_field)
        .map(|opened| opened.verify(public_key).is_ok())
        .unwrap_or(false)
}

fn check_field_name(signature_field: &str) -> Result<(), EnvelopeError> {
    if signature_field.is_empty() {
        return Err(EnvelopeError::InvalidArgument("signature field name is empty"));
    }
    Ok(())
}

fn parse_private_key(private_key: &[u8]) -> Result<Keypair, EnvelopeError> {
    if private_key.is_empty() {
        return Err(EnvelopeError::InvalidArgument("private key is absent"));
    }
    Keypair::from_secret_bytes(private_key)
        .map_err(|_| EnvelopeError::InvalidArgument("private key is not a 64-byte ed25519 secret"))
}

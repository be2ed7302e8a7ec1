//! Golden test vectors for byte-exact envelope verification.
//!
//! Every vector uses the RFC 8032 section 7.1 TEST 1 key, so the expected
//! signatures can be reproduced with any conforming Ed25519 implementation.

use serde::Serialize;

use broker_seal_core::Keypair;

/// RFC 8032 TEST 1 secret seed.
pub const RFC8032_SEED: [u8; 32] = [
    0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c,
    0xc4, 0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae,
    0x7f, 0x60,
];

/// RFC 8032 TEST 1 public key (hex).
pub const RFC8032_PUBLIC_KEY: &str =
    "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

/// RFC 8032 TEST 1 signature over the empty message (hex).
pub const RFC8032_EMPTY_SIGNATURE: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

/// The RFC 8032 TEST 1 keypair.
pub fn rfc8032_keypair() -> Keypair {
    Keypair::from_seed(&RFC8032_SEED)
}

/// A golden envelope: raw message in, exact envelope out.
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Raw message bytes (hex).
    pub payload: &'static str,
    /// Ingestion time in milliseconds.
    pub ingestion_time_ms: u64,
    pub signature_field: &'static str,
    /// Message with `INGESTION_TIME` appended; what the signature covers (hex).
    pub signed_bytes: &'static str,
    /// Expected signature (hex).
    pub signature: &'static str,
    /// Expected envelope (hex).
    pub envelope: &'static str,
}

/// A golden in-place map signature.
#[derive(Debug, Clone, Serialize)]
pub struct MapSignatureVector {
    pub name: &'static str,
    /// Map bytes before signing (hex).
    pub map: &'static str,
    pub signature_field: &'static str,
    /// Expected signature over `map` (hex).
    pub signature: &'static str,
    /// Map bytes after the signature entry was appended (hex).
    pub signed_map: &'static str,
}

/// All envelope vectors.
pub fn envelope_vectors() -> Vec<EnvelopeVector> {
    vec![EnvelopeVector {
        name: "hello world indefinite map",
        payload: "bf676d6573736167656d48656c6c6f2c20576f726c6421ff",
        ingestion_time_ms: 1733393632000, // 2024-12-05T10:13:52Z
        signature_field: "VERIFICATION_TOKEN",
        signed_bytes: "bf676d6573736167656d48656c6c6f2c20576f726c64216e494e47455354494f4e5f54494d451b00000193964fcb00ff",
        signature: "0ec9f818edb9eaecd86ff7ce7563f573aa8adcc897437eb179a409d02fea6dc8cb028c9186f93926568a6b47cc42beee6d6391f0f92e3bc42fe094f7571eb707",
        envelope: "bf676d6573736167656d48656c6c6f2c20576f726c64216e494e47455354494f4e5f54494d451b00000193964fcb0072564552494649434154494f4e5f544f4b454e58400ec9f818edb9eaecd86ff7ce7563f573aa8adcc897437eb179a409d02fea6dc8cb028c9186f93926568a6b47cc42beee6d6391f0f92e3bc42fe094f7571eb707ff",
    }]
}

/// All in-place map signature vectors.
pub fn map_signature_vectors() -> Vec<MapSignatureVector> {
    vec![
        MapSignatureVector {
            name: "hello world indefinite map",
            map: "bf676d6573736167656d48656c6c6f2c20576f726c6421ff",
            signature_field: "VERIFICATION_TOKEN",
            signature: "901991069a85bf2a19aaabf1039641010669518fd1d417d414305fe4193df37457b0ad30d9905b68571b0ffbaecaf8d552d2db760e5be89059d84631f7885d02",
            signed_map: "bf676d6573736167656d48656c6c6f2c20576f726c642172564552494649434154494f4e5f544f4b454e5840901991069a85bf2a19aaabf1039641010669518fd1d417d414305fe4193df37457b0ad30d9905b68571b0ffbaecaf8d552d2db760e5be89059d84631f7885d02ff",
        },
        MapSignatureVector {
            name: "hello world definite map",
            map: "a1676d6573736167656d48656c6c6f2c20576f726c6421",
            signature_field: "signature",
            signature: "8a0bc262d0acdce0390775fd44fe8808be8f0d627b4b51e5fb5dec18fa9f7da9c76f5d27dae0410fb6c59866f659e10d084daae6c31279be4b9b0d7dec32800c",
            signed_map: "a2676d6573736167656d48656c6c6f2c20576f726c6421697369676e617475726558408a0bc262d0acdce0390775fd44fe8808be8f0d627b4b51e5fb5dec18fa9f7da9c76f5d27dae0410fb6c59866f659e10d084daae6c31279be4b9b0d7dec32800c",
        },
    ]
}

/// Decode a hex field of a vector.
///
/// Panics on malformed hex; vectors are constants.
pub fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap_or_else(|e| panic!("bad hex in golden vector {s:?}: {e}"))
}

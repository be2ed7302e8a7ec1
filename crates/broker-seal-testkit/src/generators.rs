//! Proptest generators for property-based testing.

use proptest::prelude::*;

use broker_seal_core::{Keypair, MapEncoding, StructuredMap, Value};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a map key.
pub fn field_name() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,23}".prop_map(String::from)
}

/// Generate an ingestion time in milliseconds.
pub fn ingestion_time() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), 1_500_000_000_000u64..=4_102_444_800_000u64, Just(u64::MAX)]
}

/// Generate a scalar CBOR value.
pub fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|i| Value::Integer(i.into())),
        any::<u64>().prop_map(|u| Value::Integer(u.into())),
        ".{0,32}".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Bytes),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
        (-1.0e9f64..1.0e9f64).prop_map(Value::Float),
    ]
}

/// Generate a CBOR value nested up to three levels deep.
pub fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((field_name(), inner), 0..4).prop_map(|entries| {
                Value::Map(
                    entries
                        .into_iter()
                        .map(|(k, v)| (Value::Text(k), v))
                        .collect(),
                )
            }),
        ]
    })
}

/// Generate a top-level map with the given framing.
pub fn map(encoding: MapEncoding) -> impl Strategy<Value = StructuredMap> {
    prop::collection::vec((field_name(), value()), 0..8).prop_map(move |entries| {
        let mut map = match encoding {
            MapEncoding::Definite => StructuredMap::definite(),
            MapEncoding::Indefinite => StructuredMap::indefinite(),
        };
        for (key, value) in entries {
            // Unbounded maps never refuse an entry.
            let _ = map.insert(key, value);
        }
        map
    })
}

/// Generate an indefinite-length map, the only shape the envelope accepts.
pub fn indefinite_map() -> impl Strategy<Value = StructuredMap> {
    map(MapEncoding::Indefinite)
}

/// Generate the encoded bytes of an indefinite-length map.
pub fn indefinite_map_bytes() -> impl Strategy<Value = Vec<u8>> {
    indefinite_map().prop_filter_map("map must encode", |map| map.to_bytes().ok())
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

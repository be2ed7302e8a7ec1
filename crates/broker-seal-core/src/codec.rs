//! CBOR codec for structured message maps.
//!
//! Messages are CBOR maps with string keys. The codec never re-encodes a
//! producer's fields: each decoded key/value pair is kept as the exact bytes
//! it arrived as, and only the top-level map header is rewritten.
//! - Definite maps are written with their current entry count
//! - Indefinite maps are written as `0xbf <pairs> 0xff`
//! - Appended entries use definite lengths and the smallest lossless
//!   integer and float widths
//!
//! The signature over a message covers exactly the bytes produced here, so
//! the same map must always encode to the same bytes.

use ciborium::value::{Integer, Value};
use ciborium_ll::{simple, tag, Decoder, Encoder, Header};

use crate::error::EnvelopeError;

/// Nesting deeper than this is rejected.
pub const MAX_DEPTH: usize = 256;

/// How the top-level map states its length on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEncoding {
    /// Entry count fixed in the header.
    Definite,
    /// Open-ended, terminated by a break byte.
    Indefinite,
}

/// One key/value pair, held as its encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    raw: Vec<u8>,
    key_len: usize,
}

impl Field {
    /// Encode a new pair.
    pub fn new(key: &Value, value: &Value) -> Result<Self, EnvelopeError> {
        let mut raw = Vec::new();
        {
            let mut encoder = Encoder::from(&mut raw);
            encode_value(&mut encoder, key)?;
        }
        let key_len = raw.len();
        {
            let mut encoder = Encoder::from(&mut raw);
            encode_value(&mut encoder, value)?;
        }
        Ok(Self { raw, key_len })
    }

    /// The key and value bytes as they appear on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn key_bytes(&self) -> &[u8] {
        &self.raw[..self.key_len]
    }

    pub fn value_bytes(&self) -> &[u8] {
        &self.raw[self.key_len..]
    }

    /// The key, if it is a text string.
    pub fn key(&self) -> Option<String> {
        match decode_value(self.key_bytes()) {
            Ok(Value::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Whether the key is the text string `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.key().as_deref() == Some(key)
    }

    /// Decode the value.
    ///
    /// Fails for values with no [`Value`] counterpart, such as `undefined`
    /// or unassigned simple values. The raw bytes are still kept.
    pub fn value(&self) -> Result<Value, EnvelopeError> {
        decode_value(self.value_bytes())
    }
}

/// An ordered, string-keyed message payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredMap {
    encoding: MapEncoding,
    fields: Vec<Field>,
    capacity: Option<usize>,
}

impl StructuredMap {
    /// An empty, open-ended indefinite map.
    pub fn indefinite() -> Self {
        Self {
            encoding: MapEncoding::Indefinite,
            fields: Vec::new(),
            capacity: None,
        }
    }

    /// An empty definite map that grows as entries are appended.
    pub fn definite() -> Self {
        Self {
            encoding: MapEncoding::Definite,
            fields: Vec::new(),
            capacity: None,
        }
    }

    /// An empty definite map that refuses entries beyond `capacity`.
    pub fn fixed(capacity: usize) -> Self {
        Self {
            encoding: MapEncoding::Definite,
            fields: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// A definite map holding already-decoded entries.
    pub(crate) fn from_values(entries: &[(Value, Value)]) -> Result<Self, EnvelopeError> {
        let fields = entries
            .iter()
            .map(|(k, v)| Field::new(k, v))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            encoding: MapEncoding::Definite,
            fields,
            capacity: None,
        })
    }

    pub fn encoding(&self) -> MapEncoding {
        self.encoding
    }

    pub fn is_indefinite(&self) -> bool {
        self.encoding == MapEncoding::Indefinite
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Whether another entry can be appended.
    pub fn has_room(&self) -> bool {
        self.capacity.map_or(true, |cap| self.fields.len() < cap)
    }

    /// The first decodable value stored under a text key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.fields
            .iter()
            .find(|f| f.has_key(key))
            .and_then(|f| f.value().ok())
    }

    /// Append an entry under a text key.
    ///
    /// Existing entries with the same key are kept; the new one goes last.
    /// The map is left untouched on error.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<(), EnvelopeError> {
        let key = key.into();
        if !self.has_room() {
            return Err(EnvelopeError::CapacityExceeded {
                key,
                capacity: self.capacity.unwrap_or(self.fields.len()),
            });
        }
        let field = Field::new(&Value::Text(key), &value)?;
        self.fields.push(field);
        Ok(())
    }

    /// Remove and return the last field.
    pub fn pop(&mut self) -> Option<Field> {
        self.fields.pop()
    }

    /// Encode to bytes, preserving field order, field bytes and map framing.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        let mut buf = Vec::with_capacity(2 + self.fields.iter().map(|f| f.raw.len()).sum::<usize>());

        let header = match self.encoding {
            MapEncoding::Definite => Header::Map(Some(self.fields.len())),
            MapEncoding::Indefinite => Header::Map(None),
        };
        push_header(&mut buf, header)?;
        for field in &self.fields {
            buf.extend_from_slice(&field.raw);
        }
        if self.encoding == MapEncoding::Indefinite {
            push_header(&mut buf, Header::Break)?;
        }
        Ok(buf)
    }
}

/// A decoded top-level item: either a map or some other value.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Map(StructuredMap),
    Value(Value),
}

impl Item {
    /// Name of the item's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Item::Map(_) => "map",
            Item::Value(v) => value_type_name(v),
        }
    }

    /// Require the item to be a map.
    ///
    /// A [`Value::Map`] counts as a definite map.
    pub fn into_map(self) -> Result<StructuredMap, EnvelopeError> {
        match self {
            Item::Map(map) => Ok(map),
            Item::Value(Value::Map(entries)) => StructuredMap::from_values(&entries),
            Item::Value(other) => Err(EnvelopeError::NotAMap {
                found: value_type_name(&other),
            }),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        match self {
            Item::Map(map) => map.to_bytes(),
            Item::Value(value) => {
                let mut buf = Vec::new();
                encode_value(&mut Encoder::from(&mut buf), value)?;
                Ok(buf)
            }
        }
    }
}

impl From<StructuredMap> for Item {
    fn from(map: StructuredMap) -> Self {
        Item::Map(map)
    }
}

/// Decode exactly one CBOR item from `bytes`.
///
/// A top-level map is split into fields without decoding them. Trailing
/// bytes after the item are rejected.
pub fn decode(bytes: &[u8]) -> Result<Item, EnvelopeError> {
    let (header, mut pos) = read_header(bytes, 0)?;

    let encoding = match header {
        Header::Map(Some(_)) => MapEncoding::Definite,
        Header::Map(None) => MapEncoding::Indefinite,
        _ => {
            let end = skip_item(bytes, 0, 0)?;
            check_trailing(bytes, end)?;
            return decode_value(bytes).map(Item::Value);
        }
    };

    let mut fields = Vec::new();
    let mut read_pair = |pos: usize| -> Result<usize, EnvelopeError> {
        let key_end = skip_item(bytes, pos, 1)?;
        let end = skip_item(bytes, key_end, 1)?;
        fields.push(Field {
            raw: bytes[pos..end].to_vec(),
            key_len: key_end - pos,
        });
        Ok(end)
    };

    match header {
        Header::Map(Some(len)) => {
            for _ in 0..len {
                pos = read_pair(pos)?;
            }
        }
        _ => {
            while !at_break(bytes, pos)? {
                pos = read_pair(pos)?;
            }
            pos += 1;
        }
    }
    check_trailing(bytes, pos)?;

    Ok(Item::Map(StructuredMap {
        encoding,
        fields,
        capacity: None,
    }))
}

/// Decode one complete item into a [`Value`].
fn decode_value(bytes: &[u8]) -> Result<Value, EnvelopeError> {
    let mut reader = bytes;
    let value: Value = ciborium::from_reader(&mut reader)
        .map_err(|e| EnvelopeError::DecodingError(e.to_string()))?;
    check_trailing(bytes, bytes.len() - reader.len())?;
    Ok(value)
}

fn check_trailing(bytes: &[u8], end: usize) -> Result<(), EnvelopeError> {
    if end < bytes.len() {
        return Err(EnvelopeError::DecodingError(format!(
            "{} trailing bytes after item",
            bytes.len() - end
        )));
    }
    Ok(())
}

fn truncated(at: usize) -> EnvelopeError {
    EnvelopeError::DecodingError(format!("unexpected end of input at byte {at}"))
}

/// Read one header starting at `at`; returns it and the offset just past it.
fn read_header(bytes: &[u8], at: usize) -> Result<(Header, usize), EnvelopeError> {
    let rest = bytes.get(at..).ok_or_else(|| truncated(at))?;
    let mut decoder = Decoder::from(rest);
    let header = decoder
        .pull()
        .map_err(|e| EnvelopeError::DecodingError(format!("at byte {at}: {e:?}")))?;
    Ok((header, at + decoder.offset()))
}

fn at_break(bytes: &[u8], at: usize) -> Result<bool, EnvelopeError> {
    bytes.get(at).map(|b| *b == 0xff).ok_or_else(|| truncated(at))
}

fn skip_payload(bytes: &[u8], at: usize, len: usize) -> Result<usize, EnvelopeError> {
    at.checked_add(len)
        .filter(|end| *end <= bytes.len())
        .ok_or_else(|| truncated(bytes.len()))
}

/// Offset just past the complete item starting at `at`.
fn skip_item(bytes: &[u8], at: usize, depth: usize) -> Result<usize, EnvelopeError> {
    if depth > MAX_DEPTH {
        return Err(EnvelopeError::DecodingError(format!(
            "nesting deeper than {MAX_DEPTH}"
        )));
    }

    let (header, mut pos) = read_header(bytes, at)?;
    match header {
        Header::Positive(_) | Header::Negative(_) | Header::Float(_) | Header::Simple(_) => Ok(pos),
        Header::Break => Err(EnvelopeError::DecodingError(format!(
            "unexpected break at byte {at}"
        ))),
        Header::Tag(_) => skip_item(bytes, pos, depth + 1),
        Header::Bytes(Some(len)) | Header::Text(Some(len)) => skip_payload(bytes, pos, len),
        Header::Bytes(None) | Header::Text(None) => {
            let text = matches!(header, Header::Text(None));
            while !at_break(bytes, pos)? {
                let chunk_at = pos;
                let (chunk, next) = read_header(bytes, chunk_at)?;
                pos = match (chunk, text) {
                    (Header::Bytes(Some(len)), false) | (Header::Text(Some(len)), true) => {
                        skip_payload(bytes, next, len)?
                    }
                    _ => {
                        return Err(EnvelopeError::DecodingError(format!(
                            "invalid string chunk at byte {chunk_at}"
                        )))
                    }
                };
            }
            Ok(pos + 1)
        }
        Header::Array(Some(len)) => {
            for _ in 0..len {
                pos = skip_item(bytes, pos, depth + 1)?;
            }
            Ok(pos)
        }
        Header::Map(Some(len)) => {
            for _ in 0..len {
                pos = skip_item(bytes, pos, depth + 1)?;
                pos = skip_item(bytes, pos, depth + 1)?;
            }
            Ok(pos)
        }
        Header::Array(None) => {
            while !at_break(bytes, pos)? {
                pos = skip_item(bytes, pos, depth + 1)?;
            }
            Ok(pos + 1)
        }
        Header::Map(None) => {
            while !at_break(bytes, pos)? {
                pos = skip_item(bytes, pos, depth + 1)?;
                pos = skip_item(bytes, pos, depth + 1)?;
            }
            Ok(pos + 1)
        }
    }
}

pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Integer(_) => "integer",
        Value::Bytes(_) => "bytes",
        Value::Float(_) => "float",
        Value::Text(_) => "text",
        Value::Bool(_) => "bool",
        Value::Null => "null",
        Value::Tag(..) => "tag",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        _ => "unknown",
    }
}

fn encode_err(e: std::io::Error) -> EnvelopeError {
    EnvelopeError::EncodingError(e.to_string())
}

fn push_header(buf: &mut Vec<u8>, header: Header) -> Result<(), EnvelopeError> {
    Encoder::from(buf).push(header).map_err(encode_err)
}

/// Recursively encode a CBOR value.
fn encode_value(encoder: &mut Encoder<&mut Vec<u8>>, value: &Value) -> Result<(), EnvelopeError> {
    match value {
        Value::Integer(i) => encode_integer(encoder, *i),
        Value::Bytes(b) => encoder.bytes(b, None).map_err(encode_err),
        Value::Text(s) => encoder.text(s, None).map_err(encode_err),
        Value::Float(f) => encoder.push(Header::Float(*f)).map_err(encode_err),
        Value::Bool(b) => {
            let byte = if *b { simple::TRUE } else { simple::FALSE };
            encoder.push(Header::Simple(byte)).map_err(encode_err)
        }
        Value::Null => encoder.push(Header::Simple(simple::NULL)).map_err(encode_err),
        Value::Tag(t, inner) => {
            encoder.push(Header::Tag(*t)).map_err(encode_err)?;
            encode_value(encoder, inner)
        }
        Value::Array(arr) => {
            encoder.push(Header::Array(Some(arr.len()))).map_err(encode_err)?;
            for item in arr {
                encode_value(encoder, item)?;
            }
            Ok(())
        }
        Value::Map(entries) => {
            encoder.push(Header::Map(Some(entries.len()))).map_err(encode_err)?;
            for (k, v) in entries {
                encode_value(encoder, k)?;
                encode_value(encoder, v)?;
            }
            Ok(())
        }
        _ => Err(EnvelopeError::EncodingError(
            "unsupported CBOR value type".into(),
        )),
    }
}

/// Encode an integer (major types 0 and 1, bignum tags beyond 64 bits).
fn encode_integer(encoder: &mut Encoder<&mut Vec<u8>>, i: Integer) -> Result<(), EnvelopeError> {
    let n: i128 = i.into();

    if n >= 0 {
        match u64::try_from(n) {
            Ok(u) => encoder.push(Header::Positive(u)).map_err(encode_err),
            Err(_) => encode_bignum(encoder, tag::BIGPOS, n as u128),
        }
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u128;
        match u64::try_from(abs) {
            Ok(u) => encoder.push(Header::Negative(u)).map_err(encode_err),
            Err(_) => encode_bignum(encoder, tag::BIGNEG, abs),
        }
    }
}

fn encode_bignum(
    encoder: &mut Encoder<&mut Vec<u8>>,
    tag_number: u64,
    magnitude: u128,
) -> Result<(), EnvelopeError> {
    let bytes = magnitude.to_be_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    encoder.push(Header::Tag(tag_number)).map_err(encode_err)?;
    encoder.bytes(&bytes[start..], None).map_err(encode_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn hello_map(mut map: StructuredMap) -> StructuredMap {
        map.insert("message", text("Hello, World!")).unwrap();
        map
    }

    fn unhex(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn test_indefinite_framing() {
        let map = hello_map(StructuredMap::indefinite());
        let bytes = map.to_bytes().unwrap();
        assert_eq!(
            hex::encode(bytes),
            "bf676d6573736167656d48656c6c6f2c20576f726c6421ff"
        );
    }

    #[test]
    fn test_definite_framing_tracks_len() {
        let mut map = hello_map(StructuredMap::definite());
        assert_eq!(map.to_bytes().unwrap()[0], 0xa1);

        map.insert("n", Value::Integer(1.into())).unwrap();
        assert_eq!(map.to_bytes().unwrap()[0], 0xa2);
    }

    #[test]
    fn test_decode_remembers_shape() {
        let indefinite = hello_map(StructuredMap::indefinite()).to_bytes().unwrap();
        let definite = hello_map(StructuredMap::definite()).to_bytes().unwrap();

        let a = decode(&indefinite).unwrap().into_map().unwrap();
        let b = decode(&definite).unwrap().into_map().unwrap();

        assert_eq!(a.encoding(), MapEncoding::Indefinite);
        assert_eq!(b.encoding(), MapEncoding::Definite);
        assert_eq!(a.fields(), b.fields());
    }

    #[test]
    fn test_reencode_is_identical() {
        let mut map = StructuredMap::indefinite();
        map.insert("a", Value::Integer(500.into())).unwrap();
        map.insert("b", Value::Integer((-24).into())).unwrap();
        map.insert("c", Value::Float(1.5)).unwrap();
        map.insert("d", Value::Bytes(vec![1, 2, 3])).unwrap();
        map.insert("e", Value::Array(vec![Value::Null, Value::Bool(true)]))
            .unwrap();
        map.insert(
            "f",
            Value::Map(vec![(text("inner"), Value::Tag(1, Box::new(Value::Integer(0.into()))))]),
        )
        .unwrap();

        let bytes = map.to_bytes().unwrap();
        let decoded = decode(&bytes).unwrap().into_map().unwrap();
        assert_eq!(decoded.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_producer_bytes_kept_verbatim() {
        // undefined, unassigned simple, nested indefinite map, non-minimal
        // integer, f64 that fits in f16, chunked text
        for payload in [
            "bf6161f7ff",
            "bf6161f0ff",
            "bf6161bfffff",
            "bf61611800ff",
            "bf6161fb3ff8000000000000ff",
            "bf61617f6161626263ffff",
            "a2616101616280",
        ] {
            let bytes = unhex(payload);
            let map = decode(&bytes).unwrap().into_map().unwrap();
            assert_eq!(hex::encode(map.to_bytes().unwrap()), payload);
        }
    }

    #[test]
    fn test_field_accessors() {
        let map = decode(&unhex("bf6161f7616201ff")).unwrap().into_map().unwrap();
        let fields = map.fields();

        assert_eq!(fields[0].key().as_deref(), Some("a"));
        assert_eq!(fields[0].value_bytes(), &[0xf7]);
        assert_eq!(fields[1].key_bytes(), &[0x61, b'b']);
        assert_eq!(fields[1].value().unwrap(), Value::Integer(1.into()));
        assert_eq!(map.get("b"), Some(Value::Integer(1.into())));
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut map = StructuredMap::indefinite();
        map.insert("z", Value::Integer(1.into())).unwrap();
        map.insert("a", Value::Integer(2.into())).unwrap();

        let bytes = map.to_bytes().unwrap();
        // 0xbf, "z" (0x61 0x7a), 1, "a" (0x61 0x61), 2, 0xff
        assert_eq!(bytes, vec![0xbf, 0x61, b'z', 0x01, 0x61, b'a', 0x02, 0xff]);
    }

    #[test]
    fn test_integer_encoding_smallest() {
        let cases: &[(i128, &[u8])] = &[
            (0, &[0x00]),
            (23, &[0x17]),
            (24, &[0x18, 24]),
            (255, &[0x18, 0xff]),
            (256, &[0x19, 0x01, 0x00]),
            (-1, &[0x20]),
            (-25, &[0x38, 24]),
        ];

        for (n, expected) in cases {
            let item = Item::Value(Value::Integer((*n as i64).into()));
            assert_eq!(item.to_bytes().unwrap(), expected.to_vec(), "n = {n}");
        }
    }

    #[test]
    fn test_fixed_capacity_rejects_and_preserves() {
        let mut map = hello_map(StructuredMap::fixed(1));
        let before = map.clone();

        let err = map.insert("extra", Value::Null).unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::CapacityExceeded { ref key, capacity: 1 } if key == "extra"
        ));
        assert_eq!(map, before);
    }

    #[test]
    fn test_get_returns_first_match() {
        let mut map = StructuredMap::indefinite();
        map.insert("k", Value::Integer(1.into())).unwrap();
        map.insert("k", Value::Integer(2.into())).unwrap();
        assert_eq!(map.get("k"), Some(Value::Integer(1.into())));
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn test_value_map_is_a_definite_map() {
        let item = Item::Value(Value::Map(vec![(text("k"), Value::Integer(1.into()))]));
        let map = item.into_map().unwrap();
        assert_eq!(map.encoding(), MapEncoding::Definite);
        assert_eq!(hex::encode(map.to_bytes().unwrap()), "a1616b01");
    }

    #[test]
    fn test_decode_errors() {
        for bad in [
            "",       // empty
            "bf6161", // truncated indefinite map
            "a000",   // trailing garbage
            "a16161", // definite map missing a value
            "bf62ff", // text shorter than its length
            "bf6161ff", // break where a value belongs
            "bf7f01ffff", // integer inside a chunked text
        ] {
            assert!(
                matches!(decode(&unhex(bad)), Err(EnvelopeError::DecodingError(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_nesting_limit() {
        let mut bytes = vec![0xbf, 0x61, b'a'];
        bytes.extend(std::iter::repeat(0x81).take(MAX_DEPTH + 1));
        bytes.extend([0x00, 0xff]);
        assert!(matches!(decode(&bytes), Err(EnvelopeError::DecodingError(_))));
    }

    #[test]
    fn test_non_map_items() {
        let item = decode(&[0x63, b'a', b'b', b'c']).unwrap();
        assert_eq!(item.type_name(), "text");
        assert!(matches!(
            item.into_map(),
            Err(EnvelopeError::NotAMap { found: "text" })
        ));

        // A tagged map is a tag, not a map.
        let tagged = decode(&[0xc1, 0xa0]).unwrap();
        assert_eq!(tagged.type_name(), "tag");
    }

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(|i| Value::Integer(i.into())),
            any::<u64>().prop_map(|u| Value::Integer(u.into())),
            ".{0,16}".prop_map(Value::Text),
            prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
            any::<bool>().prop_map(Value::Bool),
            Just(Value::Null),
        ]
    }

    fn entries() -> impl Strategy<Value = Vec<(String, Value)>> {
        prop::collection::vec(("[a-z]{1,8}", scalar()), 0..8)
    }

    fn build(encoding: MapEncoding, entries: &[(String, Value)]) -> StructuredMap {
        let mut map = match encoding {
            MapEncoding::Definite => StructuredMap::definite(),
            MapEncoding::Indefinite => StructuredMap::indefinite(),
        };
        for (k, v) in entries {
            map.insert(k.clone(), v.clone()).unwrap();
        }
        map
    }

    proptest! {
        #[test]
        fn test_encoding_is_deterministic(pairs in entries(), indefinite in any::<bool>()) {
            let encoding = if indefinite { MapEncoding::Indefinite } else { MapEncoding::Definite };
            let a = build(encoding, &pairs).to_bytes().unwrap();
            let b = build(encoding, &pairs).to_bytes().unwrap();
            prop_assert_eq!(&a, &b);

            let decoded = decode(&a).unwrap().into_map().unwrap();
            prop_assert_eq!(decoded.encoding(), encoding);
            prop_assert_eq!(decoded.to_bytes().unwrap(), a);
            for (field, (k, v)) in decoded.fields().iter().zip(&pairs) {
                let key = field.key();
                prop_assert_eq!(key.as_deref(), Some(k.as_str()));
                prop_assert_eq!(&field.value().unwrap(), v);
            }
        }

        #[test]
        fn test_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            if let Ok(Item::Map(map)) = decode(&bytes) {
                let fields: usize = map.fields().iter().map(|f| f.as_bytes().len()).sum();
                prop_assert!(fields < bytes.len());
            }
        }
    }
}

//! Component D: drive user `Decodable` callbacks over a scanned tree (spec §4.D).
//!
//! Container shapes mirror the teacher's three-way split of builder responsibilities
//! (`ArrayWriter`/`DictWriter`/single `write_*` methods in `builder/mod.rs`), mirrored here for
//! the opposite direction: `UnkeyedDecodingContainer`/`KeyedDecodingContainer`/
//! `SingleValueDecodingContainer`.

use std::collections::HashSet;
use std::marker::PhantomData;

use crate::codable::Decodable;
use crate::error::{CodingPath, CodingPathElement, DecodingError};
use crate::key::{CodingKey, SUPER_KEY};
use crate::scan::{ArgBytes, LitKind, Scanned, Scanner};

fn is_nil(scanned: &Scanned) -> bool {
    matches!(scanned.untagged(), Scanned::Literal(LitKind::Nil))
}

fn coerce_bool(scanned: &Scanned, path: &CodingPath) -> Result<bool, DecodingError> {
    match scanned.untagged() {
        Scanned::Literal(LitKind::Bool(b)) => Ok(*b),
        _ => Err(DecodingError::type_mismatch("bool", path.clone())),
    }
}

fn coerce_string(scanned: &Scanned, path: &CodingPath) -> Result<String, DecodingError> {
    match scanned.untagged() {
        Scanned::Literal(LitKind::Str(bytes)) => String::from_utf8(bytes.clone())
            .map_err(|e| DecodingError::data_corrupted(format!("invalid utf-8: {}", e), path.clone())),
        _ => Err(DecodingError::type_mismatch("string", path.clone())),
    }
}

fn coerce_bytes(scanned: &Scanned, path: &CodingPath) -> Result<Vec<u8>, DecodingError> {
    match scanned.untagged() {
        Scanned::Literal(LitKind::Bin(bytes)) => Ok(bytes.clone()),
        _ => Err(DecodingError::type_mismatch("bytes", path.clone())),
    }
}

// `truncating_bits`: keep the low `$t::BITS` bits of the wire argument, matching spec.md
// §4.D's `truncatingBits(v, W)` — a non-failing narrowing conversion, not a validated one.
macro_rules! uint_coercer {
    ($name:ident, $t:ty) => {
        fn $name(scanned: &Scanned, path: &CodingPath) -> Result<$t, DecodingError> {
            match scanned.untagged() {
                Scanned::Literal(LitKind::UInt(arg)) => Ok(arg.to_u64() as $t),
                _ => Err(DecodingError::type_mismatch(stringify!($t), path.clone())),
            }
        }
    };
}

macro_rules! int_coercer {
    ($name:ident, $t:ty) => {
        fn $name(scanned: &Scanned, path: &CodingPath) -> Result<$t, DecodingError> {
            match scanned.untagged() {
                Scanned::Literal(LitKind::UInt(arg)) => Ok(arg.to_u64() as $t),
                // wire argument n represents -1-n; bitwise complement recovers it exactly
                // once n is truncated to the target width (spec §8.3).
                Scanned::Literal(LitKind::NInt(arg)) => Ok(!(arg.to_u64() as $t)),
                _ => Err(DecodingError::type_mismatch(stringify!($t), path.clone())),
            }
        }
    };
}

uint_coercer!(coerce_u8, u8);
uint_coercer!(coerce_u16, u16);
uint_coercer!(coerce_u32, u32);
uint_coercer!(coerce_u64, u64);
int_coercer!(coerce_i8, i8);
int_coercer!(coerce_i16, i16);
int_coercer!(coerce_i32, i32);
int_coercer!(coerce_i64, i64);

fn float_bits(arg: &ArgBytes) -> u64 {
    arg.bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
}

fn coerce_f64(scanned: &Scanned, path: &CodingPath) -> Result<f64, DecodingError> {
    match scanned.untagged() {
        Scanned::Literal(LitKind::Float16(arg)) => {
            Ok(half::f16::from_bits(float_bits(arg) as u16).to_f64())
        }
        Scanned::Literal(LitKind::Float32(arg)) => Ok(f32::from_bits(float_bits(arg) as u32) as f64),
        Scanned::Literal(LitKind::Float64(arg)) => Ok(f64::from_bits(float_bits(arg))),
        _ => Err(DecodingError::type_mismatch("f64", path.clone())),
    }
}

fn coerce_f32(scanned: &Scanned, path: &CodingPath) -> Result<f32, DecodingError> {
    match scanned.untagged() {
        Scanned::Literal(LitKind::Float16(arg)) => {
            Ok(half::f16::from_bits(float_bits(arg) as u16).to_f32())
        }
        Scanned::Literal(LitKind::Float32(arg)) => Ok(f32::from_bits(float_bits(arg) as u32)),
        _ => Err(DecodingError::type_mismatch("f32", path.clone())),
    }
}

/// Unlike `coerce_f32`/`coerce_f64`, this does not up-convert from a wider wire width: `f16` is
/// already the narrowest float variant, so only an on-wire `Float16` is accepted.
fn coerce_f16(scanned: &Scanned, path: &CodingPath) -> Result<half::f16, DecodingError> {
    match scanned.untagged() {
        Scanned::Literal(LitKind::Float16(arg)) => Ok(half::f16::from_bits(float_bits(arg) as u16)),
        _ => Err(DecodingError::type_mismatch("f16", path.clone())),
    }
}

/// Validate `T::TAG` against the scanned value (if `T` declares one) and drive `T::decode`.
/// Shared by the single-value, keyed, and unkeyed containers so the tag check happens in
/// exactly one place (spec §4.D "tagged user type" row).
pub(crate) fn decode_tagged<T: Decodable>(
    scanned: &Scanned,
    path: CodingPath,
) -> Result<T, DecodingError> {
    if let Some(expected) = T::TAG {
        match scanned {
            Scanned::Tagged { tag, .. } if *tag == expected => {}
            Scanned::Tagged { .. } => {
                return Err(DecodingError::data_corrupted(
                    "tag number does not match the expected tag",
                    path,
                ))
            }
            _ => {
                return Err(DecodingError::data_corrupted(
                    "expected a tagged value",
                    path,
                ))
            }
        }
    }
    let mut decoder = ValueDecoder {
        value: scanned,
        path,
    };
    T::decode(&mut decoder)
}

/// Entry point handed to a user `Decodable::decode` implementation.
pub struct ValueDecoder<'a> {
    value: &'a Scanned,
    path: CodingPath,
}

impl<'a> ValueDecoder<'a> {
    pub(crate) fn with_path(value: &'a Scanned, path: CodingPath) -> Self {
        Self { value, path }
    }

    pub fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    pub fn keyed_container<K: CodingKey>(&self) -> Result<KeyedDecodingContainer<'a, K>, DecodingError> {
        match self.value.untagged() {
            Scanned::Map(items) => {
                let mut entries = Vec::with_capacity(items.len() / 2);
                let mut seen = HashSet::new();
                for pair in items.chunks(2) {
                    let key = coerce_string(&pair[0], &self.path)?;
                    // first occurrence wins on duplicate keys (spec §9)
                    if seen.insert(key.clone()) {
                        entries.push((key, &pair[1]));
                    }
                }
                Ok(KeyedDecodingContainer {
                    entries,
                    path: self.path.clone(),
                    _marker: PhantomData,
                })
            }
            Scanned::None => Ok(KeyedDecodingContainer {
                entries: Vec::new(),
                path: self.path.clone(),
                _marker: PhantomData,
            }),
            _ => Err(DecodingError::type_mismatch("map", self.path.clone())),
        }
    }

    pub fn unkeyed_container(&self) -> Result<UnkeyedDecodingContainer<'a>, DecodingError> {
        match self.value.untagged() {
            Scanned::Array(items) => Ok(UnkeyedDecodingContainer {
                items: items.as_slice(),
                index: 0,
                path: self.path.clone(),
            }),
            // a map coerces to an alternating key, value sequence (spec §4.D unkeyed container)
            Scanned::Map(items) => Ok(UnkeyedDecodingContainer {
                items: items.as_slice(),
                index: 0,
                path: self.path.clone(),
            }),
            Scanned::None => Ok(UnkeyedDecodingContainer {
                items: &[],
                index: 0,
                path: self.path.clone(),
            }),
            _ => Err(DecodingError::type_mismatch("array", self.path.clone())),
        }
    }

    pub fn single_value_container(&self) -> SingleValueDecodingContainer<'a> {
        SingleValueDecodingContainer {
            value: self.value,
            path: self.path.clone(),
        }
    }
}

/// Decoder context for a primitive or a single nested `Decodable` value.
pub struct SingleValueDecodingContainer<'a> {
    value: &'a Scanned,
    path: CodingPath,
}

macro_rules! single_primitive {
    ($name:ident, $t:ty, $coerce:path) => {
        pub fn $name(&self) -> Result<$t, DecodingError> {
            $coerce(self.value, &self.path)
        }
    };
}

impl<'a> SingleValueDecodingContainer<'a> {
    pub fn decode_nil(&self) -> bool {
        is_nil(self.value)
    }

    single_primitive!(decode_bool, bool, coerce_bool);
    single_primitive!(decode_string, String, coerce_string);
    single_primitive!(decode_bytes, Vec<u8>, coerce_bytes);
    single_primitive!(decode_u8, u8, coerce_u8);
    single_primitive!(decode_u16, u16, coerce_u16);
    single_primitive!(decode_u32, u32, coerce_u32);
    single_primitive!(decode_u64, u64, coerce_u64);
    single_primitive!(decode_i8, i8, coerce_i8);
    single_primitive!(decode_i16, i16, coerce_i16);
    single_primitive!(decode_i32, i32, coerce_i32);
    single_primitive!(decode_i64, i64, coerce_i64);
    single_primitive!(decode_f16, half::f16, coerce_f16);
    single_primitive!(decode_f32, f32, coerce_f32);
    single_primitive!(decode_f64, f64, coerce_f64);

    pub fn decode<T: Decodable>(&self) -> Result<T, DecodingError> {
        decode_tagged::<T>(self.value, self.path.clone())
    }
}

/// Decoder context for a CBOR map, exposed by key name.
pub struct KeyedDecodingContainer<'a, K> {
    entries: Vec<(String, &'a Scanned)>,
    path: CodingPath,
    _marker: PhantomData<K>,
}

macro_rules! keyed_primitive {
    ($name:ident, $t:ty, $coerce:path) => {
        pub fn $name(&self, key: &K) -> Result<$t, DecodingError> {
            let path = self.path_for(key);
            let value = self.require(key, &path)?;
            $coerce(value, &path)
        }
    };
}

impl<'a, K: CodingKey> KeyedDecodingContainer<'a, K> {
    fn find(&self, key: &K) -> Option<&'a Scanned> {
        let name = key.string_value();
        self.entries.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }

    fn path_for(&self, key: &K) -> CodingPath {
        let mut path = self.path.clone();
        path.push(CodingPathElement::Key(key.string_value()));
        path
    }

    fn require(&self, key: &K, path: &CodingPath) -> Result<&'a Scanned, DecodingError> {
        self.find(key)
            .ok_or_else(|| DecodingError::key_not_found(key.string_value(), path.clone()))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys present on the wire, in first-occurrence order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn decode_nil(&self, key: &K) -> Result<bool, DecodingError> {
        let path = self.path_for(key);
        Ok(is_nil(self.require(key, &path)?))
    }

    keyed_primitive!(decode_bool, bool, coerce_bool);
    keyed_primitive!(decode_string, String, coerce_string);
    keyed_primitive!(decode_bytes, Vec<u8>, coerce_bytes);
    keyed_primitive!(decode_u8, u8, coerce_u8);
    keyed_primitive!(decode_u16, u16, coerce_u16);
    keyed_primitive!(decode_u32, u32, coerce_u32);
    keyed_primitive!(decode_u64, u64, coerce_u64);
    keyed_primitive!(decode_i8, i8, coerce_i8);
    keyed_primitive!(decode_i16, i16, coerce_i16);
    keyed_primitive!(decode_i32, i32, coerce_i32);
    keyed_primitive!(decode_i64, i64, coerce_i64);
    keyed_primitive!(decode_f16, half::f16, coerce_f16);
    keyed_primitive!(decode_f32, f32, coerce_f32);
    keyed_primitive!(decode_f64, f64, coerce_f64);

    pub fn decode<T: Decodable>(&self, key: &K) -> Result<T, DecodingError> {
        let path = self.path_for(key);
        let value = self.require(key, &path)?;
        decode_tagged::<T>(value, path)
    }

    pub fn decode_if_present<T: Decodable>(&self, key: &K) -> Result<Option<T>, DecodingError> {
        match self.find(key) {
            None => Ok(None),
            Some(value) if is_nil(value) => Ok(None),
            Some(value) => decode_tagged::<T>(value, self.path_for(key)).map(Some),
        }
    }

    pub fn nested_keyed_container<K2: CodingKey>(
        &self,
        key: &K,
    ) -> Result<KeyedDecodingContainer<'a, K2>, DecodingError> {
        let path = self.path_for(key);
        let value = self.require(key, &path)?;
        ValueDecoder::with_path(value, path).keyed_container()
    }

    pub fn nested_unkeyed_container(
        &self,
        key: &K,
    ) -> Result<UnkeyedDecodingContainer<'a>, DecodingError> {
        let path = self.path_for(key);
        let value = self.require(key, &path)?;
        ValueDecoder::with_path(value, path).unkeyed_container()
    }

    pub fn super_decoder(&self) -> Result<ValueDecoder<'a>, DecodingError> {
        let mut path = self.path.clone();
        path.push(CodingPathElement::Key(SUPER_KEY.to_string()));
        let value = self
            .entries
            .iter()
            .find(|(k, _)| k == SUPER_KEY)
            .map(|(_, v)| *v)
            .ok_or_else(|| DecodingError::key_not_found(SUPER_KEY, path.clone()))?;
        Ok(ValueDecoder::with_path(value, path))
    }

    pub fn super_decoder_for_key(&self, key: &K) -> Result<ValueDecoder<'a>, DecodingError> {
        let path = self.path_for(key);
        let value = self.require(key, &path)?;
        Ok(ValueDecoder::with_path(value, path))
    }
}

/// Decoder context for a CBOR array, consumed front to back.
pub struct UnkeyedDecodingContainer<'a> {
    items: &'a [Scanned],
    index: usize,
    path: CodingPath,
}

macro_rules! unkeyed_primitive {
    ($name:ident, $t:ty, $coerce:path) => {
        pub fn $name(&mut self) -> Result<$t, DecodingError> {
            let (value, path) = self.next()?;
            $coerce(value, &path)
        }
    };
}

impl<'a> UnkeyedDecodingContainer<'a> {
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.items.len()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    fn index_path(&self) -> CodingPath {
        let mut path = self.path.clone();
        path.push(CodingPathElement::Index(self.index));
        path
    }

    fn next(&mut self) -> Result<(&'a Scanned, CodingPath), DecodingError> {
        if self.is_at_end() {
            return Err(DecodingError::value_not_found(self.index_path()));
        }
        let path = self.index_path();
        let value = &self.items[self.index];
        self.index += 1;
        Ok((value, path))
    }

    /// Consumes the current slot only if it is `nil`, mirroring the container's Swift
    /// ancestor: a `false` result leaves the cursor in place so the caller can still decode
    /// the concrete value next.
    pub fn decode_nil(&mut self) -> Result<bool, DecodingError> {
        if self.is_at_end() {
            return Err(DecodingError::value_not_found(self.index_path()));
        }
        let nil = is_nil(&self.items[self.index]);
        if nil {
            self.index += 1;
        }
        Ok(nil)
    }

    unkeyed_primitive!(decode_bool, bool, coerce_bool);
    unkeyed_primitive!(decode_string, String, coerce_string);
    unkeyed_primitive!(decode_bytes, Vec<u8>, coerce_bytes);
    unkeyed_primitive!(decode_u8, u8, coerce_u8);
    unkeyed_primitive!(decode_u16, u16, coerce_u16);
    unkeyed_primitive!(decode_u32, u32, coerce_u32);
    unkeyed_primitive!(decode_u64, u64, coerce_u64);
    unkeyed_primitive!(decode_i8, i8, coerce_i8);
    unkeyed_primitive!(decode_i16, i16, coerce_i16);
    unkeyed_primitive!(decode_i32, i32, coerce_i32);
    unkeyed_primitive!(decode_i64, i64, coerce_i64);
    unkeyed_primitive!(decode_f16, half::f16, coerce_f16);
    unkeyed_primitive!(decode_f32, f32, coerce_f32);
    unkeyed_primitive!(decode_f64, f64, coerce_f64);

    pub fn decode<T: Decodable>(&mut self) -> Result<T, DecodingError> {
        let (value, path) = self.next()?;
        decode_tagged::<T>(value, path)
    }

    pub fn nested_keyed_container<K: CodingKey>(
        &mut self,
    ) -> Result<KeyedDecodingContainer<'a, K>, DecodingError> {
        let (value, path) = self.next()?;
        ValueDecoder::with_path(value, path).keyed_container()
    }

    pub fn nested_unkeyed_container(&mut self) -> Result<UnkeyedDecodingContainer<'a>, DecodingError> {
        let (value, path) = self.next()?;
        ValueDecoder::with_path(value, path).unkeyed_container()
    }

    pub fn super_decoder(&mut self) -> Result<ValueDecoder<'a>, DecodingError> {
        let (value, path) = self.next()?;
        Ok(ValueDecoder::with_path(value, path))
    }
}

/// Top-level decoding entry point (spec §6.2).
#[derive(Debug, Default, Clone, Copy)]
pub struct Decoder;

impl Decoder {
    pub fn new() -> Self {
        Decoder
    }

    pub fn decode<T: Decodable>(&self, bytes: &[u8]) -> Result<T, DecodingError> {
        let mut scanner = Scanner::new(bytes);
        let scanned = scanner
            .scan()
            .map_err(|e| DecodingError::data_corrupted(e.message, Vec::new()))?;
        scanner
            .expect_exhausted()
            .map_err(|e| DecodingError::data_corrupted(e.message, Vec::new()))?;
        decode_tagged::<T>(&scanned, Vec::new())
    }
}

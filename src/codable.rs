//! Component G: the `Encodable`/`Decodable` capability traits, and the primitive impls every
//! derived or hand-written type builds on.
//!
//! Grounded on the teacher's `codec.rs` (`WriteCbor`/`ReadCbor` blanket impls over primitives
//! and collections, including the tuple macro), retargeted at this crate's container-based
//! bridge instead of the teacher's closure/`Visitor` pair.

use std::collections::{BTreeMap, HashMap};

use crate::decoder::ValueDecoder;
use crate::encoder::ValueEncoder;
use crate::error::{DecodingError, EncodingError};

/// A type that can write itself into a [`ValueEncoder`].
///
/// `TAG` folds the spec's separate "tagged value" capability into this trait via a defaulted
/// associated constant: stable Rust has no specialization to let a `Tagged<T>` wrapper coexist
/// cleanly with a blanket `impl<T: Encodable> Encodable for Tagged<T>`, so a type that always
/// wants to be wrapped in a CBOR tag overrides `TAG` instead of implementing a second trait.
pub trait Encodable {
    /// The CBOR tag (major type 6) this type's wire representation is wrapped in, or `None` to
    /// write a bare, untagged item.
    const TAG: Option<u64> = None;

    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError>;
}

/// A type that can read itself out of a [`ValueDecoder`]. See [`Encodable::TAG`].
pub trait Decodable: Sized {
    const TAG: Option<u64> = None;

    fn decode(decoder: &mut ValueDecoder) -> Result<Self, DecodingError>;
}

impl Encodable for bool {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
        encoder.single_value_container().encode_bool(*self);
        Ok(())
    }
}

impl Decodable for bool {
    fn decode(decoder: &mut ValueDecoder) -> Result<Self, DecodingError> {
        decoder.single_value_container().decode_bool()
    }
}

macro_rules! int_codable {
    ($t:ty, $encode_method:ident, $decode_method:ident) => {
        impl Encodable for $t {
            fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
                encoder.single_value_container().$encode_method(*self);
                Ok(())
            }
        }

        impl Decodable for $t {
            fn decode(decoder: &mut ValueDecoder) -> Result<Self, DecodingError> {
                decoder.single_value_container().$decode_method()
            }
        }
    };
}

int_codable!(u8, encode_u8, decode_u8);
int_codable!(u16, encode_u16, decode_u16);
int_codable!(u32, encode_u32, decode_u32);
int_codable!(u64, encode_u64, decode_u64);
int_codable!(i8, encode_i8, decode_i8);
int_codable!(i16, encode_i16, decode_i16);
int_codable!(i32, encode_i32, decode_i32);
int_codable!(i64, encode_i64, decode_i64);
int_codable!(f32, encode_f32, decode_f32);
int_codable!(f64, encode_f64, decode_f64);

/// Restricted to the on-wire `Float16` variant on decode (no up-conversion from a wider wire
/// float) — `f16` is the narrowest float width the format has, so anything wider is a genuine
/// type mismatch rather than a value this type could represent.
impl Encodable for half::f16 {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
        encoder.single_value_container().encode_f16(*self);
        Ok(())
    }
}

impl Decodable for half::f16 {
    fn decode(decoder: &mut ValueDecoder) -> Result<Self, DecodingError> {
        decoder.single_value_container().decode_f16()
    }
}

impl Encodable for String {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
        encoder.single_value_container().encode_string(self);
        Ok(())
    }
}

impl Decodable for String {
    fn decode(decoder: &mut ValueDecoder) -> Result<Self, DecodingError> {
        decoder.single_value_container().decode_string()
    }
}

impl Encodable for str {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
        encoder.single_value_container().encode_string(self);
        Ok(())
    }
}

/// A dedicated byte-string wrapper, since a bare `Vec<u8>` is ambiguous between "CBOR byte
/// string" and "CBOR array of small integers" — `Encodable`/`Decodable` resolve that ambiguity
/// by only implementing the byte-string reading for this newtype, leaving `Vec<u8>` itself to
/// the blanket `Vec<T>` array impl below.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bytes(pub Vec<u8>);

impl Encodable for Bytes {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
        encoder.single_value_container().encode_bytes(&self.0);
        Ok(())
    }
}

impl Decodable for Bytes {
    fn decode(decoder: &mut ValueDecoder) -> Result<Self, DecodingError> {
        decoder.single_value_container().decode_bytes().map(Bytes)
    }
}

impl<T: Encodable> Encodable for Option<T> {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
        match self {
            None => {
                encoder.single_value_container().encode_nil();
                Ok(())
            }
            Some(value) => value.encode(encoder),
        }
    }
}

impl<T: Decodable> Decodable for Option<T> {
    fn decode(decoder: &mut ValueDecoder) -> Result<Self, DecodingError> {
        if decoder.single_value_container().decode_nil() {
            Ok(None)
        } else {
            T::decode(decoder).map(Some)
        }
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
        let mut array = encoder.unkeyed_container();
        for item in self {
            array.encode(item)?;
        }
        Ok(())
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn decode(decoder: &mut ValueDecoder) -> Result<Self, DecodingError> {
        let mut array = decoder.unkeyed_container()?;
        let mut out = Vec::with_capacity(array.count());
        while !array.is_at_end() {
            out.push(array.decode()?);
        }
        Ok(out)
    }
}

impl<T: Encodable> Encodable for [T] {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
        let mut array = encoder.unkeyed_container();
        for item in self {
            array.encode(item)?;
        }
        Ok(())
    }
}

/// An order-preserving string-keyed map, for callers who need deterministic key order on the
/// wire (`BTreeMap`/`HashMap` below sort or hash their keys instead).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V: Encodable> Encodable for OrderedMap<V> {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
        let mut map = encoder.keyed_container::<String>();
        for (key, value) in &self.0 {
            map.encode(key, value)?;
        }
        Ok(())
    }
}

impl<V: Decodable> Decodable for OrderedMap<V> {
    fn decode(decoder: &mut ValueDecoder) -> Result<Self, DecodingError> {
        let map = decoder.keyed_container::<String>()?;
        let mut out = Vec::new();
        for key in map.keys() {
            out.push((key.clone(), map.decode(key)?));
        }
        Ok(OrderedMap(out))
    }
}

impl<V: Encodable> Encodable for BTreeMap<String, V> {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
        let mut map = encoder.keyed_container::<String>();
        for (key, value) in self {
            map.encode(key, value)?;
        }
        Ok(())
    }
}

impl<V: Decodable> Decodable for BTreeMap<String, V> {
    fn decode(decoder: &mut ValueDecoder) -> Result<Self, DecodingError> {
        let map = decoder.keyed_container::<String>()?;
        let mut out = BTreeMap::new();
        for key in map.keys() {
            out.insert(key.clone(), map.decode(key)?);
        }
        Ok(out)
    }
}

impl<V: Encodable> Encodable for HashMap<String, V> {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
        let mut map = encoder.keyed_container::<String>();
        for (key, value) in self {
            map.encode(key, value)?;
        }
        Ok(())
    }
}

impl<V: Decodable> Decodable for HashMap<String, V> {
    fn decode(decoder: &mut ValueDecoder) -> Result<Self, DecodingError> {
        let map = decoder.keyed_container::<String>()?;
        let mut out = HashMap::with_capacity(map.len());
        for key in map.keys() {
            out.insert(key.clone(), map.decode(key)?);
        }
        Ok(out)
    }
}

/// Encode/decode a fixed-size tuple as a CBOR array, one element per slot.
///
/// Mirrors the teacher's `codec.rs` tuple macro: one invocation per arity, each adding the
/// next type parameter, so the generated impls cover 1..=8-element tuples without duplicating
/// the body by hand.
macro_rules! tuple_codable {
    ($($name:ident)+) => {
        impl<$($name: Encodable),+> Encodable for ($($name,)+) {
            #[allow(non_snake_case)]
            fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), EncodingError> {
                let ($(ref $name,)+) = *self;
                let mut array = encoder.unkeyed_container();
                $(array.encode($name)?;)+
                Ok(())
            }
        }

        impl<$($name: Decodable),+> Decodable for ($($name,)+) {
            #[allow(non_snake_case)]
            fn decode(decoder: &mut ValueDecoder) -> Result<Self, DecodingError> {
                let mut array = decoder.unkeyed_container()?;
                $(let $name: $name = array.decode()?;)+
                Ok(($($name,)+))
            }
        }
    };
}

tuple_codable!(A);
tuple_codable!(A B);
tuple_codable!(A B C);
tuple_codable!(A B C D);
tuple_codable!(A B C D E);
tuple_codable!(A B C D E F);
tuple_codable!(A B C D E F G);
tuple_codable!(A B C D E F G H);

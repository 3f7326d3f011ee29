use std::collections::BTreeMap;

use cbor_codable::{Bytes, Decodable, Decoder, Encodable, Encoder, OrderedMap, ValueDecoder, ValueEncoder};
use pretty_assertions::assert_eq;
use rand::Rng;

fn round_trip<T: Encodable + Decodable + PartialEq + std::fmt::Debug>(value: T) {
    let bytes = Encoder::new().encode(&value).unwrap();
    let decoded: T = Decoder::new().decode(&bytes).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn primitives_round_trip() {
    round_trip(true);
    round_trip(false);
    round_trip(0u8);
    round_trip(u8::MAX);
    round_trip(0i64);
    round_trip(i64::MIN);
    round_trip(i64::MAX);
    round_trip(1.5f64);
    round_trip(String::new());
    round_trip("hello world".to_string());
    round_trip(Bytes(vec![0xde, 0xad, 0xbe, 0xef]));
}

#[test]
fn f16_round_trips() {
    round_trip(half::f16::from_f64(1.5));
    round_trip(half::f16::MAX);
    round_trip(half::f16::MIN);
}

#[test]
fn nan_round_trips_bit_exact() {
    let bytes = Encoder::new().encode(&f64::NAN).unwrap();
    let decoded: f64 = Decoder::new().decode(&bytes).unwrap();
    assert!(decoded.is_nan());
    assert_eq!(decoded.to_bits(), f64::NAN.to_bits());
}

#[test]
fn option_round_trips_both_variants() {
    round_trip(None::<u64>);
    round_trip(Some(5u64));
}

#[test]
fn arrays_round_trip() {
    round_trip(Vec::<u64>::new());
    round_trip(vec![1u64, 2, 3]);
    round_trip(vec![vec![1i32], vec![2, 3]]);
}

#[test]
fn empty_map_round_trips() {
    round_trip(BTreeMap::<String, u64>::new());
}

#[test]
fn maps_round_trip() {
    let mut map = BTreeMap::new();
    map.insert("a".to_string(), 1u64);
    map.insert("b".to_string(), 2u64);
    round_trip(map);
}

#[test]
fn ordered_map_preserves_insertion_order() {
    let ordered = OrderedMap(vec![
        ("z".to_string(), 1u64),
        ("a".to_string(), 2u64),
    ]);
    let bytes = Encoder::new().encode(&ordered).unwrap();
    let decoded: OrderedMap<u64> = Decoder::new().decode(&bytes).unwrap();
    assert_eq!(decoded.0, ordered.0);
}

#[test]
fn tuples_round_trip() {
    round_trip((1u64, "two".to_string(), 3i32));
}

struct Base {
    id: u64,
}

impl Encodable for Base {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), cbor_codable::EncodingError> {
        let mut map = encoder.keyed_container::<&str>();
        map.encode_u64(&"id", self.id);
        Ok(())
    }
}

impl Decodable for Base {
    fn decode(decoder: &mut ValueDecoder) -> Result<Self, cbor_codable::DecodingError> {
        let map = decoder.keyed_container::<&str>()?;
        Ok(Base {
            id: map.decode_u64(&"id")?,
        })
    }
}

struct Derived {
    base: Base,
    extra: u64,
}

impl Encodable for Derived {
    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), cbor_codable::EncodingError> {
        let mut map = encoder.keyed_container::<&str>();
        {
            let mut base_encoder = map.super_encoder();
            self.base.encode(&mut base_encoder)?;
        }
        map.encode_u64(&"extra", self.extra);
        Ok(())
    }
}

impl Decodable for Derived {
    fn decode(decoder: &mut ValueDecoder) -> Result<Self, cbor_codable::DecodingError> {
        let map = decoder.keyed_container::<&str>()?;
        let mut base_decoder = map.super_decoder()?;
        Ok(Derived {
            base: Base::decode(&mut base_decoder)?,
            extra: map.decode_u64(&"extra")?,
        })
    }
}

#[test]
fn super_encoder_round_trips_an_inheritance_chain() {
    let value = Derived {
        base: Base { id: 1 },
        extra: 2,
    };
    let bytes = Encoder::new().encode(&value).unwrap();
    let decoded: Derived = Decoder::new().decode(&bytes).unwrap();
    assert_eq!(decoded.base.id, 1);
    assert_eq!(decoded.extra, 2);
}

struct Epoch(u64);

impl Encodable for Epoch {
    const TAG: Option<u64> = Some(1);

    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), cbor_codable::EncodingError> {
        encoder.single_value_container().encode_u64(self.0);
        Ok(())
    }
}

impl Decodable for Epoch {
    const TAG: Option<u64> = Some(1);

    fn decode(decoder: &mut ValueDecoder) -> Result<Self, cbor_codable::DecodingError> {
        decoder.single_value_container().decode_u64().map(Epoch)
    }
}

#[test]
fn tagged_values_round_trip_and_carry_the_tag_on_the_wire() {
    let bytes = Encoder::new().encode(&Epoch(1_700_000_000)).unwrap();
    assert_eq!(bytes[0], 0xc1, "tag 1 is encoded with a one-byte head");
    let decoded: Epoch = Decoder::new().decode(&bytes).unwrap();
    assert_eq!(decoded.0, 1_700_000_000);
}

#[test]
fn wrong_tag_is_rejected() {
    let bytes = Encoder::new().encode(&0u64).unwrap();
    let err = Decoder::new().decode::<Epoch>(&bytes).unwrap_err();
    assert!(matches!(
        err.kind(),
        cbor_codable::DecodingErrorKind::DataCorrupted(_)
    ));
}

/// Property test for spec §8.1: `decode(T, encode(v)) == v` for randomly generated values of
/// every primitive width, not just the hand-picked boundary values the vector tests cover.
#[test]
fn random_primitives_round_trip() {
    let mut rng = rand::thread_rng();
    for _ in 0..256 {
        round_trip(rng.gen::<bool>());
        round_trip(rng.gen::<u8>());
        round_trip(rng.gen::<u16>());
        round_trip(rng.gen::<u32>());
        round_trip(rng.gen::<u64>());
        round_trip(rng.gen::<i8>());
        round_trip(rng.gen::<i16>());
        round_trip(rng.gen::<i32>());
        round_trip(rng.gen::<i64>());
        round_trip(rng.gen::<f32>());
        round_trip(rng.gen::<f64>());

        let len = rng.gen_range(0..8);
        let s: String = (0..len).map(|_| rng.gen_range('a'..='z')).collect();
        round_trip(s);

        let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        round_trip(Bytes(bytes));

        let array: Vec<i64> = (0..len).map(|_| rng.gen()).collect();
        round_trip(array);
    }
}

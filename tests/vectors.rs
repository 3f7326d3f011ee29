use cbor_codable::{Decodable, Decoder, Encodable, Encoder, OrderedMap, ValueDecoder, ValueEncoder};
use pretty_assertions::assert_eq;

fn b(mut s: &str) -> Vec<u8> {
    let mut ret = vec![];
    while !s.is_empty() {
        let space = s.find(' ').unwrap_or(s.len());
        ret.push(u8::from_str_radix(&s[..space], 16).unwrap());
        s = &s[(space + 1).min(s.len())..];
    }
    ret
}

#[test]
fn bool_and_nil_vectors() {
    assert_eq!(Encoder::new().encode(&false).unwrap(), b("f4"));
    assert_eq!(Encoder::new().encode(&true).unwrap(), b("f5"));
    assert_eq!(Encoder::new().encode(&None::<String>).unwrap(), b("f6"));
}

#[test]
fn string_vectors() {
    assert_eq!(Encoder::new().encode(&String::new()).unwrap(), b("60"));
    assert_eq!(
        Encoder::new().encode(&"Hello World".to_string()).unwrap(),
        b("6b 48 65 6c 6c 6f 20 57 6f 72 6c 64")
    );
}

#[test]
fn array_vector() {
    assert_eq!(
        Encoder::new().encode(&vec![1u64, 2, 3]).unwrap(),
        b("83 01 02 03")
    );
}

#[test]
fn map_vector_preserves_insertion_order_and_minimal_widths() {
    let map = OrderedMap(vec![
        ("one".to_string(), 0x17u64),
        ("two".to_string(), 0xffu64),
        ("three".to_string(), 0xffffu64),
        ("four".to_string(), 0xffff_ffffu64),
        ("five".to_string(), u64::MAX),
    ]);
    let bytes = Encoder::new().encode(&map).unwrap();
    assert_eq!(
        bytes,
        b("a5 63 6f 6e 65 17 \
           63 74 77 6f 18 ff \
           65 74 68 72 65 65 19 ff ff \
           64 66 6f 75 72 1a ff ff ff ff \
           64 66 69 76 65 1b ff ff ff ff ff ff ff ff")
    );
}

#[test]
fn i64_min_vector() {
    assert_eq!(Encoder::new().encode(&i64::MIN).unwrap(), b("3b 7f ff ff ff ff ff ff ff"));
}

#[test]
fn indefinite_length_array_decodes_like_a_definite_one() {
    let decoded: Vec<u64> = Decoder::new().decode(&b("9f 01 02 03 ff")).unwrap();
    assert_eq!(decoded, vec![1, 2, 3]);
}

struct Opacity {
    a: u8,
}

impl Encodable for Opacity {
    const TAG: Option<u64> = Some(1);

    fn encode(&self, encoder: &mut ValueEncoder) -> Result<(), cbor_codable::EncodingError> {
        encoder.single_value_container().encode_u8(self.a);
        Ok(())
    }
}

impl Decodable for Opacity {
    const TAG: Option<u64> = Some(1);

    fn decode(decoder: &mut ValueDecoder) -> Result<Self, cbor_codable::DecodingError> {
        Ok(Opacity {
            a: decoder.single_value_container().decode_u8()?,
        })
    }
}

#[test]
fn tagged_struct_vector() {
    let bytes = Encoder::new().encode(&Opacity { a: 0x46 }).unwrap();
    assert_eq!(bytes, b("c1 18 46"));
    let decoded: Opacity = Decoder::new().decode(&bytes).unwrap();
    assert_eq!(decoded.a, 0x46);
}

#[test]
fn f16_max_finite_value_decodes() {
    let decoded: f64 = Decoder::new().decode(&b("f9 7b ff")).unwrap();
    assert_eq!(decoded, half::f16::MAX.to_f64());
}

#[test]
fn f64_nan_decodes_bit_exact() {
    let decoded: f64 = Decoder::new()
        .decode(&b("fb 7f f8 00 00 00 00 00 00"))
        .unwrap();
    assert!(decoded.is_nan());
}

#[test]
fn oversized_uint_truncates_to_the_target_width() {
    // UInt 256 (0x19 0100) truncated to u8 is 0, not an out-of-range error.
    let decoded: u8 = Decoder::new().decode(&b("19 01 00")).unwrap();
    assert_eq!(decoded, 0);
}

#[test]
fn truncated_definite_array_is_data_corrupted() {
    // array(3) header with only one element following
    let err = Decoder::new()
        .decode::<Vec<u64>>(&b("83 01"))
        .unwrap_err();
    assert!(matches!(
        err.kind(),
        cbor_codable::DecodingErrorKind::DataCorrupted(_)
    ));
}

#[test]
fn empty_map_round_trips_to_a0() {
    let map = std::collections::BTreeMap::<String, u64>::new();
    let bytes = Encoder::new().encode(&map).unwrap();
    assert_eq!(bytes, b("a0"));
}

#[test]
fn indefinite_byte_string_concatenates_its_chunks() {
    // 5F 42 0102 41 03 FF -> chunks [01, 02] and [03]
    let decoded: cbor_codable::Bytes = Decoder::new()
        .decode(&b("5f 42 01 02 41 03 ff"))
        .unwrap();
    assert_eq!(decoded.0, vec![0x01, 0x02, 0x03]);
}

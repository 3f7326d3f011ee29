use cbor_codable::{Decoder, Encoder};
use cbor_codable_derive::{Decodable, Encodable};
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
fn named_struct() {
    #[derive(Encodable, Decodable, PartialEq, Debug)]
    struct X {
        x: String,
        y: u64,
    }

    let bytes = Encoder::new().encode(&X { x: "hello".into(), y: 42 }).unwrap();
    assert_eq!(bytes, b("a2 61 78 65 68 65 6c 6c 6f 61 79 18 2a"));

    let x: X = Decoder::new().decode(&bytes).unwrap();
    assert_eq!(
        x,
        X {
            x: "hello".into(),
            y: 42
        }
    );
}

#[test]
fn missing_required_field_errors() {
    #[derive(Encodable, Decodable, PartialEq, Debug)]
    struct X {
        x: String,
        y: u64,
    }

    let err = Decoder::new()
        .decode::<X>(&b("a1 61 79 18 2a"))
        .unwrap_err();
    assert!(matches!(
        err.kind(),
        cbor_codable::DecodingErrorKind::KeyNotFound(k) if k == "x"
    ));
}

#[test]
fn rename_attribute_changes_the_wire_key() {
    #[derive(Encodable, Decodable, PartialEq, Debug)]
    struct X {
        #[cbor(rename = "n")]
        name: String,
    }

    let bytes = Encoder::new()
        .encode(&X {
            name: "a".to_string(),
        })
        .unwrap();
    assert_eq!(bytes, b("a1 61 6e 61 61"));
}

#[test]
fn optional_field_is_omitted_when_none() {
    #[derive(Encodable, Decodable, PartialEq, Debug)]
    struct X {
        required: u64,
        optional: Option<u64>,
    }

    let bytes = Encoder::new()
        .encode(&X {
            required: 1,
            optional: None,
        })
        .unwrap();
    // only "required" is written: map(1), "required", 1
    assert_eq!(bytes, b("a1 68 72 65 71 75 69 72 65 64 01"));

    let round_tripped: X = Decoder::new().decode(&bytes).unwrap();
    assert_eq!(
        round_tripped,
        X {
            required: 1,
            optional: None
        }
    );

    let with_some = Encoder::new()
        .encode(&X {
            required: 1,
            optional: Some(2),
        })
        .unwrap();
    let round_tripped: X = Decoder::new().decode(&with_some).unwrap();
    assert_eq!(
        round_tripped,
        X {
            required: 1,
            optional: Some(2)
        }
    );
}

#[test]
fn tag_attribute_wraps_the_struct_in_a_cbor_tag() {
    #[derive(Encodable, Decodable, PartialEq, Debug)]
    #[cbor(tag = 42)]
    struct Tagged {
        v: u64,
    }

    let bytes = Encoder::new().encode(&Tagged { v: 7 }).unwrap();
    // tag(42), map(1), "v", 7
    assert_eq!(bytes, b("d8 2a a1 61 76 07"));

    let round_tripped: Tagged = Decoder::new().decode(&bytes).unwrap();
    assert_eq!(round_tripped, Tagged { v: 7 });
}

#[test]
fn nested_struct_field() {
    #[derive(Encodable, Decodable, PartialEq, Debug)]
    struct Inner {
        a: u64,
    }

    #[derive(Encodable, Decodable, PartialEq, Debug)]
    struct Outer {
        inner: Inner,
        b: u64,
    }

    let value = Outer {
        inner: Inner { a: 1 },
        b: 2,
    };
    let bytes = Encoder::new().encode(&value).unwrap();
    let round_tripped: Outer = Decoder::new().decode(&bytes).unwrap();
    assert_eq!(round_tripped, value);
}

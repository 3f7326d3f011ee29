//! Component C (encode side) and component 4.C: the already-wire-shaped intermediate tree,
//! and the depth-first writer that flattens it to bytes.
//!
//! `write_head` is carried over nearly verbatim from the teacher's
//! `builder/low_level.rs::write_info` — it already is the spec's minimal-width integer
//! encoding (§4.C), just renamed to match this crate's vocabulary.

use crate::opcode::{MAJOR_ARRAY, MAJOR_MAP, MAJOR_TAG};

/// The intermediate encoded value tree (spec §3.2): each leaf is already a complete,
/// self-contained run of bytes, chosen once by the encoding bridge and never revisited.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    None,
    Literal(Vec<u8>),
    Array(Vec<Encoded>),
    /// flat, always even length: k0, v0, k1, v1, ...
    Map(Vec<Encoded>),
    Tagged { tag: Vec<u8>, value: Box<Encoded> },
}

/// Minimal-width head-byte encoding for `major | value` (spec §4.C / §8.2).
///
/// `v <= 23` → 1 byte; `v <= 0xff` → 2 bytes; `v <= 0xffff` → 3 bytes; `v <= 0xffff_ffff` → 5
/// bytes; otherwise 9 bytes. Total over all `u64` — the distilled source's `wrapUInt`/
/// `wrapString`/`wrapData` had a dangling "if v fits in Int.max" branch with no `else`; this
/// version has no such gap because it matches on the value itself rather than a signed range.
pub fn write_head(out: &mut Vec<u8>, major: u8, value: u64) {
    let major = major << 5;
    if value < 24 {
        out.push(major | value as u8);
    } else if value <= u8::MAX as u64 {
        out.push(major | 24);
        out.push(value as u8);
    } else if value <= u16::MAX as u64 {
        out.push(major | 25);
        out.extend_from_slice(&(value as u16).to_be_bytes());
    } else if value <= u32::MAX as u64 {
        out.push(major | 26);
        out.extend_from_slice(&(value as u32).to_be_bytes());
    } else {
        out.push(major | 27);
        out.extend_from_slice(&value.to_be_bytes());
    }
}

/// Encode an unsigned integer as a complete, self-contained CBOR item (major type 0).
pub fn encode_uint_item(value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    write_head(&mut out, crate::opcode::MAJOR_UINT, value);
    out
}

/// Encode the argument of a negative integer (`n` such that the represented value is
/// `-1 - n`) as a complete, self-contained CBOR item (major type 1).
pub fn encode_nint_item(n: u64) -> Vec<u8> {
    let mut out = Vec::new();
    write_head(&mut out, crate::opcode::MAJOR_NINT, n);
    out
}

pub fn encode_bool_item(value: bool) -> Vec<u8> {
    vec![if value {
        crate::opcode::MAJOR_FLOAT << 5 | crate::opcode::SIMPLE_TRUE
    } else {
        crate::opcode::MAJOR_FLOAT << 5 | crate::opcode::SIMPLE_FALSE
    }]
}

pub fn encode_nil_item() -> Vec<u8> {
    vec![crate::opcode::MAJOR_FLOAT << 5 | crate::opcode::SIMPLE_NULL]
}

pub fn encode_f16_item(bits: u16) -> Vec<u8> {
    let mut out = vec![crate::opcode::MAJOR_FLOAT << 5 | crate::opcode::SIMPLE_FLOAT16];
    out.extend_from_slice(&bits.to_be_bytes());
    out
}

pub fn encode_f32_item(value: f32) -> Vec<u8> {
    let mut out = vec![crate::opcode::MAJOR_FLOAT << 5 | crate::opcode::SIMPLE_FLOAT32];
    out.extend_from_slice(&value.to_bits().to_be_bytes());
    out
}

pub fn encode_f64_item(value: f64) -> Vec<u8> {
    let mut out = vec![crate::opcode::MAJOR_FLOAT << 5 | crate::opcode::SIMPLE_FLOAT64];
    out.extend_from_slice(&value.to_bits().to_be_bytes());
    out
}

pub fn encode_str_item(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len() + 9);
    write_head(&mut out, crate::opcode::MAJOR_STR, value.len() as u64);
    out.extend_from_slice(value.as_bytes());
    out
}

pub fn encode_bytes_item(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len() + 9);
    write_head(&mut out, crate::opcode::MAJOR_BIN, value.len() as u64);
    out.extend_from_slice(value);
    out
}

pub fn encode_tag_head(tag: u64) -> Vec<u8> {
    let mut out = Vec::new();
    write_head(&mut out, MAJOR_TAG, tag);
    out
}

/// Depth-first writer: flatten an [`Encoded`] tree to bytes (spec §4.C).
pub fn write(encoded: &Encoded, out: &mut Vec<u8>) {
    match encoded {
        Encoded::None => {}
        Encoded::Literal(bytes) => out.extend_from_slice(bytes),
        Encoded::Tagged { tag, value } => {
            out.extend_from_slice(tag);
            write(value, out);
        }
        Encoded::Array(items) => {
            write_head(out, MAJOR_ARRAY, items.len() as u64);
            for item in items {
                write(item, out);
            }
        }
        Encoded::Map(items) => {
            debug_assert_eq!(items.len() % 2, 0, "map must have an even number of entries");
            write_head(out, MAJOR_MAP, (items.len() / 2) as u64);
            for item in items {
                write(item, out);
            }
        }
    }
}

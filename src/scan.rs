//! Components B and part of C: turn a byte slice into a [`Scanned`] tree (spec §3.1, §4.B).
//!
//! Grounded on the teacher's `reader.rs` argument-reading style (big-endian accumulation of
//! 1/2/4/8 trailing bytes), generalized from "index into the original byte slice" to "build an
//! owned tree the decoding bridge can walk with mutable cursors".

use crate::opcode::{
    argument_width, read_opcode, Opcode, AI_INDEFINITE, BREAK_BYTE, MAJOR_BIN, MAJOR_STR,
    SIMPLE_FALSE, SIMPLE_FLOAT16, SIMPLE_FLOAT32, SIMPLE_FLOAT64, SIMPLE_NULL, SIMPLE_TRUE,
    SIMPLE_UNDEFINED,
};

/// A malformed-input error raised while scanning, before it has a [`CodingPath`](crate::error::CodingPath)
/// attached (the scanner doesn't know the bridge's current path; `Decoder::decode` attaches it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub offset: usize,
    pub message: String,
}

/// The raw argument bytes of an integer/float literal, exactly as found on the wire.
///
/// `width` always equals `bytes.len()` and is one of 1, 2, 4, 8 — kept as an explicit field
/// (rather than derived via `.len()` everywhere) because it is the quantity callers reason
/// about (§3.1 invariant: "width in integer variants matches bytes.length").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgBytes {
    pub bytes: Vec<u8>,
    pub width: u8,
}

impl ArgBytes {
    /// Interpret the stored big-endian bytes as an unsigned integer.
    pub fn to_u64(&self) -> u64 {
        self.bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
    }
}

/// A scanned CBOR literal (leaf of the §3.1 tree).
#[derive(Debug, Clone, PartialEq)]
pub enum LitKind {
    Nil,
    /// scanning sentinel only — never present in a tree handed to the bridge
    Break,
    Bool(bool),
    UInt(ArgBytes),
    NInt(ArgBytes),
    Float16(ArgBytes),
    Float32(ArgBytes),
    Float64(ArgBytes),
    Str(Vec<u8>),
    Bin(Vec<u8>),
}

/// The intermediate scanned value tree (spec §3.1).
#[derive(Debug, Clone, PartialEq)]
pub enum Scanned {
    None,
    Literal(LitKind),
    Array(Vec<Scanned>),
    /// always even length: k0, v0, k1, v1, ...
    Map(Vec<Scanned>),
    Tagged { tag: u64, value: Box<Scanned> },
}

impl Scanned {
    pub fn type_name(&self) -> &'static str {
        match self {
            Scanned::None => "none",
            Scanned::Literal(LitKind::Nil) => "nil",
            Scanned::Literal(LitKind::Break) => "break",
            Scanned::Literal(LitKind::Bool(_)) => "bool",
            Scanned::Literal(LitKind::UInt(_)) => "uint",
            Scanned::Literal(LitKind::NInt(_)) => "nint",
            Scanned::Literal(LitKind::Float16(_))
            | Scanned::Literal(LitKind::Float32(_))
            | Scanned::Literal(LitKind::Float64(_)) => "float",
            Scanned::Literal(LitKind::Str(_)) => "string",
            Scanned::Literal(LitKind::Bin(_)) => "bytes",
            Scanned::Array(_) => "array",
            Scanned::Map(_) => "map",
            Scanned::Tagged { .. } => "tagged",
        }
    }

    /// Strip tags, returning the innermost tag (outermost-first order is not retained — a
    /// single tag is all the decoding bridge's coercion table (§4.D) ever needs to check).
    pub fn innermost_tag(&self) -> Option<u64> {
        match self {
            Scanned::Tagged { tag, .. } => Some(*tag),
            _ => None,
        }
    }

    pub fn untagged(&self) -> &Scanned {
        match self {
            Scanned::Tagged { value, .. } => value.untagged(),
            other => other,
        }
    }
}

/// Single cursor over an input byte slice, producing one [`Scanned`] value per call (spec §4.B).
pub struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    /// `Err` if bytes remain after the single top-level item was scanned.
    pub fn expect_exhausted(&self) -> Result<(), ScanError> {
        if self.pos == self.bytes.len() {
            Ok(())
        } else {
            Err(self.err("trailing garbage after top-level item"))
        }
    }

    fn err(&self, message: impl Into<String>) -> ScanError {
        ScanError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ScanError> {
        if self.pos + n > self.bytes.len() {
            return Err(self.err("unexpected end of input"));
        }
        let s = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    /// Read the argument of an already-consumed head byte whose additional information is `ai`.
    /// Not valid for `ai == 31` (indefinite) — callers handle that case themselves.
    fn read_argument_rest(&mut self, ai: u8) -> Result<ArgBytes, ScanError> {
        if ai <= 23 {
            Ok(ArgBytes {
                bytes: vec![ai],
                width: 1,
            })
        } else if let Some(width) = argument_width(ai) {
            let bytes = self.take(width as usize)?.to_vec();
            Ok(ArgBytes { bytes, width })
        } else {
            Err(self.err("invalid additional information"))
        }
    }

    /// Like [`scan`](Self::scan), but end-of-input is an error rather than `Scanned::None` —
    /// for use inside a definite-length array/map loop, where a declared count that runs past
    /// the actual input is truncated input, not a legitimately absent trailing item.
    fn scan_required(&mut self) -> Result<Scanned, ScanError> {
        match self.scan()? {
            Scanned::None => Err(self.err("unexpected end of input before declared length was reached")),
            other => Ok(other),
        }
    }

    /// Scan exactly one CBOR item, recursing into containers as needed.
    pub fn scan(&mut self) -> Result<Scanned, ScanError> {
        let op = read_opcode(self.remaining());
        if matches!(op, Opcode::End) {
            return Ok(Scanned::None);
        }
        self.take(1)?;
        match op {
            Opcode::End => unreachable!("handled above"),
            Opcode::UInt(ai) => {
                let arg = self.read_argument_rest(ai)?;
                Ok(Scanned::Literal(LitKind::UInt(arg)))
            }
            Opcode::NInt(ai) => {
                let arg = self.read_argument_rest(ai)?;
                Ok(Scanned::Literal(LitKind::NInt(arg)))
            }
            Opcode::Bin(ai) => self.scan_string_like(ai, true),
            Opcode::Str(ai) => self.scan_string_like(ai, false),
            Opcode::Array(ai) => self.scan_array(ai),
            Opcode::Map(ai) => self.scan_map(ai),
            Opcode::Tagged(ai) => self.scan_tagged(ai),
            Opcode::Float(ai) => self.scan_float(ai),
        }
    }

    fn scan_string_like(&mut self, ai: u8, is_bin: bool) -> Result<Scanned, ScanError> {
        let want_major = if is_bin { MAJOR_BIN } else { crate::opcode::MAJOR_STR };
        let bytes = if ai == AI_INDEFINITE {
            self.scan_chunked_string(want_major)?
        } else {
            let arg = self.read_argument_rest(ai)?;
            let len = arg.to_u64() as usize;
            self.take(len)?.to_vec()
        };
        Ok(Scanned::Literal(if is_bin {
            LitKind::Bin(bytes)
        } else {
            LitKind::Str(bytes)
        }))
    }

    /// Parse a sequence of definite-length chunk items of `want_major`, terminated by `Break`
    /// at the top level, concatenating their payloads. This is the corrected form the spec
    /// calls for (§9/REDESIGN FLAGS): the distilled source instead scanned until the first
    /// literal `0xff` byte, which misreads a chunk whose payload itself contains `0xff`.
    fn scan_chunked_string(&mut self, want_major: u8) -> Result<Vec<u8>, ScanError> {
        let mut acc = Vec::new();
        loop {
            match self.peek_byte() {
                None => return Err(self.err("unexpected end of input in indefinite string")),
                Some(BREAK_BYTE) => {
                    self.take(1)?;
                    break;
                }
                Some(b) => {
                    let major = b >> 5;
                    if major != want_major {
                        return Err(self.err("indefinite string chunk has the wrong major type"));
                    }
                    let chunk_ai = b & 0x1f;
                    if chunk_ai == AI_INDEFINITE {
                        return Err(self.err("indefinite string chunk must have a definite length"));
                    }
                    self.take(1)?;
                    let arg = self.read_argument_rest(chunk_ai)?;
                    let len = arg.to_u64() as usize;
                    acc.extend_from_slice(self.take(len)?);
                }
            }
        }
        Ok(acc)
    }

    fn scan_array(&mut self, ai: u8) -> Result<Scanned, ScanError> {
        let mut items = Vec::new();
        if ai == AI_INDEFINITE {
            loop {
                if self.peek_byte() == Some(BREAK_BYTE) {
                    self.take(1)?;
                    break;
                }
                if self.peek_byte().is_none() {
                    return Err(self.err("unexpected end of input in indefinite array"));
                }
                items.push(self.scan()?);
            }
        } else {
            let arg = self.read_argument_rest(ai)?;
            for _ in 0..arg.to_u64() {
                items.push(self.scan_required()?);
            }
        }
        Ok(Scanned::Array(items))
    }

    /// `Break` terminates an indefinite map only in key position (§4.B, the corrected form of
    /// the distilled source's bug where a `Break` appearing as a *value* was stored verbatim).
    fn scan_map(&mut self, ai: u8) -> Result<Scanned, ScanError> {
        let mut items = Vec::new();
        if ai == AI_INDEFINITE {
            loop {
                if self.peek_byte() == Some(BREAK_BYTE) {
                    self.take(1)?;
                    break;
                }
                if self.peek_byte().is_none() {
                    return Err(self.err("unexpected end of input in indefinite map"));
                }
                let key = self.scan()?;
                let value = self.scan()?;
                if matches!(value, Scanned::Literal(LitKind::Break)) {
                    return Err(self.err("break encountered in map value position"));
                }
                items.push(key);
                items.push(value);
            }
        } else {
            let arg = self.read_argument_rest(ai)?;
            for _ in 0..arg.to_u64() {
                items.push(self.scan_required()?);
                items.push(self.scan_required()?);
            }
        }
        if items.len() % 2 != 0 {
            return Err(self.err("map has an odd number of entries"));
        }
        Ok(Scanned::Map(items))
    }

    fn scan_tagged(&mut self, ai: u8) -> Result<Scanned, ScanError> {
        if ai == AI_INDEFINITE {
            return Err(self.err("tag number may not be indefinite length"));
        }
        let arg = self.read_argument_rest(ai)?;
        let tag = arg.to_u64();
        let value = self.scan()?;
        if matches!(value, Scanned::None) {
            return Err(self.err("tag with no following value"));
        }
        Ok(Scanned::Tagged {
            tag,
            value: Box::new(value),
        })
    }

    fn scan_float(&mut self, ai: u8) -> Result<Scanned, ScanError> {
        match ai {
            SIMPLE_FALSE => Ok(Scanned::Literal(LitKind::Bool(false))),
            SIMPLE_TRUE => Ok(Scanned::Literal(LitKind::Bool(true))),
            SIMPLE_NULL | SIMPLE_UNDEFINED => Ok(Scanned::Literal(LitKind::Nil)),
            SIMPLE_FLOAT16 => {
                let bytes = self.take(2)?.to_vec();
                Ok(Scanned::Literal(LitKind::Float16(ArgBytes { bytes, width: 2 })))
            }
            SIMPLE_FLOAT32 => {
                let bytes = self.take(4)?.to_vec();
                Ok(Scanned::Literal(LitKind::Float32(ArgBytes { bytes, width: 4 })))
            }
            SIMPLE_FLOAT64 => {
                let bytes = self.take(8)?.to_vec();
                Ok(Scanned::Literal(LitKind::Float64(ArgBytes { bytes, width: 8 })))
            }
            AI_INDEFINITE => Ok(Scanned::Literal(LitKind::Break)),
            _ => Err(self.err("reserved or unsupported simple value")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(bytes: &[u8]) -> Scanned {
        let mut s = Scanner::new(bytes);
        let v = s.scan().unwrap();
        s.expect_exhausted().unwrap();
        v
    }

    #[test]
    fn definite_array() {
        let v = scan_all(&[0x83, 0x01, 0x02, 0x03]);
        match v {
            Scanned::Array(items) => assert_eq!(items.len(), 3),
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn indefinite_array() {
        let v = scan_all(&[0x9f, 0x01, 0x02, 0x03, 0xff]);
        match v {
            Scanned::Array(items) => assert_eq!(items.len(), 3),
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn indefinite_string_with_0xff_payload_byte() {
        // chunk "a" = 0x61 0x61, chunk containing literal 0xff byte: 0x41 0xff (byte string!)
        // use byte string (major 2) so a raw 0xff inside the chunk payload must not be
        // mistaken for the top-level break.
        let bytes = [0x5f, 0x41, 0xff, 0x41, 0x02, 0xff];
        let v = scan_all(&bytes);
        match v {
            Scanned::Literal(LitKind::Bin(b)) => assert_eq!(b, vec![0xff, 0x02]),
            other => panic!("expected bytes, got {:?}", other),
        }
    }

    #[test]
    fn break_in_map_value_position_is_an_error() {
        let bytes = [0xbf, 0x61, b'a', 0xff];
        let mut s = Scanner::new(&bytes);
        assert!(s.scan().is_err());
    }

    #[test]
    fn definite_array_shorter_than_declared_length_is_an_error() {
        // array(3) but only one element follows
        let bytes = [0x83, 0x01];
        let mut s = Scanner::new(&bytes);
        assert!(s.scan().is_err());
    }

    #[test]
    fn definite_map_shorter_than_declared_length_is_an_error() {
        // map(2) but only one key/value pair follows
        let bytes = [0xa2, 0x61, b'a', 0x01];
        let mut s = Scanner::new(&bytes);
        assert!(s.scan().is_err());
    }

    #[test]
    fn tag_wraps_value() {
        let v = scan_all(&[0xc1, 0x18, 0x46]);
        match v {
            Scanned::Tagged { tag, value } => {
                assert_eq!(tag, 1);
                assert!(matches!(*value, Scanned::Literal(LitKind::UInt(_))));
            }
            _ => panic!("expected tagged"),
        }
    }
}

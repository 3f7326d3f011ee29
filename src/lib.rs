//! A CBOR ([RFC 8949](https://www.rfc-editor.org/rfc/rfc8949)) encoder and decoder built around
//! a capability-based [`Encodable`]/[`Decodable`] pair of traits, rather than around an
//! intermediate value type: a type describes how to read or write itself through a small set of
//! keyed, unkeyed, and single-value containers, and the crate takes care of minimal-width
//! integer selection, definite-length array/map framing, and tag wrapping.
//!
//! ```
//! use cbor_codable::{Decodable, Decoder, Encodable, Encoder};
//!
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Encodable for Point {
//!     fn encode(&self, encoder: &mut cbor_codable::ValueEncoder) -> Result<(), cbor_codable::EncodingError> {
//!         let mut map = encoder.keyed_container::<&str>();
//!         map.encode_i32(&"x", self.x);
//!         map.encode_i32(&"y", self.y);
//!         Ok(())
//!     }
//! }
//!
//! impl Decodable for Point {
//!     fn decode(decoder: &mut cbor_codable::ValueDecoder) -> Result<Self, cbor_codable::DecodingError> {
//!         let map = decoder.keyed_container::<&str>()?;
//!         Ok(Point {
//!             x: map.decode_i32(&"x")?,
//!             y: map.decode_i32(&"y")?,
//!         })
//!     }
//! }
//!
//! let bytes = Encoder::new().encode(&Point { x: 1, y: -2 }).unwrap();
//! let round_tripped: Point = Decoder::new().decode(&bytes).unwrap();
//! assert_eq!(round_tripped.x, 1);
//! assert_eq!(round_tripped.y, -2);
//! ```
//!
//! With the `derive` feature, `#[derive(Encodable, Decodable)]` generates the impl above for a
//! plain struct automatically.

mod codable;
mod decoder;
mod encoded;
mod encoder;
mod error;
mod key;
mod opcode;
mod scan;

pub use codable::{Bytes, Decodable, Encodable, OrderedMap};
pub use decoder::{
    Decoder, KeyedDecodingContainer, SingleValueDecodingContainer, UnkeyedDecodingContainer,
    ValueDecoder,
};
pub use encoder::{
    Encoder, KeyedEncodingContainer, SingleValueEncodingContainer, UnkeyedEncodingContainer,
    ValueEncoder,
};
pub use error::{
    CodingPath, CodingPathElement, DecodingError, DecodingErrorKind, EncodingError,
    EncodingErrorKind,
};
pub use key::{CodingKey, StringKey};

#[cfg(feature = "derive")]
pub use cbor_codable_derive::{Decodable, Encodable};

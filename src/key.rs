/// A key usable in a keyed container.
///
/// The wire only ever sees [`string_value`](#tymethod.string_value); `int_value` exists purely
/// so unkeyed containers can report which ordinal a missing/invalid item had without needing a
/// separate key type for that case.
///
/// The distinguished string `"super"` is reserved for the parent-class payload slot reached via
/// [`super_encoder`](crate::encoder::KeyedEncodingContainer::super_encoder)/
/// [`super_decoder`](crate::decoder::KeyedDecodingContainer::super_decoder) — it is produced as a
/// plain string literal by those methods, not as a variant of any particular `CodingKey`.
pub trait CodingKey {
    /// The textual representation written on the wire as a CBOR map key.
    fn string_value(&self) -> String;

    /// An optional integer index, used only for diagnostics on unkeyed containers.
    fn int_value(&self) -> Option<usize> {
        None
    }
}

impl CodingKey for &str {
    fn string_value(&self) -> String {
        (*self).to_owned()
    }
}

impl CodingKey for String {
    fn string_value(&self) -> String {
        self.clone()
    }
}

/// A plain string key, for types that don't need their own [`CodingKey`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StringKey(pub String);

impl StringKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl CodingKey for StringKey {
    fn string_value(&self) -> String {
        self.0.clone()
    }
}

pub(crate) const SUPER_KEY: &str = "super";

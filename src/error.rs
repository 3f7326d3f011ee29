use std::fmt::{self, Debug, Display};

/// One step of a [`CodingPath`](type.CodingPath.html) breadcrumb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodingPathElement {
    Key(String),
    Index(usize),
}

impl Display for CodingPathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodingPathElement::Key(k) => write!(f, ".{}", k),
            CodingPathElement::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Breadcrumb trail locating a failure within a nested structure.
pub type CodingPath = Vec<CodingPathElement>;

fn fmt_path(path: &CodingPath, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if path.is_empty() {
        write!(f, "<root>")
    } else {
        for elem in path {
            write!(f, "{}", elem)?;
        }
        Ok(())
    }
}

/// What went wrong while decoding, independent of where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodingErrorKind {
    /// malformed CBOR: truncated stream, unexpected opcode, non-UTF-8 text string, tag mismatch
    DataCorrupted(String),
    /// wire type does not match the requested target type
    TypeMismatch { expected: &'static str },
    /// unkeyed container exhausted, or keyed container missing a required key
    ValueNotFound,
    /// keyed decode of a specific key whose entry is absent
    KeyNotFound(String),
}

impl Display for DecodingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodingErrorKind::DataCorrupted(msg) => write!(f, "data corrupted: {}", msg),
            DecodingErrorKind::TypeMismatch { expected } => {
                write!(f, "type mismatch: expected {}", expected)
            }
            DecodingErrorKind::ValueNotFound => write!(f, "value not found"),
            DecodingErrorKind::KeyNotFound(key) => write!(f, "key not found: {}", key),
        }
    }
}

/// Error returned by [`Decoder::decode`](struct.Decoder.html#method.decode).
#[derive(Clone, PartialEq, Eq)]
pub struct DecodingError {
    kind: DecodingErrorKind,
    path: CodingPath,
}

impl DecodingError {
    pub fn new(kind: DecodingErrorKind, path: CodingPath) -> Self {
        Self { kind, path }
    }

    pub fn data_corrupted(msg: impl Into<String>, path: CodingPath) -> Self {
        Self::new(DecodingErrorKind::DataCorrupted(msg.into()), path)
    }

    pub fn type_mismatch(expected: &'static str, path: CodingPath) -> Self {
        Self::new(DecodingErrorKind::TypeMismatch { expected }, path)
    }

    pub fn value_not_found(path: CodingPath) -> Self {
        Self::new(DecodingErrorKind::ValueNotFound, path)
    }

    pub fn key_not_found(key: impl Into<String>, path: CodingPath) -> Self {
        Self::new(DecodingErrorKind::KeyNotFound(key.into()), path)
    }

    pub fn kind(&self) -> &DecodingErrorKind {
        &self.kind
    }

    pub fn coding_path(&self) -> &CodingPath {
        &self.path
    }
}

impl Display for DecodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at ", self.kind)?;
        fmt_path(&self.path, f)
    }
}

impl Debug for DecodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for DecodingError {}

/// What went wrong while encoding, independent of where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodingErrorKind {
    /// the user emitted no value, or a numeric value could not be represented
    InvalidValue(String),
}

impl Display for EncodingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingErrorKind::InvalidValue(msg) => write!(f, "invalid value: {}", msg),
        }
    }
}

/// Error returned by [`Encoder::encode`](struct.Encoder.html#method.encode).
#[derive(Clone, PartialEq, Eq)]
pub struct EncodingError {
    kind: EncodingErrorKind,
    path: CodingPath,
}

impl EncodingError {
    pub fn new(kind: EncodingErrorKind, path: CodingPath) -> Self {
        Self { kind, path }
    }

    pub fn invalid_value(msg: impl Into<String>, path: CodingPath) -> Self {
        Self::new(EncodingErrorKind::InvalidValue(msg.into()), path)
    }

    pub fn kind(&self) -> &EncodingErrorKind {
        &self.kind
    }

    pub fn coding_path(&self) -> &CodingPath {
        &self.path
    }
}

impl Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at ", self.kind)?;
        fmt_path(&self.path, f)
    }
}

impl Debug for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for EncodingError {}

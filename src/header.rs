use std::fmt;
use std::io::BufRead;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::PcdError;

/// Payload encoding declared by the `DATA` directive.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum DataMode {
    Ascii,
    Binary,
    BinaryCompressed,
}

impl DataMode {
    /// Parse the second token of the `DATA` line. Unrecognized tokens fall
    /// back to `Binary`, which is also the default when the token is absent.
    fn parse(token: &str) -> Self {
        let token = token.to_ascii_lowercase();
        if token.starts_with("binary_compressed") {
            DataMode::BinaryCompressed
        } else if token == "ascii" {
            DataMode::Ascii
        } else {
            DataMode::Binary
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataMode::Ascii => write!(f, "ascii"),
            DataMode::Binary => write!(f, "binary"),
            DataMode::BinaryCompressed => write!(f, "binary_compressed"),
        }
    }
}

/// Element kind declared by the `TYPE` directive (`F`, `I` or `U`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FieldKind {
    Float,
    Signed,
    Unsigned,
}

impl FieldKind {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "F" => Some(FieldKind::Float),
            "I" => Some(FieldKind::Signed),
            "U" => Some(FieldKind::Unsigned),
            _ => None,
        }
    }
}

/// Concrete numeric representation of a field, resolved from its declared
/// `(TYPE, SIZE)` pair. Combinations outside this set have no valid
/// representation and are rejected during layout resolution.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScalarType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl ScalarType {
    pub fn resolve(kind: FieldKind, size: u32) -> Option<Self> {
        use FieldKind::*;
        match (kind, size) {
            (Signed, 1) => Some(ScalarType::I8),
            (Unsigned, 1) => Some(ScalarType::U8),
            (Signed, 2) => Some(ScalarType::I16),
            (Unsigned, 2) => Some(ScalarType::U16),
            (Signed, 4) => Some(ScalarType::I32),
            (Unsigned, 4) => Some(ScalarType::U32),
            (Signed, 8) => Some(ScalarType::I64),
            (Unsigned, 8) => Some(ScalarType::U64),
            (Float, 4) => Some(ScalarType::F32),
            (Float, 8) => Some(ScalarType::F64),
            _ => None,
        }
    }

    pub fn size_bytes(&self) -> usize {
        match self {
            ScalarType::I8 | ScalarType::U8 => 1,
            ScalarType::I16 | ScalarType::U16 => 2,
            ScalarType::I32 | ScalarType::U32 | ScalarType::F32 => 4,
            ScalarType::I64 | ScalarType::U64 | ScalarType::F64 => 8,
        }
    }

    /// Read one little-endian value from the start of `bytes`, widened to
    /// `f64`. `bytes` must hold at least `size_bytes()` bytes.
    pub(crate) fn read_f64(&self, bytes: &[u8]) -> f64 {
        match self {
            ScalarType::I8 => bytes[0] as i8 as f64,
            ScalarType::U8 => bytes[0] as f64,
            ScalarType::I16 => LittleEndian::read_i16(bytes) as f64,
            ScalarType::U16 => LittleEndian::read_u16(bytes) as f64,
            ScalarType::I32 => LittleEndian::read_i32(bytes) as f64,
            ScalarType::U32 => LittleEndian::read_u32(bytes) as f64,
            ScalarType::I64 => LittleEndian::read_i64(bytes) as f64,
            ScalarType::U64 => LittleEndian::read_u64(bytes) as f64,
            ScalarType::F32 => LittleEndian::read_f32(bytes) as f64,
            ScalarType::F64 => LittleEndian::read_f64(bytes),
        }
    }
}

/// Parsed PCD header: every directive line seen before `DATA`, retained
/// verbatim for prefix lookup, plus typed views of the recognized
/// directives.
///
/// Directives may appear in any order and are matched case-insensitively.
/// Built once per decode call and immutable afterwards.
#[derive(Debug, Clone)]
pub struct PcdHeader {
    lines: Vec<String>,
    data_mode: DataMode,
    fields: Option<Vec<String>>,
    sizes: Option<Vec<u32>>,
    types: Option<Vec<String>>,
    counts: Option<Vec<u64>>,
    points: Option<u64>,
    width: Option<u64>,
    height: Option<u64>,
}

impl PcdHeader {
    /// Read header lines from `reader` until the `DATA` directive, which is
    /// consumed. The reader is left positioned at the first payload byte.
    ///
    /// Each line is decoded as UTF-8 with a Latin-1 fallback, so a stray
    /// byte in a comment can never fail the whole parse. Reaching
    /// end-of-stream before a `DATA` line is [`PcdError::TruncatedHeader`].
    pub fn parse<R: BufRead>(reader: &mut R) -> Result<Self, PcdError> {
        let mut lines = Vec::new();
        let mut buf = Vec::new();

        let data_mode = loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Err(PcdError::TruncatedHeader);
            }
            let line = decode_line(&buf);
            let line = line.trim();
            if line.to_ascii_lowercase().starts_with("data") {
                break line
                    .split_whitespace()
                    .nth(1)
                    .map(DataMode::parse)
                    .unwrap_or(DataMode::Binary);
            }
            lines.push(line.to_string());
        };

        let mut header = PcdHeader {
            lines,
            data_mode,
            fields: None,
            sizes: None,
            types: None,
            counts: None,
            points: None,
            width: None,
            height: None,
        };

        header.fields = header
            .directive("fields")
            .or_else(|| header.directive("field"))
            .map(|toks| toks.iter().map(|t| t.to_string()).collect());
        header.sizes = header.directive("size").and_then(parse_list);
        header.types = header
            .directive("type")
            .map(|toks| toks.iter().map(|t| t.to_string()).collect());
        header.counts = header.directive("count").and_then(parse_list);
        header.points = header.directive("points").and_then(parse_first);
        header.width = header.directive("width").and_then(parse_first);
        header.height = header.directive("height").and_then(parse_first);

        Ok(header)
    }

    /// Value tokens of the first header line whose directive matches
    /// `prefix`, case-insensitively.
    pub fn directive(&self, prefix: &str) -> Option<Vec<&str>> {
        let prefix = prefix.to_ascii_lowercase();
        self.lines
            .iter()
            .find(|line| line.to_ascii_lowercase().starts_with(&prefix))
            .map(|line| line.split_whitespace().skip(1).collect())
    }

    pub fn data_mode(&self) -> DataMode {
        self.data_mode
    }

    /// Declared column names, order-significant.
    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    /// Bytes per field, parallel to `fields`.
    pub fn sizes(&self) -> Option<&[u32]> {
        self.sizes.as_deref()
    }

    /// Raw `TYPE` tokens, parallel to `fields`.
    pub fn types(&self) -> Option<&[String]> {
        self.types.as_deref()
    }

    /// Repeat count per field, parallel to `fields`. Absent means one
    /// element per field.
    pub fn counts(&self) -> Option<&[u64]> {
        self.counts.as_deref()
    }

    pub fn width(&self) -> Option<u64> {
        self.width
    }

    pub fn height(&self) -> Option<u64> {
        self.height
    }

    /// Declared number of points: `POINTS` when it parses, else
    /// `WIDTH` x `HEIGHT` when both are present and non-zero, else `None`
    /// and the payload decoder infers the count from the payload size.
    /// A product too large for u64 counts as unresolved.
    pub fn point_count(&self) -> Option<u64> {
        if let Some(points) = self.points {
            return Some(points);
        }
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => w.checked_mul(h),
            _ => None,
        }
    }
}

/// Decode one header line: UTF-8 when valid, Latin-1 otherwise.
fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn parse_list<T: std::str::FromStr>(tokens: Vec<&str>) -> Option<Vec<T>> {
    tokens.iter().map(|t| t.parse().ok()).collect()
}

fn parse_first<T: std::str::FromStr>(tokens: Vec<&str>) -> Option<T> {
    tokens.first().and_then(|t| t.parse().ok())
}

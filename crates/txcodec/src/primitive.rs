// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive decoders and encoders built on the cursor.
//!
//! Integers use the widths of their [`IntKind`], big-endian. Byte strings and
//! text are either length-prefixed (any `IntKind` as the prefix) or of a
//! fixed length with no prefix. Each encoder is the exact inverse of its
//! decoder, so every value has a single canonical encoding.

use crate::cursor::{ByteWriter, Cursor};
use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-width integer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
}

impl IntKind {
    /// Width in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 => 4,
            Self::U64 | Self::I64 => 8,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    pub fn min(self) -> i128 {
        match self {
            Self::U8 | Self::U16 | Self::U32 | Self::U64 => 0,
            Self::I8 => i128::from(i8::MIN),
            Self::I16 => i128::from(i16::MIN),
            Self::I32 => i128::from(i32::MIN),
            Self::I64 => i128::from(i64::MIN),
        }
    }

    pub fn max(self) -> i128 {
        match self {
            Self::U8 => i128::from(u8::MAX),
            Self::U16 => i128::from(u16::MAX),
            Self::U32 => i128::from(u32::MAX),
            Self::U64 => i128::from(u64::MAX),
            Self::I8 => i128::from(i8::MAX),
            Self::I16 => i128::from(i16::MAX),
            Self::I32 => i128::from(i32::MAX),
            Self::I64 => i128::from(i64::MAX),
        }
    }

    /// Registry name of the matching built-in type.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
        }
    }

    pub const ALL: [IntKind; 8] = [
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
    ];
}

impl fmt::Display for IntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Inclusive bounds on a decoded length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBound {
    pub min: usize,
    /// `None` = unbounded.
    pub max: Option<usize>,
}

impl LengthBound {
    pub const ANY: LengthBound = LengthBound { min: 0, max: None };

    pub fn exact(len: usize) -> Self {
        Self {
            min: len,
            max: Some(len),
        }
    }

    pub fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub fn at_most(max: usize) -> Self {
        Self { min: 0, max: Some(max) }
    }

    pub fn contains(&self, len: usize) -> bool {
        len >= self.min && self.max.map_or(true, |max| len <= max)
    }
}

impl fmt::Display for LengthBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "exact length {}", max),
            Some(max) => write!(f, "length bound [{}, {}]", self.min, max),
            None => write!(f, "minimum length {}", self.min),
        }
    }
}

/// How the length of a byte string is carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthEncoding {
    /// Length primitive of the given kind, then the bytes.
    Prefixed(IntKind),
    /// Exactly `n` bytes, no prefix.
    Fixed(usize),
}

/// Layout of a byte string or text primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BytesSpec {
    pub length: LengthEncoding,
    pub bound: LengthBound,
}

impl BytesSpec {
    /// Length-prefixed, unbounded.
    pub fn prefixed(prefix: IntKind) -> Self {
        Self {
            length: LengthEncoding::Prefixed(prefix),
            bound: LengthBound::ANY,
        }
    }

    /// Exactly `len` bytes without a prefix.
    pub fn fixed(len: usize) -> Self {
        Self {
            length: LengthEncoding::Fixed(len),
            bound: LengthBound::exact(len),
        }
    }

    /// Restrict the accepted length of a prefixed string.
    pub fn bounded(mut self, bound: LengthBound) -> Self {
        if let LengthEncoding::Prefixed(_) = self.length {
            self.bound = bound;
        }
        self
    }
}

impl Default for BytesSpec {
    fn default() -> Self {
        Self::prefixed(IntKind::U32)
    }
}

/// Decode an integer of `kind` into `Value::Uint` or `Value::Int`.
pub fn decode_int(cursor: &mut Cursor<'_>, kind: IntKind) -> DecodeResult<Value> {
    Ok(match kind {
        IntKind::U8 => Value::Uint(u64::from(cursor.read_u8()?)),
        IntKind::U16 => Value::Uint(u64::from(cursor.read_u16_be()?)),
        IntKind::U32 => Value::Uint(u64::from(cursor.read_u32_be()?)),
        IntKind::U64 => Value::Uint(cursor.read_u64_be()?),
        IntKind::I8 => Value::Int(i64::from(cursor.read_i8()?)),
        IntKind::I16 => Value::Int(i64::from(cursor.read_i16_be()?)),
        IntKind::I32 => Value::Int(i64::from(cursor.read_i32_be()?)),
        IntKind::I64 => Value::Int(cursor.read_i64_be()?),
    })
}

/// Decode an integer used as a tag, count or length; negatives are rejected.
pub fn decode_unsigned(cursor: &mut Cursor<'_>, kind: IntKind) -> DecodeResult<u64> {
    let offset = cursor.offset();
    match decode_int(cursor, kind)? {
        Value::Uint(v) => Ok(v),
        Value::Int(v) => u64::try_from(v).map_err(|_| DecodeError::InvalidData {
            offset,
            reason: format!("negative {} {}", kind, v),
        }),
        _ => Err(DecodeError::InvalidData {
            offset,
            reason: "integer expected".into(),
        }),
    }
}

/// Encode `value` as `kind`, rejecting out-of-range values.
pub fn encode_int(writer: &mut ByteWriter, kind: IntKind, value: i128) -> EncodeResult<()> {
    if value < kind.min() || value > kind.max() {
        return Err(EncodeError::IntOutOfRange { value, kind });
    }
    // Range checked above, the casts below are lossless.
    match kind {
        IntKind::U8 => writer.write_u8(value as u8),
        IntKind::U16 => writer.write_u16_be(value as u16),
        IntKind::U32 => writer.write_u32_be(value as u32),
        IntKind::U64 => writer.write_u64_be(value as u64),
        IntKind::I8 => writer.write_i8(value as i8),
        IntKind::I16 => writer.write_i16_be(value as i16),
        IntKind::I32 => writer.write_i32_be(value as i32),
        IntKind::I64 => writer.write_i64_be(value as i64),
    }
    Ok(())
}

/// One byte, `0x00` or `0x01`.
pub fn decode_bool(cursor: &mut Cursor<'_>) -> DecodeResult<bool> {
    let offset = cursor.offset();
    match cursor.read_u8()? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(DecodeError::InvalidData {
            offset,
            reason: format!("bool byte {:#04x}", other),
        }),
    }
}

pub fn encode_bool(writer: &mut ByteWriter, value: bool) {
    writer.write_u8(u8::from(value));
}

/// Decode the length of a byte string and check it against the spec.
fn decode_length(cursor: &mut Cursor<'_>, spec: &BytesSpec) -> DecodeResult<usize> {
    match spec.length {
        LengthEncoding::Fixed(len) => Ok(len),
        LengthEncoding::Prefixed(kind) => {
            let offset = cursor.offset();
            let raw = decode_unsigned(cursor, kind)?;
            let len = usize::try_from(raw).ok().filter(|len| spec.bound.contains(*len));
            len.ok_or_else(|| DecodeError::LengthMismatch {
                offset,
                length: raw,
                expected: spec.bound.to_string(),
            })
        }
    }
}

pub fn decode_bytes(cursor: &mut Cursor<'_>, spec: &BytesSpec) -> DecodeResult<Vec<u8>> {
    let len = decode_length(cursor, spec)?;
    Ok(cursor.take(len)?.to_vec())
}

pub fn decode_text(cursor: &mut Cursor<'_>, spec: &BytesSpec) -> DecodeResult<String> {
    let len = decode_length(cursor, spec)?;
    let offset = cursor.offset();
    let bytes = cursor.take(len)?;
    String::from_utf8(bytes.to_vec()).map_err(|e| DecodeError::InvalidData {
        offset: offset + e.utf8_error().valid_up_to(),
        reason: "invalid UTF-8".into(),
    })
}

/// Encode a byte string (or UTF-8 text as bytes) according to `spec`.
pub fn encode_bytes(writer: &mut ByteWriter, spec: &BytesSpec, data: &[u8]) -> EncodeResult<()> {
    if !spec.bound.contains(data.len()) {
        return Err(EncodeError::LengthMismatch {
            length: data.len() as u64,
            expected: spec.bound.to_string(),
        });
    }
    if let LengthEncoding::Prefixed(kind) = spec.length {
        encode_int(writer, kind, data.len() as i128)?;
    }
    writer.write_bytes(data);
    Ok(())
}

/// Decode an element count for a sequence or map.
///
/// Counts above `limit` are rejected before anything is allocated.
pub fn decode_count(cursor: &mut Cursor<'_>, kind: IntKind, limit: usize) -> DecodeResult<usize> {
    let offset = cursor.offset();
    let raw = decode_unsigned(cursor, kind)?;
    usize::try_from(raw)
        .ok()
        .filter(|count| *count <= limit)
        .ok_or_else(|| DecodeError::LengthMismatch {
            offset,
            length: raw,
            expected: format!("collection limit {}", limit),
        })
}

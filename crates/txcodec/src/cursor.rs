// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds-checked read cursor and growable writer.
//!
//! Every multi-byte integer is big-endian on the wire: 2, 4 and 8 byte
//! widths alike. A failed read leaves the position untouched.

use crate::error::{DecodeError, DecodeResult};

/// Generate big-endian read methods for fixed-width integers.
///
/// Each generated method takes `$size` bytes through [`Cursor::take`]
/// (which performs the bounds check) and converts them with `from_be_bytes`.
macro_rules! impl_read_be {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> DecodeResult<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.take($size)?);
            Ok(<$type>::from_be_bytes(bytes))
        }
    };
}

/// Generate big-endian write methods for fixed-width integers.
macro_rules! impl_write_be {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) {
            self.buffer.extend_from_slice(&value.to_be_bytes());
        }
    };
}

/// Sequential reader over an immutable byte buffer.
///
/// Invariant: `0 <= offset <= buffer.len()`.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    /// Next `len` bytes without advancing.
    pub fn peek(&self, len: usize) -> DecodeResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(DecodeError::OutOfBounds {
                offset: self.offset,
                requested: len,
                available: self.remaining(),
            });
        }
        Ok(&self.buffer[self.offset..self.offset + len])
    }

    /// Next `len` bytes, advancing past them.
    pub fn take(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        let slice = self.peek(len)?;
        self.offset += len;
        Ok(slice)
    }

    impl_read_be!(read_u8, u8, 1);
    impl_read_be!(read_u16_be, u16, 2);
    impl_read_be!(read_u32_be, u32, 4);
    impl_read_be!(read_u64_be, u64, 8);
    impl_read_be!(read_i8, i8, 1);
    impl_read_be!(read_i16_be, i16, 2);
    impl_read_be!(read_i32_be, i32, 4);
    impl_read_be!(read_i64_be, i64, 8);
}

/// Append-only output buffer used by the encoder.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    impl_write_be!(write_u8, u8);
    impl_write_be!(write_u16_be, u16);
    impl_write_be!(write_u32_be, u32);
    impl_write_be!(write_u64_be, u64);
    impl_write_be!(write_i8, i8);
    impl_write_be!(write_i16_be, i16);
    impl_write_be!(write_i32_be, i32);
    impl_write_be!(write_i64_be, i64);
}

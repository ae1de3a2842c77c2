// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-driven decoder.

use crate::config::CodecConfig;
use crate::cursor::Cursor;
use crate::error::{DecodeError, DecodeResult, Location};
use crate::primitive::{
    decode_bool, decode_bytes, decode_count, decode_int, decode_text, decode_unsigned,
};
use crate::registry::Registry;
use crate::schema::{
    Codec, CodecKind, CountSource, FieldSpec, MapSpec, Presence, RepeatedSpec, VariantSpec,
};
use crate::value::Value;
use std::collections::BTreeMap;

/// Decodes values of registered types from one shared cursor.
///
/// Type names are resolved through the registry when they are reached, so a
/// decoder handles forward references and recursive schemas. Nesting is
/// bounded by `max_depth`.
pub struct Decoder<'r, 'a> {
    registry: &'r Registry,
    cursor: Cursor<'a>,
    max_depth: usize,
    max_collection_len: usize,
    depth: usize,
}

impl<'r, 'a> Decoder<'r, 'a> {
    pub fn new(registry: &'r Registry, bytes: &'a [u8], config: &CodecConfig) -> Self {
        Self {
            registry,
            cursor: Cursor::new(bytes),
            max_depth: config.max_depth,
            max_collection_len: config.max_collection_len,
            depth: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Decode one value of `type_name` at the current position.
    pub fn decode(&mut self, type_name: &str) -> DecodeResult<Value> {
        let registry = self.registry;
        let codec = registry
            .get(type_name)
            .ok_or_else(|| DecodeError::UnknownType(type_name.to_string()))?;

        if self.depth >= self.max_depth {
            return Err(DecodeError::DepthExceeded {
                offset: self.cursor.offset(),
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = self.decode_codec(codec);
        self.depth -= 1;
        result
    }

    fn decode_codec(&mut self, codec: &'r Codec) -> DecodeResult<Value> {
        match &codec.kind {
            CodecKind::Int(kind) => decode_int(&mut self.cursor, *kind),
            CodecKind::Bool => decode_bool(&mut self.cursor).map(Value::Bool),
            CodecKind::Unit => Ok(Value::Unit),
            CodecKind::Bytes(spec) => decode_bytes(&mut self.cursor, spec).map(Value::Bytes),
            CodecKind::Text(spec) => decode_text(&mut self.cursor, spec).map(Value::Text),
            CodecKind::Struct(fields) => self.decode_struct(&codec.name, fields),
            CodecKind::Variant(spec) => self.decode_variant(&codec.name, spec),
            CodecKind::Repeated(spec) => self.decode_repeated(&codec.name, spec),
            CodecKind::Map(spec) => self.decode_map(&codec.name, spec),
        }
    }

    fn decode_struct(&mut self, name: &str, fields: &'r [FieldSpec]) -> DecodeResult<Value> {
        let mut record = BTreeMap::new();
        let last = fields.len().saturating_sub(1);

        for (i, field) in fields.iter().enumerate() {
            let at_field = |e: DecodeError| e.within(name, Location::Field(field.name.clone()));

            if i != last && self.registry.consumes_to_end(&field.type_name) {
                return Err(at_field(DecodeError::InvalidSchema {
                    reason: format!(
                        "`{}` reads until the end of input but is not the last field",
                        field.type_name
                    ),
                }));
            }

            let present = match field.presence {
                Presence::Required => true,
                Presence::Flagged => decode_bool(&mut self.cursor).map_err(at_field)?,
                Presence::Trailing if i != last => {
                    return Err(at_field(DecodeError::InvalidSchema {
                        reason: "trailing field is not the last field".into(),
                    }));
                }
                Presence::Trailing => !self.cursor.is_eof(),
            };

            if present {
                let value = self.decode(&field.type_name).map_err(at_field)?;
                record.insert(field.name.clone(), value);
            }
        }

        Ok(Value::Record(record))
    }

    fn decode_variant(&mut self, name: &str, spec: &'r VariantSpec) -> DecodeResult<Value> {
        let offset = self.cursor.offset();
        let tag = decode_unsigned(&mut self.cursor, spec.tag)
            .map_err(|e| e.within(name, Location::Tag))?;
        let arm = spec.arm_by_tag(tag).ok_or_else(|| {
            DecodeError::UnknownVariantTag { offset, tag }.within(name, Location::Tag)
        })?;

        let payload = self
            .decode(&arm.type_name)
            .map_err(|e| e.within(name, Location::Arm(arm.name.clone())))?;
        Ok(Value::Variant(tag, arm.name.clone(), Box::new(payload)))
    }

    fn decode_repeated(&mut self, name: &str, spec: &'r RepeatedSpec) -> DecodeResult<Value> {
        self.check_bounded(&spec.element)
            .map_err(|e| e.within(name, Location::Index(0)))?;
        match spec.count {
            CountSource::Prefixed(kind) => {
                let count = decode_count(&mut self.cursor, kind, self.max_collection_len)
                    .map_err(|e| e.within(name, Location::Count))?;
                // Capacity never exceeds the bytes left in the buffer.
                let mut items = Vec::with_capacity(count.min(self.cursor.remaining()));
                for i in 0..count {
                    let start = self.cursor.offset();
                    let item = self
                        .decode(&spec.element)
                        .map_err(|e| e.within(name, Location::Index(i)))?;
                    if self.cursor.offset() == start {
                        return Err(zero_width(&spec.element).within(name, Location::Index(i)));
                    }
                    items.push(item);
                }
                Ok(Value::Sequence(items))
            }
            CountSource::UntilExhausted => {
                let mut items = Vec::new();
                while !self.cursor.is_eof() {
                    let i = items.len();
                    let start = self.cursor.offset();
                    if i >= self.max_collection_len {
                        return Err(DecodeError::LengthMismatch {
                            offset: start,
                            length: (i as u64).saturating_add(1),
                            expected: format!("collection limit {}", self.max_collection_len),
                        }
                        .within(name, Location::Index(i)));
                    }
                    let item = self
                        .decode(&spec.element)
                        .map_err(|e| e.within(name, Location::Index(i)))?;
                    if self.cursor.offset() == start {
                        return Err(zero_width(&spec.element).within(name, Location::Index(i)));
                    }
                    items.push(item);
                }
                Ok(Value::Sequence(items))
            }
        }
    }

    fn decode_map(&mut self, name: &str, spec: &'r MapSpec) -> DecodeResult<Value> {
        let count = decode_count(&mut self.cursor, spec.count, self.max_collection_len)
            .map_err(|e| e.within(name, Location::Count))?;
        self.check_bounded(&spec.key)
            .and_then(|()| self.check_bounded(&spec.value))
            .map_err(|e| e.within(name, Location::Entry(0)))?;
        let mut entries = Vec::with_capacity(count.min(self.cursor.remaining()));
        for i in 0..count {
            let start = self.cursor.offset();
            let key = self
                .decode(&spec.key)
                .map_err(|e| e.within(name, Location::Key(i)))?;
            let value = self
                .decode(&spec.value)
                .map_err(|e| e.within(name, Location::Entry(i)))?;
            if self.cursor.offset() == start {
                return Err(zero_width(&spec.value).within(name, Location::Entry(i)));
            }
            entries.push((key, value));
        }
        Ok(Value::Map(entries))
    }

    /// Collection entries must stop on their own; one that reads to the end
    /// of input would swallow every entry after it.
    fn check_bounded(&self, type_name: &str) -> DecodeResult<()> {
        if self.registry.consumes_to_end(type_name) {
            return Err(DecodeError::InvalidSchema {
                reason: format!("`{}` reads until the end of input", type_name),
            });
        }
        Ok(())
    }
}

/// A collection entry that consumed nothing would repeat without progress.
fn zero_width(type_name: &str) -> DecodeError {
    DecodeError::InvalidSchema {
        reason: format!("`{}` consumed no input", type_name),
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-driven encoder, the inverse of [`Decoder`](super::Decoder).

use crate::config::CodecConfig;
use crate::cursor::ByteWriter;
use crate::error::{EncodeError, EncodeResult, Location};
use crate::primitive::{encode_bool, encode_bytes, encode_int};
use crate::registry::Registry;
use crate::schema::{
    Codec, CodecKind, CountSource, FieldSpec, MapSpec, Presence, RepeatedSpec, VariantSpec,
};
use crate::value::Value;

fn shape_mismatch(expected: &str, found: &Value) -> EncodeError {
    EncodeError::ShapeMismatch {
        expected: expected.to_string(),
        found: found.type_label().to_string(),
    }
}

/// Writes canonical encodings of values into one growing buffer.
pub struct Encoder<'r> {
    registry: &'r Registry,
    writer: ByteWriter,
    max_depth: usize,
    depth: usize,
}

impl<'r> Encoder<'r> {
    pub fn new(registry: &'r Registry, config: &CodecConfig) -> Self {
        Self {
            registry,
            writer: ByteWriter::new(),
            max_depth: config.max_depth,
            depth: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.writer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writer.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_bytes()
    }

    /// Append the encoding of `value` as `type_name`.
    pub fn encode(&mut self, value: &Value, type_name: &str) -> EncodeResult<()> {
        let registry = self.registry;
        let codec = registry
            .get(type_name)
            .ok_or_else(|| EncodeError::UnknownType(type_name.to_string()))?;

        if self.depth >= self.max_depth {
            return Err(EncodeError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = self.encode_codec(codec, value);
        self.depth -= 1;
        result
    }

    fn encode_codec(&mut self, codec: &'r Codec, value: &Value) -> EncodeResult<()> {
        match &codec.kind {
            CodecKind::Int(kind) => {
                let n = value
                    .as_i128()
                    .ok_or_else(|| shape_mismatch(kind.type_name(), value))?;
                encode_int(&mut self.writer, *kind, n)
            }
            CodecKind::Bool => {
                let b = value.as_bool().ok_or_else(|| shape_mismatch("bool", value))?;
                encode_bool(&mut self.writer, b);
                Ok(())
            }
            CodecKind::Unit if value.is_unit() => Ok(()),
            CodecKind::Unit => Err(shape_mismatch("unit", value)),
            CodecKind::Bytes(spec) => {
                let data = value.as_bytes().ok_or_else(|| shape_mismatch("bytes", value))?;
                encode_bytes(&mut self.writer, spec, data)
            }
            CodecKind::Text(spec) => {
                let text = value.as_text().ok_or_else(|| shape_mismatch("text", value))?;
                encode_bytes(&mut self.writer, spec, text.as_bytes())
            }
            CodecKind::Struct(fields) => self.encode_struct(&codec.name, fields, value),
            CodecKind::Variant(spec) => self.encode_variant(&codec.name, spec, value),
            CodecKind::Repeated(spec) => self.encode_repeated(&codec.name, spec, value),
            CodecKind::Map(spec) => self.encode_map(&codec.name, spec, value),
        }
    }

    fn encode_struct(
        &mut self,
        name: &str,
        fields: &'r [FieldSpec],
        value: &Value,
    ) -> EncodeResult<()> {
        let record = value.as_record().ok_or_else(|| shape_mismatch("record", value))?;
        if let Some(extra) = record
            .keys()
            .find(|key| !fields.iter().any(|f| &f.name == *key))
        {
            return Err(EncodeError::UnexpectedField(extra.clone()));
        }

        let last = fields.len().saturating_sub(1);
        for (i, field) in fields.iter().enumerate() {
            let at_field = |e: EncodeError| e.within(name, Location::Field(field.name.clone()));
            let member = record.get(&field.name);
            match (field.presence, member) {
                (Presence::Required, None) => {
                    return Err(at_field(EncodeError::MissingField(field.name.clone())));
                }
                (Presence::Trailing, _) if i != last => {
                    return Err(at_field(EncodeError::InvalidSchema {
                        reason: "trailing field is not the last field".into(),
                    }));
                }
                (Presence::Flagged, present) => encode_bool(&mut self.writer, present.is_some()),
                _ => {}
            }
            if let Some(member) = member {
                self.encode(member, &field.type_name).map_err(at_field)?;
            }
        }
        Ok(())
    }

    fn encode_variant(
        &mut self,
        name: &str,
        spec: &'r VariantSpec,
        value: &Value,
    ) -> EncodeResult<()> {
        let Value::Variant(tag, arm_name, payload) = value else {
            return Err(shape_mismatch("variant", value));
        };
        let arm = spec
            .arm_by_tag(*tag)
            .ok_or_else(|| EncodeError::UnknownVariantTag(*tag).within(name, Location::Tag))?;
        if &arm.name != arm_name {
            return Err(EncodeError::ShapeMismatch {
                expected: format!("arm {} for tag {}", arm.name, tag),
                found: format!("arm {}", arm_name),
            }
            .within(name, Location::Tag));
        }

        encode_int(&mut self.writer, spec.tag, i128::from(*tag))
            .map_err(|e| e.within(name, Location::Tag))?;
        self.encode(payload, &arm.type_name)
            .map_err(|e| e.within(name, Location::Arm(arm.name.clone())))
    }

    fn encode_repeated(
        &mut self,
        name: &str,
        spec: &'r RepeatedSpec,
        value: &Value,
    ) -> EncodeResult<()> {
        let items = value
            .as_sequence()
            .ok_or_else(|| shape_mismatch("sequence", value))?;
        if let CountSource::Prefixed(kind) = spec.count {
            encode_int(&mut self.writer, kind, items.len() as i128)
                .map_err(|e| e.within(name, Location::Count))?;
        }
        for (i, item) in items.iter().enumerate() {
            self.encode(item, &spec.element)
                .map_err(|e| e.within(name, Location::Index(i)))?;
        }
        Ok(())
    }

    fn encode_map(&mut self, name: &str, spec: &'r MapSpec, value: &Value) -> EncodeResult<()> {
        let entries = value.as_map().ok_or_else(|| shape_mismatch("map", value))?;
        encode_int(&mut self.writer, spec.count, entries.len() as i128)
            .map_err(|e| e.within(name, Location::Count))?;
        for (i, (key, entry)) in entries.iter().enumerate() {
            self.encode(key, &spec.key)
                .map_err(|e| e.within(name, Location::Key(i)))?;
            self.encode(entry, &spec.value)
                .map_err(|e| e.within(name, Location::Entry(i)))?;
        }
        Ok(())
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch facade: decode, validate and encode by type name.
//!
//! [`Codecs`] is the single entry point for callers that hold a type name and
//! a byte buffer. It owns a sealed [`Registry`] and is shared read-only, so
//! one instance serves any number of threads.
//!
//! # Example
//!
//! ```rust
//! use txcodec::{Codecs, CodecConfig, Registry, Value};
//! use txcodec::schema::StructBuilder;
//!
//! let mut registry = Registry::with_primitives();
//! registry
//!     .register(StructBuilder::new("Point").field("x", "uint32").field("y", "uint32").build())
//!     .unwrap();
//! let codecs = Codecs::with_config(registry, CodecConfig::default());
//!
//! let point = codecs.decode_named("Point", &[0, 0, 0, 5, 0, 0, 0, 10]).unwrap();
//! assert_eq!(point.field("y"), Some(&Value::Uint(10)));
//! assert!(codecs.decode_named("Point", &[0, 0, 0, 5]).is_err());
//! ```

use crate::codec::{encode_value, Decoder};
use crate::config::CodecConfig;
use crate::error::{CodecError, DecodeError};
use crate::registry::Registry;
use crate::validate::validate;
use crate::value::Value;
use serde::Serialize;

/// Boundary-shaped outcome of [`Codecs::decode_tagged`].
///
/// Serializes as `{"kind": "ok", "value": ..}` or
/// `{"kind": "error", "message": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TaggedResult {
    Ok { value: Value },
    Error { message: String },
}

impl TaggedResult {
    /// Fold a facade result for `name` into the boundary shape.
    pub fn from_result(name: &str, result: Result<Value, CodecError>) -> Self {
        match result {
            Ok(value) => TaggedResult::Ok { value },
            Err(err) => {
                let cause = match &err {
                    CodecError::Decode { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                TaggedResult::Error {
                    message: format!("{}.from_bytes() raised {}", name, cause),
                }
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, TaggedResult::Ok { .. })
    }

    pub fn into_result(self) -> Result<Value, String> {
        match self {
            TaggedResult::Ok { value } => Ok(value),
            TaggedResult::Error { message } => Err(message),
        }
    }
}

/// Registry plus limits, ready to serve lookups.
#[derive(Debug, Clone)]
pub struct Codecs {
    registry: Registry,
    config: CodecConfig,
}

impl Codecs {
    pub fn new(registry: Registry) -> Self {
        Self::with_config(registry, CodecConfig::default())
    }

    pub fn with_config(registry: Registry, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Structural decode only: lookup, input limit, decode and the
    /// whole-buffer check. No validation rules run.
    pub fn decode_structural(&self, name: &str, bytes: &[u8]) -> Result<Value, CodecError> {
        let codec = self
            .registry
            .get(name)
            .ok_or_else(|| CodecError::UnknownType(name.to_string()))?;
        let failed = |source: DecodeError| CodecError::Decode {
            type_name: name.to_string(),
            source,
        };

        if bytes.len() > self.config.max_input_len {
            return Err(failed(DecodeError::LengthMismatch {
                offset: 0,
                length: bytes.len() as u64,
                expected: format!("input limit {}", self.config.max_input_len),
            }));
        }

        let mut decoder = Decoder::new(&self.registry, bytes, &self.config);
        let value = decoder.decode(name).map_err(failed)?;
        if codec.whole_buffer && decoder.remaining() > 0 {
            return Err(failed(DecodeError::TrailingBytes {
                offset: decoder.offset(),
                remaining: decoder.remaining(),
            }));
        }
        log::trace!(
            "[txcodec] decoded {} ({} of {} bytes)",
            name,
            decoder.offset(),
            bytes.len()
        );
        Ok(value)
    }

    /// Decode `bytes` as `name` and run its validation rules.
    pub fn decode_named(&self, name: &str, bytes: &[u8]) -> Result<Value, CodecError> {
        let result = self
            .decode_structural(name, bytes)
            .and_then(|value| self.validate_named(name, &value).map(|()| value));
        if let Err(err) = &result {
            log::debug!(
                "[txcodec] decode of {} ({} bytes) failed: {}",
                name,
                bytes.len(),
                err
            );
        }
        result
    }

    /// Run the validation rules of `name` over an existing value.
    pub fn validate_named(&self, name: &str, value: &Value) -> Result<(), CodecError> {
        if !self.registry.contains(name) {
            return Err(CodecError::UnknownType(name.to_string()));
        }
        validate(&self.registry, &self.config, name, value)?;
        Ok(())
    }

    /// Canonical encoding of `value` as `name`.
    pub fn encode(&self, value: &Value, name: &str) -> Result<Vec<u8>, CodecError> {
        if !self.registry.contains(name) {
            return Err(CodecError::UnknownType(name.to_string()));
        }
        encode_value(&self.registry, &self.config, value, name).map_err(|source| {
            CodecError::Encode {
                type_name: name.to_string(),
                source,
            }
        })
    }

    /// [`decode_named`](Self::decode_named) folded into a [`TaggedResult`].
    pub fn decode_tagged(&self, name: &str, bytes: &[u8]) -> TaggedResult {
        TaggedResult::from_result(name, self.decode_named(name, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::primitive::IntKind;
    use crate::schema::{Codec, CountSource, StructBuilder};
    use crate::validate::Rule;

    fn codecs() -> Codecs {
        let mut reg = Registry::with_primitives();
        reg.register_all([
            StructBuilder::new("Point")
                .field("x", "uint32")
                .field("y", "uint32")
                .build(),
            StructBuilder::new("Exact")
                .field("v", "uint16")
                .whole_buffer()
                .build(),
            Codec::int("Small", IntKind::U8).rule(Rule::IntRange { min: 0, max: 9 }),
            Codec::repeated("Smalls", "Small", CountSource::UntilExhausted).whole_buffer(),
        ])
        .expect("register");
        Codecs::new(reg)
    }

    #[test]
    fn test_trailing_bytes_policy() {
        let codecs = codecs();
        // Point does not require the whole buffer.
        codecs
            .decode_named("Point", &[0, 0, 0, 1, 0, 0, 0, 2, 0xFF])
            .expect("prefix decode");

        let err = codecs.decode_named("Exact", &[0, 1, 0xFF]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TrailingBytes);
        codecs.decode_named("Exact", &[0, 1]).expect("exact");
    }

    #[test]
    fn test_validation_runs_after_decode() {
        let codecs = codecs();
        let err = codecs.decode_named("Smalls", &[1, 20, 3, 40]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let paths: Vec<&str> = err.violations().iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["Smalls[1]", "Smalls[3]"]);

        let raw = codecs
            .decode_structural("Smalls", &[1, 20, 3, 40])
            .expect("structurally fine");
        assert_eq!(raw.len(), Some(4));
    }

    #[test]
    fn test_unknown_type_everywhere() {
        let codecs = codecs();
        assert_eq!(
            codecs.decode_named("NoSuchType", &[1, 2, 3]).unwrap_err(),
            CodecError::UnknownType("NoSuchType".into())
        );
        assert!(matches!(
            codecs.validate_named("NoSuchType", &Value::Unit),
            Err(CodecError::UnknownType(_))
        ));
        assert!(matches!(
            codecs.encode(&Value::Unit, "NoSuchType"),
            Err(CodecError::UnknownType(_))
        ));
    }

    #[test]
    fn test_input_limit() {
        let mut reg = Registry::with_primitives();
        reg.register(Codec::repeated("Blob", "uint8", CountSource::UntilExhausted))
            .expect("blob");
        let codecs = Codecs::with_config(
            reg,
            CodecConfig {
                max_input_len: 4,
                ..CodecConfig::default()
            },
        );
        codecs.decode_named("Blob", &[1, 2, 3, 4]).expect("at limit");
        let err = codecs.decode_named("Blob", &[1, 2, 3, 4, 5]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LengthMismatch);
    }

    #[test]
    fn test_tagged_result_shape() {
        let codecs = codecs();
        let ok = codecs.decode_tagged("Point", &[0, 0, 0, 5, 0, 0, 0, 10]);
        assert!(ok.is_ok());
        let json = serde_json::to_value(&ok).expect("json");
        assert_eq!(json["kind"], "ok");
        assert_eq!(json["value"]["x"], 5);

        let err = codecs.decode_tagged("Point", &[0, 0, 0, 5, 0, 0, 0]);
        let json = serde_json::to_value(&err).expect("json");
        assert_eq!(json["kind"], "error");
        let message = err.into_result().unwrap_err();
        assert!(message.starts_with("Point.from_bytes() raised Point.y: out of bounds"));
    }

    #[test]
    fn test_encode_errors_name_the_type() {
        let codecs = codecs();
        let err = codecs
            .encode(&Value::record([("x", Value::Uint(1))]), "Point")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encode);
        assert!(err.to_string().starts_with("failed to encode Point"));
    }

    #[test]
    fn test_codecs_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Codecs>();
    }
}

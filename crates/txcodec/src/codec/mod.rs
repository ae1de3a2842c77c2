// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Composite decoding and encoding.
//!
//! [`Decoder`] and [`Encoder`] walk a [`CodecKind`](crate::schema::CodecKind)
//! tree, resolving referenced type names through the [`Registry`] as they go.
//! Every composite layer wraps the failure of a child with its own type name
//! and the field, index, map entry or arm involved.
//!
//! # Wire layout
//!
//! | Kind       | Layout                                                      |
//! |------------|-------------------------------------------------------------|
//! | `Struct`   | fields in declaration order, `Flagged` fields behind 0/1    |
//! | `Variant`  | discriminant (`IntKind`), then the arm payload              |
//! | `Repeated` | count (`IntKind`) then elements, or elements until the end  |
//! | `Map`      | count (`IntKind`) then `key, value` pairs                   |

mod decode;
mod encode;

pub use decode::Decoder;
pub use encode::Encoder;

use crate::config::CodecConfig;
use crate::error::{DecodeResult, EncodeResult};
use crate::registry::Registry;
use crate::value::Value;

/// Decode one value of `type_name` from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed. Trailing input is
/// left to the caller.
pub fn decode_prefix(
    registry: &Registry,
    config: &CodecConfig,
    type_name: &str,
    bytes: &[u8],
) -> DecodeResult<(Value, usize)> {
    let mut decoder = Decoder::new(registry, bytes, config);
    let value = decoder.decode(type_name)?;
    Ok((value, decoder.offset()))
}

/// Canonical encoding of `value` as `type_name`.
pub fn encode_value(
    registry: &Registry,
    config: &CodecConfig,
    value: &Value,
    type_name: &str,
) -> EncodeResult<Vec<u8>> {
    let mut encoder = Encoder::new(registry, config);
    encoder.encode(value, type_name)?;
    Ok(encoder.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{BytesSpec, IntKind, LengthBound};
    use crate::schema::{Codec, CountSource, StructBuilder, VariantBuilder};

    fn registry() -> Registry {
        let mut reg = Registry::with_primitives();
        reg.register_all([
            StructBuilder::new("Entry")
                .field("id", "int16")
                .field("name", "Name")
                .optional("score", "uint64")
                .field("tags", "Tags")
                .build(),
            Codec::text(
                "Name",
                BytesSpec::prefixed(IntKind::U8).bounded(LengthBound::between(1, 16)),
            ),
            Codec::repeated("Tags", "Tag", CountSource::Prefixed(IntKind::U16)),
            VariantBuilder::new("Tag", IntKind::U8)
                .unit_arm(0, "Plain")
                .arm(1, "Weighted", "uint8")
                .arm(2, "Nested", "Tags")
                .build(),
        ])
        .expect("register");
        reg
    }

    #[test]
    fn test_round_trip_nested_value() {
        let reg = registry();
        let config = CodecConfig::default();
        let value = Value::record([
            ("id", Value::Int(-3)),
            ("name", Value::from("alpha")),
            ("score", Value::Uint(u64::MAX)),
            (
                "tags",
                Value::Sequence(vec![
                    Value::variant(0, "Plain", Value::Unit),
                    Value::variant(
                        2,
                        "Nested",
                        Value::Sequence(vec![Value::variant(1, "Weighted", Value::Uint(7))]),
                    ),
                ]),
            ),
        ]);

        let bytes = encode_value(&reg, &config, &value, "Entry").expect("encode");
        let (decoded, used) = decode_prefix(&reg, &config, "Entry", &bytes).expect("decode");
        assert_eq!(decoded, value);
        assert_eq!(used, bytes.len());
    }

    #[test]
    fn test_decode_prefix_leaves_trailing_input() {
        let reg = registry();
        let (value, used) =
            decode_prefix(&reg, &CodecConfig::default(), "uint16", &[0x12, 0x34, 0xFF])
                .expect("decode");
        assert_eq!(value, Value::Uint(0x1234));
        assert_eq!(used, 2);
    }

    #[test]
    fn test_bounded_text_length_mismatch_in_context() {
        let reg = registry();
        let bytes = [0x00, 0x01, 0x00];
        let err = decode_prefix(&reg, &CodecConfig::default(), "Entry", &bytes).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::LengthMismatch);
        assert_eq!(err.path(), "Entry.name");
    }
}

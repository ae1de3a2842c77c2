// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decoded value tree.

use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A decoded value of any registered type.
///
/// Values are plain owned data: they never borrow from the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    // Primitives
    Unit,
    Bool(bool),
    Uint(u64),
    Int(i64),
    Bytes(Vec<u8>),
    Text(String),

    // Composites
    Sequence(Vec<Value>),
    Map(Vec<(Value, Value)>),
    /// Struct fields by name. Absent optional fields are not present.
    Record(BTreeMap<String, Value>),
    Variant(u64, String, Box<Value>), // (tag, arm_name, payload)
}

impl Value {
    /// Build a record from `(field, value)` pairs.
    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a variant value.
    pub fn variant(tag: u64, arm: impl Into<String>, payload: Value) -> Self {
        Self::Variant(tag, arm.into(), Box::new(payload))
    }

    /// Short shape name used in error messages.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool(_) => "bool",
            Self::Uint(_) => "uint",
            Self::Int(_) => "int",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Sequence(_) => "sequence",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
            Self::Variant(..) => "variant",
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer value regardless of signedness.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Uint(v) => Some(i128::from(*v)),
            Self::Int(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Record(v) => Some(v),
            _ => None,
        }
    }

    /// Record field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_record()?.get(name)
    }

    /// Mutable record field by name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Self::Record(fields) => fields.get_mut(name),
            _ => None,
        }
    }

    /// Set a record field. Returns `false` if this is not a record.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) -> bool {
        match self {
            Self::Record(fields) => {
                fields.insert(name.into(), value);
                true
            }
            _ => false,
        }
    }

    pub fn variant_tag(&self) -> Option<u64> {
        match self {
            Self::Variant(tag, _, _) => Some(*tag),
            _ => None,
        }
    }

    pub fn variant_arm(&self) -> Option<&str> {
        match self {
            Self::Variant(_, arm, _) => Some(arm),
            _ => None,
        }
    }

    pub fn variant_payload(&self) -> Option<&Value> {
        match self {
            Self::Variant(_, _, payload) => Some(payload),
            _ => None,
        }
    }

    /// Number of elements for length-carrying values.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Bytes(v) => Some(v.len()),
            Self::Text(v) => Some(v.len()),
            Self::Sequence(v) => Some(v.len()),
            Self::Map(v) => Some(v.len()),
            _ => None,
        }
    }
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty, $($source:ty),*) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Self::$variant(<$target>::from(v))
                }
            }
        )*
    };
}

impl_from_int!(Uint, u64, u8, u16, u32, u64);
impl_from_int!(Int, i64, i8, i16, i32, i64);

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Value {
    fn from(v: [u8; N]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Sequence(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "()"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Uint(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
            Self::Text(v) => write!(f, "{:?}", v),
            Self::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", key, value)?;
                }
                write!(f, "}}")
            }
            Self::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
            Self::Variant(tag, arm, payload) => {
                if payload.is_unit() {
                    write!(f, "{}#{}", arm, tag)
                } else {
                    write!(f, "{}#{}({})", arm, tag, payload)
                }
            }
        }
    }
}

/// JSON-friendly shape: bytes as hex strings, maps as `[key, value]` pairs,
/// variants as `{ "tag", "arm", "value" }`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unit => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Uint(v) => serializer.serialize_u64(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Bytes(v) => serializer.serialize_str(&hex::encode(v)),
            Self::Text(v) => serializer.serialize_str(v),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut seq = serializer.serialize_seq(Some(entries.len()))?;
                for (key, value) in entries {
                    seq.serialize_element(&(key, value))?;
                }
                seq.end()
            }
            Self::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Self::Variant(tag, arm, payload) => {
                let mut st = serializer.serialize_struct("Variant", 3)?;
                st.serialize_field("tag", tag)?;
                st.serialize_field("arm", arm)?;
                st.serialize_field("value", payload.as_ref())?;
                st.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_values() {
        let v = Value::from(42u32);
        assert_eq!(v.as_uint(), Some(42));
        assert_eq!(v.as_int(), None);
        assert_eq!(v.as_i128(), Some(42));

        let v = Value::from(-7i16);
        assert_eq!(v.as_int(), Some(-7));

        let v = Value::from("hello");
        assert_eq!(v.as_text(), Some("hello"));
    }

    #[test]
    fn test_record_equality_ignores_construction_order() {
        let a = Value::record([("x", Value::from(5u32)), ("y", Value::from(10u32))]);
        let b = Value::record([("y", Value::from(10u32)), ("x", Value::from(5u32))]);
        assert_eq!(a, b);
        assert_eq!(a.field("x").and_then(Value::as_uint), Some(5));
        assert!(a.field("z").is_none());
    }

    #[test]
    fn test_set_field() {
        let mut v = Value::record(Vec::<(String, Value)>::new());
        assert!(v.set_field("fee", 170_000u64.into()));
        assert_eq!(v.field("fee").and_then(Value::as_uint), Some(170_000));
        assert!(!Value::Unit.set_field("fee", 1u64.into()));
    }

    #[test]
    fn test_variant_accessors() {
        let v = Value::variant(1, "Square", Value::record([("side", Value::from(4u32))]));
        assert_eq!(v.variant_tag(), Some(1));
        assert_eq!(v.variant_arm(), Some("Square"));
        assert_eq!(
            v.variant_payload()
                .and_then(|p| p.field("side"))
                .and_then(Value::as_uint),
            Some(4)
        );
    }

    #[test]
    fn test_display_is_compact() {
        let v = Value::record([
            ("hash", Value::from([0xDEu8, 0xAD])),
            ("items", Value::from(vec![Value::from(1u8), Value::from(2u8)])),
            ("kind", Value::variant(0, "None", Value::Unit)),
        ]);
        assert_eq!(v.to_string(), "{hash: 0xdead, items: [1, 2], kind: None#0}");
    }

    #[test]
    fn test_json_shape() {
        let v = Value::record([
            ("id", Value::from([0x01u8, 0xFF])),
            (
                "assets",
                Value::Map(vec![(Value::from("ada"), Value::from(3u64))]),
            ),
            ("script", Value::variant(4, "TimelockStart", Value::from(9u64))),
        ]);
        let json = serde_json::to_value(&v).expect("serialize");
        assert_eq!(json["id"], "01ff");
        assert_eq!(json["assets"][0][0], "ada");
        assert_eq!(json["assets"][0][1], 3);
        assert_eq!(json["script"]["arm"], "TimelockStart");
        assert_eq!(json["script"]["value"], 9);
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema descriptors.
//!
//! A [`Codec`] pairs a type name with a [`CodecKind`] (the closed set of
//! layouts the framework knows how to decode and encode), the validation
//! rules attached to it, and its trailing-byte policy.
//!
//! Composite kinds refer to their constituents by [`TypeName`] only; names
//! are resolved through the registry at decode time, which allows forward
//! references and recursive schemas.
//!
//! # Example
//!
//! ```rust
//! use txcodec::schema::{Codec, StructBuilder, VariantBuilder};
//! use txcodec::primitive::IntKind;
//!
//! let point = StructBuilder::new("Point")
//!     .field("x", "uint32")
//!     .field("y", "uint32")
//!     .build();
//!
//! let shape = VariantBuilder::new("Shape", IntKind::U8)
//!     .arm(0, "Circle", "Circle")
//!     .arm(1, "Square", "Square")
//!     .build();
//!
//! assert!(point.kind.fields().is_some());
//! assert_eq!(shape.kind.label(), "variant");
//! ```

mod builder;

pub use builder::{StructBuilder, VariantBuilder};

use crate::primitive::{BytesSpec, IntKind};
use crate::validate::Rule;

/// Opaque identifier of a registered codec.
pub type TypeName = String;

/// How absence of an optional struct field is signalled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Always present.
    Required,
    /// One byte `0x00` (absent) or `0x01` (present) before the value.
    Flagged,
    /// Present iff bytes remain in the buffer. Last field only.
    Trailing,
}

/// Struct member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub type_name: TypeName,
    pub presence: Presence,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            presence: Presence::Required,
        }
    }

    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    pub fn is_optional(&self) -> bool {
        self.presence != Presence::Required
    }
}

/// Variant arm selected by a discriminant value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arm {
    pub tag: u64,
    pub name: String,
    pub type_name: TypeName,
}

/// Tagged union: a discriminant of kind `tag` followed by the arm payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    pub tag: IntKind,
    pub arms: Vec<Arm>,
}

impl VariantSpec {
    pub fn arm_by_tag(&self, tag: u64) -> Option<&Arm> {
        self.arms.iter().find(|arm| arm.tag == tag)
    }

    pub fn arm_by_name(&self, name: &str) -> Option<&Arm> {
        self.arms.iter().find(|arm| arm.name == name)
    }
}

/// Where the element count of a repeated codec comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSource {
    /// Count primitive of the given kind before the elements.
    Prefixed(IntKind),
    /// Elements until the cursor has nothing left. Last field only.
    UntilExhausted,
}

/// Homogeneous sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatedSpec {
    pub element: TypeName,
    pub count: CountSource,
}

/// Count-prefixed list of key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSpec {
    pub key: TypeName,
    pub value: TypeName,
    pub count: IntKind,
    /// Duplicate keys are a validation failure unless set.
    pub allow_duplicates: bool,
}

/// Closed set of layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecKind {
    Int(IntKind),
    Bool,
    Unit,
    Bytes(BytesSpec),
    Text(BytesSpec),
    Struct(Vec<FieldSpec>),
    Variant(VariantSpec),
    Repeated(RepeatedSpec),
    Map(MapSpec),
}

impl CodecKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Bool => "bool",
            Self::Unit => "unit",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Struct(_) => "struct",
            Self::Variant(_) => "variant",
            Self::Repeated(_) => "repeated",
            Self::Map(_) => "map",
        }
    }

    /// Fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldSpec]> {
        match self {
            Self::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Type names this kind refers to, in declaration order.
    pub fn references(&self) -> Vec<&str> {
        match self {
            Self::Struct(fields) => fields.iter().map(|f| f.type_name.as_str()).collect(),
            Self::Variant(spec) => spec.arms.iter().map(|a| a.type_name.as_str()).collect(),
            Self::Repeated(spec) => vec![spec.element.as_str()],
            Self::Map(spec) => vec![spec.key.as_str(), spec.value.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn is_until_exhausted(&self) -> bool {
        matches!(
            self,
            Self::Repeated(RepeatedSpec {
                count: CountSource::UntilExhausted,
                ..
            })
        )
    }
}

/// A named, immutable decode/encode/validate triple.
#[derive(Debug, Clone)]
pub struct Codec {
    pub name: TypeName,
    pub kind: CodecKind,
    /// Semantic rules run after a successful structural decode.
    pub rules: Vec<Rule>,
    /// Top-level decodes must consume the entire input.
    pub whole_buffer: bool,
}

impl Codec {
    pub fn new(name: impl Into<TypeName>, kind: CodecKind) -> Self {
        Self {
            name: name.into(),
            kind,
            rules: Vec::new(),
            whole_buffer: false,
        }
    }

    pub fn int(name: impl Into<TypeName>, kind: IntKind) -> Self {
        Self::new(name, CodecKind::Int(kind))
    }

    pub fn bool(name: impl Into<TypeName>) -> Self {
        Self::new(name, CodecKind::Bool)
    }

    pub fn unit(name: impl Into<TypeName>) -> Self {
        Self::new(name, CodecKind::Unit)
    }

    pub fn bytes(name: impl Into<TypeName>, spec: BytesSpec) -> Self {
        Self::new(name, CodecKind::Bytes(spec))
    }

    pub fn text(name: impl Into<TypeName>, spec: BytesSpec) -> Self {
        Self::new(name, CodecKind::Text(spec))
    }

    pub fn repeated(
        name: impl Into<TypeName>,
        element: impl Into<TypeName>,
        count: CountSource,
    ) -> Self {
        Self::new(
            name,
            CodecKind::Repeated(RepeatedSpec {
                element: element.into(),
                count,
            }),
        )
    }

    pub fn map(
        name: impl Into<TypeName>,
        key: impl Into<TypeName>,
        value: impl Into<TypeName>,
        count: IntKind,
    ) -> Self {
        Self::new(
            name,
            CodecKind::Map(MapSpec {
                key: key.into(),
                value: value.into(),
                count,
                allow_duplicates: false,
            }),
        )
    }

    /// Permit duplicate keys (maps only).
    pub fn allow_duplicate_keys(mut self) -> Self {
        if let CodecKind::Map(spec) = &mut self.kind {
            spec.allow_duplicates = true;
        }
        self
    }

    /// Attach a validation rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Require top-level decodes to consume the whole buffer.
    pub fn whole_buffer(mut self) -> Self {
        self.whole_buffer = true;
        self
    }
}

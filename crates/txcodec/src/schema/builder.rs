// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builders for struct and variant codecs.

use crate::primitive::IntKind;
use crate::schema::{Arm, Codec, CodecKind, FieldSpec, Presence, TypeName, VariantSpec};
use crate::validate::Rule;

/// Builder for struct codecs. Fields decode in declaration order.
#[derive(Debug)]
pub struct StructBuilder {
    name: TypeName,
    fields: Vec<FieldSpec>,
    rules: Vec<Rule>,
    whole_buffer: bool,
}

impl StructBuilder {
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            rules: Vec::new(),
            whole_buffer: false,
        }
    }

    /// Add a required field.
    pub fn field(mut self, name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        self.fields.push(FieldSpec::new(name, type_name));
        self
    }

    /// Add an optional field carried behind a one-byte presence flag.
    pub fn optional(mut self, name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        self.fields
            .push(FieldSpec::new(name, type_name).with_presence(Presence::Flagged));
        self
    }

    /// Add an optional last field, present iff input remains.
    pub fn trailing(mut self, name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        self.fields
            .push(FieldSpec::new(name, type_name).with_presence(Presence::Trailing));
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn whole_buffer(mut self) -> Self {
        self.whole_buffer = true;
        self
    }

    pub fn build(self) -> Codec {
        Codec {
            name: self.name,
            kind: CodecKind::Struct(self.fields),
            rules: self.rules,
            whole_buffer: self.whole_buffer,
        }
    }
}

/// Builder for tagged unions.
#[derive(Debug)]
pub struct VariantBuilder {
    name: TypeName,
    tag: IntKind,
    arms: Vec<Arm>,
    rules: Vec<Rule>,
}

impl VariantBuilder {
    pub fn new(name: impl Into<TypeName>, tag: IntKind) -> Self {
        Self {
            name: name.into(),
            tag,
            arms: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Add an arm whose payload is a value of `type_name`.
    pub fn arm(
        mut self,
        tag: u64,
        name: impl Into<String>,
        type_name: impl Into<TypeName>,
    ) -> Self {
        self.arms.push(Arm {
            tag,
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }

    /// Add a tag-only arm.
    pub fn unit_arm(self, tag: u64, name: impl Into<String>) -> Self {
        self.arm(tag, name, "unit")
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn build(self) -> Codec {
        Codec {
            name: self.name,
            kind: CodecKind::Variant(VariantSpec {
                tag: self.tag,
                arms: self.arms,
            }),
            rules: self.rules,
            whole_buffer: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_builder_presence() {
        let codec = StructBuilder::new("TransactionOutput")
            .field("address", "Address")
            .optional("datum_hash", "Hash32")
            .trailing("memo", "text")
            .whole_buffer()
            .build();
        let fields = codec.kind.fields().expect("struct");
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].presence, Presence::Required);
        assert_eq!(fields[1].presence, Presence::Flagged);
        assert_eq!(fields[2].presence, Presence::Trailing);
        assert!(fields[2].is_optional());
        assert!(codec.whole_buffer);
    }

    #[test]
    fn test_variant_builder_unit_arm() {
        let codec = VariantBuilder::new("Network", IntKind::U8)
            .unit_arm(0, "Testnet")
            .unit_arm(1, "Mainnet")
            .build();
        assert_eq!(codec.kind.references(), vec!["unit", "unit"]);
    }
}

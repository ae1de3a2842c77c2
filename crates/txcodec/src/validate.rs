// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Post-decode validation.
//!
//! A structurally decoded value is only *valid* once every [`Rule`] attached
//! to every codec it passed through holds. Rules are schema metadata: the
//! generic framework evaluates them, it never hardcodes type-specific checks.
//!
//! All rules run on all nodes; every failure is collected into one
//! [`ValidationError`] instead of stopping at the first.

use crate::codec::Encoder;
use crate::config::CodecConfig;
use crate::error::{ValidationError, Violation};
use crate::registry::Registry;
use crate::schema::{Codec, CodecKind};
use crate::value::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied predicate. `Err` carries the violation message.
pub type CheckFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

/// Semantic constraint attached to a codec.
#[derive(Clone)]
pub enum Rule {
    /// Element or byte count of bytes, text, sequences and maps.
    LengthBetween { min: usize, max: usize },
    /// Inclusive integer range.
    IntRange { min: i128, max: i128 },
    /// Enum domain: allowed integer values or variant tags.
    OneOf(Vec<u64>),
    NonEmpty,
    /// CRC-32 (IEEE) over the concatenated canonical encodings of `fields`
    /// must equal the integer field `checksum`.
    Crc32 { fields: Vec<String>, checksum: String },
    Custom { name: String, check: Arc<CheckFn> },
}

impl Rule {
    pub fn crc32<S: Into<String>>(fields: impl IntoIterator<Item = S>, checksum: S) -> Self {
        Rule::Crc32 {
            fields: fields.into_iter().map(Into::into).collect(),
            checksum: checksum.into(),
        }
    }

    pub fn custom<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Rule::Custom {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Name reported in violations.
    pub fn name(&self) -> &str {
        match self {
            Rule::LengthBetween { .. } => "length_between",
            Rule::IntRange { .. } => "int_range",
            Rule::OneOf(_) => "one_of",
            Rule::NonEmpty => "non_empty",
            Rule::Crc32 { .. } => "crc32",
            Rule::Custom { name, .. } => name.as_str(),
        }
    }

    fn check(&self, value: &Value, ctx: &RuleContext<'_>) -> Result<(), String> {
        match self {
            Rule::LengthBetween { min, max } => {
                let len = value
                    .len()
                    .ok_or_else(|| format!("{} has no length", value.type_label()))?;
                if len < *min || len > *max {
                    return Err(format!("length {} outside [{}, {}]", len, min, max));
                }
                Ok(())
            }
            Rule::IntRange { min, max } => {
                let n = value
                    .as_i128()
                    .ok_or_else(|| format!("{} is not an integer", value.type_label()))?;
                if n < *min || n > *max {
                    return Err(format!("{} outside [{}, {}]", n, min, max));
                }
                Ok(())
            }
            Rule::OneOf(domain) => {
                let n = match value.variant_tag() {
                    Some(tag) => i128::from(tag),
                    None => value
                        .as_i128()
                        .ok_or_else(|| format!("{} has no discriminant", value.type_label()))?,
                };
                // Negative values are never in an unsigned domain.
                if !u64::try_from(n).is_ok_and(|n| domain.contains(&n)) {
                    return Err(format!("{} not in {:?}", n, domain));
                }
                Ok(())
            }
            Rule::NonEmpty => match value.len() {
                Some(0) => Err("empty".into()),
                Some(_) => Ok(()),
                None => Err(format!("{} has no length", value.type_label())),
            },
            Rule::Crc32 { fields, checksum } => ctx.check_crc32(value, fields, checksum),
            Rule::Custom { check, .. } => (**check)(value),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::LengthBetween { min, max } => f
                .debug_struct("LengthBetween")
                .field("min", min)
                .field("max", max)
                .finish(),
            Rule::IntRange { min, max } => f
                .debug_struct("IntRange")
                .field("min", min)
                .field("max", max)
                .finish(),
            Rule::OneOf(domain) => f.debug_tuple("OneOf").field(domain).finish(),
            Rule::NonEmpty => f.write_str("NonEmpty"),
            Rule::Crc32 { fields, checksum } => f
                .debug_struct("Crc32")
                .field("fields", fields)
                .field("checksum", checksum)
                .finish(),
            Rule::Custom { name, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .finish_non_exhaustive(),
        }
    }
}

/// What a rule may look at besides the value itself.
struct RuleContext<'r> {
    registry: &'r Registry,
    config: &'r CodecConfig,
    codec: &'r Codec,
}

impl RuleContext<'_> {
    fn check_crc32(&self, value: &Value, fields: &[String], checksum: &str) -> Result<(), String> {
        let specs = self
            .codec
            .kind
            .fields()
            .ok_or_else(|| "crc32 applies to struct codecs only".to_string())?;
        let expected = value
            .field(checksum)
            .and_then(Value::as_uint)
            .ok_or_else(|| format!("checksum field `{}` missing", checksum))?;

        let mut encoder = Encoder::new(self.registry, self.config);
        for name in fields {
            let spec = specs
                .iter()
                .find(|f| &f.name == name)
                .ok_or_else(|| format!("`{}` is not a field of {}", name, self.codec.name))?;
            let member = value
                .field(name)
                .ok_or_else(|| format!("field `{}` missing", name))?;
            encoder
                .encode(member, &spec.type_name)
                .map_err(|e| format!("cannot encode `{}`: {}", name, e))?;
        }

        let actual = u64::from(crc32fast::hash(&encoder.into_bytes()));
        if actual != expected {
            return Err(format!(
                "checksum {:#010x} does not match computed {:#010x}",
                expected, actual
            ));
        }
        Ok(())
    }
}

/// Run every rule reachable from `type_name` over `value`.
pub fn validate(
    registry: &Registry,
    config: &CodecConfig,
    type_name: &str,
    value: &Value,
) -> Result<(), ValidationError> {
    let mut validator = Validator {
        registry,
        config,
        violations: Vec::new(),
    };
    validator.walk(type_name, value, type_name.to_string(), 0);

    if validator.violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError {
            type_name: type_name.to_string(),
            violations: validator.violations,
        })
    }
}

struct Validator<'r> {
    registry: &'r Registry,
    config: &'r CodecConfig,
    violations: Vec<Violation>,
}

impl<'r> Validator<'r> {
    fn report(&mut self, path: &str, rule: &str, message: impl Into<String>) {
        self.violations.push(Violation {
            path: path.to_string(),
            rule: rule.to_string(),
            message: message.into(),
        });
    }

    fn walk(&mut self, type_name: &str, value: &Value, path: String, depth: usize) {
        let registry = self.registry;
        let Some(codec) = registry.get(type_name) else {
            self.report(&path, "schema", format!("unknown type `{}`", type_name));
            return;
        };
        if depth >= self.config.max_depth {
            self.report(
                &path,
                "schema",
                format!("nesting depth limit {} exceeded", self.config.max_depth),
            );
            return;
        }

        let ctx = RuleContext {
            registry,
            config: self.config,
            codec,
        };
        for rule in &codec.rules {
            if let Err(message) = rule.check(value, &ctx) {
                self.report(&path, rule.name(), message);
            }
        }

        match (&codec.kind, value) {
            (CodecKind::Struct(fields), Value::Record(record)) => {
                for field in fields {
                    if let Some(member) = record.get(&field.name) {
                        let child = format!("{}.{}", path, field.name);
                        self.walk(&field.type_name, member, child, depth + 1);
                    }
                }
            }
            (CodecKind::Variant(spec), Value::Variant(tag, _, payload)) => {
                match spec.arm_by_tag(*tag) {
                    Some(arm) => {
                        let child = format!("{}::{}", path, arm.name);
                        self.walk(&arm.type_name, payload, child, depth + 1);
                    }
                    None => self.report(&path, "schema", format!("no arm for tag {}", tag)),
                }
            }
            (CodecKind::Repeated(spec), Value::Sequence(items)) => {
                for (i, item) in items.iter().enumerate() {
                    let child = format!("{}[{}]", path, i);
                    self.walk(&spec.element, item, child, depth + 1);
                }
            }
            (CodecKind::Map(spec), Value::Map(entries)) => {
                if !spec.allow_duplicates {
                    self.check_unique_keys(&spec.key, entries, &path);
                }
                for (i, (key, entry)) in entries.iter().enumerate() {
                    self.walk(&spec.key, key, format!("{}[{}].key", path, i), depth + 1);
                    self.walk(&spec.value, entry, format!("{}[{}].value", path, i), depth + 1);
                }
            }
            (CodecKind::Struct(_), _)
            | (CodecKind::Variant(_), _)
            | (CodecKind::Repeated(_), _)
            | (CodecKind::Map(_), _) => {
                self.report(
                    &path,
                    "schema",
                    format!(
                        "{} codec cannot hold a {}",
                        codec.kind.label(),
                        value.type_label()
                    ),
                );
            }
            _ => {}
        }
    }

    /// Keys are compared by canonical encoding.
    fn check_unique_keys(&mut self, key_type: &str, entries: &[(Value, Value)], path: &str) {
        let mut seen = HashSet::with_capacity(entries.len());
        for (i, (key, _)) in entries.iter().enumerate() {
            let mut encoder = Encoder::new(self.registry, self.config);
            if let Err(e) = encoder.encode(key, key_type) {
                self.report(
                    path,
                    "schema",
                    format!("key at entry {} is not a {}: {}", i, key_type, e),
                );
                continue;
            }
            if !seen.insert(encoder.into_bytes()) {
                self.report(path, "unique_keys", format!("duplicate key {} at entry {}", key, i));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::IntKind;
    use crate::schema::{StructBuilder, VariantBuilder};

    fn registry() -> Registry {
        let mut reg = Registry::with_primitives();
        reg.register_all([
            Codec::int("Percent", IntKind::U8).rule(Rule::IntRange { min: 0, max: 100 }),
            Codec::text("Label", Default::default())
                .rule(Rule::NonEmpty)
                .rule(Rule::LengthBetween { min: 1, max: 8 }),
            VariantBuilder::new("Mode", IntKind::U8)
                .unit_arm(0, "Off")
                .unit_arm(1, "On")
                .unit_arm(2, "Legacy")
                .rule(Rule::OneOf(vec![0, 1]))
                .build(),
            StructBuilder::new("Setting")
                .field("label", "Label")
                .field("level", "Percent")
                .field("mode", "Mode")
                .build(),
            Codec::map("Levels", "uint8", "Percent", IntKind::U8),
        ])
        .expect("register");
        reg
    }

    fn setting(label: &str, level: u64, mode: u64, arm: &str) -> Value {
        Value::record([
            ("label", Value::from(label)),
            ("level", Value::Uint(level)),
            ("mode", Value::variant(mode, arm, Value::Unit)),
        ])
    }

    #[test]
    fn test_valid_value_passes() {
        let reg = registry();
        let value = setting("fan", 40, 1, "On");
        validate(&reg, &CodecConfig::default(), "Setting", &value).expect("valid");
    }

    #[test]
    fn test_every_violation_is_collected() {
        let reg = registry();
        let value = setting("", 150, 2, "Legacy");
        let err = validate(&reg, &CodecConfig::default(), "Setting", &value).unwrap_err();
        let rules: Vec<(&str, &str)> = err
            .violations
            .iter()
            .map(|v| (v.path.as_str(), v.rule.as_str()))
            .collect();
        assert_eq!(
            rules,
            vec![
                ("Setting.label", "non_empty"),
                ("Setting.label", "length_between"),
                ("Setting.level", "int_range"),
                ("Setting.mode", "one_of"),
            ]
        );
    }

    #[test]
    fn test_duplicate_map_keys() {
        let reg = registry();
        let levels = Value::Map(vec![
            (Value::Uint(1), Value::Uint(10)),
            (Value::Uint(2), Value::Uint(20)),
            (Value::Uint(1), Value::Uint(30)),
        ]);
        let err = validate(&reg, &CodecConfig::default(), "Levels", &levels).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].rule, "unique_keys");
        assert!(err.violations[0].message.contains("entry 2"));
    }

    #[test]
    fn test_unencodable_map_key_is_reported() {
        let reg = registry();
        let levels = Value::Map(vec![
            (Value::Uint(1), Value::Uint(10)),
            (Value::from("x"), Value::Uint(20)),
        ]);
        let err = validate(&reg, &CodecConfig::default(), "Levels", &levels).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].rule, "schema");
        assert_eq!(err.violations[0].path, "Levels");
        assert!(err.violations[0].message.starts_with("key at entry 1 is not a uint8"));
    }

    #[test]
    fn test_one_of_signed_values() {
        let mut reg = Registry::with_primitives();
        reg.register(Codec::int("Direction", IntKind::I8).rule(Rule::OneOf(vec![0, 1])))
            .expect("direction");
        let config = CodecConfig::default();
        validate(&reg, &config, "Direction", &Value::Int(1)).expect("in domain");
        validate(&reg, &config, "Direction", &Value::Uint(0)).expect("in domain");

        for out in [Value::Int(-1), Value::Int(2)] {
            let err = validate(&reg, &config, "Direction", &out).unwrap_err();
            assert_eq!(err.violations[0].rule, "one_of");
        }
        let err = validate(&reg, &config, "Direction", &Value::Int(-1)).unwrap_err();
        assert_eq!(err.violations[0].message, "-1 not in [0, 1]");
    }

    #[test]
    fn test_allowed_duplicate_keys() {
        let mut reg = Registry::with_primitives();
        reg.register(Codec::map("Multi", "uint8", "uint8", IntKind::U8).allow_duplicate_keys())
            .expect("multi");
        let value = Value::Map(vec![
            (Value::Uint(1), Value::Uint(1)),
            (Value::Uint(1), Value::Uint(2)),
        ]);
        validate(&reg, &CodecConfig::default(), "Multi", &value).expect("duplicates allowed");
    }

    #[test]
    fn test_crc32_rule() {
        let mut reg = Registry::with_primitives();
        reg.register(
            StructBuilder::new("Framed")
                .field("kind", "uint8")
                .field("body", "bytes")
                .field("crc", "uint32")
                .rule(Rule::crc32(["kind", "body"], "crc"))
                .build(),
        )
        .expect("framed");

        // kind = 7, body = [0xAB] (uint32 length prefix)
        let covered = [7u8, 0, 0, 0, 1, 0xAB];
        let crc = crc32fast::hash(&covered);
        let good = Value::record([
            ("kind", Value::Uint(7)),
            ("body", Value::from(vec![0xABu8].as_slice())),
            ("crc", Value::Uint(u64::from(crc))),
        ]);
        validate(&reg, &CodecConfig::default(), "Framed", &good).expect("crc holds");

        let mut bad = good.clone();
        bad.set_field("crc", Value::Uint(u64::from(crc ^ 1)));
        let err = validate(&reg, &CodecConfig::default(), "Framed", &bad).unwrap_err();
        assert_eq!(err.violations[0].rule, "crc32");
    }

    #[test]
    fn test_custom_rule_and_debug() {
        let rule = Rule::custom("even", |v: &Value| match v.as_uint() {
            Some(n) if n % 2 == 0 => Ok(()),
            _ => Err("odd".into()),
        });
        assert_eq!(rule.name(), "even");
        assert!(format!("{:?}", rule).contains("even"));

        let mut reg = Registry::with_primitives();
        reg.register(Codec::int("Even", IntKind::U16).rule(rule))
            .expect("even");
        validate(&reg, &CodecConfig::default(), "Even", &Value::Uint(4)).expect("even");
        let err = validate(&reg, &CodecConfig::default(), "Even", &Value::Uint(5)).unwrap_err();
        assert_eq!(err.violations[0].message, "odd");
    }

    #[test]
    fn test_shape_mismatch_is_reported() {
        let reg = registry();
        let err = validate(&reg, &CodecConfig::default(), "Setting", &Value::Uint(1)).unwrap_err();
        assert_eq!(err.violations[0].rule, "schema");
    }
}

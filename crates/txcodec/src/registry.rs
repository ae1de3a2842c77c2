// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema registry: type name to codec.
//!
//! Populated once during initialization and read-only afterwards, so shared
//! references can be handed to any number of concurrent decoders without
//! locking. Registration order does not matter: composite codecs resolve the
//! names they refer to at decode time.

use crate::error::RegistryError;
use crate::primitive::{BytesSpec, IntKind, LengthEncoding};
use crate::schema::{Codec, CodecKind, Presence, TypeName};
use std::collections::{HashMap, HashSet};

/// Names of the built-in primitive codecs installed by [`Registry::with_primitives`].
pub const PRIMITIVE_TYPES: [&str; 12] = [
    "uint8", "uint16", "uint32", "uint64", "int8", "int16", "int32", "int64", "bool", "unit",
    "bytes", "text",
];

/// In-memory codec table keyed by type name.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    codecs: HashMap<TypeName, Codec>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in primitive codecs.
    ///
    /// `bytes` and `text` use a `uint32` length prefix.
    pub fn with_primitives() -> Self {
        let mut codecs = HashMap::new();
        let builtins = IntKind::ALL
            .iter()
            .map(|kind| Codec::int(kind.type_name(), *kind))
            .chain([
                Codec::bool("bool"),
                Codec::unit("unit"),
                Codec::bytes("bytes", BytesSpec::prefixed(IntKind::U32)),
                Codec::text("text", BytesSpec::prefixed(IntKind::U32)),
            ]);
        for codec in builtins {
            codecs.insert(codec.name.clone(), codec);
        }
        Self { codecs }
    }

    /// Register a codec under its name.
    ///
    /// Fails with `DuplicateRegistration` if the name is taken; the existing
    /// entry is left untouched.
    pub fn register(&mut self, codec: Codec) -> Result<(), RegistryError> {
        if self.codecs.contains_key(&codec.name) {
            log::debug!("[txcodec] rejected duplicate registration of {}", codec.name);
            return Err(RegistryError::DuplicateRegistration(codec.name));
        }
        log::debug!(
            "[txcodec] registered {} ({})",
            codec.name,
            codec.kind.label()
        );
        self.codecs.insert(codec.name.clone(), codec);
        Ok(())
    }

    /// Register several codecs, stopping at the first duplicate.
    pub fn register_all(
        &mut self,
        codecs: impl IntoIterator<Item = Codec>,
    ) -> Result<(), RegistryError> {
        for codec in codecs {
            self.register(codec)?;
        }
        Ok(())
    }

    /// Look up a codec by name.
    pub fn lookup(&self, name: &str) -> Result<&Codec, RegistryError> {
        self.codecs
            .get(name)
            .ok_or_else(|| RegistryError::UnknownType(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Codec> {
        self.codecs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.codecs.contains_key(name)
    }

    /// All registered names, sorted for determinism.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Whether decoding `name` may keep reading until the input is exhausted.
    ///
    /// True for until-exhausted sequences, for structs whose last field is
    /// trailing or itself consumes to the end, and for variants with such an
    /// arm. A type like this can only sit in the final position of whatever
    /// contains it.
    pub fn consumes_to_end(&self, name: &str) -> bool {
        self.consumes_to_end_inner(name, &mut HashSet::new())
    }

    fn consumes_to_end_inner<'s>(&'s self, name: &'s str, seen: &mut HashSet<&'s str>) -> bool {
        // A type already on the current path is a cycle, not a new answer.
        if !seen.insert(name) {
            return false;
        }
        let Some(codec) = self.codecs.get(name) else {
            seen.remove(name);
            return false;
        };
        let result = match &codec.kind {
            kind @ CodecKind::Repeated(_) => kind.is_until_exhausted(),
            CodecKind::Struct(fields) => fields.last().is_some_and(|field| {
                field.presence == Presence::Trailing
                    || self.consumes_to_end_inner(&field.type_name, seen)
            }),
            CodecKind::Variant(spec) => spec
                .arms
                .iter()
                .any(|arm| self.consumes_to_end_inner(&arm.type_name, seen)),
            _ => false,
        };
        seen.remove(name);
        result
    }

    /// Whether every value of `name` encodes to zero bytes.
    pub fn encodes_nothing(&self, name: &str) -> bool {
        self.encodes_nothing_inner(name, &mut HashSet::new())
    }

    fn encodes_nothing_inner<'s>(&'s self, name: &'s str, seen: &mut HashSet<&'s str>) -> bool {
        if !seen.insert(name) {
            return false;
        }
        let Some(codec) = self.codecs.get(name) else {
            seen.remove(name);
            return false;
        };
        let result = match &codec.kind {
            CodecKind::Unit => true,
            CodecKind::Bytes(spec) | CodecKind::Text(spec) => {
                spec.length == LengthEncoding::Fixed(0)
            }
            CodecKind::Struct(fields) => fields.iter().all(|field| {
                field.presence == Presence::Required
                    && self.encodes_nothing_inner(&field.type_name, seen)
            }),
            _ => false,
        };
        seen.remove(name);
        result
    }

    /// Check the registered schema set as a whole.
    ///
    /// Reports every reference to an unregistered name, every type that reads
    /// to the end of input used anywhere but in last position (non-last struct
    /// field, sequence element, map key or value), every sequence or map of
    /// zero-width entries, and every variant with duplicate or unrepresentable
    /// tags. Decoding does not require a successful verification.
    pub fn verify(&self) -> Result<(), RegistryError> {
        let mut issues = Vec::new();
        for name in self.names() {
            let Some(codec) = self.codecs.get(name) else {
                continue;
            };
            for target in codec.kind.references() {
                if !self.contains(target) {
                    issues.push(format!("{} refers to unknown type `{}`", name, target));
                }
            }
            match &codec.kind {
                CodecKind::Struct(fields) => {
                    let last = fields.len().saturating_sub(1);
                    for (i, field) in fields.iter().enumerate() {
                        if i == last {
                            continue;
                        }
                        if field.presence == Presence::Trailing {
                            issues.push(format!(
                                "{}.{} is trailing but not the last field",
                                name, field.name
                            ));
                        }
                        if self.consumes_to_end(&field.type_name) {
                            issues.push(format!(
                                "{}.{} reads until the end of input but is not the last field",
                                name, field.name
                            ));
                        }
                    }
                }
                CodecKind::Repeated(spec) => {
                    if self.consumes_to_end(&spec.element) {
                        issues.push(format!(
                            "{} element `{}` reads until the end of input",
                            name, spec.element
                        ));
                    }
                    if self.encodes_nothing(&spec.element) {
                        issues.push(format!(
                            "{} element `{}` has zero width",
                            name, spec.element
                        ));
                    }
                }
                CodecKind::Map(spec) => {
                    for side in [&spec.key, &spec.value] {
                        if self.consumes_to_end(side) {
                            issues.push(format!(
                                "{} entry type `{}` reads until the end of input",
                                name, side
                            ));
                        }
                    }
                    if self.encodes_nothing(&spec.key) && self.encodes_nothing(&spec.value) {
                        issues.push(format!("{} entries have zero width", name));
                    }
                }
                CodecKind::Variant(spec) => {
                    let mut seen = HashSet::new();
                    for arm in &spec.arms {
                        if !seen.insert(arm.tag) {
                            issues.push(format!("{} has duplicate tag {}", name, arm.tag));
                        }
                        if i128::from(arm.tag) > spec.tag.max() {
                            issues.push(format!(
                                "{}::{} tag {} does not fit {}",
                                name, arm.name, arm.tag, spec.tag
                            ));
                        }
                    }
                }
                _ => {}
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            for issue in &issues {
                log::debug!("[txcodec] schema issue: {}", issue);
            }
            Err(RegistryError::InvalidSchema(issues))
        }
    }
}

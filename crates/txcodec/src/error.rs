// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for decoding, encoding, validation and registration.
//!
//! Composite codecs never swallow a child failure: they wrap it in a
//! `Within` layer naming the composite type and the field, index or arm that
//! failed. The resulting chain reads from the outermost schema down to the
//! byte offset where decoding stopped:
//!
//! ```text
//! Transaction.body: TransactionBody.inputs: TransactionInputs[1]:
//!     TransactionInput.index: out of bounds at offset 77: need 4 bytes, 2 available
//! ```

use crate::primitive::IntKind;
use crate::schema::TypeName;
use std::fmt;
use thiserror::Error;

/// Flat classification of any error produced by this crate.
///
/// Context layers are transparent: the kind of a nested decode failure is the
/// kind of its innermost cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OutOfBounds,
    LengthMismatch,
    UnknownType,
    UnknownVariantTag,
    DuplicateRegistration,
    Validation,
    Encode,
    InvalidData,
    TrailingBytes,
    DepthExceeded,
    InvalidSchema,
}

/// Position inside a composite value where a nested failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Named struct field.
    Field(String),
    /// Element of a repeated codec.
    Index(usize),
    /// Key of the n-th map entry.
    Key(usize),
    /// Value of the n-th map entry.
    Entry(usize),
    /// Element count of a sequence or map.
    Count,
    /// Discriminant of a variant.
    Tag,
    /// Payload of a variant arm.
    Arm(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Field(name) => write!(f, ".{}", name),
            Location::Index(i) => write!(f, "[{}]", i),
            Location::Key(i) => write!(f, "[{}].key", i),
            Location::Entry(i) => write!(f, "[{}].value", i),
            Location::Count => write!(f, ".<count>"),
            Location::Tag => write!(f, ".<tag>"),
            Location::Arm(name) => write!(f, "::{}", name),
        }
    }
}

/// Structural decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A read went past the end of the buffer.
    #[error("out of bounds at offset {offset}: need {requested} bytes, {available} available")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        available: usize,
    },

    /// A decoded length violates a schema or configuration bound.
    #[error("length {length} at offset {offset} violates {expected}")]
    LengthMismatch {
        offset: usize,
        length: u64,
        expected: String,
    },

    /// A referenced type name is not registered.
    #[error("unknown type `{0}`")]
    UnknownType(TypeName),

    /// A variant discriminant has no matching arm.
    #[error("unknown variant tag {tag} at offset {offset}")]
    UnknownVariantTag { offset: usize, tag: u64 },

    /// Bytes are present but not a legal encoding (bad bool, bad UTF-8, ...).
    #[error("invalid data at offset {offset}: {reason}")]
    InvalidData { offset: usize, reason: String },

    /// A whole-buffer type left unconsumed input.
    #[error("{remaining} trailing bytes after offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },

    /// Nesting went deeper than the configured limit.
    #[error("nesting depth limit {limit} exceeded at offset {offset}")]
    DepthExceeded { offset: usize, limit: usize },

    /// The schema itself cannot be decoded as declared.
    #[error("invalid schema: {reason}")]
    InvalidSchema { reason: String },

    /// Context layer added by a composite codec.
    #[error("{type_name}{location}: {source}")]
    Within {
        type_name: TypeName,
        location: Location,
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wrap `self` with the composite type and location it occurred in.
    pub fn within(self, type_name: &str, location: Location) -> Self {
        DecodeError::Within {
            type_name: type_name.to_string(),
            location,
            source: Box::new(self),
        }
    }

    /// Innermost error of the context chain.
    pub fn root_cause(&self) -> &DecodeError {
        let mut current = self;
        while let DecodeError::Within { source, .. } = current {
            current = source;
        }
        current
    }

    /// Breadcrumb of the context chain, e.g. `Transaction.body -> TransactionBody.fee`.
    pub fn path(&self) -> String {
        let mut segments = Vec::new();
        let mut current = self;
        while let DecodeError::Within {
            type_name,
            location,
            source,
        } = current
        {
            segments.push(format!("{}{}", type_name, location));
            current = source;
        }
        segments.join(" -> ")
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            DecodeError::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            DecodeError::UnknownType(_) => ErrorKind::UnknownType,
            DecodeError::UnknownVariantTag { .. } => ErrorKind::UnknownVariantTag,
            DecodeError::InvalidData { .. } => ErrorKind::InvalidData,
            DecodeError::TrailingBytes { .. } => ErrorKind::TrailingBytes,
            DecodeError::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            DecodeError::InvalidSchema { .. } => ErrorKind::InvalidSchema,
            DecodeError::Within { source, .. } => source.kind(),
        }
    }
}

/// A value does not fit the shape its codec expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("record has no field named `{0}` in its schema")]
    UnexpectedField(String),

    #[error("no arm for variant tag {0}")]
    UnknownVariantTag(u64),

    #[error("length {length} violates {expected}")]
    LengthMismatch { length: u64, expected: String },

    #[error("integer {value} out of range for {kind}")]
    IntOutOfRange { value: i128, kind: IntKind },

    #[error("unknown type `{0}`")]
    UnknownType(TypeName),

    #[error("nesting depth limit {limit} exceeded")]
    DepthExceeded { limit: usize },

    #[error("invalid schema: {reason}")]
    InvalidSchema { reason: String },

    #[error("{type_name}{location}: {source}")]
    Within {
        type_name: TypeName,
        location: Location,
        source: Box<EncodeError>,
    },
}

impl EncodeError {
    pub fn within(self, type_name: &str, location: Location) -> Self {
        EncodeError::Within {
            type_name: type_name.to_string(),
            location,
            source: Box::new(self),
        }
    }

    pub fn root_cause(&self) -> &EncodeError {
        let mut current = self;
        while let EncodeError::Within { source, .. } = current {
            current = source;
        }
        current
    }

    pub fn kind(&self) -> ErrorKind {
        match self.root_cause() {
            EncodeError::UnknownType(_) => ErrorKind::UnknownType,
            _ => ErrorKind::Encode,
        }
    }
}

/// One failed rule on one node of a decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Breadcrumb from the validated root, e.g. `TransactionBody.outputs[0]`.
    pub path: String,
    /// Rule name, e.g. `length_between` or `crc32`.
    pub rule: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.path, self.rule, self.message)
    }
}

/// Aggregate of every rule that failed on a structurally valid value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{type_name} failed {} rule(s): {}", .violations.len(), summarize(.violations))]
pub struct ValidationError {
    pub type_name: TypeName,
    pub violations: Vec<Violation>,
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Registration and schema verification failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("type `{0}` is already registered")]
    DuplicateRegistration(TypeName),

    #[error("unknown type `{0}`")]
    UnknownType(TypeName),

    #[error("schema verification found {} issue(s): {}", .0.len(), .0.join("; "))]
    InvalidSchema(Vec<String>),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::DuplicateRegistration(_) => ErrorKind::DuplicateRegistration,
            RegistryError::UnknownType(_) => ErrorKind::UnknownType,
            RegistryError::InvalidSchema(_) => ErrorKind::InvalidSchema,
        }
    }
}

/// Error returned by the dispatch facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unknown type `{0}`")]
    UnknownType(TypeName),

    #[error("failed to decode {type_name}: {source}")]
    Decode {
        type_name: TypeName,
        source: DecodeError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to encode {type_name}: {source}")]
    Encode {
        type_name: TypeName,
        source: EncodeError,
    },
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::UnknownType(_) => ErrorKind::UnknownType,
            CodecError::Decode { source, .. } => source.kind(),
            CodecError::Validation(_) => ErrorKind::Validation,
            CodecError::Encode { source, .. } => source.kind(),
        }
    }

    /// Violations when this is a validation failure.
    pub fn violations(&self) -> &[Violation] {
        match self {
            CodecError::Validation(err) => &err.violations,
            _ => &[],
        }
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
pub type EncodeResult<T> = Result<T, EncodeError>;

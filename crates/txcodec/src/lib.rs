// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry of named binary codecs.
//!
//! Given a type name and a byte buffer, produce either a validated typed
//! value or a descriptive error; given a value and a type name, produce its
//! canonical encoding.
//!
//! # Features
//!
//! - **Byte cursor**: bounds-checked, big-endian reads that never advance on failure
//! - **Composite codecs**: structs, tagged unions, repeated fields and maps,
//!   referring to each other by name (recursion allowed)
//! - **Validation**: schema-attached rules, every violation reported at once
//! - **Dispatch facade**: decode / validate / encode by name, tagged results
//! - **Ledger schema set**: versioned transaction primitives built in
//!
//! # Architecture
//!
//! ```text
//! bytes
//!   |
//!   v
//! Cursor -> primitives -> Decoder (struct / variant / repeated / map)
//!                            |        resolves names through Registry
//!                            v
//!                        validate (rules)
//!                            |
//!                            v
//!                  Codecs::decode_named -> Value | CodecError
//! ```

pub mod codec;
pub mod config;
pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod ledger;
pub mod primitive;
pub mod registry;
pub mod schema;
pub mod validate;
pub mod value;

pub use config::{CodecConfig, ConfigError};
pub use dispatch::{Codecs, TaggedResult};
pub use error::{
    CodecError, DecodeError, EncodeError, ErrorKind, Location, RegistryError, ValidationError,
    Violation,
};
pub use registry::Registry;
pub use schema::{Codec, CodecKind, TypeName};
pub use validate::Rule;
pub use value::Value;

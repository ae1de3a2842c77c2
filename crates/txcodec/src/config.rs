// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec limits.
//!
//! Supports both programmatic and file-based configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Resource limits applied to every decode, encode and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Maximum nesting of named codecs (recursion guard).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum element count of a single sequence or map.
    #[serde(default = "default_max_collection_len")]
    pub max_collection_len: usize,

    /// Maximum size of a buffer accepted by the facade (bytes).
    #[serde(default = "default_max_input_len")]
    pub max_input_len: usize,
}

fn default_max_depth() -> usize {
    64
}

fn default_max_collection_len() -> usize {
    1_048_576
}

fn default_max_input_len() -> usize {
    16 * 1024 * 1024
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_collection_len: default_max_collection_len(),
            max_input_len: default_max_input_len(),
        }
    }
}

impl CodecConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        if self.max_collection_len == 0 {
            return Err(ConfigError::Invalid(
                "max_collection_len must be at least 1".into(),
            ));
        }
        if self.max_input_len == 0 {
            return Err(ConfigError::Invalid(
                "max_input_len must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Decoder configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! merge_repeated = true
//! default_value = 0.0
//! lane_width = 64
//! num_threads = 4
//! parallel_threshold = 8
//! ```
//!
//! `max_output_len` is not configurable: it is always
//! `max(sequence_length) + 1` for the batch being decoded.

use crate::CtcError;
use std::path::Path;

/// Configuration shared by every row of a batch.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecoderConfig {
    /// Collapse consecutive identical non-blank labels into one.
    #[serde(default = "default_true")]
    pub merge_repeated: bool,
    /// Value written to output slots that hold no label.
    #[serde(default)]
    pub default_value: f32,
    /// Score rows are padded to a multiple of this width before reduction.
    /// Has no effect on results.
    #[serde(default = "default_lane_width")]
    pub lane_width: usize,
    /// Worker threads for row-parallel decoding (defaults to the global rayon pool).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,
    /// Minimum batch size before rows are decoded in parallel.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_true() -> bool {
    true
}

fn default_lane_width() -> usize {
    64
}

fn default_parallel_threshold() -> usize {
    8
}

impl DecoderConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, CtcError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CtcError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, CtcError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| CtcError::ConfigError(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, CtcError> {
        toml::to_string_pretty(self)
            .map_err(|e| CtcError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Checks values that serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), CtcError> {
        if self.lane_width == 0 {
            return Err(CtcError::ConfigError("lane_width must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(CtcError::ConfigError("num_threads must be at least 1".into()));
        }
        if self.default_value.is_nan() {
            return Err(CtcError::ConfigError("default_value must not be NaN".into()));
        }
        Ok(())
    }

    /// Resolves the number of worker threads.
    pub fn resolve_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(rayon::current_num_threads)
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            merge_repeated: true,
            default_value: 0.0,
            lane_width: default_lane_width(),
            num_threads: None,
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

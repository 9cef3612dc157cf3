// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared CLI helpers.

pub mod benchmark;
pub mod decode;
pub mod inspect;

use anyhow::Context;
use ctc_decoder::DecoderConfig;
use std::path::Path;
use tensor_core::{Shape, Tensor};
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. `RUST_LOG` takes precedence over `-v`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the decoder configuration, falling back to defaults without `--config`.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DecoderConfig> {
    match path {
        Some(p) => {
            let config = DecoderConfig::from_file(p)?;
            tracing::info!("loaded config from {}", p.display());
            Ok(config)
        }
        None => Ok(DecoderConfig::default()),
    }
}

/// On-disk score batch.
#[derive(Debug, serde::Deserialize)]
pub struct ScoreFile {
    /// `[batch][timestep][class_num]` scores.
    pub scores: Vec<Vec<Vec<f32>>>,
    /// Valid timesteps per batch row.
    pub sequence_length: Vec<i64>,
}

impl ScoreFile {
    /// Reads and parses a JSON score file.
    pub async fn read(path: &Path) -> anyhow::Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid score file '{}'", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Flattens the nested scores into a `[batch, timestep, class_num]` tensor.
    ///
    /// Every timestep must have the same number of classes and every row the
    /// same number of timesteps.
    pub fn to_tensor(&self) -> anyhow::Result<Tensor> {
        let batch = self.scores.len();
        let timestep = self.scores.first().map_or(0, Vec::len);
        let class_num = self
            .scores
            .first()
            .and_then(|row| row.first())
            .map_or(0, Vec::len);

        let mut flat = Vec::with_capacity(batch * timestep * class_num);
        for (b, row) in self.scores.iter().enumerate() {
            anyhow::ensure!(
                row.len() == timestep,
                "row {b} has {} timesteps, expected {timestep}",
                row.len()
            );
            for (t, frame) in row.iter().enumerate() {
                anyhow::ensure!(
                    frame.len() == class_num,
                    "row {b} timestep {t} has {} classes, expected {class_num}",
                    frame.len()
                );
                flat.extend_from_slice(frame);
            }
        }
        Ok(Tensor::from_f32_vec(
            Shape::sequence(batch, timestep, class_num),
            flat,
        )?)
    }
}

/// Truncates a string to `max_len` with ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

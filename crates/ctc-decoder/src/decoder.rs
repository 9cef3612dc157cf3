// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Batch orchestration: validate, decode every row, pack the output.
//!
//! ```text
//! DecodeInput::validate
//!     │
//!     ▼
//! for each row (sequential or rayon, rows never share state):
//!     decode_row  ──►  OutputPacker::pack  ──►  output[row]
//! ```
//!
//! The output buffer is split into disjoint row chunks, so parallel workers
//! need no synchronisation.

use crate::input::DecodeInput;
use crate::packer::{OutputPacker, PackedRow};
use crate::state::{decode_row, RowParams};
use crate::{CtcError, DecodeMetrics, DecoderConfig};
use rayon::prelude::*;
use std::time::Instant;
use tensor_core::{padded_width, DType, Shape, Tensor, TensorView};

/// Per-row results and metrics of one decode.
#[derive(Debug, Clone)]
pub struct DecodeReport {
    /// Labels emitted per row (also stored in each row's last slot).
    pub emitted_counts: Vec<usize>,
    pub metrics: DecodeMetrics,
}

/// The result of [`BatchDecoder::decode`].
#[derive(Debug, Clone)]
pub struct DecodeOutput {
    /// `[batch, max(sequence_length) + 1]` output rows.
    pub output: Tensor,
    pub report: DecodeReport,
}

/// Greedy CTC decoder over a `[batch, timestep, class_num]` score tensor.
///
/// # Example
/// ```
/// use ctc_decoder::{BatchDecoder, DecoderConfig};
/// use tensor_core::{Shape, Tensor};
///
/// // One row, two timesteps, classes {0, 1, blank}.
/// let scores = Tensor::from_f32(Shape::sequence(1, 2, 3), &[
///     0.9, 0.1, 0.0,
///     0.0, 0.2, 0.8,
/// ]).unwrap();
/// let decoder = BatchDecoder::new(DecoderConfig::default()).unwrap();
/// let out = decoder.decode(&scores.view(), &[2]).unwrap();
/// assert_eq!(out.output.as_f32_slice(), &[0.0, 0.0, 1.0]);
/// ```
#[derive(Debug)]
pub struct BatchDecoder {
    config: DecoderConfig,
    pool: Option<rayon::ThreadPool>,
}

impl BatchDecoder {
    /// Creates a decoder, building a dedicated thread pool if `num_threads` is set.
    pub fn new(config: DecoderConfig) -> Result<Self, CtcError> {
        config.validate()?;
        let pool = match config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("ctc-decode-{i}"))
                    .build()
                    .map_err(|e| CtcError::ConfigError(format!("thread pool: {e}")))?,
            ),
            None => None,
        };
        tracing::debug!(
            "decoder created: merge_repeated={}, lane_width={}, threads={}",
            config.merge_repeated,
            config.lane_width,
            config.resolve_threads(),
        );
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Output shape for the given inputs, after full validation.
    pub fn output_shape(
        &self,
        scores: &TensorView<'_>,
        sequence_length: &[i64],
    ) -> Result<Shape, CtcError> {
        Ok(DecodeInput::validate(scores, sequence_length)?.output_shape())
    }

    /// Decodes `scores` into a freshly allocated output tensor.
    pub fn decode(
        &self,
        scores: &TensorView<'_>,
        sequence_length: &[i64],
    ) -> Result<DecodeOutput, CtcError> {
        let input = DecodeInput::validate(scores, sequence_length)?;
        let mut output = Tensor::zeros(input.output_shape(), DType::F32);
        let report = self.run(&input, &mut output)?;
        Ok(DecodeOutput { output, report })
    }

    /// Decodes `scores` into a caller-allocated `[batch, max(sequence_length) + 1]` tensor.
    ///
    /// Every element of `output` is overwritten. On error `output` is untouched.
    pub fn decode_into(
        &self,
        scores: &TensorView<'_>,
        sequence_length: &[i64],
        output: &mut Tensor,
    ) -> Result<DecodeReport, CtcError> {
        let input = DecodeInput::validate(scores, sequence_length)?;
        if output.dtype() != DType::F32 {
            return Err(CtcError::UnsupportedDType {
                role: "output",
                dtype: output.dtype(),
            });
        }
        let expected = input.output_shape();
        if output.shape() != &expected {
            return Err(CtcError::OutputShapeMismatch {
                expected,
                actual: output.shape().clone(),
            });
        }
        self.run(&input, output)
    }

    fn run(&self, input: &DecodeInput<'_>, output: &mut Tensor) -> Result<DecodeReport, CtcError> {
        let start = Instant::now();
        let dims = input.dims;
        let params = RowParams {
            class_num: dims.class_num,
            width: padded_width(dims.class_num, self.config.lane_width)?,
            merge_repeated: self.config.merge_repeated,
        };
        let packer = OutputPacker::new(self.config.default_value);
        let out_width = input.lengths.max_output_len();
        let parallel = dims.batch > 1 && dims.batch >= self.config.parallel_threshold;

        tracing::info!(
            "decoding batch={} timestep={} class_num={} (blank={}), output width {}, {}",
            dims.batch,
            dims.timestep,
            dims.class_num,
            dims.blank_index(),
            out_width,
            if parallel { "parallel" } else { "sequential" },
        );

        let rows = output.try_f32_slice_mut("ctc_greedy_decode")?;
        let decode_one = |scratch: &mut Vec<f32>,
                          (row, out_row): (usize, &mut [f32])|
         -> Result<(usize, PackedRow), CtcError> {
            let steps = input.lengths.get(row);
            let state = decode_row(input.row_scores(row), steps, &params, scratch)?;
            let packed = packer.pack(state.emitted(), out_row)?;
            tracing::debug!(
                "row {row}: {steps} steps, {} labels emitted",
                packed.emitted_count
            );
            Ok((steps, packed))
        };

        let packed: Vec<(usize, PackedRow)> = if parallel {
            let mut job = || {
                rows.par_chunks_mut(out_width)
                    .enumerate()
                    .map_init(|| Vec::with_capacity(params.width), decode_one)
                    .collect::<Result<Vec<_>, _>>()
            };
            match &self.pool {
                Some(pool) => pool.install(job)?,
                None => job()?,
            }
        } else {
            let mut scratch = Vec::with_capacity(params.width);
            rows.chunks_mut(out_width)
                .enumerate()
                .map(|item| decode_one(&mut scratch, item))
                .collect::<Result<Vec<_>, _>>()?
        };

        let threads = match (&self.pool, parallel) {
            (_, false) => 1,
            (Some(pool), true) => pool.current_num_threads(),
            (None, true) => rayon::current_num_threads(),
        };
        let mut metrics = DecodeMetrics::new(parallel, threads);
        let mut emitted_counts = Vec::with_capacity(packed.len());
        for (steps, row) in &packed {
            metrics.record_row(*steps, row.emitted_count, row.saturated);
            emitted_counts.push(row.emitted_count);
        }
        metrics.finalise(start.elapsed());

        if metrics.labels_emitted == 0 {
            tracing::warn!(
                "no labels emitted for any of {} rows; every timestep chose blank",
                metrics.rows
            );
        }
        tracing::info!("{}", metrics.summary());

        Ok(DecodeReport {
            emitted_counts,
            metrics,
        })
    }
}

/// One-shot greedy decode with default execution settings.
///
/// Returns the `[batch, max(sequence_length) + 1]` output tensor.
pub fn decode(
    scores: &TensorView<'_>,
    sequence_length: &[i64],
    merge_repeated: bool,
    default_value: f32,
) -> Result<Tensor, CtcError> {
    let config = DecoderConfig {
        merge_repeated,
        default_value,
        ..Default::default()
    };
    Ok(BatchDecoder::new(config)?
        .decode(scores, sequence_length)?
        .output)
}

// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Up-front validation of decoder inputs.
//!
//! [`DecodeInput::validate`] runs every check before the first row is
//! touched, so a rejected call never leaves a half-written output.

use crate::CtcError;
use tensor_core::{DType, Shape, TensorView};

/// Largest supported class dimension (blank included).
pub const MAX_CLASS_NUM: usize = 2048;

/// Largest supported number of score elements (`batch * timestep * class_num`).
pub const MAX_TOTAL_ELEMENTS: usize = i32::MAX as usize;

/// Dimensions of a `[batch, timestep, class_num]` score tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreDims {
    pub batch: usize,
    pub timestep: usize,
    pub class_num: usize,
}

impl ScoreDims {
    /// Extracts and checks the dimensions of a score tensor shape.
    pub fn from_shape(shape: &Shape) -> Result<Self, CtcError> {
        let &[batch, timestep, class_num] = shape.dims() else {
            return Err(CtcError::ShapeError(format!(
                "scores must be rank 3 [batch, timestep, class_num], got rank {} {shape}",
                shape.rank()
            )));
        };
        if shape.is_empty() {
            return Err(CtcError::ShapeError(format!(
                "scores must have non-zero dimensions, got {shape}"
            )));
        }
        if class_num > MAX_CLASS_NUM {
            return Err(CtcError::CapacityExceeded {
                what: "class_num",
                limit: MAX_CLASS_NUM,
                actual: class_num,
            });
        }
        let total = shape.checked_num_elements().unwrap_or(usize::MAX);
        if total > MAX_TOTAL_ELEMENTS {
            return Err(CtcError::CapacityExceeded {
                what: "total score elements",
                limit: MAX_TOTAL_ELEMENTS,
                actual: total,
            });
        }
        Ok(Self {
            batch,
            timestep,
            class_num,
        })
    }

    /// The reserved blank class, always the last one.
    pub fn blank_index(&self) -> usize {
        self.class_num - 1
    }

    /// Number of score elements in one batch row.
    pub fn row_len(&self) -> usize {
        self.timestep * self.class_num
    }
}

/// Per-row valid timestep counts, checked against the score dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceLengths {
    lens: Vec<usize>,
    max: usize,
}

impl SequenceLengths {
    /// Validates `raw` against `dims`: one entry per row, each in `1..=timestep`.
    pub fn new(raw: &[i64], dims: &ScoreDims) -> Result<Self, CtcError> {
        if raw.len() != dims.batch {
            return Err(CtcError::ShapeError(format!(
                "sequence_length has {} entries but batch is {}",
                raw.len(),
                dims.batch
            )));
        }
        let mut lens = Vec::with_capacity(raw.len());
        for (row, &len) in raw.iter().enumerate() {
            if len <= 0 {
                return Err(CtcError::ShapeError(format!(
                    "sequence_length[{row}] = {len} must be positive"
                )));
            }
            let len = usize::try_from(len).unwrap_or(usize::MAX);
            if len > dims.timestep {
                return Err(CtcError::ShapeError(format!(
                    "sequence_length[{row}] = {len} exceeds timestep dimension {}",
                    dims.timestep
                )));
            }
            lens.push(len);
        }
        let max = lens.iter().copied().max().unwrap_or(0);
        Ok(Self { lens, max })
    }

    /// Valid timesteps for `row`.
    pub fn get(&self, row: usize) -> usize {
        self.lens[row]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.lens
    }

    /// Width of each output row: `max(sequence_length) + 1`.
    pub fn max_output_len(&self) -> usize {
        self.max + 1
    }
}

/// A fully validated decode call: score data, dimensions and lengths.
#[derive(Debug, Clone)]
pub struct DecodeInput<'a> {
    pub scores: &'a [f32],
    pub dims: ScoreDims,
    pub lengths: SequenceLengths,
}

impl<'a> DecodeInput<'a> {
    /// Runs every shape, capacity, dtype and domain check.
    pub fn validate(scores: &TensorView<'a>, sequence_length: &[i64]) -> Result<Self, CtcError> {
        if scores.dtype() != DType::F32 {
            return Err(CtcError::UnsupportedDType {
                role: "scores",
                dtype: scores.dtype(),
            });
        }
        let dims = ScoreDims::from_shape(scores.shape())?;
        let lengths = SequenceLengths::new(sequence_length, &dims)?;
        let data = scores.try_f32_slice("ctc_greedy_decode")?;

        let row_len = dims.row_len();
        for (row, steps) in lengths.as_slice().iter().enumerate() {
            let valid = &data[row * row_len..row * row_len + steps * dims.class_num];
            if let Some(pos) = valid.iter().position(|v| v.is_nan()) {
                return Err(CtcError::DomainError(format!(
                    "NaN score at batch {row}, timestep {}, class {}",
                    pos / dims.class_num,
                    pos % dims.class_num
                )));
            }
        }

        Ok(Self {
            scores: data,
            dims,
            lengths,
        })
    }

    /// Output shape for this input: `[batch, max(sequence_length) + 1]`.
    pub fn output_shape(&self) -> Shape {
        Shape::matrix(self.dims.batch, self.lengths.max_output_len())
    }

    /// Score slice `[timestep * class_num]` for one batch row.
    pub fn row_scores(&self, row: usize) -> &'a [f32] {
        let row_len = self.dims.row_len();
        &self.scores[row * row_len..(row + 1) * row_len]
    }
}

// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Max-with-index reduction over a score vector.
//!
//! The reduction runs in [`LANES`] independent accumulators (lane `l` sees
//! indices `l, l + LANES, l + 2 * LANES, ...`) and then folds the lanes with
//! a pairwise tree. Every merge uses the same total order, larger value first
//! and smaller index on ties, so the grouping of the tree cannot change the
//! winner: the result is always the leftmost maximum.

use crate::TensorError;

/// Number of independent accumulators in the blocked reduction.
pub const LANES: usize = 8;

/// A `(value, index)` pair taking part in the reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    value: f32,
    index: usize,
}

impl Candidate {
    /// Placeholder that loses to every real, non-NaN element.
    const EMPTY: Candidate = Candidate {
        value: f32::NEG_INFINITY,
        index: usize::MAX,
    };

    /// Returns the preferred of two candidates. NaN values never win.
    #[inline]
    fn merge(self, other: Candidate) -> Candidate {
        if other.value > self.value || (other.value == self.value && other.index < self.index) {
            other
        } else {
            self
        }
    }
}

/// Returns `(max_value, max_index)` over `values[..valid_len]`.
///
/// `max_index` is the smallest index holding `max_value`. Elements at
/// `valid_len..` are ignored. NaN elements are never selected.
///
/// # Errors
/// Returns [`TensorError::InvalidArgument`] if `valid_len` is zero or exceeds
/// `values.len()`, and [`TensorError::Numeric`] if every valid element is NaN.
///
/// # Examples
/// ```
/// use tensor_core::reduce_max;
/// let (value, index) = reduce_max(&[0.5, 0.9, 0.9, 0.1], 4).unwrap();
/// assert_eq!((value, index), (0.9, 1));
/// ```
pub fn reduce_max(values: &[f32], valid_len: usize) -> Result<(f32, usize), TensorError> {
    check_len(values, valid_len)?;
    let valid = &values[..valid_len];

    let mut lanes = [Candidate::EMPTY; LANES];
    for (block, chunk) in valid.chunks(LANES).enumerate() {
        let base = block * LANES;
        for (lane, &value) in chunk.iter().enumerate() {
            lanes[lane] = lanes[lane].merge(Candidate {
                value,
                index: base + lane,
            });
        }
    }

    let mut width = LANES;
    while width > 1 {
        width /= 2;
        for lane in 0..width {
            lanes[lane] = lanes[lane].merge(lanes[lane + width]);
        }
    }

    finish(lanes[0])
}

/// Single-accumulator scan with the same contract as [`reduce_max`].
///
/// Kept as the reference the blocked reduction is checked against.
pub fn reduce_max_sequential(values: &[f32], valid_len: usize) -> Result<(f32, usize), TensorError> {
    check_len(values, valid_len)?;
    let best = values[..valid_len]
        .iter()
        .enumerate()
        .fold(Candidate::EMPTY, |best, (index, &value)| {
            best.merge(Candidate { value, index })
        });
    finish(best)
}

fn check_len(values: &[f32], valid_len: usize) -> Result<(), TensorError> {
    if valid_len == 0 {
        return Err(TensorError::InvalidArgument {
            op: "reduce_max",
            detail: "valid_len must be at least 1".into(),
        });
    }
    if valid_len > values.len() {
        return Err(TensorError::InvalidArgument {
            op: "reduce_max",
            detail: format!("valid_len {valid_len} exceeds vector length {}", values.len()),
        });
    }
    Ok(())
}

fn finish(best: Candidate) -> Result<(f32, usize), TensorError> {
    if best.index == usize::MAX {
        return Err(TensorError::Numeric {
            op: "reduce_max",
            detail: "no comparable (non-NaN) element".into(),
        });
    }
    Ok((best.value, best.index))
}

// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Padding of score rows to a lane-friendly width.

use crate::TensorError;

/// Value written into padding slots. Padding always sits to the right of
/// every real class, so even a real score of `-inf` wins the leftmost
/// tie-break against it.
pub const MASK_VALUE: f32 = f32::NEG_INFINITY;

/// Rounds `class_num` up to the next multiple of `lane_width`.
///
/// # Errors
/// Returns [`TensorError::InvalidArgument`] if `lane_width` is zero.
pub fn padded_width(class_num: usize, lane_width: usize) -> Result<usize, TensorError> {
    if lane_width == 0 {
        return Err(TensorError::InvalidArgument {
            op: "padded_width",
            detail: "lane width must be non-zero".into(),
        });
    }
    Ok(class_num.div_ceil(lane_width).max(1) * lane_width)
}

/// Copies `row` into `out` and pads it to `width` with [`MASK_VALUE`].
///
/// `out` is cleared first so one buffer can be reused across timesteps.
///
/// # Errors
/// Returns [`TensorError::InvalidArgument`] if `width < row.len()`.
pub fn mask_scores(row: &[f32], width: usize, out: &mut Vec<f32>) -> Result<(), TensorError> {
    if width < row.len() {
        return Err(TensorError::InvalidArgument {
            op: "mask_scores",
            detail: format!("width {width} is smaller than row length {}", row.len()),
        });
    }
    out.clear();
    out.reserve(width);
    out.extend_from_slice(row);
    out.resize(width, MASK_VALUE);
    Ok(())
}

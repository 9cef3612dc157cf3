// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Score-vector kernels used by the CTC decoder.
//!
//! Kernels work on borrowed slices and caller-owned buffers so the decode
//! loop can reuse one scratch vector per row.

mod mask_op;
mod reduce_max_op;

pub use mask_op::{mask_scores, padded_width, MASK_VALUE};
pub use reduce_max_op::{reduce_max, reduce_max_sequential, LANES};

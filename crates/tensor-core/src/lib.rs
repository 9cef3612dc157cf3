// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Tensor containers and the score kernels behind CTC greedy decoding.
//!
//! This crate provides:
//! - [`Tensor`] / [`TensorView`] — owned and borrowed row-major buffers.
//! - [`Shape`] — runtime shape descriptors.
//! - [`DType`] — element type tags (only `F32` carries typed storage).
//! - [`reduce_max`] — max-with-index reduction with a leftmost tie-break.
//! - [`mask_scores`] — padding of score rows to a lane multiple.
//!
//! # Design Goals
//! - Zero-copy views over caller buffers.
//! - Kernels write into caller-provided scratch space.
//! - Clean error types via `thiserror`.

mod dtype;
mod error;
mod ops;
mod shape;
mod tensor;

pub use dtype::DType;
pub use error::TensorError;
pub use ops::{mask_scores, padded_width, reduce_max, reduce_max_sequential, LANES, MASK_VALUE};
pub use shape::Shape;
pub use tensor::{Tensor, TensorView};

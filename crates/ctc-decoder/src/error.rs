// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for CTC decoding.
//!
//! Every variant except [`CtcError::Internal`] is raised while validating the
//! call, before any output row is written.

use tensor_core::{DType, Shape};

/// Errors that can occur while configuring or running a decode.
#[derive(Debug, thiserror::Error)]
pub enum CtcError {
    /// Scores, sequence lengths, or the output buffer have an invalid shape.
    #[error("shape error: {0}")]
    ShapeError(String),

    /// An input dimension exceeds what the decoder supports.
    #[error("capacity exceeded: {what} is {actual}, limit is {limit}")]
    CapacityExceeded {
        what: &'static str,
        limit: usize,
        actual: usize,
    },

    /// Scores or output are not a supported real type.
    #[error("unsupported dtype {dtype} for {role}; expected f32")]
    UnsupportedDType { role: &'static str, dtype: DType },

    /// Score values outside the accepted domain (NaN).
    #[error("domain error: {0}")]
    DomainError(String),

    /// The caller-provided output tensor has the wrong shape.
    #[error("output shape mismatch: expected {expected}, got {actual}")]
    OutputShapeMismatch { expected: Shape, actual: Shape },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A tensor kernel rejected its arguments.
    #[error("tensor error: {0}")]
    TensorError(#[from] tensor_core::TensorError),

    /// A broken internal invariant (never caused by caller input).
    #[error("internal error: {0}")]
    Internal(String),
}

// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Score and output shape descriptors.

use std::fmt;

/// Dimensions of a [`crate::Tensor`].
///
/// The decoder works with two layouts: rank-3 score tensors
/// `[batch, timestep, class_num]` and rank-2 outputs
/// `[batch, max_output_len]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Creates the `[rows, cols]` shape of a decoder output.
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self {
            dims: vec![rows, cols],
        }
    }

    /// Creates the `[batch, timestep, class_num]` shape of a score tensor.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::Shape;
    /// let s = Shape::sequence(2, 3, 4);
    /// assert_eq!(s.rank(), 3);
    /// assert_eq!(s.num_elements(), 24);
    /// ```
    pub fn sequence(batch: usize, timestep: usize, class_num: usize) -> Self {
        Self {
            dims: vec![batch, timestep, class_num],
        }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total element count. Wraps on overflow in release builds; callers
    /// validating untrusted shapes use [`checked_num_elements`](Shape::checked_num_elements).
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Element count, or `None` if it does not fit in `usize`.
    pub fn checked_num_elements(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Size of dimension `index`, or `None` past the rank.
    pub fn dim(&self, index: usize) -> Option<usize> {
        self.dims.get(index).copied()
    }

    /// `true` if any dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.dims.contains(&0)
    }

    /// Bytes needed to hold this shape's elements as `dtype`.
    pub fn size_bytes(&self, dtype: super::DType) -> usize {
        self.num_elements() * dtype.size_bytes()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

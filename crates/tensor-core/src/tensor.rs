// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core tensor type and view abstractions.

use crate::{DType, Shape, TensorError};

/// Backing storage. `F32` tensors are held as typed `f32` so slices are
/// always correctly aligned; other dtypes are kept as opaque bytes.
#[derive(Debug, Clone, PartialEq)]
enum Storage {
    F32(Vec<f32>),
    Raw(Vec<u8>),
}

/// An owned, n-dimensional tensor stored in contiguous row-major memory.
///
/// `Tensor` carries score inputs into the decoder and receives its output
/// rows. Immutable access goes through [`TensorView`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    dtype: DType,
    data: Storage,
}

impl Tensor {
    /// Creates a new tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape, DType};
    /// let t = Tensor::zeros(Shape::matrix(2, 3), DType::F32);
    /// assert_eq!(t.size_bytes(), 24); // 2 * 3 * 4 bytes
    /// ```
    pub fn zeros(shape: Shape, dtype: DType) -> Self {
        let data = match dtype {
            DType::F32 => Storage::F32(vec![0.0; shape.num_elements()]),
            _ => Storage::Raw(vec![0u8; shape.size_bytes(dtype)]),
        };
        Self { shape, dtype, data }
    }

    /// Creates an `F32` tensor with every element set to `value`.
    pub fn full(shape: Shape, value: f32) -> Self {
        let n = shape.num_elements();
        Self {
            shape,
            dtype: DType::F32,
            data: Storage::F32(vec![value; n]),
        }
    }

    /// Creates a tensor from a slice of `f32` values.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape};
    /// let t = Tensor::from_f32(Shape::matrix(1, 3), &[1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(t.as_f32_slice(), &[1.0, 2.0, 3.0]);
    /// ```
    pub fn from_f32(shape: Shape, values: &[f32]) -> Result<Self, TensorError> {
        Self::from_f32_vec(shape, values.to_vec())
    }

    /// Creates a tensor taking ownership of an `f32` buffer.
    pub fn from_f32_vec(shape: Shape, values: Vec<f32>) -> Result<Self, TensorError> {
        let expected_elements = shape.num_elements();
        if values.len() != expected_elements {
            return Err(TensorError::BufferSizeMismatch {
                expected: expected_elements * DType::F32.size_bytes(),
                actual: values.len() * DType::F32.size_bytes(),
            });
        }
        Ok(Self {
            shape,
            dtype: DType::F32,
            data: Storage::F32(values),
        })
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the tensor's data type.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Returns an immutable view over this tensor's data.
    pub fn view(&self) -> TensorView<'_> {
        let data = match &self.data {
            Storage::F32(v) => ViewData::F32(v),
            Storage::Raw(_) => ViewData::Raw,
        };
        TensorView {
            shape: &self.shape,
            dtype: self.dtype,
            data,
        }
    }

    /// Returns the memory footprint of this tensor in bytes.
    pub fn size_bytes(&self) -> usize {
        self.shape.size_bytes(self.dtype)
    }

    /// Interprets the buffer as a slice of `f32`.
    ///
    /// # Panics
    /// Panics if `self.dtype() != DType::F32`.
    pub fn as_f32_slice(&self) -> &[f32] {
        match &self.data {
            Storage::F32(v) => v,
            Storage::Raw(_) => panic!("as_f32_slice called on {:?} tensor", self.dtype),
        }
    }

    /// Fallible mutable `f32` access for kernels that write into caller buffers.
    pub fn try_f32_slice_mut(&mut self, op: &'static str) -> Result<&mut [f32], TensorError> {
        match &mut self.data {
            Storage::F32(v) => Ok(v),
            Storage::Raw(_) => Err(TensorError::UnsupportedDType {
                op,
                dtype: self.dtype,
            }),
        }
    }

    /// Returns row `index` of a 2-D `F32` tensor, or `None` if out of range.
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let (rows, cols) = match self.shape.dims() {
            &[r, c] => (r, c),
            _ => return None,
        };
        if index >= rows {
            return None;
        }
        match &self.data {
            Storage::F32(v) => Some(&v[index * cols..(index + 1) * cols]),
            Storage::Raw(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ViewData<'a> {
    F32(&'a [f32]),
    /// Non-`F32` payloads are described but never read through a view.
    Raw,
}

/// A borrowed, read-only view over a [`Tensor`]'s data.
///
/// Views are zero-copy and tied to the lifetime of the source tensor.
#[derive(Debug, Clone, Copy)]
pub struct TensorView<'a> {
    shape: &'a Shape,
    dtype: DType,
    data: ViewData<'a>,
}

impl<'a> TensorView<'a> {
    /// Returns the shape of the viewed tensor.
    pub fn shape(&self) -> &'a Shape {
        self.shape
    }

    /// Returns the data type of the viewed tensor.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Interprets the view as a slice of `f32`.
    ///
    /// # Panics
    /// Panics if `self.dtype() != DType::F32`.
    pub fn as_f32_slice(&self) -> &'a [f32] {
        match self.data {
            ViewData::F32(v) => v,
            ViewData::Raw => panic!("as_f32_slice called on {:?} view", self.dtype),
        }
    }

    /// Fallible `f32` access; `op` names the caller in the error.
    pub fn try_f32_slice(&self, op: &'static str) -> Result<&'a [f32], TensorError> {
        match self.data {
            ViewData::F32(v) => Ok(v),
            ViewData::Raw => Err(TensorError::UnsupportedDType {
                op,
                dtype: self.dtype,
            }),
        }
    }
}

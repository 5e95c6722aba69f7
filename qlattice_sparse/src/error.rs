/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

use std::error::Error;
use std::fmt;

use qlattice_tensor::TensorError;

/// Errors surfaced by `CsrMatrix<E>` construction and arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub enum SparseMatrixError {
    /// A triplet referenced a row or column outside the declared shape.
    IndexOutOfBounds { row: usize, col: usize, shape: (usize, usize) },
    /// A binary op or `mmult` saw incompatible shapes.
    ShapeMismatch { lhs: (usize, usize), rhs: (usize, usize) },
    /// A dense-tensor operand for `mmult` was not rank 1 or 2.
    Tensor(TensorError),
}

impl Error for SparseMatrixError {}

impl fmt::Display for SparseMatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SparseMatrixError::IndexOutOfBounds { row, col, shape } => write!(
                f,
                "SparseMatrixError: index ({row}, {col}) out of bounds for shape {shape:?}"
            ),
            SparseMatrixError::ShapeMismatch { lhs, rhs } => write!(
                f,
                "SparseMatrixError: shape mismatch between {lhs:?} and {rhs:?}"
            ),
            SparseMatrixError::Tensor(e) => write!(f, "SparseMatrixError: {e}"),
        }
    }
}

impl From<TensorError> for SparseMatrixError {
    fn from(e: TensorError) -> Self {
        SparseMatrixError::Tensor(e)
    }
}

pub type SparseResult<T> = Result<T, SparseMatrixError>;

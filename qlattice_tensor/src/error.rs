/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

use std::error::Error;
use std::fmt;

/// Errors surfaced by `Dimensions`, `Range`, `Tensor<E>` and the C3 tensor
/// operations. Mirrors the error-kind taxonomy of `spec.md` §7.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorError {
    /// A negative or oversized axis size was requested at construction.
    InvalidDimension { axis: usize, size: isize },
    /// `normalize`/element access fell outside `[-r, r-1]` / `[0, r-1]`.
    OutOfBoundsIndex { index: isize, bound: usize },
    /// Shape disagreement in a binary op or contraction; carries both shapes
    /// and the offending axis pair when known.
    DimensionsMismatch {
        lhs: Vec<usize>,
        rhs: Vec<usize>,
        axes: Option<(usize, usize)>,
    },
    /// Nested-initializer construction received ragged rows/columns.
    RaggedShape,
    /// A reshape was requested whose element count does not match.
    ReshapeSizeMismatch { from: usize, to: usize },
}

impl Error for TensorError {}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorError::InvalidDimension { axis, size } => {
                write!(f, "TensorError: invalid dimension {size} at axis {axis}")
            }
            TensorError::OutOfBoundsIndex { index, bound } => {
                write!(
                    f,
                    "TensorError: index {index} out of bounds for dimension {bound}"
                )
            }
            TensorError::DimensionsMismatch { lhs, rhs, axes } => match axes {
                Some((i, j)) => write!(
                    f,
                    "TensorError: dimensions mismatch between {lhs:?} (axis {i}) and {rhs:?} (axis {j})"
                ),
                None => write!(f, "TensorError: dimensions mismatch between {lhs:?} and {rhs:?}"),
            },
            TensorError::RaggedShape => write!(f, "TensorError: ragged nested initializer"),
            TensorError::ReshapeSizeMismatch { from, to } => write!(
                f,
                "TensorError: cannot reshape {from} elements into a shape of size {to}"
            ),
        }
    }
}

pub type TensorResult<T> = Result<T, TensorError>;

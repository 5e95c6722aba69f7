/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

use std::error::Error;
use std::fmt;

use qlattice_tensor::TensorError;

#[derive(Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// `solve` hit a (near-)zero pivot.
    SingularMatrix,
    /// Shapes disagreed (non-square input to `eig`, mismatched `solve` rhs, ...).
    DimensionMismatch { expected: (usize, usize), found: (usize, usize) },
    /// `eig`/`eigs` failed to converge within the iteration budget.
    ConvergenceFailure { iterations: usize },
    Tensor(TensorError),
}

impl Error for LinalgError {}

impl fmt::Display for LinalgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinalgError::SingularMatrix => write!(f, "LinalgError: singular matrix"),
            LinalgError::DimensionMismatch { expected, found } => write!(
                f,
                "LinalgError: expected shape {expected:?}, found {found:?}"
            ),
            LinalgError::ConvergenceFailure { iterations } => {
                write!(f, "LinalgError: failed to converge after {iterations} iterations")
            }
            LinalgError::Tensor(e) => write!(f, "LinalgError: {e}"),
        }
    }
}

impl From<TensorError> for LinalgError {
    fn from(e: TensorError) -> Self {
        LinalgError::Tensor(e)
    }
}

pub type LinalgResult<T> = Result<T, LinalgError>;

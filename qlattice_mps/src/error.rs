/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

use std::error::Error;
use std::fmt;

use qlattice_linalg::LinalgError;
use qlattice_tensor::TensorError;

#[derive(Debug, Clone, PartialEq)]
pub enum MpsError {
    /// A site index fell outside `[0, length)`.
    SiteOutOfBounds { site: usize, length: usize },
    /// Two adjacent sites' bond dimensions did not agree, or a site tensor
    /// did not have the rank the operation expected.
    BondMismatch { site: usize, left_bond: usize, right_bond: usize },
    Tensor(TensorError),
    Linalg(LinalgError),
    /// A requested configuration (e.g. a periodic-boundary MPO) has no
    /// implementation here.
    Unsupported(String),
}

impl Error for MpsError {}

impl fmt::Display for MpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MpsError::SiteOutOfBounds { site, length } => {
                write!(f, "MpsError: site {site} out of bounds for length {length}")
            }
            MpsError::BondMismatch { site, left_bond, right_bond } => write!(
                f,
                "MpsError: bond mismatch at site {site}: left {left_bond}, right {right_bond}"
            ),
            MpsError::Tensor(e) => write!(f, "MpsError: {e}"),
            MpsError::Linalg(e) => write!(f, "MpsError: {e}"),
            MpsError::Unsupported(msg) => write!(f, "MpsError: unsupported: {msg}"),
        }
    }
}

impl From<TensorError> for MpsError {
    fn from(e: TensorError) -> Self {
        MpsError::Tensor(e)
    }
}

impl From<LinalgError> for MpsError {
    fn from(e: LinalgError) -> Self {
        MpsError::Linalg(e)
    }
}

pub type MpsResult<T> = Result<T, MpsError>;

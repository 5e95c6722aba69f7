/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

use std::error::Error;
use std::fmt;

use qlattice_linalg::LinalgError;
use qlattice_tensor::TensorError;

#[derive(Debug, Clone, PartialEq)]
pub enum ItebdError {
    Tensor(TensorError),
    Linalg(LinalgError),
    /// A bond's Schmidt vector collapsed to (near-)zero weight, so dividing
    /// it back out of a boundary tensor is not numerically meaningful.
    DegenerateBond { site: usize },
}

impl Error for ItebdError {}

impl fmt::Display for ItebdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItebdError::Tensor(e) => write!(f, "ItebdError: {e}"),
            ItebdError::Linalg(e) => write!(f, "ItebdError: {e}"),
            ItebdError::DegenerateBond { site } => write!(f, "ItebdError: degenerate bond at site {site}"),
        }
    }
}

impl From<TensorError> for ItebdError {
    fn from(e: TensorError) -> Self {
        ItebdError::Tensor(e)
    }
}

impl From<LinalgError> for ItebdError {
    fn from(e: LinalgError) -> Self {
        ItebdError::Linalg(e)
    }
}

pub type ItebdResult<T> = Result<T, ItebdError>;

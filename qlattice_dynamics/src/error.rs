/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

use std::error::Error;
use std::fmt;

use qlattice_linalg::LinalgError;
use qlattice_mps::MpsError;
use qlattice_tensor::TensorError;

#[derive(Debug, Clone, PartialEq)]
pub enum DynamicsError {
    Mps(MpsError),
    Linalg(LinalgError),
    Tensor(TensorError),
    /// A sweep ran for `sweeps_run` passes without the energy settling
    /// within `tolerance`, and `allow_e_growth` was exhausted.
    NotConverged { sweeps_run: usize, last_energy: f64 },
}

impl Error for DynamicsError {}

impl fmt::Display for DynamicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicsError::Mps(e) => write!(f, "DynamicsError: {e}"),
            DynamicsError::Linalg(e) => write!(f, "DynamicsError: {e}"),
            DynamicsError::Tensor(e) => write!(f, "DynamicsError: {e}"),
            DynamicsError::NotConverged { sweeps_run, last_energy } => {
                write!(f, "DynamicsError: not converged after {sweeps_run} sweeps (last energy {last_energy})")
            }
        }
    }
}

impl From<MpsError> for DynamicsError {
    fn from(e: MpsError) -> Self {
        DynamicsError::Mps(e)
    }
}

impl From<LinalgError> for DynamicsError {
    fn from(e: LinalgError) -> Self {
        DynamicsError::Linalg(e)
    }
}

impl From<TensorError> for DynamicsError {
    fn from(e: TensorError) -> Self {
        DynamicsError::Tensor(e)
    }
}

pub type DynamicsResult<T> = Result<T, DynamicsError>;

/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! C4: a compressed-sparse-row matrix type sharing `qlattice_tensor`'s
//! dense `Tensor<E>` as its materialization and `mmult` counterpart.

mod csr;
pub mod error;

pub use csr::CsrMatrix;
pub use error::{SparseMatrixError, SparseResult};

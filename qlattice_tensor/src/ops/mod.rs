/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! C3: tensor operations. Grounded on `spec.md` §4.3 and
//! `examples/original_source/include/tensor/detail/tensor_ops.hpp`.

mod fold;
mod kron;
mod permute;
mod reduce;
mod trace;

pub use fold::{fold, foldc, foldin, mmult};
pub use kron::{kron, kron2, kron2_sum};
pub use permute::{permute, permute_12, permute_13, permute_23, permute_24};
pub use reduce::{change_dimension, sort, sort_indices, Axis, Reduction};
pub use trace::{partial_trace, take_diag, trace, to_diag};

/// Row-major multi-index for a flat offset into a shape.
pub(crate) fn multi_index(mut flat: usize, dims: &[usize]) -> Vec<usize> {
    let mut idx = vec![0usize; dims.len()];
    for k in (0..dims.len()).rev() {
        idx[k] = flat % dims[k];
        flat /= dims[k];
    }
    idx
}

pub(crate) fn flat_index(idx: &[usize], strides: &[usize]) -> usize {
    idx.iter().zip(strides).map(|(i, s)| i * s).sum()
}

pub(crate) fn without_axis(shape: &[usize], axis: usize) -> Vec<usize> {
    shape
        .iter()
        .enumerate()
        .filter(|(k, _)| *k != axis)
        .map(|(_, &d)| d)
        .collect()
}

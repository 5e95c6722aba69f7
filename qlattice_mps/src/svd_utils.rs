/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Small dense-matrix helpers shared by canonicalization, two-site updates
//! and (via `qlattice_dynamics`) the Trotter unitary sub-step: take the
//! leading `r` columns/rows of an SVD factor, and fold the singular values
//! into one side before re-merging bonds. Kept `pub` since the Trotter
//! "combine, contract, SVD, split" sub-step in `spec.md` §4.7 is the same
//! bookkeeping as canonicalization's SVD split.

use qlattice_num::Element;
use qlattice_tensor::Tensor;

/// First `r` columns of an `(m, n)` matrix, as an `(m, r)` tensor.
pub fn take_columns<E: Element>(u: &Tensor<E>, r: usize) -> Tensor<E> {
    let m = u.shape()[0];
    Tensor::from_fn(vec![m, r], |idx| u.get(&[idx[0] as isize, idx[1] as isize]).expect("in bounds"))
}

/// First `r` rows of an `(n, k)` matrix, as an `(r, k)` tensor.
pub fn take_rows<E: Element>(v: &Tensor<E>, r: usize) -> Tensor<E> {
    let k = v.shape()[1];
    Tensor::from_fn(vec![r, k], |idx| v.get(&[idx[0] as isize, idx[1] as isize]).expect("in bounds"))
}

/// `diag(s) * v` for an `(r, n)` matrix `v`. `s` is always real (singular
/// values), regardless of `v`'s element type.
pub fn scale_rows_by_diag<E: Element>(s: &[f64], v: &Tensor<E>) -> Tensor<E> {
    let n = v.shape()[1];
    Tensor::from_fn(vec![s.len(), n], |idx| v.get(&[idx[0] as isize, idx[1] as isize]).expect("in bounds") * E::from_f64(s[idx[0]]))
}

/// `u * diag(s)` for an `(m, r)` matrix `u`.
pub fn scale_cols_by_diag<E: Element>(u: &Tensor<E>, s: &[f64]) -> Tensor<E> {
    let m = u.shape()[0];
    Tensor::from_fn(vec![m, s.len()], |idx| u.get(&[idx[0] as isize, idx[1] as isize]).expect("in bounds") * E::from_f64(s[idx[1]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_columns_truncates_width() {
        let u = Tensor::<f64>::from_buffer(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let t = take_columns(&u, 2);
        assert_eq!(t.shape(), &[2, 2]);
        assert_eq!(t.as_slice(), &[1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn scale_cols_by_diag_scales_each_column() {
        let u = Tensor::<f64>::eye(2);
        let scaled = scale_cols_by_diag(&u, &[2.0, 3.0]);
        assert_eq!(scaled.as_slice(), &[2.0, 0.0, 0.0, 3.0]);
    }
}

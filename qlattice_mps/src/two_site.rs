/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! `set_canonical_2_sites`: place a combined two-site tensor across sites
//! `k, k+1` and split it back by SVD, truncating to `Dmax`/`tol`. Grounded
//! on `examples/original_source/src/mps/mps/mps_canonical2.cc` and
//! `spec.md` §4.6; this is the local update step the Trotter unitary
//! sub-step (`spec.md` §4.7) applies at every bond.

use qlattice_num::{ComplexField, Element};
use qlattice_tensor::Tensor;

use crate::error::MpsResult;
use crate::mps::MPS;
use crate::svd_utils::{scale_cols_by_diag, scale_rows_by_diag, take_columns, take_rows};
use crate::truncation::where_to_truncate;

/// Place `a_ij`, a rank-4 tensor `(alpha, i, j, beta)` spanning sites `k`
/// and `k+1`, splitting it by SVD into two rank-3 site tensors written back
/// to `k` and `k+1`. `sense >= 0` leaves the singular values on the right
/// factor (site `k+1`, i.e. this is a left-to-right sweep step); `sense <
/// 0` leaves them on the left factor (site `k`). Truncates to the smallest
/// rank `<= dmax` for which the discarded Schmidt weight is within `tol`
/// (non-positive `tol` falls back to machine epsilon, per
/// `where_to_truncate`). When `normalize`, the kept singular values are
/// rescaled so their sum of squares is 1.
pub fn set_canonical_2_sites<E: Element + ComplexField>(
    psi: &mut MPS<E>,
    k: usize,
    a_ij: &Tensor<E>,
    sense: i32,
    dmax: usize,
    tol: f64,
    normalize: bool,
) -> MpsResult<()> {
    let shape = a_ij.shape();
    let (left, di, dj, right) = (shape[0], shape[1], shape[2], shape[3]);
    let matrix = a_ij.reshape(vec![left * di, dj * right])?;
    let (u, mut s, vt) = qlattice_linalg::svd(&matrix, true)?;

    let cap = dmax.min(s.len());
    let rank = where_to_truncate(&s, tol, cap).max(1);

    if normalize {
        let total: f64 = s[..rank].iter().fold(0.0, |acc, &v| acc + v * v);
        let norm = total.sqrt();
        if norm > f64::EPSILON {
            for v in s.iter_mut().take(rank) {
                *v /= norm;
            }
        }
    }

    let u_trunc = take_columns(&u, rank);
    let vt_trunc = take_rows(&vt, rank);

    let (new_left, new_right) = if sense >= 0 {
        let left_site = u_trunc.reshape(vec![left, di, rank])?;
        let right_site = scale_rows_by_diag(&s[..rank], &vt_trunc).reshape(vec![rank, dj, right])?;
        (left_site, right_site)
    } else {
        let left_site = scale_cols_by_diag(&u_trunc, &s[..rank]).reshape(vec![left, di, rank])?;
        let right_site = vt_trunc.reshape(vec![rank, dj, right])?;
        (left_site, right_site)
    };

    psi.set_site(k, new_left)?;
    psi.set_site(k + 1, new_right)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mps::{mps_to_vector, product_state};
    use qlattice_tensor::ops::fold;
    use qlattice_tensor::Tensor;

    #[test]
    fn set_canonical_2_sites_reproduces_combined_state_without_truncation() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![0.6, 0.8]).unwrap();
        let mut psi = product_state(3, &local);
        let combined = fold(psi.site(0).unwrap(), 2, psi.site(1).unwrap(), 0).unwrap();
        set_canonical_2_sites(&mut psi, 0, &combined, 1, 8, 0.0, false).unwrap();
        let v = mps_to_vector(&psi).unwrap();
        assert!((v.as_slice()[0] - 0.6 * 0.6 * 0.6).abs() < 1e-8);
    }

    #[test]
    fn set_canonical_2_sites_respects_dmax() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![1.0, 0.0]).unwrap();
        let mut psi = product_state(4, &local);
        let combined = fold(psi.site(1).unwrap(), 2, psi.site(2).unwrap(), 0).unwrap();
        set_canonical_2_sites(&mut psi, 1, &combined, 1, 1, 0.0, false).unwrap();
        assert!(psi.site(1).unwrap().shape()[2] <= 1);
    }
}

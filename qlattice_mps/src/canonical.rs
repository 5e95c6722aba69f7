/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! `canonical_form`/`normal_form`/`set_canonical`: SVD sweeps that bring an
//! MPS into left- or right-canonical form. Grounded on
//! `examples/original_source/src/mps/mps/{mps_canonical.cc,mps_canonical2.cc}`
//! and `spec.md` §4.6.

use qlattice_num::{ComplexField, Element};
use qlattice_tensor::ops::fold;
use qlattice_tensor::Tensor;

use crate::error::MpsResult;
use crate::mps::MPS;
use crate::svd_utils::{scale_cols_by_diag, scale_rows_by_diag, take_columns, take_rows};
use crate::truncation::where_to_truncate;

/// Sweep SVDs across the whole chain, in the given sense (`+1`: left to
/// right, `-1`: right to left; other values are treated as `-1`, per
/// `SPEC_FULL.md` §10's "pick `-1`" Open Question resolution). Truncates
/// trailing near-zero Schmidt weights (not a hard `Dmax`) at every cut.
pub fn canonical_form<E: Element + ComplexField>(psi: &MPS<E>, sense: i32) -> MpsResult<MPS<E>> {
    let mut out = psi.clone();
    sweep(&mut out, effective_sense(sense))?;
    Ok(out)
}

/// `canonical_form`, then normalize the boundary site so `norm2 == 1`.
pub fn normal_form<E: Element + ComplexField>(psi: &MPS<E>, sense: i32) -> MpsResult<MPS<E>> {
    let mut out = canonical_form(psi, sense)?;
    let boundary = if effective_sense(sense) > 0 { out.len() - 1 } else { 0 };
    let site = out.site(boundary)?.clone();
    let norm = site.as_slice().iter().fold(0.0f64, |acc, &v| acc + v.modulus() * v.modulus()).sqrt();
    if norm > f64::EPSILON {
        out.set_site(boundary, site.scale(E::from_f64(1.0 / norm)))?;
    }
    Ok(out)
}

/// Place a fresh tensor `a` at site `k`, then continue the canonicalization
/// sweep in the given sense from that site, truncating at every cut to the
/// minimum rank that drops only negligible Schmidt weight (when `truncate`)
/// or keeps the full SVD rank otherwise.
pub fn set_canonical<E: Element + ComplexField>(psi: &mut MPS<E>, k: usize, a: Tensor<E>, sense: i32, truncate: bool) -> MpsResult<()> {
    psi.set_site(k, a)?;
    let sense = effective_sense(sense);
    if sense > 0 {
        for site in k..psi.len().saturating_sub(1) {
            canonicalize_step_right(psi, site, truncate, None)?;
        }
    } else {
        for site in (1..=k.min(psi.len().saturating_sub(1))).rev() {
            canonicalize_step_left(psi, site, truncate, None)?;
        }
    }
    Ok(())
}

fn effective_sense(sense: i32) -> i32 {
    if sense > 0 {
        1
    } else {
        -1
    }
}

fn sweep<E: Element + ComplexField>(psi: &mut MPS<E>, sense: i32) -> MpsResult<()> {
    if psi.len() < 2 {
        return Ok(());
    }
    if sense > 0 {
        for k in 0..psi.len() - 1 {
            canonicalize_step_right(psi, k, true, None)?;
        }
    } else {
        for k in (1..psi.len()).rev() {
            canonicalize_step_left(psi, k, true, None)?;
        }
    }
    Ok(())
}

/// Left-canonicalize site `k`, pushing the remainder onto site `k+1`.
/// `max_rank` additionally hard-caps the kept Schmidt rank (used by
/// `truncate`'s `Dmax`); `None` means "no cap beyond the full SVD rank".
pub(crate) fn canonicalize_step_right<E: Element + ComplexField>(
    psi: &mut MPS<E>,
    k: usize,
    truncate: bool,
    max_rank: Option<usize>,
) -> MpsResult<()> {
    let a = psi.site(k)?.clone();
    let (left, phys, right) = (a.shape()[0], a.shape()[1], a.shape()[2]);
    let matrix = a.reshape(vec![left * phys, right])?;
    let (u, s, vt) = qlattice_linalg::svd(&matrix, true)?;

    let rank = if truncate {
        let cap = max_rank.unwrap_or(s.len()).min(s.len());
        where_to_truncate(&s, -1.0, cap).max(1)
    } else {
        s.len()
    };

    let u_trunc = take_columns(&u, rank);
    let new_site = u_trunc.reshape(vec![left, phys, rank])?;
    let carry = scale_rows_by_diag(&s[..rank], &take_rows(&vt, rank));

    psi.set_site(k, new_site)?;
    let next = psi.site(k + 1)?.clone();
    let merged = fold(&carry, 1, &next, 0)?;
    psi.set_site(k + 1, merged)?;
    Ok(())
}

/// Right-canonicalize site `k`, pushing the remainder onto site `k-1`.
/// `max_rank` additionally hard-caps the kept Schmidt rank; see
/// `canonicalize_step_right`.
pub(crate) fn canonicalize_step_left<E: Element + ComplexField>(
    psi: &mut MPS<E>,
    k: usize,
    truncate: bool,
    max_rank: Option<usize>,
) -> MpsResult<()> {
    let a = psi.site(k)?.clone();
    let (left, phys, right) = (a.shape()[0], a.shape()[1], a.shape()[2]);
    let matrix = a.reshape(vec![left, phys * right])?;
    let (u, s, vt) = qlattice_linalg::svd(&matrix, true)?;

    let rank = if truncate {
        let cap = max_rank.unwrap_or(s.len()).min(s.len());
        where_to_truncate(&s, -1.0, cap).max(1)
    } else {
        s.len()
    };

    let vt_trunc = take_rows(&vt, rank);
    let new_site = vt_trunc.reshape(vec![rank, phys, right])?;
    let carry = scale_cols_by_diag(&take_columns(&u, rank), &s[..rank]);

    psi.set_site(k, new_site)?;
    let prev = psi.site(k - 1)?.clone();
    let merged = fold(&prev, 2, &carry, 0)?;
    psi.set_site(k - 1, merged)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mps::{norm2, product_state};
    use qlattice_tensor::Tensor;

    #[test]
    fn canonical_form_preserves_norm_of_product_state() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![0.6, 0.8]).unwrap();
        let psi = product_state(4, &local);
        let before = norm2(&psi).unwrap();
        let canon = canonical_form(&psi, 1).unwrap();
        let after = norm2(&canon).unwrap();
        assert!((before - after).abs() < 1e-8);
    }

    #[test]
    fn canonical_form_both_senses_preserve_length() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![1.0, 0.0]).unwrap();
        let psi = product_state(3, &local);
        assert_eq!(canonical_form(&psi, 1).unwrap().len(), 3);
        assert_eq!(canonical_form(&psi, -1).unwrap().len(), 3);
    }
}

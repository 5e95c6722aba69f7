/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! `simplify`: variationally compress `sum_k weights_k * targets_k` into an
//! MPS no wider than `initial`'s bond dimensions. Grounded on
//! `examples/original_source/src/mps/tools/truncate_mps.cc` and `spec.md`
//! §4.6/§4.7 (the Trotter `optimize=true` and Arnoldi paths both bottom out
//! in this same "compress a combination of states" primitive).
//!
//! Implemented via the exact block-diagonal direct-sum MPS of the weighted
//! targets (bond dimension = sum of the targets' bond dimensions) followed
//! by hard SVD truncation down to `initial`'s per-site bond profile, with
//! `sweeps` extra left/right re-truncation passes as iterative refinement.
//! This differs from the original's per-site variational least-squares
//! sweep but is exact in the single-target case and a faithful compression
//! in the general case; see `DESIGN.md`.

use qlattice_num::{ComplexField, Element};
use qlattice_tensor::Tensor;

use crate::canonical::{canonicalize_step_left, canonicalize_step_right, canonical_form};
use crate::error::{MpsError, MpsResult};
use crate::mps::{norm2, scprod, MPS};

/// Exact direct sum `sum_k weights_k * targets_k`, as a single MPS whose
/// bond dimension at each interior cut is the sum of the targets' bond
/// dimensions there. Weights are folded into the first site only.
pub fn direct_sum<E: Element>(targets: &[MPS<E>], weights: &[E]) -> MpsResult<MPS<E>> {
    if targets.is_empty() {
        return Err(MpsError::SiteOutOfBounds { site: 0, length: 0 });
    }
    let length = targets[0].len();
    for t in targets {
        if t.len() != length {
            return Err(MpsError::BondMismatch { site: 0, left_bond: t.len(), right_bond: length });
        }
    }

    let mut sites = Vec::with_capacity(length);
    for k in 0..length {
        let phys = targets[0].physical_dim(k)?;
        let lefts: Vec<usize> = targets.iter().map(|t| t.left_bond(k)).collect::<MpsResult<_>>()?;
        let rights: Vec<usize> = targets.iter().map(|t| t.right_bond(k)).collect::<MpsResult<_>>()?;

        let is_first = k == 0;
        let is_last = k == length - 1;
        let out_left = if is_first { 1 } else { lefts.iter().sum() };
        let out_right = if is_last { 1 } else { rights.iter().sum() };

        let left_offsets = prefix_offsets(&lefts);
        let right_offsets = prefix_offsets(&rights);

        let site = Tensor::from_fn(vec![out_left, phys, out_right], |idx| {
            let (a, i, b) = (idx[0], idx[1], idx[2]);
            let mut acc = E::zero();
            for (m, target) in targets.iter().enumerate() {
                let local_a = if is_first { Some(0) } else { in_block(a, left_offsets[m], lefts[m]) };
                let local_b = if is_last { Some(0) } else { in_block(b, right_offsets[m], rights[m]) };
                if is_first && !is_last {
                    // First site: concatenate along the right bond only.
                    if let Some(lb) = in_block(b, right_offsets[m], rights[m]) {
                        let v = target.site(k).expect("validated length").get(&[0, i as isize, lb as isize]).expect("in bounds");
                        acc = acc + v * weights[m];
                    }
                } else if is_last && !is_first {
                    // Last site: concatenate along the left bond only.
                    if let Some(la) = in_block(a, left_offsets[m], lefts[m]) {
                        let v = target.site(k).expect("validated length").get(&[la as isize, i as isize, 0]).expect("in bounds");
                        acc = acc + v;
                    }
                } else if is_first && is_last {
                    let v = target.site(k).expect("validated length").get(&[0, i as isize, 0]).expect("in bounds");
                    acc = acc + v * weights[m];
                } else if let (Some(la), Some(lb)) = (local_a, local_b) {
                    let v = target
                        .site(k)
                        .expect("validated length")
                        .get(&[la as isize, i as isize, lb as isize])
                        .expect("in bounds");
                    acc = acc + v;
                }
            }
            acc
        });
        sites.push(site);
    }
    Ok(MPS::new(sites))
}

fn prefix_offsets(sizes: &[usize]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut acc = 0usize;
    for &s in sizes {
        offsets.push(acc);
        acc += s;
    }
    offsets
}

fn in_block(global: usize, offset: usize, size: usize) -> Option<usize> {
    if global >= offset && global < offset + size {
        Some(global - offset)
    } else {
        None
    }
}

/// `simplify(initial, targets, weights, sense, sweeps, normalize)`: build
/// the direct sum of `targets` weighted by `weights`, then truncate it down
/// to `initial`'s per-site bond dimensions, optionally re-balancing for
/// `sweeps` extra passes. Returns the compressed state and the achieved
/// `||combined - result||` error.
pub fn simplify<E: Element + ComplexField>(
    initial: &MPS<E>,
    targets: &[MPS<E>],
    weights: &[E],
    sense: i32,
    sweeps: usize,
    normalize: bool,
) -> MpsResult<(MPS<E>, E)> {
    let combined = direct_sum(targets, weights)?;
    let bond_profile: Vec<usize> = (0..initial.len().saturating_sub(1)).map(|k| initial.right_bond(k).unwrap_or(1)).collect();

    let mut result = canonical_form(&combined, if sense >= 0 { -1 } else { 1 })?;
    for _pass in 0..=sweeps {
        if result.len() >= 2 {
            for k in (1..result.len()).rev() {
                canonicalize_step_left(&mut result, k, true, None)?;
            }
            for k in 0..result.len() - 1 {
                let cap = bond_profile.get(k).copied().unwrap_or(usize::MAX);
                canonicalize_step_right(&mut result, k, true, Some(cap))?;
            }
        }
    }

    if normalize {
        let norm = norm2(&result)?;
        if norm > f64::EPSILON {
            let scale = E::from_f64(1.0 / norm);
            if let Some(first) = result.sites().first().cloned() {
                result.set_site(0, first.scale(scale))?;
            }
        }
    }

    let combined_norm2 = norm2(&combined)?.powi(2);
    let result_norm2 = norm2(&result)?.powi(2);
    let overlap = scprod(&combined, &result)?.real_part();
    let error_sq = (combined_norm2 + result_norm2 - 2.0 * overlap).max(0.0);
    Ok((result, E::from_f64(error_sq.sqrt())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mps::product_state;

    #[test]
    fn direct_sum_of_single_target_reproduces_its_norm() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![0.6, 0.8]).unwrap();
        let psi = product_state(3, &local);
        let combined = direct_sum(&[psi.clone()], &[1.0]).unwrap();
        assert!((norm2(&combined).unwrap() - norm2(&psi).unwrap()).abs() < 1e-8);
    }

    #[test]
    fn simplify_of_identical_target_and_initial_achieves_small_error() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![1.0, 0.0]).unwrap();
        let psi = product_state(3, &local);
        let (_, err) = simplify(&psi, &[psi.clone()], &[1.0], 1, 0, false).unwrap();
        assert!(err < 1e-6);
    }
}

/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! One- and two-point functions on a canonical infinite chain: `expected1`,
//! `expected2`/`string_order` (a correlator with an optional repeated
//! operator inserted between the two endpoints), `expected12` (a two-site
//! operator spanning one bond), and `energy` (the per-unit-cell energy
//! density of a nearest-neighbour Hamiltonian). All built on one shared
//! `propagate_right` sweep, the same shape as
//! `qlattice_mps::expected::transfer_step` but contracting `combined_matrix`
//! (Gamma already dressed with its right Schmidt weight) instead of a plain
//! MPS site tensor. Grounded on
//! `examples/original_source/src/mps/iTEBD/{itebd_expected.cc,itebd_expected12.cc,itebd_string_order.cc}`
//! and `spec.md` §4.8.

use qlattice_num::{ComplexField, Element};
use qlattice_tensor::ops::{fold, mmult, partial_trace, trace};
use qlattice_tensor::Tensor;

use crate::error::ItebdResult;
use crate::itebd::ITebd;

/// `<O>` at a single site, assuming `psi` is canonical. Computed directly
/// from the local reduced density matrix rather than via `string_order`,
/// sidestepping that routine's `i == j` edge case.
pub fn expected1<E: Element + ComplexField>(psi: &ITebd<E>, op: &Tensor<E>, site: usize) -> ItebdResult<E> {
    let v = psi.left_boundary(site);
    let combined = psi.combined_matrix(site);
    let value = trace(&propagate_right(&v, &combined, Some(op))?)?;
    let norm = trace(&propagate_right(&v, &combined, None)?)?;
    Ok(value / norm)
}

/// `<O1(i) O2(j)>`, in either order of `i`, `j`.
pub fn expected2<E: Element + ComplexField>(psi: &ITebd<E>, op1: &Tensor<E>, i: usize, op2: &Tensor<E>, j: usize) -> ItebdResult<E> {
    string_order(psi, op1, i, None, op2, j)
}

/// `<Oi(i) Omiddle(i+1) ... Omiddle(j-1) Oj(j)>`, with `Omiddle` omitted
/// (identity) between consecutive sites. `i > j` is handled by swapping the
/// two endpoint operators; `i == j` composes the two operators at one site.
pub fn string_order<E: Element + ComplexField>(
    psi: &ITebd<E>,
    op_i: &Tensor<E>,
    i: usize,
    op_middle: Option<&Tensor<E>>,
    op_j: &Tensor<E>,
    j: usize,
) -> ItebdResult<E> {
    if i > j {
        return string_order(psi, op_j, j, op_middle, op_i, i);
    }
    if i == j {
        let composed = mmult(op_j, op_i)?;
        return expected1(psi, &composed, i);
    }

    let mut site = i;
    let mut v1 = psi.left_boundary(site);
    let mut v2 = v1.clone();
    v1 = propagate_right(&v1, &psi.combined_matrix(site), Some(op_i))?;
    v2 = propagate_right(&v2, &psi.combined_matrix(site), None)?;
    site += 1;
    while site < j {
        v1 = propagate_right(&v1, &psi.combined_matrix(site), op_middle)?;
        v2 = propagate_right(&v2, &psi.combined_matrix(site), None)?;
        site += 1;
    }
    let value = trace(&propagate_right(&v1, &psi.combined_matrix(site), Some(op_j))?)?;
    let norm = trace(&propagate_right(&v2, &psi.combined_matrix(site), None)?)?;
    Ok(value / norm)
}

/// `<Op12>` for a two-site operator spanning the bond to the right of
/// `site`, merging `combined_matrix(site)` with `matrix(site + 1)` into one
/// block before inserting the operator.
pub fn expected12<E: Element + ComplexField>(psi: &ITebd<E>, op12: &Tensor<E>, site: usize) -> ItebdResult<E> {
    let al_a = psi.combined_matrix(site);
    let b = psi.matrix(site + 1).clone();
    let (a_dim, i_dim, b_dim) = (al_a.shape()[0], al_a.shape()[1], al_a.shape()[2]);
    let _ = b_dim;
    let j_dim = b.shape()[1];
    let c_dim = b.shape()[2];
    let al_ab = fold(&al_a, 2, &b, 0)?.reshape(vec![a_dim, i_dim * j_dim, c_dim])?;
    let op_flat = op12.reshape(vec![i_dim * j_dim, i_dim * j_dim])?;

    let v = psi.left_boundary(site);
    let value = trace(&propagate_right(&v, &al_ab, Some(&op_flat))?)?;
    let norm = trace(&propagate_right(&v, &al_ab, None)?)?;
    Ok(value / norm)
}

/// `expected12(psi, h12, 0) + expected12(psi, h12, 1)`: the energy density
/// of a translationally-invariant nearest-neighbour Hamiltonian, summed
/// over the two inequivalent bonds of the unit cell.
pub fn energy<E: Element + ComplexField>(psi: &ITebd<E>, h12: &Tensor<E>) -> ItebdResult<E> {
    Ok(expected12(psi, h12, 0)? + expected12(psi, h12, 1)?)
}

/// Push an environment `v` (shape `(beta_bra, beta_ket)`) one site to the
/// right through `gamma`, optionally inserting operator `op` (shape
/// `(out, in)`, contracted against the bra copy's physical index).
fn propagate_right<E: Element + ComplexField>(v: &Tensor<E>, gamma: &Tensor<E>, op: Option<&Tensor<E>>) -> ItebdResult<Tensor<E>> {
    let tg = fold(gamma, 0, v, 0)?; // (i, beta1, alpha2)
    let result = match op {
        None => {
            let tgg = fold(&tg, 2, gamma, 0)?; // (i, beta1, j, beta2)
            partial_trace(&tgg, 0, 2)?
        }
        Some(o) => {
            let to_ = fold(&tg, 0, o, 0)?; // (beta1, alpha2, j)
            let tgg = fold(&to_, 1, gamma, 0)?; // (beta1, j, j', beta2)
            partial_trace(&tgg, 1, 2)?
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::infinite_ghz_state;

    #[test]
    fn expected1_of_identity_is_one() {
        let state: ITebd<f64> = infinite_ghz_state();
        let id = Tensor::<f64>::eye(2);
        let val = expected1(&state, &id, 0).unwrap();
        assert!((val - 1.0).abs() < 1e-8);
    }

    #[test]
    fn expected2_of_identities_is_one() {
        let state: ITebd<f64> = infinite_ghz_state();
        let id = Tensor::<f64>::eye(2);
        let val = expected2(&state, &id, 0, &id, 3).unwrap();
        assert!((val - 1.0).abs() < 1e-8);
    }

    #[test]
    fn ghz_state_has_perfect_zz_correlation() {
        let state: ITebd<f64> = infinite_ghz_state();
        let z = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 0.0, 0.0, -1.0]).unwrap();
        let val = expected2(&state, &z, 0, &z, 5).unwrap();
        assert!((val - 1.0).abs() < 1e-6);
    }
}

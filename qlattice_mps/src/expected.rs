/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! One- and two-site expectation values, plus the lattice sum of a
//! single-site operator. All implemented via one shared environment-sweep
//! primitive that inserts zero, one or two operators at chosen sites, the
//! same transfer-matrix propagation `scprod` uses. Grounded on
//! `examples/original_source/src/mps/mps/{mps_expected1.cc,mps_expected2.cc}`
//! and `spec.md` §4.6.

use qlattice_num::Element;
use qlattice_tensor::ops::{fold, foldc};
use qlattice_tensor::Tensor;

use crate::error::MpsResult;
use crate::mps::MPS;

/// `<psi|O|psi>` with `O` inserted at site `k`.
pub fn expected1<E: Element>(psi: &MPS<E>, op: &Tensor<E>, k: usize) -> MpsResult<E> {
    expected_product(psi, &[(k, op.clone())])
}

/// `sum_k <psi| O_k |psi>`, the lattice sum of a translation-invariant
/// single-site operator.
pub fn expected1_sum<E: Element>(psi: &MPS<E>, op: &Tensor<E>) -> MpsResult<E> {
    let mut total = E::zero();
    for k in 0..psi.len() {
        total = total + expected1(psi, op, k)?;
    }
    Ok(total)
}

/// `<psi|O1(k1) O2(k2)|psi>`. When `k1 == k2` the two operators are
/// composed via `mmult` (`O2` applied first, then `O1`) into a single
/// site insertion; the orientation `k1 > k2` is handled by swapping the two
/// insertions, since they act on disjoint tensor factors.
pub fn expected2<E: Element>(psi: &MPS<E>, op1: &Tensor<E>, k1: usize, op2: &Tensor<E>, k2: usize) -> MpsResult<E> {
    if k1 == k2 {
        let combined = qlattice_tensor::ops::mmult(op1, op2)?;
        return expected1(psi, &combined, k1);
    }
    expected_product(psi, &[(k1, op1.clone()), (k2, op2.clone())])
}

/// Sweep a transfer matrix across the chain, inserting each listed operator
/// at its site (at most one per site; callers combine same-site operators
/// before calling). Sites without a listed operator contract bra and ket
/// physical indices directly (the plain overlap step).
fn expected_product<E: Element>(psi: &MPS<E>, ops: &[(usize, Tensor<E>)]) -> MpsResult<E> {
    let mut transfer = Tensor::<E>::ones(vec![1, 1]);
    for k in 0..psi.len() {
        let a = psi.site(k)?;
        let op = ops.iter().find(|(site, _)| *site == k).map(|(_, op)| op);
        transfer = transfer_step(&transfer, a, op)?;
    }
    Ok(transfer.get(&[0, 0])?)
}

fn transfer_step<E: Element>(transfer: &Tensor<E>, a: &Tensor<E>, op: Option<&Tensor<E>>) -> MpsResult<Tensor<E>> {
    let ta = foldc(a, 0, transfer, 0)?; // (i, beta1, alpha2)
    match op {
        None => {
            let tab = fold(&ta, 2, a, 0)?; // (i, beta1, j, beta2)
            diag_sum(&tab)
        }
        Some(o) => {
            let tb = fold(&ta, 0, o, 0)?; // (beta1, alpha2, j)
            let tab = fold(&tb, 1, a, 0)?; // (beta1, j, j', beta2)
            diag_sum_shifted(&tab)
        }
    }
}

/// Sum `tab[i, b1, i, b2]` over the repeated physical index `i`, producing
/// the new `(beta1, beta2)` transfer.
fn diag_sum<E: Element>(tab: &Tensor<E>) -> MpsResult<Tensor<E>> {
    let n_i = tab.shape()[0];
    let beta1 = tab.shape()[1];
    let beta2 = tab.shape()[3];
    let mut out = Tensor::<E>::zeros(vec![beta1, beta2]);
    for b1 in 0..beta1 {
        for b2 in 0..beta2 {
            let mut acc = E::zero();
            for i in 0..n_i {
                acc = acc + tab.get(&[i as isize, b1 as isize, i as isize, b2 as isize])?;
            }
            out.set(&[b1 as isize, b2 as isize], acc)?;
        }
    }
    Ok(out)
}

/// Sum `tab[beta1, j, j, beta2]` over the repeated physical index `j`
/// (the layout produced when an operator was inserted).
fn diag_sum_shifted<E: Element>(tab: &Tensor<E>) -> MpsResult<Tensor<E>> {
    let beta1 = tab.shape()[0];
    let n_j = tab.shape()[1];
    let beta2 = tab.shape()[3];
    let mut out = Tensor::<E>::zeros(vec![beta1, beta2]);
    for b1 in 0..beta1 {
        for b2 in 0..beta2 {
            let mut acc = E::zero();
            for j in 0..n_j {
                acc = acc + tab.get(&[b1 as isize, j as isize, j as isize, b2 as isize])?;
            }
            out.set(&[b1 as isize, b2 as isize], acc)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mps::product_state;

    #[test]
    fn expected1_of_identity_equals_norm_squared() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![0.6, 0.8]).unwrap();
        let psi = product_state(3, &local);
        let id = Tensor::<f64>::eye(2);
        let val = expected1(&psi, &id, 1).unwrap();
        assert!((val - 1.0).abs() < 1e-8);
    }

    #[test]
    fn expected1_of_pauli_z_on_spin_up_is_one() {
        let up = Tensor::<f64>::from_buffer(vec![2], vec![1.0, 0.0]).unwrap();
        let psi = product_state(3, &up);
        let z = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 0.0, 0.0, -1.0]).unwrap();
        let val = expected1(&psi, &z, 0).unwrap();
        assert!((val - 1.0).abs() < 1e-8);
    }

    #[test]
    fn expected1_sum_adds_every_site() {
        let up = Tensor::<f64>::from_buffer(vec![2], vec![1.0, 0.0]).unwrap();
        let psi = product_state(4, &up);
        let z = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 0.0, 0.0, -1.0]).unwrap();
        let val = expected1_sum(&psi, &z).unwrap();
        assert!((val - 4.0).abs() < 1e-8);
    }

    #[test]
    fn expected2_of_identities_equals_norm_squared() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![0.6, 0.8]).unwrap();
        let psi = product_state(4, &local);
        let id = Tensor::<f64>::eye(2);
        let val = expected2(&psi, &id, 0, &id, 2).unwrap();
        assert!((val - 1.0).abs() < 1e-8);
    }
}

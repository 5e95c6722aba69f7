/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! `MPO<E>`: a chain of rank-4 `(beta_k, i_k, j_k, beta_{k+1})` site tensors
//! representing a nearest-neighbour-plus-on-site operator, and `apply` to
//! contract one into an `MPS`. Grounded on
//! `examples/original_source/include/mps/mpo.h` and
//! `src/mps/mpo/{mpo.cc,mpo_apply.cc}`, `spec.md` §4.6.

use qlattice_num::{ComplexField, Element};
use qlattice_tensor::ops::{fold, permute};
use qlattice_tensor::Tensor;

use crate::error::{MpsError, MpsResult};
use crate::hamiltonian::Hamiltonian;
use crate::mp::MP;
use crate::mps::MPS;

/// A finite matrix product operator over `N` sites.
#[derive(Debug, Clone)]
pub struct MPO<E: Element> {
    mp: MP<E>,
}

impl<E: Element> MPO<E> {
    pub fn new(sites: Vec<Tensor<E>>) -> Self {
        MPO { mp: MP::new(sites) }
    }

    pub fn len(&self) -> usize {
        self.mp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mp.is_empty()
    }

    pub fn site(&self, k: usize) -> MpsResult<&Tensor<E>> {
        self.mp.get(k)
    }

    pub fn sites(&self) -> &[Tensor<E>] {
        self.mp.sites()
    }
}

/// Schmidt-decompose a two-site interaction (row-major over the combined
/// `(i_k, i_{k+1})` index, acting as `sum_a L_a (x) R_a`) by reshaping to
/// rank 4, grouping `(i_k, j_k)` against `(i_{k+1}, j_{k+1})`, and taking an
/// SVD; singular values are split evenly (`sqrt(s)`) onto each factor.
fn schmidt_decompose_interaction<E: Element + ComplexField>(
    interaction: &Tensor<E>,
    dim_left: usize,
    dim_right: usize,
) -> MpsResult<(Vec<Tensor<E>>, Vec<Tensor<E>>)> {
    let rank4 = interaction.reshape(vec![dim_left, dim_right, dim_left, dim_right])?;
    // (i_k, i_{k+1}, j_k, j_{k+1}) -> (i_k, j_k, i_{k+1}, j_{k+1})
    let grouped = permute(&rank4, 1, 2)?;
    let matrix = grouped.reshape(vec![dim_left * dim_left, dim_right * dim_right])?;
    let (u, s, vt) = qlattice_linalg::svd(&matrix, true)?;

    let mut lefts = Vec::with_capacity(s.len());
    let mut rights = Vec::with_capacity(s.len());
    for (a, &sv) in s.iter().enumerate() {
        if sv.abs() <= f64::EPSILON {
            continue;
        }
        let sqrt_s = E::from_f64(sv.sqrt());
        let left = Tensor::from_fn(vec![dim_left, dim_left], |idx| u.get(&[(idx[0] * dim_left + idx[1]) as isize, a as isize]).unwrap() * sqrt_s);
        let right =
            Tensor::from_fn(vec![dim_right, dim_right], |idx| vt.get(&[a as isize, (idx[0] * dim_right + idx[1]) as isize]).unwrap() * sqrt_s);
        lefts.push(left);
        rights.push(right);
    }
    Ok((lefts, rights))
}

/// Build the MPO finite-automaton representation of `h`. Only open-boundary
/// Hamiltonians are supported (`h.is_periodic()` returns an error): the
/// standard bond-per-interaction-term automaton this uses has no closed
/// form for a wraparound bond without an auxiliary long-range leg, which
/// `spec.md` §4.6 does not ask for.
pub fn from_hamiltonian<E: Element + ComplexField>(h: &impl Hamiltonian<E>) -> MpsResult<MPO<E>> {
    if h.is_periodic() {
        return Err(MpsError::Unsupported("periodic Hamiltonian MPO construction".to_string()));
    }
    let n = h.len();
    if n == 0 {
        return Ok(MPO::new(Vec::new()));
    }

    // decomposed[k] = (lefts, rights) for the interaction between site k and
    // k+1, for k in 0..n-1.
    let mut decomposed: Vec<(Vec<Tensor<E>>, Vec<Tensor<E>>)> = Vec::with_capacity(n.saturating_sub(1));
    for k in 0..n.saturating_sub(1) {
        match h.interaction(k) {
            Some(op) => decomposed.push(schmidt_decompose_interaction(&op, h.dimension(k), h.dimension(k + 1))?),
            None => decomposed.push((Vec::new(), Vec::new())),
        }
    }

    let mut sites = Vec::with_capacity(n);
    for k in 0..n {
        let d = h.dimension(k);
        let r_prev = if k == 0 { 0 } else { decomposed[k - 1].1.len() };
        let r_next = if k == n - 1 { 0 } else { decomposed[k].0.len() };
        let bond_in = if k == 0 { 1 } else { r_prev + 2 };
        let bond_out = if k == n - 1 { 1 } else { r_next + 2 };
        let last_in = bond_in - 1;
        let last_out = bond_out - 1;

        let local = h.local_term(k);
        let lefts = if k == n - 1 { &[][..] } else { &decomposed[k].0[..] };
        let rights = if k == 0 { &[][..] } else { &decomposed[k - 1].1[..] };

        let site = Tensor::from_fn(vec![bond_in, d, d, bond_out], |idx| {
            let (bi, i, j, bo) = (idx[0], idx[1], idx[2], idx[3]);
            let mut acc = E::zero();
            if bi == 0 && bo == 0 && bond_in > 1 && bond_out > 1 {
                acc = acc + identity_entry(i, j);
            }
            if bi == 0 && bo > 0 && bo < bond_out - 1 {
                let a = bo - 1;
                if a < lefts.len() {
                    acc = acc + lefts[a].get(&[i as isize, j as isize]).unwrap();
                }
            }
            if bi == 0 && bo == last_out {
                if let Some(loc) = &local {
                    acc = acc + loc.get(&[i as isize, j as isize]).unwrap();
                } else if bond_in == 1 && bond_out == 1 {
                    acc = acc + identity_entry(i, j);
                }
            }
            if bi > 0 && bi < last_in && bo == last_out {
                let b = bi - 1;
                if b < rights.len() {
                    acc = acc + rights[b].get(&[i as isize, j as isize]).unwrap();
                }
            }
            if bi == last_in && bo == last_out && bond_in > 1 && bond_out > 1 {
                acc = acc + identity_entry(i, j);
            }
            acc
        });
        sites.push(site);
    }
    Ok(MPO::new(sites))
}

fn identity_entry<E: Element>(i: usize, j: usize) -> E {
    if i == j {
        E::one()
    } else {
        E::zero()
    }
}

/// `apply(op, psi)`: site-wise `B_k(ab, i, a'b') = sum_j O_k(b, i, j, b') *
/// A_k(a, j, a')`; the result's bond at each cut is the product of the
/// operator's and state's bonds there.
pub fn apply<E: Element>(op: &MPO<E>, psi: &MPS<E>) -> MpsResult<MPS<E>> {
    if op.len() != psi.len() {
        return Err(MpsError::BondMismatch { site: 0, left_bond: op.len(), right_bond: psi.len() });
    }
    let mut sites = Vec::with_capacity(psi.len());
    for k in 0..psi.len() {
        let o = op.site(k)?; // (beta, i, j, beta')
        let a = psi.site(k)?; // (alpha, j, alpha')
        let combined = fold(o, 2, a, 1)?; // (beta, i, beta', alpha, alpha')
        // (beta, i, beta', alpha, alpha') -> (beta, alpha, i, beta', alpha')
        let moved = permute(&combined, 1, 3)?; // swap i <-> alpha: (beta, alpha, beta', i, alpha')
        let moved = permute(&moved, 2, 3)?; // (beta, alpha, i, beta', alpha')
        let (b, a_dim, i, bp, ap) = (
            moved.shape()[0],
            moved.shape()[1],
            moved.shape()[2],
            moved.shape()[3],
            moved.shape()[4],
        );
        let new_site = moved.reshape(vec![b * a_dim, i, bp * ap])?;
        sites.push(new_site);
    }
    Ok(MPS::new(sites))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::TranslationInvariantHamiltonian;
    use crate::mps::{norm2, product_state};

    #[test]
    fn from_hamiltonian_on_site_only_builds_bond_one_mpo() {
        let z = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 0.0, 0.0, -1.0]).unwrap();
        let h = TranslationInvariantHamiltonian::new(3, 2, Some(z), None, false);
        let mpo = from_hamiltonian(&h).unwrap();
        assert_eq!(mpo.len(), 3);
        assert_eq!(mpo.site(0).unwrap().shape(), &[1, 2, 2, 1]);
    }

    #[test]
    fn apply_identity_mpo_preserves_norm() {
        let id = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        let h = TranslationInvariantHamiltonian::new(3, 2, Some(id), None, false);
        let mpo = from_hamiltonian(&h).unwrap();
        let local = Tensor::<f64>::from_buffer(vec![2], vec![0.6, 0.8]).unwrap();
        let psi = product_state(3, &local);
        let applied = apply(&mpo, &psi).unwrap();
        assert!((norm2(&applied).unwrap() - norm2(&psi).unwrap()).abs() < 1e-8);
    }

    #[test]
    fn periodic_hamiltonian_is_rejected() {
        let h: TranslationInvariantHamiltonian<f64> = TranslationInvariantHamiltonian::new(4, 2, None, None, true);
        assert!(from_hamiltonian(&h).is_err());
    }
}

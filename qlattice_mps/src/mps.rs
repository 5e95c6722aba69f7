/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! `MPS<E>`: a chain of rank-3 `(alpha, i, beta)` site tensors representing
//! `|psi> = sum A^{i_1}_{a_1 a_2} A^{i_2}_{a_2 a_3} ... |i_1 i_2 ...>`.
//! Grounded on `examples/original_source/include/mps/mps.h` and
//! `src/mps/mps/{rmps_product_state.cc,rmps_ghz_state.cc,
//! rmps_cluster_state.cc,rmps.cc,cmps_to_vector.cc}`.

use qlattice_num::Element;
use qlattice_tensor::ops::{fold, foldc};
use qlattice_tensor::Tensor;

use crate::error::{MpsError, MpsResult};
use crate::mp::MP;

/// A finite matrix product state over `N` sites.
#[derive(Debug, Clone)]
pub struct MPS<E: Element> {
    mp: MP<E>,
}

impl<E: Element> MPS<E> {
    /// Build an MPS from an already-consistent chain of rank-3 site tensors
    /// (bond dimensions must agree pairwise; not checked eagerly -- the
    /// first operation that contracts two mismatched sites reports it).
    pub fn new(sites: Vec<Tensor<E>>) -> Self {
        MPS { mp: MP::new(sites) }
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

    pub fn set_site(&mut self, k: usize, a: Tensor<E>) -> MpsResult<()> {
        self.mp.set(k, a)
    }

    pub fn sites(&self) -> &[Tensor<E>] {
        self.mp.sites()
    }

    pub fn physical_dim(&self, k: usize) -> MpsResult<usize> {
        Ok(self.site(k)?.shape()[1])
    }

    pub fn left_bond(&self, k: usize) -> MpsResult<usize> {
        Ok(self.site(k)?.shape()[0])
    }

    pub fn right_bond(&self, k: usize) -> MpsResult<usize> {
        Ok(self.site(k)?.shape()[2])
    }
}

/// `product_state(length, local_state)`: every site holds the same
/// single-particle vector, with trivial (size-1) bonds throughout.
pub fn product_state<E: Element>(length: usize, local_state: &Tensor<E>) -> MPS<E> {
    let d = local_state.len();
    let site = Tensor::from_fn(vec![1, d, 1], |idx| local_state.as_slice()[idx[1]]);
    MPS::new(vec![site; length])
}

/// `ghz_state(length, periodic)`: `(|00...0> + |11...1>) / sqrt(2)`, built
/// as bond-2 tensors carrying the "which branch" label on the bond index.
/// Grounded on `original_source/src/mps/mps/rmps_ghz_state.cc`.
pub fn ghz_state(length: usize, periodic: bool) -> MPS<f64> {
    let mut sites = Vec::with_capacity(length);
    for k in 0..length {
        let left_open = k == 0 && !periodic;
        let right_open = k == length - 1 && !periodic;
        let left_bond = if left_open { 1 } else { 2 };
        let right_bond = if right_open { 1 } else { 2 };
        let site = Tensor::from_fn(vec![left_bond, 2, right_bond], move |idx| {
            let branch = idx[1];
            let a_matches = left_open || idx[0] == branch;
            let b_matches = right_open || idx[2] == branch;
            if a_matches && b_matches {
                1.0
            } else {
                0.0
            }
        });
        sites.push(site);
    }
    if let Some(first) = sites.first_mut() {
        *first = first.scale(std::f64::consts::FRAC_1_SQRT_2);
    }
    MPS::new(sites)
}

/// `cluster_state(length)`: the 1-D cluster state `CZ_{12}CZ_{23}...|+>^N`,
/// built directly as bond-2 site tensors (the standard MPS form of the
/// cluster state, see `original_source/src/mps/mps/rmps_cluster_state.cc`).
pub fn cluster_state(length: usize) -> MPS<f64> {
    let half = 0.5f64;
    let bulk = Tensor::from_fn(vec![2, 2, 2], |idx| {
        let (a, i, b) = (idx[0], idx[1], idx[2]);
        match (a, i, b) {
            (0, 0, 0) => half,
            (0, 0, 1) => half,
            (0, 1, 0) => half,
            (0, 1, 1) => -half,
            (1, 0, 0) => half,
            (1, 0, 1) => half,
            (1, 1, 0) => -half,
            (1, 1, 1) => half,
            _ => 0.0,
        }
    });
    let left = Tensor::from_fn(vec![1, 2, 2], |idx| {
        if idx[1] == 0 {
            half
        } else if idx[2] == 0 {
            half
        } else {
            -half
        }
    });
    let right = Tensor::from_fn(vec![2, 2, 1], |idx| {
        if idx[1] == 0 {
            half
        } else if idx[0] == 0 {
            half
        } else {
            -half
        }
    });
    let mut sites = Vec::with_capacity(length);
    for k in 0..length {
        if k == 0 {
            sites.push(left.clone());
        } else if k == length - 1 {
            sites.push(right.clone());
        } else {
            sites.push(bulk.clone());
        }
    }
    MPS::new(sites)
}

/// A random MPS of the given physical dimension and (interior) bond
/// dimension, open boundary conditions.
pub fn random(length: usize, physical_dim: usize, bond_dim: usize) -> MPS<f64> {
    let mut sites = Vec::with_capacity(length);
    for k in 0..length {
        let left = if k == 0 { 1 } else { bond_dim };
        let right = if k == length - 1 { 1 } else { bond_dim };
        sites.push(Tensor::<f64>::random(vec![left, physical_dim, right]));
    }
    MPS::new(sites)
}

/// Contract every site of a (necessarily tiny) MPS into the full state
/// vector, flattened in site-major physical-index order. Intended for
/// testing only, per `spec.md` §4.6.
pub fn mps_to_vector<E: Element>(psi: &MPS<E>) -> MpsResult<Tensor<E>> {
    if psi.is_empty() {
        return Ok(Tensor::from_buffer(vec![0], Vec::new())?);
    }
    let mut acc = psi.site(0)?.clone();
    for k in 1..psi.len() {
        acc = fold(&acc, -1, psi.site(k)?, 0)?;
    }
    // acc now has shape (alpha_0, i_1, i_2, ..., i_N, beta_N); squeeze the
    // size-1 boundary bonds away.
    let shape = acc.shape().to_vec();
    let physical: Vec<usize> = shape[1..shape.len() - 1].to_vec();
    let total: usize = physical.iter().product();
    acc.reshape(vec![total]).map_err(MpsError::from)
}

/// `norm2(psi) = sqrt(<psi|psi>)`, by full contraction (not via
/// canonicalization, so it is valid on a non-canonical MPS too).
pub fn norm2<E: Element>(psi: &MPS<E>) -> MpsResult<f64> {
    let s = scprod(psi, psi)?;
    Ok(s.modulus().sqrt())
}

/// `<psi1|psi2>`, contracting bra and ket transfer matrices site by site.
pub fn scprod<E: Element>(psi1: &MPS<E>, psi2: &MPS<E>) -> MpsResult<E> {
    if psi1.len() != psi2.len() {
        return Err(MpsError::BondMismatch { site: 0, left_bond: psi1.len(), right_bond: psi2.len() });
    }
    // Running transfer matrix T(alpha1, alpha2), starting from the left
    // boundary (size 1x1).
    let mut transfer = Tensor::<E>::ones(vec![1, 1]);
    for k in 0..psi1.len() {
        let a = psi1.site(k)?;
        let b = psi2.site(k)?;
        // Contract the running transfer with A* on alpha1, then with B on
        // the shared alpha2 and physical index, leaving the new transfer.
        let ta = foldc(a, 0, &transfer, 0)?; // shape (i, beta1, alpha2)
        let tab = fold(&ta, 2, b, 0)?; // contract alpha2 with B's alpha2 -> (i, beta1, i', beta2)
        // now contract i with i' (axes 0 and 2 of tab)
        let n_i = tab.shape()[0];
        let beta1 = tab.shape()[1];
        let beta2 = tab.shape()[3];
        let mut new_transfer = Tensor::<E>::zeros(vec![beta1, beta2]);
        for b1 in 0..beta1 {
            for b2 in 0..beta2 {
                let mut acc = E::zero();
                for i in 0..n_i {
                    acc = acc + tab.get(&[i as isize, b1 as isize, i as isize, b2 as isize])?;
                }
                new_transfer.set(&[b1 as isize, b2 as isize], acc)?;
            }
        }
        transfer = new_transfer;
    }
    Ok(transfer.get(&[0, 0])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_state_has_trivial_bonds() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![1.0, 0.0]).unwrap();
        let psi = product_state(3, &local);
        assert_eq!(psi.len(), 3);
        assert_eq!(psi.site(0).unwrap().shape(), &[1, 2, 1]);
    }

    #[test]
    fn mps_to_vector_recovers_product_state() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![1.0, 0.0]).unwrap();
        let psi = product_state(2, &local);
        let v = mps_to_vector(&psi).unwrap();
        assert_eq!(v.as_slice(), &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn norm2_of_normalized_product_state_is_one() {
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        let local = Tensor::<f64>::from_buffer(vec![2], vec![inv_sqrt2, inv_sqrt2]).unwrap();
        let psi = product_state(4, &local);
        assert!((norm2(&psi).unwrap() - 1.0).abs() < 1e-8);
    }
}

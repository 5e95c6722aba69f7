/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! `Hamiltonian`: the nearest-neighbour-plus-on-site operator abstraction
//! `MPO::from_hamiltonian` and the Trotter/DMRG solvers build on. Grounded
//! on `examples/original_source/include/mps/hamiltonian.h`'s
//! `Hamiltonian`/`TIHamiltonian`/`ConstantHamiltonian` split -- reimplemented
//! here as two structs implementing one trait, since the Pauli/spin/Fock
//! operator factories that build concrete site tensors are out of scope
//! (`spec.md` §2 Out of scope); callers supply already-built tensors.

use qlattice_num::Element;
use qlattice_tensor::Tensor;

/// A 1-D Hamiltonian `H = sum_k local_term(k) + sum_k interaction(k)` acting
/// on nearest neighbours only. `dimension(k)` gives the physical dimension
/// at site `k`, needed before any term tensor is requested.
pub trait Hamiltonian<E: Element> {
    /// Number of sites this Hamiltonian is defined over.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical (local Hilbert space) dimension at site `k`.
    fn dimension(&self, k: usize) -> usize;

    /// On-site operator acting at site `k` alone, shape `(d_k, d_k)`.
    /// `None` if this Hamiltonian has no on-site term at `k`.
    fn local_term(&self, k: usize) -> Option<Tensor<E>>;

    /// Two-site interaction between sites `k` and `k+1`, shape
    /// `(d_k*d_{k+1}, d_k*d_{k+1})` (row-major over the combined index).
    /// `None` if there is no bond between `k` and `k+1`.
    fn interaction(&self, k: usize) -> Option<Tensor<E>>;

    /// Whether site `len()-1` is coupled back to site `0`.
    fn is_periodic(&self) -> bool {
        false
    }
}

/// A Hamiltonian built from one local operator and one bond operator,
/// repeated at every site/bond (translation invariant in the bulk).
/// Boundary sites still receive the same local term; no special-casing is
/// applied, matching `original_source`'s `TIHamiltonian`.
pub struct TranslationInvariantHamiltonian<E: Element> {
    length: usize,
    dimension: usize,
    local: Option<Tensor<E>>,
    interaction: Option<Tensor<E>>,
    periodic: bool,
}

impl<E: Element> TranslationInvariantHamiltonian<E> {
    pub fn new(length: usize, dimension: usize, local: Option<Tensor<E>>, interaction: Option<Tensor<E>>, periodic: bool) -> Self {
        TranslationInvariantHamiltonian { length, dimension, local, interaction, periodic }
    }
}

impl<E: Element> Hamiltonian<E> for TranslationInvariantHamiltonian<E> {
    fn len(&self) -> usize {
        self.length
    }

    fn dimension(&self, _k: usize) -> usize {
        self.dimension
    }

    fn local_term(&self, _k: usize) -> Option<Tensor<E>> {
        self.local.clone()
    }

    fn interaction(&self, k: usize) -> Option<Tensor<E>> {
        if k + 1 < self.length || self.periodic {
            self.interaction.clone()
        } else {
            None
        }
    }

    fn is_periodic(&self) -> bool {
        self.periodic
    }
}

/// A Hamiltonian built from a per-site list of local and interaction
/// operators, for lattices with no translation symmetry. Mirrors
/// `original_source`'s `ConstantHamiltonian`.
pub struct GenericHamiltonian<E: Element> {
    dimensions: Vec<usize>,
    locals: Vec<Option<Tensor<E>>>,
    interactions: Vec<Option<Tensor<E>>>,
    periodic: bool,
}

impl<E: Element> GenericHamiltonian<E> {
    /// `locals[k]` is the on-site term at site `k`; `interactions[k]` is the
    /// bond term between sites `k` and `k+1`, for `k` in `0..len-1` (plus
    /// `len-1` wrapping to `0` when `periodic`).
    pub fn new(dimensions: Vec<usize>, locals: Vec<Option<Tensor<E>>>, interactions: Vec<Option<Tensor<E>>>, periodic: bool) -> Self {
        GenericHamiltonian { dimensions, locals, interactions, periodic }
    }
}

impl<E: Element> Hamiltonian<E> for GenericHamiltonian<E> {
    fn len(&self) -> usize {
        self.dimensions.len()
    }

    fn dimension(&self, k: usize) -> usize {
        self.dimensions[k]
    }

    fn local_term(&self, k: usize) -> Option<Tensor<E>> {
        self.locals.get(k).cloned().flatten()
    }

    fn interaction(&self, k: usize) -> Option<Tensor<E>> {
        self.interactions.get(k).cloned().flatten()
    }

    fn is_periodic(&self) -> bool {
        self.periodic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_invariant_hamiltonian_reports_uniform_bonds() {
        let z = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 0.0, 0.0, -1.0]).unwrap();
        let zz = Tensor::<f64>::from_buffer(vec![4, 4], vec![0.0; 16]).unwrap();
        let h = TranslationInvariantHamiltonian::new(5, 2, Some(z), Some(zz), false);
        assert_eq!(h.len(), 5);
        assert!(h.interaction(3).is_some());
        assert!(h.interaction(4).is_none());
    }

    #[test]
    fn generic_hamiltonian_allows_per_site_terms() {
        let locals = vec![None, None, None];
        let interactions = vec![None, None];
        let h: GenericHamiltonian<f64> = GenericHamiltonian::new(vec![2, 2, 2], locals, interactions, false);
        assert_eq!(h.dimension(1), 2);
        assert!(h.local_term(0).is_none());
    }
}

/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! A handful of named infinite states used as fixtures and worked examples:
//! the GHZ cat state, the cluster state, and the spin-1 AKLT state.
//! Grounded on `examples/original_source/src/mps/iTEBD/itebd_aklt_state.cc`
//! for the AKLT Gamma tensor and on `qlattice_mps::mps`'s
//! `ghz_state`/`cluster_state` for the other two (the finite-chain
//! versions of the same translationally-invariant patterns).

use qlattice_num::{ComplexField, Element};
use qlattice_tensor::Tensor;

use crate::itebd::ITebd;

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// `(|00...0> + |11...1>) / sqrt(2)` on an infinite chain: bond dimension
/// 2, physical dimension 2, both sublattices identical.
pub fn infinite_ghz_state<E: Element + ComplexField>() -> ITebd<E> {
    let a = Tensor::from_fn(vec![2, 2, 2], |idx| {
        if idx[0] == idx[1] && idx[1] == idx[2] {
            E::one()
        } else {
            E::zero()
        }
    });
    ITebd::from_gammas(a.clone(), vec![INV_SQRT2, INV_SQRT2], a, vec![INV_SQRT2, INV_SQRT2], false)
        .expect("GHZ Gamma tensors have consistent bond dimensions")
}

/// The 1-D cluster state `prod_k CZ_{k,k+1} |+>^{⊗n}` on an infinite chain,
/// bond dimension 2.
pub fn infinite_cluster_state<E: Element + ComplexField>() -> ITebd<E> {
    let inv_sqrt2 = E::from_f64(INV_SQRT2);
    let a = Tensor::from_fn(vec![2, 2, 2], |idx| {
        let (l, i, r) = (idx[0], idx[1], idx[2]);
        if i == 0 && l == r {
            inv_sqrt2
        } else if i == 1 && r == 1 - l {
            if l == 0 {
                inv_sqrt2
            } else {
                -inv_sqrt2
            }
        } else {
            E::zero()
        }
    });
    ITebd::from_gammas(a.clone(), vec![INV_SQRT2, INV_SQRT2], a, vec![INV_SQRT2, INV_SQRT2], false)
        .expect("cluster-state Gamma tensors have consistent bond dimensions")
}

/// The spin-1 AKLT ground state: physical dimension 3 (the Pauli matrices
/// stacked along the physical axis), bond dimension 2, both sublattices
/// identical. `entropy(0)` of the canonicalized result equals `ln(2)`, the
/// maximally-entangled bond shared between the two AKLT valence bonds.
pub fn infinite_aklt_state<E: Element + ComplexField>() -> ITebd<E> {
    let mut buf = vec![E::zero(); 2 * 3 * 2];
    let set = |buf: &mut Vec<E>, l: usize, i: usize, r: usize, v: E| {
        buf[(l * 3 + i) * 2 + r] = v;
    };
    // i=0: the antisymmetric generator representing i*Pauli_y.
    set(&mut buf, 0, 0, 1, E::one());
    set(&mut buf, 1, 0, 0, -E::one());
    // i=1: Pauli_z.
    set(&mut buf, 0, 1, 0, E::one());
    set(&mut buf, 1, 1, 1, -E::one());
    // i=2: Pauli_x.
    set(&mut buf, 0, 2, 1, E::one());
    set(&mut buf, 1, 2, 0, E::one());
    let a = Tensor::from_buffer(vec![2, 3, 2], buf).expect("fixed-size AKLT buffer");

    ITebd::from_gammas(a.clone(), vec![INV_SQRT2, INV_SQRT2], a, vec![INV_SQRT2, INV_SQRT2], false)
        .expect("AKLT Gamma tensors have consistent bond dimensions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ghz_state_has_ln2_entropy() {
        let state: ITebd<f64> = infinite_ghz_state();
        assert!((state.entropy(0) - 2.0_f64.ln()).abs() < 1e-8);
    }

    #[test]
    fn aklt_state_has_ln2_entropy() {
        let state: ITebd<f64> = infinite_aklt_state();
        assert!((state.entropy(0) - 2.0_f64.ln()).abs() < 1e-8);
    }

    #[test]
    fn cluster_state_bond_dimension_is_two() {
        let state: ITebd<f64> = infinite_cluster_state();
        assert_eq!(state.right_dimension(0), 2);
    }
}

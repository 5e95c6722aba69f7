/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! `ArnoldiSolver`: a small Krylov-subspace time step. Builds a Lanczos
//! basis `{v_j}` via the 3-term recurrence `v_{j+1} = H v_j - alpha_j v_j -
//! beta_{j-1} v_{j-1}`, forms the overlap matrices `N_jk = <v_j|v_k>` and
//! `H_jk = <v_j|H|v_k>`, solves `N^-1 H` via an SVD-regularized solve, and
//! exponentiates. Grounded on
//! `examples/original_source/include/mps/time_evolve.h`'s `ArnoldiSolver`
//! and `spec.md` §4.7.
//!
//! Like `trotter.rs`, this performs real-time evolution
//! (`exp(-i*dt*N^-1*H)`): the Krylov-subspace projection `N^-1*H` is
//! exponentiated with a genuine `-i` factor, so the solver is bound on
//! `ImaginaryUnit` rather than `RealField`.

use qlattice_num::ImaginaryUnit;
use qlattice_tensor::Tensor;

use qlattice_mps::{norm2, scprod, simplify, truncate, MPS};

use crate::error::DynamicsResult;

pub struct ArnoldiSolver<E: ImaginaryUnit> {
    dt: E,
    dmax: usize,
    nvectors: usize,
}

impl<E: ImaginaryUnit> ArnoldiSolver<E> {
    pub fn new(dt: E, dmax: usize, nvectors: usize) -> Self {
        ArnoldiSolver { dt, dmax, nvectors: nvectors.max(1) }
    }

    /// Advance `psi` by one Arnoldi step. `apply_h` computes `H|v>` for a
    /// given state (typically `qlattice_mps::apply(&mpo, v)` followed by a
    /// `truncate`, supplied by the caller so this solver stays agnostic of
    /// how `H` is represented).
    pub fn step(&self, apply_h: impl Fn(&MPS<E>) -> DynamicsResult<MPS<E>>, psi: &MPS<E>) -> DynamicsResult<MPS<E>> {
        let vectors = self.build_krylov_basis(&apply_h, psi)?;
        let k = vectors.len();

        let mut hv = Vec::with_capacity(k);
        for v in &vectors {
            hv.push(apply_h(v)?);
        }

        let mut n_mat = Tensor::<E>::zeros(vec![k, k]);
        let mut h_mat = Tensor::<E>::zeros(vec![k, k]);
        for j in 0..k {
            for l in 0..k {
                n_mat.set(&[j as isize, l as isize], scprod(&vectors[j], &vectors[l])?)?;
                h_mat.set(&[j as isize, l as isize], scprod(&vectors[j], &hv[l])?)?;
            }
        }

        let ninv_h = svd_regularized_solve(&n_mat, &h_mat)?;
        let neg_i_dt = -(E::i() * self.dt);
        let exp_mat = qlattice_linalg::expm(&ninv_h.scale(neg_i_dt), 6)?;

        let mut weights = Vec::with_capacity(k);
        for j in 0..k {
            weights.push(exp_mat.get(&[j as isize, 0])?);
        }

        let ansatz = truncate(&vectors[0], self.dmax, false)?.0;
        let (result, _err) = simplify(&ansatz, &vectors, &weights, 1, 2, true)?;
        Ok(result)
    }

    fn build_krylov_basis(&self, apply_h: &impl Fn(&MPS<E>) -> DynamicsResult<MPS<E>>, psi: &MPS<E>) -> DynamicsResult<Vec<MPS<E>>> {
        let mut vectors = vec![normalize(psi)?];
        let mut betas: Vec<E> = Vec::new();

        for j in 1..self.nvectors {
            let hv = apply_h(&vectors[j - 1])?;
            let alpha = scprod(&vectors[j - 1], &hv)?;

            let mut terms = vec![hv, vectors[j - 1].clone()];
            let mut term_weights = vec![E::one(), -alpha];
            if j >= 2 {
                terms.push(vectors[j - 2].clone());
                term_weights.push(-betas[j - 2]);
            }
            let w = qlattice_mps::direct_sum(&terms, &term_weights)?;

            let beta_j = norm2(&w)?;
            if beta_j <= 1e-12 {
                break;
            }
            let mut v_next = w;
            let scaled_first = v_next.site(0)?.clone().scale(E::from_f64(1.0 / beta_j));
            v_next.set_site(0, scaled_first)?;

            vectors.push(v_next);
            betas.push(E::from_f64(beta_j));
        }
        Ok(vectors)
    }
}

fn normalize<E: ImaginaryUnit>(psi: &MPS<E>) -> DynamicsResult<MPS<E>> {
    let norm = norm2(psi)?;
    let mut out = psi.clone();
    if norm > f64::EPSILON {
        let scaled = out.site(0)?.clone().scale(E::from_f64(1.0 / norm));
        out.set_site(0, scaled)?;
    }
    Ok(out)
}

/// Solve `N X = rhs` for possibly near-singular `N`, by SVD-truncating
/// singular values below a fixed relative tolerance instead of inverting
/// them (the "SVD-regularized solve" `spec.md` §4.7 calls for).
fn svd_regularized_solve<E: ImaginaryUnit>(n_mat: &Tensor<E>, rhs: &Tensor<E>) -> DynamicsResult<Tensor<E>> {
    let (u, s, vt) = qlattice_linalg::svd(n_mat, true)?;
    let k = n_mat.shape()[0];
    let cols = rhs.shape()[1];
    let threshold = f64::EPSILON * 1e3;

    let mut y = Tensor::<E>::zeros(vec![k, cols]);
    for a in 0..k {
        for c in 0..cols {
            let mut acc = E::zero();
            for r in 0..k {
                acc = acc + u.get(&[r as isize, a as isize])? * rhs.get(&[r as isize, c as isize])?;
            }
            y.set(&[a as isize, c as isize], acc)?;
        }
    }

    let mut z = Tensor::<E>::zeros(vec![k, cols]);
    for a in 0..k {
        if s[a] > threshold {
            let inv_sa = E::from_f64(1.0 / s[a]);
            for c in 0..cols {
                z.set(&[a as isize, c as isize], y.get(&[a as isize, c as isize])? * inv_sa)?;
            }
        }
    }

    let mut x = Tensor::<E>::zeros(vec![k, cols]);
    for r in 0..k {
        for c in 0..cols {
            let mut acc = E::zero();
            for a in 0..k {
                acc = acc + vt.get(&[a as isize, r as isize])? * z.get(&[a as isize, c as isize])?;
            }
            x.set(&[r as isize, c as isize], acc)?;
        }
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlattice_mps::product_state;
    use qlattice_num::Complex64;

    #[test]
    fn arnoldi_step_under_zero_hamiltonian_keeps_state_normalized() {
        let local = Tensor::<Complex64>::from_buffer(vec![2], vec![Complex64::new(0.6, 0.0), Complex64::new(0.8, 0.0)]).unwrap();
        let psi = product_state(3, &local);
        let apply_h = |v: &MPS<Complex64>| -> DynamicsResult<MPS<Complex64>> { Ok(v.clone()) };
        let solver = ArnoldiSolver::new(Complex64::new(0.1, 0.0), 4, 3);
        let next = solver.step(apply_h, &psi).unwrap();
        assert!((norm2(&next).unwrap() - 1.0).abs() < 1e-6);
    }
}

/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! The Gamma-Lambda data model for an infinite, translationally-invariant
//! two-site unit cell, plus the two operations that act on it:
//! `apply_operator` (a two-site Trotter gate, leaving the state only
//! approximately canonical) and `canonical_form` (restoring an exactly
//! canonical gauge by power-iterating the fixed points of the transfer
//! matrix). Grounded on
//! `examples/original_source/include/mps/itebd.h` for the data model and
//! accessor set, on `examples/original_source/src/mps/iTEBD/itebd.hpp` for
//! the constructors, and on `spec.md` §4.8's own algorithmic prose for
//! `apply_operator`/`canonical_form`: the originating repository's
//! `itebd_apply_operator.cc`/`itebd_canonical.cc` are not present among the
//! retrieved sources, so these two methods have no original-language
//! implementation to translate and are built directly from the written
//! description (see `DESIGN.md`).
//!
//! The two-site update step (SVD, truncate, re-scale) is the same
//! bookkeeping as `qlattice_mps::two_site::set_canonical_2_sites`, but
//! duplicated locally: `spec.md` treats iTEBD as an independent variant of
//! the finite-chain MPS model, and the helpers this needs
//! (`where_to_truncate`, the SVD-factor scaling helpers) are not `pub` from
//! `qlattice_mps`.
//!
//! Schmidt weights and singular values are always real (the LAPACK
//! `zgesvd`/`zheev` convention `qlattice_linalg::svd`/`eig_sym` themselves
//! follow), so `la`/`lb` are plain `Vec<f64>` regardless of whether the
//! Gamma tensors carry real or complex entries; `entropy`/`schmidt` follow
//! suit. The fixed-point matrices power-iterated in `canonicalize_bond` are
//! Hermitian (not merely symmetric) once the Gammas are complex, so their
//! averaging step and gauge-matrix construction go through
//! `hermitian_symmetrize`/`conjugate_transpose` rather than a plain
//! transpose.

use qlattice_num::{ComplexField, Element};
use qlattice_tensor::ops::{fold, permute};
use qlattice_tensor::Tensor;

use crate::error::{ItebdError, ItebdResult};

/// Which of the two bonds a two-site gate acts across: `AtoB` updates the
/// bond labelled `la` (between `A` and `B`), `BtoA` updates `lb` (between
/// `B` and the next unit cell's `A`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    AtoB,
    BtoA,
}

/// An infinite translationally-invariant chain in Gamma-Lambda form:
/// `... lb A la B lb A la B ...`. `a`/`b` are the two Gamma tensors (shape
/// `(left_bond, physical, right_bond)`); `la`/`lb` are the Schmidt weight
/// vectors of the two inequivalent bonds.
#[derive(Debug, Clone)]
pub struct ITebd<E: Element + ComplexField> {
    a: Tensor<E>,
    b: Tensor<E>,
    la: Vec<f64>,
    lb: Vec<f64>,
    canonical: bool,
}

impl<E: Element + ComplexField> ITebd<E> {
    /// Build from explicit Gamma tensors and Schmidt vectors, checking that
    /// bond dimensions agree and that neither bond has collapsed to zero
    /// weight everywhere.
    pub fn from_gammas(a: Tensor<E>, la: Vec<f64>, b: Tensor<E>, lb: Vec<f64>, canonical: bool) -> ItebdResult<Self> {
        if a.rank() != 3 || b.rank() != 3 {
            return Err(ItebdError::Tensor(qlattice_tensor::TensorError::DimensionsMismatch {
                lhs: a.shape().to_vec(),
                rhs: b.shape().to_vec(),
                axes: None,
            }));
        }
        if a.shape()[0] != lb.len() || a.shape()[2] != la.len() {
            return Err(ItebdError::Tensor(qlattice_tensor::TensorError::DimensionsMismatch {
                lhs: a.shape().to_vec(),
                rhs: vec![lb.len(), la.len()],
                axes: None,
            }));
        }
        if b.shape()[0] != la.len() || b.shape()[2] != lb.len() {
            return Err(ItebdError::Tensor(qlattice_tensor::TensorError::DimensionsMismatch {
                lhs: b.shape().to_vec(),
                rhs: vec![la.len(), lb.len()],
                axes: None,
            }));
        }
        if la.iter().all(|v| v.abs() <= f64::EPSILON) {
            return Err(ItebdError::DegenerateBond { site: 0 });
        }
        if lb.iter().all(|v| v.abs() <= f64::EPSILON) {
            return Err(ItebdError::DegenerateBond { site: 1 });
        }
        Ok(ITebd { a, b, la, lb, canonical })
    }

    /// A translationally-invariant product state with the same local vector
    /// on every site, bond dimension 1. Already canonical.
    pub fn product_state(local: &Tensor<E>) -> Self {
        Self::two_site_product_state(local, local)
    }

    /// A period-2 product state with independent local vectors on the two
    /// sublattices, bond dimension 1. Already canonical.
    pub fn two_site_product_state(local_a: &Tensor<E>, local_b: &Tensor<E>) -> Self {
        let d_a = local_a.len();
        let d_b = local_b.len();
        let a = Tensor::from_fn(vec![1, d_a, 1], |idx| local_a.as_slice()[idx[1]]);
        let b = Tensor::from_fn(vec![1, d_b, 1], |idx| local_b.as_slice()[idx[1]]);
        ITebd { a, b, la: vec![1.0], lb: vec![1.0], canonical: true }
    }

    /// The Gamma tensor at `site` (`0` = `A`, `1` = `B`, wraparound for any
    /// other value since the unit cell has period 2).
    pub fn matrix(&self, site: usize) -> &Tensor<E> {
        if site % 2 == 0 {
            &self.a
        } else {
            &self.b
        }
    }

    /// The Schmidt vector on the bond to the left of `site`.
    pub fn left_vector(&self, site: usize) -> &[f64] {
        if site % 2 == 0 {
            &self.lb
        } else {
            &self.la
        }
    }

    /// The Schmidt vector on the bond to the right of `site`.
    pub fn right_vector(&self, site: usize) -> &[f64] {
        if site % 2 == 0 {
            &self.la
        } else {
            &self.lb
        }
    }

    /// `Gamma_site` with its right bond scaled by that bond's Schmidt
    /// weights, the quantity the original calls `AlA`/`BlB`.
    pub fn combined_matrix(&self, site: usize) -> Tensor<E> {
        scale_axis_last(self.matrix(site), self.right_vector(site))
    }

    pub fn site_dimension(&self, site: usize) -> usize {
        self.matrix(site).shape()[1]
    }

    pub fn left_dimension(&self, site: usize) -> usize {
        self.matrix(site).shape()[0]
    }

    pub fn right_dimension(&self, site: usize) -> usize {
        self.matrix(site).shape()[2]
    }

    /// `diag(left_vector(site)^2)`, the reduced density matrix the left
    /// environment contributes under an exactly canonical gauge.
    pub fn left_boundary(&self, site: usize) -> Tensor<E> {
        diag_of_squares(self.left_vector(site))
    }

    /// `diag(right_vector(site)^2)`.
    pub fn right_boundary(&self, site: usize) -> Tensor<E> {
        diag_of_squares(self.right_vector(site))
    }

    pub fn is_canonical(&self) -> bool {
        self.canonical
    }

    /// The Schmidt coefficients (squared singular values) on the bond to
    /// the right of `site`.
    pub fn schmidt(&self, site: usize) -> Vec<f64> {
        self.right_vector(site).iter().map(|&l| l * l).collect()
    }

    /// `-sum_i p_i ln p_i` over the Schmidt coefficients on the bond to the
    /// right of `site`, zero-weight entries excluded.
    pub fn entropy(&self, site: usize) -> f64 {
        let mut acc = 0.0;
        for p in self.schmidt(site) {
            if p.abs() > f64::EPSILON {
                acc -= p * p.ln();
            }
        }
        acc
    }

    /// `entropy(0) + entropy(1)`, the total bipartite entropy across one
    /// full unit cell.
    pub fn entropy_total(&self) -> f64 {
        self.entropy(0) + self.entropy(1)
    }

    /// Apply a two-site unitary (or otherwise trace-preserving) gate `U`,
    /// shape `(d, d, d, d)` as `(i_out, j_out, i_in, j_in)`, across the bond
    /// selected by `parity`. Builds the two-site block, contracts the gate
    /// in, splits the result by SVD truncated to `tol`/`dmax`, then divides
    /// the two outer bonds' weights back out of the new Gamma tensors. This
    /// leaves the pair of Gammas touched by the gate exactly normalized but
    /// the chain only approximately canonical, with error bounded by the
    /// truncation discarded at this step (`spec.md` §4.8).
    pub fn apply_operator(&self, gate: &Tensor<E>, parity: Parity, tol: f64, dmax: usize) -> ItebdResult<Self> {
        let (outer, gamma_l, mid, gamma_r) = match parity {
            Parity::AtoB => (&self.lb, &self.a, &self.la, &self.b),
            Parity::BtoA => (&self.la, &self.b, &self.lb, &self.a),
        };

        let left = scale_axis0(gamma_l, outer);
        let left = scale_axis_last(&left, mid);
        let right = scale_axis_last(gamma_r, outer);
        let theta = fold(&left, 2, &right, 0)?; // (outer, i, j, outer)
        let applied = apply_gate(&theta, gate)?;

        let shape = applied.shape().to_vec();
        let (dl, di, dj, dr) = (shape[0], shape[1], shape[2], shape[3]);
        let matrix = applied.reshape(vec![dl * di, dj * dr])?;
        let (u, mut s, vt) = qlattice_linalg::svd(&matrix, true)?;

        let cap = dmax.min(s.len());
        let rank = where_to_truncate(&s, tol, cap).max(1);

        let total: f64 = s[..rank].iter().fold(0.0, |acc, &v| acc + v * v);
        let norm = total.sqrt();
        if norm.abs() > f64::EPSILON {
            for v in s.iter_mut().take(rank) {
                *v /= norm;
            }
        }

        let u_trunc = take_columns(&u, rank);
        let vt_trunc = take_rows(&vt, rank);

        let new_gamma_l_combined = u_trunc.reshape(vec![dl, di, rank])?;
        let new_gamma_l = unscale_axis0(&new_gamma_l_combined, outer);

        let new_gamma_r_combined = scale_rows_by_diag(&s[..rank], &vt_trunc).reshape(vec![rank, dj, dr])?;
        let new_gamma_r = unscale_axis_last(&new_gamma_r_combined, outer);

        let new_mid = s[..rank].to_vec();

        let (a, la, b, lb) = match parity {
            Parity::AtoB => (new_gamma_l, new_mid, new_gamma_r, self.lb.clone()),
            Parity::BtoA => (new_gamma_r, self.la.clone(), new_gamma_l, new_mid),
        };
        Ok(ITebd { a, b, la, lb, canonical: false })
    }

    /// Restore an exactly canonical Gamma-Lambda gauge by power-iterating
    /// the left/right fixed points of each bond's transfer operator,
    /// factoring them, and re-gauging the Gamma tensors and Schmidt
    /// vectors accordingly (the standard Orus-Vidal iTEBD canonicalization;
    /// `spec.md` §4.8 describes the same three steps: find the dominant
    /// transfer-matrix eigenvectors, SVD the combined gauge matrix for new
    /// Schmidt values, and absorb the gauge transform back into the
    /// Gammas).
    pub fn canonical_form(&self) -> ItebdResult<Self> {
        let mut state = self.clone();
        for _ in 0..200 {
            state = state.canonicalize_bond(Parity::AtoB)?;
            state = state.canonicalize_bond(Parity::BtoA)?;
        }
        state.canonical = true;
        Ok(state)
    }

    fn canonicalize_bond(&self, parity: Parity) -> ItebdResult<Self> {
        let (gamma_l, mid, gamma_r, gamma_r_mid) = match parity {
            Parity::AtoB => (&self.a, &self.la, &self.b, &self.lb),
            Parity::BtoA => (&self.b, &self.lb, &self.a, &self.la),
        };
        let dl = mid.len();

        let combined_l = scale_axis_last(gamma_l, mid);
        let combined_r = scale_axis_last(gamma_r, gamma_r_mid);

        // Propagate a `dl x dl` environment through one full unit cell
        // (both Gammas) and back to the same bond, so the fixed-point
        // search never has to cross a differently-sized bond.
        let right_fixed = dominant_fixed_point(dl, |v| {
            let after_r = right_transfer_step(&combined_r, v);
            right_transfer_step(&combined_l, &after_r)
        })?;
        let left_fixed = dominant_fixed_point(dl, |v| {
            let after_l = left_transfer_step(&combined_l, v);
            left_transfer_step(&combined_r, &after_l)
        })?;

        let (left_vals, left_vecs) = qlattice_linalg::eig_sym(&left_fixed)?;
        let (right_vals, right_vecs) = qlattice_linalg::eig_sym(&right_fixed)?;

        let x = gauge_factor(&left_vals, &left_vecs);
        let y = gauge_factor(&right_vals, &right_vecs);

        let lambda_mat = diag_from_vec(mid);
        let m = fold(&fold(&conjugate_transpose(&y)?, 1, &lambda_mat, 0)?, 1, &x, 0)?;

        let (u, s, vt) = qlattice_linalg::svd(&m, true)?;

        let x_inv = qlattice_linalg::solve(&x, &Tensor::<E>::eye(dl))?;
        let y_inv = qlattice_linalg::solve(&y, &Tensor::<E>::eye(dl))?;

        let gl = fold(gamma_l, 2, &fold(&y_inv, 1, &u, 0)?, 0)?; // (left, i, rank)
        let gr = fold(&fold(&vt, 1, &x_inv, 0)?, 1, gamma_r, 0)?; // (rank, j, right)

        let new_mid = s;
        let (a, la, b, lb) = match parity {
            Parity::AtoB => (gl, new_mid, gr, self.lb.clone()),
            Parity::BtoA => (gr, self.la.clone(), gl, new_mid),
        };
        Ok(ITebd { a, b, la, lb, canonical: false })
    }
}

/// `out[r,r'] = sum_{l,l',i} v[l,l'] gamma[l,i,r] conj(gamma[l',i,r'])`:
/// push an environment living on `gamma`'s left bond out to its right bond.
/// The second Gamma copy is conjugated, since the transfer operator is built
/// from `gamma (x) conj(gamma)` (a bra-ket pair), matching the ordinary
/// (real) case where `conj` is a no-op.
fn right_transfer_step<E: Element + ComplexField>(gamma: &Tensor<E>, v: &Tensor<E>) -> Tensor<E> {
    let gamma_conj = conj_tensor(gamma);
    let step = fold(v, 0, gamma, 0).expect("matching left bond"); // (l', i, r)
    let step = fold(&step, 0, &gamma_conj, 0).expect("matching left bond"); // (i, r, i', r')
    partial_trace_physical(&step)
}

/// The mirror image of `right_transfer_step`, pulling an environment living
/// on `gamma`'s right bond back to its left bond.
fn left_transfer_step<E: Element + ComplexField>(gamma: &Tensor<E>, v: &Tensor<E>) -> Tensor<E> {
    let gamma_conj = conj_tensor(gamma);
    let step = fold(gamma, 2, v, 0).expect("matching right bond"); // (l, i, r')
    let step = fold(&step, 2, &gamma_conj, 2).expect("matching right bond"); // (l, i, l', i')
    partial_trace_physical_leading(&step)
}

/// Sum `t[i, r, i, r']` over the repeated physical index, producing the
/// `(r, r')` transfer result.
fn partial_trace_physical<E: Element>(t: &Tensor<E>) -> Tensor<E> {
    let n_i = t.shape()[0];
    let r = t.shape()[1];
    let r2 = t.shape()[3];
    Tensor::from_fn(vec![r, r2], |idx| {
        let mut acc = E::zero();
        for i in 0..n_i {
            acc = acc + t.get(&[i as isize, idx[0] as isize, i as isize, idx[1] as isize]).expect("in bounds");
        }
        acc
    })
}

/// Sum `t[l, i, l', i]` over the repeated trailing physical index,
/// producing the `(l, l')` transfer result.
fn partial_trace_physical_leading<E: Element>(t: &Tensor<E>) -> Tensor<E> {
    let l = t.shape()[0];
    let n_i = t.shape()[1];
    let l2 = t.shape()[2];
    Tensor::from_fn(vec![l, l2], |idx| {
        let mut acc = E::zero();
        for i in 0..n_i {
            acc = acc + t.get(&[idx[0] as isize, i as isize, idx[1] as isize, i as isize]).expect("in bounds");
        }
        acc
    })
}

/// Power-iterate `step` from the identity (already Hermitian positive
/// semi-definite) until it stabilizes, Hermitian-symmetrizing and
/// renormalizing after every application to fight numerical drift; the
/// dominant fixed point of a positivity-preserving transfer map is itself
/// Hermitian PSD, so `eig_sym` is the right tool to factor it.
fn dominant_fixed_point<E: Element + ComplexField>(d: usize, step: impl Fn(&Tensor<E>) -> Tensor<E>) -> ItebdResult<Tensor<E>> {
    let mut v = Tensor::<E>::eye(d);
    for _ in 0..300 {
        let next = step(&v);
        let mut next = hermitian_symmetrize(&next)?;
        let norm = frob_norm(&next);
        if norm.abs() > f64::EPSILON {
            next = next.scale(E::from_f64(1.0 / norm));
        }
        v = next;
    }
    Ok(v)
}

fn frob_norm<E: Element>(t: &Tensor<E>) -> f64 {
    t.as_slice().iter().fold(0.0, |acc, &x| acc + x.modulus() * x.modulus()).sqrt()
}

/// `(m + m^H) / 2`: the Hermitian part of a square matrix. Reduces to plain
/// symmetrization for a real element type, since `conj` is the identity
/// there.
fn hermitian_symmetrize<E: Element>(m: &Tensor<E>) -> ItebdResult<Tensor<E>> {
    let mt = conjugate_transpose(m)?;
    Ok((m.clone() + mt)?.scale(E::from_f64(0.5)))
}

/// `m^H`: conjugate transpose.
fn conjugate_transpose<E: Element>(m: &Tensor<E>) -> ItebdResult<Tensor<E>> {
    let transposed = permute(m, 0, 1)?;
    Ok(Tensor::from_fn(transposed.shape().to_vec(), |idx| transposed.get(&to_isize(idx)).expect("in bounds").conj()))
}

fn conj_tensor<E: Element>(t: &Tensor<E>) -> Tensor<E> {
    Tensor::from_fn(t.shape().to_vec(), |idx| t.get(&to_isize(idx)).expect("in bounds").conj())
}

/// Build the gauge factor `X` (or `Y`) from a fixed point's eigendecomposition:
/// `X = V * diag(sqrt(max(eigenvalue, 0)))`. Negative eigenvalues, which can
/// only arise from floating point drift on a matrix that is PSD in exact
/// arithmetic, are clipped to zero.
fn gauge_factor<E: Element + ComplexField>(vals: &[f64], vecs: &Tensor<E>) -> Tensor<E> {
    let n = vals.len();
    Tensor::from_fn(vec![n, n], |idx| {
        let clipped = if vals[idx[1]] > 0.0 { vals[idx[1]] } else { 0.0 };
        vecs.get(&[idx[0] as isize, idx[1] as isize]).expect("in bounds") * E::from_f64(clipped.sqrt())
    })
}

fn scale_axis0<E: Element>(t: &Tensor<E>, w: &[f64]) -> Tensor<E> {
    let shape = t.shape().to_vec();
    Tensor::from_fn(shape, |idx| t.get(&to_isize(idx)).expect("in bounds") * E::from_f64(w[idx[0]]))
}

fn scale_axis_last<E: Element>(t: &Tensor<E>, w: &[f64]) -> Tensor<E> {
    let shape = t.shape().to_vec();
    let last = shape.len() - 1;
    Tensor::from_fn(shape.clone(), |idx| t.get(&to_isize(idx)).expect("in bounds") * E::from_f64(w[idx[last]]))
}

fn unscale_axis0<E: Element>(t: &Tensor<E>, w: &[f64]) -> Tensor<E> {
    let shape = t.shape().to_vec();
    Tensor::from_fn(shape, |idx| {
        let v = t.get(&to_isize(idx)).expect("in bounds");
        let wi = w[idx[0]];
        if wi.abs() <= f64::EPSILON {
            E::zero()
        } else {
            v * E::from_f64(1.0 / wi)
        }
    })
}

fn unscale_axis_last<E: Element>(t: &Tensor<E>, w: &[f64]) -> Tensor<E> {
    let shape = t.shape().to_vec();
    let last = shape.len() - 1;
    Tensor::from_fn(shape.clone(), |idx| {
        let v = t.get(&to_isize(idx)).expect("in bounds");
        let wi = w[idx[last]];
        if wi.abs() <= f64::EPSILON {
            E::zero()
        } else {
            v * E::from_f64(1.0 / wi)
        }
    })
}

fn to_isize(idx: &[usize]) -> Vec<isize> {
    idx.iter().map(|&x| x as isize).collect()
}

fn diag_of_squares<E: Element>(w: &[f64]) -> Tensor<E> {
    let n = w.len();
    Tensor::from_fn(vec![n, n], |idx| if idx[0] == idx[1] { E::from_f64(w[idx[0]] * w[idx[0]]) } else { E::zero() })
}

fn diag_from_vec<E: Element>(w: &[f64]) -> Tensor<E> {
    let n = w.len();
    Tensor::from_fn(vec![n, n], |idx| if idx[0] == idx[1] { E::from_f64(w[idx[0]]) } else { E::zero() })
}

/// Apply a two-site gate `(i_out, j_out, i_in, j_in)` to a two-site block
/// `(left, i_in, j_in, right)`, producing `(left, i_out, j_out, right)`.
/// Mirrors `qlattice_dynamics::trotter::apply_gate_to_bond`'s reshape-fold
/// sequence, duplicated here since the two crates share no dependency.
fn apply_gate<E: Element>(theta: &Tensor<E>, gate: &Tensor<E>) -> ItebdResult<Tensor<E>> {
    let shape = theta.shape();
    let (left, di, dj, right) = (shape[0], shape[1], shape[2], shape[3]);
    let flat = theta.reshape(vec![left, di * dj, right])?;
    let gate_flat = gate.reshape(vec![di * dj, di * dj])?;
    let applied = fold(&gate_flat, 1, &flat, 1)?; // (out, left, right)
    let applied = permute(&applied, 0, 1)?; // (left, out, right)
    Ok(applied.reshape(vec![left, di, dj, right])?)
}

/// Identical in behaviour to `qlattice_mps::truncation::where_to_truncate`,
/// duplicated locally since that crate's module is private and this crate
/// deliberately has no dependency on it.
fn where_to_truncate(s: &[f64], tol: f64, max: usize) -> usize {
    if s.is_empty() {
        return 0;
    }
    let total = s.iter().fold(0.0, |acc, &v| acc + v * v);
    if total.abs() <= f64::EPSILON {
        return 0;
    }
    let effective_tol = if tol <= 0.0 { f64::EPSILON } else { tol };
    let n = s.len();
    let max_k = max.min(n);
    let mut tail_sums = vec![0.0; n + 1];
    for i in (0..n).rev() {
        tail_sums[i] = tail_sums[i + 1] + s[i] * s[i];
    }
    for k in 0..=max_k {
        if tail_sums[k] <= effective_tol * total {
            return k;
        }
    }
    max_k
}

fn take_columns<E: Element>(u: &Tensor<E>, r: usize) -> Tensor<E> {
    let m = u.shape()[0];
    Tensor::from_fn(vec![m, r], |idx| u.get(&[idx[0] as isize, idx[1] as isize]).expect("in bounds"))
}

fn take_rows<E: Element>(v: &Tensor<E>, r: usize) -> Tensor<E> {
    let k = v.shape()[1];
    Tensor::from_fn(vec![r, k], |idx| v.get(&[idx[0] as isize, idx[1] as isize]).expect("in bounds"))
}

fn scale_rows_by_diag<E: Element>(s: &[f64], v: &Tensor<E>) -> Tensor<E> {
    let n = v.shape()[1];
    Tensor::from_fn(vec![s.len(), n], |idx| v.get(&[idx[0] as isize, idx[1] as isize]).expect("in bounds") * E::from_f64(s[idx[0]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_state_is_normalized_and_canonical() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![0.6, 0.8]).unwrap();
        let state = ITebd::product_state(&local);
        assert!(state.is_canonical());
        assert_eq!(state.schmidt(0), vec![1.0]);
        assert_eq!(state.schmidt(1), vec![1.0]);
    }

    #[test]
    fn product_state_has_zero_entanglement_entropy() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![1.0, 0.0]).unwrap();
        let state = ITebd::product_state(&local);
        assert!(state.entropy(0).abs() < 1e-12);
        assert!(state.entropy_total().abs() < 1e-12);
    }

    #[test]
    fn apply_identity_gate_preserves_product_state_schmidt_values() {
        let local = Tensor::<f64>::from_buffer(vec![2], vec![0.6, 0.8]).unwrap();
        let state = ITebd::product_state(&local);
        let id4 = Tensor::<f64>::eye(4);
        let next = state.apply_operator(&id4, Parity::AtoB, 0.0, 4).unwrap();
        assert!((next.schmidt(0)[0] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn from_gammas_rejects_degenerate_bond() {
        let a = Tensor::<f64>::from_buffer(vec![1, 2, 1], vec![1.0, 0.0]).unwrap();
        let b = a.clone();
        let err = ITebd::from_gammas(a, vec![0.0], b, vec![1.0], false);
        assert!(err.is_err());
    }

    #[test]
    fn complex_product_state_is_normalized_and_canonical() {
        use qlattice_num::Complex64;
        let local = Tensor::<Complex64>::from_buffer(vec![2], vec![Complex64::new(0.6, 0.0), Complex64::new(0.0, 0.8)]).unwrap();
        let state = ITebd::product_state(&local);
        assert!(state.is_canonical());
        assert!((state.schmidt(0)[0] - 1.0).abs() < 1e-12);
    }
}

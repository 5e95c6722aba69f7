/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! `eig_sym` (cyclic Jacobi, Hermitian matrices) and `eig` (shifted QR with
//! Hessenberg reduction, general real matrices, reconstructing
//! complex-conjugate eigenvalue pairs). Grounded on `spec.md` §4.5 and
//! `examples/original_source/src/arpack/eigs_sym*.cc` for the ascending
//! eigenvalue/eigenvector convention.
//!
//! `eig` stays `RealField`-only: it backs `eigs`'s dense bypass for a
//! caller-supplied real linear map, and a full complex (non-Hermitian)
//! Hessenberg-plus-shifted-QR solver is outside what any caller in this
//! engine needs -- every Hamiltonian-derived operator that reaches an
//! eigensolver here is Hermitian, so it goes through `eig_sym` instead. See
//! `DESIGN.md`.

use num_complex::Complex64;
use qlattice_num::{ComplexField, Element, RealField};
use qlattice_tensor::Tensor;

use crate::error::{LinalgError, LinalgResult};

const MAX_SWEEPS: usize = 100;
const MAX_QR_ITERS: usize = 500;

/// Eigenvalues (ascending, always real) and eigenvectors (as columns) of a
/// Hermitian matrix, via cyclic Jacobi rotation. Each off-diagonal pivot is
/// first brought to a real, non-negative value by a diagonal phase
/// rotation (which leaves the diagonal real and untouched), then reduced by
/// the same real 2x2 rotation the symmetric-real case uses.
pub fn eig_sym<E: Element + ComplexField>(a: &Tensor<E>) -> LinalgResult<(Vec<f64>, Tensor<E>)> {
    let n = square_dim(a)?;
    let mut mat: Vec<Vec<E>> = (0..n)
        .map(|i| (0..n).map(|j| a.get(&[i as isize, j as isize]).expect("in bounds")).collect())
        .collect();
    let mut v: Vec<Vec<E>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { E::one() } else { E::zero() }).collect())
        .collect();

    for _ in 0..MAX_SWEEPS {
        let mut off = 0.0f64;
        for p in 0..n {
            for q in (p + 1)..n {
                off += mat[p][q].modulus();
            }
        }
        if off <= f64::EPSILON {
            break;
        }
        for p in 0..n {
            for q in (p + 1)..n {
                let apq = mat[p][q];
                let r = apq.modulus();
                if r <= f64::EPSILON {
                    continue;
                }
                // Diagonal phase pre-rotation: scale row/col q by z = conj(apq)/r
                // (resp. its conjugate) so mat[p][q] becomes the real r.
                let z = apq.conj() * E::from_f64(1.0 / r);
                let z_conj = z.conj();
                for k in 0..n {
                    mat[k][q] = mat[k][q] * z;
                }
                for k in 0..n {
                    mat[q][k] = mat[q][k] * z_conj;
                }
                for k in 0..n {
                    v[k][q] = v[k][q] * z;
                }

                let pp = mat[p][p].real_part();
                let qq = mat[q][q].real_part();
                let theta = (qq - pp) / (2.0 * r);
                let t = if theta.abs() <= f64::EPSILON {
                    1.0
                } else {
                    theta.signum() / (theta.abs() + (1.0 + theta * theta).sqrt())
                };
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = c * t;
                rotate_symmetric(&mut mat, n, p, q, E::from_f64(c), E::from_f64(s));
                for k in 0..n {
                    let vp = v[k][p];
                    let vq = v[k][q];
                    v[k][p] = vp * E::from_f64(c) - vq * E::from_f64(s);
                    v[k][q] = vp * E::from_f64(s) + vq * E::from_f64(c);
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| mat[i][i].real_part().partial_cmp(&mat[j][j].real_part()).expect("eigenvalues are real"));

    let eigenvalues: Vec<f64> = order.iter().map(|&i| mat[i][i].real_part()).collect();
    let mut vec_data = vec![E::zero(); n * n];
    for (col, &src) in order.iter().enumerate() {
        for row in 0..n {
            vec_data[row * n + col] = v[row][src];
        }
    }
    Ok((eigenvalues, Tensor::from_buffer(vec![n, n], vec_data)?))
}

fn rotate_symmetric<E: Element + ComplexField>(mat: &mut [Vec<E>], n: usize, p: usize, q: usize, c: E, s: E) {
    for k in 0..n {
        let akp = mat[k][p];
        let akq = mat[k][q];
        mat[k][p] = akp * c - akq * s;
        mat[k][q] = akp * s + akq * c;
    }
    for k in 0..n {
        let apk = mat[p][k];
        let aqk = mat[q][k];
        mat[p][k] = apk * c - aqk * s;
        mat[q][k] = apk * s + aqk * c;
    }
}

/// Eigenvalues of a general real square matrix, via Hessenberg reduction
/// followed by a shifted QR iteration. Complex-conjugate pairs are
/// reconstructed from converged `2x2` diagonal blocks, per `spec.md` §4.5.
/// Eigenvectors are not recovered by this path; callers needing them for a
/// near-symmetric operator should prefer `eig_sym`.
pub fn eig<E: RealField + Into<f64>>(a: &Tensor<E>) -> LinalgResult<Vec<Complex64>> {
    let n = square_dim(a)?;
    let mut h = to_hessenberg(a, n);

    let mut eigenvalues = Vec::with_capacity(n);
    let mut size = n;
    let mut iters = 0;
    while size > 0 {
        if size == 1 {
            eigenvalues.push(Complex64::new(h[0][0].into(), 0.0));
            size = 0;
            break;
        }
        // Deflate a converged trailing 1x1 or 2x2 block.
        let last = size - 1;
        if h[last][last - 1].abs() <= E::epsilon() {
            eigenvalues.push(Complex64::new(h[last][last].into(), 0.0));
            size -= 1;
            continue;
        }
        if size == 2 || h[last - 1][last.saturating_sub(2).max(0)].abs() <= E::epsilon() {
            let (l1, l2) = eig_2x2(h[last - 1][last - 1], h[last - 1][last], h[last][last - 1], h[last][last]);
            eigenvalues.push(l1);
            eigenvalues.push(l2);
            size = size.saturating_sub(2);
            continue;
        }

        iters += 1;
        if iters > MAX_QR_ITERS {
            return Err(LinalgError::ConvergenceFailure { iterations: iters });
        }
        let shift = h[size - 1][size - 1];
        for i in 0..size {
            h[i][i] = h[i][i] - shift;
        }
        let (q, r) = qr_decompose(&h, size);
        h = matmul_blocks(&r, &q, size);
        for i in 0..size {
            h[i][i] = h[i][i] + shift;
        }
    }
    eigenvalues.reverse();
    Ok(eigenvalues)
}

fn eig_2x2<E: RealField + Into<f64>>(a: E, b: E, c: E, d: E) -> (Complex64, Complex64) {
    let tr: f64 = (a + d).into();
    let de: f64 = (a * d - b * c).into();
    let discriminant = tr * tr - 4.0 * de;
    if discriminant >= 0.0 {
        let sq = discriminant.sqrt();
        (
            Complex64::new((tr + sq) / 2.0, 0.0),
            Complex64::new((tr - sq) / 2.0, 0.0),
        )
    } else {
        let sq = (-discriminant).sqrt();
        (
            Complex64::new(tr / 2.0, sq / 2.0),
            Complex64::new(tr / 2.0, -sq / 2.0),
        )
    }
}

fn to_hessenberg<E: RealField>(a: &Tensor<E>, n: usize) -> Vec<Vec<E>> {
    let mut h: Vec<Vec<E>> = (0..n)
        .map(|i| (0..n).map(|j| a.get(&[i as isize, j as isize]).expect("in bounds")).collect())
        .collect();
    for k in 0..n.saturating_sub(2) {
        // Householder reflection zeroing column k below the subdiagonal.
        let mut norm = E::zero();
        for i in (k + 1)..n {
            norm = norm + h[i][k] * h[i][k];
        }
        let norm = norm.sqrt();
        if norm.abs() <= E::epsilon() {
            continue;
        }
        let sign = if h[k + 1][k] < E::zero() { -E::one() } else { E::one() };
        let mut v = vec![E::zero(); n];
        v[k + 1] = h[k + 1][k] + sign * norm;
        for i in (k + 2)..n {
            v[i] = h[i][k];
        }
        let vnorm = v.iter().fold(E::zero(), |acc, &x| acc + x * x).sqrt();
        if vnorm.abs() <= E::epsilon() {
            continue;
        }
        for x in v.iter_mut() {
            *x = *x / vnorm;
        }
        apply_householder_both_sides(&mut h, &v, n);
    }
    h
}

fn apply_householder_both_sides<E: RealField>(h: &mut [Vec<E>], v: &[E], n: usize) {
    // H <- (I - 2vv^T) H
    for col in 0..n {
        let mut dot = E::zero();
        for row in 0..n {
            dot = dot + v[row] * h[row][col];
        }
        let factor = dot + dot;
        for row in 0..n {
            h[row][col] = h[row][col] - factor * v[row];
        }
    }
    // H <- H (I - 2vv^T)
    for row in 0..n {
        let mut dot = E::zero();
        for col in 0..n {
            dot = dot + h[row][col] * v[col];
        }
        let factor = dot + dot;
        for col in 0..n {
            h[row][col] = h[row][col] - factor * v[col];
        }
    }
}

fn qr_decompose<E: RealField>(h: &[Vec<E>], size: usize) -> (Vec<Vec<E>>, Vec<Vec<E>>) {
    // Givens-rotation QR, since `h` is (at most) upper Hessenberg within
    // the active `size x size` block.
    let mut r: Vec<Vec<E>> = h[..size].iter().map(|row| row[..size].to_vec()).collect();
    let mut q: Vec<Vec<E>> = (0..size)
        .map(|i| (0..size).map(|j| if i == j { E::one() } else { E::zero() }).collect())
        .collect();
    for k in 0..size.saturating_sub(1) {
        let a = r[k][k];
        let b = r[k + 1][k];
        let norm = (a * a + b * b).sqrt();
        if norm.abs() <= E::epsilon() {
            continue;
        }
        let c = a / norm;
        let s = b / norm;
        for col in 0..size {
            let rk = r[k][col];
            let rk1 = r[k + 1][col];
            r[k][col] = c * rk + s * rk1;
            r[k + 1][col] = -s * rk + c * rk1;
        }
        for col in 0..size {
            let qk = q[col][k];
            let qk1 = q[col][k + 1];
            q[col][k] = c * qk + s * qk1;
            q[col][k + 1] = -s * qk + c * qk1;
        }
    }
    (q, r)
}

fn matmul_blocks<E: RealField>(r: &[Vec<E>], q: &[Vec<E>], size: usize) -> Vec<Vec<E>> {
    let mut out = vec![vec![E::zero(); size]; size];
    for i in 0..size {
        for j in 0..size {
            let mut acc = E::zero();
            for k in 0..size {
                acc = acc + r[i][k] * q[k][j];
            }
            out[i][j] = acc;
        }
    }
    out
}

fn square_dim<E: Element>(a: &Tensor<E>) -> LinalgResult<usize> {
    if a.rank() != 2 || a.shape()[0] != a.shape()[1] {
        return Err(LinalgError::DimensionMismatch {
            expected: (a.shape().first().copied().unwrap_or(0), a.shape().first().copied().unwrap_or(0)),
            found: (a.shape().first().copied().unwrap_or(0), a.shape().get(1).copied().unwrap_or(0)),
        });
    }
    Ok(a.shape()[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eig_sym_of_diagonal_matrix_returns_sorted_diagonal() {
        let a = Tensor::<f64>::from_buffer(vec![2, 2], vec![3.0, 0.0, 0.0, 1.0]).unwrap();
        let (vals, _) = eig_sym(&a).unwrap();
        assert_eq!(vals, vec![1.0, 3.0]);
    }

    #[test]
    fn eig_sym_of_complex_pauli_y_returns_plus_minus_one() {
        use qlattice_num::Complex64;
        // sigma_y = [[0, -i], [i, 0]] is Hermitian with eigenvalues +-1.
        let sy = Tensor::<Complex64>::from_buffer(
            vec![2, 2],
            vec![Complex64::new(0.0, 0.0), Complex64::new(0.0, -1.0), Complex64::new(0.0, 1.0), Complex64::new(0.0, 0.0)],
        )
        .unwrap();
        let (vals, _) = eig_sym(&sy).unwrap();
        assert!((vals[0] - -1.0).abs() < 1e-8);
        assert!((vals[1] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn eig_of_identity_returns_all_ones() {
        let id = Tensor::<f64>::eye(3);
        let vals = eig(&id).unwrap();
        for v in vals {
            assert!((v.re - 1.0).abs() < 1e-6);
            assert!(v.im.abs() < 1e-6);
        }
    }
}

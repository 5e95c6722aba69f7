/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Singular value decomposition via one-sided Jacobi rotations: robust at
//! the matrix sizes this engine actually runs at (MPS bond dimensions),
//! not BLAS-scale problems. Grounded on `spec.md` §4.5.
//!
//! Generic over `Element + ComplexField`: each column pair is rotated by a
//! phase-aligning diagonal unitary (`u = gamma / |gamma|`, `gamma` the
//! Hermitian inner product of the two columns) followed by the same real
//! `c`/`s` Givens pair the real case uses -- the phase alignment reduces the
//! complex off-diagonal to a real, non-negative scalar, and from there the
//! orthogonality condition is the identical quadratic in `t` as the real
//! Jacobi SVD. Singular values are always real and returned as `Vec<f64>`
//! regardless of `E`, matching the LAPACK `zgesvd` convention.

use qlattice_num::{ComplexField, Element};
use qlattice_tensor::Tensor;

use crate::error::{LinalgError, LinalgResult};

const MAX_SWEEPS: usize = 60;

/// `svd(a, econ)` returns `(U, singular_values, Vt)` with `A = U diag(S)
/// Vt`. `econ` is accepted for API symmetry with `spec.md` §4.5; this
/// kernel always returns the economy-size decomposition (`U` is `m x k`,
/// `Vt` is `k x n`, `k = min(m, n)`).
pub fn svd<E: Element + ComplexField>(a: &Tensor<E>, _econ: bool) -> LinalgResult<(Tensor<E>, Vec<f64>, Tensor<E>)> {
    if a.rank() != 2 {
        return Err(LinalgError::DimensionMismatch {
            expected: (0, 0),
            found: (a.len(), 1),
        });
    }
    let (m, n) = (a.shape()[0], a.shape()[1]);
    if m >= n {
        svd_tall(a, m, n)
    } else {
        // Conjugate-transpose, decompose the tall case, then swap U/V back:
        // if `B = A^H = U' S V'^H` then `A = V' S U'^H`.
        let at = conjugate_transpose(a, n, m);
        let (u, s, vt) = svd_tall(&at, n, m)?;
        Ok((conjugate_transpose(&vt, vt.shape()[0], vt.shape()[1]), s, conjugate_transpose(&u, u.shape()[0], u.shape()[1])))
    }
}

fn conjugate_transpose<E: Element>(a: &Tensor<E>, rows: usize, cols: usize) -> Tensor<E> {
    let mut data = vec![E::zero(); rows * cols];
    for i in 0..rows {
        for j in 0..cols {
            data[j * rows + i] = a.get(&[i as isize, j as isize]).expect("in bounds").conj();
        }
    }
    Tensor::from_buffer(vec![cols, rows], data).expect("matching size")
}

fn svd_tall<E: Element + ComplexField>(a: &Tensor<E>, m: usize, n: usize) -> LinalgResult<(Tensor<E>, Vec<f64>, Tensor<E>)> {
    let mut work: Vec<Vec<E>> = (0..n)
        .map(|j| (0..m).map(|i| a.get(&[i as isize, j as isize]).expect("in bounds")).collect())
        .collect();
    let mut v: Vec<Vec<E>> = (0..n)
        .map(|j| (0..n).map(|i| if i == j { E::one() } else { E::zero() }).collect())
        .collect();

    for _sweep in 0..MAX_SWEEPS {
        let mut off_diag = 0.0f64;
        for p in 0..n {
            for q in (p + 1)..n {
                let alpha = dot_real(&work[p], &work[p]);
                let beta = dot_real(&work[q], &work[q]);
                let gamma = hdot(&work[p], &work[q]);
                let rho = gamma.modulus();
                off_diag += rho;
                if rho <= f64::EPSILON * (alpha * beta).sqrt() {
                    continue;
                }
                let u = gamma * E::from_f64(1.0 / rho);

                let zeta = (beta - alpha) / (2.0 * rho);
                let t = zeta.signum() / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = c * t;
                let (ce, se) = (E::from_f64(c), E::from_f64(s));
                let u_conj = u.conj();

                for k in 0..m {
                    let wp = work[p][k];
                    let wq = work[q][k];
                    work[p][k] = ce * wp - se * u_conj * wq;
                    work[q][k] = se * u * wp + ce * wq;
                }
                for k in 0..n {
                    let vp = v[p][k];
                    let vq = v[q][k];
                    v[p][k] = ce * vp - se * u_conj * vq;
                    v[q][k] = se * u * vp + ce * vq;
                }
            }
        }
        if off_diag <= f64::EPSILON {
            break;
        }
    }

    let mut columns: Vec<(f64, Vec<E>, Vec<E>)> = (0..n)
        .map(|j| {
            let sigma = dot_real(&work[j], &work[j]).sqrt();
            (sigma, work[j].clone(), v[j].clone())
        })
        .collect();
    columns.sort_by(|a, b| b.0.partial_cmp(&a.0).expect("singular values are real"));

    let mut u_data = vec![E::zero(); m * n];
    let mut s = Vec::with_capacity(n);
    let mut vt_data = vec![E::zero(); n * n];
    for (j, (sigma, ucol, vcol)) in columns.into_iter().enumerate() {
        s.push(sigma);
        let inv = if sigma > f64::EPSILON { E::from_f64(1.0 / sigma) } else { E::zero() };
        for i in 0..m {
            u_data[i * n + j] = ucol[i] * inv;
        }
        for k in 0..n {
            // `Vt = V^H`: conjugate the accumulated rotation columns.
            vt_data[j * n + k] = vcol[k].conj();
        }
    }

    Ok((
        Tensor::from_buffer(vec![m, n], u_data)?,
        s,
        Tensor::from_buffer(vec![n, n], vt_data)?,
    ))
}

/// `Re(sum conj(a_i) * a_i)`, i.e. `||a||^2`, as a plain `f64`.
fn dot_real<E: Element + ComplexField>(a: &[E], b: &[E]) -> f64 {
    a.iter().zip(b.iter()).fold(0.0, |acc, (&x, &y)| acc + (x.conj() * y).real_part())
}

/// Hermitian inner product `sum conj(a_i) * b_i`, kept as `E` since its
/// phase (not just magnitude) is needed to align the rotation.
fn hdot<E: Element + ComplexField>(a: &[E], b: &[E]) -> E {
    a.iter().zip(b.iter()).fold(E::zero(), |acc, (&x, &y)| acc + x.conj() * y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlattice_num::Complex64;

    #[test]
    fn svd_of_identity_is_identity() {
        let id = Tensor::<f64>::eye(3);
        let (u, s, vt) = svd(&id, true).unwrap();
        assert_eq!(s, vec![1.0, 1.0, 1.0]);
        assert_eq!(u.shape(), &[3, 3]);
        assert_eq!(vt.shape(), &[3, 3]);
    }

    #[test]
    fn svd_of_diagonal_matrix_recovers_sorted_singular_values() {
        let a = Tensor::<f64>::from_buffer(vec![2, 2], vec![3.0, 0.0, 0.0, 1.0]).unwrap();
        let (_, s, _) = svd(&a, true).unwrap();
        assert!((s[0] - 3.0).abs() < 1e-8);
        assert!((s[1] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn svd_of_wide_matrix_matches_tall_transpose() {
        let a = Tensor::<f64>::from_buffer(vec![2, 3], vec![1.0, 0.0, 0.0, 0.0, 2.0, 0.0]).unwrap();
        let (u, s, vt) = svd(&a, true).unwrap();
        assert_eq!(u.shape(), &[2, 2]);
        assert_eq!(vt.shape(), &[2, 3]);
        assert!((s[0] - 2.0).abs() < 1e-8);
        assert!((s[1] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn svd_of_complex_diagonal_matrix_recovers_real_magnitudes() {
        // diag(2i, 1): singular values are the magnitudes, 2 and 1.
        let a = Tensor::<Complex64>::from_buffer(
            vec![2, 2],
            vec![Complex64::new(0.0, 2.0), Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
        )
        .unwrap();
        let (_, s, _) = svd(&a, true).unwrap();
        assert!((s[0] - 2.0).abs() < 1e-8);
        assert!((s[1] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn svd_reconstructs_complex_hermitian_matrix() {
        // sigma_y = [[0, -i], [i, 0]], singular values both 1.
        let sy = Tensor::<Complex64>::from_buffer(
            vec![2, 2],
            vec![Complex64::new(0.0, 0.0), Complex64::new(0.0, -1.0), Complex64::new(0.0, 1.0), Complex64::new(0.0, 0.0)],
        )
        .unwrap();
        let (_, s, _) = svd(&sy, true).unwrap();
        assert!((s[0] - 1.0).abs() < 1e-8);
        assert!((s[1] - 1.0).abs() < 1e-8);
    }
}

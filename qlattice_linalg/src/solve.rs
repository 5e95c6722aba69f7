/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Dense linear solve via Gaussian elimination with partial pivoting.
//! Grounded on `spec.md` §4.5 and
//! `examples/deepcausality-rs-deep_causality/deep_causality_tensor/tests/types/causal_tensor/op_tensor_svd_tests.rs`'s
//! `solve_least_squares_cholsky` precedent for hand-rolling dense kernels
//! rather than binding BLAS.

use qlattice_num::Element;
use qlattice_tensor::Tensor;

use crate::error::{LinalgError, LinalgResult};

/// Solve `A x = b` for a square `A` and a rank-1 or rank-2 (multiple
/// right-hand-side) `b`, via Gaussian elimination with partial pivoting on
/// `|entry|` (via `Element::modulus`, so this works for complex `A` too).
pub fn solve<E: Element>(a: &Tensor<E>, b: &Tensor<E>) -> LinalgResult<Tensor<E>> {
    if a.rank() != 2 || a.shape()[0] != a.shape()[1] {
        return Err(LinalgError::DimensionMismatch {
            expected: (a.shape().first().copied().unwrap_or(0), a.shape().first().copied().unwrap_or(0)),
            found: (a.shape().first().copied().unwrap_or(0), a.shape().get(1).copied().unwrap_or(0)),
        });
    }
    let n = a.shape()[0];
    let (rhs_cols, b_is_vector) = match b.rank() {
        1 => (1usize, true),
        2 => (b.shape()[1], false),
        _ => {
            return Err(LinalgError::DimensionMismatch {
                expected: (n, 1),
                found: (b.len(), 1),
            })
        }
    };
    if b.shape()[0] != n {
        return Err(LinalgError::DimensionMismatch {
            expected: (n, rhs_cols),
            found: (b.shape()[0], rhs_cols),
        });
    }

    let mut mat: Vec<Vec<E>> = (0..n)
        .map(|i| (0..n).map(|j| a.get(&[i as isize, j as isize]).expect("in bounds")).collect())
        .collect();
    let mut rhs: Vec<Vec<E>> = (0..n)
        .map(|i| {
            (0..rhs_cols)
                .map(|j| {
                    if b_is_vector {
                        b.get(&[i as isize]).expect("in bounds")
                    } else {
                        b.get(&[i as isize, j as isize]).expect("in bounds")
                    }
                })
                .collect()
        })
        .collect();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&r1, &r2| {
                mat[r1][col]
                    .modulus()
                    .partial_cmp(&mat[r2][col].modulus())
                    .expect("no NaNs in a solvable system")
            })
            .expect("non-empty range");
        if mat[pivot_row][col].modulus() <= f64::EPSILON {
            return Err(LinalgError::SingularMatrix);
        }
        mat.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        let pivot = mat[col][col];
        for k in col..n {
            mat[col][k] = mat[col][k] / pivot;
        }
        for k in 0..rhs_cols {
            rhs[col][k] = rhs[col][k] / pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = mat[row][col];
            if factor.is_zero() {
                continue;
            }
            for k in col..n {
                mat[row][k] = mat[row][k] - factor * mat[col][k];
            }
            for k in 0..rhs_cols {
                rhs[row][k] = rhs[row][k] - factor * rhs[col][k];
            }
        }
    }

    if b_is_vector {
        let data: Vec<E> = (0..n).map(|i| rhs[i][0]).collect();
        Ok(Tensor::from_buffer(vec![n], data)?)
    } else {
        let mut data = vec![E::zero(); n * rhs_cols];
        for i in 0..n {
            for j in 0..rhs_cols {
                data[i * rhs_cols + j] = rhs[i][j];
            }
        }
        Ok(Tensor::from_buffer(vec![n, rhs_cols], data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_identity_returns_rhs() {
        let a = Tensor::<f64>::eye(2);
        let b = Tensor::<f64>::from_buffer(vec![2], vec![3.0, 4.0]).unwrap();
        let x = solve(&a, &b).unwrap();
        assert_eq!(x.as_slice(), &[3.0, 4.0]);
    }

    #[test]
    fn solve_reports_singular_matrix() {
        let a = Tensor::<f64>::zeros(vec![2, 2]);
        let b = Tensor::<f64>::ones(vec![2]);
        assert!(matches!(solve(&a, &b), Err(LinalgError::SingularMatrix)));
    }

    #[test]
    fn solve_general_system_matches_hand_computation() {
        // 2x + y = 5, x + 3y = 10 -> x = 1, y = 3
        let a = Tensor::<f64>::from_buffer(vec![2, 2], vec![2.0, 1.0, 1.0, 3.0]).unwrap();
        let b = Tensor::<f64>::from_buffer(vec![2], vec![5.0, 10.0]).unwrap();
        let x = solve(&a, &b).unwrap();
        assert!((x.get(&[0]).unwrap() - 1.0).abs() < 1e-8);
        assert!((x.get(&[1]).unwrap() - 3.0).abs() < 1e-8);
    }
}

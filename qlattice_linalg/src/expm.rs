/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Matrix exponential via scale-and-square with a diagonal Padé
//! approximant, exactly as `spec.md` §4.5 describes: normalize by halving
//! until `||A||_inf / 2^j < 1/2`, evaluate the Padé numerator/denominator
//! via Horner, solve, then square `j` times.

use qlattice_num::Element;
use qlattice_tensor::ops::mmult;
use qlattice_tensor::Tensor;

use crate::error::LinalgResult;
use crate::solve::solve;

/// `expm(a, order)`: the matrix exponential of a square tensor, via a
/// diagonal Padé approximant of the given order.
pub fn expm<E: Element>(a: &Tensor<E>, order: usize) -> LinalgResult<Tensor<E>> {
    let n = a.shape()[0];
    let norm = inf_norm(a);
    let mut j = 0usize;
    let mut scale = 1.0f64;
    while norm * scale >= 0.5 {
        scale /= 2.0;
        j += 1;
    }
    let a_scaled = a.scale(E::from_f64(scale));

    let coeffs = pade_coefficients(order);
    let powers = matrix_powers(&a_scaled, order, n);

    let mut numerator = Tensor::<E>::zeros(vec![n, n]);
    let mut denominator = Tensor::<E>::zeros(vec![n, n]);
    for (k, &c) in coeffs.iter().enumerate() {
        let term = powers[k].scale(E::from_f64(c));
        numerator += &term;
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        let term_d = powers[k].scale(E::from_f64(c * sign));
        denominator += &term_d;
    }

    let mut result = solve(&denominator, &numerator)?;
    for _ in 0..j {
        result = mmult(&result, &result)?;
    }
    Ok(result)
}

fn matrix_powers<E: Element>(a: &Tensor<E>, order: usize, n: usize) -> Vec<Tensor<E>> {
    let mut powers = Vec::with_capacity(order + 1);
    powers.push(Tensor::<E>::eye(n));
    for k in 1..=order {
        let next = mmult(&powers[k - 1], a).expect("square matrices always fold");
        powers.push(next);
    }
    powers
}

/// Diagonal Padé coefficients: `c_0 = 1`, `c_k = c_{k-1} * (order - k + 1)
/// / (k * (2*order - k + 1))`.
fn pade_coefficients(order: usize) -> Vec<f64> {
    let mut c = vec![1.0f64; order + 1];
    for k in 1..=order {
        c[k] = c[k - 1] * (order - k + 1) as f64 / (k as f64 * (2 * order - k + 1) as f64);
    }
    c
}

fn inf_norm<E: Element>(a: &Tensor<E>) -> f64 {
    let n = a.shape()[0];
    let m = a.shape()[1];
    (0..n)
        .map(|i| {
            (0..m)
                .map(|j| a.get(&[i as isize, j as isize]).expect("in bounds").modulus())
                .sum::<f64>()
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expm_of_zero_matrix_is_identity() {
        let a = Tensor::<f64>::zeros(vec![2, 2]);
        let e = expm(&a, 6).unwrap();
        assert!((e.get(&[0, 0]).unwrap() - 1.0).abs() < 1e-8);
        assert!((e.get(&[0, 1]).unwrap()).abs() < 1e-8);
        assert!((e.get(&[1, 1]).unwrap() - 1.0).abs() < 1e-8);
    }

    #[test]
    fn expm_of_diagonal_matrix_matches_scalar_exponentials() {
        let a = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 0.0, 0.0, 2.0]).unwrap();
        let e = expm(&a, 8).unwrap();
        assert!((e.get(&[0, 0]).unwrap() - std::f64::consts::E).abs() < 1e-6);
        assert!((e.get(&[1, 1]).unwrap() - std::f64::consts::E.powi(2)).abs() < 1e-5);
    }
}

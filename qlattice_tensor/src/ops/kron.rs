/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Kronecker products: `kron` is the standard rank-2 Kronecker product;
//! `kron2` builds a two-site local operator `a (x) b` from two single-site
//! operators (the same computation, named separately because it is the
//! entry point Hamiltonian assembly uses); `kron2_sum` sums a list of such
//! two-site terms, the nearest-neighbour-interaction assembly primitive.

use qlattice_num::Element;

use crate::error::{TensorError, TensorResult};
use crate::tensor::Tensor;

/// Standard Kronecker product of two rank-2 tensors: `a` is `(m, n)`, `b`
/// is `(p, q)`, the result is `(m*p, n*q)` with block `(i, j)` equal to
/// `a[i, j] * b`.
pub fn kron<E: Element>(a: &Tensor<E>, b: &Tensor<E>) -> TensorResult<Tensor<E>> {
    if a.rank() != 2 || b.rank() != 2 {
        return Err(TensorError::DimensionsMismatch {
            lhs: a.shape().to_vec(),
            rhs: b.shape().to_vec(),
            axes: None,
        });
    }
    let (m, n) = (a.shape()[0], a.shape()[1]);
    let (p, q) = (b.shape()[0], b.shape()[1]);
    let mut data = vec![E::zero(); m * p * n * q];
    for i in 0..m {
        for j in 0..n {
            let av = a.get(&[i as isize, j as isize])?;
            for k in 0..p {
                for l in 0..q {
                    let bv = b.get(&[k as isize, l as isize])?;
                    let row = i * p + k;
                    let col = j * q + l;
                    data[row * (n * q) + col] = av * bv;
                }
            }
        }
    }
    Tensor::from_buffer(vec![m * p, n * q], data)
}

/// Two-site local operator `a (x) b`, the building block of nearest
/// neighbour Hamiltonian terms.
pub fn kron2<E: Element>(a: &Tensor<E>, b: &Tensor<E>) -> TensorResult<Tensor<E>> {
    kron(a, b)
}

/// Sum of `kron2(a_k, b_k)` over a list of two-site terms; all terms must
/// produce the same shape.
pub fn kron2_sum<E: Element>(terms: &[(Tensor<E>, Tensor<E>)]) -> TensorResult<Tensor<E>> {
    let mut iter = terms.iter();
    let (a0, b0) = iter.next().ok_or(TensorError::RaggedShape)?;
    let mut acc = kron2(a0, b0)?;
    for (a, b) in iter {
        let term = kron2(a, b)?;
        acc += &term;
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kron_of_identities_is_identity() {
        let i2 = Tensor::<f64>::eye(2);
        let i3 = Tensor::<f64>::eye(3);
        let k = kron(&i2, &i3).unwrap();
        assert_eq!(k.shape(), &[6, 6]);
        for i in 0..6 {
            for j in 0..6 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert_eq!(k.get(&[i as isize, j as isize]).unwrap(), expect);
            }
        }
    }

    #[test]
    fn kron2_sum_adds_matching_shape_terms() {
        let sx = Tensor::<f64>::from_buffer(vec![2, 2], vec![0.0, 1.0, 1.0, 0.0]).unwrap();
        let id = Tensor::<f64>::eye(2);
        let terms = vec![(sx.clone(), id.clone()), (id.clone(), sx.clone())];
        let h = kron2_sum(&terms).unwrap();
        assert_eq!(h.shape(), &[4, 4]);
    }
}

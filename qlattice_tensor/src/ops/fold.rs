/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Contraction: `fold` generalizes matrix multiplication to an arbitrary
//! pair of axes on two tensors; `mmult` is the rank-2 specialization;
//! `foldc` conjugates the left operand first (inner-product style
//! contractions); `foldin` accumulates a scaled fold result into an
//! existing tensor in place. Grounded on `spec.md` §4.3 and
//! `examples/deepcausality-rs-deep_causality/deep_causality_tensor/tests/types/causal_tensor/op_tensor_ein_sum_tests.rs`
//! (matmul / dot / trace / tensor-product all reduce to this one
//! contraction primitive).

use qlattice_num::Element;

use crate::error::{TensorError, TensorResult};
use crate::shape::normalize;
use crate::tensor::Tensor;

use super::{flat_index, multi_index, without_axis};

/// Contract axis `i` of `a` with axis `j` of `b`: `sum_k a[..,k,..] *
/// b[..,k,..]`. The 0-length axis case (either tensor has a zero-sized
/// contracted axis) yields a zero tensor of the combined shape, per
/// `spec.md`'s zero-length-axis policy.
pub fn fold<E: Element>(a: &Tensor<E>, i: isize, b: &Tensor<E>, j: isize) -> TensorResult<Tensor<E>> {
    let ai = normalize(i, a.rank())?;
    let bj = normalize(j, b.rank())?;
    let d = a.shape()[ai];
    if d != b.shape()[bj] {
        return Err(TensorError::DimensionsMismatch {
            lhs: a.shape().to_vec(),
            rhs: b.shape().to_vec(),
            axes: Some((ai, bj)),
        });
    }

    let a_rest = without_axis(a.shape(), ai);
    let b_rest = without_axis(b.shape(), bj);
    let mut out_shape = a_rest.clone();
    out_shape.extend(b_rest.clone());

    let n_a_rest: usize = a_rest.iter().product();
    let n_b_rest: usize = b_rest.iter().product();
    let a_strides = a.dims().strides();
    let b_strides = b.dims().strides();

    let mut data = vec![E::zero(); n_a_rest * n_b_rest];
    if d == 0 {
        return Tensor::from_buffer(out_shape, data);
    }

    for ia_flat in 0..n_a_rest {
        let ia_rest = multi_index(ia_flat, &a_rest);
        for ib_flat in 0..n_b_rest {
            let ib_rest = multi_index(ib_flat, &b_rest);
            let mut acc = E::zero();
            for k in 0..d {
                let mut a_idx = ia_rest.clone();
                a_idx.insert(ai, k);
                let mut b_idx = ib_rest.clone();
                b_idx.insert(bj, k);
                let av = a.as_slice()[flat_index(&a_idx, &a_strides)];
                let bv = b.as_slice()[flat_index(&b_idx, &b_strides)];
                acc = acc + av * bv;
            }
            data[ia_flat * n_b_rest + ib_flat] = acc;
        }
    }
    Tensor::from_buffer(out_shape, data)
}

/// `fold`, conjugating `a` first; the contraction used by inner products
/// and one-/two-site expectation values.
pub fn foldc<E: Element>(a: &Tensor<E>, i: isize, b: &Tensor<E>, j: isize) -> TensorResult<Tensor<E>> {
    fold(&a.conj(), i, b, j)
}

/// `output += factor * fold(a, i, b, j)`, the in-place accumulation used by
/// Hamiltonian-term assembly and DMRG effective-operator updates.
pub fn foldin<E: Element>(
    a: &Tensor<E>,
    i: isize,
    b: &Tensor<E>,
    j: isize,
    output: &mut Tensor<E>,
    factor: E,
) -> TensorResult<()> {
    let folded = fold(a, i, b, j)?;
    if output.shape() != folded.shape() {
        return Err(TensorError::DimensionsMismatch {
            lhs: output.shape().to_vec(),
            rhs: folded.shape().to_vec(),
            axes: None,
        });
    }
    let scaled = folded.scale(factor);
    *output += &scaled;
    Ok(())
}

/// Standard matrix multiplication: `fold(a, -1, b, 0)` restricted to rank-2
/// operands.
pub fn mmult<E: Element>(a: &Tensor<E>, b: &Tensor<E>) -> TensorResult<Tensor<E>> {
    if a.rank() != 2 || b.rank() != 2 {
        return Err(TensorError::DimensionsMismatch {
            lhs: a.shape().to_vec(),
            rhs: b.shape().to_vec(),
            axes: None,
        });
    }
    fold(a, -1, b, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmult_matches_hand_computed_product() {
        let a = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Tensor::<f64>::from_buffer(vec![2, 2], vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = mmult(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn fold_rejects_mismatched_contracted_axis() {
        let a = Tensor::<f64>::zeros(vec![2, 3]);
        let b = Tensor::<f64>::zeros(vec![4, 5]);
        assert!(fold(&a, 1, &b, 0).is_err());
    }

    #[test]
    fn fold_with_zero_length_axis_yields_zero_tensor() {
        let a = Tensor::<f64>::zeros(vec![2, 0]);
        let b = Tensor::<f64>::zeros(vec![0, 3]);
        let c = fold(&a, 1, &b, 0).unwrap();
        assert_eq!(c.shape(), &[2, 3]);
        assert!(c.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn foldin_accumulates_scaled_result() {
        let a = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        let b = a.clone();
        let mut out = Tensor::<f64>::ones(vec![2, 2]);
        foldin(&a, -1, &b, 0, &mut out, 2.0).unwrap();
        assert_eq!(out.as_slice(), &[3.0, 1.0, 1.0, 3.0]);
    }
}

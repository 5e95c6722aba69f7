/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

use qlattice_tensor::ops::{fold, kron, mmult, permute_12, sum};
use qlattice_tensor::Tensor;

#[test]
fn matmul_then_trace_matches_hand_computation() {
    let a = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    let b = Tensor::<f64>::eye(2);
    let c = mmult(&a, &b).unwrap();
    assert_eq!(c.as_slice(), a.as_slice());
}

#[test]
fn permute_then_reshape_preserves_elements() {
    let t = Tensor::<f64>::from_fn(vec![2, 3], |idx| (idx[0] * 3 + idx[1]) as f64);
    let p = permute_12(&t).unwrap();
    let back = permute_12(&p).unwrap();
    assert_eq!(back.as_slice(), t.as_slice());
}

#[test]
fn contracting_with_identity_vector_is_sum_projection() {
    let a = Tensor::<f64>::from_buffer(vec![3, 2], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let ones = Tensor::<f64>::ones(vec![3]);
    let reduced = fold(&ones, 0, &a, 0).unwrap();
    let expected = sum(&permute_12(&a).unwrap(), 1).unwrap();
    assert_eq!(reduced.as_slice(), expected.as_slice());
}

#[test]
fn kron_of_pauli_x_with_identity_is_block_antidiagonal() {
    let sx = Tensor::<f64>::from_buffer(vec![2, 2], vec![0.0, 1.0, 1.0, 0.0]).unwrap();
    let id = Tensor::<f64>::eye(2);
    let op = kron(&sx, &id).unwrap();
    assert_eq!(op.shape(), &[4, 4]);
    assert_eq!(op.get(&[0, 2]).unwrap(), 1.0);
    assert_eq!(op.get(&[0, 0]).unwrap(), 0.0);
}

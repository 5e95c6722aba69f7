/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Axis permutation. `permute` is the general, any-rank, any-axis-pair
//! swap; `permute_12`/`permute_23`/`permute_24`/`permute_13` are the named
//! adjacent-leg swaps `spec.md` §4.3 calls out, used in the hot paths of
//! `fold`/`mmult` and the MPS canonicalization sweeps where the swapped
//! axes are always two specific legs of a rank-4 tensor.

use qlattice_num::Element;

use crate::error::TensorResult;
use crate::shape::{normalize, Dimensions};
use crate::tensor::Tensor;

use super::{flat_index, multi_index};

/// Swap axes `i` and `j` (wraparound-indexed) of `t`, in any order, for any
/// rank.
pub fn permute<E: Element>(t: &Tensor<E>, i: isize, j: isize) -> TensorResult<Tensor<E>> {
    let r = t.rank();
    let a = normalize(i, r)?;
    let b = normalize(j, r)?;
    if a == b {
        return Ok(t.clone());
    }
    let mut new_shape = t.shape().to_vec();
    new_shape.swap(a, b);
    let dst_strides = Dimensions::new(new_shape.clone()).strides();
    let n = t.len();
    let mut data = vec![E::zero(); n];
    for flat in 0..n {
        let mut dst_idx = multi_index(flat, t.shape());
        dst_idx.swap(a, b);
        data[flat_index(&dst_idx, &dst_strides)] = t.as_slice()[flat];
    }
    Tensor::from_buffer(new_shape, data)
}

/// Swap axes 0 and 1 (rank >= 2).
pub fn permute_12<E: Element>(t: &Tensor<E>) -> TensorResult<Tensor<E>> {
    permute(t, 0, 1)
}

/// Swap axes 1 and 2 (rank >= 3).
pub fn permute_23<E: Element>(t: &Tensor<E>) -> TensorResult<Tensor<E>> {
    permute(t, 1, 2)
}

/// Swap axes 1 and 3 (rank >= 4); the MPO "swap the two bond legs while
/// keeping the physical legs fixed" shuffle.
pub fn permute_24<E: Element>(t: &Tensor<E>) -> TensorResult<Tensor<E>> {
    permute(t, 1, 3)
}

/// Swap axes 0 and 2 (rank >= 3).
pub fn permute_13<E: Element>(t: &Tensor<E>) -> TensorResult<Tensor<E>> {
    permute(t, 0, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permute_12_transposes_matrix() {
        let t = Tensor::<f64>::from_fn(vec![2, 3], |idx| (idx[0] * 3 + idx[1]) as f64);
        let p = permute_12(&t).unwrap();
        assert_eq!(p.shape(), &[3, 2]);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(
                    p.get(&[j as isize, i as isize]).unwrap(),
                    t.get(&[i as isize, j as isize]).unwrap()
                );
            }
        }
    }

    #[test]
    fn permute_same_axis_is_identity() {
        let t = Tensor::<f64>::ones(vec![2, 2]);
        let p = permute(&t, 0, 0).unwrap();
        assert_eq!(p.as_slice(), t.as_slice());
    }

    #[test]
    fn permute_23_swaps_middle_axes_of_rank3() {
        let t = Tensor::<f64>::from_fn(vec![2, 3, 4], |idx| {
            (idx[0] * 12 + idx[1] * 4 + idx[2]) as f64
        });
        let p = permute_23(&t).unwrap();
        assert_eq!(p.shape(), &[2, 4, 3]);
        assert_eq!(
            p.get(&[1, 2, 0]).unwrap(),
            t.get(&[1, 0, 2]).unwrap()
        );
    }
}

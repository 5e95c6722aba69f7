/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! `trace`/`partial_trace` (sum over a matched axis pair) and
//! `to_diag`/`take_diag` (vector <-> diagonal-matrix conversion).

use qlattice_num::Element;

use crate::error::{TensorError, TensorResult};
use crate::shape::normalize;
use crate::tensor::Tensor;

use super::{flat_index, multi_index};

/// Sum of the diagonal of a square rank-2 tensor.
pub fn trace<E: Element>(t: &Tensor<E>) -> TensorResult<E> {
    if t.rank() != 2 || t.shape()[0] != t.shape()[1] {
        return Err(TensorError::DimensionsMismatch {
            lhs: t.shape().to_vec(),
            rhs: t.shape().to_vec(),
            axes: None,
        });
    }
    let n = t.shape()[0];
    let mut acc = E::zero();
    for i in 0..n {
        acc = acc + t.get(&[i as isize, i as isize])?;
    }
    Ok(acc)
}

/// Contract (sum over the diagonal of) axes `i` and `j` of the same
/// tensor, which must share a dimension; removes both axes from the shape.
pub fn partial_trace<E: Element>(t: &Tensor<E>, i: isize, j: isize) -> TensorResult<Tensor<E>> {
    let r = t.rank();
    let mut a = normalize(i, r)?;
    let mut b = normalize(j, r)?;
    if a == b {
        return Err(TensorError::DimensionsMismatch {
            lhs: t.shape().to_vec(),
            rhs: t.shape().to_vec(),
            axes: Some((a, b)),
        });
    }
    if t.shape()[a] != t.shape()[b] {
        return Err(TensorError::DimensionsMismatch {
            lhs: t.shape().to_vec(),
            rhs: t.shape().to_vec(),
            axes: Some((a, b)),
        });
    }
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    let d = t.shape()[a];
    let rest_shape: Vec<usize> = t
        .shape()
        .iter()
        .enumerate()
        .filter(|(k, _)| *k != a && *k != b)
        .map(|(_, &v)| v)
        .collect();
    let n_rest: usize = rest_shape.iter().product();
    let strides = t.dims().strides();

    let mut data = vec![E::zero(); n_rest];
    for flat in 0..n_rest {
        let rest_idx = multi_index(flat, &rest_shape);
        let mut acc = E::zero();
        for k in 0..d {
            let mut full_idx = Vec::with_capacity(r);
            let mut cursor = 0usize;
            for axis in 0..r {
                if axis == a || axis == b {
                    full_idx.push(k);
                } else {
                    full_idx.push(rest_idx[cursor]);
                    cursor += 1;
                }
            }
            acc = acc + t.as_slice()[flat_index(&full_idx, &strides)];
        }
        data[flat] = acc;
    }
    Tensor::from_buffer(rest_shape, data)
}

/// Build a square diagonal matrix from a rank-1 tensor.
pub fn to_diag<E: Element>(v: &Tensor<E>) -> TensorResult<Tensor<E>> {
    if v.rank() != 1 {
        return Err(TensorError::DimensionsMismatch {
            lhs: v.shape().to_vec(),
            rhs: vec![],
            axes: None,
        });
    }
    let n = v.shape()[0];
    let mut data = vec![E::zero(); n * n];
    for i in 0..n {
        data[i * n + i] = v.as_slice()[i];
    }
    Tensor::from_buffer(vec![n, n], data)
}

/// Extract the diagonal of a square rank-2 tensor as a rank-1 tensor.
pub fn take_diag<E: Element>(m: &Tensor<E>) -> TensorResult<Tensor<E>> {
    if m.rank() != 2 || m.shape()[0] != m.shape()[1] {
        return Err(TensorError::DimensionsMismatch {
            lhs: m.shape().to_vec(),
            rhs: m.shape().to_vec(),
            axes: None,
        });
    }
    let n = m.shape()[0];
    let data: Vec<E> = (0..n)
        .map(|i| m.get(&[i as isize, i as isize]).expect("in bounds"))
        .collect();
    Tensor::from_buffer(vec![n], data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_sums_diagonal() {
        let t = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(trace(&t).unwrap(), 5.0);
    }

    #[test]
    fn to_diag_and_take_diag_round_trip() {
        let v = Tensor::<f64>::from_buffer(vec![3], vec![1.0, 2.0, 3.0]).unwrap();
        let m = to_diag(&v).unwrap();
        let back = take_diag(&m).unwrap();
        assert_eq!(back.as_slice(), v.as_slice());
    }

    #[test]
    fn partial_trace_removes_matched_axes() {
        // rank-4 tensor (d, a, a, d) traced over the two middle axes.
        let t = Tensor::<f64>::from_fn(vec![2, 3, 3, 2], |idx| {
            if idx[1] == idx[2] {
                (idx[0] * 2 + idx[3]) as f64
            } else {
                0.0
            }
        });
        let reduced = partial_trace(&t, 1, 2).unwrap();
        assert_eq!(reduced.shape(), &[2, 2]);
        // each surviving entry is summed 3 times (once per diagonal index).
        assert_eq!(reduced.get(&[0, 0]).unwrap(), 0.0);
        assert_eq!(reduced.get(&[1, 1]).unwrap(), 9.0);
    }
}

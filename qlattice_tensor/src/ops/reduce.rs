/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Axis reductions (`sum`/`mean`/`max`/`min`), `change_dimension`
//! (truncate/pad one axis) and `sort`/`sort_indices`.

use qlattice_num::{Element, RealField};

use crate::error::{TensorError, TensorResult};
use crate::shape::normalize;
use crate::tensor::Tensor;

use super::{flat_index, multi_index, without_axis};

/// Which axis reduction to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Mean,
    Max,
    Min,
}

/// A normalized axis index, used by the reduction/sort entry points.
pub type Axis = usize;

fn reduce_axis<E: RealField>(t: &Tensor<E>, axis: isize, kind: Reduction) -> TensorResult<Tensor<E>> {
    let ax = normalize(axis, t.rank())?;
    let d = t.shape()[ax];
    let rest_shape = without_axis(t.shape(), ax);
    let n_rest: usize = rest_shape.iter().product();
    let strides = t.dims().strides();

    let mut data = vec![E::zero(); n_rest];
    for flat in 0..n_rest {
        let rest_idx = multi_index(flat, &rest_shape);
        let mut values = Vec::with_capacity(d);
        for k in 0..d {
            let mut full_idx = rest_idx.clone();
            full_idx.insert(ax, k);
            values.push(t.as_slice()[flat_index(&full_idx, &strides)]);
        }
        data[flat] = match kind {
            Reduction::Sum => values.iter().fold(E::zero(), |acc, &v| acc + v),
            Reduction::Mean => {
                let sum = values.iter().fold(E::zero(), |acc, &v| acc + v);
                sum / E::from_f64(d as f64)
            }
            Reduction::Max => {
                let mut acc = values[0];
                for &v in &values[1..] {
                    if v > acc {
                        acc = v;
                    }
                }
                acc
            }
            Reduction::Min => {
                let mut acc = values[0];
                for &v in &values[1..] {
                    if v < acc {
                        acc = v;
                    }
                }
                acc
            }
        };
    }
    Tensor::from_buffer(rest_shape, data)
}

pub fn sum<E: RealField>(t: &Tensor<E>, axis: isize) -> TensorResult<Tensor<E>> {
    reduce_axis(t, axis, Reduction::Sum)
}
pub fn mean<E: RealField>(t: &Tensor<E>, axis: isize) -> TensorResult<Tensor<E>> {
    reduce_axis(t, axis, Reduction::Mean)
}
pub fn max<E: RealField>(t: &Tensor<E>, axis: isize) -> TensorResult<Tensor<E>> {
    reduce_axis(t, axis, Reduction::Max)
}
pub fn min<E: RealField>(t: &Tensor<E>, axis: isize) -> TensorResult<Tensor<E>> {
    reduce_axis(t, axis, Reduction::Min)
}

/// Truncate (if `new_size < old`) or zero-pad (if larger) axis `axis` to
/// `new_size`.
pub fn change_dimension<E: Element>(
    t: &Tensor<E>,
    axis: isize,
    new_size: usize,
) -> TensorResult<Tensor<E>> {
    let ax = normalize(axis, t.rank())?;
    let old_size = t.shape()[ax];
    let mut new_shape = t.shape().to_vec();
    new_shape[ax] = new_size;
    let new_strides = crate::shape::Dimensions::new(new_shape.clone()).strides();
    let keep = old_size.min(new_size);
    let rest_shape = without_axis(t.shape(), ax);
    let n_rest: usize = rest_shape.iter().product();
    let old_strides = t.dims().strides();

    let total: usize = new_shape.iter().product();
    let mut data = vec![E::zero(); total];
    for flat in 0..n_rest {
        let rest_idx = multi_index(flat, &rest_shape);
        for k in 0..keep {
            let mut src_idx = rest_idx.clone();
            src_idx.insert(ax, k);
            let mut dst_idx = rest_idx.clone();
            dst_idx.insert(ax, k);
            data[flat_index(&dst_idx, &new_strides)] = t.as_slice()[flat_index(&src_idx, &old_strides)];
        }
    }
    Tensor::from_buffer(new_shape, data)
}

/// Sort a rank-1 tensor, ascending, returning the sorted values.
pub fn sort<E: RealField>(t: &Tensor<E>) -> TensorResult<Tensor<E>> {
    if t.rank() != 1 {
        return Err(TensorError::DimensionsMismatch {
            lhs: t.shape().to_vec(),
            rhs: vec![],
            axes: None,
        });
    }
    let mut values = t.as_slice().to_vec();
    values.sort_by(|a, b| a.partial_cmp(b).expect("no NaNs in a sortable tensor"));
    Tensor::from_buffer(t.dims().clone(), values)
}

/// Indices that would sort a rank-1 tensor ascending, the `argsort`
/// counterpart of `sort`; used to permute Schmidt spectra alongside the
/// basis vectors they index.
pub fn sort_indices<E: RealField>(t: &Tensor<E>) -> TensorResult<Vec<usize>> {
    if t.rank() != 1 {
        return Err(TensorError::DimensionsMismatch {
            lhs: t.shape().to_vec(),
            rhs: vec![],
            axes: None,
        });
    }
    let mut idx: Vec<usize> = (0..t.len()).collect();
    let values = t.as_slice();
    idx.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .expect("no NaNs in a sortable tensor")
    });
    Ok(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_over_axis_matches_hand_computation() {
        let t = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let s = sum(&t, 1).unwrap();
        assert_eq!(s.as_slice(), &[3.0, 7.0]);
    }

    #[test]
    fn mean_divides_by_axis_length() {
        let t = Tensor::<f64>::from_buffer(vec![2, 2], vec![1.0, 3.0, 2.0, 6.0]).unwrap();
        let m = mean(&t, 1).unwrap();
        assert_eq!(m.as_slice(), &[2.0, 4.0]);
    }

    #[test]
    fn max_and_min_over_axis() {
        let t = Tensor::<f64>::from_buffer(vec![2, 3], vec![1.0, 5.0, 2.0, 9.0, 0.0, 3.0]).unwrap();
        assert_eq!(max(&t, 1).unwrap().as_slice(), &[5.0, 9.0]);
        assert_eq!(min(&t, 1).unwrap().as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn change_dimension_truncates_and_pads() {
        let t = Tensor::<f64>::from_buffer(vec![4], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let truncated = change_dimension(&t, 0, 2).unwrap();
        assert_eq!(truncated.as_slice(), &[1.0, 2.0]);
        let padded = change_dimension(&t, 0, 6).unwrap();
        assert_eq!(padded.as_slice(), &[1.0, 2.0, 3.0, 4.0, 0.0, 0.0]);
    }

    #[test]
    fn sort_and_sort_indices_agree() {
        let t = Tensor::<f64>::from_buffer(vec![3], vec![3.0, 1.0, 2.0]).unwrap();
        let sorted = sort(&t).unwrap();
        assert_eq!(sorted.as_slice(), &[1.0, 2.0, 3.0]);
        let idx = sort_indices(&t).unwrap();
        assert_eq!(idx, vec![1, 2, 0]);
    }
}

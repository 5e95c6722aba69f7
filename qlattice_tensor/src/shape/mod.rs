/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! C1: shape & range algebra. Grounded on
//! `examples/original_source/include/tensor/indices.h` (`Indices`,
//! wraparound normalization) and `spec.md` §3/§4.1.

use crate::error::{TensorError, TensorResult};

/// Ordered sequence of non-negative axis sizes. Rank is the length; total
/// size is the product (the empty shape denotes a scalar container).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dimensions(Vec<usize>);

/// A signed index vector, used where wraparound (`-1` = last element) is
/// meaningful: range bounds, permutation axes given by the caller, etc.
pub type Indices = Vec<isize>;

/// Elementwise boolean results from tensor comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booleans(pub Vec<bool>);

impl Booleans {
    pub fn all(&self) -> bool {
        self.0.iter().all(|b| *b)
    }
    pub fn any(&self) -> bool {
        self.0.iter().any(|b| *b)
    }
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl Dimensions {
    pub fn new(dims: Vec<usize>) -> Self {
        Dimensions(dims)
    }

    pub fn scalar() -> Self {
        Dimensions(Vec::new())
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Total number of elements a buffer with this shape must hold.
    /// The empty shape (rank 0, a scalar) has size 1; any zero-sized axis
    /// collapses the whole product to 0.
    pub fn total_size(&self) -> usize {
        self.0.iter().product()
    }

    pub fn dim(&self, axis: isize) -> TensorResult<usize> {
        let k = normalize(axis, self.rank())?;
        Ok(self.0[k])
    }

    /// Row-major strides: `stride[k] = product(dims[k+1..])`.
    pub fn strides(&self) -> Vec<usize> {
        let r = self.rank();
        let mut strides = vec![1usize; r];
        let mut acc = 1usize;
        for k in (0..r).rev() {
            strides[k] = acc;
            acc *= self.0[k];
        }
        strides
    }

    /// Decompose the shape around axis `k` into `(left, axis, right)` sizes
    /// with `left = prod(dims[..k])`, `right = prod(dims[k+1..])`, per
    /// `spec.md` §4.1's `surround` contract.
    pub fn surround(&self, k: usize) -> (usize, usize, usize) {
        surround(&self.0, k)
    }

    pub fn push(&mut self, d: usize) {
        self.0.push(d);
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

impl From<Vec<usize>> for Dimensions {
    fn from(v: Vec<usize>) -> Self {
        Dimensions(v)
    }
}

impl From<&[usize]> for Dimensions {
    fn from(v: &[usize]) -> Self {
        Dimensions(v.to_vec())
    }
}

/// Wraparound normalization: `i >= 0 -> i`, `i < 0 -> i + n`; fails with
/// `OutOfBoundsIndex` if the result is not in `[0, n-1]`.
pub fn normalize(i: isize, n: usize) -> TensorResult<usize> {
    let resolved = if i >= 0 { i } else { i + n as isize };
    if resolved < 0 || resolved as usize >= n {
        return Err(TensorError::OutOfBoundsIndex { index: i, bound: n });
    }
    Ok(resolved as usize)
}

/// `surround(dims, k) -> (L, d_k, R)` with `L = prod(dims[..k])`,
/// `R = prod(dims[k+1..])`.
pub fn surround(dims: &[usize], k: usize) -> (usize, usize, usize) {
    let left: usize = dims[..k].iter().product();
    let axis = dims[k];
    let right: usize = dims[k + 1..].iter().product();
    (left, axis, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_negative_indices() {
        assert_eq!(normalize(-1, 3).unwrap(), 2);
        assert_eq!(normalize(0, 3).unwrap(), 0);
        assert_eq!(normalize(2, 3).unwrap(), 2);
    }

    #[test]
    fn normalize_out_of_range_fails() {
        assert!(normalize(3, 3).is_err());
        assert!(normalize(-4, 3).is_err());
    }

    #[test]
    fn surround_decomposes_shape() {
        let dims = vec![2, 3, 4];
        assert_eq!(surround(&dims, 0), (1, 2, 12));
        assert_eq!(surround(&dims, 1), (2, 3, 4));
        assert_eq!(surround(&dims, 2), (6, 4, 1));
    }

    #[test]
    fn total_size_and_strides() {
        let dims = Dimensions::new(vec![2, 3, 4]);
        assert_eq!(dims.total_size(), 24);
        assert_eq!(dims.strides(), vec![12, 4, 1]);
    }

    #[test]
    fn scalar_shape_has_size_one() {
        let dims = Dimensions::scalar();
        assert_eq!(dims.rank(), 0);
        assert_eq!(dims.total_size(), 1);
    }

    #[test]
    fn zero_axis_collapses_total_size() {
        let dims = Dimensions::new(vec![5, 0, 2]);
        assert_eq!(dims.total_size(), 0);
    }
}

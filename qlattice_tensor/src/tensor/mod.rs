/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! C2: the dense, copy-on-write, row-major tensor container.
//!
//! Grounded on `spec.md` §3/§4.2/§9 and the reference-counted buffer sketch
//! in `examples/original_source/include/tensor/detail/refcount.hpp`. Rust's
//! `Arc` plus a clone-on-write `unshare` plays the role of the original's
//! hand-rolled refcounted pointer; the teacher's own crates use the same
//! "shared, mutate-through-unshare" shape for their ring-buffer sequences.

pub mod arithmetic;
pub mod view;

use std::sync::Arc;

use qlattice_num::Element;
use rand::Rng;

use crate::error::{TensorError, TensorResult};
use crate::shape::{normalize, Dimensions};

pub use view::{TensorView, TensorViewMut};

/// A dense, row-major, copy-on-write tensor of element type `E`.
#[derive(Debug, Clone)]
pub struct Tensor<E: Element> {
    dims: Dimensions,
    buffer: Arc<Vec<E>>,
}

impl<E: Element> Tensor<E> {
    /// Build a tensor from a shape and an already-flattened row-major buffer.
    pub fn from_buffer(dims: impl Into<Dimensions>, buffer: Vec<E>) -> TensorResult<Self> {
        let dims = dims.into();
        if dims.total_size() != buffer.len() {
            return Err(TensorError::ReshapeSizeMismatch {
                from: buffer.len(),
                to: dims.total_size(),
            });
        }
        Ok(Tensor {
            dims,
            buffer: Arc::new(buffer),
        })
    }

    pub fn zeros(dims: impl Into<Dimensions>) -> Self {
        let dims = dims.into();
        let n = dims.total_size();
        Tensor {
            buffer: Arc::new(vec![E::zero(); n]),
            dims,
        }
    }

    pub fn ones(dims: impl Into<Dimensions>) -> Self {
        let dims = dims.into();
        let n = dims.total_size();
        Tensor {
            buffer: Arc::new(vec![E::one(); n]),
            dims,
        }
    }

    /// A rank-2 identity matrix, or its generalization to any even rank as
    /// a block-diagonal Kronecker identity when `dims` pairs `(n, n)`.
    pub fn eye(n: usize) -> Self {
        let mut buffer = vec![E::zero(); n * n];
        for i in 0..n {
            buffer[i * n + i] = E::one();
        }
        Tensor {
            dims: Dimensions::new(vec![n, n]),
            buffer: Arc::new(buffer),
        }
    }

    pub fn from_fn(dims: impl Into<Dimensions>, mut f: impl FnMut(&[usize]) -> E) -> Self {
        let dims = dims.into();
        let strides = dims.strides();
        let n = dims.total_size();
        let mut buffer = Vec::with_capacity(n);
        let mut idx = vec![0usize; dims.rank()];
        for _ in 0..n {
            buffer.push(f(&idx));
            Self::increment_index(&mut idx, dims.as_slice());
        }
        let _ = strides;
        Tensor {
            dims,
            buffer: Arc::new(buffer),
        }
    }

    fn increment_index(idx: &mut [usize], dims: &[usize]) {
        for k in (0..idx.len()).rev() {
            idx[k] += 1;
            if idx[k] < dims[k] {
                return;
            }
            idx[k] = 0;
        }
    }

    /// Uniform random entries in `[0, 1)` (real part only for complex
    /// elements' imaginary part is also drawn independently, giving a
    /// uniform square in the complex plane) -- the standard fixture used
    /// across the pack's property tests.
    pub fn random(dims: impl Into<Dimensions>) -> Self
    where
        E: RandomElement,
    {
        let dims = dims.into();
        let n = dims.total_size();
        let mut rng = rand::thread_rng();
        let buffer = (0..n).map(|_| E::sample(&mut rng)).collect();
        Tensor {
            dims,
            buffer: Arc::new(buffer),
        }
    }

    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        self.dims.as_slice()
    }

    pub fn rank(&self) -> usize {
        self.dims.rank()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.buffer
    }

    /// Flat row-major offset for a fully-specified, already-normalized
    /// index vector.
    fn flat_offset(&self, idx: &[usize]) -> usize {
        let strides = self.dims.strides();
        idx.iter().zip(strides.iter()).map(|(i, s)| i * s).sum()
    }

    /// Read a single element, with wraparound index normalization per axis.
    pub fn get(&self, idx: &[isize]) -> TensorResult<E> {
        let resolved = self.resolve_index(idx)?;
        Ok(self.buffer[self.flat_offset(&resolved)])
    }

    fn resolve_index(&self, idx: &[isize]) -> TensorResult<Vec<usize>> {
        if idx.len() != self.rank() {
            return Err(TensorError::DimensionsMismatch {
                lhs: self.shape().to_vec(),
                rhs: vec![idx.len()],
                axes: None,
            });
        }
        idx.iter()
            .zip(self.shape().iter())
            .map(|(&i, &n)| normalize(i, n))
            .collect()
    }

    /// Write a single element, cloning the backing buffer first if it is
    /// shared with another `Tensor` handle (copy-on-write).
    pub fn set(&mut self, idx: &[isize], value: E) -> TensorResult<()> {
        let resolved = self.resolve_index(idx)?;
        let offset = self.flat_offset(&resolved);
        self.unshare()[offset] = value;
        Ok(())
    }

    /// Mutable access to the backing buffer, cloning it first if another
    /// `Tensor` shares the same `Arc`. This is the sole mutation primitive;
    /// every in-place operation routes through it.
    pub fn unshare(&mut self) -> &mut Vec<E> {
        Arc::make_mut(&mut self.buffer)
    }

    /// Whether this tensor currently shares its buffer with another handle.
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.buffer) > 1
    }

    /// Reinterpret the same buffer under a new shape of equal total size.
    pub fn reshape(&self, new_shape: impl Into<Dimensions>) -> TensorResult<Self> {
        let new_shape = new_shape.into();
        if new_shape.total_size() != self.len() {
            return Err(TensorError::ReshapeSizeMismatch {
                from: self.len(),
                to: new_shape.total_size(),
            });
        }
        Ok(Tensor {
            dims: new_shape,
            buffer: Arc::clone(&self.buffer),
        })
    }

    pub fn flatten(&self) -> Self {
        self.reshape(vec![self.len()]).expect("same total size")
    }

    pub fn into_vec(self) -> Vec<E> {
        Arc::try_unwrap(self.buffer).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Construct from a ragged-checked nested `Vec` of rank 1.
    pub fn from_nested1(rows: Vec<E>) -> Self {
        let n = rows.len();
        Tensor {
            dims: Dimensions::new(vec![n]),
            buffer: Arc::new(rows),
        }
    }

    /// Construct from a rank-2 nested `Vec`, failing on ragged rows.
    pub fn from_nested2(rows: Vec<Vec<E>>) -> TensorResult<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut buffer = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(TensorError::RaggedShape);
            }
            buffer.extend(row);
        }
        Ok(Tensor {
            dims: Dimensions::new(vec![nrows, ncols]),
            buffer: Arc::new(buffer),
        })
    }

    /// Construct from a rank-3 nested `Vec`, failing on any raggedness.
    pub fn from_nested3(rows: Vec<Vec<Vec<E>>>) -> TensorResult<Self> {
        let d0 = rows.len();
        let d1 = rows.first().map(|r| r.len()).unwrap_or(0);
        let d2 = rows
            .first()
            .and_then(|r| r.first())
            .map(|r| r.len())
            .unwrap_or(0);
        let mut buffer = Vec::with_capacity(d0 * d1 * d2);
        for plane in rows {
            if plane.len() != d1 {
                return Err(TensorError::RaggedShape);
            }
            for row in plane {
                if row.len() != d2 {
                    return Err(TensorError::RaggedShape);
                }
                buffer.extend(row);
            }
        }
        Ok(Tensor {
            dims: Dimensions::new(vec![d0, d1, d2]),
            buffer: Arc::new(buffer),
        })
    }
}

/// Sampling capability used by `Tensor::random`, kept separate from
/// `Element` so that the core trait stays free of an RNG dependency.
pub trait RandomElement: Element {
    fn sample(rng: &mut impl Rng) -> Self;
}

impl RandomElement for f64 {
    fn sample(rng: &mut impl Rng) -> Self {
        rng.gen_range(0.0..1.0)
    }
}

impl RandomElement for num_complex::Complex64 {
    fn sample(rng: &mut impl Rng) -> Self {
        num_complex::Complex64::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_and_ones_have_right_shape_and_values() {
        let z = Tensor::<f64>::zeros(vec![2, 3]);
        assert_eq!(z.shape(), &[2, 3]);
        assert!(z.as_slice().iter().all(|&v| v == 0.0));

        let o = Tensor::<f64>::ones(vec![2]);
        assert!(o.as_slice().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn eye_places_ones_on_diagonal() {
        let id = Tensor::<f64>::eye(3);
        for i in 0..3 {
            for j in 0..3 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert_eq!(id.get(&[i as isize, j as isize]).unwrap(), expect);
            }
        }
    }

    #[test]
    fn get_and_set_round_trip_with_wraparound() {
        let mut t = Tensor::<f64>::zeros(vec![2, 2]);
        t.set(&[-1, -1], 7.0).unwrap();
        assert_eq!(t.get(&[1, 1]).unwrap(), 7.0);
    }

    #[test]
    fn unshare_clones_only_when_shared() {
        let a = Tensor::<f64>::zeros(vec![2]);
        let mut b = a.clone();
        assert!(b.is_shared());
        b.set(&[0], 1.0).unwrap();
        assert!(!b.is_shared());
        assert_eq!(a.get(&[0]).unwrap(), 0.0);
        assert_eq!(b.get(&[0]).unwrap(), 1.0);
    }

    #[test]
    fn reshape_preserves_buffer_sharing() {
        let t = Tensor::<f64>::from_fn(vec![2, 3], |idx| (idx[0] * 3 + idx[1]) as f64);
        let r = t.reshape(vec![6]).unwrap();
        assert_eq!(r.as_slice(), t.as_slice());
        assert!(r.reshape(vec![4]).is_err());
    }

    #[test]
    fn from_nested2_rejects_ragged_rows() {
        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(Tensor::from_nested2(ragged).is_err());
    }

    #[test]
    fn from_nested2_builds_row_major_buffer() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let t = Tensor::from_nested2(rows).unwrap();
        assert_eq!(t.shape(), &[2, 2]);
        assert_eq!(t.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }
}

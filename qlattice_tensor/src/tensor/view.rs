/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Logically-scoped, non-owning proxies onto a `Tensor<E>`'s buffer through
//! a per-axis `Range` selection, materializing into an owned `Tensor<E>` on
//! demand. Grounded on `spec.md` §4.2's view contract and
//! `examples/deepcausality-rs-deep_causality`'s
//! `causal_tensor_view_tests.rs`.

use std::sync::Arc;

use qlattice_num::Element;

use crate::error::TensorResult;
use crate::range::{Range, RangeIterator};
use crate::shape::Dimensions;

use super::Tensor;

/// A read-only view of a `Tensor<E>` restricted to a per-axis `Range`
/// selection. Holds an owned `Arc` clone of the parent buffer rather than a
/// borrow, so it never outlives the parent while still being safe Rust.
#[derive(Debug, Clone)]
pub struct TensorView<E: Element> {
    buffer: Arc<Vec<E>>,
    source_dims: Dimensions,
    ranges: Vec<Range>,
}

/// A mutable view; materializing clones, matching the copy-on-write
/// semantics of the owning `Tensor<E>` (there is no shared mutable aliasing
/// to the parent buffer).
#[derive(Debug, Clone)]
pub struct TensorViewMut<E: Element> {
    inner: TensorView<E>,
}

impl<E: Element> TensorView<E> {
    pub fn new(tensor: &Tensor<E>, ranges: Vec<Range>) -> TensorResult<Self> {
        if ranges.len() != tensor.rank() {
            return Err(crate::error::TensorError::DimensionsMismatch {
                lhs: tensor.shape().to_vec(),
                rhs: vec![ranges.len()],
                axes: None,
            });
        }
        Ok(TensorView {
            buffer: Arc::clone(&tensor.buffer),
            source_dims: tensor.dims().clone(),
            ranges,
        })
    }

    fn iterator(&self) -> RangeIterator {
        RangeIterator::new(&self.ranges, self.source_dims.as_slice(), self.source_dims.strides())
    }

    /// Output shape with squeezed (single-index) axes removed.
    pub fn shape(&self) -> Vec<usize> {
        self.ranges
            .iter()
            .zip(self.source_dims.as_slice().iter())
            .filter(|(r, _)| !r.is_squeezed())
            .map(|(r, &n)| r.len(n))
            .collect()
    }

    /// Materialize this view into an owned, contiguous `Tensor<E>`.
    /// Contiguous selections are copied as one block; otherwise elements are
    /// gathered one at a time via the range iterator.
    pub fn materialize(&self) -> Tensor<E> {
        let out_shape = self.shape();
        let it = self.iterator();
        if it.is_contiguous(self.source_dims.as_slice()) {
            return Tensor::from_buffer(out_shape, (*self.buffer).clone())
                .expect("contiguous materialize has matching size");
        }
        let data: Vec<E> = it.map(|offset| self.buffer[offset]).collect();
        Tensor::from_buffer(out_shape, data).expect("range iterator output size matches shape")
    }
}

impl<E: Element> TensorViewMut<E> {
    pub fn new(tensor: &Tensor<E>, ranges: Vec<Range>) -> TensorResult<Self> {
        Ok(TensorViewMut {
            inner: TensorView::new(tensor, ranges)?,
        })
    }

    pub fn shape(&self) -> Vec<usize> {
        self.inner.shape()
    }

    pub fn materialize(&self) -> Tensor<E> {
        self.inner.materialize()
    }

    /// Write the materialized, edited tensor back into the parent at the
    /// positions this view selects. Callers edit the tensor returned by
    /// `materialize`, then call this to commit the change.
    pub fn commit(&self, parent: &mut Tensor<E>, edited: &Tensor<E>) -> TensorResult<()> {
        let it = RangeIterator::new(
            &self.inner.ranges,
            self.inner.source_dims.as_slice(),
            self.inner.source_dims.strides(),
        );
        let buf = parent.unshare();
        for (dst_offset, &value) in it.zip(edited.as_slice().iter()) {
            buf[dst_offset] = value;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_of_full_range_materializes_same_tensor() {
        let t = Tensor::<f64>::from_fn(vec![2, 2], |idx| (idx[0] * 2 + idx[1]) as f64);
        let view = TensorView::new(&t, vec![Range::full(), Range::full()]).unwrap();
        let out = view.materialize();
        assert_eq!(out.as_slice(), t.as_slice());
    }

    #[test]
    fn view_of_single_row_squeezes_axis() {
        let t = Tensor::<f64>::from_fn(vec![2, 3], |idx| (idx[0] * 3 + idx[1]) as f64);
        let view = TensorView::new(&t, vec![Range::single(0, 2).unwrap(), Range::full()]).unwrap();
        let out = view.materialize();
        assert_eq!(out.shape(), &[3]);
        assert_eq!(out.as_slice(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn commit_writes_edits_back_into_parent() {
        let mut t = Tensor::<f64>::zeros(vec![2, 2]);
        let view = TensorViewMut::new(&t.clone(), vec![Range::single(0, 2).unwrap(), Range::full()]).unwrap();
        let mut row = view.materialize();
        row.set(&[0], 9.0).unwrap();
        row.set(&[1], 8.0).unwrap();
        view.commit(&mut t, &row).unwrap();
        assert_eq!(t.get(&[0, 0]).unwrap(), 9.0);
        assert_eq!(t.get(&[0, 1]).unwrap(), 8.0);
        assert_eq!(t.get(&[1, 0]).unwrap(), 0.0);
    }
}

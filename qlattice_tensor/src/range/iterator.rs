/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Row-major product iterator over a tuple of per-axis `Range` selections,
//! the Rust equivalent of `original_source`'s chained `Range*` cursors
//! (`ProductRange`).

use super::Range;

/// Walks the flat-buffer offsets selected by one `Range` per axis, in
/// row-major order (last axis fastest).
pub struct RangeIterator {
    /// Resolved index list per axis (already normalized).
    axes: Vec<Vec<usize>>,
    /// Row-major strides of the *source* tensor this range indexes into.
    strides: Vec<usize>,
    /// Current position within each axis's index list.
    cursor: Vec<usize>,
    done: bool,
}

impl RangeIterator {
    pub fn new(ranges: &[Range], dims: &[usize], strides: Vec<usize>) -> Self {
        let axes: Vec<Vec<usize>> = ranges
            .iter()
            .zip(dims.iter())
            .map(|(r, &n)| r.resolve(n))
            .collect();
        let done = axes.iter().any(|a| a.is_empty());
        let cursor = vec![0usize; axes.len()];
        RangeIterator {
            axes,
            strides,
            cursor,
            done,
        }
    }

    /// Shape of the result this iterator produces (squeezed axes excluded
    /// by the caller, which builds `ranges` accordingly before calling
    /// `new`).
    pub fn output_shape(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.len()).collect()
    }

    /// True when every axis is a full-length, step-1 selection in order,
    /// meaning the whole selection is one contiguous run startable at
    /// offset 0 with length equal to the buffer size; callers use this to
    /// choose a `memcpy`-style fast path over element-by-element gather.
    pub fn is_contiguous(&self, dims: &[usize]) -> bool {
        self.axes
            .iter()
            .zip(dims.iter())
            .all(|(a, &n)| a.len() == n && a.iter().enumerate().all(|(i, &v)| v == i))
    }

    fn current_offset(&self) -> usize {
        self.cursor
            .iter()
            .zip(self.axes.iter())
            .zip(self.strides.iter())
            .map(|((&c, axis), &stride)| axis[c] * stride)
            .sum()
    }

    fn advance(&mut self) {
        if self.axes.is_empty() {
            self.done = true;
            return;
        }
        for k in (0..self.cursor.len()).rev() {
            self.cursor[k] += 1;
            if self.cursor[k] < self.axes[k].len() {
                return;
            }
            self.cursor[k] = 0;
        }
        self.done = true;
    }
}

impl Iterator for RangeIterator {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.done {
            return None;
        }
        let offset = self.current_offset();
        self.advance();
        Some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_row_major_offsets() {
        // shape (2, 3), strides (3, 1), both axes full.
        let ranges = vec![Range::full(), Range::full()];
        let dims = vec![2, 3];
        let it = RangeIterator::new(&ranges, &dims, vec![3, 1]);
        let offsets: Vec<usize> = it.collect();
        assert_eq!(offsets, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn contiguous_full_selection_is_detected() {
        let ranges = vec![Range::full(), Range::full()];
        let dims = vec![2, 3];
        let it = RangeIterator::new(&ranges, &dims, vec![3, 1]);
        assert!(it.is_contiguous(&dims));
    }

    #[test]
    fn partial_selection_is_not_contiguous() {
        let ranges = vec![Range::stepped(0, 0, 1, 2).unwrap(), Range::full()];
        let dims = vec![2, 3];
        let it = RangeIterator::new(&ranges, &dims, vec![3, 1]);
        assert!(!it.is_contiguous(&dims));
    }

    #[test]
    fn empty_axis_selection_yields_nothing() {
        let ranges = vec![Range::List(vec![]), Range::full()];
        let dims = vec![2, 3];
        let it = RangeIterator::new(&ranges, &dims, vec![3, 1]);
        assert_eq!(it.count(), 0);
    }
}

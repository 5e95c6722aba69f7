/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! C4: compressed-sparse-row matrix. Grounded on
//! `examples/deepcausality-rs-deep_causality/deep_causality_sparse/tests/types/sparse_matrix/{mod_tests,from_triplets_tests,ops_tests,algebra_tests,getters_tests}.rs`
//! and `examples/original_source/include/tensor/sparse/{csr_matrix.h,csr_operators.h}`.
//!
//! Triplet collisions are resolved by summation, not override -- see
//! `SPEC_FULL.md` §10.1 for why this supersedes the literal spec wording.

use qlattice_num::Element;
use qlattice_tensor::{RandomElement, Tensor};

use crate::error::{SparseMatrixError, SparseResult};

/// A row-major compressed-sparse-row matrix over element type `E`.
#[derive(Debug, Clone)]
pub struct CsrMatrix<E: Element> {
    nrows: usize,
    ncols: usize,
    row_start: Vec<usize>,
    column: Vec<usize>,
    data: Vec<E>,
}

impl<E: Element> CsrMatrix<E> {
    /// An empty `nrows x ncols` matrix with room reserved for `nnz_hint`
    /// nonzeros.
    pub fn with_capacity(nrows: usize, ncols: usize, nnz_hint: usize) -> Self {
        CsrMatrix {
            nrows,
            ncols,
            row_start: vec![0; nrows + 1],
            column: Vec::with_capacity(nnz_hint),
            data: Vec::with_capacity(nnz_hint),
        }
    }

    /// Build from `(row, col, value)` triplets in any order. Triplets that
    /// share a `(row, col)` are summed, matching the teacher's own
    /// `from_triplets` grounding test rather than the "later wins" wording.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: &[(usize, usize, E)],
    ) -> SparseResult<Self> {
        for &(r, c, _) in triplets {
            if r >= nrows || c >= ncols {
                return Err(SparseMatrixError::IndexOutOfBounds {
                    row: r,
                    col: c,
                    shape: (nrows, ncols),
                });
            }
        }
        let mut by_row: Vec<Vec<(usize, E)>> = vec![Vec::new(); nrows];
        for &(r, c, v) in triplets {
            by_row[r].push((c, v));
        }

        let mut row_start = vec![0usize; nrows + 1];
        let mut column = Vec::with_capacity(triplets.len());
        let mut data = Vec::with_capacity(triplets.len());

        for (r, entries) in by_row.into_iter().enumerate() {
            let mut merged: std::collections::BTreeMap<usize, E> = std::collections::BTreeMap::new();
            for (c, v) in entries {
                merged
                    .entry(c)
                    .and_modify(|acc| *acc = *acc + v)
                    .or_insert(v);
            }
            for (c, v) in merged {
                column.push(c);
                data.push(v);
            }
            row_start[r + 1] = column.len();
        }

        Ok(CsrMatrix {
            nrows,
            ncols,
            row_start,
            column,
            data,
        })
    }

    pub fn eye(n: usize) -> Self {
        let triplets: Vec<(usize, usize, E)> = (0..n).map(|i| (i, i, E::one())).collect();
        Self::from_triplets(n, n, &triplets).expect("diagonal triplets are always in bounds")
    }

    pub fn diag(values: &[E]) -> Self {
        let n = values.len();
        let triplets: Vec<(usize, usize, E)> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_zero())
            .map(|(i, &v)| (i, i, v))
            .collect();
        Self::from_triplets(n, n, &triplets).expect("diagonal triplets are always in bounds")
    }

    /// A random sparse matrix with entries drawn uniformly and kept with
    /// probability `density`.
    pub fn random(nrows: usize, ncols: usize, density: f64) -> Self
    where
        E: RandomElement,
    {
        let mut rng = rand::thread_rng();
        let mut triplets = Vec::new();
        for r in 0..nrows {
            for c in 0..ncols {
                if rand::Rng::gen_bool(&mut rng, density.clamp(0.0, 1.0)) {
                    triplets.push((r, c, E::sample(&mut rng)));
                }
            }
        }
        Self::from_triplets(nrows, ncols, &triplets).expect("generated indices are always in bounds")
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }
    pub fn ncols(&self) -> usize {
        self.ncols
    }
    pub fn nnz(&self) -> usize {
        self.data.len()
    }
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
    pub fn row_indices(&self) -> &[usize] {
        &self.row_start
    }
    pub fn col_indices(&self) -> &[usize] {
        &self.column
    }
    pub fn values(&self) -> &[E] {
        &self.data
    }

    fn row_slice(&self, r: usize) -> (&[usize], &[E]) {
        let start = self.row_start[r];
        let end = self.row_start[r + 1];
        (&self.column[start..end], &self.data[start..end])
    }

    /// Binary search within a row for the value at `(r, c)`; `0` if absent.
    pub fn get(&self, r: usize, c: usize) -> E {
        let (cols, vals) = self.row_slice(r);
        match cols.binary_search(&c) {
            Ok(pos) => vals[pos],
            Err(_) => E::zero(),
        }
    }

    pub fn scale(&self, factor: E) -> Self {
        CsrMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            row_start: self.row_start.clone(),
            column: self.column.clone(),
            data: self.data.iter().map(|&v| v * factor).collect(),
        }
    }

    pub fn neg(&self) -> Self {
        self.scale(-E::one())
    }

    /// Dense materialization, used by `mmult`'s dense-side operand path and
    /// tests.
    pub fn to_dense(&self) -> Tensor<E> {
        let mut buf = vec![E::zero(); self.nrows * self.ncols];
        for r in 0..self.nrows {
            let (cols, vals) = self.row_slice(r);
            for (&c, &v) in cols.iter().zip(vals.iter()) {
                buf[r * self.ncols + c] = v;
            }
        }
        Tensor::from_buffer(vec![self.nrows, self.ncols], buf).expect("matching shape by construction")
    }

    /// Merge two rows' sorted `(col, value)` streams, combining colliding
    /// columns with `combine` and keeping columns that appear in only one
    /// side via `only_lhs`/`only_rhs`.
    fn merge_rows(
        a_cols: &[usize],
        a_vals: &[E],
        b_cols: &[usize],
        b_vals: &[E],
        combine: impl Fn(E, E) -> E,
        only_lhs: impl Fn(E) -> E,
        only_rhs: impl Fn(E) -> E,
    ) -> (Vec<usize>, Vec<E>) {
        let mut i = 0;
        let mut j = 0;
        let mut cols = Vec::new();
        let mut vals = Vec::new();
        while i < a_cols.len() && j < b_cols.len() {
            if a_cols[i] == b_cols[j] {
                cols.push(a_cols[i]);
                vals.push(combine(a_vals[i], b_vals[j]));
                i += 1;
                j += 1;
            } else if a_cols[i] < b_cols[j] {
                cols.push(a_cols[i]);
                vals.push(only_lhs(a_vals[i]));
                i += 1;
            } else {
                cols.push(b_cols[j]);
                vals.push(only_rhs(b_vals[j]));
                j += 1;
            }
        }
        while i < a_cols.len() {
            cols.push(a_cols[i]);
            vals.push(only_lhs(a_vals[i]));
            i += 1;
        }
        while j < b_cols.len() {
            cols.push(b_cols[j]);
            vals.push(only_rhs(b_vals[j]));
            j += 1;
        }
        (cols, vals)
    }

    fn elementwise(
        &self,
        other: &Self,
        combine: impl Fn(E, E) -> E,
        only_lhs: impl Fn(E) -> E,
        only_rhs: impl Fn(E) -> E,
    ) -> SparseResult<Self> {
        if self.shape() != other.shape() {
            return Err(SparseMatrixError::ShapeMismatch {
                lhs: self.shape(),
                rhs: other.shape(),
            });
        }
        let mut row_start = vec![0usize; self.nrows + 1];
        let mut column = Vec::new();
        let mut data = Vec::new();
        for r in 0..self.nrows {
            let (ac, av) = self.row_slice(r);
            let (bc, bv) = other.row_slice(r);
            let (mut cols, mut vals) =
                Self::merge_rows(ac, av, bc, bv, &combine, &only_lhs, &only_rhs);
            column.append(&mut cols);
            data.append(&mut vals);
            row_start[r + 1] = column.len();
        }
        Ok(CsrMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            row_start,
            column,
            data,
        })
    }

    pub fn add(&self, other: &Self) -> SparseResult<Self> {
        self.elementwise(other, |a, b| a + b, |a| a, |b| b)
    }

    pub fn sub(&self, other: &Self) -> SparseResult<Self> {
        self.elementwise(other, |a, b| a - b, |a| a, |b| -b)
    }

    /// Hadamard (elementwise) product; columns present in only one operand
    /// contribute zero, so they are dropped rather than carried through.
    pub fn hadamard(&self, other: &Self) -> SparseResult<Self> {
        self.elementwise(other, |a, b| a * b, |_| E::zero(), |_| E::zero())
    }

    /// Sparse Kronecker product.
    pub fn kron(&self, other: &Self) -> Self {
        let mut triplets = Vec::with_capacity(self.nnz() * other.nnz());
        for r in 0..self.nrows {
            let (ac, av) = self.row_slice(r);
            for (&c, &v) in ac.iter().zip(av.iter()) {
                for s in 0..other.nrows {
                    let (bc, bv) = other.row_slice(s);
                    for (&d, &w) in bc.iter().zip(bv.iter()) {
                        triplets.push((r * other.nrows + s, c * other.ncols + d, v * w));
                    }
                }
            }
        }
        Self::from_triplets(self.nrows * other.nrows, self.ncols * other.ncols, &triplets)
            .expect("kron indices are always in bounds")
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self {
        let mut triplets = Vec::with_capacity(self.nnz());
        for r in 0..self.nrows {
            let (cols, vals) = self.row_slice(r);
            for (&c, &v) in cols.iter().zip(vals.iter()) {
                triplets.push((c, r, v.conj()));
            }
        }
        Self::from_triplets(self.ncols, self.nrows, &triplets)
            .expect("transposed indices are always in bounds")
    }

    /// `self * dense`, where `dense` is a rank-1 vector or rank-2 matrix.
    pub fn mmult_dense(&self, dense: &Tensor<E>) -> SparseResult<Tensor<E>> {
        match dense.rank() {
            1 => {
                if dense.shape()[0] != self.ncols {
                    return Err(SparseMatrixError::ShapeMismatch {
                        lhs: self.shape(),
                        rhs: (dense.shape()[0], 1),
                    });
                }
                let mut out = vec![E::zero(); self.nrows];
                for r in 0..self.nrows {
                    let (cols, vals) = self.row_slice(r);
                    let mut acc = E::zero();
                    for (&c, &v) in cols.iter().zip(vals.iter()) {
                        acc = acc + v * dense.get(&[c as isize]).expect("in bounds");
                    }
                    out[r] = acc;
                }
                Ok(Tensor::from_buffer(vec![self.nrows], out)?)
            }
            2 => {
                let (drows, dcols) = (dense.shape()[0], dense.shape()[1]);
                if drows != self.ncols {
                    return Err(SparseMatrixError::ShapeMismatch {
                        lhs: self.shape(),
                        rhs: (drows, dcols),
                    });
                }
                let mut out = vec![E::zero(); self.nrows * dcols];
                for r in 0..self.nrows {
                    let (cols, vals) = self.row_slice(r);
                    for (&c, &v) in cols.iter().zip(vals.iter()) {
                        for j in 0..dcols {
                            out[r * dcols + j] =
                                out[r * dcols + j] + v * dense.get(&[c as isize, j as isize]).expect("in bounds");
                        }
                    }
                }
                Ok(Tensor::from_buffer(vec![self.nrows, dcols], out)?)
            }
            _ => Err(SparseMatrixError::ShapeMismatch {
                lhs: self.shape(),
                rhs: (dense.len(), 1),
            }),
        }
    }

    /// `dense * self`, dense restricted to rank 2.
    pub fn dense_mmult(dense: &Tensor<E>, sparse: &Self) -> SparseResult<Tensor<E>> {
        if dense.rank() != 2 || dense.shape()[1] != sparse.nrows {
            return Err(SparseMatrixError::ShapeMismatch {
                lhs: (dense.shape().first().copied().unwrap_or(0), dense.shape().get(1).copied().unwrap_or(0)),
                rhs: sparse.shape(),
            });
        }
        let drows = dense.shape()[0];
        let mut out = vec![E::zero(); drows * sparse.ncols];
        for r in 0..sparse.nrows {
            let (cols, vals) = sparse.row_slice(r);
            for i in 0..drows {
                let dv = dense.get(&[i as isize, r as isize]).expect("in bounds");
                if dv.is_zero() {
                    continue;
                }
                for (&c, &v) in cols.iter().zip(vals.iter()) {
                    out[i * sparse.ncols + c] = out[i * sparse.ncols + c] + dv * v;
                }
            }
        }
        Ok(Tensor::from_buffer(vec![drows, sparse.ncols], out)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_triplets_duplicates_are_summed() {
        let m = CsrMatrix::from_triplets(2, 2, &[(0, 0, 1.0), (0, 0, 0.5)]).unwrap();
        assert_eq!(m.get(0, 0), 1.5);
    }

    #[test]
    fn from_triplets_rejects_out_of_bounds() {
        assert!(CsrMatrix::<f64>::from_triplets(1, 1, &[(1, 0, 1.0)]).is_err());
    }

    #[test]
    fn eye_has_unit_diagonal() {
        let id = CsrMatrix::<f64>::eye(3);
        for i in 0..3 {
            for j in 0..3 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert_eq!(id.get(i, j), expect);
            }
        }
    }

    #[test]
    fn add_merges_sorted_columns() {
        let a = CsrMatrix::from_triplets(2, 2, &[(0, 0, 1.0), (1, 1, 2.0)]).unwrap();
        let b = CsrMatrix::from_triplets(2, 2, &[(0, 0, 3.0), (0, 1, 4.0)]).unwrap();
        let c = a.add(&b).unwrap();
        assert_eq!(c.get(0, 0), 4.0);
        assert_eq!(c.get(0, 1), 4.0);
        assert_eq!(c.get(1, 1), 2.0);
    }

    #[test]
    fn mmult_dense_matches_dense_materialization() {
        let sparse = CsrMatrix::from_triplets(2, 2, &[(0, 0, 2.0), (1, 1, 3.0)]).unwrap();
        let v = Tensor::<f64>::from_buffer(vec![2], vec![1.0, 1.0]).unwrap();
        let result = sparse.mmult_dense(&v).unwrap();
        assert_eq!(result.as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn adjoint_transposes_and_conjugates() {
        let m = CsrMatrix::from_triplets(2, 2, &[(0, 1, 5.0)]).unwrap();
        let adj = m.adjoint();
        assert_eq!(adj.get(1, 0), 5.0);
        assert_eq!(adj.get(0, 1), 0.0);
    }

    #[test]
    fn kron_of_eyes_is_identity() {
        let a = CsrMatrix::<f64>::eye(2);
        let b = CsrMatrix::<f64>::eye(3);
        let k = a.kron(&b);
        assert_eq!(k.shape(), (6, 6));
        for i in 0..6 {
            assert_eq!(k.get(i, i), 1.0);
        }
    }
}

/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! `where_to_truncate`: the Schmidt-rank selection rule shared by
//! canonicalization, two-site updates, Trotter sweeps and iTEBD. Grounded on
//! `spec.md` §4.6 verbatim.

/// Smallest `k <= max` such that the discarded weight `sum_{i>=k} s_i^2` is
/// at most `tol` of the total weight `sum_i s_i^2`. `s` is the Schmidt
/// vector (singular values, always real even for a complex-element MPS),
/// assumed non-negative and non-increasing. A non-positive `tol` is
/// replaced by machine epsilon (drop only negligible/trailing values); an
/// empty spectrum always returns `0`.
pub fn where_to_truncate(s: &[f64], tol: f64, max: usize) -> usize {
    if s.is_empty() {
        return 0;
    }
    let total: f64 = s.iter().fold(0.0, |acc, &v| acc + v * v);
    if total <= f64::EPSILON {
        return 0;
    }
    let effective_tol = if tol <= 0.0 { f64::EPSILON } else { tol };

    let n = s.len();
    let max_k = max.min(n);
    let mut tail_sums = vec![0.0f64; n + 1];
    for i in (0..n).rev() {
        tail_sums[i] = tail_sums[i + 1] + s[i] * s[i];
    }

    for k in 0..=max_k {
        if tail_sums[k] <= effective_tol * total {
            return k;
        }
    }
    max_k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spectrum_truncates_to_zero() {
        assert_eq!(where_to_truncate(&[], -1.0, 10), 0);
    }

    #[test]
    fn keeps_only_dominant_singular_values() {
        let s = vec![10.0, 1e-12, 1e-13];
        let k = where_to_truncate(&s, -1.0, 10);
        assert_eq!(k, 1);
    }

    #[test]
    fn max_caps_the_kept_rank_even_if_weight_remains() {
        let s = vec![3.0, 2.0, 1.0];
        let k = where_to_truncate(&s, -1.0, 1);
        assert_eq!(k, 1);
    }

    #[test]
    fn loose_tolerance_keeps_fewer_values() {
        let s = vec![3.0, 2.0, 1.0];
        let k = where_to_truncate(&s, 0.5, 10);
        assert!(k < 3);
    }
}

/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! `truncate(psi, Dmax, periodic)`: hard-trim every bond to at most `Dmax`.
//! Grounded on `examples/original_source/src/mps/tools/truncate_mps.cc` and
//! `spec.md` §4.6.

use qlattice_num::{ComplexField, Element};

use crate::canonical::{canonicalize_step_left, canonicalize_step_right};
use crate::error::MpsResult;
use crate::mps::MPS;

/// Right-canonicalize, then sweep left to right capping every bond at
/// `Dmax`. `periodic` is accepted for API symmetry with `spec.md` §4.6 --
/// the sweep itself is geometry-agnostic, since bond sizes are read off
/// each site tensor rather than assumed from open-boundary shape.
/// Returns the truncated state and whether every cut already fit within
/// `Dmax` (no precision was discarded beyond what canonicalization itself
/// would have dropped).
pub fn truncate<E: Element + ComplexField>(psi: &MPS<E>, dmax: usize, periodic: bool) -> MpsResult<(MPS<E>, bool)> {
    let _ = periodic;
    let mut out = psi.clone();
    let mut exact = true;
    if out.len() < 2 {
        return Ok((out, true));
    }
    for k in (1..out.len()).rev() {
        exact &= out.site(k)?.shape()[0] <= dmax;
        canonicalize_step_left(&mut out, k, true, None)?;
    }
    for k in 0..out.len() - 1 {
        exact &= out.site(k)?.shape()[2] <= dmax;
        canonicalize_step_right(&mut out, k, true, Some(dmax))?;
    }
    Ok((out, exact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mps::{norm2, random};

    #[test]
    fn truncate_caps_every_bond_dimension() {
        let psi = random(5, 2, 6);
        let (truncated, _) = truncate(&psi, 3, false).unwrap();
        for k in 0..truncated.len() {
            assert!(truncated.site(k).unwrap().shape()[2] <= 3);
        }
    }

    #[test]
    fn truncate_with_generous_dmax_is_reported_exact() {
        let psi = random(4, 2, 2);
        let (_, exact) = truncate(&psi, 16, false).unwrap();
        assert!(exact);
    }

    #[test]
    fn truncate_preserves_finite_norm() {
        let psi = random(4, 2, 3);
        let (truncated, _) = truncate(&psi, 2, false).unwrap();
        assert!(norm2(&truncated).unwrap() > 0.0);
    }
}

/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Matrix product state/operator data model: canonicalization, truncation,
//! variational compression, expectation values, and the `Hamiltonian`/`MPO`
//! construction that the Trotter, Arnoldi and DMRG solvers build on
//! (`spec.md` §4.6).

mod bond_truncate;
mod canonical;
mod error;
mod expected;
mod hamiltonian;
mod mp;
mod mpo;
mod mps;
mod simplify;
mod svd_utils;
mod truncation;
mod two_site;

pub use bond_truncate::truncate;
pub use canonical::{canonical_form, normal_form, set_canonical};
pub use error::{MpsError, MpsResult};
pub use expected::{expected1, expected1_sum, expected2};
pub use hamiltonian::{GenericHamiltonian, Hamiltonian, TranslationInvariantHamiltonian};
pub use mp::MP;
pub use mpo::{apply, from_hamiltonian, MPO};
pub use mps::{cluster_state, ghz_state, mps_to_vector, norm2, product_state, random, scprod, MPS};
pub use simplify::{direct_sum, simplify};
pub use truncation::where_to_truncate;
pub use two_site::set_canonical_2_sites;

/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Infinite, translationally-invariant matrix product states in
//! Gamma-Lambda form (iTEBD): the two-site unit cell data model, the
//! imaginary-time Trotter gate application and canonicalization that act on
//! it, a handful of named fixture states, and the expectation-value /
//! imaginary-time-evolution routines built on top (`spec.md` §4.8).
//!
//! Kept independent of `qlattice_mps`: an infinite chain has no notion of a
//! chain boundary, so its canonicalization and bond update are a distinct
//! (if structurally similar) problem from the finite-chain MPS model.

mod error;
mod evolve;
mod expected;
mod itebd;
mod states;

pub use error::{ItebdError, ItebdResult};
pub use evolve::evolve_itime;
pub use expected::{expected1, expected2, expected12, energy, string_order};
pub use itebd::{ITebd, Parity};
pub use states::{infinite_aklt_state, infinite_cluster_state, infinite_ghz_state};

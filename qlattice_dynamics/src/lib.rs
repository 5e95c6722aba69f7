/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Time evolution and ground-state search for matrix product states:
//! Suzuki-Trotter unitaries, a Krylov/Arnoldi integrator, and DMRG
//! (`spec.md` §4.7).

mod arnoldi;
mod dmrg;
mod error;
mod trotter;

pub use arnoldi::ArnoldiSolver;
pub use dmrg::{ConservedQuantity, Dmrg};
pub use error::{DynamicsError, DynamicsResult};
pub use trotter::{bond_gate, unitary_sweep, ForestRuthSolver, Parity, SweepConfig, Trotter2Solver, Trotter3Solver};

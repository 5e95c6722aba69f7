/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! C5: the dense linear-algebra façade. A self-contained pure-Rust
//! numerical kernel standing in for the BLAS/LAPACK/ARPACK bindings
//! `spec.md` §4.5 describes -- sized for the matrices this engine actually
//! produces (MPS bond-dimension blocks), not BLAS-scale workloads.

mod eig;
mod eigs;
mod error;
mod expm;
mod solve;
mod svd;

pub use eig::{eig, eig_sym};
pub use eigs::{eigs, eigs_sym, EigsKind};
pub use error::{LinalgError, LinalgResult};
pub use expm::expm;
pub use solve::solve;
pub use svd::svd;

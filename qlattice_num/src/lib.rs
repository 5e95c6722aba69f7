/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Numeric element traits and process-wide flags registry shared by every
//! other `qlattice_*` crate.

mod element;
pub mod flags;

pub use element::{ComplexField, Element, ImaginaryUnit, RealField};
pub use num_complex::Complex64;

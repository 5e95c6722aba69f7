/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Shared, copy-on-write, row-major dense tensor container and algebra.
//!
//! `qlattice_tensor` implements C1 (shape/range algebra), C2 (the `Tensor<E>`
//! container) and C3 (tensor operations) of the qlattice engine. See
//! `SPEC_FULL.md` at the workspace root.

pub mod error;
pub mod ops;
pub mod range;
pub mod shape;
pub mod tensor;

pub use error::{TensorError, TensorResult};
pub use range::{Range, RangeIterator};
pub use shape::{Booleans, Dimensions, Indices};
pub use tensor::{RandomElement, Tensor, TensorView, TensorViewMut};

/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Polymorphic numeric element capability set.
//!
//! `spec.md` calls for a tensor parameterized over its element type with the
//! capability set `{+, -, x, /, conj, abs, zero, one, random, ordering}` and
//! no inheritance: callers pick at construction and the compiler
//! monomorphizes. `Element` is that capability set; `RealField` refines it
//! for the real-only transcendentals the dense linalg kernel needs.

use num_complex::Complex64;
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A scalar that a `Tensor<E>` can hold: real (`f64`) or complex (`Complex64`).
pub trait Element:
    Copy
    + Debug
    + PartialEq
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    fn from_f64(value: f64) -> Self;

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Complex conjugate; the identity for real elements.
    fn conj(self) -> Self;
    /// `|self|`, always returned as `f64` regardless of element type.
    fn modulus(self) -> f64;

    fn sqrt(self) -> Self;
    fn exp(self) -> Self;
    fn ln(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn powi(self, n: i32) -> Self;
}

/// Refinement of `Element` for real scalars: adds ordering and the full
/// transcendental set elementwise ops in `spec.md` §4.2 require
/// (`exp/log/sin/cos/.../pow`).
pub trait RealField: Element + PartialOrd {
    fn nan() -> Self;
    fn infinity() -> Self;
    fn pi() -> Self;
    fn e() -> Self;
    fn epsilon() -> Self;

    fn abs(self) -> Self;
    fn floor(self) -> Self;
    fn ceil(self) -> Self;
    fn round(self) -> Self;
    fn clamp(self, lo: Self, hi: Self) -> Self;
    fn log(self, base: Self) -> Self;
    fn powf(self, n: Self) -> Self;
    fn tan(self) -> Self;
    fn acos(self) -> Self;
    fn sinh(self) -> Self;
    fn cosh(self) -> Self;
    fn tanh(self) -> Self;
    fn atan2(self, x: Self) -> Self;
}

impl Element for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f64(value: f64) -> Self {
        value
    }
    fn conj(self) -> Self {
        self
    }
    fn modulus(self) -> f64 {
        f64::abs(self)
    }
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }
    fn exp(self) -> Self {
        f64::exp(self)
    }
    fn ln(self) -> Self {
        f64::ln(self)
    }
    fn sin(self) -> Self {
        f64::sin(self)
    }
    fn cos(self) -> Self {
        f64::cos(self)
    }
    fn powi(self, n: i32) -> Self {
        f64::powi(self, n)
    }
}

impl RealField for f64 {
    fn nan() -> Self {
        f64::NAN
    }
    fn infinity() -> Self {
        f64::INFINITY
    }
    fn pi() -> Self {
        std::f64::consts::PI
    }
    fn e() -> Self {
        std::f64::consts::E
    }
    fn epsilon() -> Self {
        f64::EPSILON
    }
    fn abs(self) -> Self {
        f64::abs(self)
    }
    fn floor(self) -> Self {
        f64::floor(self)
    }
    fn ceil(self) -> Self {
        f64::ceil(self)
    }
    fn round(self) -> Self {
        f64::round(self)
    }
    fn clamp(self, lo: Self, hi: Self) -> Self {
        f64::clamp(self, lo, hi)
    }
    fn log(self, base: Self) -> Self {
        f64::log(self, base)
    }
    fn powf(self, n: Self) -> Self {
        f64::powf(self, n)
    }
    fn tan(self) -> Self {
        f64::tan(self)
    }
    fn acos(self) -> Self {
        f64::acos(self)
    }
    fn sinh(self) -> Self {
        f64::sinh(self)
    }
    fn cosh(self) -> Self {
        f64::cosh(self)
    }
    fn tanh(self) -> Self {
        f64::tanh(self)
    }
    fn atan2(self, x: Self) -> Self {
        f64::atan2(self, x)
    }
}

impl Element for Complex64 {
    fn zero() -> Self {
        Complex64::new(0.0, 0.0)
    }
    fn one() -> Self {
        Complex64::new(1.0, 0.0)
    }
    fn from_f64(value: f64) -> Self {
        Complex64::new(value, 0.0)
    }
    fn conj(self) -> Self {
        Complex64::conj(&self)
    }
    fn modulus(self) -> f64 {
        Complex64::norm(self)
    }
    fn sqrt(self) -> Self {
        Complex64::sqrt(self)
    }
    fn exp(self) -> Self {
        Complex64::exp(self)
    }
    fn ln(self) -> Self {
        Complex64::ln(self)
    }
    fn sin(self) -> Self {
        Complex64::sin(self)
    }
    fn cos(self) -> Self {
        Complex64::cos(self)
    }
    fn powi(self, n: i32) -> Self {
        Complex64::powi(&self, n)
    }
}

/// Build a complex element from real/imaginary parts or promote a real one.
pub trait ComplexField: Element {
    fn new_complex(re: f64, im: f64) -> Self;
    fn real_part(self) -> f64;
    fn imag_part(self) -> f64;
}

impl ComplexField for Complex64 {
    fn new_complex(re: f64, im: f64) -> Self {
        Complex64::new(re, im)
    }
    fn real_part(self) -> f64 {
        self.re
    }
    fn imag_part(self) -> f64 {
        self.im
    }
}

impl ComplexField for f64 {
    fn new_complex(re: f64, _im: f64) -> Self {
        re
    }
    fn real_part(self) -> f64 {
        self
    }
    fn imag_part(self) -> f64 {
        0.0
    }
}

/// A `ComplexField` that actually carries an imaginary unit. `f64`
/// implements `ComplexField` (trivially, dropping the imaginary part), so
/// bounding on `ComplexField` alone does not exclude it; real-time evolution
/// needs a genuine `-i` factor, so it bounds on `ImaginaryUnit` instead,
/// which only `Complex64` implements.
pub trait ImaginaryUnit: ComplexField {
    fn i() -> Self;
}

impl ImaginaryUnit for Complex64 {
    fn i() -> Self {
        Complex64::new(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_element_basics() {
        assert_eq!(f64::zero(), 0.0);
        assert_eq!(f64::one(), 1.0);
        assert_eq!((-2.0_f64).conj(), -2.0);
        assert_eq!((-2.0_f64).modulus(), 2.0);
    }

    #[test]
    fn complex_element_basics() {
        let z = Complex64::new(3.0, 4.0);
        assert_eq!(z.modulus(), 5.0);
        assert_eq!(z.conj(), Complex64::new(3.0, -4.0));
        assert_eq!(Complex64::zero(), Complex64::new(0.0, 0.0));
    }

    #[test]
    fn real_field_constants() {
        assert!(f64::pi() > 3.14 && f64::pi() < 3.15);
        assert!(f64::epsilon() > 0.0);
    }

    #[test]
    fn imaginary_unit_squares_to_minus_one() {
        let i = Complex64::i();
        assert_eq!(i * i, Complex64::new(-1.0, 0.0));
    }
}

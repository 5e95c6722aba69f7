/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! Elementwise arithmetic, comparisons and complex helpers for `Tensor<E>`.
//! Grounded on
//! `examples/deepcausality-rs-deep_causality/deep_causality_tensor/tests/types/causal_tensor/{op_scalar_tensor_tests,op_tensor_scalar_tests}.rs`.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use qlattice_num::{ComplexField, Element, RealField};

use crate::error::{TensorError, TensorResult};
use crate::shape::Booleans;

use super::Tensor;

impl<E: Element> Tensor<E> {
    fn zip_with(&self, other: &Tensor<E>, f: impl Fn(E, E) -> E) -> TensorResult<Tensor<E>> {
        if self.shape() != other.shape() {
            return Err(TensorError::DimensionsMismatch {
                lhs: self.shape().to_vec(),
                rhs: other.shape().to_vec(),
                axes: None,
            });
        }
        let data: Vec<E> = self
            .as_slice()
            .iter()
            .zip(other.as_slice().iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Tensor::from_buffer(self.dims().clone(), data)
    }

    fn map(&self, f: impl Fn(E) -> E) -> Tensor<E> {
        let data: Vec<E> = self.as_slice().iter().map(|&v| f(v)).collect();
        Tensor::from_buffer(self.dims().clone(), data).expect("map preserves shape")
    }

    fn zip_cmp(&self, other: &Tensor<E>, f: impl Fn(E, E) -> bool) -> TensorResult<Booleans>
    where
        E: PartialOrd,
    {
        if self.shape() != other.shape() {
            return Err(TensorError::DimensionsMismatch {
                lhs: self.shape().to_vec(),
                rhs: other.shape().to_vec(),
                axes: None,
            });
        }
        let bits = self
            .as_slice()
            .iter()
            .zip(other.as_slice().iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Booleans(bits))
    }

    pub fn elementwise_eq(&self, other: &Tensor<E>) -> TensorResult<Booleans> {
        self.zip_cmp(other, |a, b| a == b)
    }

    pub fn lt(&self, other: &Tensor<E>) -> TensorResult<Booleans>
    where
        E: PartialOrd,
    {
        self.zip_cmp(other, |a, b| a < b)
    }

    pub fn gt(&self, other: &Tensor<E>) -> TensorResult<Booleans>
    where
        E: PartialOrd,
    {
        self.zip_cmp(other, |a, b| a > b)
    }

    pub fn scale(&self, factor: E) -> Tensor<E> {
        self.map(|v| v * factor)
    }

    pub fn scale_inplace(&mut self, factor: E) {
        for v in self.unshare().iter_mut() {
            *v = *v * factor;
        }
    }

    pub fn conj(&self) -> Tensor<E> {
        self.map(Element::conj)
    }

    pub fn abs(&self) -> Tensor<f64> {
        let data: Vec<f64> = self.as_slice().iter().map(|&v| v.modulus()).collect();
        Tensor::from_buffer(self.dims().clone(), data).expect("abs preserves shape")
    }

    pub fn to_complex(&self) -> Tensor<num_complex::Complex64>
    where
        E: ComplexField,
    {
        let data: Vec<num_complex::Complex64> = self
            .as_slice()
            .iter()
            .map(|&v| num_complex::Complex64::new(v.real_part(), v.imag_part()))
            .collect();
        Tensor::from_buffer(self.dims().clone(), data).expect("to_complex preserves shape")
    }

    pub fn real(&self) -> Tensor<f64>
    where
        E: ComplexField,
    {
        let data: Vec<f64> = self.as_slice().iter().map(|&v| v.real_part()).collect();
        Tensor::from_buffer(self.dims().clone(), data).expect("real preserves shape")
    }

    pub fn imag(&self) -> Tensor<f64>
    where
        E: ComplexField,
    {
        let data: Vec<f64> = self.as_slice().iter().map(|&v| v.imag_part()).collect();
        Tensor::from_buffer(self.dims().clone(), data).expect("imag preserves shape")
    }
}

/// Elementwise transcendentals, restricted to real-valued tensors since
/// the comparisons (`floor`/`ceil`/`round`) and `RealField` trait are
/// real-only; complex tensors use `Element::{exp,ln,sin,cos,sqrt}` directly.
impl<E: RealField> Tensor<E> {
    pub fn exp_elementwise(&self) -> Tensor<E> {
        self.map(Element::exp)
    }
    pub fn ln_elementwise(&self) -> Tensor<E> {
        self.map(Element::ln)
    }
    pub fn sin_elementwise(&self) -> Tensor<E> {
        self.map(Element::sin)
    }
    pub fn cos_elementwise(&self) -> Tensor<E> {
        self.map(Element::cos)
    }
    pub fn sqrt_elementwise(&self) -> Tensor<E> {
        self.map(Element::sqrt)
    }
    pub fn floor_elementwise(&self) -> Tensor<E> {
        self.map(RealField::floor)
    }
    pub fn ceil_elementwise(&self) -> Tensor<E> {
        self.map(RealField::ceil)
    }
    pub fn round_elementwise(&self) -> Tensor<E> {
        self.map(RealField::round)
    }
}

impl<E: Element> Add for Tensor<E> {
    type Output = TensorResult<Tensor<E>>;
    fn add(self, rhs: Tensor<E>) -> Self::Output {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl<E: Element> Sub for Tensor<E> {
    type Output = TensorResult<Tensor<E>>;
    fn sub(self, rhs: Tensor<E>) -> Self::Output {
        self.zip_with(&rhs, |a, b| a - b)
    }
}

impl<E: Element> Mul for Tensor<E> {
    type Output = TensorResult<Tensor<E>>;
    fn mul(self, rhs: Tensor<E>) -> Self::Output {
        self.zip_with(&rhs, |a, b| a * b)
    }
}

impl<E: Element> Div for Tensor<E> {
    type Output = TensorResult<Tensor<E>>;
    fn div(self, rhs: Tensor<E>) -> Self::Output {
        self.zip_with(&rhs, |a, b| a / b)
    }
}

impl<E: Element> Neg for Tensor<E> {
    type Output = Tensor<E>;
    fn neg(self) -> Self::Output {
        self.map(|v| -v)
    }
}

impl<E: Element> AddAssign<&Tensor<E>> for Tensor<E> {
    fn add_assign(&mut self, rhs: &Tensor<E>) {
        let result = self.zip_with(rhs, |a, b| a + b).expect("shape mismatch in +=");
        *self = result;
    }
}

impl<E: Element> SubAssign<&Tensor<E>> for Tensor<E> {
    fn sub_assign(&mut self, rhs: &Tensor<E>) {
        let result = self.zip_with(rhs, |a, b| a - b).expect("shape mismatch in -=");
        *self = result;
    }
}

impl<E: Element> MulAssign<&Tensor<E>> for Tensor<E> {
    fn mul_assign(&mut self, rhs: &Tensor<E>) {
        let result = self.zip_with(rhs, |a, b| a * b).expect("shape mismatch in *=");
        *self = result;
    }
}

impl<E: Element> DivAssign<&Tensor<E>> for Tensor<E> {
    fn div_assign(&mut self, rhs: &Tensor<E>) {
        let result = self.zip_with(rhs, |a, b| a / b).expect("shape mismatch in /=");
        *self = result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_matches_elementwise_sum() {
        let a = Tensor::<f64>::ones(vec![2]);
        let b = Tensor::<f64>::ones(vec![2]);
        let c = (a + b).unwrap();
        assert_eq!(c.as_slice(), &[2.0, 2.0]);
    }

    #[test]
    fn add_rejects_shape_mismatch() {
        let a = Tensor::<f64>::ones(vec![2]);
        let b = Tensor::<f64>::ones(vec![3]);
        assert!((a + b).is_err());
    }

    #[test]
    fn scale_multiplies_every_element() {
        let a = Tensor::<f64>::ones(vec![3]);
        let scaled = a.scale(2.0);
        assert_eq!(scaled.as_slice(), &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn conj_is_identity_on_reals() {
        let a = Tensor::<f64>::from_buffer(vec![2], vec![1.0, -2.0]).unwrap();
        assert_eq!(a.conj().as_slice(), &[1.0, -2.0]);
    }

    #[test]
    fn abs_takes_modulus() {
        let a = Tensor::<f64>::from_buffer(vec![2], vec![-3.0, 4.0]).unwrap();
        assert_eq!(a.abs().as_slice(), &[3.0, 4.0]);
    }

    #[test]
    fn add_assign_mutates_in_place() {
        let mut a = Tensor::<f64>::ones(vec![2]);
        let b = Tensor::<f64>::ones(vec![2]);
        a += &b;
        assert_eq!(a.as_slice(), &[2.0, 2.0]);
    }
}

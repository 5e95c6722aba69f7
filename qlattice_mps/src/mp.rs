/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

//! `MP<E>`: the shared site-tensor container underlying both `MPS<E>` and
//! `MPO<E>`. Grounded on `examples/original_source/include/mps/mps.h`'s
//! description of a matrix product as "just a collection of tensors" indexed
//! by site, with `get(k)`/`set(k,A)` as the sole primitives other operations
//! build on.

use qlattice_num::Element;
use qlattice_tensor::Tensor;

use crate::error::{MpsError, MpsResult};

/// An ordered chain of site tensors. `MPS<E>` wraps this with rank-3
/// `(alpha, i, beta)` site tensors; `MPO<E>` wraps it with rank-4
/// `(alpha, i, j, beta)` site tensors.
#[derive(Debug, Clone)]
pub struct MP<E: Element> {
    sites: Vec<Tensor<E>>,
}

impl<E: Element> MP<E> {
    pub fn new(sites: Vec<Tensor<E>>) -> Self {
        MP { sites }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn get(&self, k: usize) -> MpsResult<&Tensor<E>> {
        self.sites.get(k).ok_or(MpsError::SiteOutOfBounds { site: k, length: self.sites.len() })
    }

    pub fn set(&mut self, k: usize, a: Tensor<E>) -> MpsResult<()> {
        if k >= self.sites.len() {
            return Err(MpsError::SiteOutOfBounds { site: k, length: self.sites.len() });
        }
        self.sites[k] = a;
        Ok(())
    }

    pub fn sites(&self) -> &[Tensor<E>] {
        &self.sites
    }

    pub fn sites_mut(&mut self) -> &mut [Tensor<E>] {
        &mut self.sites
    }

    pub fn into_sites(self) -> Vec<Tensor<E>> {
        self.sites
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_set_round_trip() {
        let mut mp = MP::new(vec![Tensor::<f64>::zeros(vec![1, 2, 1]), Tensor::<f64>::zeros(vec![1, 2, 1])]);
        mp.set(1, Tensor::<f64>::ones(vec![1, 2, 1])).unwrap();
        assert_eq!(mp.get(1).unwrap().as_slice(), &[1.0, 1.0]);
    }

    #[test]
    fn out_of_bounds_site_is_reported() {
        let mp: MP<f64> = MP::new(vec![Tensor::<f64>::zeros(vec![1, 2, 1])]);
        assert!(matches!(mp.get(5), Err(MpsError::SiteOutOfBounds { site: 5, length: 1 })));
    }
}

/*
 * SPDX-License-Identifier: MIT OR Apache-2.0
 * Copyright (c) 2026 The Qlattice Authors and Contributors.
 */

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qlattice_tensor::ops::{mmult, permute_12};
use qlattice_tensor::Tensor;

fn bench_permute(c: &mut Criterion) {
    let t = Tensor::<f64>::from_fn(vec![64, 64], |idx| (idx[0] + idx[1]) as f64);
    c.bench_function("permute_12 64x64", |b| {
        b.iter(|| permute_12(black_box(&t)).unwrap())
    });
}

fn bench_mmult(c: &mut Criterion) {
    let a = Tensor::<f64>::from_fn(vec![64, 64], |idx| (idx[0] + idx[1]) as f64);
    let b = Tensor::<f64>::from_fn(vec![64, 64], |idx| (idx[0] * idx[1]) as f64);
    c.bench_function("mmult 64x64", |bencher| {
        bencher.iter(|| mmult(black_box(&a), black_box(&b)).unwrap())
    });
}

criterion_group!(benches, bench_permute, bench_mmult);
criterion_main!(benches);

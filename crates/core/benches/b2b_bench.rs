//! Benchmarks for BLAKE2b-256 sessions and the batch driver

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use autolykos_core::batch::build_table;
use autolykos_core::{ExecutionContext, Parallel, Sequential, blake2b256, blake2b256_with};

fn bench_hash(c: &mut Criterion) {
    let input = b"benchmark input data for testing BLAKE2b-256 performance";

    c.bench_function("b2b_single", |b| b.iter(|| blake2b256(black_box(input))));
}

fn bench_strategies(c: &mut Criterion) {
    // Header digest plus nonce, spanning two blocks
    let input = [0x5Au8; 140];

    c.bench_function("b2b_sequential", |b| {
        b.iter(|| blake2b256_with::<Sequential>(black_box(&input)))
    });
    c.bench_function("b2b_parallel_counter", |b| {
        b.iter(|| blake2b256_with::<Parallel>(black_box(&input)))
    });
}

fn bench_hash_varying_input(c: &mut Criterion) {
    c.bench_function("b2b_varying", |b| {
        let mut nonce: u64 = 0;
        b.iter(|| {
            let mut input = Vec::with_capacity(72);
            input.extend_from_slice(&[0u8; 64]);
            input.extend_from_slice(&nonce.to_be_bytes());
            nonce = nonce.wrapping_add(1);
            blake2b256(black_box(&input))
        })
    });
}

fn bench_table(c: &mut Criterion) {
    let seed = [0x42u8; 32];

    c.bench_function("table_1024", |b| {
        b.iter(|| build_table(black_box(&seed), 0..1024, ExecutionContext::Parallel))
    });
}

criterion_group!(
    benches,
    bench_hash,
    bench_strategies,
    bench_hash_varying_input,
    bench_table
);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;
use swizzle_addr_core::{evaluate_equation, Addresser, BitEquation, Extent3D};

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
use pprof::criterion::{Output, PProfProfiler};

// 3D layout with XOR terms on every axis: 4 byte elements, 16x16x4 elements per 4KiB block.
const EQUATION: &str = "0 0 x0 y0 x1 y1 z0 x2^y1 y2 x3^z0 y3 z1";
const BLOCK: Extent3D = Extent3D::new(16, 16, 4);
const BLOCK_BITS: u32 = 12;

fn criterion_benchmark(c: &mut Criterion) {
    let equation: BitEquation = EQUATION.parse().unwrap();
    let addresser = Addresser::new(&equation, BLOCK, BLOCK_BITS);
    let elements = (BLOCK.width * BLOCK.height * BLOCK.depth) as u64;

    let mut group = c.benchmark_group("Block Offset (16x16x4 block)");
    group.throughput(Throughput::Elements(elements));

    group.bench_function("lookup_tables", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for z in 0..BLOCK.depth {
                for y in 0..BLOCK.height {
                    for x in 0..BLOCK.width {
                        acc ^= addresser.block_offset(black_box(x), y, z, 0, 0);
                    }
                }
            }
            acc
        })
    });

    group.bench_function("reference", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for z in 0..BLOCK.depth {
                for y in 0..BLOCK.height {
                    for x in 0..BLOCK.width {
                        acc ^= evaluate_equation(&equation, black_box(x), y, z, 0);
                    }
                }
            }
            acc
        })
    });

    group.finish();

    c.bench_function("Addresser::new", |b| {
        b.iter(|| Addresser::new(black_box(&equation), BLOCK, BLOCK_BITS))
    });
}

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_benchmark
}

#[cfg(not(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
)))]
criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}

criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use swizzle_addr_core::allocate::allocate_align_64;
use swizzle_addr_core::{
    copy_fn_for_img_to_mem, copy_fn_for_mem_to_img, Addresser, BatchClass, BitEquation, Coord2D,
    ElementSize, Extent2D, Extent3D,
};

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
use pprof::criterion::{Output, PProfProfiler};

// 4 byte elements in 64KiB blocks of 128x128, with two x bits right above the element bits.
const EQUATION: &str = "0 0 x0 x1 y0 x2 y1 x3 y2 x4 y3 x5 y4 x6 y5^x3 y6";
const BLOCK: Extent3D = Extent3D::new(128, 128, 1);
const BLOCK_BITS: u32 = 16;

const WIDTH: u32 = 2048;
const HEIGHT: u32 = 2048;

fn criterion_benchmark(c: &mut Criterion) {
    let equation: BitEquation = EQUATION.parse().unwrap();
    let addresser = Addresser::new(&equation, BLOCK, BLOCK_BITS);
    let size = ElementSize::Bytes4;

    let blocks_per_row = WIDTH / BLOCK.width;
    let block_rows = HEIGHT / BLOCK.height;
    let stride = WIDTH as usize * size.bytes();
    let linear_len = stride * HEIGHT as usize;
    let tiled_len = ((blocks_per_row * block_rows) as usize) << BLOCK_BITS;

    let mut linear = allocate_align_64(linear_len).unwrap();
    for (index, byte) in linear.as_mut_slice().iter_mut().enumerate() {
        *byte = index as u8;
    }
    let mut tiled = allocate_align_64(tiled_len).unwrap();
    tiled.as_mut_slice().fill(0);

    let origin = Coord2D::new(0, 0);
    let extent = Extent2D::new(WIDTH, HEIGHT);

    let mut group = c.benchmark_group("Linear to Tiled (4 byte elements, 2048x2048)");
    group.throughput(Throughput::Bytes(linear_len as u64));
    for class in BatchClass::all_values().iter().copied() {
        if class > addresser.batch_class() {
            continue;
        }

        let copy = copy_fn_for_mem_to_img(size, class);
        group.bench_function(format!("batch_{}", class.elements()), |b| {
            b.iter(|| unsafe {
                copy(
                    tiled.as_mut_ptr(),
                    linear.as_ptr(),
                    stride,
                    blocks_per_row,
                    origin,
                    extent,
                    0,
                    &addresser,
                )
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("Tiled to Linear (4 byte elements, 2048x2048)");
    group.throughput(Throughput::Bytes(linear_len as u64));
    for class in BatchClass::all_values().iter().copied() {
        if class > addresser.batch_class() {
            continue;
        }

        let copy = copy_fn_for_img_to_mem(size, class);
        group.bench_function(format!("batch_{}", class.elements()), |b| {
            b.iter(|| unsafe {
                copy(
                    linear.as_mut_ptr(),
                    tiled.as_ptr(),
                    stride,
                    blocks_per_row,
                    origin,
                    extent,
                    0,
                    &addresser,
                )
            })
        });
    }
    group.finish();
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

//! Common test imports and utilities for swizzle addressing tests
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.

// External crates commonly used in tests
pub use rstest::rstest;

// Core functionality from this crate
pub use crate::addresser::{Addresser, Coord2D, Extent2D, Extent3D};
pub use crate::allocate::allocate_align_64;
pub use crate::equation::{BitEquation, BitSetting};
pub use crate::evaluate::evaluate_equation;

pub use safe_allocator_api::RawAlloc;
pub use std::vec::Vec;

/// Parses an equation from its text form, panicking on malformed input.
pub(crate) fn parse_equation(text: &str) -> BitEquation {
    text.parse()
        .unwrap_or_else(|error| panic!("Invalid test equation {text:?}: {error}"))
}

/// Builds an 8x8 element block layout with `x_run` `x` bits right above the element bits.
///
/// Past the run, `y` and `x` bits alternate, and the top bit additionally XORs in `y0` so
/// the equation is not a plain interleave. Returns the equation, block size and block bits.
pub(crate) fn test_layout(bpe_log2: u32, x_run: u32) -> (BitEquation, Extent3D, u32) {
    assert!(x_run <= 3);
    let mut bits = Vec::new();
    bits.resize(bpe_log2 as usize, BitSetting::ZERO);
    bits.extend((0..x_run).map(BitSetting::x));

    let (mut next_x, mut next_y) = (x_run, 0);
    while next_x < 3 || next_y < 3 {
        if next_y < 3 {
            bits.push(BitSetting::y(next_y));
            next_y += 1;
        }
        if next_x < 3 {
            bits.push(BitSetting::x(next_x));
            next_x += 1;
        }
    }

    let top = bits.len() - 1;
    if bits[top] != BitSetting::y(0) {
        bits[top] = bits[top].xor(BitSetting::y(0));
    }

    (
        BitEquation::from_bits(&bits),
        Extent3D::new(8, 8, 1),
        bpe_log2 + 6,
    )
}

/// Blocks and size of a single-slice tiled test surface.
pub(crate) struct TestSurface {
    pub width: u32,
    pub height: u32,
    pub blocks_per_row: u32,
    pub block_rows: u32,
    pub block_size_bits: u32,
}

impl TestSurface {
    pub(crate) fn new(addresser: &Addresser, width: u32, height: u32) -> Self {
        let block = addresser.block_size();
        Self {
            width,
            height,
            blocks_per_row: width.div_ceil(block.width),
            block_rows: height.div_ceil(block.height),
            block_size_bits: addresser.block_size_bits(),
        }
    }

    pub(crate) fn tiled_len(&self) -> usize {
        ((self.blocks_per_row * self.block_rows) as usize) << self.block_size_bits
    }
}

/// Deterministic, non-repeating-looking bytes so misplaced elements are caught.
pub(crate) fn generate_pattern(num_bytes: usize) -> RawAlloc {
    let mut data = allocate_zeroed(num_bytes);
    for (index, byte) in data.as_mut_slice().iter_mut().enumerate() {
        *byte = ((index as u32).wrapping_mul(0x9E37_79B1) >> 24) as u8 ^ index as u8;
    }
    data
}

/// Zeroed 64 byte aligned test buffer.
pub(crate) fn allocate_zeroed(num_bytes: usize) -> RawAlloc {
    crate::allocate::allocate_zeroed_align_64(num_bytes).unwrap()
}

/// Element by element linear to tiled copy built on [`evaluate_equation`].
#[allow(clippy::too_many_arguments)]
pub(crate) fn reference_linear_to_tiled(
    addresser: &Addresser,
    source: &[u8],
    stride: usize,
    blocks_per_row: u32,
    origin: Coord2D,
    extent: Extent2D,
    slice_xor: u32,
    tiled_len: usize,
) -> Vec<u8> {
    let bpe = 1usize << addresser.element_size_log2();
    let equation = addresser.equation();
    let mut tiled = std::vec![0u8; tiled_len];

    for row in 0..extent.height {
        for column in 0..extent.width {
            let (x, y) = (origin.x + column, origin.y + row);
            let block = (y >> addresser.block_size_bits_y()) as usize * blocks_per_row as usize
                + (x >> addresser.block_size_bits_x()) as usize;
            let offset = (block << addresser.block_size_bits())
                + (evaluate_equation(equation, x, y, 0, 0) ^ slice_xor) as usize;
            let linear = row as usize * stride + column as usize * bpe;
            tiled[offset..offset + bpe].copy_from_slice(&source[linear..linear + bpe]);
        }
    }

    tiled
}

#[test]
fn test_layout_has_requested_run() {
    for bpe_log2 in 0..=4 {
        for x_run in 0..=3 {
            let (equation, _, block_bits) = test_layout(bpe_log2, x_run);
            let properties = crate::properties::SwizzleProperties::analyze(&equation);
            assert_eq!(properties.element_size_log2, bpe_log2);
            assert_eq!(properties.expand_x, 1 << x_run);
            assert_eq!(equation.valid_len() as u32, block_bits);
        }
    }
}

//! Row copy loops between a tiled surface and linear memory.
//!
//! Each row is split in three parts:
//!
//! ```text
//!  x_start      aligned_start                      aligned_end     x_end
//!     |  edge     |  batch  |  batch  |  batch  |      |   tail      |
//!     +-----------+---------+---------+---------+------+-------------+
//!      1 element    BATCH elements, one copy each        1 element
//! ```
//!
//! A batch is `BATCH` horizontally adjacent elements starting at a multiple of `BATCH`.
//! The equation guarantees those are stored next to each other, so the whole batch is a
//! single `BATCH << BPE_LOG2` byte copy.

use super::direction::{CopyDirection, LinearToTiled, TiledToLinear};
use crate::addresser::{Addresser, Coord2D, Extent2D};

#[inline(always)]
const fn align_up(value: u32, align: u32) -> u32 {
    (value + align - 1) & !(align - 1)
}

#[inline(always)]
const fn align_down(value: u32, align: u32) -> u32 {
    value & !(align - 1)
}

/// Copies a 2D region of one slice in the direction given by `D`.
///
/// # Safety
///
/// - `img` points at the first block of the slice. Every block the region touches,
///   `(y >> block_bits_y) * blocks_per_row + (x >> block_bits_x)`, must be valid for
///   `2^block_size_bits` bytes.
/// - `buf` points at the first element of the region. Each of the `extent.height` rows,
///   `buf_row_stride` bytes apart, must be valid for `extent.width << BPE_LOG2` bytes.
/// - `BPE_LOG2` is the addresser's element size, and `BATCH` is at most its `expand_x`.
/// - `slice_xor` leaves the low `BPE_LOG2 + log2(BATCH)` offset bits untouched and keeps
///   offsets inside the block.
/// - The tiled and linear ranges do not overlap.
#[inline(always)]
#[allow(clippy::too_many_arguments)]
unsafe fn copy_2d_slice<D: CopyDirection, const BPE_LOG2: u32, const BATCH: u32>(
    img: *mut u8,
    buf: *mut u8,
    buf_row_stride: usize,
    blocks_per_row: u32,
    origin: Coord2D,
    extent: Extent2D,
    slice_xor: u32,
    addresser: &Addresser,
) {
    debug_assert!(BATCH.is_power_of_two());
    debug_assert_eq!(addresser.element_size_log2(), BPE_LOG2);
    debug_assert!(BATCH <= addresser.expand_x());

    let block_bits = addresser.block_size_bits();
    let block_bits_x = addresser.block_size_bits_x();
    let block_bits_y = addresser.block_size_bits_y();

    let x_start = origin.x;
    let x_end = origin.x + extent.width;
    let aligned_start = align_up(x_start, BATCH).min(x_end);
    let aligned_end = align_down(x_end, BATCH).max(aligned_start);

    // Re-base so that element `x` of a row sits at `x << BPE_LOG2`.
    let buf = buf.wrapping_sub((x_start as usize) << BPE_LOG2);

    for row in 0..extent.height {
        let y = origin.y + row;
        let row_xor = slice_xor ^ addresser.address_y(y);
        let row_block = (y >> block_bits_y) as usize * blocks_per_row as usize;
        let buf_row = buf.wrapping_add(row as usize * buf_row_stride);

        let tiled_at = |x: u32| -> *mut u8 {
            let block = row_block + (x >> block_bits_x) as usize;
            let offset = (block << block_bits) + (row_xor ^ addresser.address_x(x)) as usize;
            img.wrapping_add(offset)
        };
        let linear_at = |x: u32| -> *mut u8 { buf_row.wrapping_add((x as usize) << BPE_LOG2) };

        let mut x = x_start;
        while x < aligned_start {
            unsafe { D::copy(tiled_at(x), linear_at(x), 1 << BPE_LOG2) };
            x += 1;
        }

        while x < aligned_end {
            unsafe { D::copy(tiled_at(x), linear_at(x), (BATCH as usize) << BPE_LOG2) };
            x += BATCH;
        }

        while x < x_end {
            unsafe { D::copy(tiled_at(x), linear_at(x), 1 << BPE_LOG2) };
            x += 1;
        }
    }
}

/// Linear to tiled row copy for one element size and batch class.
///
/// # Safety
///
/// See [`super::CopyMemToImgFn`].
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn copy_mem_to_img<const BPE_LOG2: u32, const BATCH: u32>(
    img: *mut u8,
    buf: *const u8,
    buf_row_stride: usize,
    blocks_per_row: u32,
    origin: Coord2D,
    extent: Extent2D,
    slice_xor: u32,
    addresser: &Addresser,
) {
    unsafe {
        copy_2d_slice::<LinearToTiled, BPE_LOG2, BATCH>(
            img,
            buf as *mut u8,
            buf_row_stride,
            blocks_per_row,
            origin,
            extent,
            slice_xor,
            addresser,
        )
    }
}

/// Tiled to linear row copy for one element size and batch class.
///
/// # Safety
///
/// See [`super::CopyImgToMemFn`].
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn copy_img_to_mem<const BPE_LOG2: u32, const BATCH: u32>(
    buf: *mut u8,
    img: *const u8,
    buf_row_stride: usize,
    blocks_per_row: u32,
    origin: Coord2D,
    extent: Extent2D,
    slice_xor: u32,
    addresser: &Addresser,
) {
    unsafe {
        copy_2d_slice::<TiledToLinear, BPE_LOG2, BATCH>(
            img as *mut u8,
            buf,
            buf_row_stride,
            blocks_per_row,
            origin,
            extent,
            slice_xor,
            addresser,
        )
    }
}

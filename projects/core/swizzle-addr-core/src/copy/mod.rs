//! Bulk copies between tiled surfaces and linear memory.
//!
//! The copy routines are monomorphized per element size and per batch class, then stored
//! in static tables of function pointers. Pick one once per surface, either directly with
//! [`copy_fn_for_mem_to_img`] / [`copy_fn_for_img_to_mem`], or from an [`Addresser`] with
//! [`get_copy_mem_to_img_fn`] / [`get_copy_img_to_mem_fn`], then call it once per 2D slice.
//!
//! # Slice parameters
//!
//! Every routine takes the same geometry:
//!
//! - `img`: the first block of the slice (block `(0, 0)` of the slice's block layer).
//! - `buf`: the region's first element in linear memory.
//! - `buf_row_stride`: bytes between consecutive linear rows.
//! - `blocks_per_row`: blocks in one row of the tiled surface.
//! - `origin`, `extent`: the region, in elements, relative to the slice.
//! - `slice_xor`: pipe/bank XOR combined with the `z` and sample contributions
//!   ([`Addresser::address_z`], [`Addresser::address_s`]).

pub(crate) mod direction;
mod rows;

use crate::addresser::{Addresser, Coord2D, Extent2D};
use derive_enum_all_values::AllValues;
use rows::{copy_img_to_mem, copy_mem_to_img};

/// Largest supported element size, as log2 of bytes (16 byte elements).
pub const MAX_ELEMENT_SIZE_LOG2: u32 = 4;

/// Largest number of elements moved by a single batched copy.
pub const MAX_BATCH: u32 = 4;

/// Element sizes with a dedicated copy routine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AllValues)]
#[repr(u8)]
pub enum ElementSize {
    /// 1 byte per element.
    Bytes1 = 0,
    /// 2 bytes per element.
    Bytes2 = 1,
    /// 4 bytes per element.
    Bytes4 = 2,
    /// 8 bytes per element.
    Bytes8 = 3,
    /// 16 bytes per element.
    Bytes16 = 4,
}

impl ElementSize {
    /// Maps log2 of the element size in bytes to an [`ElementSize`].
    pub const fn from_log2(log2: u32) -> Option<Self> {
        match log2 {
            0 => Some(Self::Bytes1),
            1 => Some(Self::Bytes2),
            2 => Some(Self::Bytes4),
            3 => Some(Self::Bytes8),
            4 => Some(Self::Bytes16),
            _ => None,
        }
    }

    /// log2 of the element size in bytes.
    pub const fn log2(self) -> u32 {
        self as u32
    }

    /// Element size in bytes.
    pub const fn bytes(self) -> usize {
        1 << self.log2()
    }
}

/// How many adjacent elements a copy routine moves at once.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, AllValues)]
#[repr(u8)]
pub enum BatchClass {
    /// One element at a time.
    One = 0,
    /// Pairs of elements.
    Two = 1,
    /// Groups of four elements.
    Four = 2,
}

impl BatchClass {
    /// The class for an equation's `expand_x`. Anything at or above [`MAX_BATCH`] uses
    /// [`BatchClass::Four`].
    pub const fn from_expand_x(expand_x: u32) -> Self {
        match expand_x {
            0 | 1 => Self::One,
            2 | 3 => Self::Two,
            _ => Self::Four,
        }
    }

    /// Number of elements per batch.
    pub const fn elements(self) -> u32 {
        1 << self as u32
    }
}

/// Copies a region of one slice from linear memory into a tiled surface.
///
/// Arguments are `(img, buf, buf_row_stride, blocks_per_row, origin, extent, slice_xor,
/// addresser)`; see the [module docs](self).
///
/// # Safety
///
/// - Every block the region touches must be valid for writes of `2^block_size_bits` bytes.
/// - Each of the `extent.height` linear rows must be valid for reads of
///   `extent.width * element_size` bytes.
/// - The routine must match the addresser's element size, and its batch class must not
///   exceed the addresser's [`Addresser::batch_class`].
/// - `slice_xor` must not touch the element or batch bits of the offset and must keep
///   offsets inside the block.
/// - Source and destination must not overlap.
pub type CopyMemToImgFn = unsafe fn(
    img: *mut u8,
    buf: *const u8,
    buf_row_stride: usize,
    blocks_per_row: u32,
    origin: Coord2D,
    extent: Extent2D,
    slice_xor: u32,
    addresser: &Addresser,
);

/// Copies a region of one slice from a tiled surface into linear memory.
///
/// Arguments are `(buf, img, buf_row_stride, blocks_per_row, origin, extent, slice_xor,
/// addresser)`; see the [module docs](self).
///
/// # Safety
///
/// Same as [`CopyMemToImgFn`], with reads and writes swapped.
pub type CopyImgToMemFn = unsafe fn(
    buf: *mut u8,
    img: *const u8,
    buf_row_stride: usize,
    blocks_per_row: u32,
    origin: Coord2D,
    extent: Extent2D,
    slice_xor: u32,
    addresser: &Addresser,
);

macro_rules! copy_fn_table {
    ($func:ident, $ty:ty) => {
        [
            [$func::<0, 1> as $ty, $func::<0, 2> as $ty, $func::<0, 4> as $ty],
            [$func::<1, 1> as $ty, $func::<1, 2> as $ty, $func::<1, 4> as $ty],
            [$func::<2, 1> as $ty, $func::<2, 2> as $ty, $func::<2, 4> as $ty],
            [$func::<3, 1> as $ty, $func::<3, 2> as $ty, $func::<3, 4> as $ty],
            [$func::<4, 1> as $ty, $func::<4, 2> as $ty, $func::<4, 4> as $ty],
        ]
    };
}

static MEM_TO_IMG_FNS: [[CopyMemToImgFn; 3]; 5] = copy_fn_table!(copy_mem_to_img, CopyMemToImgFn);
static IMG_TO_MEM_FNS: [[CopyImgToMemFn; 3]; 5] = copy_fn_table!(copy_img_to_mem, CopyImgToMemFn);

/// Linear to tiled routine for `size` and `class`.
///
/// Does not check that an addresser supports `class`; that is part of the routine's
/// safety contract.
#[inline]
pub fn copy_fn_for_mem_to_img(size: ElementSize, class: BatchClass) -> CopyMemToImgFn {
    MEM_TO_IMG_FNS[size as usize][class as usize]
}

/// Tiled to linear routine for `size` and `class`.
///
/// Does not check that an addresser supports `class`; that is part of the routine's
/// safety contract.
#[inline]
pub fn copy_fn_for_img_to_mem(size: ElementSize, class: BatchClass) -> CopyImgToMemFn {
    IMG_TO_MEM_FNS[size as usize][class as usize]
}

/// Element size of `addresser`, panicking for sizes without a copy routine.
fn supported_element_size(addresser: &Addresser) -> ElementSize {
    let log2 = addresser.element_size_log2();
    match ElementSize::from_log2(log2) {
        Some(size) => size,
        None => panic!(
            "Unsupported element size of {} bytes, at most {} are supported",
            1u64 << log2,
            1 << MAX_ELEMENT_SIZE_LOG2
        ),
    }
}

/// Linear to tiled routine for the addresser's element size and batch class.
///
/// # Panics
///
/// If the element size is above 16 bytes.
pub fn get_copy_mem_to_img_fn(addresser: &Addresser) -> CopyMemToImgFn {
    copy_fn_for_mem_to_img(supported_element_size(addresser), addresser.batch_class())
}

/// Tiled to linear routine for the addresser's element size and batch class.
///
/// # Panics
///
/// If the element size is above 16 bytes.
pub fn get_copy_img_to_mem_fn(addresser: &Addresser) -> CopyImgToMemFn {
    copy_fn_for_img_to_mem(supported_element_size(addresser), addresser.batch_class())
}

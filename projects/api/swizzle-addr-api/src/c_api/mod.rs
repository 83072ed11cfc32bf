//! # C API (FFI)
//!
//! *Note: The C API is only available when the `c-exports` feature is enabled.*
//!
//! Addressers are created from an equation and a block shape, used for any number of
//! offset queries and copies, then freed. Handles are immutable and may be shared
//! between threads.
//!
//! ## Example Usage
//!
//! ```c
//! SwizzleAddrAddresser* addresser = NULL;
//! SwizzleAddrResult result = swizzle_addr_addresser_create(
//!     "0 x0 x1 y0 y1 x2 y2", 8, 8, 1, 7, &addresser);
//! if (result.error_code != SWIZZLE_ADDR_SUCCESS) {
//!     printf("%s\n", swizzle_addr_error_message(result.error_code));
//!     return;
//! }
//!
//! SwizzleAddrSurface surface = { .width = 64, .height = 64, .depth = 1, .pipe_bank_xor = 0 };
//! SwizzleAddrCopyRegion region = { 0, 0, 0, 64, 64, 1, 0 };
//! SwizzleAddrLinearLayout layout = { .row_pitch = 128, .slice_pitch = 128 * 64 };
//!
//! size_t tiled_len = 0;
//! swizzle_addr_tiled_size(addresser, surface, &tiled_len);
//! uint8_t* tiled = calloc(tiled_len, 1);
//!
//! result = swizzle_addr_copy_linear_to_tiled(
//!     addresser, surface, region, layout, tiled, tiled_len, pixels, 128 * 64);
//!
//! free(tiled);
//! swizzle_addr_addresser_destroy(addresser);
//! ```
//!
//! Functions taking pointers return a [`SwizzleAddrResult`]; use
//! [`swizzle_addr_error_message`] to describe a failure.
//!
//! [`swizzle_addr_error_message`]: error::swizzle_addr_error_message

pub mod addresser;
pub mod copy;
pub mod error;

pub use error::{SwizzleAddrErrorCode, SwizzleAddrResult};

use crate::surface::{CopyRegion, LinearLayout};

/// Size and pipe/bank XOR of a tiled surface.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct SwizzleAddrSurface {
    /// Width in elements.
    pub width: u32,
    /// Height in elements.
    pub height: u32,
    /// Depth in elements.
    pub depth: u32,
    /// XOR applied to every offset.
    pub pipe_bank_xor: u32,
}

/// FFI-safe version of [`CopyRegion`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct SwizzleAddrCopyRegion {
    /// First column.
    pub x: u32,
    /// First row.
    pub y: u32,
    /// First slice.
    pub z: u32,
    /// Columns to copy.
    pub width: u32,
    /// Rows to copy.
    pub height: u32,
    /// Slices to copy.
    pub depth: u32,
    /// Sample index.
    pub sample: u32,
}

/// FFI-safe version of [`LinearLayout`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct SwizzleAddrLinearLayout {
    /// Bytes between rows.
    pub row_pitch: usize,
    /// Bytes between slices.
    pub slice_pitch: usize,
}

impl From<SwizzleAddrCopyRegion> for CopyRegion {
    fn from(region: SwizzleAddrCopyRegion) -> Self {
        Self {
            x: region.x,
            y: region.y,
            z: region.z,
            width: region.width,
            height: region.height,
            depth: region.depth,
            sample: region.sample,
        }
    }
}

impl From<SwizzleAddrLinearLayout> for LinearLayout {
    fn from(layout: SwizzleAddrLinearLayout) -> Self {
        Self::new(layout.row_pitch, layout.slice_pitch)
    }
}

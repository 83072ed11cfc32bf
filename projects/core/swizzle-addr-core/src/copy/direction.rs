//! Copy direction for the shared row copy loops.
//!
//! The row loops are written once and only know about a "tiled" and a "linear" pointer.
//! Which one is read and which one is written is decided here, so the same loop serves
//! both uploads and downloads.

use core::ptr::copy_nonoverlapping;

/// Moves bytes between a tiled location and a linear location.
pub(crate) trait CopyDirection {
    /// Copies `bytes` bytes between `tiled` and `linear`.
    ///
    /// # Safety
    ///
    /// Both pointers must be valid for `bytes` bytes, the source for reads and the
    /// destination for writes. The ranges must not overlap.
    unsafe fn copy(tiled: *mut u8, linear: *mut u8, bytes: usize);
}

/// Reads linear memory, writes the tiled surface.
pub(crate) struct LinearToTiled;

impl CopyDirection for LinearToTiled {
    #[inline(always)]
    unsafe fn copy(tiled: *mut u8, linear: *mut u8, bytes: usize) {
        // Backwards from memcpy.
        unsafe { copy_nonoverlapping(linear as *const u8, tiled, bytes) };
    }
}

/// Reads the tiled surface, writes linear memory.
pub(crate) struct TiledToLinear;

impl CopyDirection for TiledToLinear {
    #[inline(always)]
    unsafe fn copy(tiled: *mut u8, linear: *mut u8, bytes: usize) {
        unsafe { copy_nonoverlapping(tiled as *const u8, linear, bytes) };
    }
}

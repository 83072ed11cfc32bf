//! Error types for addresser construction and copies.

use swizzle_addr_core::allocate::AllocateError;
use swizzle_addr_core::{EquationError, ParseEquationError};
use thiserror::Error;

/// Errors that can occur while building an [`Addresser`](swizzle_addr_core::Addresser).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddresserError {
    /// The equation text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseEquationError),

    /// The equation is structurally invalid (too long, or has a gap).
    #[error(transparent)]
    Equation(#[from] EquationError),

    /// A block dimension is zero or not a power of two.
    #[error("Invalid block size {width}x{height}x{depth}: every dimension must be a nonzero power of two.")]
    InvalidBlockSize {
        /// Block width in elements
        width: u32,
        /// Block height in elements
        height: u32,
        /// Block depth in elements
        depth: u32,
    },

    /// The block size in bits is too large to address.
    #[error("Block size of 2^{block_bits} bytes is too large, at most 2^{max} bytes are supported.")]
    BlockBitsTooLarge {
        /// Requested log2 of the block size in bytes
        block_bits: u32,
        /// Largest supported value
        max: u32,
    },

    /// The equation produces offsets past the end of the block.
    #[error("Equation has {valid_len} address bits, but blocks only span {block_bits} bits.")]
    EquationExceedsBlock {
        /// Index one past the highest valid equation bit
        valid_len: usize,
        /// log2 of the block size in bytes
        block_bits: u32,
    },

    /// The block's elements do not fit in the block's bytes.
    #[error("A block of elements needs 2^{needed} bytes, but blocks only span 2^{block_bits} bytes.")]
    BlockShapeExceedsBlock {
        /// log2 of the bytes the block's elements occupy
        needed: u32,
        /// log2 of the block size in bytes
        block_bits: u32,
    },

    /// The equation maps two elements of a block to the same offset.
    #[error("Equation distinguishes only {distinct_bits} of the {needed} coordinate bits inside a block, so elements would overlap.")]
    BlockElementsOverlap {
        /// Independent block coordinate bits the equation carries
        distinct_bits: u32,
        /// Coordinate bits needed to address every element of the block
        needed: u32,
    },

    /// Batched copies would cross a block boundary.
    #[error("Equation batches {batch} elements, but blocks are only {width} elements wide.")]
    BatchExceedsBlockWidth {
        /// Elements per batched copy
        batch: u32,
        /// Block width in elements
        width: u32,
    },

    /// The lookup tables would not fit in their fixed backing storage.
    #[error("Lookup tables need {required} entries, but only {capacity} are available.")]
    LutCapacityExceeded {
        /// Entries needed, including the shared zero slot
        required: usize,
        /// Backing capacity
        capacity: usize,
    },
}

/// Errors that can occur during copies between tiled surfaces and linear memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopyError {
    /// The element size has no copy routine.
    #[error("Unsupported element size of {bytes} bytes, at most 16 are supported.")]
    UnsupportedElementSize {
        /// Element size in bytes
        bytes: u64,
    },

    /// The region reaches outside the surface.
    #[error("Copy region {x},{y},{z} ({width}x{height}x{depth}) is outside the {surface_width}x{surface_height}x{surface_depth} surface.")]
    RegionOutOfBounds {
        /// Region start X
        x: u32,
        /// Region start Y
        y: u32,
        /// Region start Z
        z: u32,
        /// Region width
        width: u32,
        /// Region height
        height: u32,
        /// Region depth
        depth: u32,
        /// Surface width
        surface_width: u32,
        /// Surface height
        surface_height: u32,
        /// Surface depth
        surface_depth: u32,
    },

    /// The linear row pitch is smaller than one row of the region.
    #[error("Row pitch of {row_pitch} bytes is smaller than a {row_bytes} byte row.")]
    RowPitchTooSmall {
        /// Row pitch in bytes
        row_pitch: usize,
        /// Bytes in one row of the region
        row_bytes: usize,
    },

    /// The linear slice pitch is smaller than one slice of the region.
    #[error("Slice pitch of {slice_pitch} bytes is smaller than a {slice_bytes} byte slice.")]
    SlicePitchTooSmall {
        /// Slice pitch in bytes
        slice_pitch: usize,
        /// Bytes spanned by one slice of the region
        slice_bytes: usize,
    },

    /// The linear buffer is too small for the region.
    #[error("Linear buffer too small: need {needed} bytes, but only {actual} bytes available.")]
    LinearBufferTooSmall {
        /// The required size in bytes
        needed: usize,
        /// The actual size in bytes
        actual: usize,
    },

    /// The tiled buffer is too small for the surface.
    #[error("Tiled buffer too small: need {needed} bytes, but only {actual} bytes available.")]
    TiledBufferTooSmall {
        /// The required size in bytes
        needed: usize,
        /// The actual size in bytes
        actual: usize,
    },

    /// The pipe/bank XOR reaches outside the block.
    #[error("Pipe/bank XOR {pipe_bank_xor:#x} does not fit in a 2^{block_bits} byte block.")]
    PipeBankXorOutOfBlock {
        /// The pipe/bank XOR
        pipe_bank_xor: u32,
        /// log2 of the block size in bytes
        block_bits: u32,
    },

    /// The pipe/bank XOR would split elements or batched runs.
    #[error("Pipe/bank XOR {pipe_bank_xor:#x} touches the low {low_bits} offset bits.")]
    PipeBankXorMisaligned {
        /// The pipe/bank XOR
        pipe_bank_xor: u32,
        /// Number of low offset bits that must be zero
        low_bits: u32,
    },

    /// The addresser was not one [`AddresserBuilder`](crate::AddresserBuilder) accepts.
    #[error("Addresser cannot back a tiled surface: {0}")]
    InvalidAddresser(#[from] AddresserError),

    /// A size computation overflowed `usize`.
    #[error("Surface or region size overflows the address space.")]
    SizeOverflow,

    /// Allocating a buffer failed.
    #[error("Memory allocation failed: {0}")]
    AllocationFailed(#[from] AllocateError),
}

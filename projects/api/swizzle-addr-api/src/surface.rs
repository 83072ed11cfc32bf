//! Tiled surfaces: full byte offsets and validated copies over slices.

use crate::builder::AddresserBuilder;
use crate::error::CopyError;
use likely_stable::unlikely;
use safe_allocator_api::RawAlloc;
use swizzle_addr_core::allocate::allocate_zeroed_align_64;
use swizzle_addr_core::{
    Addresser, Coord2D, ElementSize, Extent2D, get_copy_img_to_mem_fn, get_copy_mem_to_img_fn,
};

/// A box of elements to copy, optionally on a specific sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CopyRegion {
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
    /// Sample index, for multisampled surfaces.
    pub sample: u32,
}

impl CopyRegion {
    /// A 2D region on slice 0, sample 0.
    pub const fn new_2d(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            z: 0,
            width,
            height,
            depth: 1,
            sample: 0,
        }
    }

    /// A 3D region on sample 0.
    pub const fn new_3d(x: u32, y: u32, z: u32, width: u32, height: u32, depth: u32) -> Self {
        Self {
            x,
            y,
            z,
            width,
            height,
            depth,
            sample: 0,
        }
    }

    /// The same region on another sample.
    pub const fn with_sample(mut self, sample: u32) -> Self {
        self.sample = sample;
        self
    }

    /// Whether the region contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == 0
    }
}

/// Layout of the linear side of a copy. The buffer starts at the region's first element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LinearLayout {
    /// Bytes between the starts of consecutive rows.
    pub row_pitch: usize,
    /// Bytes between the starts of consecutive slices.
    pub slice_pitch: usize,
}

impl LinearLayout {
    /// Creates a layout with explicit pitches.
    pub const fn new(row_pitch: usize, slice_pitch: usize) -> Self {
        Self {
            row_pitch,
            slice_pitch,
        }
    }

    /// Tightly packed rows and slices for `region` with `element_bytes` sized elements.
    pub const fn packed(region: &CopyRegion, element_bytes: usize) -> Self {
        let row_pitch = region.width as usize * element_bytes;
        Self {
            row_pitch,
            slice_pitch: row_pitch * region.height as usize,
        }
    }
}

/// A tiled surface made of whole blocks, described by an [`Addresser`].
///
/// Blocks are laid out row by row, and block rows slice by slice. The surface does not
/// own memory: copies take the tiled bytes as a slice at least
/// [`TiledSurface::tiled_size`] long.
///
/// # Examples
///
/// ```
/// use swizzle_addr_api::{AddresserBuilder, CopyRegion, LinearLayout, TiledSurface};
/// use swizzle_addr_core::Extent3D;
///
/// let addresser = AddresserBuilder::from_text("0 x0 x1 y0 y1 x2 y2")?
///     .block_size(Extent3D::new(8, 8, 1))
///     .block_bits(7)
///     .build()?;
/// let surface = TiledSurface::new(&addresser, 20, 10, 1)?;
///
/// let region = CopyRegion::new_2d(3, 2, 9, 5);
/// let layout = LinearLayout::packed(&region, 2);
/// let linear: Vec<u8> = (0..9 * 5 * 2).map(|i| i as u8).collect();
/// let mut tiled = vec![0u8; surface.tiled_size()?];
/// let mut restored = vec![0u8; linear.len()];
///
/// surface.copy_linear_to_tiled(&mut tiled, &linear, layout, region)?;
/// surface.copy_tiled_to_linear(&mut restored, &tiled, layout, region)?;
/// assert_eq!(linear, restored);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TiledSurface<'a> {
    addresser: &'a Addresser,
    width: u32,
    height: u32,
    depth: u32,
    blocks_per_row: u32,
    block_rows: u32,
    block_slices: u32,
    pipe_bank_xor: u32,
}

impl<'a> TiledSurface<'a> {
    /// A surface of `width` x `height` x `depth` elements, padded to whole blocks.
    ///
    /// # Errors
    ///
    /// [`CopyError::InvalidAddresser`] if `addresser` fails any check of
    /// [`AddresserBuilder::validate`]. Addressers made with [`Addresser::new`] skip those
    /// checks, and copies rely on them to stay inside the tiled buffer.
    pub fn new(
        addresser: &'a Addresser,
        width: u32,
        height: u32,
        depth: u32,
    ) -> Result<Self, CopyError> {
        AddresserBuilder::from_addresser(addresser).validate()?;

        let block = addresser.block_size();
        Ok(Self {
            addresser,
            width,
            height,
            depth,
            blocks_per_row: width.div_ceil(block.width),
            block_rows: height.div_ceil(block.height),
            block_slices: depth.div_ceil(block.depth),
            pipe_bank_xor: 0,
        })
    }

    /// Sets the pipe/bank XOR applied to every offset of the surface.
    ///
    /// # Errors
    ///
    /// - [`CopyError::PipeBankXorOutOfBlock`] if it has bits at or above the block size
    /// - [`CopyError::PipeBankXorMisaligned`] if it has bits inside an element or a batched run
    pub fn with_pipe_bank_xor(mut self, pipe_bank_xor: u32) -> Result<Self, CopyError> {
        let block_bits = self.addresser.block_size_bits();
        if unlikely((pipe_bank_xor as u64) >> block_bits != 0) {
            return Err(CopyError::PipeBankXorOutOfBlock {
                pipe_bank_xor,
                block_bits,
            });
        }

        let low_bits = self.addresser.element_size_log2()
            + self.addresser.batch_class().elements().trailing_zeros();
        if unlikely(pipe_bank_xor & ((1u32 << low_bits) - 1) != 0) {
            return Err(CopyError::PipeBankXorMisaligned {
                pipe_bank_xor,
                low_bits,
            });
        }

        self.pipe_bank_xor = pipe_bank_xor;
        Ok(self)
    }

    /// The addresser describing the surface's blocks.
    pub fn addresser(&self) -> &'a Addresser {
        self.addresser
    }

    /// Surface size in elements, as `(width, height, depth)`.
    pub fn size(&self) -> (u32, u32, u32) {
        (self.width, self.height, self.depth)
    }

    /// Blocks in one row of the surface.
    pub fn blocks_per_row(&self) -> u32 {
        self.blocks_per_row
    }

    /// Rows of blocks in one block slice.
    pub fn block_rows(&self) -> u32 {
        self.block_rows
    }

    /// Slices of blocks.
    pub fn block_slices(&self) -> u32 {
        self.block_slices
    }

    /// The pipe/bank XOR applied to every offset.
    pub fn pipe_bank_xor(&self) -> u32 {
        self.pipe_bank_xor
    }

    /// Bytes the tiled surface occupies.
    pub fn tiled_size(&self) -> Result<usize, CopyError> {
        (self.blocks_per_row as usize)
            .checked_mul(self.block_rows as usize)
            .and_then(|blocks| blocks.checked_mul(self.block_slices as usize))
            .and_then(|blocks| blocks.checked_mul(1usize << self.addresser.block_size_bits()))
            .ok_or(CopyError::SizeOverflow)
    }

    /// Allocates a zeroed, 64 byte aligned buffer for the tiled surface.
    pub fn allocate_tiled(&self) -> Result<RawAlloc, CopyError> {
        Ok(allocate_zeroed_align_64(self.tiled_size()?)?)
    }

    /// Byte offset of an element from the start of the tiled surface.
    ///
    /// Coordinates are not checked against the surface size.
    #[inline]
    pub fn element_offset(&self, x: u32, y: u32, z: u32, sample: u32) -> usize {
        let addresser = self.addresser;
        let block = ((z >> addresser.block_size_bits_z()) as usize * self.block_rows as usize
            + (y >> addresser.block_size_bits_y()) as usize)
            * self.blocks_per_row as usize
            + (x >> addresser.block_size_bits_x()) as usize;
        (block << addresser.block_size_bits())
            + addresser.block_offset(x, y, z, sample, self.pipe_bank_xor) as usize
    }

    /// Copies `region` from linear memory into the tiled surface.
    ///
    /// `linear` starts at the region's first element and is laid out by `layout`.
    ///
    /// # Errors
    ///
    /// Returns a [`CopyError`] if the element size has no copy routine, or the region,
    /// layout or buffers do not fit. Nothing is written on error.
    pub fn copy_linear_to_tiled(
        &self,
        tiled: &mut [u8],
        linear: &[u8],
        layout: LinearLayout,
        region: CopyRegion,
    ) -> Result<(), CopyError> {
        self.validate_copy(tiled.len(), linear.len(), &layout, &region)?;
        if region.is_empty() {
            return Ok(());
        }

        let copy = get_copy_mem_to_img_fn(self.addresser);
        for slice in 0..region.depth {
            let z = region.z + slice;
            // SAFETY: the addresser was validated in `new`, the pipe/bank XOR when it was set,
            // and `validate_copy` checked the region, pitches and buffer sizes.
            unsafe {
                copy(
                    tiled.as_mut_ptr().add(self.slice_base(z)),
                    linear.as_ptr().add(slice as usize * layout.slice_pitch),
                    layout.row_pitch,
                    self.blocks_per_row,
                    Coord2D::new(region.x, region.y),
                    Extent2D::new(region.width, region.height),
                    self.slice_xor(z, region.sample),
                    self.addresser,
                );
            }
        }

        Ok(())
    }

    /// Copies `region` from the tiled surface into linear memory.
    ///
    /// `linear` starts at the region's first element and is laid out by `layout`.
    ///
    /// # Errors
    ///
    /// Returns a [`CopyError`] if the element size has no copy routine, or the region,
    /// layout or buffers do not fit. Nothing is written on error.
    pub fn copy_tiled_to_linear(
        &self,
        linear: &mut [u8],
        tiled: &[u8],
        layout: LinearLayout,
        region: CopyRegion,
    ) -> Result<(), CopyError> {
        self.validate_copy(tiled.len(), linear.len(), &layout, &region)?;
        if region.is_empty() {
            return Ok(());
        }

        let copy = get_copy_img_to_mem_fn(self.addresser);
        for slice in 0..region.depth {
            let z = region.z + slice;
            // SAFETY: the addresser was validated in `new`, the pipe/bank XOR when it was set,
            // and `validate_copy` checked the region, pitches and buffer sizes.
            unsafe {
                copy(
                    linear.as_mut_ptr().add(slice as usize * layout.slice_pitch),
                    tiled.as_ptr().add(self.slice_base(z)),
                    layout.row_pitch,
                    self.blocks_per_row,
                    Coord2D::new(region.x, region.y),
                    Extent2D::new(region.width, region.height),
                    self.slice_xor(z, region.sample),
                    self.addresser,
                );
            }
        }

        Ok(())
    }

    /// Byte offset of the first block of the block slice holding `z`.
    #[inline]
    fn slice_base(&self, z: u32) -> usize {
        let layer = (z >> self.addresser.block_size_bits_z()) as usize;
        (layer * self.block_rows as usize * self.blocks_per_row as usize)
            << self.addresser.block_size_bits()
    }

    #[inline]
    fn slice_xor(&self, z: u32, sample: u32) -> u32 {
        self.pipe_bank_xor ^ self.addresser.address_z(z) ^ self.addresser.address_s(sample)
    }

    fn validate_copy(
        &self,
        tiled_len: usize,
        linear_len: usize,
        layout: &LinearLayout,
        region: &CopyRegion,
    ) -> Result<(), CopyError> {
        let element_size_log2 = self.addresser.element_size_log2();
        let Some(element_size) = ElementSize::from_log2(element_size_log2) else {
            return Err(CopyError::UnsupportedElementSize {
                bytes: 1u64 << element_size_log2,
            });
        };

        let fits = |start: u32, len: u32, size: u32| {
            start.checked_add(len).is_some_and(|end| end <= size)
        };
        if unlikely(
            !fits(region.x, region.width, self.width)
                || !fits(region.y, region.height, self.height)
                || !fits(region.z, region.depth, self.depth),
        ) {
            return Err(CopyError::RegionOutOfBounds {
                x: region.x,
                y: region.y,
                z: region.z,
                width: region.width,
                height: region.height,
                depth: region.depth,
                surface_width: self.width,
                surface_height: self.height,
                surface_depth: self.depth,
            });
        }

        let tiled_needed = self.tiled_size()?;
        if unlikely(tiled_len < tiled_needed) {
            return Err(CopyError::TiledBufferTooSmall {
                needed: tiled_needed,
                actual: tiled_len,
            });
        }

        if region.is_empty() {
            return Ok(());
        }

        let row_bytes = (region.width as usize)
            .checked_mul(element_size.bytes())
            .ok_or(CopyError::SizeOverflow)?;
        if unlikely(region.height > 1 && layout.row_pitch < row_bytes) {
            return Err(CopyError::RowPitchTooSmall {
                row_pitch: layout.row_pitch,
                row_bytes,
            });
        }

        let slice_bytes = layout
            .row_pitch
            .checked_mul(region.height as usize - 1)
            .and_then(|rows| rows.checked_add(row_bytes))
            .ok_or(CopyError::SizeOverflow)?;
        if unlikely(region.depth > 1 && layout.slice_pitch < slice_bytes) {
            return Err(CopyError::SlicePitchTooSmall {
                slice_pitch: layout.slice_pitch,
                slice_bytes,
            });
        }

        let linear_needed = layout
            .slice_pitch
            .checked_mul(region.depth as usize - 1)
            .and_then(|slices| slices.checked_add(slice_bytes))
            .ok_or(CopyError::SizeOverflow)?;
        if unlikely(linear_len < linear_needed) {
            return Err(CopyError::LinearBufferTooSmall {
                needed: linear_needed,
                actual: linear_len,
            });
        }

        Ok(())
    }
}

//! Validated construction of [`Addresser`]s.

use crate::error::AddresserError;
use likely_stable::unlikely;
use swizzle_addr_core::properties::block_coordinate_rank;
use swizzle_addr_core::{
    Addresser, BitEquation, BitSetting, Extent3D, LUT_CAPACITY, MAX_BATCH, required_entries,
};

/// Largest supported `block_bits` (2GiB blocks).
pub const MAX_BLOCK_BITS: u32 = 31;

/// Builder for [`Addresser`]s that reports invalid configurations as errors.
///
/// [`Addresser::new`] asserts on bad input. This builder checks everything the core
/// relies on first, so untrusted equations and block shapes never reach an assertion.
///
/// # Examples
///
/// ```
/// use swizzle_addr_api::AddresserBuilder;
/// use swizzle_addr_core::Extent3D;
///
/// let addresser = AddresserBuilder::from_text("0 x0 x1 y0 y1 x2 y2")?
///     .block_size(Extent3D::new(8, 8, 1))
///     .block_bits(7)
///     .build()?;
/// assert_eq!(addresser.expand_x(), 4);
/// # Ok::<(), swizzle_addr_api::AddresserError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AddresserBuilder {
    equation: BitEquation,
    block_size: Extent3D,
    block_bits: u32,
}

impl AddresserBuilder {
    /// Starts a builder for `equation`.
    ///
    /// The block defaults to `1x1x1` elements and `block_bits` to the equation's length;
    /// set both to match the surface.
    pub fn new(equation: BitEquation) -> Self {
        Self {
            equation,
            block_size: Extent3D::new(1, 1, 1),
            block_bits: equation.valid_len() as u32,
        }
    }

    /// Starts a builder from per-bit settings, least significant bit first.
    pub fn from_bits(bits: &[BitSetting]) -> Result<Self, AddresserError> {
        Ok(Self::new(BitEquation::try_from_bits(bits)?))
    }

    /// Starts a builder from the equation text form, e.g. `0 x0 x1 y0 y1^x2`.
    pub fn from_text(text: &str) -> Result<Self, AddresserError> {
        Ok(Self::new(text.parse()?))
    }

    /// Starts a builder with the configuration of an existing addresser.
    ///
    /// [`AddresserBuilder::validate`] then reports whether `addresser` is one the builder
    /// would have produced.
    pub fn from_addresser(addresser: &Addresser) -> Self {
        Self {
            equation: *addresser.equation(),
            block_size: addresser.block_size(),
            block_bits: addresser.block_size_bits(),
        }
    }

    /// Sets the block dimensions in elements.
    pub fn block_size(mut self, block_size: Extent3D) -> Self {
        self.block_size = block_size;
        self
    }

    /// Sets log2 of the block size in bytes.
    pub fn block_bits(mut self, block_bits: u32) -> Self {
        self.block_bits = block_bits;
        self
    }

    /// Validates the configuration without building.
    ///
    /// # Errors
    ///
    /// - [`AddresserError::InvalidBlockSize`] if a dimension is not a nonzero power of two
    /// - [`AddresserError::BlockBitsTooLarge`] if `block_bits` exceeds [`MAX_BLOCK_BITS`]
    /// - [`AddresserError::Equation`] if the equation has a gap
    /// - [`AddresserError::EquationExceedsBlock`] if the equation is longer than `block_bits`
    /// - [`AddresserError::BlockShapeExceedsBlock`] if the block's elements need more bytes
    /// - [`AddresserError::BlockElementsOverlap`] if two elements of a block share an offset
    /// - [`AddresserError::BatchExceedsBlockWidth`] if batched copies would leave the block
    /// - [`AddresserError::LutCapacityExceeded`] if the lookup tables do not fit
    pub fn validate(&self) -> Result<(), AddresserError> {
        let Extent3D {
            width,
            height,
            depth,
        } = self.block_size;
        if unlikely(
            !width.is_power_of_two() || !height.is_power_of_two() || !depth.is_power_of_two(),
        ) {
            return Err(AddresserError::InvalidBlockSize {
                width,
                height,
                depth,
            });
        }

        if unlikely(self.block_bits > MAX_BLOCK_BITS) {
            return Err(AddresserError::BlockBitsTooLarge {
                block_bits: self.block_bits,
                max: MAX_BLOCK_BITS,
            });
        }

        self.equation.validate()?;

        let valid_len = self.equation.valid_len();
        if unlikely(valid_len > self.block_bits as usize) {
            return Err(AddresserError::EquationExceedsBlock {
                valid_len,
                block_bits: self.block_bits,
            });
        }

        let element_size_log2 = swizzle_addr_core::properties::element_size_log2(&self.equation);
        let needed = element_size_log2
            + width.trailing_zeros()
            + height.trailing_zeros()
            + depth.trailing_zeros();
        if unlikely(needed > self.block_bits) {
            return Err(AddresserError::BlockShapeExceedsBlock {
                needed,
                block_bits: self.block_bits,
            });
        }

        let coordinate_bits = needed - element_size_log2;
        let rank = block_coordinate_rank(&self.equation, self.block_size);
        if unlikely(rank < coordinate_bits) {
            return Err(AddresserError::BlockElementsOverlap {
                distinct_bits: rank,
                needed: coordinate_bits,
            });
        }

        let expand_x =
            swizzle_addr_core::properties::expand_x(&self.equation, element_size_log2);
        let batch = expand_x.min(MAX_BATCH);
        if unlikely(batch > width) {
            return Err(AddresserError::BatchExceedsBlockWidth { batch, width });
        }

        let required = required_entries(&self.equation);
        if unlikely(required > LUT_CAPACITY) {
            return Err(AddresserError::LutCapacityExceeded {
                required,
                capacity: LUT_CAPACITY,
            });
        }

        Ok(())
    }

    /// Validates the configuration and builds the [`Addresser`].
    ///
    /// # Errors
    ///
    /// See [`AddresserBuilder::validate`].
    pub fn build(&self) -> Result<Addresser, AddresserError> {
        self.validate()?;
        Ok(Addresser::new(&self.equation, self.block_size, self.block_bits))
    }
}

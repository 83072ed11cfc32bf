//! The [`Addresser`]: O(1) intra-block offsets for one swizzle equation and block shape.

use crate::copy::BatchClass;
use crate::equation::{Axis, BitEquation};
use crate::lut::LutTables;
use crate::properties::SwizzleProperties;
use core::fmt;

/// Size of a block in elements along each axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Extent3D {
    /// Width in elements.
    pub width: u32,
    /// Height in elements.
    pub height: u32,
    /// Depth in elements (slices).
    pub depth: u32,
}

impl Extent3D {
    /// Creates a new extent.
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

/// A 2D position, in elements.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Coord2D {
    /// Horizontal position.
    pub x: u32,
    /// Vertical position.
    pub y: u32,
}

impl Coord2D {
    /// Creates a new coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A 2D size, in elements.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Extent2D {
    /// Width in elements.
    pub width: u32,
    /// Height in elements.
    pub height: u32,
}

impl Extent2D {
    /// Creates a new extent.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Computes byte offsets inside a tiled block from element coordinates.
///
/// Built once per distinct equation and block shape, then shared read-only. Construction
/// derives the [`SwizzleProperties`] and fills one lookup table per axis, after which every
/// offset is four table lookups XORed together.
///
/// ```
/// use swizzle_addr_core::{Addresser, BitEquation, Extent3D, evaluate_equation};
///
/// let equation: BitEquation = "0 0 x0 y0 x1 y1 x2 y2".parse().unwrap();
/// let addresser = Addresser::new(&equation, Extent3D::new(8, 8, 1), 8);
///
/// assert_eq!(addresser.element_size_log2(), 2);
/// assert_eq!(
///     addresser.block_offset(5, 3, 0, 0, 0),
///     evaluate_equation(&equation, 5, 3, 0, 0)
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Addresser {
    equation: BitEquation,
    block_size_bits: u32,
    block_size: Extent3D,
    block_size_bits_xyz: [u32; 3],
    properties: SwizzleProperties,
    luts: LutTables,
}

impl Addresser {
    /// Creates an addresser for `equation` on blocks of `block_size` elements that span
    /// `2^block_size_bits` bytes.
    ///
    /// # Panics
    ///
    /// - If any block dimension is not a nonzero power of two.
    /// - If the lookup tables do not fit in [`crate::LUT_CAPACITY`] entries.
    ///
    /// Use the validating builder of the API crate when the inputs are not trusted.
    pub fn new(equation: &BitEquation, block_size: Extent3D, block_size_bits: u32) -> Self {
        assert!(
            block_size.width.is_power_of_two()
                && block_size.height.is_power_of_two()
                && block_size.depth.is_power_of_two(),
            "Block dimensions must be nonzero powers of two, got {}x{}x{}",
            block_size.width,
            block_size.height,
            block_size.depth
        );
        debug_assert!(equation.validate().is_ok(), "Equation has a gap: {equation:?}");

        let properties = SwizzleProperties::analyze(equation);
        let luts = LutTables::build(equation);

        tracing::debug!(
            element_size_log2 = properties.element_size_log2,
            expand_x = properties.expand_x,
            mask_x = luts.mask(Axis::X),
            mask_y = luts.mask(Axis::Y),
            mask_z = luts.mask(Axis::Z),
            mask_s = luts.mask(Axis::Sample),
            lut_entries = luts.used(),
            block_size_bits,
            "Initialized addresser"
        );

        Self {
            equation: *equation,
            block_size_bits,
            block_size,
            block_size_bits_xyz: [
                block_size.width.trailing_zeros(),
                block_size.height.trailing_zeros(),
                block_size.depth.trailing_zeros(),
            ],
            properties,
            luts,
        }
    }

    /// Offset contribution of a single axis. Coordinates wrap at the table size.
    #[inline(always)]
    pub fn axis_offset(&self, axis: Axis, coord: u32) -> u32 {
        self.luts.lookup(axis, coord)
    }

    /// Offset contribution of `x`.
    #[inline(always)]
    pub fn address_x(&self, x: u32) -> u32 {
        self.luts.lookup(Axis::X, x)
    }

    /// Offset contribution of `y`.
    #[inline(always)]
    pub fn address_y(&self, y: u32) -> u32 {
        self.luts.lookup(Axis::Y, y)
    }

    /// Offset contribution of `z`.
    #[inline(always)]
    pub fn address_z(&self, z: u32) -> u32 {
        self.luts.lookup(Axis::Z, z)
    }

    /// Offset contribution of the sample index.
    #[inline(always)]
    pub fn address_s(&self, sample: u32) -> u32 {
        self.luts.lookup(Axis::Sample, sample)
    }

    /// Byte offset of an element inside its block.
    ///
    /// `pipe_bank_xor` is XORed into the result as is.
    #[inline(always)]
    pub fn block_offset(&self, x: u32, y: u32, z: u32, sample: u32, pipe_bank_xor: u32) -> u32 {
        self.address_x(x)
            ^ self.address_y(y)
            ^ self.address_z(z)
            ^ self.address_s(sample)
            ^ pipe_bank_xor
    }

    /// log2 of the block size in bytes.
    #[inline(always)]
    pub fn block_size_bits(&self) -> u32 {
        self.block_size_bits
    }

    /// log2 of the block width in elements.
    #[inline(always)]
    pub fn block_size_bits_x(&self) -> u32 {
        self.block_size_bits_xyz[0]
    }

    /// log2 of the block height in elements.
    #[inline(always)]
    pub fn block_size_bits_y(&self) -> u32 {
        self.block_size_bits_xyz[1]
    }

    /// log2 of the block depth in elements.
    #[inline(always)]
    pub fn block_size_bits_z(&self) -> u32 {
        self.block_size_bits_xyz[2]
    }

    /// Block dimensions in elements.
    pub fn block_size(&self) -> Extent3D {
        self.block_size
    }

    /// The equation this addresser was built from.
    pub fn equation(&self) -> &BitEquation {
        &self.equation
    }

    /// log2 of the element size in bytes.
    #[inline(always)]
    pub fn element_size_log2(&self) -> u32 {
        self.properties.element_size_log2
    }

    /// Number of horizontally adjacent elements stored contiguously.
    #[inline(always)]
    pub fn expand_x(&self) -> u32 {
        self.properties.expand_x
    }

    /// Both derived properties.
    pub fn properties(&self) -> SwizzleProperties {
        self.properties
    }

    /// Batch class the copy dispatcher picks for this addresser.
    pub fn batch_class(&self) -> BatchClass {
        BatchClass::from_expand_x(self.properties.expand_x)
    }

    /// The lookup table of `axis`. Axes that do not take part in the equation return the
    /// shared one-entry zero table.
    pub fn lut(&self, axis: Axis) -> &[u32] {
        self.luts.table(axis)
    }

    /// The mask applied to `axis` coordinates before lookup.
    pub fn lut_mask(&self, axis: Axis) -> u32 {
        self.luts.mask(axis)
    }

    /// Number of lookup table backing entries in use, including the shared zero slot.
    pub fn lut_entries_used(&self) -> usize {
        self.luts.used()
    }
}

impl fmt::Debug for Addresser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Addresser")
            .field("equation", &format_args!("{}", self.equation))
            .field("block_size", &self.block_size)
            .field("block_size_bits", &self.block_size_bits)
            .field("properties", &self.properties)
            .field(
                "lut_masks",
                &Axis::ALL.map(|axis| self.luts.mask(axis)),
            )
            .finish()
    }
}

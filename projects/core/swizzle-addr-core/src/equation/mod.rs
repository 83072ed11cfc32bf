//! Swizzle equations.
//!
//! A swizzle equation describes how the byte offset inside a tiled block is formed from
//! element coordinates. Output bit `i` of the offset is the XOR (parity) of a handful of
//! coordinate bits, which are described per axis by a [`BitSetting`].
//!
//! ```text
//!  bit:    8  7  6  5  4  3  2  1  0
//!         x5 y2 y1 x4 y0 x3 x2 x1 x0
//! ```
//!
//! The lowest bits of an equation are usually unused (all zero). Those bits address bytes
//! inside a single element, so their count is the log2 of the element size.
//!
//! Equations can be written in a compact text form (see [`parse`]), e.g.
//! `0 0 x0 x1 y0 y1 x2 y2^x3`.

pub mod parse;

pub use parse::*;

use derive_enum_all_values::AllValues;
use thiserror::Error;

/// Maximum number of output address bits an equation can describe.
///
/// Enough for 256KiB blocks (18 bits) with headroom.
pub const MAX_EQUATION_BITS: usize = 20;

/// Maximum number of source bits per axis (width of a [`BitSetting`] mask).
pub const MAX_SOURCE_BITS: u32 = 16;

/// A coordinate axis that can feed bits into a swizzle equation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AllValues)]
#[repr(u8)]
pub enum Axis {
    /// Horizontal element coordinate.
    X = 0,
    /// Vertical element coordinate.
    Y = 1,
    /// Depth (slice) coordinate.
    Z = 2,
    /// Sample index for multisampled surfaces.
    Sample = 3,
}

impl Axis {
    /// Number of axes.
    pub const COUNT: usize = 4;

    /// All axes, in table order.
    pub const ALL: [Axis; Axis::COUNT] = [Axis::X, Axis::Y, Axis::Z, Axis::Sample];

    /// Index of this axis in per-axis arrays.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The letter used for this axis in the equation text form.
    pub const fn letter(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
            Axis::Sample => 's',
        }
    }
}

/// The source bits feeding a single output bit of a swizzle equation.
///
/// Each field is a mask of coordinate bits for one axis. The output bit is the parity of
/// all selected coordinate bits across all four axes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitSetting {
    /// Mask of `x` coordinate bits.
    pub x: u16,
    /// Mask of `y` coordinate bits.
    pub y: u16,
    /// Mask of `z` coordinate bits.
    pub z: u16,
    /// Mask of sample index bits.
    pub s: u16,
}

impl BitSetting {
    /// An unused output bit.
    pub const ZERO: BitSetting = BitSetting::new(0, 0, 0, 0);

    /// Creates a setting from raw per-axis masks.
    pub const fn new(x: u16, y: u16, z: u16, s: u16) -> Self {
        Self { x, y, z, s }
    }

    /// A setting driven by a single bit of a single axis.
    ///
    /// # Panics
    ///
    /// If `bit` is not below [`MAX_SOURCE_BITS`].
    pub const fn single(axis: Axis, bit: u32) -> Self {
        assert!(bit < MAX_SOURCE_BITS);
        let mask = 1u16 << bit;
        match axis {
            Axis::X => Self::new(mask, 0, 0, 0),
            Axis::Y => Self::new(0, mask, 0, 0),
            Axis::Z => Self::new(0, 0, mask, 0),
            Axis::Sample => Self::new(0, 0, 0, mask),
        }
    }

    /// Shorthand for [`BitSetting::single`] on [`Axis::X`].
    pub const fn x(bit: u32) -> Self {
        Self::single(Axis::X, bit)
    }

    /// Shorthand for [`BitSetting::single`] on [`Axis::Y`].
    pub const fn y(bit: u32) -> Self {
        Self::single(Axis::Y, bit)
    }

    /// Shorthand for [`BitSetting::single`] on [`Axis::Z`].
    pub const fn z(bit: u32) -> Self {
        Self::single(Axis::Z, bit)
    }

    /// Shorthand for [`BitSetting::single`] on [`Axis::Sample`].
    pub const fn s(bit: u32) -> Self {
        Self::single(Axis::Sample, bit)
    }

    /// XORs two settings together. Source bits present in both cancel out.
    #[must_use]
    pub const fn xor(self, other: BitSetting) -> Self {
        Self::new(
            self.x ^ other.x,
            self.y ^ other.y,
            self.z ^ other.z,
            self.s ^ other.s,
        )
    }

    /// Mask of source bits contributed by `axis`.
    #[inline(always)]
    pub const fn mask(self, axis: Axis) -> u16 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::Sample => self.s,
        }
    }

    /// Whether no coordinate bit feeds this output bit.
    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        (self.x | self.y | self.z | self.s) == 0
    }

    /// Total number of coordinate bits XORed into this output bit.
    pub const fn source_count(self) -> u32 {
        self.x.count_ones() + self.y.count_ones() + self.z.count_ones() + self.s.count_ones()
    }
}

/// A swizzle equation: one [`BitSetting`] per output address bit, least significant first.
///
/// Entries past the end of the equation are [`BitSetting::ZERO`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BitEquation {
    bits: [BitSetting; MAX_EQUATION_BITS],
}

impl Default for BitEquation {
    fn default() -> Self {
        Self::empty()
    }
}

impl BitEquation {
    /// An equation with no valid bits.
    pub const fn empty() -> Self {
        Self {
            bits: [BitSetting::ZERO; MAX_EQUATION_BITS],
        }
    }

    /// Creates an equation from its per-bit settings, least significant bit first.
    ///
    /// # Panics
    ///
    /// If more than [`MAX_EQUATION_BITS`] settings are given. Use
    /// [`BitEquation::try_from_bits`] for untrusted input.
    pub fn from_bits(bits: &[BitSetting]) -> Self {
        assert!(
            bits.len() <= MAX_EQUATION_BITS,
            "Equation has {} bits, at most {MAX_EQUATION_BITS} are supported",
            bits.len()
        );
        let mut equation = Self::empty();
        equation.bits[..bits.len()].copy_from_slice(bits);
        equation
    }

    /// Creates an equation from its per-bit settings, rejecting oversized equations.
    pub fn try_from_bits(bits: &[BitSetting]) -> Result<Self, EquationError> {
        if bits.len() > MAX_EQUATION_BITS {
            return Err(EquationError::TooManyBits {
                len: bits.len(),
                max: MAX_EQUATION_BITS,
            });
        }
        Ok(Self::from_bits(bits))
    }

    /// All entries of the equation, including unused trailing ones.
    #[inline(always)]
    pub const fn bits(&self) -> &[BitSetting; MAX_EQUATION_BITS] {
        &self.bits
    }

    /// The setting for output bit `index`.
    #[inline(always)]
    pub const fn bit(&self, index: usize) -> BitSetting {
        self.bits[index]
    }

    /// Replaces the setting for output bit `index`.
    pub fn set_bit(&mut self, index: usize, setting: BitSetting) {
        self.bits[index] = setting;
    }

    /// Index of the lowest bit driven by any coordinate, if any.
    pub fn first_valid_bit(&self) -> Option<usize> {
        self.bits.iter().position(|bit| !bit.is_zero())
    }

    /// Index one past the highest bit driven by any coordinate (0 for an empty equation).
    pub fn valid_len(&self) -> usize {
        self.bits
            .iter()
            .rposition(|bit| !bit.is_zero())
            .map_or(0, |index| index + 1)
    }

    /// OR of every mask `axis` contributes anywhere in the equation.
    pub fn axis_mask(&self, axis: Axis) -> u32 {
        self.bits
            .iter()
            .fold(0u32, |acc, bit| acc | bit.mask(axis) as u32)
    }

    /// Whether any output bit depends on the sample index.
    pub fn has_samples(&self) -> bool {
        self.axis_mask(Axis::Sample) != 0
    }

    /// Checks that valid bits are contiguous.
    ///
    /// Unused bits are allowed below the first valid bit (they address bytes inside an
    /// element) and after the last one, but not in between.
    pub fn validate(&self) -> Result<(), EquationError> {
        let Some(first) = self.first_valid_bit() else {
            return Ok(());
        };

        let end = self.valid_len();
        match self.bits[first..end].iter().position(|bit| bit.is_zero()) {
            Some(gap) => Err(EquationError::Gap {
                gap: first + gap,
                last_valid: end - 1,
            }),
            None => Ok(()),
        }
    }
}

/// Structural problems with a [`BitEquation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquationError {
    /// More bits were supplied than an equation can hold.
    #[error("Equation has {len} bits, but at most {max} are supported.")]
    TooManyBits {
        /// Number of bits supplied.
        len: usize,
        /// Supported maximum.
        max: usize,
    },

    /// An unused bit sits between valid bits.
    #[error("Equation bit {gap} is unused, but bit {last_valid} above it is driven by coordinates.")]
    Gap {
        /// Index of the first unused bit inside the valid range.
        gap: usize,
        /// Index of the highest valid bit.
        last_valid: usize,
    },
}

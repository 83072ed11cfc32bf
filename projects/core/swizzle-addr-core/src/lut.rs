//! Per-axis lookup tables.
//!
//! Because every output bit is a parity (XOR) of coordinate bits, the offset of a
//! coordinate `(x, y, z, s)` is the XOR of the offsets of `(x, 0, 0, 0)`, `(0, y, 0, 0)`,
//! `(0, 0, z, 0)` and `(0, 0, 0, s)`. Each of those only depends on the bits the axis
//! feeds into the equation, so it can be precomputed into a small table indexed by
//! `coordinate & mask`.
//!
//! All four tables live in one fixed-size backing array:
//!
//! ```text
//! +------+-----------------+-----------------+---------+
//! | zero | x table         | y table         | z table |  ...
//! +------+-----------------+-----------------+---------+
//!   ^ slot 0, shared by every axis whose mask is 0
//! ```

use crate::equation::{Axis, BitEquation};
use crate::evaluate::evaluate_axis;

/// Number of `u32` entries in the lookup table backing array.
///
/// Sized for 256KiB 2D blocks of 1 byte elements (512x512 elements, 512 `x` and 512 `y`
/// entries) with room for pipe/bank terms that reach one coordinate bit further on each
/// axis, plus the shared zero slot.
pub const LUT_CAPACITY: usize = 2 * 1024 + 1;

/// Index of the shared zero entry used by axes that do not take part in the equation.
pub const ZERO_SLOT: usize = 0;

/// Number of backing entries the tables for `equation` need, including the zero slot.
pub fn required_entries(equation: &BitEquation) -> usize {
    Axis::ALL
        .iter()
        .map(|&axis| match equation.axis_mask(axis) {
            0 => 0,
            mask => mask as usize + 1,
        })
        .sum::<usize>()
        + 1
}

/// The four per-axis tables and their masks.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct LutTables {
    entries: [u32; LUT_CAPACITY],
    bases: [usize; Axis::COUNT],
    masks: [u32; Axis::COUNT],
    used: usize,
}

impl LutTables {
    /// Builds the tables for `equation`, in `x`, `y`, `z`, sample order.
    ///
    /// # Panics
    ///
    /// If the tables do not fit in [`LUT_CAPACITY`] entries.
    pub(crate) fn build(equation: &BitEquation) -> Self {
        let mut tables = Self {
            entries: [0; LUT_CAPACITY],
            bases: [ZERO_SLOT; Axis::COUNT],
            masks: [0; Axis::COUNT],
            used: ZERO_SLOT + 1,
        };

        for axis in Axis::ALL {
            let mask = equation.axis_mask(axis);
            tables.masks[axis.index()] = mask;
            if mask == 0 {
                continue;
            }

            let len = mask as usize + 1;
            assert!(
                tables.used + len <= LUT_CAPACITY,
                "Lookup tables need more than {LUT_CAPACITY} entries ({:?} table has {len})",
                axis
            );

            let base = tables.used;
            for (value, entry) in tables.entries[base..base + len].iter_mut().enumerate() {
                *entry = evaluate_axis(equation, axis, value as u32);
            }

            tables.bases[axis.index()] = base;
            tables.used += len;
        }

        tables
    }

    /// Offset contribution of `axis` at `coord`.
    #[inline(always)]
    pub(crate) fn lookup(&self, axis: Axis, coord: u32) -> u32 {
        let index = self.bases[axis.index()] + (coord & self.masks[axis.index()]) as usize;
        debug_assert!(index < self.used);
        // SAFETY: `build` guarantees `base + mask < used <= LUT_CAPACITY` for every axis,
        // and `coord & mask <= mask`.
        unsafe { *self.entries.get_unchecked(index) }
    }

    /// The table of `axis`, `mask + 1` entries long.
    pub(crate) fn table(&self, axis: Axis) -> &[u32] {
        let base = self.bases[axis.index()];
        &self.entries[base..=base + self.masks[axis.index()] as usize]
    }

    #[inline(always)]
    pub(crate) fn mask(&self, axis: Axis) -> u32 {
        self.masks[axis.index()]
    }

    /// Number of backing entries in use, including the zero slot.
    pub(crate) fn used(&self) -> usize {
        self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::evaluate_equation;
    use crate::test_prelude::*;

    #[rstest]
    fn tables_are_laid_out_in_axis_order() {
        let equation = parse_equation("0 x0 y0 x1 y1 z0");
        let tables = LutTables::build(&equation);

        assert_eq!(tables.bases, [1, 5, 9, ZERO_SLOT]);
        assert_eq!(tables.masks, [0b11, 0b11, 0b1, 0]);
        assert_eq!(tables.used(), 1 + 4 + 4 + 2);
        assert_eq!(tables.used(), required_entries(&equation));
    }

    #[rstest]
    fn degenerate_axes_share_zero_slot() {
        let equation = parse_equation("x0 x1 y0");
        let tables = LutTables::build(&equation);

        assert_eq!(tables.table(Axis::Z), &[0]);
        assert_eq!(tables.table(Axis::Sample), &[0]);
        assert_eq!(tables.lookup(Axis::Z, 0xFFFF_FFFF), 0);
        assert_eq!(tables.lookup(Axis::Sample, 7), 0);
        assert_eq!(tables.entries[ZERO_SLOT], 0);
    }

    #[rstest]
    fn entries_match_reference_for_each_axis() {
        let equation = parse_equation("0 x0 y0 x1^z0 y1 z1^s0 x2^y0");
        let tables = LutTables::build(&equation);

        for axis in Axis::ALL {
            for (value, &entry) in tables.table(axis).iter().enumerate() {
                assert_eq!(entry, evaluate_axis(&equation, axis, value as u32));
            }
        }

        assert_eq!(
            tables.lookup(Axis::X, 0b101),
            evaluate_equation(&equation, 0b101, 0, 0, 0)
        );
    }

    #[rstest]
    fn sparse_masks_cover_highest_bit() {
        // x bits 0 and 3 only: the table still spans 0..=0b1001.
        let equation = parse_equation("x0 y0 x3");
        let tables = LutTables::build(&equation);

        assert_eq!(tables.mask(Axis::X), 0b1001);
        assert_eq!(tables.table(Axis::X).len(), 10);
        assert_eq!(tables.lookup(Axis::X, 0b1001), 0b101);
        assert_eq!(tables.lookup(Axis::X, 0b0110), 0);
    }

    #[rstest]
    #[should_panic(expected = "Lookup tables need more than")]
    fn panics_when_capacity_exceeded() {
        // x mask 0x1001 alone needs 4097 entries.
        let equation = parse_equation("x0 y0 x12");
        LutTables::build(&equation);
    }

    #[rstest]
    fn largest_interleave_fits() {
        // 512x512 one byte elements: 512 x entries, 512 y entries.
        let equation =
            parse_equation("x0 y0 x1 y1 x2 y2 x3 y3 x4 y4 x5 y5 x6 y6 x7 y7 x8 y8");
        assert_eq!(required_entries(&equation), 1 + 512 + 512);
        assert!(required_entries(&equation) <= LUT_CAPACITY);
        assert_eq!(LutTables::build(&equation).used(), 1025);
    }

    #[rstest]
    fn empty_equation_needs_only_zero_slot() {
        let equation = BitEquation::empty();
        assert_eq!(required_entries(&equation), 1);
        assert_eq!(LutTables::build(&equation).used(), 1);
    }
}

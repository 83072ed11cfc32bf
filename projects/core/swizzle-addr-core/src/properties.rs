//! Properties derived from a swizzle equation, used to pick fast copy paths.

use crate::addresser::Extent3D;
use crate::equation::{BitEquation, BitSetting, MAX_SOURCE_BITS};

/// Properties of a swizzle equation that do not depend on the lookup tables.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SwizzleProperties {
    /// log2 of the element size in bytes.
    pub element_size_log2: u32,
    /// Number of horizontally adjacent elements that are stored contiguously in memory.
    /// Always a power of two, at least 1.
    pub expand_x: u32,
}

impl SwizzleProperties {
    /// Derives the properties of `equation`.
    pub fn analyze(equation: &BitEquation) -> Self {
        let element_size_log2 = element_size_log2(equation);
        Self {
            element_size_log2,
            expand_x: expand_x(equation, element_size_log2),
        }
    }
}

/// log2 of the element size: the number of unused bits below the first valid bit.
///
/// An equation with no valid bits has an element size of 1 byte (returns 0).
pub fn element_size_log2(equation: &BitEquation) -> u32 {
    equation.first_valid_bit().map_or(0, |bit| bit as u32)
}

/// How many horizontally adjacent elements can be copied as one contiguous run.
///
/// Starting right above the element bits, output bit `element_size_log2 + i` must be
/// driven by `x` bit `i` alone, for `i = 0, 1, ...`. A run of `n` such bits means
/// `2^n` adjacent elements sit next to each other in memory. The run ends at the first
/// bit with more than one source, a non-`x` source, or an out of order `x` bit. It also
/// ends at an `x` bit that any other output bit XORs in, since flipping that bit would then
/// move the element outside of the run.
///
/// Equations with any sample bit always return 1.
pub fn expand_x(equation: &BitEquation, element_size_log2: u32) -> u32 {
    if equation.has_samples() {
        return 1;
    }

    let start = element_size_log2 as usize;
    let bits = equation.bits();
    let mut run = 0u32;

    for (index, bit) in bits.iter().enumerate().skip(start) {
        if run >= MAX_SOURCE_BITS || *bit != BitSetting::x(run) {
            break;
        }

        let x_bit = 1u16 << run;
        let reused = bits
            .iter()
            .enumerate()
            .any(|(other, setting)| other != index && setting.x & x_bit != 0);
        if reused {
            break;
        }

        run += 1;
    }

    1 << run
}

/// Rank over GF(2) of the equation restricted to the coordinate bits inside one block.
///
/// Only the low `log2(width)` x bits, `log2(height)` y bits and `log2(depth)` z bits vary
/// within a block, and every output bit is a XOR of coordinate bits. The elements of a
/// block have pairwise distinct offsets exactly when the rank equals the number of those
/// bits. Block dimensions are expected to be powers of two.
pub fn block_coordinate_rank(equation: &BitEquation, block: Extent3D) -> u32 {
    let bits_x = block.width.trailing_zeros().min(MAX_SOURCE_BITS);
    let bits_y = block.height.trailing_zeros().min(MAX_SOURCE_BITS);
    let bits_z = block.depth.trailing_zeros().min(MAX_SOURCE_BITS);
    let low = |mask: u16, bits: u32| u64::from(mask) & ((1u64 << bits) - 1);

    // basis[i] is a row whose highest set bit is i
    let mut basis = [0u64; 64];
    let mut rank = 0;
    for setting in equation.bits() {
        let mut row = low(setting.x, bits_x)
            | low(setting.y, bits_y) << bits_x
            | low(setting.z, bits_z) << (bits_x + bits_y);
        while row != 0 {
            let top = 63 - row.leading_zeros() as usize;
            if basis[top] == 0 {
                basis[top] = row;
                rank += 1;
                break;
            }
            row ^= basis[top];
        }
    }

    rank
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case("x0 y0", 0)]
    #[case("0 x0 y0", 1)]
    #[case("0 0 x0 y0", 2)]
    #[case("0 0 0 x0 y0", 3)]
    #[case("0 0 0 0 x0 y0", 4)]
    #[case("0 0 0", 0)]
    fn element_size_from_low_unused_bits(#[case] text: &str, #[case] expected: u32) {
        assert_eq!(element_size_log2(&parse_equation(text)), expected);
    }

    #[rstest]
    #[case::no_x_run("0 y0 x0 y1 x1", 1)]
    #[case::one_bit("0 x0 y0 x1 y1", 2)]
    #[case::two_bits("0 x0 x1 y0 y1 x2 y2", 4)]
    #[case::three_bits("x0 x1 x2 y0 y1 y2", 8)]
    #[case::out_of_order("0 x1 x0 y0 y1", 1)]
    #[case::out_of_order_after_run("0 x0 x2 x1 y0", 2)]
    #[case::multiple_sources("0 x0^y0 x1 y1", 1)]
    #[case::multiple_sources_after_run("0 x0 x1^y2 y0 y1", 2)]
    #[case::mixed_axis("x0 z0 x1", 2)]
    #[case::reused_in_xor("0 x0 x1 y0 y1^x1", 2)]
    #[case::only_x("x0 x1", 4)]
    #[case::empty("0", 1)]
    fn expand_x_from_low_x_run(#[case] text: &str, #[case] expected: u32) {
        let equation = parse_equation(text);
        assert_eq!(expand_x(&equation, element_size_log2(&equation)), expected);
    }

    #[rstest]
    #[case("0 x0 x1 y0 y1 s0")]
    #[case("x0 x1 x2 s0^y0")]
    fn samples_disable_batching(#[case] text: &str) {
        let equation = parse_equation(text);
        assert_eq!(expand_x(&equation, element_size_log2(&equation)), 1);
    }

    #[rstest]
    fn analyze_combines_both() {
        let equation = parse_equation("0 x0 x1 y0 y1 x2 y2");
        assert_eq!(
            SwizzleProperties::analyze(&equation),
            SwizzleProperties {
                element_size_log2: 1,
                expand_x: 4
            }
        );
    }

    #[rstest]
    #[case::plain("0 x0 x1 y0 y1 x2 y2", Extent3D::new(8, 8, 1), 6)]
    #[case::swizzled("0 x0 y0^x1 x1 y1", Extent3D::new(4, 4, 1), 4)]
    #[case::higher_bits_ignored("x0 y0 x1^y3 y1 x4", Extent3D::new(4, 4, 1), 4)]
    #[case::missing_x_bit("0 x0 y0 y1 y2", Extent3D::new(8, 2, 1), 2)]
    #[case::repeated_row("x0^y0 y0^x0", Extent3D::new(2, 2, 1), 1)]
    #[case::only_outer_bits("y1 x1", Extent3D::new(2, 2, 1), 0)]
    #[case::dependent_rows("x0^y0 x0 y0", Extent3D::new(2, 2, 1), 2)]
    #[case::volume("0 0 x0 y0 z0 x1 y1 z1 x2", Extent3D::new(8, 4, 4), 7)]
    #[case::samples_ignored("x0 s0 y0", Extent3D::new(2, 2, 1), 2)]
    fn rank_of_block_coordinates(
        #[case] text: &str,
        #[case] block: Extent3D,
        #[case] expected: u32,
    ) {
        assert_eq!(block_coordinate_rank(&parse_equation(text), block), expected);
    }
}

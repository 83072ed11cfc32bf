//! Reference evaluation of swizzle equations.
//!
//! This walks the equation bit by bit and is the ground truth the lookup tables are built
//! from. It is far too slow for per-element use; see [`crate::Addresser`] for that.

use crate::equation::{Axis, BitEquation};

/// Computes the intra-block byte offset for the given coordinates by walking the equation.
///
/// Every output bit is the parity of the coordinate bits its [`BitSetting`] selects.
/// Scanning stops at the first unused bit above the valid range.
///
/// [`BitSetting`]: crate::BitSetting
pub fn evaluate_equation(equation: &BitEquation, x: u32, y: u32, z: u32, sample: u32) -> u32 {
    let bits = equation.bits();
    let mut address = 0u32;
    let mut in_range = false;

    for (index, bit) in bits.iter().enumerate() {
        if bit.is_zero() {
            if in_range {
                debug_assert!(
                    bits[index..].iter().all(|bit| bit.is_zero()),
                    "Equation bit {index} is unused but a higher bit is valid"
                );
                break;
            }
            continue;
        }

        in_range = true;
        let parity = (x & bit.x as u32).count_ones()
            ^ (y & bit.y as u32).count_ones()
            ^ (z & bit.z as u32).count_ones()
            ^ (sample & bit.s as u32).count_ones();
        address |= (parity & 1) << index;
    }

    address
}

/// Evaluates the equation with only `axis` set to `value` and every other axis at zero.
///
/// This is the contribution of a single axis, which XORs with the other axes'
/// contributions to form the full offset.
pub fn evaluate_axis(equation: &BitEquation, axis: Axis, value: u32) -> u32 {
    let mut coords = [0u32; Axis::COUNT];
    coords[axis.index()] = value;
    evaluate_equation(equation, coords[0], coords[1], coords[2], coords[3])
}

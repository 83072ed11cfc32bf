//! Text form of [`BitEquation`].
//!
//! An equation is written as one token per output bit, least significant bit first,
//! separated by whitespace or commas:
//!
//! - `0` or `-` marks an unused bit.
//! - Otherwise the token is one or more `^`-separated terms, each an axis letter
//!   (`x`, `y`, `z`, `s`) followed by a coordinate bit index, e.g. `y2^x3`.
//!
//! ```
//! use swizzle_addr_core::{BitEquation, BitSetting};
//!
//! let equation: BitEquation = "0 x0 x1 y0 y1^x2".parse().unwrap();
//! assert_eq!(equation.bit(0), BitSetting::ZERO);
//! assert_eq!(equation.bit(5), BitSetting::y(1).xor(BitSetting::x(2)));
//! assert_eq!(equation.to_string(), "0 x0 x1 y0 x2^y1");
//! ```

use super::{Axis, BitEquation, BitSetting, MAX_EQUATION_BITS, MAX_SOURCE_BITS};
use core::fmt;
use core::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing the text form of a [`BitEquation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEquationError {
    /// The input contained no tokens.
    #[error("Equation is empty.")]
    Empty,

    /// The input has more tokens than an equation can hold.
    #[error("Equation has more than {max} bits.")]
    TooManyBits {
        /// Supported maximum.
        max: usize,
    },

    /// A term started with a character that is not an axis letter.
    #[error("Unknown axis '{axis}' in equation bit {bit}.")]
    UnknownAxis {
        /// Output bit the term belongs to.
        bit: usize,
        /// The offending character.
        axis: char,
    },

    /// A term is missing its coordinate bit index, or the index is not a number.
    #[error("Missing or malformed coordinate bit index in equation bit {bit}.")]
    InvalidIndex {
        /// Output bit the term belongs to.
        bit: usize,
    },

    /// A coordinate bit index is too large for a [`BitSetting`] mask.
    #[error("Coordinate bit {index} in equation bit {bit} is out of range (maximum {max}).")]
    IndexOutOfRange {
        /// Output bit the term belongs to.
        bit: usize,
        /// The parsed index.
        index: u32,
        /// Largest allowed index.
        max: u32,
    },
}

impl FromStr for BitEquation {
    type Err = ParseEquationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut equation = BitEquation::empty();
        let mut num_bits = 0;

        let tokens = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty());

        for (bit, token) in tokens.enumerate() {
            if bit >= MAX_EQUATION_BITS {
                return Err(ParseEquationError::TooManyBits {
                    max: MAX_EQUATION_BITS,
                });
            }

            equation.set_bit(bit, parse_bit(bit, token)?);
            num_bits = bit + 1;
        }

        if num_bits == 0 {
            return Err(ParseEquationError::Empty);
        }

        Ok(equation)
    }
}

fn parse_bit(bit: usize, token: &str) -> Result<BitSetting, ParseEquationError> {
    if token == "0" || token == "-" {
        return Ok(BitSetting::ZERO);
    }

    let mut setting = BitSetting::ZERO;
    for term in token.split('^') {
        let mut chars = term.chars();
        let axis = match chars.next().map(|c| c.to_ascii_lowercase()) {
            Some('x') => Axis::X,
            Some('y') => Axis::Y,
            Some('z') => Axis::Z,
            Some('s') => Axis::Sample,
            Some(other) => return Err(ParseEquationError::UnknownAxis { bit, axis: other }),
            None => return Err(ParseEquationError::InvalidIndex { bit }),
        };

        // Digits only: `str::parse` would also take a sign.
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseEquationError::InvalidIndex { bit });
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| ParseEquationError::InvalidIndex { bit })?;

        if index >= MAX_SOURCE_BITS {
            return Err(ParseEquationError::IndexOutOfRange {
                bit,
                index,
                max: MAX_SOURCE_BITS - 1,
            });
        }

        setting = setting.xor(BitSetting::single(axis, index));
    }

    Ok(setting)
}

impl fmt::Display for BitSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        let mut first = true;
        for axis in Axis::ALL {
            let mut mask = self.mask(axis);
            while mask != 0 {
                let index = mask.trailing_zeros();
                mask &= mask - 1;
                if !first {
                    f.write_str("^")?;
                }
                write!(f, "{}{}", axis.letter(), index)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl fmt::Display for BitEquation {
    /// Writes the text form up to the last valid bit (a single `0` for an empty equation).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.valid_len().max(1);
        for (index, bit) in self.bits()[..len].iter().enumerate() {
            if index != 0 {
                f.write_str(" ")?;
            }
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    fn parses_bits_in_order() {
        let equation: BitEquation = "0, x0, y0 z1^x2  s0".parse().unwrap();
        assert_eq!(equation.bit(0), BitSetting::ZERO);
        assert_eq!(equation.bit(1), BitSetting::x(0));
        assert_eq!(equation.bit(2), BitSetting::y(0));
        assert_eq!(equation.bit(3), BitSetting::new(1 << 2, 0, 1 << 1, 0));
        assert_eq!(equation.bit(4), BitSetting::s(0));
        assert_eq!(equation.valid_len(), 5);
    }

    #[rstest]
    fn accepts_dash_and_uppercase() {
        let equation: BitEquation = "- X0 Y0".parse().unwrap();
        assert_eq!(equation, parse_equation("0 x0 y0"));
    }

    #[rstest]
    fn repeated_terms_cancel() {
        let equation: BitEquation = "x0^y1^x0".parse().unwrap();
        assert_eq!(equation.bit(0), BitSetting::y(1));
    }

    #[rstest]
    #[case("", ParseEquationError::Empty)]
    #[case(" , ", ParseEquationError::Empty)]
    #[case("x0 w1", ParseEquationError::UnknownAxis { bit: 1, axis: 'w' })]
    #[case("x0 y", ParseEquationError::InvalidIndex { bit: 1 })]
    #[case("x0 ^y1", ParseEquationError::InvalidIndex { bit: 1 })]
    #[case("xq", ParseEquationError::InvalidIndex { bit: 0 })]
    #[case("x+1", ParseEquationError::InvalidIndex { bit: 0 })]
    #[case("0 y-1", ParseEquationError::InvalidIndex { bit: 1 })]
    #[case("0 0 z 1", ParseEquationError::InvalidIndex { bit: 2 })]
    #[case("0 x16", ParseEquationError::IndexOutOfRange { bit: 1, index: 16, max: 15 })]
    fn rejects_malformed(#[case] text: &str, #[case] expected: ParseEquationError) {
        assert_eq!(text.parse::<BitEquation>(), Err(expected));
    }

    #[rstest]
    fn rejects_too_many_bits() {
        let text = "x0 ".repeat(MAX_EQUATION_BITS + 1);
        assert_eq!(
            text.parse::<BitEquation>(),
            Err(ParseEquationError::TooManyBits {
                max: MAX_EQUATION_BITS
            })
        );
    }

    #[rstest]
    #[case("0 0 x0 x1 y0 y1 x2 x3^y2")]
    #[case("x0 y0 z0 s0 x1^y1^z1^s1")]
    #[case("0")]
    fn display_matches_parse(#[case] text: &str) {
        let equation = parse_equation(text);
        assert_eq!(equation.to_string(), text);
        assert_eq!(parse_equation(&equation.to_string()), equation);
    }
}

#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

pub mod addresser;
pub mod allocate;
pub mod copy;
pub mod equation;
pub mod evaluate;
pub mod lut;
pub mod properties;

pub use addresser::{Addresser, Coord2D, Extent2D, Extent3D};
pub use copy::{
    copy_fn_for_img_to_mem, copy_fn_for_mem_to_img, get_copy_img_to_mem_fn,
    get_copy_mem_to_img_fn, BatchClass, CopyImgToMemFn, CopyMemToImgFn, ElementSize, MAX_BATCH,
    MAX_ELEMENT_SIZE_LOG2,
};
pub use equation::{
    Axis, BitEquation, BitSetting, EquationError, ParseEquationError, MAX_EQUATION_BITS,
    MAX_SOURCE_BITS,
};
pub use evaluate::{evaluate_axis, evaluate_equation};
pub use lut::{required_entries, LUT_CAPACITY};
pub use properties::SwizzleProperties;

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;

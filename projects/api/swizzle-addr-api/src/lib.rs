#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod surface;

#[cfg(feature = "c-exports")]
pub mod c_api;

pub use builder::{AddresserBuilder, MAX_BLOCK_BITS};
pub use error::{AddresserError, CopyError};
pub use surface::{CopyRegion, LinearLayout, TiledSurface};

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;

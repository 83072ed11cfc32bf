//! Common test imports and utilities for the safe API tests.

pub use rstest::rstest;
pub use swizzle_addr_core::{Extent3D, evaluate_equation};

use swizzle_addr_core::Addresser;

use crate::builder::AddresserBuilder;

/// Builds an addresser through the validating builder, panicking on invalid input.
pub(crate) fn build_addresser(text: &str, block: Extent3D, block_bits: u32) -> Addresser {
    AddresserBuilder::from_text(text)
        .and_then(|builder| builder.block_size(block).block_bits(block_bits).build())
        .unwrap_or_else(|error| panic!("Invalid test layout {text:?}: {error}"))
}

/// A deterministic byte pattern that does not repeat every 256 bytes.
pub(crate) fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i ^ (i >> 8) ^ (i >> 3)) as u8).collect()
}

use crate::error::CliError;
use swizzle_addr_api::AddresserBuilder;
use swizzle_addr_core::{Addresser, Extent3D};

/// Parses a block size in the form `WxHxD`, or `WxH` for a depth of 1.
pub fn parse_block_size(value: &str) -> Result<Extent3D, String> {
    let invalid = || CliError::InvalidBlockSize(value.to_string()).to_string();
    let mut dims = value
        .split(['x', 'X'])
        .map(|dim| dim.trim().parse::<u32>().map_err(|_| invalid()));

    let width = dims.next().ok_or_else(invalid)??;
    let height = dims.next().ok_or_else(invalid)??;
    let depth = dims.next().transpose()?.unwrap_or(1);
    if dims.next().is_some() {
        return Err(invalid());
    }

    Ok(Extent3D::new(width, height, depth))
}

/// Parses a number in decimal, or hex with a `0x` prefix.
pub fn parse_u32(value: &str) -> Result<u32, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("Invalid number {value:?}: {e}"))
}

/// Builds an addresser from command line arguments.
pub fn build_addresser(
    equation: &str,
    block_size: Extent3D,
    block_bits: u32,
) -> Result<Addresser, CliError> {
    Ok(AddresserBuilder::from_text(equation)?
        .block_size(block_size)
        .block_bits(block_bits)
        .build()?)
}

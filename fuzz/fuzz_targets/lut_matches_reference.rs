#![no_main]

// Compares lookup table offsets against the bit by bit reference evaluation.

use libfuzzer_sys::{arbitrary, fuzz_target};
use swizzle_addr_api::AddresserBuilder;
use swizzle_addr_core::{evaluate_equation, BitSetting, Extent3D, MAX_EQUATION_BITS};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    /// Per-bit source masks for x, y, z and sample. Only the low 8 source bits are used,
    /// which keeps every table well inside the backing capacity.
    pub bits: [[u8; 4]; MAX_EQUATION_BITS],
    pub len: u8,
    pub coords: [[u32; 4]; 8],
}

fuzz_target!(|input: Input| {
    let len = input.len as usize % (MAX_EQUATION_BITS + 1);
    let bits: Vec<BitSetting> = input.bits[..len]
        .iter()
        .map(|[x, y, z, s]| BitSetting::new(*x as u16, *y as u16, *z as u16, *s as u16))
        .collect();

    // Invalid equations (gaps, oversized elements) are rejected by the builder.
    let Ok(addresser) = AddresserBuilder::from_bits(&bits).and_then(|builder| {
        builder
            .block_size(Extent3D::new(4, 1, 1))
            .block_bits(MAX_EQUATION_BITS as u32)
            .build()
    }) else {
        return;
    };

    for [x, y, z, sample] in input.coords {
        let expected = evaluate_equation(addresser.equation(), x, y, z, sample);
        assert_eq!(
            addresser.block_offset(x, y, z, sample, 0),
            expected,
            "Offsets differ for {} at ({x}, {y}, {z}, {sample})",
            addresser.equation()
        );
        assert_eq!(
            addresser.block_offset(x, y, z, sample, 0x5A5A0),
            expected ^ 0x5A5A0
        );
    }
});

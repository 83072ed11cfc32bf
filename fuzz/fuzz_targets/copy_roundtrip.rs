#![no_main]

// Uploads random regions into tiled surfaces of generated layouts, checks every element
// against its reference offset, and downloads them again.

use libfuzzer_sys::{arbitrary, fuzz_target};
use swizzle_addr_api::{AddresserBuilder, CopyRegion, LinearLayout, TiledSurface};
use swizzle_addr_core::{BitSetting, Extent3D};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub element_size_log2: u8,
    pub x_run: u8,
    pub mix_high_bit: bool,
    pub width: u8,
    pub height: u8,
    pub region: [u8; 4],
    pub pipe_bank_xor: u8,
}

/// An 8x8 element block with `x_run` x bits right above the element bits.
fn layout(element_size_log2: u32, x_run: u32, mix_high_bit: bool) -> Vec<BitSetting> {
    let mut bits = vec![BitSetting::ZERO; element_size_log2 as usize];
    bits.extend((0..x_run).map(BitSetting::x));

    let (mut next_x, mut next_y) = (x_run, 0);
    while next_x < 3 || next_y < 3 {
        if next_y < 3 {
            bits.push(BitSetting::y(next_y));
            next_y += 1;
        }
        if next_x < 3 {
            bits.push(BitSetting::x(next_x));
            next_x += 1;
        }
    }

    if mix_high_bit {
        if let Some(last) = bits.last_mut() {
            if last.y & 1 == 0 {
                *last = last.xor(BitSetting::y(0));
            }
        }
    }
    bits
}

fuzz_target!(|input: Input| {
    let element_size_log2 = input.element_size_log2 as u32 % 5;
    let bits = layout(element_size_log2, input.x_run as u32 % 4, input.mix_high_bit);
    let Ok(addresser) = AddresserBuilder::from_bits(&bits).and_then(|builder| {
        builder
            .block_size(Extent3D::new(8, 8, 1))
            .block_bits(element_size_log2 + 6)
            .build()
    }) else {
        return;
    };

    let (width, height) = (1 + input.width as u32 % 40, 1 + input.height as u32 % 40);
    let pipe_bank_xor = (input.pipe_bank_xor as u32 % 8) << (element_size_log2 + 3);
    let surface = TiledSurface::new(&addresser, width, height, 1)
        .expect("Builder validated the addresser")
        .with_pipe_bank_xor(pipe_bank_xor)
        .expect("Pipe/bank XOR is block aligned");

    let [x, y, w, h] = input.region.map(u32::from);
    let (x, y) = (x % width, y % height);
    let region = CopyRegion::new_2d(x, y, 1 + w % (width - x), 1 + h % (height - y));

    let bpe = 1usize << element_size_log2;
    let layout = LinearLayout::packed(&region, bpe);
    let linear: Vec<u8> = (0..layout.slice_pitch)
        .map(|i| (i ^ (i / 251)) as u8)
        .collect();
    let mut tiled = vec![0u8; surface.tiled_size().unwrap()];
    surface
        .copy_linear_to_tiled(&mut tiled, &linear, layout, region)
        .unwrap();

    for row in 0..region.height {
        for column in 0..region.width {
            let offset = surface.element_offset(region.x + column, region.y + row, 0, 0);
            let source = row as usize * layout.row_pitch + column as usize * bpe;
            assert_eq!(&tiled[offset..offset + bpe], &linear[source..source + bpe]);
        }
    }

    let mut restored = vec![0u8; linear.len()];
    surface
        .copy_tiled_to_linear(&mut restored, &tiled, layout, region)
        .unwrap();
    assert_eq!(linear, restored);
});

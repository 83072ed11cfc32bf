use crate::error::CliError;
use crate::util::{build_addresser, parse_block_size, parse_u32};
use argh::FromArgs;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use swizzle_addr_api::{CopyRegion, LinearLayout, TiledSurface};
use swizzle_addr_core::Extent3D;

#[cfg(feature = "multithreaded")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

#[derive(FromArgs, Debug)]
/// Copy a set of regions into a tiled surface and back, checking every element
#[argh(subcommand, name = "verify")]
pub struct VerifyCmd {
    /// equation, least significant bit first (e.g. "0 x0 x1 y0 y1^x2")
    #[argh(option)]
    pub equation: String,

    /// block size in elements, as WxHxD
    #[argh(option, from_str_fn(parse_block_size))]
    pub block: Extent3D,

    /// log2 of the block size in bytes
    #[argh(option)]
    pub block_bits: u32,

    /// surface width in elements
    #[argh(option)]
    pub width: u32,

    /// surface height in elements
    #[argh(option)]
    pub height: u32,

    /// surface depth in elements [default: 1]
    #[argh(option, default = "1")]
    pub depth: u32,

    /// pipe/bank XOR applied to every offset [default: 0]
    #[argh(option, default = "0", from_str_fn(parse_u32))]
    pub pipe_bank_xor: u32,
}

pub fn handle_verify_command(cmd: VerifyCmd) -> Result<(), CliError> {
    let addresser = build_addresser(&cmd.equation, cmd.block, cmd.block_bits)?;
    let surface = TiledSurface::new(&addresser, cmd.width, cmd.height, cmd.depth)?
        .with_pipe_bank_xor(cmd.pipe_bank_xor)?;
    let bytes_per_element = 1usize << addresser.element_size_log2();

    let image = SourceImage::new(cmd.width, cmd.height, cmd.depth, bytes_per_element);
    let regions = test_regions(cmd.width, cmd.height, cmd.depth, cmd.block);
    println!(
        "Verifying {} regions on a {}x{}x{} surface ({} tiled bytes)",
        regions.len(),
        cmd.width,
        cmd.height,
        cmd.depth,
        surface.tiled_size()?
    );

    let start = Instant::now();
    let passed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let check = |region: &CopyRegion| match verify_region(&surface, &image, *region) {
        Ok(true) => {
            passed.fetch_add(1, Ordering::Relaxed);
        }
        Ok(false) => {
            failed.fetch_add(1, Ordering::Relaxed);
            println!("FAIL {}", format_region(region));
        }
        Err(e) => {
            failed.fetch_add(1, Ordering::Relaxed);
            println!("FAIL {}: {e}", format_region(region));
        }
    };

    #[cfg(feature = "multithreaded")]
    regions.par_iter().for_each(check);
    #[cfg(not(feature = "multithreaded"))]
    regions.iter().for_each(check);

    let passed = passed.into_inner();
    let failed = failed.into_inner();
    println!(
        "{passed} passed, {failed} failed in {:.2?}",
        start.elapsed()
    );

    if failed != 0 {
        return Err(CliError::VerificationFailed {
            failed,
            total: regions.len(),
        });
    }
    Ok(())
}

/// A packed linear image covering the whole surface.
struct SourceImage {
    data: Vec<u8>,
    layout: LinearLayout,
    bytes_per_element: usize,
}

impl SourceImage {
    fn new(width: u32, height: u32, depth: u32, bytes_per_element: usize) -> Self {
        let region = CopyRegion::new_3d(0, 0, 0, width, height, depth);
        let layout = LinearLayout::packed(&region, bytes_per_element);
        let len = layout.slice_pitch * depth as usize;
        // Not periodic in any power of two, so misplaced elements never compare equal by accident.
        let data = (0..len)
            .map(|i| (i ^ (i / 251) ^ (i >> 11)) as u8)
            .collect();
        Self {
            data,
            layout,
            bytes_per_element,
        }
    }

    fn offset(&self, x: u32, y: u32, z: u32) -> usize {
        z as usize * self.layout.slice_pitch
            + y as usize * self.layout.row_pitch
            + x as usize * self.bytes_per_element
    }
}

/// Uploads `region` from the image, checks every element against its reference offset,
/// then downloads it again and compares.
fn verify_region(
    surface: &TiledSurface<'_>,
    image: &SourceImage,
    region: CopyRegion,
) -> Result<bool, CliError> {
    let bpe = image.bytes_per_element;
    let mut tiled = surface.allocate_tiled()?;
    let source = &image.data[image.offset(region.x, region.y, region.z)..];
    surface.copy_linear_to_tiled(tiled.as_mut_slice(), source, image.layout, region)?;

    let tiled = tiled.as_slice();
    let mut matches = true;
    for z in region.z..region.z + region.depth {
        for y in region.y..region.y + region.height {
            for x in region.x..region.x + region.width {
                let expected = &image.data[image.offset(x, y, z)..][..bpe];
                let offset = surface.element_offset(x, y, z, region.sample);
                if &tiled[offset..offset + bpe] != expected {
                    tracing::debug!(x, y, z, offset, "Element landed in the wrong place");
                    matches = false;
                }
            }
        }
    }

    let layout = LinearLayout::packed(&region, bpe);
    let mut restored = vec![0u8; layout.slice_pitch * region.depth as usize];
    surface.copy_tiled_to_linear(&mut restored, tiled, layout, region)?;
    for z in 0..region.depth {
        for y in 0..region.height {
            let row = z as usize * layout.slice_pitch + y as usize * layout.row_pitch;
            let expected = image.offset(region.x, region.y + y, region.z + z);
            if restored[row..row + layout.row_pitch]
                != image.data[expected..expected + layout.row_pitch]
            {
                tracing::debug!(y, z, "Downloaded row differs");
                matches = false;
            }
        }
    }

    Ok(matches)
}

/// Regions covering aligned and unaligned origins and extents, clipped to the surface.
fn test_regions(width: u32, height: u32, depth: u32, block: Extent3D) -> Vec<CopyRegion> {
    let candidates = [
        (0, 0, width, height),
        (1, 0, width.saturating_sub(1), height),
        (1, 1, width.saturating_sub(2), height.saturating_sub(2)),
        (3, 2, 5, 3),
        (0, 0, 1, 1),
        (width.saturating_sub(1), height.saturating_sub(1), 1, 1),
        (block.width, block.height, block.width, block.height),
        (block.width / 2, 0, block.width + 3, 2),
        (block.width.saturating_sub(1), 1, 2, height.saturating_sub(1)),
        (2, block.height.saturating_sub(1), width.saturating_sub(4), 2),
    ];
    let slices = [(0, depth), (depth / 2, depth - depth / 2), (depth.saturating_sub(1), 1)];

    let mut regions = Vec::new();
    for (x, y, w, h) in candidates {
        for (z, d) in slices {
            let region = CopyRegion::new_3d(
                x.min(width),
                y.min(height),
                z.min(depth),
                w.min(width.saturating_sub(x)),
                h.min(height.saturating_sub(y)),
                d.min(depth.saturating_sub(z)),
            );
            if !region.is_empty() && !regions.contains(&region) {
                regions.push(region);
            }
        }
    }
    regions
}

fn format_region(region: &CopyRegion) -> String {
    format!(
        "region at ({}, {}, {}) of {}x{}x{}",
        region.x, region.y, region.z, region.width, region.height, region.depth
    )
}

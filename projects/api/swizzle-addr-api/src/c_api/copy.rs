//! Tiled <-> linear copies for the C API.

use crate::c_api::addresser::{SwizzleAddrAddresser, get_addresser};
use crate::c_api::error::{SwizzleAddrErrorCode, SwizzleAddrResult};
use crate::c_api::{SwizzleAddrCopyRegion, SwizzleAddrLinearLayout, SwizzleAddrSurface};
use crate::error::CopyError;
use crate::surface::TiledSurface;
use core::slice;
use swizzle_addr_core::Addresser;

fn surface_from_desc<'a>(
    addresser: &'a Addresser,
    surface: SwizzleAddrSurface,
) -> Result<TiledSurface<'a>, CopyError> {
    TiledSurface::new(addresser, surface.width, surface.height, surface.depth)?
        .with_pipe_bank_xor(surface.pipe_bank_xor)
}

/// Size in bytes of the tiled surface described by `surface`.
///
/// # Parameters
/// - `addresser`: the surface's addresser
/// - `surface`: surface size and pipe/bank XOR
/// - `out_size`: receives the size on success
///
/// # Safety
/// - `addresser` must be a valid handle
/// - `out_size` must be valid for writes
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swizzle_addr_tiled_size(
    addresser: *const SwizzleAddrAddresser,
    surface: SwizzleAddrSurface,
    out_size: *mut usize,
) -> SwizzleAddrResult {
    if addresser.is_null() {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::NullAddresserPointer);
    }
    if out_size.is_null() {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::NullOutputPointer);
    }

    // SAFETY: checked non-null above, and the handle outlives the call.
    let addresser = unsafe { get_addresser(addresser) };
    match surface_from_desc(addresser, surface).and_then(|surface| surface.tiled_size()) {
        Ok(size) => {
            unsafe { *out_size = size };
            SwizzleAddrResult::success()
        }
        Err(e) => e.into(),
    }
}

/// Copy a region from linear memory into a tiled surface.
///
/// # Parameters
/// - `addresser`: the surface's addresser
/// - `surface`: surface size and pipe/bank XOR
/// - `region`: the region to copy
/// - `layout`: pitches of `linear`, which starts at the region's first element
/// - `tiled`, `tiled_len`: the whole tiled surface
/// - `linear`, `linear_len`: the source data
///
/// # Safety
/// - `addresser` must be a valid handle
/// - `tiled` must be valid for writes of `tiled_len` bytes
/// - `linear` must be valid for reads of `linear_len` bytes
/// - `tiled` and `linear` must not overlap
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swizzle_addr_copy_linear_to_tiled(
    addresser: *const SwizzleAddrAddresser,
    surface: SwizzleAddrSurface,
    region: SwizzleAddrCopyRegion,
    layout: SwizzleAddrLinearLayout,
    tiled: *mut u8,
    tiled_len: usize,
    linear: *const u8,
    linear_len: usize,
) -> SwizzleAddrResult {
    if addresser.is_null() {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::NullAddresserPointer);
    }
    if linear.is_null() {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::NullInputPointer);
    }
    if tiled.is_null() {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::NullOutputPointer);
    }

    let addresser = unsafe { get_addresser(addresser) };
    let tiled = unsafe { slice::from_raw_parts_mut(tiled, tiled_len) };
    let linear = unsafe { slice::from_raw_parts(linear, linear_len) };

    surface_from_desc(addresser, surface)
        .and_then(|surface| {
            surface.copy_linear_to_tiled(tiled, linear, layout.into(), region.into())
        })
        .into()
}

/// Copy a region from a tiled surface into linear memory.
///
/// # Parameters
/// - `addresser`: the surface's addresser
/// - `surface`: surface size and pipe/bank XOR
/// - `region`: the region to copy
/// - `layout`: pitches of `linear`, which starts at the region's first element
/// - `linear`, `linear_len`: the destination
/// - `tiled`, `tiled_len`: the whole tiled surface
///
/// # Safety
/// - `addresser` must be a valid handle
/// - `linear` must be valid for writes of `linear_len` bytes
/// - `tiled` must be valid for reads of `tiled_len` bytes
/// - `tiled` and `linear` must not overlap
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swizzle_addr_copy_tiled_to_linear(
    addresser: *const SwizzleAddrAddresser,
    surface: SwizzleAddrSurface,
    region: SwizzleAddrCopyRegion,
    layout: SwizzleAddrLinearLayout,
    linear: *mut u8,
    linear_len: usize,
    tiled: *const u8,
    tiled_len: usize,
) -> SwizzleAddrResult {
    if addresser.is_null() {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::NullAddresserPointer);
    }
    if tiled.is_null() {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::NullInputPointer);
    }
    if linear.is_null() {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::NullOutputPointer);
    }

    let addresser = unsafe { get_addresser(addresser) };
    let linear = unsafe { slice::from_raw_parts_mut(linear, linear_len) };
    let tiled = unsafe { slice::from_raw_parts(tiled, tiled_len) };

    surface_from_desc(addresser, surface)
        .and_then(|surface| {
            surface.copy_tiled_to_linear(linear, tiled, layout.into(), region.into())
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c_api::addresser::{swizzle_addr_addresser_create, swizzle_addr_addresser_destroy};
    use core::ptr;
    use rstest::rstest;

    fn create(text: &core::ffi::CStr) -> *mut SwizzleAddrAddresser {
        let mut handle: *mut SwizzleAddrAddresser = ptr::null_mut();
        let result =
            unsafe { swizzle_addr_addresser_create(text.as_ptr(), 8, 8, 1, 7, &mut handle) };
        assert!(result.is_success());
        handle
    }

    #[rstest]
    fn round_trips_through_c_api() {
        let handle = create(c"0 x0 x1 y0 y1 x2 y2");
        let surface = SwizzleAddrSurface {
            width: 13,
            height: 9,
            depth: 1,
            pipe_bank_xor: 0,
        };
        let region = SwizzleAddrCopyRegion {
            x: 1,
            y: 2,
            z: 0,
            width: 11,
            height: 6,
            depth: 1,
            sample: 0,
        };
        let layout = SwizzleAddrLinearLayout {
            row_pitch: 22,
            slice_pitch: 22 * 6,
        };

        let mut tiled_len = 0usize;
        unsafe {
            assert!(swizzle_addr_tiled_size(handle, surface, &mut tiled_len).is_success());
        }
        assert_eq!(tiled_len, 4 * 128);

        let linear: Vec<u8> = (0..22 * 6).map(|i| i as u8).collect();
        let mut tiled = vec![0u8; tiled_len];
        let mut restored = vec![0u8; linear.len()];
        unsafe {
            let upload = swizzle_addr_copy_linear_to_tiled(
                handle,
                surface,
                region,
                layout,
                tiled.as_mut_ptr(),
                tiled.len(),
                linear.as_ptr(),
                linear.len(),
            );
            assert!(upload.is_success());

            let download = swizzle_addr_copy_tiled_to_linear(
                handle,
                surface,
                region,
                layout,
                restored.as_mut_ptr(),
                restored.len(),
                tiled.as_ptr(),
                tiled.len(),
            );
            assert!(download.is_success());
            swizzle_addr_addresser_destroy(handle);
        }
        assert_eq!(linear, restored);
    }

    #[rstest]
    fn reports_copy_errors() {
        let handle = create(c"0 x0 x1 y0 y1 x2 y2");
        let surface = SwizzleAddrSurface {
            width: 8,
            height: 8,
            depth: 1,
            pipe_bank_xor: 0b10,
        };
        let region = SwizzleAddrCopyRegion {
            x: 0,
            y: 0,
            z: 0,
            width: 1,
            height: 1,
            depth: 1,
            sample: 0,
        };
        let layout = SwizzleAddrLinearLayout {
            row_pitch: 2,
            slice_pitch: 2,
        };
        let mut tiled = [0u8; 128];
        let linear = [0u8; 2];

        unsafe {
            let result = swizzle_addr_copy_linear_to_tiled(
                handle,
                surface,
                region,
                layout,
                tiled.as_mut_ptr(),
                tiled.len(),
                linear.as_ptr(),
                linear.len(),
            );
            assert_eq!(result.error_code, SwizzleAddrErrorCode::InvalidPipeBankXor);

            let result = swizzle_addr_copy_linear_to_tiled(
                ptr::null(),
                surface,
                region,
                layout,
                tiled.as_mut_ptr(),
                tiled.len(),
                linear.as_ptr(),
                linear.len(),
            );
            assert_eq!(result.error_code, SwizzleAddrErrorCode::NullAddresserPointer);
            swizzle_addr_addresser_destroy(handle);
        }
    }
}

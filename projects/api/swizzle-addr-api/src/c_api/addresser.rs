//! Addresser handles for the C API.

use crate::builder::AddresserBuilder;
use crate::c_api::error::{SwizzleAddrErrorCode, SwizzleAddrResult};
use core::ffi::{CStr, c_char};
use core::slice;
use swizzle_addr_core::{Addresser, BitSetting, Extent3D};

/// Opaque addresser handle.
///
/// - Created with [`swizzle_addr_addresser_create`] or
///   [`swizzle_addr_addresser_create_from_bits`]
/// - Freed with [`swizzle_addr_addresser_destroy`]
///
/// The addresser is immutable once created, and may be shared between threads.
#[repr(C)]
pub struct SwizzleAddrAddresser {
    _private: [u8; 0],
}

/// Borrow the addresser behind a handle.
///
/// # Safety
/// - `addresser` must be a valid, non-null pointer returned by one of the create functions
pub(crate) unsafe fn get_addresser<'a>(addresser: *const SwizzleAddrAddresser) -> &'a Addresser {
    debug_assert!(!addresser.is_null());
    unsafe { &*(addresser as *const Addresser) }
}

fn build_into(
    builder: AddresserBuilder,
    block: Extent3D,
    block_bits: u32,
    out_addresser: *mut *mut SwizzleAddrAddresser,
) -> SwizzleAddrResult {
    match builder.block_size(block).block_bits(block_bits).build() {
        Ok(addresser) => {
            let handle = Box::into_raw(Box::new(addresser)) as *mut SwizzleAddrAddresser;
            // SAFETY: checked non-null by the callers.
            unsafe { *out_addresser = handle };
            SwizzleAddrResult::success()
        }
        Err(e) => e.into(),
    }
}

/// Create an addresser from an equation in text form, e.g. `"0 x0 x1 y0 y1^x2"`.
///
/// # Parameters
/// - `equation`: NUL terminated equation text
/// - `block_width`, `block_height`, `block_depth`: block dimensions in elements
/// - `block_bits`: log2 of the block size in bytes
/// - `out_addresser`: receives the new handle on success
///
/// # Safety
/// - `equation` must point to a valid NUL terminated string
/// - `out_addresser` must be valid for writes
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swizzle_addr_addresser_create(
    equation: *const c_char,
    block_width: u32,
    block_height: u32,
    block_depth: u32,
    block_bits: u32,
    out_addresser: *mut *mut SwizzleAddrAddresser,
) -> SwizzleAddrResult {
    if equation.is_null() {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::NullInputPointer);
    }
    if out_addresser.is_null() {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::NullOutputPointer);
    }

    let Ok(text) = unsafe { CStr::from_ptr(equation) }.to_str() else {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::InvalidUtf8);
    };
    let builder = match AddresserBuilder::from_text(text) {
        Ok(builder) => builder,
        Err(e) => return e.into(),
    };

    build_into(
        builder,
        Extent3D::new(block_width, block_height, block_depth),
        block_bits,
        out_addresser,
    )
}

/// Create an addresser from per-bit settings, least significant bit first.
///
/// # Safety
/// - `bits` must be valid for reads of `bits_len` elements
/// - `out_addresser` must be valid for writes
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swizzle_addr_addresser_create_from_bits(
    bits: *const BitSetting,
    bits_len: usize,
    block_width: u32,
    block_height: u32,
    block_depth: u32,
    block_bits: u32,
    out_addresser: *mut *mut SwizzleAddrAddresser,
) -> SwizzleAddrResult {
    if bits.is_null() {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::NullInputPointer);
    }
    if out_addresser.is_null() {
        return SwizzleAddrResult::from_error_code(SwizzleAddrErrorCode::NullOutputPointer);
    }

    let bits = unsafe { slice::from_raw_parts(bits, bits_len) };
    let builder = match AddresserBuilder::from_bits(bits) {
        Ok(builder) => builder,
        Err(e) => return e.into(),
    };

    build_into(
        builder,
        Extent3D::new(block_width, block_height, block_depth),
        block_bits,
        out_addresser,
    )
}

/// Free an addresser. Passing null is a no-op.
///
/// # Safety
/// - `addresser` must be null or a pointer returned by one of the create functions
/// - `addresser` must not have been freed already
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swizzle_addr_addresser_destroy(addresser: *mut SwizzleAddrAddresser) {
    if !addresser.is_null() {
        unsafe {
            drop(Box::from_raw(addresser as *mut Addresser));
        }
    }
}

/// Byte offset of an element within its block. Returns 0 for a null addresser.
///
/// # Safety
/// - `addresser` must be null or a valid handle
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swizzle_addr_block_offset(
    addresser: *const SwizzleAddrAddresser,
    x: u32,
    y: u32,
    z: u32,
    sample: u32,
    pipe_bank_xor: u32,
) -> u32 {
    if addresser.is_null() {
        return 0;
    }
    unsafe { get_addresser(addresser) }.block_offset(x, y, z, sample, pipe_bank_xor)
}

/// log2 of the element size in bytes. Returns 0 for a null addresser.
///
/// # Safety
/// - `addresser` must be null or a valid handle
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swizzle_addr_element_size_log2(
    addresser: *const SwizzleAddrAddresser,
) -> u32 {
    if addresser.is_null() {
        return 0;
    }
    unsafe { get_addresser(addresser) }.element_size_log2()
}

/// Horizontal batching factor. Returns 0 for a null addresser.
///
/// # Safety
/// - `addresser` must be null or a valid handle
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swizzle_addr_expand_x(addresser: *const SwizzleAddrAddresser) -> u32 {
    if addresser.is_null() {
        return 0;
    }
    unsafe { get_addresser(addresser) }.expand_x()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr;
    use rstest::rstest;

    #[rstest]
    fn create_query_destroy() {
        let mut handle: *mut SwizzleAddrAddresser = ptr::null_mut();
        let result = unsafe {
            swizzle_addr_addresser_create(c"0 x0 x1 y0 y1 x2 y2".as_ptr(), 8, 8, 1, 7, &mut handle)
        };
        assert!(result.is_success());
        assert!(!handle.is_null());

        unsafe {
            assert_eq!(swizzle_addr_element_size_log2(handle), 1);
            assert_eq!(swizzle_addr_expand_x(handle), 4);
            // x=5 -> x0 and x2, y=3 -> y0 and y1
            assert_eq!(
                swizzle_addr_block_offset(handle, 5, 3, 0, 0, 0),
                0b0011_1010
            );
            swizzle_addr_addresser_destroy(handle);
        }
    }

    #[rstest]
    fn create_from_bits() {
        let bits = [
            BitSetting::ZERO,
            BitSetting::x(0),
            BitSetting::y(0),
            BitSetting::x(1),
            BitSetting::y(1),
        ];
        let mut handle: *mut SwizzleAddrAddresser = ptr::null_mut();
        let result = unsafe {
            swizzle_addr_addresser_create_from_bits(bits.as_ptr(), bits.len(), 4, 4, 1, 5, &mut handle)
        };
        assert!(result.is_success());
        unsafe {
            assert_eq!(swizzle_addr_block_offset(handle, 1, 1, 0, 0, 0), 0b0_0110);
            swizzle_addr_addresser_destroy(handle);
        }
    }

    #[rstest]
    #[case(c"x0 q0", SwizzleAddrErrorCode::InvalidEquationText)]
    #[case(c"x0 y0", SwizzleAddrErrorCode::EquationExceedsBlock)]
    fn create_reports_errors(#[case] text: &CStr, #[case] expected: SwizzleAddrErrorCode) {
        let mut handle: *mut SwizzleAddrAddresser = ptr::null_mut();
        let result = unsafe { swizzle_addr_addresser_create(text.as_ptr(), 2, 1, 1, 1, &mut handle) };
        assert_eq!(result.error_code, expected);
        assert!(handle.is_null());
    }

    #[rstest]
    fn null_pointers() {
        let mut handle: *mut SwizzleAddrAddresser = ptr::null_mut();
        unsafe {
            assert_eq!(
                swizzle_addr_addresser_create(ptr::null(), 1, 1, 1, 0, &mut handle).error_code,
                SwizzleAddrErrorCode::NullInputPointer
            );
            assert_eq!(
                swizzle_addr_addresser_create(c"x0".as_ptr(), 2, 1, 1, 1, ptr::null_mut())
                    .error_code,
                SwizzleAddrErrorCode::NullOutputPointer
            );
            assert_eq!(swizzle_addr_block_offset(ptr::null(), 1, 1, 1, 0, 0), 0);
            swizzle_addr_addresser_destroy(ptr::null_mut());
        }
    }
}

//! C API error handling.

use crate::error::{AddresserError, CopyError};
use core::ffi::c_char;

/// Error codes returned by the C API.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwizzleAddrErrorCode {
    /// Operation completed successfully
    Success = 0,
    /// The equation text could not be parsed
    InvalidEquationText = 1,
    /// The equation is too long or has a gap
    InvalidEquation = 2,
    /// A block dimension is zero or not a power of two
    InvalidBlockSize = 3,
    /// The block size in bits is too large
    BlockBitsTooLarge = 4,
    /// The equation or block shape does not fit in the block
    EquationExceedsBlock = 5,
    /// Batched copies would cross a block boundary
    BatchExceedsBlockWidth = 6,
    /// The lookup tables would not fit in their backing storage
    LutCapacityExceeded = 7,
    /// The element size has no copy routine
    UnsupportedElementSize = 8,
    /// The copy region is outside the surface
    RegionOutOfBounds = 9,
    /// A linear row or slice pitch is too small
    PitchTooSmall = 10,
    /// The linear buffer is too small
    LinearBufferTooSmall = 11,
    /// The tiled buffer is too small
    TiledBufferTooSmall = 12,
    /// The pipe/bank XOR is out of the block or misaligned
    InvalidPipeBankXor = 13,
    /// A size computation overflowed
    SizeOverflow = 14,
    /// Memory allocation failed
    AllocationFailed = 15,
    /// The equation text is not valid UTF-8
    InvalidUtf8 = 16,
    /// Null pointer provided for an addresser parameter
    NullAddresserPointer = 17,
    /// Null pointer provided for an input parameter
    NullInputPointer = 18,
    /// Null pointer provided for an output parameter
    NullOutputPointer = 19,
    /// The equation gives two elements of a block the same offset
    BlockElementsOverlap = 20,
}

/// Result type for C API functions.
#[repr(C)]
pub struct SwizzleAddrResult {
    /// The error code (0 = success)
    pub error_code: SwizzleAddrErrorCode,
}

impl SwizzleAddrResult {
    /// Create a success result
    pub const fn success() -> Self {
        Self {
            error_code: SwizzleAddrErrorCode::Success,
        }
    }

    /// Create a result from an error code
    pub const fn from_error_code(error_code: SwizzleAddrErrorCode) -> Self {
        Self { error_code }
    }

    /// Check if the result is successful
    pub fn is_success(&self) -> bool {
        matches!(self.error_code, SwizzleAddrErrorCode::Success)
    }
}

impl<T, E> From<Result<T, E>> for SwizzleAddrResult
where
    E: Into<SwizzleAddrResult>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(e) => e.into(),
        }
    }
}

impl From<AddresserError> for SwizzleAddrResult {
    fn from(error: AddresserError) -> Self {
        let error_code = match error {
            AddresserError::Parse(_) => SwizzleAddrErrorCode::InvalidEquationText,
            AddresserError::Equation(_) => SwizzleAddrErrorCode::InvalidEquation,
            AddresserError::InvalidBlockSize { .. } => SwizzleAddrErrorCode::InvalidBlockSize,
            AddresserError::BlockBitsTooLarge { .. } => SwizzleAddrErrorCode::BlockBitsTooLarge,
            AddresserError::EquationExceedsBlock { .. }
            | AddresserError::BlockShapeExceedsBlock { .. } => {
                SwizzleAddrErrorCode::EquationExceedsBlock
            }
            AddresserError::BlockElementsOverlap { .. } => {
                SwizzleAddrErrorCode::BlockElementsOverlap
            }
            AddresserError::BatchExceedsBlockWidth { .. } => {
                SwizzleAddrErrorCode::BatchExceedsBlockWidth
            }
            AddresserError::LutCapacityExceeded { .. } => SwizzleAddrErrorCode::LutCapacityExceeded,
        };
        Self::from_error_code(error_code)
    }
}

impl From<CopyError> for SwizzleAddrResult {
    fn from(error: CopyError) -> Self {
        let error_code = match error {
            CopyError::UnsupportedElementSize { .. } => {
                SwizzleAddrErrorCode::UnsupportedElementSize
            }
            CopyError::RegionOutOfBounds { .. } => SwizzleAddrErrorCode::RegionOutOfBounds,
            CopyError::RowPitchTooSmall { .. } | CopyError::SlicePitchTooSmall { .. } => {
                SwizzleAddrErrorCode::PitchTooSmall
            }
            CopyError::LinearBufferTooSmall { .. } => SwizzleAddrErrorCode::LinearBufferTooSmall,
            CopyError::TiledBufferTooSmall { .. } => SwizzleAddrErrorCode::TiledBufferTooSmall,
            CopyError::PipeBankXorOutOfBlock { .. } | CopyError::PipeBankXorMisaligned { .. } => {
                SwizzleAddrErrorCode::InvalidPipeBankXor
            }
            CopyError::InvalidAddresser(error) => return error.into(),
            CopyError::SizeOverflow => SwizzleAddrErrorCode::SizeOverflow,
            CopyError::AllocationFailed(_) => SwizzleAddrErrorCode::AllocationFailed,
        };
        Self::from_error_code(error_code)
    }
}

/// Get a human-readable error message for an error code.
///
/// # Returns
/// A pointer to a static, NUL terminated string. Do not free it.
#[unsafe(no_mangle)]
pub extern "C" fn swizzle_addr_error_message(error_code: SwizzleAddrErrorCode) -> *const c_char {
    match error_code {
        SwizzleAddrErrorCode::Success => c"Success".as_ptr(),
        SwizzleAddrErrorCode::InvalidEquationText => {
            c"Equation text could not be parsed".as_ptr()
        }
        SwizzleAddrErrorCode::InvalidEquation => {
            c"Equation has too many bits or a gap between valid bits".as_ptr()
        }
        SwizzleAddrErrorCode::InvalidBlockSize => {
            c"Block dimensions must be nonzero powers of two".as_ptr()
        }
        SwizzleAddrErrorCode::BlockBitsTooLarge => c"Block size in bits is too large".as_ptr(),
        SwizzleAddrErrorCode::EquationExceedsBlock => {
            c"Equation or block shape does not fit in the block".as_ptr()
        }
        SwizzleAddrErrorCode::BatchExceedsBlockWidth => {
            c"Batched copies would cross a block boundary".as_ptr()
        }
        SwizzleAddrErrorCode::LutCapacityExceeded => {
            c"Lookup tables exceed their fixed capacity".as_ptr()
        }
        SwizzleAddrErrorCode::UnsupportedElementSize => {
            c"Element size is not supported, at most 16 bytes are supported".as_ptr()
        }
        SwizzleAddrErrorCode::RegionOutOfBounds => {
            c"Copy region is outside the surface".as_ptr()
        }
        SwizzleAddrErrorCode::PitchTooSmall => {
            c"Linear row or slice pitch is too small for the region".as_ptr()
        }
        SwizzleAddrErrorCode::LinearBufferTooSmall => {
            c"Linear buffer too small for the region".as_ptr()
        }
        SwizzleAddrErrorCode::TiledBufferTooSmall => {
            c"Tiled buffer too small for the surface".as_ptr()
        }
        SwizzleAddrErrorCode::InvalidPipeBankXor => {
            c"Pipe/bank XOR is outside the block or touches element bits".as_ptr()
        }
        SwizzleAddrErrorCode::SizeOverflow => c"Size computation overflowed".as_ptr(),
        SwizzleAddrErrorCode::AllocationFailed => c"Memory allocation failed".as_ptr(),
        SwizzleAddrErrorCode::InvalidUtf8 => c"Equation text is not valid UTF-8".as_ptr(),
        SwizzleAddrErrorCode::NullAddresserPointer => {
            c"Null pointer provided for addresser parameter".as_ptr()
        }
        SwizzleAddrErrorCode::NullInputPointer => {
            c"Null pointer provided for input parameter".as_ptr()
        }
        SwizzleAddrErrorCode::NullOutputPointer => {
            c"Null pointer provided for output parameter".as_ptr()
        }
        SwizzleAddrErrorCode::BlockElementsOverlap => {
            c"Equation gives two elements of a block the same offset".as_ptr()
        }
    }
}

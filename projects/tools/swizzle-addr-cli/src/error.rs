use swizzle_addr_api::{AddresserError, CopyError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Addresser(#[from] AddresserError),
    #[error(transparent)]
    Copy(#[from] CopyError),
    #[error("Invalid block size {0:?}, expected WxHxD (e.g. 16x16x1)")]
    InvalidBlockSize(String),
    #[error("{failed} of {total} regions did not match")]
    VerificationFailed { failed: usize, total: usize },
}

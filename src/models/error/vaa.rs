use thiserror::Error;

/// Errors raised while decoding a signed batch VAA.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaaError {
    #[error("Truncated batch: missing {0}")]
    Truncated(&'static str),
    #[error("Unsupported batch version {found}, expected {expected}")]
    UnsupportedVersion { found: u8, expected: u8 },
    #[error("Batch contains no observations")]
    EmptyBatch,
    #[error("Batch has {0} trailing bytes after the last observation")]
    TrailingBytes(usize),
}

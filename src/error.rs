use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Corrupt stream errors (decoder side)
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Invalid code length: {0} (valid range 1-64)")]
    InvalidCodeLength(u8),

    #[error("Stream ends in the middle of a token")]
    TruncatedToken,

    #[error("No code matched within 64 bits")]
    CodeNotFound,

    #[error("Back-reference distance {distance} exceeds produced output ({available} bytes)")]
    InvalidBackReference { distance: u16, available: usize },

    // Configuration errors (encoder side)
    #[error("Minimum match length {min} exceeds maximum match length {max}")]
    InvalidMatchBounds { min: u8, max: u8 },

    #[error("Maximum match length is zero but minimum match length is {0}")]
    ZeroMaxMatch(u8),

    // Internal invariant violations
    #[error("Code table has no entries")]
    EmptyCodeTable,

    #[error("No code for byte 0x{0:02x}")]
    MissingCode(u8),
}

pub type Result<T> = std::result::Result<T, Error>;

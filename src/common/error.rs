use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // QR builder
    #[error("content too long for the requested version and error correction level")]
    ContentTooLong,
    #[error("invalid version {0}, expected 1 to 40")]
    InvalidVersion(usize),
    #[error("invalid mask pattern {0}, expected 0 to 7")]
    InvalidMaskPattern(u8),

    // Galois field & bit stream
    #[error("division by zero in GF(256)")]
    DivideByZero,
    #[error("bit stream underflow")]
    BufferUnderflow,

    // Error correction
    #[error("too many errors to correct block")]
    UncorrectableBlock,

    // QR reader
    #[error("invalid grid size {0}")]
    InvalidGridSize(usize),
    #[error("invalid image for symbol sampling")]
    InvalidImage,
    #[error("format info could not be recovered")]
    FormatInfoUnrecoverable,
    #[error("block {0} has too many errors to correct")]
    BlockUncorrectable(usize),
    #[error("corrupt data segment")]
    DataParseError,
}

pub type QRResult<T> = Result<T, QRError>;

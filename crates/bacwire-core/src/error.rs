use thiserror::Error;

/// Failure while appending to an [`EncodeBuffer`](crate::encoding::buffer::EncodeBuffer)
/// or validating a value for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("buffer too small")]
    BufferTooSmall,
    #[error("value out of range")]
    ValueOutOfRange,
    #[error("invalid length")]
    InvalidLength,
    #[error("operation unsupported")]
    Unsupported,
    #[error("{0}")]
    Message(&'static str),
}

/// Failure while decoding received bytes.
///
/// Decoders return this instead of panicking; a decoder that fails has not
/// produced any partial output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid tag")]
    InvalidTag,
    #[error("invalid length")]
    InvalidLength,
    #[error("invalid value")]
    InvalidValue,
    #[error("offset {offset} with bound {bound} exceeds input of {len} bytes")]
    OutOfBounds { offset: usize, bound: usize, len: usize },
    #[error("operation unsupported")]
    Unsupported,
    #[error("{0}")]
    Message(&'static str),
}

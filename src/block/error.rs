//! Errors raised while constructing or decoding block descriptors.

use thiserror::Error;

/// Errors produced by [`Szx`](crate::block::Szx) and
/// [`BlockOption`](crate::block::BlockOption).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    /// The size exponent lies outside `0..=6`.
    #[error("invalid block size exponent {0}, expected 0..=6")]
    InvalidSzx(u8),
    /// The block size is not a power of two between 16 and 1024 bytes.
    #[error("invalid block size {0}, expected a power of two in 16..=1024")]
    InvalidBlockSize(usize),
    /// The block number does not fit in the 20 bits carried on the wire.
    #[error("block number {0} exceeds the 20-bit limit")]
    NumOutOfRange(u32),
    /// An encoded option value was longer than three bytes.
    #[error("block option value has {0} bytes, expected at most 3")]
    ValueTooLong(usize),
}

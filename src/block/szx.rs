//! The three-bit block size exponent.
//!
//! A block of exponent `szx` carries `2^(szx + 4)` bytes, so the valid
//! exponents `0..=6` span block sizes from 16 to 1024 bytes.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::BlockError;

/// Smallest block size in bytes.
pub const MIN_BLOCK_SIZE: usize = 16;
/// Largest block size in bytes.
pub const MAX_BLOCK_SIZE: usize = 1024;

/// Validated block size exponent.
///
/// # Examples
///
/// ```
/// use blockwise::block::Szx;
/// let szx = Szx::from_block_size(512).expect("valid block size");
/// assert_eq!(szx.get(), 5);
/// assert_eq!(szx.size(), 512);
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[display("{_0}")]
#[serde(try_from = "u8", into = "u8")]
pub struct Szx(u8);

impl Szx {
    /// Exponent for 16-byte blocks.
    pub const MIN: Self = Self(0);
    /// Exponent for 1024-byte blocks.
    pub const MAX: Self = Self(6);

    /// Construct an exponent, rejecting values above 6.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::InvalidSzx`] for the reserved value 7 and above.
    pub const fn new(value: u8) -> Result<Self, BlockError> {
        if value > Self::MAX.0 {
            return Err(BlockError::InvalidSzx(value));
        }
        Ok(Self(value))
    }

    /// Encode a block size in bytes as its exponent, `log2(size) - 4`.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::InvalidBlockSize`] unless `size` is a power of two
    /// between 16 and 1024 inclusive.
    pub fn from_block_size(size: usize) -> Result<Self, BlockError> {
        if !size.is_power_of_two() || !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&size) {
            return Err(BlockError::InvalidBlockSize(size));
        }
        let exponent = size.trailing_zeros() - MIN_BLOCK_SIZE.trailing_zeros();
        u8::try_from(exponent)
            .map(Self)
            .map_err(|_| BlockError::InvalidBlockSize(size))
    }

    /// Return the raw exponent.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }

    /// Decode the exponent into a block size in bytes.
    #[must_use]
    pub const fn size(self) -> usize { 1 << (self.0 + 4) }
}

impl TryFrom<u8> for Szx {
    type Error = BlockError;

    fn try_from(value: u8) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Szx> for u8 {
    fn from(value: Szx) -> Self { value.0 }
}

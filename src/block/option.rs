//! Block descriptor shared by the Block1 and Block2 options.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BlockError, Szx};

/// Largest block number representable in the option value.
pub const MAX_NUM: u32 = (1 << 20) - 1;

/// Immutable descriptor of a single block: its index, size exponent and
/// whether more blocks follow.
///
/// # Examples
///
/// ```
/// use blockwise::block::{BlockOption, Szx};
/// let szx = Szx::from_block_size(64).expect("valid block size");
/// let block = BlockOption::new(2, szx, true).expect("num fits in 20 bits");
/// assert_eq!(block.size(), 64);
/// assert_eq!(block.offset(), 128);
/// assert_eq!(block.to_string(), "2/1/64");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockOption {
    num: u32,
    szx: Szx,
    more: bool,
}

impl BlockOption {
    /// Create a new block descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::NumOutOfRange`] when `num` exceeds 20 bits.
    pub const fn new(num: u32, szx: Szx, more: bool) -> Result<Self, BlockError> {
        if num > MAX_NUM {
            return Err(BlockError::NumOutOfRange(num));
        }
        Ok(Self { num, szx, more })
    }

    /// Block index within the full body.
    #[must_use]
    pub const fn num(&self) -> u32 { self.num }

    /// Size exponent of this block.
    #[must_use]
    pub const fn szx(&self) -> Szx { self.szx }

    /// Report whether more blocks follow this one.
    #[must_use]
    pub const fn more(&self) -> bool { self.more }

    /// Block size in bytes.
    #[must_use]
    pub const fn size(&self) -> usize { self.szx.size() }

    /// Byte offset of this block within the full body.
    #[must_use]
    pub const fn offset(&self) -> usize { self.num as usize * self.size() }

    /// Return a copy with the more-flag replaced.
    #[must_use]
    pub const fn with_more(self, more: bool) -> Self { Self { more, ..self } }

    /// Encode the option value as a minimal-length big-endian unsigned
    /// integer, `num << 4 | m << 3 | szx`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let value = (self.num << 4) | (u32::from(self.more) << 3) | u32::from(self.szx.get());
        let bytes = value.to_be_bytes();
        let skip = bytes.iter().take_while(|byte| **byte == 0).count();
        bytes[skip..].to_vec()
    }

    /// Decode an option value produced by [`BlockOption::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::ValueTooLong`] for values longer than three bytes
    /// and [`BlockError::InvalidSzx`] when the reserved exponent 7 is used.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlockError> {
        if bytes.len() > 3 {
            return Err(BlockError::ValueTooLong(bytes.len()));
        }
        let value = bytes
            .iter()
            .fold(0_u32, |acc, byte| (acc << 8) | u32::from(*byte));
        let szx = Szx::new(bytes.last().map_or(0, |byte| byte & 0x7))?;
        Self::new(value >> 4, szx, value & 0x8 != 0)
    }
}

impl fmt::Display for BlockOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.num, u8::from(self.more), self.size())
    }
}

//! Settings consumed by the blockwise layer.
//!
//! [`BlockwiseConfig`] is a plain value. Builder-style setters adjust it in
//! code, and the `serde` implementation lets embedders load it from their
//! own configuration files; deserialisation validates the block size.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::{BlockError, Szx};

const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024;
const DEFAULT_BLOCK_SIZE: Szx = match Szx::new(5) {
    Ok(szx) => szx,
    Err(_) => Szx::MAX,
};
const DEFAULT_MAX_BODY_SIZE: usize = 8192;

/// Errors raised while building a [`BlockwiseConfig`] from raw values.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A size that must be positive was zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    /// The default block size is not a valid block size.
    #[error(transparent)]
    BlockSize(#[from] BlockError),
}

/// Thresholds and sizes governing blockwise transfers.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use blockwise::{BlockwiseConfig, block::Szx};
///
/// let config = BlockwiseConfig::default()
///     .max_message_size(NonZeroUsize::new(256).expect("non-zero"))
///     .default_block_size(Szx::from_block_size(64).expect("valid block size"));
/// assert_eq!(config.max_message_size_value(), 256);
/// assert_eq!(config.default_block_size_value().size(), 64);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBlockwiseConfig", into = "RawBlockwiseConfig")]
pub struct BlockwiseConfig {
    max_message_size: NonZeroUsize,
    default_block_size: Szx,
    max_body_size: NonZeroUsize,
}

impl Default for BlockwiseConfig {
    fn default() -> Self {
        Self {
            max_message_size: NonZeroUsize::new(DEFAULT_MAX_MESSAGE_SIZE)
                .unwrap_or(NonZeroUsize::MIN),
            default_block_size: DEFAULT_BLOCK_SIZE,
            max_body_size: NonZeroUsize::new(DEFAULT_MAX_BODY_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl BlockwiseConfig {
    /// Set the payload size above which outgoing messages are sent in blocks.
    #[must_use]
    pub const fn max_message_size(mut self, bytes: NonZeroUsize) -> Self {
        self.max_message_size = bytes;
        self
    }

    /// Set the block size used for the first block of a transfer.
    #[must_use]
    pub const fn default_block_size(mut self, szx: Szx) -> Self {
        self.default_block_size = szx;
        self
    }

    /// Set the largest body accepted when reassembling incoming blocks.
    #[must_use]
    pub const fn max_body_size(mut self, bytes: NonZeroUsize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Payload threshold in bytes.
    #[must_use]
    pub const fn max_message_size_value(&self) -> usize { self.max_message_size.get() }

    /// Size exponent of the first outgoing block.
    #[must_use]
    pub const fn default_block_size_value(&self) -> Szx { self.default_block_size }

    /// Reassembly cap in bytes.
    #[must_use]
    pub const fn max_body_size_value(&self) -> NonZeroUsize { self.max_body_size }
}

/// Unvalidated form used for (de)serialisation, sizes in bytes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
struct RawBlockwiseConfig {
    max_message_size: usize,
    default_block_size: usize,
    #[serde(default = "default_max_body_size")]
    max_body_size: usize,
}

fn default_max_body_size() -> usize { DEFAULT_MAX_BODY_SIZE }

impl TryFrom<RawBlockwiseConfig> for BlockwiseConfig {
    type Error = ConfigError;

    fn try_from(raw: RawBlockwiseConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            max_message_size: NonZeroUsize::new(raw.max_message_size)
                .ok_or(ConfigError::Zero("max_message_size"))?,
            default_block_size: Szx::from_block_size(raw.default_block_size)?,
            max_body_size: NonZeroUsize::new(raw.max_body_size)
                .ok_or(ConfigError::Zero("max_body_size"))?,
        })
    }
}

impl From<BlockwiseConfig> for RawBlockwiseConfig {
    fn from(config: BlockwiseConfig) -> Self {
        Self {
            max_message_size: config.max_message_size.get(),
            default_block_size: config.default_block_size.size(),
            max_body_size: config.max_body_size.get(),
        }
    }
}

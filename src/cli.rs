//! Command line interface for the blockwise demo binary.
//!
//! Sizes are given in bytes and validated when the transfer settings are
//! built.

use std::num::NonZeroUsize;

use blockwise::{BlockwiseConfig, ConfigError, Szx};
use clap::Parser;

/// Command line arguments for the `blockwise` binary.
#[derive(Debug, Parser)]
#[command(
    name = "blockwise",
    version,
    about = "Run a blockwise transfer over an in-memory link"
)]
pub struct Cli {
    /// Request payload size in bytes.
    #[arg(long, default_value_t = 2048)]
    pub request_size: usize,

    /// Response payload size in bytes.
    #[arg(long, default_value_t = 2048)]
    pub response_size: usize,

    /// Block size in bytes; a power of two from 16 to 1024.
    #[arg(long, default_value_t = 512)]
    pub block_size: usize,

    /// Payload size above which messages are sent in blocks.
    #[arg(long, default_value = "1024")]
    pub max_message_size: NonZeroUsize,
}

impl Cli {
    /// Build the settings shared by both ends of the link.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BlockSize`] when `--block-size` is not a valid
    /// block size.
    pub fn config(&self) -> Result<BlockwiseConfig, ConfigError> {
        Ok(BlockwiseConfig::default()
            .max_message_size(self.max_message_size)
            .default_block_size(Szx::from_block_size(self.block_size)?))
    }
}

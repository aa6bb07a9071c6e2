//! Error and status types emitted by the block assemblers.

use std::num::NonZeroUsize;

use thiserror::Error;

use crate::block::{BlockError, BlockOption};

/// Result of inserting a block into an assembler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssemblyStatus {
    /// The body still expects more blocks.
    Incomplete,
    /// The block completed the body.
    Complete,
    /// The block repeated data already held and was ignored.
    Duplicate,
}

/// Errors produced while fragmenting or reassembling a body.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    /// The inserted message carried no block option.
    #[error("message carries no block option")]
    MissingBlockOption,
    /// A fragmenting assembler was asked to insert, or a reassembling one to
    /// produce blocks.
    #[error("assembler cannot {0} in its current role")]
    WrongRole(&'static str),
    /// A block's payload length disagrees with its block size.
    #[error("block {block} carries {len} bytes")]
    InvalidBlockLength { block: BlockOption, len: usize },
    /// A block only partially overlaps the bytes already assembled.
    #[error("block {block} overlaps {assembled} assembled bytes")]
    Overlap {
        block: BlockOption,
        assembled: usize,
    },
    /// A block lies beyond, or conflicts with, the final block.
    #[error("block {block} lies beyond the final block")]
    BeyondFinalBlock { block: BlockOption },
    /// The reassembled body would exceed the configured cap.
    #[error("body of {attempted} bytes exceeds limit of {limit}")]
    BodyTooLarge {
        attempted: usize,
        limit: NonZeroUsize,
    },
    /// A requested block starts at or beyond the end of the body.
    #[error("block {num} lies outside a body of {body_len} bytes")]
    BlockOutOfRange { num: u32, body_len: usize },
    /// The block descriptor could not be built.
    #[error(transparent)]
    Block(#[from] BlockError),
}

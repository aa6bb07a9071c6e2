//! Metric helpers for `blockwise`.
//!
//! This module defines metric names and simple helper functions
//! wrapping the [`metrics`](https://docs.rs/metrics) crate.

use metrics::counter;

/// Name of the counter tracking blocks sent and received.
pub const BLOCKS_TOTAL: &str = "blockwise_blocks_total";
/// Name of the counter tracking completed blockwise transfers.
pub const TRANSFERS_COMPLETED: &str = "blockwise_transfers_completed_total";
/// Name of the counter tracking protocol errors.
pub const ERRORS_TOTAL: &str = "blockwise_errors_total";

/// Direction of block processing.
#[derive(Clone, Copy, Debug)]
pub enum Direction {
    /// Blocks received from the peer.
    Inbound,
    /// Blocks sent to the peer.
    Outbound,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Which block option a transfer uses.
#[derive(Clone, Copy, Debug)]
pub enum BlockKind {
    /// Request body blocks.
    Block1,
    /// Response body blocks.
    Block2,
}

impl BlockKind {
    fn as_str(self) -> &'static str {
        match self {
            BlockKind::Block1 => "block1",
            BlockKind::Block2 => "block2",
        }
    }
}

/// Record a block sent or received.
pub fn inc_blocks(direction: Direction, kind: BlockKind) {
    counter!(BLOCKS_TOTAL, "direction" => direction.as_str(), "option" => kind.as_str())
        .increment(1);
}

/// Record a fully reassembled body.
pub fn inc_transfers(kind: BlockKind) {
    counter!(TRANSFERS_COMPLETED, "option" => kind.as_str()).increment(1);
}

/// Record a protocol error.
pub fn inc_errors() { counter!(ERRORS_TOTAL).increment(1); }

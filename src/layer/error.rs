//! Errors surfaced by the layer pipeline.

use thiserror::Error;

use crate::{assembler::AssemblyError, block::BlockOption};

/// Failure reported by the transport beneath the stack.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while a message travels through the stack.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LayerError {
    /// A response acknowledged a request block, but no request was being
    /// sent in blocks on this exchange.
    #[error("response carries block1 {block} but no request assembler is attached")]
    MissingRequestAssembler { block: BlockOption },
    /// Fragmenting or reassembling a body failed.
    #[error("blockwise assembly failed: {0}")]
    Assembly(#[from] AssemblyError),
    /// The transport rejected an outgoing message.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),
}

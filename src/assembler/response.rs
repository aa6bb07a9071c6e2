//! Response body fragmentation and reassembly.

use std::num::NonZeroUsize;

use super::{AssemblyError, AssemblyStatus, assembly::Assembly};
use crate::{
    block::{BlockOption, Szx},
    message::Response,
};

/// Splits an outgoing response body into Block2 blocks of a fixed size, or
/// rebuilds an incoming one.
#[derive(Debug)]
pub struct ResponseBlockAssembler {
    assembly: Assembly<Response>,
    szx: Option<Szx>,
}

impl ResponseBlockAssembler {
    /// Create a receiving assembler that caps the rebuilt body at `limit`
    /// bytes.
    #[must_use]
    pub fn new(limit: NonZeroUsize) -> Self {
        Self {
            assembly: Assembly::reassembling(limit),
            szx: None,
        }
    }

    /// Create a sending assembler cutting `response` into blocks of `szx`.
    #[must_use]
    pub fn for_response(response: Response, szx: Szx) -> Self {
        Self {
            assembly: Assembly::fragmenting(response),
            szx: Some(szx),
        }
    }

    /// Produce block `num`, stamped with a Block2 option.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::BlockOutOfRange`] when the block starts past
    /// the end of the body and [`AssemblyError::WrongRole`] for receiving
    /// assemblers.
    pub fn block(&mut self, num: u32) -> Result<Response, AssemblyError> {
        let szx = self
            .szx
            .ok_or(AssemblyError::WrongRole("produce blocks"))?;
        self.assembly.block(szx, num)
    }

    /// Insert a received response block.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError`] when the block lacks a Block2 option, has an
    /// invalid length, overlaps or exceeds the body, or when the assembler is
    /// sending.
    pub fn insert(&mut self, response: Response) -> Result<AssemblyStatus, AssemblyError> {
        self.assembly.insert(response)
    }

    /// Report whether this assembler cuts an outgoing response into blocks.
    #[must_use]
    pub fn is_sending(&self) -> bool { self.assembly.is_fragmenting() }

    /// Report whether the last block has been produced or received.
    #[must_use]
    pub fn is_complete(&self) -> bool { self.assembly.is_complete() }

    /// Block most recently produced or spliced.
    #[must_use]
    pub fn current_block(&self) -> Option<BlockOption> { self.assembly.current() }

    /// Index of the current block, zero before any block.
    #[must_use]
    pub fn current_num(&self) -> u32 { self.assembly.current().map_or(0, |block| block.num()) }

    /// Body bytes held: the full body when sending, the contiguous prefix
    /// when receiving.
    #[must_use]
    pub fn body_len(&self) -> usize { self.assembly.body_len() }

    /// Number of received blocks waiting for an earlier gap to fill.
    #[must_use]
    pub fn parked_len(&self) -> usize { self.assembly.parked_len() }

    /// The reassembled response, carrying the options of its final block.
    #[must_use]
    pub fn assembled_response(&self) -> Option<Response> { self.assembly.assembled() }
}

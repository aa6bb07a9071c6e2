//! Request body fragmentation and reassembly.

use std::num::NonZeroUsize;

use super::{AssemblyError, AssemblyStatus, assembly::Assembly};
use crate::{
    block::{BlockOption, Szx},
    message::Request,
};

/// Splits an outgoing request body into Block1 blocks, or rebuilds an
/// incoming one.
///
/// # Examples
///
/// ```
/// use blockwise::{
///     assembler::RequestBlockAssembler,
///     block::Szx,
///     message::{Method, Request},
/// };
///
/// let request = Request::new(Method::Post).with_payload(vec![7_u8; 40]);
/// let mut assembler = RequestBlockAssembler::for_request(request);
/// let szx = Szx::from_block_size(16).expect("valid block size");
///
/// let first = assembler.block(szx, 0).expect("first block");
/// assert_eq!(first.payload_size(), 16);
/// assert!(first.options().block1().is_some_and(|block| block.more()));
///
/// let last = assembler.block(szx, 2).expect("last block");
/// assert_eq!(last.payload_size(), 8);
/// assert!(assembler.is_complete());
/// ```
#[derive(Debug)]
pub struct RequestBlockAssembler {
    assembly: Assembly<Request>,
}

impl RequestBlockAssembler {
    /// Create a receiving assembler that caps the rebuilt body at `limit`
    /// bytes.
    #[must_use]
    pub fn new(limit: NonZeroUsize) -> Self {
        Self {
            assembly: Assembly::reassembling(limit),
        }
    }

    /// Create a sending assembler holding the full `request`.
    #[must_use]
    pub fn for_request(request: Request) -> Self {
        Self {
            assembly: Assembly::fragmenting(request),
        }
    }

    /// Produce block `num` of size `szx`, stamped with a Block1 option.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::BlockOutOfRange`] when the block starts past
    /// the end of the body and [`AssemblyError::WrongRole`] for receiving
    /// assemblers.
    pub fn block(&mut self, szx: Szx, num: u32) -> Result<Request, AssemblyError> {
        self.assembly.block(szx, num)
    }

    /// Insert a received request block.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError`] when the block lacks a Block1 option, has an
    /// invalid length, overlaps or exceeds the body, or when the assembler is
    /// sending.
    pub fn insert(&mut self, request: Request) -> Result<AssemblyStatus, AssemblyError> {
        self.assembly.insert(request)
    }

    /// Report whether this assembler cuts an outgoing request into blocks.
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

    /// Size exponent of the current block.
    #[must_use]
    pub fn current_szx(&self) -> Option<Szx> { self.assembly.current().map(|block| block.szx()) }

    /// Size in bytes of the current block, zero before any block.
    #[must_use]
    pub fn current_size(&self) -> usize { self.assembly.current().map_or(0, |block| block.size()) }

    /// Body bytes held: the full body when sending, the contiguous prefix
    /// when receiving.
    #[must_use]
    pub fn body_len(&self) -> usize { self.assembly.body_len() }

    /// Number of received blocks waiting for an earlier gap to fill.
    #[must_use]
    pub fn parked_len(&self) -> usize { self.assembly.parked_len() }

    /// The reassembled request, carrying the options of its final block.
    #[must_use]
    pub fn assembled_request(&self) -> Option<Request> { self.assembly.assembled() }
}

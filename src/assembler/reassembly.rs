//! Receiver-side accumulation of body blocks.
//!
//! [`BlockReassembly`] mirrors the ordering rules of a fragment series but
//! works on byte offsets, so a peer may change the block size mid-transfer.
//! Blocks covering bytes already held are reported as duplicates. Blocks
//! that start past the contiguous prefix are parked until the gap fills,
//! which keeps the result independent of arrival order.

use std::{cmp::Ordering, collections::BTreeMap, num::NonZeroUsize};

use bytes::{Bytes, BytesMut};

use super::{AssemblyError, AssemblyStatus};
use crate::block::BlockOption;

#[derive(Debug)]
struct ParkedBlock {
    block: BlockOption,
    payload: Bytes,
}

/// Accumulates body blocks into a contiguous buffer.
#[derive(Debug)]
pub(crate) struct BlockReassembly {
    limit: NonZeroUsize,
    body: BytesMut,
    parked: BTreeMap<usize, ParkedBlock>,
    last: Option<BlockOption>,
    final_end: Option<usize>,
    complete: bool,
}

impl BlockReassembly {
    pub(crate) fn new(limit: NonZeroUsize) -> Self {
        Self {
            limit,
            body: BytesMut::new(),
            parked: BTreeMap::new(),
            last: None,
            final_end: None,
            complete: false,
        }
    }

    /// Accept one block and its payload.
    pub(crate) fn accept(
        &mut self,
        block: BlockOption,
        payload: &Bytes,
    ) -> Result<AssemblyStatus, AssemblyError> {
        let len = payload.len();
        if len > block.size() || (block.more() && len != block.size()) {
            return Err(AssemblyError::InvalidBlockLength { block, len });
        }

        let offset = block.offset();
        let end = offset + len;
        let assembled = self.body.len();

        if self.complete || offset < assembled {
            if end <= assembled {
                return Ok(AssemblyStatus::Duplicate);
            }
            if self.complete {
                return Err(AssemblyError::BeyondFinalBlock { block });
            }
            return Err(AssemblyError::Overlap { block, assembled });
        }

        self.check_final(block, end)?;
        if end > self.limit.get() {
            return Err(AssemblyError::BodyTooLarge {
                attempted: end,
                limit: self.limit,
            });
        }

        if offset > assembled {
            if self.parked.contains_key(&offset) {
                return Ok(AssemblyStatus::Duplicate);
            }
            self.parked.insert(
                offset,
                ParkedBlock {
                    block,
                    payload: payload.clone(),
                },
            );
            if !block.more() {
                self.final_end = Some(end);
            }
            return Ok(AssemblyStatus::Incomplete);
        }

        self.splice(block, payload);
        self.drain_parked();
        if self.complete {
            Ok(AssemblyStatus::Complete)
        } else {
            Ok(AssemblyStatus::Incomplete)
        }
    }

    pub(crate) const fn is_complete(&self) -> bool { self.complete }

    /// Most recently spliced block.
    pub(crate) const fn last_block(&self) -> Option<BlockOption> { self.last }

    pub(crate) fn assembled_len(&self) -> usize { self.body.len() }

    pub(crate) fn parked_len(&self) -> usize { self.parked.len() }

    pub(crate) fn body(&self) -> Bytes { Bytes::copy_from_slice(&self.body) }

    fn check_final(&self, block: BlockOption, end: usize) -> Result<(), AssemblyError> {
        let beyond = match self.final_end {
            Some(final_end) => end > final_end || (!block.more() && end != final_end),
            // A parked block reaching past this final block contradicts it.
            None => {
                !block.more()
                    && self
                        .parked
                        .iter()
                        .any(|(offset, parked)| offset + parked.payload.len() > end)
            }
        };
        if beyond {
            return Err(AssemblyError::BeyondFinalBlock { block });
        }
        Ok(())
    }

    fn splice(&mut self, block: BlockOption, payload: &[u8]) {
        self.body.extend_from_slice(payload);
        self.last = Some(block);
        if !block.more() {
            self.complete = true;
            self.final_end = Some(self.body.len());
        }
    }

    fn drain_parked(&mut self) {
        while let Some(entry) = self.parked.first_entry() {
            match entry.key().cmp(&self.body.len()) {
                Ordering::Less => {
                    entry.remove();
                }
                Ordering::Equal => {
                    let parked = entry.remove();
                    self.splice(parked.block, &parked.payload);
                }
                Ordering::Greater => break,
            }
        }
    }
}

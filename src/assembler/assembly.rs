//! Role-aware assembly state shared by the request and response assemblers.

use std::num::NonZeroUsize;

use bytes::Bytes;

use super::{AssemblyError, AssemblyStatus, BlockCarrier, reassembly::BlockReassembly};
use crate::block::{BlockOption, Szx};

#[derive(Debug)]
enum Mode<M> {
    Fragmenting {
        template: M,
        body: Bytes,
    },
    Reassembling {
        reassembly: BlockReassembly,
        template: Option<M>,
    },
}

/// Fragmentation or reassembly state for one message body.
#[derive(Debug)]
pub(crate) struct Assembly<M> {
    mode: Mode<M>,
    current: Option<BlockOption>,
}

impl<M: BlockCarrier> Assembly<M> {
    pub(crate) fn fragmenting(message: M) -> Self {
        let body = message.body().clone();
        Self {
            mode: Mode::Fragmenting {
                template: message,
                body,
            },
            current: None,
        }
    }

    pub(crate) fn reassembling(limit: NonZeroUsize) -> Self {
        Self {
            mode: Mode::Reassembling {
                reassembly: BlockReassembly::new(limit),
                template: None,
            },
            current: None,
        }
    }

    /// Cut block `num` of size `szx` out of the held body.
    pub(crate) fn block(&mut self, szx: Szx, num: u32) -> Result<M, AssemblyError> {
        let Mode::Fragmenting { template, body } = &self.mode else {
            return Err(AssemblyError::WrongRole("produce blocks"));
        };

        let out_of_range = AssemblyError::BlockOutOfRange {
            num,
            body_len: body.len(),
        };
        let offset = usize::try_from(num)
            .ok()
            .and_then(|num| num.checked_mul(szx.size()))
            .ok_or(out_of_range)?;
        if offset >= body.len() && !(num == 0 && body.is_empty()) {
            return Err(out_of_range);
        }

        let end = (offset + szx.size()).min(body.len());
        let option = BlockOption::new(num, szx, end < body.len())?;
        let mut block = template.clone();
        block.set_body(body.slice(offset..end));
        block.set_body_block(option);
        block.reset_for_block(num);

        self.current = Some(option);
        Ok(block)
    }

    /// Add a received block to the body.
    pub(crate) fn insert(&mut self, message: M) -> Result<AssemblyStatus, AssemblyError> {
        let Mode::Reassembling {
            reassembly,
            template,
        } = &mut self.mode
        else {
            return Err(AssemblyError::WrongRole("insert blocks"));
        };

        let block = message
            .body_block()
            .ok_or(AssemblyError::MissingBlockOption)?;
        let status = reassembly.accept(block, message.body())?;
        if status != AssemblyStatus::Duplicate {
            if !block.more() || template.is_none() {
                *template = Some(message);
            }
            self.current = reassembly.last_block();
        }
        Ok(status)
    }

    pub(crate) fn is_complete(&self) -> bool {
        match &self.mode {
            Mode::Fragmenting { .. } => self.current.is_some_and(|block| !block.more()),
            Mode::Reassembling { reassembly, .. } => reassembly.is_complete(),
        }
    }

    pub(crate) const fn current(&self) -> Option<BlockOption> { self.current }

    pub(crate) const fn is_fragmenting(&self) -> bool { matches!(self.mode, Mode::Fragmenting { .. }) }

    /// Bytes held so far: the full body when fragmenting, the contiguous
    /// prefix when reassembling.
    pub(crate) fn body_len(&self) -> usize {
        match &self.mode {
            Mode::Fragmenting { body, .. } => body.len(),
            Mode::Reassembling { reassembly, .. } => reassembly.assembled_len(),
        }
    }

    pub(crate) fn parked_len(&self) -> usize {
        match &self.mode {
            Mode::Fragmenting { .. } => 0,
            Mode::Reassembling { reassembly, .. } => reassembly.parked_len(),
        }
    }

    /// The full message built from the final block's template, once complete.
    pub(crate) fn assembled(&self) -> Option<M> {
        let Mode::Reassembling {
            reassembly,
            template: Some(template),
        } = &self.mode
        else {
            return None;
        };
        if !reassembly.is_complete() {
            return None;
        }
        let mut message = template.clone();
        message.set_body(reassembly.body());
        Some(message)
    }
}

//! Block assemblers for request and response bodies.
//!
//! An assembler plays one of two roles for the lifetime of a conversation.
//! On the sending endpoint it holds the full message and cuts it into
//! blocks on demand; on the receiving endpoint it accumulates blocks and
//! rebuilds the full message. [`RequestBlockAssembler`] works on Block1 and
//! request bodies, [`ResponseBlockAssembler`] on Block2 and response bodies.

mod assembly;
pub mod error;
mod reassembly;
pub mod request;
pub mod response;

use bytes::Bytes;

pub use error::{AssemblyError, AssemblyStatus};
pub use request::RequestBlockAssembler;
pub use response::ResponseBlockAssembler;

use crate::{
    block::BlockOption,
    message::{MessageType, Request, Response},
};

/// A message whose body can be split across blocks.
///
/// Requests carry their body blocks in Block1, responses in Block2.
pub trait BlockCarrier: Clone {
    /// Return the block option describing this message's body block.
    fn body_block(&self) -> Option<BlockOption>;

    /// Stamp the block option describing this message's body block.
    fn set_body_block(&mut self, block: BlockOption);

    /// Borrow the body bytes.
    fn body(&self) -> &Bytes;

    /// Replace the body bytes.
    fn set_body(&mut self, body: Bytes);

    /// Reset per-transmission state on a block derived from the template.
    ///
    /// Block 0 keeps the template's message id so it can ride on the
    /// template's acknowledgement; later blocks are fresh messages.
    fn reset_for_block(&mut self, num: u32);
}

impl BlockCarrier for Request {
    fn body_block(&self) -> Option<BlockOption> { self.options().block1() }

    fn set_body_block(&mut self, block: BlockOption) { self.options_mut().set_block1(block); }

    fn body(&self) -> &Bytes { self.payload() }

    fn set_body(&mut self, body: Bytes) { self.set_payload(body); }

    fn reset_for_block(&mut self, num: u32) {
        if num > 0 {
            self.clear_message_id();
        }
        self.set_acknowledged(false);
    }
}

impl BlockCarrier for Response {
    fn body_block(&self) -> Option<BlockOption> { self.options().block2() }

    fn set_body_block(&mut self, block: BlockOption) { self.options_mut().set_block2(block); }

    fn body(&self) -> &Bytes { self.payload() }

    fn set_body(&mut self, body: Bytes) { self.set_payload(body); }

    fn reset_for_block(&mut self, num: u32) {
        if num > 0 {
            self.clear_message_id();
            if self.message_type() == MessageType::Acknowledgement {
                self.set_message_type(MessageType::Confirmable);
            }
        }
        self.set_acknowledged(false);
    }
}

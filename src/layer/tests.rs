//! Unit tests for the layer pipeline and the blockwise layer.
//!
//! Tests are split into focused submodules: stack plumbing, Block1 request
//! transfers and Block2 response transfers.

mod request_tests;

use std::{
    num::NonZeroUsize,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use super::{BlockwiseLayer, Outbound, Outbox, Stack, TransportError};
use crate::{
    BlockwiseConfig,
    Exchange,
    block::{BlockOption, Szx},
    message::{EmptyMessage, Request, Response},
};

/// Outbox keeping every message handed to the transport.
#[derive(Debug, Default)]
struct Recorder {
    sent: Mutex<Vec<Outbound>>,
}

impl Recorder {
    fn take(&self) -> Vec<Outbound> { std::mem::take(&mut *self.sent.lock().expect("recorder lock")) }

    fn take_requests(&self) -> Vec<Request> {
        self.take()
            .into_iter()
            .map(|message| match message {
                Outbound::Request(request) => request,
                other => panic!("expected a request, got {other:?}"),
            })
            .collect()
    }

    fn take_responses(&self) -> Vec<Response> {
        self.take()
            .into_iter()
            .map(|message| match message {
                Outbound::Response(response) => response,
                other => panic!("expected a response, got {other:?}"),
            })
            .collect()
    }

    fn take_empties(&self) -> Vec<EmptyMessage> {
        self.take()
            .into_iter()
            .map(|message| match message {
                Outbound::Empty(empty) => empty,
                other => panic!("expected an empty message, got {other:?}"),
            })
            .collect()
    }
}

#[async_trait]
impl Outbox for Recorder {
    async fn send(&self, _exchange: &Arc<Exchange>, message: Outbound) -> Result<(), TransportError> {
        self.sent.lock().expect("recorder lock").push(message);
        Ok(())
    }
}

fn szx(size: usize) -> Szx { Szx::from_block_size(size).expect("valid block size") }

fn block(num: u32, size: usize, more: bool) -> BlockOption {
    BlockOption::new(num, szx(size), more).expect("valid num")
}

fn config(max_message_size: usize, block_size: usize) -> BlockwiseConfig {
    BlockwiseConfig::default()
        .max_message_size(NonZeroUsize::new(max_message_size).expect("non-zero"))
        .default_block_size(szx(block_size))
}

/// A stack holding only the blockwise layer over a recording outbox.
fn blockwise_stack(config: BlockwiseConfig) -> (Stack, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let stack = Stack::with_outbox(recorder.clone()).layer(BlockwiseLayer::new(config));
    (stack, recorder)
}

fn body(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| u8::try_from(i % 251).expect("below 256"))
        .collect()
}

//! Transport stand-ins for a [`Stack`](blockwise::Stack).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blockwise::{
    Exchange,
    Outbound,
    Outbox,
    TransportError,
    message::{EmptyMessage, Request, Response},
};

/// Outbox keeping every message it is handed.
#[derive(Debug, Default)]
pub struct RecordingOutbox {
    sent: Mutex<Vec<Outbound>>,
}

impl RecordingOutbox {
    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<Outbound> {
        std::mem::take(&mut *self.sent.lock().expect("recording outbox poisoned"))
    }

    /// Number of messages recorded and not yet taken.
    pub fn len(&self) -> usize { self.sent.lock().expect("recording outbox poisoned").len() }

    /// Report whether nothing is waiting to be taken.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Take the recorded messages, which must all be requests.
    pub fn requests(&self) -> Vec<Request> {
        self.take()
            .into_iter()
            .map(|message| match message {
                Outbound::Request(request) => request,
                other => panic!("expected a request, got {other:?}"),
            })
            .collect()
    }

    /// Take the recorded messages, which must all be responses.
    pub fn responses(&self) -> Vec<Response> {
        self.take()
            .into_iter()
            .map(|message| match message {
                Outbound::Response(response) => response,
                other => panic!("expected a response, got {other:?}"),
            })
            .collect()
    }

    /// Take the recorded messages, which must all be empty messages.
    pub fn empties(&self) -> Vec<EmptyMessage> {
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
impl Outbox for RecordingOutbox {
    async fn send(&self, _exchange: &Arc<Exchange>, message: Outbound) -> Result<(), TransportError> {
        self.sent
            .lock()
            .expect("recording outbox poisoned")
            .push(message);
        Ok(())
    }
}

/// Outbox refusing every message with a fixed reason.
#[derive(Clone, Copy, Debug)]
pub struct FailingOutbox(pub &'static str);

#[async_trait]
impl Outbox for FailingOutbox {
    async fn send(&self, _exchange: &Arc<Exchange>, _message: Outbound) -> Result<(), TransportError> {
        Err(self.0.into())
    }
}

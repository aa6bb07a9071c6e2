//! Bidirectional layer pipeline.
//!
//! A [`Stack`] is an ordered list of [`Layer`]s, topmost first, resting on an
//! [`Outbox`] that hands messages to the transport. Outgoing messages travel
//! from the top layer down to the outbox; incoming messages travel from the
//! bottom layer up to the endpoint. Each layer answers with a [`Flow`] that
//! forwards the message unchanged, substitutes another message, or
//! suppresses it. Layers emit extra messages through the [`Below`]
//! continuation, which runs only the layers beneath them.

pub mod blockwise;
pub mod error;
pub mod stack;
pub mod trace;

use std::sync::Arc;

use async_trait::async_trait;

pub use blockwise::BlockwiseLayer;
pub use error::{LayerError, TransportError};
pub use stack::{Below, Outbound, Outbox, Stack};
pub use trace::TraceLayer;

use crate::{
    Exchange,
    message::{EmptyMessage, Request, Response},
};

/// Decision a layer takes on a message passing through it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum Flow<M> {
    /// Pass the message on unchanged.
    Forward(M),
    /// Pass on a message substituted for the original.
    Transformed(M),
    /// Stop the message here.
    Suppress,
}

impl<M> Flow<M> {
    /// Return the message to pass on, or `None` when suppressed.
    #[must_use]
    pub fn into_message(self) -> Option<M> {
        match self {
            Flow::Forward(message) | Flow::Transformed(message) => Some(message),
            Flow::Suppress => None,
        }
    }

    /// Borrow the message to pass on, if any.
    #[must_use]
    pub const fn message(&self) -> Option<&M> {
        match self {
            Flow::Forward(message) | Flow::Transformed(message) => Some(message),
            Flow::Suppress => None,
        }
    }

    /// Report whether the message was stopped.
    #[must_use]
    pub const fn is_suppressed(&self) -> bool { matches!(self, Flow::Suppress) }
}

/// One stage of the pipeline.
///
/// Every method defaults to forwarding the message unchanged, so a layer
/// only overrides the events it interposes on.
#[async_trait]
pub trait Layer: Send + Sync {
    /// Handle a request travelling towards the transport.
    async fn send_request(
        &self,
        _exchange: &Arc<Exchange>,
        request: Request,
        _below: Below<'_>,
    ) -> Result<Flow<Request>, LayerError> {
        Ok(Flow::Forward(request))
    }

    /// Handle a response travelling towards the transport.
    async fn send_response(
        &self,
        _exchange: &Arc<Exchange>,
        response: Response,
        _below: Below<'_>,
    ) -> Result<Flow<Response>, LayerError> {
        Ok(Flow::Forward(response))
    }

    /// Handle an empty message travelling towards the transport.
    async fn send_empty(
        &self,
        _exchange: &Arc<Exchange>,
        message: EmptyMessage,
        _below: Below<'_>,
    ) -> Result<Flow<EmptyMessage>, LayerError> {
        Ok(Flow::Forward(message))
    }

    /// Handle a request travelling towards the endpoint.
    async fn receive_request(
        &self,
        _exchange: &Arc<Exchange>,
        request: Request,
        _below: Below<'_>,
    ) -> Result<Flow<Request>, LayerError> {
        Ok(Flow::Forward(request))
    }

    /// Handle a response travelling towards the endpoint.
    async fn receive_response(
        &self,
        _exchange: &Arc<Exchange>,
        response: Response,
        _below: Below<'_>,
    ) -> Result<Flow<Response>, LayerError> {
        Ok(Flow::Forward(response))
    }

    /// Handle an empty message travelling towards the endpoint.
    async fn receive_empty(
        &self,
        _exchange: &Arc<Exchange>,
        message: EmptyMessage,
        _below: Below<'_>,
    ) -> Result<Flow<EmptyMessage>, LayerError> {
        Ok(Flow::Forward(message))
    }
}

#[cfg(test)]
mod tests;

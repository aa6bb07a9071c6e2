//! Ordered composition of layers over an outbox.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use derive_more::From;

use super::{Flow, Layer, LayerError, TransportError};
use crate::{
    Exchange,
    message::{EmptyMessage, Request, Response},
};

/// A message handed to the transport.
#[derive(Clone, Debug, PartialEq, Eq, From)]
pub enum Outbound {
    /// An outgoing request or request block.
    Request(Request),
    /// An outgoing response or response block.
    Response(Response),
    /// An outgoing empty message.
    Empty(EmptyMessage),
}

/// Transport collaborator receiving everything that leaves the bottom layer.
#[async_trait]
pub trait Outbox: Send + Sync {
    /// Transmit `message` on behalf of `exchange`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the message cannot be sent.
    async fn send(&self, exchange: &Arc<Exchange>, message: Outbound) -> Result<(), TransportError>;
}

/// Continuation giving a layer access to the layers beneath it.
#[derive(Clone, Copy)]
pub struct Below<'a> {
    layers: &'a [Arc<dyn Layer>],
    outbox: &'a dyn Outbox,
}

impl fmt::Debug for Below<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Below")
            .field("layers", &self.layers.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Below<'a> {
    fn new(layers: &'a [Arc<dyn Layer>], outbox: &'a dyn Outbox) -> Self { Self { layers, outbox } }

    fn split(&self, index: usize) -> Self {
        Self::new(self.layers.get(index + 1..).unwrap_or_default(), self.outbox)
    }

    /// Send `request` through the remaining layers to the outbox.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayerError`] raised beneath, including transport
    /// failures.
    pub async fn send_request(
        self,
        exchange: &Arc<Exchange>,
        mut request: Request,
    ) -> Result<(), LayerError> {
        for (index, layer) in self.layers.iter().enumerate() {
            let flow = layer
                .send_request(exchange, request, self.split(index))
                .await?;
            let Some(next) = flow.into_message() else {
                return Ok(());
            };
            request = next;
        }
        self.transmit(exchange, request.into()).await
    }

    /// Send `response` through the remaining layers to the outbox.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayerError`] raised beneath, including transport
    /// failures.
    pub async fn send_response(
        self,
        exchange: &Arc<Exchange>,
        mut response: Response,
    ) -> Result<(), LayerError> {
        for (index, layer) in self.layers.iter().enumerate() {
            let flow = layer
                .send_response(exchange, response, self.split(index))
                .await?;
            let Some(next) = flow.into_message() else {
                return Ok(());
            };
            response = next;
        }
        self.transmit(exchange, response.into()).await
    }

    /// Send `message` through the remaining layers to the outbox.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayerError`] raised beneath, including transport
    /// failures.
    pub async fn send_empty(
        self,
        exchange: &Arc<Exchange>,
        mut message: EmptyMessage,
    ) -> Result<(), LayerError> {
        for (index, layer) in self.layers.iter().enumerate() {
            let flow = layer
                .send_empty(exchange, message, self.split(index))
                .await?;
            let Some(next) = flow.into_message() else {
                return Ok(());
            };
            message = next;
        }
        self.transmit(exchange, message.into()).await
    }

    async fn transmit(self, exchange: &Arc<Exchange>, message: Outbound) -> Result<(), LayerError> {
        self.outbox
            .send(exchange, message)
            .await
            .map_err(LayerError::Transport)
    }
}

/// An ordered pipeline of layers, topmost first, over an outbox.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use async_trait::async_trait;
/// use blockwise::{
///     BlockwiseConfig,
///     Exchange,
///     layer::{BlockwiseLayer, Outbound, Outbox, Stack, TraceLayer, TransportError},
///     message::{Method, Request},
/// };
///
/// struct Discard;
///
/// #[async_trait]
/// impl Outbox for Discard {
///     async fn send(&self, _: &Arc<Exchange>, _: Outbound) -> Result<(), TransportError> {
///         Ok(())
///     }
/// }
///
/// let stack = Stack::new(Discard)
///     .layer(TraceLayer)
///     .layer(BlockwiseLayer::new(BlockwiseConfig::default()));
/// let exchange = Arc::new(Exchange::new());
/// let request = Request::new(Method::Get);
/// # let runtime = tokio::runtime::Builder::new_current_thread()
/// #     .build()
/// #     .expect("runtime");
/// let delivered = runtime.block_on(stack.receive_request(&exchange, request.clone()));
/// assert_eq!(delivered.expect("no layer error"), Some(request));
/// ```
pub struct Stack {
    layers: Vec<Arc<dyn Layer>>,
    outbox: Arc<dyn Outbox>,
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("layers", &self.layers.len())
            .finish_non_exhaustive()
    }
}

impl Stack {
    /// Create an empty stack over `outbox`.
    #[must_use]
    pub fn new(outbox: impl Outbox + 'static) -> Self { Self::with_outbox(Arc::new(outbox)) }

    /// Create an empty stack over a shared `outbox`.
    #[must_use]
    pub fn with_outbox(outbox: Arc<dyn Outbox>) -> Self {
        Self {
            layers: Vec::new(),
            outbox,
        }
    }

    /// Append `layer` beneath the layers added so far.
    #[must_use]
    pub fn layer(mut self, layer: impl Layer + 'static) -> Self {
        self.layers.push(Arc::new(layer));
        self
    }

    /// Number of layers in the stack.
    #[must_use]
    pub fn len(&self) -> usize { self.layers.len() }

    /// Report whether the stack has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.layers.is_empty() }

    fn top(&self) -> Below<'_> { Below::new(&self.layers, self.outbox.as_ref()) }

    /// Send a request down the whole stack.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayerError`] raised by a layer or the transport.
    pub async fn send_request(
        &self,
        exchange: &Arc<Exchange>,
        request: Request,
    ) -> Result<(), LayerError> {
        self.top().send_request(exchange, request).await
    }

    /// Send a response down the whole stack.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayerError`] raised by a layer or the transport.
    pub async fn send_response(
        &self,
        exchange: &Arc<Exchange>,
        response: Response,
    ) -> Result<(), LayerError> {
        self.top().send_response(exchange, response).await
    }

    /// Send an empty message down the whole stack.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayerError`] raised by a layer or the transport.
    pub async fn send_empty(
        &self,
        exchange: &Arc<Exchange>,
        message: EmptyMessage,
    ) -> Result<(), LayerError> {
        self.top().send_empty(exchange, message).await
    }

    /// Pass an incoming request up the stack.
    ///
    /// Returns `Some(request)` for the endpoint, or `None` when a layer
    /// suppressed it.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayerError`] raised by a layer or by a message a
    /// layer sent in reaction.
    pub async fn receive_request(
        &self,
        exchange: &Arc<Exchange>,
        mut request: Request,
    ) -> Result<Option<Request>, LayerError> {
        let top = self.top();
        for (index, layer) in self.layers.iter().enumerate().rev() {
            let flow = layer
                .receive_request(exchange, request, top.split(index))
                .await?;
            let Some(next) = flow.into_message() else {
                return Ok(None);
            };
            request = next;
        }
        Ok(Some(request))
    }

    /// Pass an incoming response up the stack.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayerError`] raised by a layer or by a message a
    /// layer sent in reaction.
    pub async fn receive_response(
        &self,
        exchange: &Arc<Exchange>,
        mut response: Response,
    ) -> Result<Option<Response>, LayerError> {
        let top = self.top();
        for (index, layer) in self.layers.iter().enumerate().rev() {
            let flow = layer
                .receive_response(exchange, response, top.split(index))
                .await?;
            let Some(next) = flow.into_message() else {
                return Ok(None);
            };
            response = next;
        }
        Ok(Some(response))
    }

    /// Pass an incoming empty message up the stack.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayerError`] raised by a layer or by a message a
    /// layer sent in reaction.
    pub async fn receive_empty(
        &self,
        exchange: &Arc<Exchange>,
        mut message: EmptyMessage,
    ) -> Result<Option<EmptyMessage>, LayerError> {
        let top = self.top();
        for (index, layer) in self.layers.iter().enumerate().rev() {
            let flow = layer
                .receive_empty(exchange, message, top.split(index))
                .await?;
            let Some(next) = flow.into_message() else {
                return Ok(None);
            };
            message = next;
        }
        Ok(Some(message))
    }
}

/// Shorthand used by layers that never substitute messages.
pub(crate) fn forward<M>(message: M) -> Result<Flow<M>, LayerError> { Ok(Flow::Forward(message)) }

//! In-memory link between a client stack and a server stack.
//!
//! [`Loopback`] wires two [`Stack`]s back to back. Whatever one side's
//! stack hands to its outbox is queued and later received by the other
//! side, so a whole blockwise conversation runs without a network. Every
//! message crossing the link is recorded as a [`Hop`], giving tests and the
//! demo binary a transcript of the blocks exchanged.

use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    BlockwiseConfig,
    Exchange,
    exchange::lock,
    layer::{BlockwiseLayer, LayerError, Outbound, Outbox, Stack, TraceLayer, TransportError},
    message::{EmptyMessage, MessageType, Request, Response},
};

/// Messages pumped before a conversation is declared stuck.
pub const DEFAULT_STEP_LIMIT: usize = 4096;

/// Errors raised while running a conversation over the loopback link.
#[derive(Debug, Error)]
pub enum LoopbackError {
    /// A layer on either side failed.
    #[error(transparent)]
    Layer(#[from] LayerError),
    /// The link kept carrying messages past the step limit.
    #[error("conversation still active after {steps} messages")]
    Stalled { steps: usize },
    /// The link went quiet before a response reached the client.
    #[error("link went quiet before the client received a response")]
    NoResponse,
}

/// Which way a message crossed the link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// From the client stack to the server stack.
    ToServer,
    /// From the server stack to the client stack.
    ToClient,
}

/// One message carried by the link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hop {
    /// Which way the message travelled.
    pub direction: Direction,
    /// The message as it left the sending stack.
    pub message: Outbound,
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.direction {
            Direction::ToServer => "client -> server",
            Direction::ToClient => "server -> client",
        };
        write!(f, "{arrow}  ")?;
        match &self.message {
            Outbound::Request(request) => {
                write!(f, "{} ({} bytes)", request.method(), request.payload_size())?;
                if let Some(block1) = request.options().block1() {
                    write!(f, " block1 {block1}")?;
                }
                Ok(())
            }
            Outbound::Response(response) => {
                write!(f, "{} ({} bytes)", response.code(), response.payload_size())?;
                if let Some(block1) = response.options().block1() {
                    write!(f, " block1 {block1}")?;
                }
                if let Some(block2) = response.options().block2() {
                    write!(f, " block2 {block2}")?;
                }
                Ok(())
            }
            Outbound::Empty(empty) => write!(f, "empty {:?}", empty.message_type()),
        }
    }
}

/// A completed conversation: the delivered response and every hop taken.
#[derive(Clone, Debug)]
pub struct Transcript {
    /// Response delivered to the client endpoint.
    pub response: Response,
    /// Messages carried by the link, in order.
    pub hops: Vec<Hop>,
}

impl Transcript {
    /// Count the hops travelling in `direction`.
    #[must_use]
    pub fn count(&self, direction: Direction) -> usize {
        self.hops
            .iter()
            .filter(|hop| hop.direction == direction)
            .count()
    }
}

/// Outbox queueing messages for the peer stack.
#[derive(Debug, Default)]
struct Mailbox {
    queue: Mutex<VecDeque<Outbound>>,
}

impl Mailbox {
    fn pop(&self) -> Option<Outbound> { lock(&self.queue).pop_front() }

    fn clear(&self) { lock(&self.queue).clear(); }
}

#[async_trait]
impl Outbox for Mailbox {
    async fn send(&self, _exchange: &Arc<Exchange>, message: Outbound) -> Result<(), TransportError> {
        lock(&self.queue).push_back(message);
        Ok(())
    }
}

/// Client and server stacks joined by an in-memory link.
///
/// # Examples
///
/// ```
/// use blockwise::{
///     BlockwiseConfig,
///     loopback::Loopback,
///     message::{Method, Request, Response, ResponseCode},
/// };
///
/// # let runtime = tokio::runtime::Builder::new_current_thread()
/// #     .build()
/// #     .expect("runtime");
/// # runtime.block_on(async {
/// let mut link = Loopback::new(BlockwiseConfig::default(), BlockwiseConfig::default());
/// let request = Request::new(Method::Put).with_payload(vec![1_u8; 3000]);
/// let transcript = link
///     .exchange(request, |request| {
///         Response::piggybacked(request, ResponseCode::Changed)
///     })
///     .await
///     .expect("conversation completes");
/// assert_eq!(transcript.response.code(), ResponseCode::Changed);
/// # });
/// ```
#[derive(Debug)]
pub struct Loopback {
    client: Stack,
    server: Stack,
    to_server: Arc<Mailbox>,
    to_client: Arc<Mailbox>,
    step_limit: usize,
    next_message_id: u16,
}

impl Loopback {
    /// Join a client and a server, each running a trace layer above a
    /// blockwise layer with the given settings.
    #[must_use]
    pub fn new(client: BlockwiseConfig, server: BlockwiseConfig) -> Self {
        let to_server = Arc::new(Mailbox::default());
        let to_client = Arc::new(Mailbox::default());
        Self {
            client: Stack::with_outbox(to_server.clone())
                .layer(TraceLayer)
                .layer(BlockwiseLayer::new(client)),
            server: Stack::with_outbox(to_client.clone())
                .layer(TraceLayer)
                .layer(BlockwiseLayer::new(server)),
            to_server,
            to_client,
            step_limit: DEFAULT_STEP_LIMIT,
            next_message_id: 1,
        }
    }

    /// Set how many messages a conversation may carry before it is
    /// abandoned.
    #[must_use]
    pub const fn step_limit(mut self, steps: usize) -> Self {
        self.step_limit = steps;
        self
    }

    /// Send `request` from the client and run the conversation until the
    /// link goes quiet.
    ///
    /// Requests that complete on the server are answered with `handler`.
    /// Messages without a message id are numbered as they enter the link.
    ///
    /// # Errors
    ///
    /// Returns [`LoopbackError::Layer`] when a layer fails,
    /// [`LoopbackError::Stalled`] when the step limit is reached and
    /// [`LoopbackError::NoResponse`] when no response reaches the client.
    pub async fn exchange<F>(
        &mut self,
        request: Request,
        mut handler: F,
    ) -> Result<Transcript, LoopbackError>
    where
        F: FnMut(&Request) -> Response,
    {
        let client_exchange = Arc::new(Exchange::new());
        let server_exchange = Arc::new(Exchange::new());
        let mut hops = Vec::new();
        let mut delivered = None;
        // Leftovers of an abandoned conversation must not leak into this one.
        self.to_server.clear();
        self.to_client.clear();

        self.client.send_request(&client_exchange, request).await?;

        loop {
            if hops.len() >= self.step_limit {
                return Err(LoopbackError::Stalled { steps: hops.len() });
            }

            if let Some(message) = self.to_server.pop() {
                let message = self.number(message);
                hops.push(Hop {
                    direction: Direction::ToServer,
                    message: message.clone(),
                });
                self.serve(&server_exchange, message, &mut handler).await?;
                continue;
            }

            if let Some(message) = self.to_client.pop() {
                let message = self.number(message);
                hops.push(Hop {
                    direction: Direction::ToClient,
                    message: message.clone(),
                });
                if let Some(response) = self.deliver(&client_exchange, message).await? {
                    delivered.get_or_insert(response);
                }
                continue;
            }

            break;
        }

        tracing::debug!(hops = hops.len(), "loopback link quiet");
        let response = delivered.ok_or(LoopbackError::NoResponse)?;
        Ok(Transcript { response, hops })
    }

    /// Hand a message to the server side and answer completed requests.
    async fn serve<F>(
        &self,
        exchange: &Arc<Exchange>,
        message: Outbound,
        handler: &mut F,
    ) -> Result<(), LoopbackError>
    where
        F: FnMut(&Request) -> Response,
    {
        match message {
            Outbound::Request(request) => {
                if let Some(request) = self.server.receive_request(exchange, request).await? {
                    let response = handler(&request);
                    self.server.send_response(exchange, response).await?;
                }
            }
            Outbound::Empty(empty) => {
                self.server.receive_empty(exchange, empty).await?;
            }
            Outbound::Response(response) => {
                tracing::warn!(code = %response.code(), "server dropped a response");
            }
        }
        Ok(())
    }

    /// Hand a message to the client side, returning any delivered response.
    async fn deliver(
        &self,
        exchange: &Arc<Exchange>,
        message: Outbound,
    ) -> Result<Option<Response>, LoopbackError> {
        match message {
            Outbound::Response(response) => {
                let ack = (response.message_type() == MessageType::Confirmable)
                    .then(|| EmptyMessage::ack_for(response.message_id()));
                let delivered = self.client.receive_response(exchange, response).await?;
                // The endpoint acknowledges confirmable responses the layer
                // has not already acknowledged.
                let pending = delivered
                    .as_ref()
                    .is_some_and(|response| !response.is_acknowledged());
                if let (Some(ack), true) = (ack, pending) {
                    self.client.send_empty(exchange, ack).await?;
                }
                Ok(delivered)
            }
            Outbound::Empty(empty) => {
                self.client.receive_empty(exchange, empty).await?;
                Ok(None)
            }
            Outbound::Request(request) => {
                tracing::warn!(method = %request.method(), "client dropped a request");
                Ok(None)
            }
        }
    }

    fn number(&mut self, message: Outbound) -> Outbound {
        match message {
            Outbound::Request(request) if request.message_id().is_none() => {
                Outbound::Request(request.with_message_id(self.next_id()))
            }
            Outbound::Response(response) if response.message_id().is_none() => {
                Outbound::Response(response.with_message_id(self.next_id()))
            }
            other => other,
        }
    }

    fn next_id(&mut self) -> u16 {
        let id = self.next_message_id;
        self.next_message_id = self.next_message_id.wrapping_add(1);
        id
    }
}

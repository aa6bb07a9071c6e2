//! Shared state for one request/response conversation.
//!
//! An [`Exchange`] is shared between the sending and receiving paths of a
//! conversation, which may run on different threads. Each field sits behind
//! its own lock. Assemblers live in `Arc<Mutex<_>>` slots so the slot lock is
//! held only while fetching or creating an assembler, and insertion happens
//! under the assembler's own lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    assembler::{RequestBlockAssembler, ResponseBlockAssembler},
    block::BlockOption,
    message::{Request, Response},
};

/// Shared handle to a request assembler.
pub type SharedRequestAssembler = Arc<Mutex<RequestBlockAssembler>>;
/// Shared handle to a response assembler.
pub type SharedResponseAssembler = Arc<Mutex<ResponseBlockAssembler>>;

/// Mutable state of one logical conversation.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use blockwise::{
///     Exchange,
///     block::{BlockOption, Szx},
/// };
///
/// let exchange = Arc::new(Exchange::new());
/// let block = BlockOption::new(3, Szx::MAX, false).expect("valid num");
/// exchange.set_block1_to_ack(Some(block));
/// assert_eq!(exchange.take_block1_to_ack(), Some(block));
/// assert_eq!(exchange.take_block1_to_ack(), None);
/// ```
#[derive(Debug, Default)]
pub struct Exchange {
    request: Mutex<Option<Request>>,
    current_request: Mutex<Option<Request>>,
    current_response: Mutex<Option<Response>>,
    request_assembler: Mutex<Option<SharedRequestAssembler>>,
    response_assembler: Mutex<Option<SharedResponseAssembler>>,
    block1_to_ack: Mutex<Option<BlockOption>>,
}

/// Lock `mutex`, recovering the data if a previous holder panicked.
///
/// Every guarded field is a plain value that is replaced wholesale, so a
/// poisoned lock never exposes a half-written state.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Exchange {
    /// Create an exchange with no recorded messages or assemblers.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// The complete request of this conversation, once known.
    #[must_use]
    pub fn request(&self) -> Option<Request> { lock(&self.request).clone() }

    /// Record the complete request of this conversation.
    pub fn set_request(&self, request: Request) { *lock(&self.request) = Some(request); }

    /// The request message most recently sent.
    #[must_use]
    pub fn current_request(&self) -> Option<Request> { lock(&self.current_request).clone() }

    /// Record the request message most recently sent.
    pub fn set_current_request(&self, request: Request) {
        *lock(&self.current_request) = Some(request);
    }

    /// The response message most recently sent.
    #[must_use]
    pub fn current_response(&self) -> Option<Response> { lock(&self.current_response).clone() }

    /// Record the response message most recently sent.
    pub fn set_current_response(&self, response: Response) {
        *lock(&self.current_response) = Some(response);
    }

    /// The attached request assembler, if any.
    #[must_use]
    pub fn request_assembler(&self) -> Option<SharedRequestAssembler> {
        lock(&self.request_assembler).clone()
    }

    /// Attach a request assembler, replacing any previous one.
    pub fn set_request_assembler(&self, assembler: RequestBlockAssembler) -> SharedRequestAssembler {
        let shared = Arc::new(Mutex::new(assembler));
        *lock(&self.request_assembler) = Some(Arc::clone(&shared));
        shared
    }

    /// Fetch the request assembler, creating it with `create` if absent.
    ///
    /// Fetch and creation happen under one lock, so concurrent callers
    /// always share a single assembler.
    pub fn request_assembler_or_insert_with(
        &self,
        create: impl FnOnce() -> RequestBlockAssembler,
    ) -> SharedRequestAssembler {
        let mut slot = lock(&self.request_assembler);
        Arc::clone(slot.get_or_insert_with(|| {
            tracing::debug!("creating request assembler");
            Arc::new(Mutex::new(create()))
        }))
    }

    /// The attached response assembler, if any.
    #[must_use]
    pub fn response_assembler(&self) -> Option<SharedResponseAssembler> {
        lock(&self.response_assembler).clone()
    }

    /// Attach a response assembler, replacing any previous one.
    pub fn set_response_assembler(
        &self,
        assembler: ResponseBlockAssembler,
    ) -> SharedResponseAssembler {
        let shared = Arc::new(Mutex::new(assembler));
        *lock(&self.response_assembler) = Some(Arc::clone(&shared));
        shared
    }

    /// Detach the response assembler, ending any transfer it drives.
    pub fn take_response_assembler(&self) -> Option<SharedResponseAssembler> {
        lock(&self.response_assembler).take()
    }

    /// Fetch the response assembler, creating it with `create` if absent.
    ///
    /// Two blocks of the same response may arrive concurrently; fetch and
    /// creation happen under one lock so both land in the same assembler.
    pub fn response_assembler_or_insert_with(
        &self,
        create: impl FnOnce() -> ResponseBlockAssembler,
    ) -> SharedResponseAssembler {
        let mut slot = lock(&self.response_assembler);
        Arc::clone(slot.get_or_insert_with(|| {
            tracing::debug!("creating response assembler");
            Arc::new(Mutex::new(create()))
        }))
    }

    /// Record the Block1 option to echo on the next outgoing response.
    pub fn set_block1_to_ack(&self, block: Option<BlockOption>) { *lock(&self.block1_to_ack) = block; }

    /// Read and clear the pending Block1 acknowledgement.
    #[must_use]
    pub fn take_block1_to_ack(&self) -> Option<BlockOption> { lock(&self.block1_to_ack).take() }
}

#![doc(html_root_url = "https://docs.rs/blockwise/latest")]
//! Public API for the `blockwise` library.
//!
//! This crate splits oversized request and response bodies of a
//! constrained-network request/response protocol into numbered blocks and
//! rebuilds them on the receiving side. The [`BlockwiseLayer`] sits in a
//! [`Stack`] of layers between the endpoint and the transport and keeps all
//! per-conversation state on an [`Exchange`].

pub mod assembler;
pub mod block;
pub mod config;
pub mod exchange;
pub mod layer;
pub mod loopback;
pub mod message;
#[cfg(feature = "metrics")]
pub mod metrics;

pub use assembler::{
    AssemblyError,
    AssemblyStatus,
    BlockCarrier,
    RequestBlockAssembler,
    ResponseBlockAssembler,
};
pub use block::{BlockError, BlockOption, Szx};
pub use config::{BlockwiseConfig, ConfigError};
pub use exchange::Exchange;
pub use layer::{
    Below,
    BlockwiseLayer,
    Flow,
    Layer,
    LayerError,
    Outbound,
    Outbox,
    Stack,
    TraceLayer,
    TransportError,
};
pub use loopback::{Loopback, LoopbackError, Transcript};

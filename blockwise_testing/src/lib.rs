//! Utilities for exercising `blockwise` stacks in tests.
//!
//! [`RecordingOutbox`] captures everything a stack hands to its transport,
//! [`FailingOutbox`] refuses every message, and the builders cut bodies into
//! the blocks a peer would send.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use blockwise::{BlockwiseLayer, Exchange, Stack};
//! use blockwise_testing::{RecordingOutbox, config};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let outbox = Arc::new(RecordingOutbox::default());
//! let stack = Stack::with_outbox(outbox.clone()).layer(BlockwiseLayer::new(config(64, 32)));
//! let exchange = Arc::new(Exchange::new());
//! stack
//!     .send_request(&exchange, blockwise_testing::put(100))
//!     .await
//!     .expect("send succeeds");
//! assert_eq!(outbox.requests().len(), 1);
//! # }
//! ```

pub mod builders;
pub mod metrics;
pub mod outbox;

pub use builders::{
    block,
    body,
    config,
    put,
    request_blocks,
    response_blocks,
    small_config,
    szx,
};
pub use metrics::{Counters, debugging_recorder};
pub use outbox::{FailingOutbox, RecordingOutbox};

/// Result type for tests that report failures through `?`.
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

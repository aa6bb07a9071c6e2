//! Block descriptor primitives for blockwise transfers.
//!
//! This module collects the value types carried by the Block1 and Block2
//! options: the [`Szx`] size exponent and the [`BlockOption`] descriptor. Each
//! sub-module focuses on a single concept and the public API is re-exported
//! at the crate root.

pub mod error;
pub mod option;
pub mod szx;

pub use error::BlockError;
pub use option::BlockOption;
pub use szx::Szx;

#[cfg(test)]
mod tests;

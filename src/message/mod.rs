//! Message model consumed by the blockwise layer.
//!
//! The types here cover just enough of a constrained-network request/response
//! protocol for the layer to read and write block options, measure payloads,
//! build piggy-backed responses and empty acknowledgements, and flag fully
//! reassembled messages as acknowledged.

pub mod code;
pub mod empty;
pub mod options;
pub mod request;
pub mod response;

use std::fmt;

use bytes::Bytes;
use derive_more::From;

pub use code::{Method, ResponseCode};
pub use empty::EmptyMessage;
pub use options::OptionSet;
pub use request::Request;
pub use response::Response;

/// Reliability class of a message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Requires an acknowledgement from the peer.
    #[default]
    Confirmable,
    /// Sent without expecting an acknowledgement.
    NonConfirmable,
    /// Acknowledges a confirmable message.
    Acknowledgement,
    /// Rejects a message the receiver cannot process.
    Reset,
}

/// Opaque token correlating requests and responses.
///
/// # Examples
///
/// ```
/// use blockwise::message::Token;
/// let token = Token::from(vec![0xca, 0xfe]);
/// assert_eq!(token.to_string(), "cafe");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, From)]
pub struct Token(Bytes);

impl Token {
    /// Borrow the token bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    /// Report whether the token is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<Vec<u8>> for Token {
    fn from(value: Vec<u8>) -> Self { Self(Bytes::from(value)) }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

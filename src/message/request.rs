//! Request message.

use bytes::Bytes;

use super::{MessageType, Method, OptionSet, Token};

/// A request, possibly carrying one block of a larger body.
///
/// # Examples
///
/// ```
/// use blockwise::message::{Method, Request};
/// let request = Request::new(Method::Put).with_payload(vec![0_u8; 48]);
/// assert_eq!(request.payload_size(), 48);
/// assert!(!request.options().has_block1());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    message_type: MessageType,
    method: Method,
    message_id: Option<u16>,
    token: Token,
    options: OptionSet,
    payload: Bytes,
    acknowledged: bool,
}

impl Request {
    /// Create a confirmable request with an empty payload.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            message_type: MessageType::Confirmable,
            method,
            message_id: None,
            token: Token::default(),
            options: OptionSet::default(),
            payload: Bytes::new(),
            acknowledged: false,
        }
    }

    /// Replace the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Replace the token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<Token>) -> Self {
        self.token = token.into();
        self
    }

    /// Assign a message id.
    #[must_use]
    pub fn with_message_id(mut self, message_id: u16) -> Self {
        self.message_id = Some(message_id);
        self
    }

    /// Replace the message type.
    #[must_use]
    pub fn with_type(mut self, message_type: MessageType) -> Self {
        self.message_type = message_type;
        self
    }

    /// Replace the Uri-Path.
    #[must_use]
    pub fn with_uri_path(mut self, path: &str) -> Self {
        self.options.set_uri_path(path);
        self
    }

    /// Request method.
    #[must_use]
    pub const fn method(&self) -> Method { self.method }

    /// Message type.
    #[must_use]
    pub const fn message_type(&self) -> MessageType { self.message_type }

    /// Message id, once assigned by the matching layer.
    #[must_use]
    pub const fn message_id(&self) -> Option<u16> { self.message_id }

    /// Clear the message id so the layers beneath assign a fresh one.
    pub fn clear_message_id(&mut self) { self.message_id = None; }

    /// Token correlating this request with its responses.
    #[must_use]
    pub const fn token(&self) -> &Token { &self.token }

    /// Borrow the option set.
    #[must_use]
    pub const fn options(&self) -> &OptionSet { &self.options }

    /// Mutably borrow the option set.
    pub fn options_mut(&mut self) -> &mut OptionSet { &mut self.options }

    /// Borrow the payload.
    #[must_use]
    pub const fn payload(&self) -> &Bytes { &self.payload }

    /// Replace the payload in place.
    pub fn set_payload(&mut self, payload: impl Into<Bytes>) { self.payload = payload.into(); }

    /// Payload length in bytes.
    #[must_use]
    pub fn payload_size(&self) -> usize { self.payload.len() }

    /// Report whether the request has been acknowledged.
    #[must_use]
    pub const fn is_acknowledged(&self) -> bool { self.acknowledged }

    /// Flag the request as acknowledged.
    pub fn set_acknowledged(&mut self, acknowledged: bool) { self.acknowledged = acknowledged; }
}

//! Response message.

use bytes::Bytes;

use super::{MessageType, OptionSet, Request, ResponseCode, Token};

/// A response, possibly carrying one block of a larger body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    message_type: MessageType,
    code: ResponseCode,
    message_id: Option<u16>,
    token: Token,
    options: OptionSet,
    payload: Bytes,
    acknowledged: bool,
}

impl Response {
    /// Create a confirmable response with an empty payload.
    #[must_use]
    pub fn new(code: ResponseCode) -> Self {
        Self {
            message_type: MessageType::Confirmable,
            code,
            message_id: None,
            token: Token::default(),
            options: OptionSet::default(),
            payload: Bytes::new(),
            acknowledged: false,
        }
    }

    /// Create a response piggy-backed on the acknowledgement of `request`.
    ///
    /// The response reuses the request's message id and token.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockwise::message::{MessageType, Method, Request, Response, ResponseCode};
    /// let request = Request::new(Method::Put).with_message_id(7);
    /// let response = Response::piggybacked(&request, ResponseCode::Changed);
    /// assert_eq!(response.message_type(), MessageType::Acknowledgement);
    /// assert_eq!(response.message_id(), Some(7));
    /// ```
    #[must_use]
    pub fn piggybacked(request: &Request, code: ResponseCode) -> Self {
        Self {
            message_type: MessageType::Acknowledgement,
            message_id: request.message_id(),
            token: request.token().clone(),
            ..Self::new(code)
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

    /// Response code.
    #[must_use]
    pub const fn code(&self) -> ResponseCode { self.code }

    /// Message type.
    #[must_use]
    pub const fn message_type(&self) -> MessageType { self.message_type }

    /// Replace the message type in place.
    pub fn set_message_type(&mut self, message_type: MessageType) { self.message_type = message_type; }

    /// Message id, once assigned by the matching layer.
    #[must_use]
    pub const fn message_id(&self) -> Option<u16> { self.message_id }

    /// Clear the message id so the layers beneath assign a fresh one.
    pub fn clear_message_id(&mut self) { self.message_id = None; }

    /// Token correlating this response with its request.
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

    /// Report whether the response has been acknowledged.
    #[must_use]
    pub const fn is_acknowledged(&self) -> bool { self.acknowledged }

    /// Flag the response as acknowledged.
    pub fn set_acknowledged(&mut self, acknowledged: bool) { self.acknowledged = acknowledged; }
}

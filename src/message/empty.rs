//! Empty messages: bare acknowledgements and resets.

use super::MessageType;

/// A message with neither code nor payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyMessage {
    message_type: MessageType,
    message_id: Option<u16>,
}

impl EmptyMessage {
    /// Create an empty message of the given type.
    #[must_use]
    pub const fn new(message_type: MessageType, message_id: Option<u16>) -> Self {
        Self {
            message_type,
            message_id,
        }
    }

    /// Create an empty acknowledgement for the message with `message_id`.
    #[must_use]
    pub const fn ack_for(message_id: Option<u16>) -> Self {
        Self::new(MessageType::Acknowledgement, message_id)
    }

    /// Create a reset for the message with `message_id`.
    #[must_use]
    pub const fn reset_for(message_id: Option<u16>) -> Self {
        Self::new(MessageType::Reset, message_id)
    }

    /// Message type.
    #[must_use]
    pub const fn message_type(&self) -> MessageType { self.message_type }

    /// Message id of the acknowledged or rejected message.
    #[must_use]
    pub const fn message_id(&self) -> Option<u16> { self.message_id }

    /// Report whether this is an acknowledgement.
    #[must_use]
    pub const fn is_ack(&self) -> bool { matches!(self.message_type, MessageType::Acknowledgement) }

    /// Report whether this is a reset.
    #[must_use]
    pub const fn is_reset(&self) -> bool { matches!(self.message_type, MessageType::Reset) }
}

//! Wire and network error types.

use bridge_component::UnknownVariant;

/// A binary message could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// The buffer ended before a field could be read.
    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes the field needs.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// The leading command tag is not in the catalog.
    #[error("unknown command tag {0:#04x}")]
    UnknownCommand(u8),

    /// The leading directive tag is not known.
    #[error("unknown directive tag {0:#06x}")]
    UnknownDirective(u16),

    /// A float field was NaN or infinite.
    #[error("non-finite float field")]
    NonFinite,

    /// A length-prefixed string was not UTF-8.
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    /// An enum byte was out of range.
    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),

    /// Bytes were left over after the message was fully read.
    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
}

/// Errors that can occur during network operations.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// Failed to encode a message to MessagePack.
    #[error("failed to encode message: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode a message from MessagePack.
    #[error("failed to decode message: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// Failed to decode a fixed-width binary message.
    #[error("malformed binary message: {0}")]
    Wire(#[from] WireError),

    /// NATS subscription error.
    #[error("NATS subscribe error: {0}")]
    Subscribe(#[from] async_nats::SubscribeError),

    /// NATS publish error.
    #[error("NATS publish error: {0}")]
    Publish(#[from] async_nats::PublishError),

    /// NATS connection error.
    #[error("NATS connection error: {0}")]
    Connect(#[from] async_nats::ConnectError),
}

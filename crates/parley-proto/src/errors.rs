//! Protocol error types.

use thiserror::Error;

/// Convenience alias for protocol results.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while decoding or encoding channel events.
///
/// Decoding errors never abort a session: the caller logs and drops the
/// offending event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Event name is not part of the inbound vocabulary.
    #[error("unknown event: {name}")]
    UnknownEvent {
        /// Name as received from the channel.
        name: String,
    },

    /// Payload does not match the shape expected for the event.
    #[error("malformed payload for {event}: {reason}")]
    Malformed {
        /// Event whose payload failed to decode.
        event: String,
        /// Decoder diagnostic.
        reason: String,
    },

    /// Line is not a valid `{event, payload}` envelope.
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// Payload could not be converted to JSON.
    #[error("encode failed for {event}: {reason}")]
    Encode {
        /// Event being encoded.
        event: &'static str,
        /// Encoder diagnostic.
        reason: String,
    },
}

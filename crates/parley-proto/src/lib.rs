//! Parley wire protocol
//!
//! Named events exchanged with the chat server over a duplex event channel.
//! Every event is a `(name, payload)` pair where the payload is a JSON object.
//! This crate owns the vocabulary only: identifiers, message records, and the
//! typed inbound/outbound event enums. It performs no I/O.
//!
//! # Components
//!
//! - [`OutboundEvent`]: intents the client emits (history requests, sends,
//!   typing signals)
//! - [`InboundEvent`]: notifications the server pushes (presence, histories,
//!   live messages, typing)
//! - [`ConversationRef`] / [`ConversationKey`]: conversation identity
//! - [`Message`]: a single chat message as received from the server

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod errors;
mod event;
mod ids;
mod message;
pub mod payloads;

pub use errors::{ProtocolError, Result};
pub use event::{Envelope, InboundEvent, OutboundEvent};
pub use ids::{ConversationId, ConversationKey, ConversationKind, ConversationRef, Username};
pub use message::Message;

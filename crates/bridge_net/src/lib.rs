//! # bridge_net
//!
//! Wire formats and NATS transport for the bridge simulation.
//!
//! This crate provides:
//!
//! - [`buffer`]: little-endian fixed-width writer/reader used by every
//!   binary format below.
//! - [`command`]: the client → server [`Command`] catalog and its encoding.
//! - [`sync`]: custom-function catalog sync and server directives.
//! - [`messages`]: MessagePack snapshot envelope.
//! - [`codec`]: MessagePack serialisation helpers.
//! - [`subjects`]: NATS subject builders.
//! - [`connection`]: NATS connection management.
//! - [`error`]: wire and network error types.

pub mod buffer;
pub mod codec;
pub mod command;
pub mod connection;
pub mod error;
pub mod messages;
pub mod subjects;
pub mod sync;

pub use buffer::{DataReader, DataWriter};
pub use codec::{decode, encode};
pub use command::Command;
pub use connection::NatsConnection;
pub use error::{NetError, WireError};
pub use messages::StateEnvelope;
pub use sync::{CustomFunctionEntry, ServerDirective};

//! Wire protocol for Trailhead.
//!
//! This crate defines what travels between the client and the game server:
//!
//! - **Types** ([`RequestType`], [`Call`], [`Position`], [`SessionTicket`],
//!   [`AccessCredential`]): the building blocks.
//! - **Envelopes** ([`Envelope`], [`ResponseEnvelope`]): the outer request
//!   and response, and the pure functions that assemble them.
//! - **Messages** ([`messages`]): typed request/response pairs per call.
//! - **Codec** ([`Codec`] trait, [`BincodeCodec`], [`JsonCodec`]): how
//!   all of the above become bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope) → Session (ticket, endpoint)
//! ```
//!
//! The protocol layer knows nothing about sessions or the network. It only
//! knows how the data is shaped and how to turn it into bytes.

mod codec;
mod envelope;
mod error;
pub mod messages;
mod types;

#[cfg(feature = "bincode")]
pub use codec::BincodeCodec;
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use envelope::{Authorization, Envelope, HANDSHAKE_CALLS, ResponseEnvelope, ResponseStatus};
pub use error::{CodecFailure, ProtocolError};
pub use types::{AccessCredential, AuthKind, Call, ItemId, Position, RequestType, SessionTicket};

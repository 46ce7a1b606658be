//! # Trailhead
//!
//! A client for a location-based game server's RPC protocol.
//!
//! The client performs a session handshake, then sends envelopes of typed
//! calls stamped with the session ticket and an obfuscated copy of the
//! player's position. Responses are decoded positionally into the
//! response type of each call.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trailhead::prelude::*;
//!
//! # async fn run() -> Result<(), TrailheadError> {
//! trailhead::init_tracing("trailhead=info");
//!
//! let mut client = TrailheadClient::builder().build()?;
//! client
//!     .establish(AccessCredential::new("id-token", AuthKind::Google))
//!     .await?;
//!
//! client.update_player_location(37.7749, -122.4194, 10.0).await?;
//! let world = client.refresh_world().await?;
//! println!("{} map cells", world.map.cells.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! - [`trailhead_transport`]: sending bytes to a URL.
//! - [`trailhead_protocol`]: envelopes, messages, codecs.
//! - [`trailhead_geo`]: location, obfuscation, map cells.
//! - [`trailhead_session`]: handshake, ticket, endpoint.

#![allow(async_fn_in_trait)]

mod batch;
mod client;
mod error;
mod logging;
mod rpc;

pub use batch::RpcBatch;
pub use client::{ClientSettings, TrailheadClient, TrailheadClientBuilder, WorldState};
pub use error::TrailheadError;
pub use logging::init_tracing;
pub use rpc::Rpc;

pub use trailhead_geo;
pub use trailhead_protocol;
pub use trailhead_session;
pub use trailhead_transport;

/// Everything most applications need, in one import.
pub mod prelude {
    pub use crate::{
        ClientSettings, Rpc, RpcBatch, TrailheadClient, TrailheadClientBuilder, TrailheadError,
        WorldState,
    };
    pub use trailhead_geo::{FileStore, Location, MemoryStore, RandSampler, SavedData};
    pub use trailhead_protocol::messages;
    pub use trailhead_protocol::{AccessCredential, AuthKind, ItemId, Position};
    pub use trailhead_session::{CredentialProvider, Handshake, SessionConfig, StaticCredential};
}

//! Session management for Trailhead.
//!
//! A session starts with a handshake: the access credential goes out with
//! a fixed bundle of startup calls, and a session ticket plus an endpoint
//! hostname come back. Every later envelope carries that ticket and is
//! posted to that endpoint, until the server declares the ticket expired.
//!
//! # How it fits in the stack
//!
//! ```text
//! Client (above)  ← builds envelopes, decodes typed responses
//!     ↕
//! Session Layer (this crate)  ← ticket, endpoint, envelope status handling
//!     ↕
//! Transport + Protocol (below)  ← bytes over HTTPS, envelope encoding
//! ```

#![allow(async_fn_in_trait)]

mod config;
mod context;
mod credential;
mod error;

pub use config::{DEFAULT_HANDSHAKE_URL, SessionConfig};
pub use context::{Handshake, SessionContext, SessionState};
pub use credential::{CredentialProvider, StaticCredential};
pub use error::SessionError;

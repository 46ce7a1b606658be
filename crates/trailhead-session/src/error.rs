//! Error types for the session layer.

use trailhead_protocol::ProtocolError;
use trailhead_transport::TransportError;

/// Errors that can occur while establishing or using a session.
///
/// Nothing in this layer retries. Each variant is reported once and the
/// caller decides whether to handshake again.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The handshake response carried no session ticket.
    #[error("server rejected the session handshake")]
    SessionRejected,

    /// A ticket-authenticated call was attempted before a handshake
    /// succeeded.
    #[error("no session has been established")]
    SessionNotEstablished,

    /// The handshake succeeded but named no endpoint, so there is nowhere
    /// to send calls.
    #[error("server is unavailable")]
    ServerUnavailable,

    /// The server no longer accepts the current ticket. A new handshake is
    /// required.
    #[error("session ticket expired")]
    TicketExpired,

    /// The credential provider could not produce a credential.
    #[error("credential unavailable: {0}")]
    Credential(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

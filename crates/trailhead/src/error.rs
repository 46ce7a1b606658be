//! Unified error type for the Trailhead client.

use trailhead_geo::GeoError;
use trailhead_protocol::ProtocolError;
use trailhead_session::SessionError;
use trailhead_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Transport and protocol failures surface as their own variants no matter
/// which layer hit them, so callers match on one place for "the network
/// failed" and one for "the bytes were wrong".
#[derive(Debug, thiserror::Error)]
pub enum TrailheadError {
    /// A transport-level error (connect, timeout, HTTP status).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, response count, status).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (rejected, not established, unavailable, expired).
    #[error(transparent)]
    Session(SessionError),

    /// A location error (invalid coordinate, store failure).
    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl From<SessionError> for TrailheadError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Transport(e) => Self::Transport(e),
            SessionError::Protocol(e) => Self::Protocol(e),
            other => Self::Session(other),
        }
    }
}

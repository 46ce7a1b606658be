//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means the bytes or the envelope structure were
//! wrong: a payload that would not serialize, a response that would not
//! parse, or a response whose shape does not match the request that
//! produced it. Network failures belong to `TransportError`.

/// Boxed error from whichever codec produced it.
pub type CodecFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes).
    ///
    /// The source is boxed because more than one codec can be in play
    /// (binary on the wire, JSON when debugging) and callers should not
    /// have to care which one failed.
    #[error("encode failed: {0}")]
    Encode(#[source] CodecFailure),

    /// Deserialization failed (turning bytes into a Rust value).
    ///
    /// Common causes: a truncated response, or a sub-response decoded as
    /// the wrong message type.
    #[error("decode failed: {0}")]
    Decode(#[source] CodecFailure),

    /// The response carried a different number of sub-responses than the
    /// request carried calls. Positional correlation is impossible, so
    /// nothing is decoded.
    #[error("expected {expected} sub-responses, got {actual}")]
    ResponseCountMismatch {
        /// Number of calls in the request envelope.
        expected: usize,
        /// Number of sub-responses the server returned.
        actual: usize,
    },

    /// The response envelope carried a status code this client does not
    /// know how to handle.
    #[error("unexpected response status {0}")]
    UnexpectedStatus(u32),

    /// A numeric call type that is not part of the call catalog.
    #[error("unknown request type {0}")]
    UnknownRequestType(u32),
}

/// Errors that can occur in the transport layer.
///
/// The layers above never retry on these; whatever retrying makes sense
/// has already happened inside the transport by the time one surfaces.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server could not be reached, or dropped the connection before
    /// a response arrived.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// The HTTP client failed to send the request or read the response.
    #[cfg(feature = "http")]
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("server responded with HTTP {0}")]
    Status(u16),

    /// No response arrived within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The target URL could not be used.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

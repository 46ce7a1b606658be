//! Transport abstraction layer for Trailhead.
//!
//! Provides the [`Transport`] trait: the only contract the protocol layers
//! rely on is "send bytes to a URL, get bytes back, or fail". Connection
//! pooling, compression and retrying transient failures all live behind it.
//!
//! # Feature Flags
//!
//! - `http` (default): HTTPS transport via `reqwest`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "http")]
mod http;

pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpTransport};

/// Delivers an encoded envelope and returns the encoded response.
///
/// Each call is at most one *logical* attempt from the caller's point of
/// view. Implementations may retry transient failures internally, but must
/// never report success without a response body.
pub trait Transport: Send + Sync + 'static {
    /// Posts `body` to `url` and returns the raw response bytes.
    async fn send(
        &self,
        url: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Transport for Echo {
        async fn send(
            &self,
            _url: &str,
            body: Vec<u8>,
        ) -> Result<Vec<u8>, TransportError> {
            Ok(body)
        }
    }

    #[tokio::test]
    async fn test_send_custom_transport_returns_response_bytes() {
        let bytes = Echo.send("https://host/rpc", vec![1, 2, 3]).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_status_error_display() {
        let err = TransportError::Status(503);
        assert_eq!(err.to_string(), "server responded with HTTP 503");
    }

    #[test]
    fn test_connection_closed_display_includes_reason() {
        let err = TransportError::ConnectionClosed("reset by peer".into());
        assert!(err.to_string().contains("reset by peer"));
    }
}

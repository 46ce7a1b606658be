//! Session configuration.

/// Handshake URL used when none is configured.
pub const DEFAULT_HANDSHAKE_URL: &str = "https://pgorelease.nianticlabs.com/plfe/rpc";

/// Where to handshake and how to address the per-session endpoint.
///
/// Sensible defaults are provided; override only what you need:
///
/// ```rust
/// use trailhead_session::SessionConfig;
///
/// let config = SessionConfig {
///     handshake_url: "http://127.0.0.1:8080/rpc".into(),
///     ..SessionConfig::default()
/// };
/// assert_eq!(config.endpoint_url("game.example"), "https://game.example/rpc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Full URL the handshake envelope is posted to.
    pub handshake_url: String,

    /// URL scheme for the endpoint named in the handshake response.
    pub endpoint_scheme: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            handshake_url: DEFAULT_HANDSHAKE_URL.to_string(),
            endpoint_scheme: "https".to_string(),
        }
    }
}

impl SessionConfig {
    /// The RPC URL for a session endpoint hostname.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}://{endpoint}/rpc", self.endpoint_scheme)
    }
}

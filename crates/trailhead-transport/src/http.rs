//! HTTPS transport implementation using `reqwest`.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;

use crate::{Transport, TransportError};

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Value of the `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Per-attempt timeout.
    pub timeout: Duration,

    /// How many extra attempts are made after a 5xx response or a
    /// connection failure. 0 disables retrying.
    pub max_retries: u32,

    /// Delay before the first retry. Doubles on every further retry.
    pub retry_backoff: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Niantic App".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 5,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// A [`Transport`] that POSTs envelopes over HTTP(S).
///
/// Responses compressed with gzip or deflate are decoded transparently.
/// Redirects are never followed: the game server signals a moved endpoint
/// inside the response envelope, not with HTTP redirects.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: HttpConfig,
}

impl HttpTransport {
    /// Builds the transport and its underlying connection pool.
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .redirect(Policy::none())
            .timeout(config.timeout)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(TransportError::Request)?;

        Ok(Self { client, config })
    }

    /// Returns the configuration this transport was built with.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.config.retry_backoff.saturating_mul(1 << attempt.min(16))
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        url: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| TransportError::InvalidUrl(format!("{url}: {e}")))?;

        let mut attempt = 0;
        loop {
            let result = self
                .client
                .post(url.clone())
                .body(body.clone())
                .send()
                .await;
            let can_retry = attempt < self.config.max_retries;

            match result {
                Ok(resp) if resp.status().is_server_error() && can_retry => {
                    tracing::warn!(
                        %url,
                        status = resp.status().as_u16(),
                        attempt,
                        "server error, retrying"
                    );
                }
                Ok(resp) if !resp.status().is_success() => {
                    return Err(TransportError::Status(resp.status().as_u16()));
                }
                Ok(resp) => {
                    let bytes = resp.bytes().await.map_err(map_reqwest_error)?;
                    tracing::trace!(%url, len = bytes.len(), "response received");
                    return Ok(bytes.to_vec());
                }
                Err(e) if (e.is_connect() || e.is_timeout()) && can_retry => {
                    tracing::warn!(%url, error = %e, attempt, "request failed, retrying");
                }
                Err(e) => return Err(map_reqwest_error(e)),
            }

            tokio::time::sleep(self.backoff(attempt)).await;
            attempt += 1;
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::ConnectionClosed(e.to_string())
    } else {
        TransportError::Request(e)
    }
}

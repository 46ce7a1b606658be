//! The session context: one client's ticket, endpoint, and state.
//!
//! ```text
//!   Unauthenticated ──establish()──→ Handshaking ──ticket──→ Established
//!          ↑                              │                     │
//!          └──────────no ticket / error───┘          status 102 / mark_expired()
//!                                                               ▼
//!                         establish() ←─────────────────── Expired
//! ```
//!
//! The context never refreshes a ticket on its own and never retries a
//! handshake. Whoever owns it decides when to call [`establish`] again.
//!
//! [`establish`]: SessionContext::establish

use trailhead_protocol::{
    AccessCredential, Codec, Envelope, Position, ResponseEnvelope, ResponseStatus, SessionTicket,
};
use trailhead_transport::Transport;

use crate::{SessionConfig, SessionError};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No handshake has succeeded yet.
    Unauthenticated,
    /// A handshake is in flight.
    Handshaking,
    /// A ticket is held and calls may be sent.
    Established,
    /// The server stopped accepting the ticket.
    Expired,
}

/// What a successful handshake produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    /// The endpoint hostname, or `None` if the server named none.
    pub endpoint: Option<String>,

    /// Responses to the bundled startup calls, in call order.
    pub sub_responses: Vec<Vec<u8>>,
}

impl Handshake {
    pub fn server_available(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// Owns the session ticket and endpoint for one client.
///
/// Every mutating method takes `&mut self`, so a context can only have one
/// request in flight at a time.
pub struct SessionContext<T, C> {
    transport: T,
    codec: C,
    config: SessionConfig,
    state: SessionState,
    ticket: Option<SessionTicket>,
    endpoint: String,
    credential: Option<AccessCredential>,
}

impl<T: Transport, C: Codec> SessionContext<T, C> {
    pub fn new(transport: T, codec: C, config: SessionConfig) -> Self {
        Self {
            transport,
            codec,
            config,
            state: SessionState::Unauthenticated,
            ticket: None,
            endpoint: String::new(),
            credential: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The endpoint hostname from the last handshake or redirect. Empty
    /// when the server is unavailable or no handshake has happened.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Performs the handshake and records the ticket and endpoint.
    ///
    /// An empty endpoint is not an error: the ticket is kept and the
    /// returned [`Handshake`] reports the server as unavailable. Calls
    /// then fail with [`SessionError::ServerUnavailable`] until the next
    /// handshake.
    ///
    /// # Errors
    /// - [`SessionError::SessionRejected`] if the response has no ticket.
    /// - Transport and protocol errors as they occur.
    ///
    /// On any error the context is left `Unauthenticated` with no ticket.
    pub async fn establish(
        &mut self,
        credential: AccessCredential,
        position: Position,
    ) -> Result<Handshake, SessionError> {
        self.state = SessionState::Handshaking;
        self.ticket = None;
        self.endpoint.clear();

        let result = self.handshake(&credential, position).await;
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.state = SessionState::Unauthenticated;
                return Err(e);
            }
        };

        let Some(ticket) = response.ticket else {
            tracing::warn!(status = response.status, "handshake response carried no ticket");
            self.state = SessionState::Unauthenticated;
            return Err(SessionError::SessionRejected);
        };

        self.ticket = Some(ticket);
        self.credential = Some(credential);
        self.state = SessionState::Established;

        let endpoint = if response.endpoint.is_empty() {
            tracing::warn!("handshake named no endpoint, server unavailable");
            None
        } else {
            self.endpoint = response.endpoint.clone();
            tracing::info!(endpoint = %self.endpoint, "session established");
            Some(response.endpoint)
        };

        Ok(Handshake {
            endpoint,
            sub_responses: response.sub_responses,
        })
    }

    async fn handshake(
        &self,
        credential: &AccessCredential,
        position: Position,
    ) -> Result<ResponseEnvelope, SessionError> {
        let envelope = Envelope::handshake(credential, position);
        tracing::debug!(
            provider = credential.kind.provider(),
            url = %self.config.handshake_url,
            "sending handshake"
        );
        let body = self.codec.encode(&envelope)?;
        let bytes = self.transport.send(&self.config.handshake_url, body).await?;
        Ok(self.codec.decode(&bytes)?)
    }

    /// The ticket to put in the next envelope.
    ///
    /// # Errors
    /// - [`SessionError::SessionNotEstablished`] before a successful
    ///   handshake.
    /// - [`SessionError::TicketExpired`] once the session has expired.
    pub fn current_ticket(&self) -> Result<SessionTicket, SessionError> {
        match (self.state, self.ticket) {
            (SessionState::Established, Some(ticket)) => Ok(ticket),
            (SessionState::Expired, _) => Err(SessionError::TicketExpired),
            _ => Err(SessionError::SessionNotEstablished),
        }
    }

    /// The credential used for the last successful handshake.
    pub fn credential(&self) -> Result<&AccessCredential, SessionError> {
        self.credential
            .as_ref()
            .ok_or(SessionError::SessionNotEstablished)
    }

    /// Marks an established session as expired. Has no effect in any
    /// other state.
    pub fn mark_expired(&mut self) {
        if self.state == SessionState::Established {
            tracing::info!("session marked expired");
            self.state = SessionState::Expired;
        }
    }

    /// The full RPC URL for the current endpoint.
    ///
    /// # Errors
    /// - Same as [`current_ticket`](Self::current_ticket) if there is no
    ///   usable session.
    /// - [`SessionError::ServerUnavailable`] if the handshake named no
    ///   endpoint.
    pub fn endpoint_url(&self) -> Result<String, SessionError> {
        self.current_ticket()?;
        if self.endpoint.is_empty() {
            return Err(SessionError::ServerUnavailable);
        }
        Ok(self.config.endpoint_url(&self.endpoint))
    }

    /// Sends an envelope to the session endpoint and applies the
    /// envelope-level status.
    ///
    /// - `1`: the response is returned.
    /// - `53`: a non-empty endpoint replaces the current one; the response
    ///   is returned.
    /// - `102`: the session becomes `Expired` and
    ///   [`SessionError::TicketExpired`] is returned.
    /// - anything else: [`ProtocolError::UnexpectedStatus`](trailhead_protocol::ProtocolError::UnexpectedStatus).
    pub async fn send(&mut self, envelope: &Envelope) -> Result<ResponseEnvelope, SessionError> {
        let url = self.endpoint_url()?;
        tracing::debug!(%url, calls = ?envelope.kinds(), "sending envelope");

        let body = self.codec.encode(envelope)?;
        let bytes = self.transport.send(&url, body).await?;
        let response: ResponseEnvelope = self.codec.decode(&bytes)?;

        match response.status() {
            ResponseStatus::Ok => Ok(response),
            ResponseStatus::Redirect => {
                if !response.endpoint.is_empty() && response.endpoint != self.endpoint {
                    tracing::info!(
                        from = %self.endpoint,
                        to = %response.endpoint,
                        "endpoint redirected"
                    );
                    self.endpoint = response.endpoint.clone();
                }
                Ok(response)
            }
            ResponseStatus::TicketExpired => {
                tracing::warn!("server reported the session ticket expired");
                self.state = SessionState::Expired;
                Err(SessionError::TicketExpired)
            }
            ResponseStatus::Other(code) => {
                Err(trailhead_protocol::ProtocolError::UnexpectedStatus(code).into())
            }
        }
    }
}

impl<T, C> std::fmt::Debug for SessionContext<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &self.state)
            .field("endpoint", &self.endpoint)
            .field("has_ticket", &self.ticket.is_some())
            .finish_non_exhaustive()
    }
}

// =========================================================================
// Tests
// =========================================================================

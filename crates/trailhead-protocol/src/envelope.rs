//! Request and response envelopes, and the functions that assemble them.
//!
//! An envelope is the outer message: who we are (credential or session
//! ticket), where we are (obfuscated position), and an ordered list of
//! calls. The order of `calls` is the ONLY thing that ties a sub-response
//! back to its call, so nothing in this module ever reorders them.
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ auth: Ticket { nonce, ts, check }    │
//! │ position: 37.77490, -122.41940, 10   │
//! │ calls: [ GetMapObjects, GetInventory │  ← sub-response N answers call N
//! │          CheckAwardedBadges ]        │
//! └──────────────────────────────────────┘
//! ```
//!
//! Building is pure data assembly: no I/O, no randomness. Given the same
//! inputs the same envelope comes out.

use serde::{Deserialize, Serialize};

use crate::{AccessCredential, Call, Position, ProtocolError, RequestType, SessionTicket};

/// The calls bundled into every handshake envelope, in protocol order.
pub const HANDSHAKE_CALLS: [RequestType; 5] = [
    RequestType::GetPlayer,
    RequestType::GetHatchedObjects,
    RequestType::GetInventory,
    RequestType::CheckAwardedBadges,
    RequestType::DownloadSettings,
];

// ---------------------------------------------------------------------------
// Request envelope
// ---------------------------------------------------------------------------

/// How an envelope proves who sent it.
///
/// Exactly one of the two is present, never both and never neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Authorization {
    /// The long-lived access credential. Used for the handshake and for
    /// the few calls the server wants credential-authenticated.
    Credential(AccessCredential),

    /// The session ticket from the last handshake.
    Ticket(SessionTicket),
}

/// The outer request message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub auth: Authorization,
    pub position: Position,
    pub calls: Vec<Call>,
}

impl Envelope {
    /// Builds the handshake envelope: credential auth, the fixed
    /// [`HANDSHAKE_CALLS`] bundle, no ticket.
    pub fn handshake(credential: &AccessCredential, position: Position) -> Self {
        let calls = HANDSHAKE_CALLS.into_iter().map(Call::empty).collect();
        Self::with_credential(credential, position, calls)
    }

    /// Builds a credential-authenticated envelope carrying `calls`.
    pub fn with_credential(
        credential: &AccessCredential,
        position: Position,
        calls: Vec<Call>,
    ) -> Self {
        Self {
            auth: Authorization::Credential(credential.clone()),
            position,
            calls,
        }
    }

    /// Builds a ticket-authenticated envelope carrying `calls` in the
    /// order given.
    ///
    /// Taking `&SessionTicket` rather than `Option` is the point: there is
    /// no way to build a regular envelope before a handshake succeeded.
    pub fn with_ticket(ticket: &SessionTicket, position: Position, calls: Vec<Call>) -> Self {
        Self {
            auth: Authorization::Ticket(*ticket),
            position,
            calls,
        }
    }

    /// The ticket this envelope carries, if it is ticket-authenticated.
    pub fn ticket(&self) -> Option<&SessionTicket> {
        match &self.auth {
            Authorization::Ticket(ticket) => Some(ticket),
            Authorization::Credential(_) => None,
        }
    }

    /// The call types in submission order. Mostly useful for logging.
    pub fn kinds(&self) -> Vec<RequestType> {
        self.calls.iter().map(|c| c.kind).collect()
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Envelope-level status codes the client acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// The request was processed. Sub-responses follow.
    Ok,
    /// The session lives on another endpoint; the response names it.
    Redirect,
    /// The session ticket is no longer accepted. A new handshake is needed.
    TicketExpired,
    /// Anything else.
    Other(u32),
}

impl ResponseStatus {
    pub const OK: u32 = 1;
    pub const REDIRECT: u32 = 53;
    pub const TICKET_EXPIRED: u32 = 102;

    pub fn from_code(code: u32) -> Self {
        match code {
            Self::OK => Self::Ok,
            Self::REDIRECT => Self::Redirect,
            Self::TICKET_EXPIRED => Self::TicketExpired,
            other => Self::Other(other),
        }
    }
}

/// The outer response message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Raw status code; see [`ResponseStatus`].
    pub status: u32,

    /// Hostname for the rest of the session. Only meaningful on handshake
    /// and redirect responses; empty means the server is unavailable.
    #[serde(default)]
    pub endpoint: String,

    /// New session ticket. Only present on handshake responses.
    #[serde(default)]
    pub ticket: Option<SessionTicket>,

    /// One encoded response per call, in call order.
    #[serde(default)]
    pub sub_responses: Vec<Vec<u8>>,
}

impl ResponseEnvelope {
    pub fn status(&self) -> ResponseStatus {
        ResponseStatus::from_code(self.status)
    }

    /// Checks that there is exactly one sub-response per call.
    ///
    /// # Errors
    /// [`ProtocolError::ResponseCountMismatch`] otherwise.
    pub fn expect_sub_responses(&self, expected: usize) -> Result<(), ProtocolError> {
        let actual = self.sub_responses.len();
        if actual == expected {
            Ok(())
        } else {
            Err(ProtocolError::ResponseCountMismatch { expected, actual })
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

//! Core protocol types: the call catalog, positions, credentials and
//! session tickets.
//!
//! Everything here travels on the wire, so every type derives serde's
//! `Serialize`/`Deserialize`. Field layouts are fixed by the game server;
//! they are not meant to be extended.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// RequestType: the call catalog
// ---------------------------------------------------------------------------

/// Every call the server understands, with its numeric wire id.
///
/// On the wire a call type is a plain `u32`, so this enum is serialized
/// through `u32` (`#[serde(into, try_from)]`) rather than as a serde enum.
/// An unknown id on the way in is a [`ProtocolError::UnknownRequestType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
#[repr(u32)]
pub enum RequestType {
    PlayerUpdate = 1,
    GetPlayer = 2,
    GetInventory = 4,
    DownloadSettings = 5,
    DownloadItemTemplates = 6,
    FortSearch = 101,
    Encounter = 102,
    CatchCreature = 103,
    FortDetails = 104,
    GetMapObjects = 106,
    ReleaseCreature = 112,
    UseItemCapture = 114,
    UseIncense = 118,
    EvolveCreature = 125,
    GetHatchedObjects = 126,
    CheckAwardedBadges = 129,
    RecycleInventoryItem = 137,
    UseItemXpBoost = 139,
    UpgradeCreature = 147,
}

impl RequestType {
    /// All known call types, in wire-id order.
    pub const ALL: [RequestType; 19] = [
        Self::PlayerUpdate,
        Self::GetPlayer,
        Self::GetInventory,
        Self::DownloadSettings,
        Self::DownloadItemTemplates,
        Self::FortSearch,
        Self::Encounter,
        Self::CatchCreature,
        Self::FortDetails,
        Self::GetMapObjects,
        Self::ReleaseCreature,
        Self::UseItemCapture,
        Self::UseIncense,
        Self::EvolveCreature,
        Self::GetHatchedObjects,
        Self::CheckAwardedBadges,
        Self::RecycleInventoryItem,
        Self::UseItemXpBoost,
        Self::UpgradeCreature,
    ];

    /// Returns the numeric wire id.
    pub fn id(self) -> u32 {
        self as u32
    }
}

impl From<RequestType> for u32 {
    fn from(kind: RequestType) -> Self {
        kind.id()
    }
}

impl TryFrom<u32> for RequestType {
    type Error = ProtocolError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or(ProtocolError::UnknownRequestType(id))
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}({})", self.id())
    }
}

// ---------------------------------------------------------------------------
// Call: one logical request inside an envelope
// ---------------------------------------------------------------------------

/// A single logical operation request.
///
/// The payload is produced by the codec from a typed request message and
/// is opaque at this level. Calls without arguments carry an empty payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Which operation this is.
    pub kind: RequestType,
    /// The encoded request message.
    pub payload: Vec<u8>,
}

impl Call {
    /// Creates a call with an already-encoded payload.
    pub fn new(kind: RequestType, payload: Vec<u8>) -> Self {
        Self { kind, payload }
    }

    /// Creates a call that takes no arguments.
    pub fn empty(kind: RequestType) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Position: what the envelope says about where we are
// ---------------------------------------------------------------------------

/// A point on the globe as sent to the server: degrees and meters.
///
/// This is always the *obfuscated* position when it appears in an
/// envelope. The real position never leaves the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

// ---------------------------------------------------------------------------
// Credentials and tickets
// ---------------------------------------------------------------------------

/// Which identity provider issued an access credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AuthKind {
    /// A Google account id-token.
    #[default]
    Google,
    /// A Pokémon Trainer Club access token.
    Ptc,
}

impl AuthKind {
    /// The provider name the server expects in the handshake.
    pub fn provider(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Ptc => "ptc",
        }
    }
}

/// An opaque access credential from a login flow, plus its provider.
///
/// `Debug` is implemented by hand so the token never ends up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCredential {
    pub token: String,
    pub kind: AuthKind,
}

impl AccessCredential {
    pub fn new(token: impl Into<String>, kind: AuthKind) -> Self {
        Self {
            token: token.into(),
            kind,
        }
    }
}

impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("token", &"<redacted>")
            .field("kind", &self.kind)
            .finish()
    }
}

/// The server-issued proof of an established session.
///
/// Taken verbatim from the handshake response and echoed in every
/// subsequent envelope until a new handshake replaces it. All three fields
/// are required, so a partial ticket cannot be constructed or decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionTicket {
    pub nonce: u64,
    pub timestamp_ms: u64,
    pub nonce_check: u64,
}

/// Identifies an item kind in the server's item catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

// =========================================================================
// Tests
// =========================================================================

//! Typed calls: each request message knows its call type and the response
//! it expects.
//!
//! Dispatch is resolved at compile time. Sending a `FortSearchRequest`
//! yields a `FortSearchResponse` and nothing else; there is no runtime
//! table from call type to decoder.

use serde::Serialize;
use serde::de::DeserializeOwned;
use trailhead_protocol::messages::*;
use trailhead_protocol::{Call, Codec, ProtocolError, RequestType};

/// A request message that can be sent as a single call.
pub trait Rpc: Serialize + Sized {
    /// The call type on the wire.
    const KIND: RequestType;

    /// What the server sends back for this call.
    type Response: DeserializeOwned;

    /// Encodes the request into a call with the given codec.
    fn to_call<C: Codec>(&self, codec: &C) -> Result<Call, ProtocolError> {
        Ok(Call::new(Self::KIND, codec.encode(self)?))
    }
}

macro_rules! rpc {
    ($($request:ty => $response:ty, $kind:ident;)+) => {
        $(
            impl Rpc for $request {
                const KIND: RequestType = RequestType::$kind;
                type Response = $response;
            }
        )+
    };
}

rpc! {
    GetPlayerRequest => GetPlayerResponse, GetPlayer;
    PlayerUpdateRequest => PlayerUpdateResponse, PlayerUpdate;
    GetInventoryRequest => GetInventoryResponse, GetInventory;
    DownloadSettingsRequest => DownloadSettingsResponse, DownloadSettings;
    DownloadItemTemplatesRequest => DownloadItemTemplatesResponse, DownloadItemTemplates;
    GetMapObjectsRequest => GetMapObjectsResponse, GetMapObjects;
    GetHatchedObjectsRequest => GetHatchedObjectsResponse, GetHatchedObjects;
    CheckAwardedBadgesRequest => CheckAwardedBadgesResponse, CheckAwardedBadges;
    FortSearchRequest => FortSearchResponse, FortSearch;
    FortDetailsRequest => FortDetailsResponse, FortDetails;
    EncounterRequest => EncounterResponse, Encounter;
    CatchCreatureRequest => CatchCreatureResponse, CatchCreature;
    UseItemCaptureRequest => UseItemCaptureResponse, UseItemCapture;
    ReleaseCreatureRequest => ReleaseCreatureResponse, ReleaseCreature;
    EvolveCreatureRequest => EvolveCreatureResponse, EvolveCreature;
    UpgradeCreatureRequest => UpgradeCreatureResponse, UpgradeCreature;
    RecycleInventoryItemRequest => RecycleInventoryItemResponse, RecycleInventoryItem;
    UseItemXpBoostRequest => AppliedItemResponse, UseItemXpBoost;
    UseIncenseRequest => AppliedItemResponse, UseIncense;
}

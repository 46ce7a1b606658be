//! Typed request and response messages, one pair per call type.
//!
//! Requests are encoded with the session's codec into a [`Call`](crate::Call)
//! payload; responses are decoded from the sub-response at the same
//! position. Calls that take no arguments use a unit struct, which encodes
//! to an empty payload.

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Fixed settings hash requested together with the map refresh.
pub const SETTINGS_GUID: &str = "4a2e9bc330dae60e7b74fc85b98868ab4700802e";

/// Reticle size sent with every catch attempt.
pub const NORMALIZED_RETICLE_SIZE: f64 = 1.950;

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// A stack of one item kind in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: ItemId,
    pub count: i32,
}

/// A point of interest on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fort {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub enabled: bool,
    pub cooldown_complete_ms: i64,
}

/// A creature visible on the map that can be encountered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildCreature {
    pub encounter_id: u64,
    pub spawn_point_id: String,
    pub species: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub time_till_hidden_ms: i32,
}

/// A creature owned by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedCreature {
    pub id: u64,
    pub species: u32,
    pub combat_power: i32,
}

/// Everything the server reports for one map cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapCell {
    pub cell_id: u64,
    pub current_timestamp_ms: i64,
    pub forts: Vec<Fort>,
    pub wild_creatures: Vec<WildCreature>,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetPlayerRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub username: String,
    pub creation_time_ms: i64,
    pub team: u32,
    pub max_creature_storage: i32,
    pub max_item_storage: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetPlayerResponse {
    pub success: bool,
    pub profile: Option<PlayerProfile>,
}

/// Reports the player's (obfuscated) position to the server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerUpdateRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerUpdateResponse {
    pub wild_creatures: Vec<WildCreature>,
    pub forts: Vec<Fort>,
}

// ---------------------------------------------------------------------------
// Inventory, settings, templates
// ---------------------------------------------------------------------------

/// Asks for inventory changes since `last_timestamp_ms`; 0 asks for all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetInventoryRequest {
    pub last_timestamp_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetInventoryResponse {
    pub success: bool,
    pub new_timestamp_ms: i64,
    pub items: Vec<ItemStack>,
    pub creatures: Vec<OwnedCreature>,
}

/// Asks for the global settings; `hash` names the version the client has.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DownloadSettingsRequest {
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadSettingsResponse {
    pub error: String,
    pub hash: String,
    pub settings: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DownloadItemTemplatesRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub template_id: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadItemTemplatesResponse {
    pub success: bool,
    pub templates: Vec<ItemTemplate>,
    pub timestamp_ms: i64,
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// Asks for the contents of the given cells around a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetMapObjectsRequest {
    pub cell_ids: Vec<u64>,
    /// One entry per cell; 0 asks for the full contents.
    pub since_timestamp_ms: Vec<i64>,
    pub latitude: f64,
    pub longitude: f64,
}

impl GetMapObjectsRequest {
    /// Full-contents query for `cell_ids` around the given position.
    pub fn new(cell_ids: Vec<u64>, latitude: f64, longitude: f64) -> Self {
        let since_timestamp_ms = vec![0; cell_ids.len()];
        Self {
            cell_ids,
            since_timestamp_ms,
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetMapObjectsResponse {
    pub status: u32,
    pub cells: Vec<MapCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetHatchedObjectsRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetHatchedObjectsResponse {
    pub success: bool,
    pub creature_ids: Vec<u64>,
    pub experience_awarded: Vec<i32>,
    pub candy_awarded: Vec<i32>,
    pub stardust_awarded: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckAwardedBadgesRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckAwardedBadgesResponse {
    pub success: bool,
    pub awarded_badges: Vec<u32>,
    pub awarded_badge_levels: Vec<i32>,
}

// ---------------------------------------------------------------------------
// Forts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FortSearchRequest {
    pub fort_id: String,
    pub fort_latitude: f64,
    pub fort_longitude: f64,
    pub player_latitude: f64,
    pub player_longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FortSearchResponse {
    pub result: u32,
    pub items_awarded: Vec<ItemStack>,
    pub gems_awarded: i32,
    pub experience_awarded: i32,
    pub cooldown_complete_ms: i64,
    pub chain_hack_sequence_number: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FortDetailsRequest {
    pub fort_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FortDetailsResponse {
    pub fort_id: String,
    pub name: String,
    pub description: String,
    pub image_urls: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Encounters and catching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterRequest {
    pub encounter_id: u64,
    pub spawn_point_id: String,
    pub player_latitude: f64,
    pub player_longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterResponse {
    pub status: u32,
    pub wild_creature: Option<WildCreature>,
    pub capture_probability: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchCreatureRequest {
    pub encounter_id: u64,
    pub ball: ItemId,
    pub spawn_point_id: String,
    pub hit_creature: bool,
    pub normalized_reticle_size: f64,
    pub spin_modifier: f64,
    pub normalized_hit_position: f64,
}

impl CatchCreatureRequest {
    /// A straight, centred throw with the given ball.
    pub fn straight_throw(encounter_id: u64, spawn_point_id: impl Into<String>, ball: ItemId) -> Self {
        Self {
            encounter_id,
            ball,
            spawn_point_id: spawn_point_id.into(),
            hit_creature: true,
            normalized_reticle_size: NORMALIZED_RETICLE_SIZE,
            spin_modifier: 1.0,
            normalized_hit_position: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchCreatureResponse {
    pub status: u32,
    pub miss_percent: f64,
    pub captured_creature_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseItemCaptureRequest {
    pub item_id: ItemId,
    pub encounter_id: u64,
    pub spawn_point_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseItemCaptureResponse {
    pub success: bool,
    pub item_capture_mult: f64,
    pub item_flee_mult: f64,
}

// ---------------------------------------------------------------------------
// Creature management
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseCreatureRequest {
    pub creature_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseCreatureResponse {
    pub result: u32,
    pub candy_awarded: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolveCreatureRequest {
    pub creature_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolveCreatureResponse {
    pub result: u32,
    pub evolved_creature_id: u64,
    pub experience_awarded: i32,
    pub candy_awarded: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeCreatureRequest {
    pub creature_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeCreatureResponse {
    pub result: u32,
    pub upgraded_creature: Option<OwnedCreature>,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecycleInventoryItemRequest {
    pub item_id: ItemId,
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecycleInventoryItemResponse {
    pub result: u32,
    pub new_count: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseItemXpBoostRequest {
    pub item_id: ItemId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseIncenseRequest {
    pub item_id: ItemId,
}

/// Shared by the XP-boost and incense calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedItemResponse {
    pub result: u32,
    pub item_id: ItemId,
    pub expire_ms: i64,
}

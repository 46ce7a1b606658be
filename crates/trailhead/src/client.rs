//! `TrailheadClient`: the RPC dispatcher and its builder.
//!
//! This is the entry point for talking to a game server. It ties together
//! all the layers: location → envelope → session → transport, and back
//! through the codec into typed responses.

use std::ops::AsyncFnMut;

use serde::{Deserialize, Serialize};
use trailhead_geo::{
    CellIndexer, Location, LocationManager, MemoryStore, RandSampler, SavedData, UniformSampler,
};
use trailhead_protocol::messages::*;
use trailhead_protocol::{AccessCredential, Call, Codec, Envelope, ItemId, Position};
use trailhead_session::{CredentialProvider, Handshake, SessionConfig, SessionContext};
use trailhead_transport::Transport;
#[cfg(feature = "http")]
use trailhead_protocol::BincodeCodec;
#[cfg(feature = "http")]
use trailhead_transport::{HttpConfig, HttpTransport};

use crate::{Rpc, RpcBatch, TrailheadError};

// ---------------------------------------------------------------------------
// ClientSettings
// ---------------------------------------------------------------------------

/// Where the player starts when nothing has been persisted yet.
///
/// Derives `serde` so a host application can keep it in its own config
/// file. Missing fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub default_altitude: f64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            default_latitude: 37.7749,
            default_longitude: -122.4194,
            default_altitude: 10.0,
        }
    }
}

impl ClientSettings {
    fn default_position(&self) -> Position {
        Position::new(
            self.default_latitude,
            self.default_longitude,
            self.default_altitude,
        )
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring a [`TrailheadClient`].
///
/// # Example
///
/// ```rust,no_run
/// use trailhead::prelude::*;
///
/// # fn main() -> Result<(), TrailheadError> {
/// let client = TrailheadClient::builder()
///     .settings(ClientSettings {
///         default_latitude: 51.5074,
///         default_longitude: -0.1278,
///         default_altitude: 11.0,
///     })
///     .store(FileStore::new("./saved"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct TrailheadClientBuilder {
    session_config: SessionConfig,
    settings: ClientSettings,
    store: Option<Box<dyn SavedData>>,
    sampler: Option<Box<dyn UniformSampler>>,
    #[cfg(feature = "http")]
    http_config: HttpConfig,
}

impl TrailheadClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            session_config: SessionConfig::default(),
            settings: ClientSettings::default(),
            store: None,
            sampler: None,
            #[cfg(feature = "http")]
            http_config: HttpConfig::default(),
        }
    }

    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    pub fn settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Where the last coordinate is persisted. Defaults to an in-memory
    /// store, which forgets everything on exit.
    pub fn store(mut self, store: impl SavedData + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// The random source for obfuscation. Defaults to an OS-seeded RNG.
    pub fn sampler(mut self, sampler: impl UniformSampler + 'static) -> Self {
        self.sampler = Some(Box::new(sampler));
        self
    }

    #[cfg(feature = "http")]
    pub fn http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Builds a client over the given transport and codec.
    ///
    /// The starting location is restored from the store, or taken from
    /// the settings.
    pub fn build_with<T: Transport, C: Codec>(self, transport: T, codec: C) -> TrailheadClient<T, C> {
        let store = self
            .store
            .unwrap_or_else(|| Box::new(MemoryStore::new()));
        let sampler = self
            .sampler
            .unwrap_or_else(|| Box::new(RandSampler::new()));
        let location = LocationManager::restore(store, sampler, self.settings.default_position());

        TrailheadClient::new(
            SessionContext::new(transport, codec, self.session_config),
            location,
        )
    }

    /// Builds a client over HTTPS with the binary codec.
    #[cfg(feature = "http")]
    pub fn build(self) -> Result<TrailheadClient<HttpTransport, BincodeCodec>, TrailheadError> {
        let transport = HttpTransport::new(self.http_config.clone())?;
        Ok(self.build_with(transport, BincodeCodec))
    }
}

impl Default for TrailheadClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// TrailheadClient
// ---------------------------------------------------------------------------

/// Everything the composite map refresh returns.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    pub map: GetMapObjectsResponse,
    pub hatched: GetHatchedObjectsResponse,
    pub inventory: GetInventoryResponse,
    pub badges: CheckAwardedBadgesResponse,
    pub settings: DownloadSettingsResponse,
}

/// A game-server client for one player.
///
/// Every operation takes `&mut self`: one client has at most one request
/// in flight, and the location an envelope carries cannot change while it
/// is being built. Run several clients for parallelism.
pub struct TrailheadClient<T, C> {
    session: SessionContext<T, C>,
    location: LocationManager,
    indexer: CellIndexer,
    inventory_timestamp_ms: i64,
}

#[cfg(feature = "http")]
impl TrailheadClient<HttpTransport, BincodeCodec> {
    /// Creates a new builder.
    pub fn builder() -> TrailheadClientBuilder {
        TrailheadClientBuilder::new()
    }
}

impl<T: Transport, C: Codec> TrailheadClient<T, C> {
    pub fn new(session: SessionContext<T, C>, location: LocationManager) -> Self {
        Self {
            session,
            location,
            indexer: CellIndexer::default(),
            inventory_timestamp_ms: 0,
        }
    }

    pub fn session(&self) -> &SessionContext<T, C> {
        &self.session
    }

    /// The current location, real and obfuscated.
    pub fn location(&self) -> Location {
        self.location.snapshot()
    }

    /// Moves the player locally without telling the server.
    ///
    /// NaN is ignored; out-of-range values are an error and change nothing.
    pub fn set_coordinates(&mut self, lat: f64, lng: f64, altitude: f64) -> Result<(), TrailheadError> {
        Ok(self.location.set_coordinates(lat, lng, altitude)?)
    }

    fn position(&self) -> Position {
        self.location.snapshot().obfuscated_position()
    }

    // -- Session ----------------------------------------------------------

    /// Handshakes with the server using `credential`.
    ///
    /// A handshake that names no endpoint still succeeds; check
    /// [`Handshake::server_available`]. Calls fail with
    /// `ServerUnavailable` until a later handshake names one.
    pub async fn establish(&mut self, credential: AccessCredential) -> Result<Handshake, TrailheadError> {
        let position = self.position();
        Ok(self.session.establish(credential, position).await?)
    }

    /// Fetches a credential from `provider`, then handshakes.
    pub async fn establish_with<P: CredentialProvider>(
        &mut self,
        provider: &P,
    ) -> Result<Handshake, TrailheadError> {
        let credential = provider.credential().await?;
        self.establish(credential).await
    }

    // -- Dispatch ---------------------------------------------------------

    async fn dispatch(&mut self, calls: Vec<Call>) -> Result<Vec<Vec<u8>>, TrailheadError> {
        let ticket = self.session.current_ticket()?;
        let envelope = Envelope::with_ticket(&ticket, self.position(), calls);
        let response = self.session.send(&envelope).await?;
        response.expect_sub_responses(envelope.calls.len())?;
        Ok(response.sub_responses)
    }

    /// Sends one typed call and decodes its response.
    pub async fn call<R: Rpc>(&mut self, request: &R) -> Result<R::Response, TrailheadError> {
        let call = request.to_call(self.session.codec())?;
        let sub_responses = self.dispatch(vec![call]).await?;
        Ok(self.session.codec().decode(&sub_responses[0])?)
    }

    /// Sends a tuple of calls in one envelope and decodes the responses by
    /// position.
    pub async fn call_batch<B: RpcBatch>(&mut self, batch: &B) -> Result<B::Responses, TrailheadError> {
        let calls = batch.calls(self.session.codec())?;
        let sub_responses = self.dispatch(calls).await?;
        Ok(B::decode(self.session.codec(), &sub_responses)?)
    }

    /// Runs `action` up to `times` times in sequence, stopping at the first
    /// error.
    ///
    /// ```rust,ignore
    /// let released = client
    ///     .repeat(3, async |c| c.release_creature(next_id()).await)
    ///     .await?;
    /// ```
    pub async fn repeat<R>(
        &mut self,
        times: usize,
        mut action: impl AsyncFnMut(&mut Self) -> Result<R, TrailheadError>,
    ) -> Result<Vec<R>, TrailheadError> {
        let mut results = Vec::with_capacity(times);
        for attempt in 0..times {
            match action(&mut *self).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::debug!(attempt, times, error = %e, "repeat stopped early");
                    return Err(e);
                }
            }
        }
        Ok(results)
    }

    // -- Player -----------------------------------------------------------

    /// The player profile, sent with the access credential instead of the
    /// session ticket.
    pub async fn get_profile(&mut self) -> Result<GetPlayerResponse, TrailheadError> {
        let credential = self.session.credential()?.clone();
        let call = GetPlayerRequest.to_call(self.session.codec())?;
        let envelope = Envelope::with_credential(&credential, self.position(), vec![call]);

        let response = self.session.send(&envelope).await?;
        response.expect_sub_responses(1)?;
        Ok(self.session.codec().decode(&response.sub_responses[0])?)
    }

    /// Moves the player and reports the (obfuscated) position to the
    /// server.
    pub async fn update_player_location(
        &mut self,
        lat: f64,
        lng: f64,
        altitude: f64,
    ) -> Result<PlayerUpdateResponse, TrailheadError> {
        self.set_coordinates(lat, lng, altitude)?;
        let position = self.position();
        self.call(&PlayerUpdateRequest {
            latitude: position.latitude,
            longitude: position.longitude,
        })
        .await
    }

    /// The full inventory.
    pub async fn get_inventory(&mut self) -> Result<GetInventoryResponse, TrailheadError> {
        let inventory = self
            .call(&GetInventoryRequest {
                last_timestamp_ms: 0,
            })
            .await?;
        self.note_inventory(&inventory);
        Ok(inventory)
    }

    pub async fn get_settings(&mut self) -> Result<DownloadSettingsResponse, TrailheadError> {
        self.call(&DownloadSettingsRequest {
            hash: SETTINGS_GUID.to_string(),
        })
        .await
    }

    pub async fn get_item_templates(&mut self) -> Result<DownloadItemTemplatesResponse, TrailheadError> {
        self.call(&DownloadItemTemplatesRequest).await
    }

    /// The composite map refresh: map cells around the player, hatched
    /// eggs, inventory changes since the last refresh, new badges, and
    /// settings, in one envelope.
    pub async fn refresh_world(&mut self) -> Result<WorldState, TrailheadError> {
        let location = self.location.snapshot();
        let cells = location.nearby_cells(&self.indexer);

        let batch = (
            GetMapObjectsRequest::new(
                cells,
                location.obfuscated_latitude,
                location.obfuscated_longitude,
            ),
            GetHatchedObjectsRequest,
            GetInventoryRequest {
                last_timestamp_ms: self.inventory_timestamp_ms,
            },
            CheckAwardedBadgesRequest,
            DownloadSettingsRequest {
                hash: SETTINGS_GUID.to_string(),
            },
        );
        let (map, hatched, inventory, badges, settings) = self.call_batch(&batch).await?;
        self.note_inventory(&inventory);

        Ok(WorldState {
            map,
            hatched,
            inventory,
            badges,
            settings,
        })
    }

    fn note_inventory(&mut self, inventory: &GetInventoryResponse) {
        if inventory.success && inventory.new_timestamp_ms > self.inventory_timestamp_ms {
            self.inventory_timestamp_ms = inventory.new_timestamp_ms;
        }
    }

    // -- Forts ------------------------------------------------------------

    pub async fn search_fort(
        &mut self,
        fort_id: &str,
        fort_latitude: f64,
        fort_longitude: f64,
    ) -> Result<FortSearchResponse, TrailheadError> {
        let position = self.position();
        self.call(&FortSearchRequest {
            fort_id: fort_id.to_string(),
            fort_latitude,
            fort_longitude,
            player_latitude: position.latitude,
            player_longitude: position.longitude,
        })
        .await
    }

    pub async fn get_fort(
        &mut self,
        fort_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<FortDetailsResponse, TrailheadError> {
        self.call(&FortDetailsRequest {
            fort_id: fort_id.to_string(),
            latitude,
            longitude,
        })
        .await
    }

    // -- Encounters -------------------------------------------------------

    pub async fn encounter(
        &mut self,
        encounter_id: u64,
        spawn_point_id: &str,
    ) -> Result<EncounterResponse, TrailheadError> {
        let position = self.position();
        self.call(&EncounterRequest {
            encounter_id,
            spawn_point_id: spawn_point_id.to_string(),
            player_latitude: position.latitude,
            player_longitude: position.longitude,
        })
        .await
    }

    /// Throws `ball` straight at the encountered creature.
    pub async fn catch_creature(
        &mut self,
        encounter_id: u64,
        spawn_point_id: &str,
        ball: ItemId,
    ) -> Result<CatchCreatureResponse, TrailheadError> {
        self.call(&CatchCreatureRequest::straight_throw(
            encounter_id,
            spawn_point_id,
            ball,
        ))
        .await
    }

    pub async fn use_capture_item(
        &mut self,
        item_id: ItemId,
        encounter_id: u64,
        spawn_point_id: &str,
    ) -> Result<UseItemCaptureResponse, TrailheadError> {
        self.call(&UseItemCaptureRequest {
            item_id,
            encounter_id,
            spawn_point_id: spawn_point_id.to_string(),
        })
        .await
    }

    // -- Creatures --------------------------------------------------------

    pub async fn release_creature(&mut self, creature_id: u64) -> Result<ReleaseCreatureResponse, TrailheadError> {
        self.call(&ReleaseCreatureRequest { creature_id }).await
    }

    pub async fn evolve_creature(&mut self, creature_id: u64) -> Result<EvolveCreatureResponse, TrailheadError> {
        self.call(&EvolveCreatureRequest { creature_id }).await
    }

    pub async fn upgrade_creature(&mut self, creature_id: u64) -> Result<UpgradeCreatureResponse, TrailheadError> {
        self.call(&UpgradeCreatureRequest { creature_id }).await
    }

    // -- Items ------------------------------------------------------------

    pub async fn recycle_item(
        &mut self,
        item_id: ItemId,
        count: i32,
    ) -> Result<RecycleInventoryItemResponse, TrailheadError> {
        self.call(&RecycleInventoryItemRequest { item_id, count }).await
    }

    pub async fn use_xp_boost(&mut self, item_id: ItemId) -> Result<AppliedItemResponse, TrailheadError> {
        self.call(&UseItemXpBoostRequest { item_id }).await
    }

    pub async fn use_incense(&mut self, item_id: ItemId) -> Result<AppliedItemResponse, TrailheadError> {
        self.call(&UseIncenseRequest { item_id }).await
    }
}

impl<T, C> std::fmt::Debug for TrailheadClient<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrailheadClient")
            .field("session", &self.session)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

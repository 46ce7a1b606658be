//! Integration tests for `TrailheadClient`.
//!
//! The transport is a fake game server running in-process: it decodes each
//! envelope, records it, and answers every call from its payload so the
//! tests can tell which sub-response went where.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use trailhead::prelude::*;
use trailhead::trailhead_protocol::messages::*;
use trailhead::trailhead_protocol::{
    Authorization, Call, Envelope, JsonCodec, ProtocolError, RequestType, ResponseEnvelope,
    ResponseStatus, SessionTicket,
};
use trailhead::trailhead_session::{SessionError, SessionState};
use trailhead::trailhead_transport::{Transport, TransportError};

// -- Fake server ----------------------------------------------------------

const HANDSHAKE_URL: &str = "http://login.test/rpc";

const TICKET: SessionTicket = SessionTicket {
    nonce: 11,
    timestamp_ms: 1_469_000_000_000,
    nonce_check: 13,
};

type Handler = Arc<dyn Fn(&Envelope) -> ResponseEnvelope + Send + Sync>;

#[derive(Clone)]
struct GameServer {
    endpoint: String,
    handler: Handler,
    offline: Arc<AtomicBool>,
    log: Arc<Mutex<Vec<(String, Envelope)>>>,
}

impl GameServer {
    fn new() -> Self {
        Self::with_handler(answer_all)
    }

    fn with_handler(handler: impl Fn(&Envelope) -> ResponseEnvelope + Send + Sync + 'static) -> Self {
        Self {
            endpoint: "game.test".into(),
            handler: Arc::new(handler),
            offline: Arc::new(AtomicBool::new(false)),
            log: Arc::default(),
        }
    }

    fn without_endpoint(mut self) -> Self {
        self.endpoint.clear();
        self
    }

    fn requests(&self) -> Vec<(String, Envelope)> {
        self.log.lock().unwrap().clone()
    }

    fn last(&self) -> Envelope {
        self.requests().pop().unwrap().1
    }
}

impl Transport for GameServer {
    async fn send(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectionClosed("server offline".into()));
        }
        let envelope: Envelope = serde_json::from_slice(&body).unwrap();
        self.log.lock().unwrap().push((url.to_string(), envelope.clone()));

        let response = if url == HANDSHAKE_URL {
            ResponseEnvelope {
                status: ResponseStatus::REDIRECT,
                endpoint: self.endpoint.clone(),
                ticket: Some(TICKET),
                sub_responses: envelope.calls.iter().map(|_| Vec::new()).collect(),
            }
        } else {
            (self.handler)(&envelope)
        };
        Ok(serde_json::to_vec(&response).unwrap())
    }
}

fn json<T: serde::Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).unwrap()
}

fn request<T: serde::de::DeserializeOwned>(call: &Call) -> T {
    serde_json::from_slice(&call.payload).unwrap()
}

/// Answers one call. Values are derived from the request so a response
/// decoded at the wrong position shows up as a wrong value.
fn answer(call: &Call) -> Vec<u8> {
    match call.kind {
        RequestType::ReleaseCreature => {
            let req: ReleaseCreatureRequest = request(call);
            json(&ReleaseCreatureResponse {
                result: 1,
                candy_awarded: req.creature_id as i32 * 10,
            })
        }
        RequestType::EvolveCreature => {
            let req: EvolveCreatureRequest = request(call);
            json(&EvolveCreatureResponse {
                result: 1,
                evolved_creature_id: req.creature_id + 100,
                experience_awarded: 500,
                candy_awarded: 1,
            })
        }
        RequestType::RecycleInventoryItem => {
            let req: RecycleInventoryItemRequest = request(call);
            json(&RecycleInventoryItemResponse {
                result: 1,
                new_count: 50 - req.count,
            })
        }
        RequestType::PlayerUpdate => json(&PlayerUpdateResponse {
            wild_creatures: vec![],
            forts: vec![],
        }),
        RequestType::GetPlayer => json(&GetPlayerResponse {
            success: true,
            profile: Some(PlayerProfile {
                username: "ash".into(),
                creation_time_ms: 1,
                team: 2,
                max_creature_storage: 250,
                max_item_storage: 350,
            }),
        }),
        RequestType::GetMapObjects => {
            let req: GetMapObjectsRequest = request(call);
            json(&GetMapObjectsResponse {
                status: 1,
                cells: req
                    .cell_ids
                    .iter()
                    .map(|&cell_id| MapCell {
                        cell_id,
                        current_timestamp_ms: 0,
                        forts: vec![],
                        wild_creatures: vec![],
                    })
                    .collect(),
            })
        }
        RequestType::GetHatchedObjects => json(&GetHatchedObjectsResponse {
            success: true,
            creature_ids: vec![],
            experience_awarded: vec![],
            candy_awarded: vec![],
            stardust_awarded: vec![],
        }),
        RequestType::GetInventory => {
            let req: GetInventoryRequest = request(call);
            json(&GetInventoryResponse {
                success: true,
                new_timestamp_ms: req.last_timestamp_ms + 1_000,
                items: vec![],
                creatures: vec![],
            })
        }
        RequestType::CheckAwardedBadges => json(&CheckAwardedBadgesResponse {
            success: true,
            awarded_badges: vec![],
            awarded_badge_levels: vec![],
        }),
        RequestType::DownloadSettings => {
            let req: DownloadSettingsRequest = request(call);
            json(&DownloadSettingsResponse {
                error: String::new(),
                hash: req.hash,
                settings: vec![],
            })
        }
        RequestType::UseIncense | RequestType::UseItemXpBoost => {
            let req: UseIncenseRequest = request(call);
            json(&AppliedItemResponse {
                result: 1,
                item_id: req.item_id,
                expire_ms: 1_800_000,
            })
        }
        other => panic!("fake server has no answer for {other}"),
    }
}

fn answer_all(envelope: &Envelope) -> ResponseEnvelope {
    ResponseEnvelope {
        status: ResponseStatus::OK,
        endpoint: String::new(),
        ticket: None,
        sub_responses: envelope.calls.iter().map(answer).collect(),
    }
}

type Client = TrailheadClient<GameServer, JsonCodec>;

fn client(server: &GameServer) -> Client {
    TrailheadClientBuilder::new()
        .session_config(SessionConfig {
            handshake_url: HANDSHAKE_URL.into(),
            endpoint_scheme: "http".into(),
        })
        .sampler(RandSampler::seeded(7))
        .build_with(server.clone(), JsonCodec)
}

async fn established(server: &GameServer) -> Client {
    let mut client = client(server);
    client
        .establish(AccessCredential::new("id-token", AuthKind::Google))
        .await
        .unwrap();
    client
}

// =========================================================================
// Before establish
// =========================================================================

#[tokio::test]
async fn test_call_before_establish_is_not_established() {
    let server = GameServer::new();
    let mut client = client(&server);

    let result = client.release_creature(1).await;

    assert!(matches!(
        result,
        Err(TrailheadError::Session(SessionError::SessionNotEstablished))
    ));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_get_profile_before_establish_is_not_established() {
    let server = GameServer::new();
    let mut client = client(&server);

    assert!(matches!(
        client.get_profile().await,
        Err(TrailheadError::Session(SessionError::SessionNotEstablished))
    ));
}

// =========================================================================
// establish()
// =========================================================================

#[tokio::test]
async fn test_establish_sends_obfuscated_position() {
    let server = GameServer::new();
    let client = established(&server).await;

    let (url, handshake) = server.requests().remove(0);
    assert_eq!(url, HANDSHAKE_URL);
    assert_eq!(handshake.position, client.location().obfuscated_position());
    assert_ne!(handshake.position, client.location().real_position());
    assert_eq!(client.session().state(), SessionState::Established);
}

#[tokio::test]
async fn test_establish_with_provider_uses_its_credential() {
    let server = GameServer::new();
    let mut client = client(&server);
    let provider = StaticCredential(AccessCredential::new("ptc-token", AuthKind::Ptc));

    client.establish_with(&provider).await.unwrap();

    match &server.last().auth {
        Authorization::Credential(cred) => assert_eq!(cred.token, "ptc-token"),
        other => panic!("expected credential auth, got {other:?}"),
    }
}

#[tokio::test]
async fn test_establish_empty_endpoint_then_calls_are_unavailable() {
    let server = GameServer::new().without_endpoint();
    let mut client = client(&server);

    let handshake = client
        .establish(AccessCredential::new("id-token", AuthKind::Google))
        .await
        .unwrap();

    assert!(!handshake.server_available());
    assert!(matches!(
        client.get_inventory().await,
        Err(TrailheadError::Session(SessionError::ServerUnavailable))
    ));
}

// =========================================================================
// Positional decode
// =========================================================================

#[tokio::test]
async fn test_call_batch_decodes_each_position_into_its_type() {
    let server = GameServer::new();
    let mut client = established(&server).await;

    let (released, evolved, recycled) = client
        .call_batch(&(
            ReleaseCreatureRequest { creature_id: 4 },
            EvolveCreatureRequest { creature_id: 5 },
            RecycleInventoryItemRequest {
                item_id: ItemId(1),
                count: 8,
            },
        ))
        .await
        .unwrap();

    assert_eq!(released.candy_awarded, 40);
    assert_eq!(evolved.evolved_creature_id, 105);
    assert_eq!(recycled.new_count, 42);
    assert_eq!(
        server.last().kinds(),
        [
            RequestType::ReleaseCreature,
            RequestType::EvolveCreature,
            RequestType::RecycleInventoryItem
        ]
    );
}

#[tokio::test]
async fn test_call_batch_same_type_keeps_order() {
    let server = GameServer::new();
    let mut client = established(&server).await;

    let (a, b, c) = client
        .call_batch(&(
            ReleaseCreatureRequest { creature_id: 3 },
            ReleaseCreatureRequest { creature_id: 1 },
            ReleaseCreatureRequest { creature_id: 2 },
        ))
        .await
        .unwrap();

    assert_eq!(
        [a.candy_awarded, b.candy_awarded, c.candy_awarded],
        [30, 10, 20]
    );
}

#[tokio::test]
async fn test_call_batch_missing_sub_response_is_count_mismatch() {
    let server = GameServer::with_handler(|envelope| {
        let mut response = answer_all(envelope);
        response.sub_responses.pop();
        response
    });
    let mut client = established(&server).await;

    let result = client
        .call_batch(&(
            ReleaseCreatureRequest { creature_id: 1 },
            ReleaseCreatureRequest { creature_id: 2 },
        ))
        .await;

    assert!(matches!(
        result,
        Err(TrailheadError::Protocol(ProtocolError::ResponseCountMismatch {
            expected: 2,
            actual: 1
        }))
    ));
}

// =========================================================================
// Named operations
// =========================================================================

#[tokio::test]
async fn test_refresh_world_sends_fixed_composite() {
    let server = GameServer::new();
    let mut client = established(&server).await;

    let world = client.refresh_world().await.unwrap();

    let envelope = server.last();
    assert_eq!(
        envelope.kinds(),
        [
            RequestType::GetMapObjects,
            RequestType::GetHatchedObjects,
            RequestType::GetInventory,
            RequestType::CheckAwardedBadges,
            RequestType::DownloadSettings,
        ]
    );
    assert_eq!(envelope.ticket(), Some(&TICKET));

    let map: GetMapObjectsRequest = request(&envelope.calls[0]);
    let location = client.location();
    assert_eq!(map.cell_ids.len(), 21);
    assert_eq!(map.latitude, location.obfuscated_latitude);
    assert_eq!(world.map.cells.len(), 21);
    assert_eq!(world.settings.hash, SETTINGS_GUID);
}

#[tokio::test]
async fn test_refresh_world_asks_for_inventory_since_last_refresh() {
    let server = GameServer::new();
    let mut client = established(&server).await;

    let first = client.refresh_world().await.unwrap();
    client.refresh_world().await.unwrap();

    let second: GetInventoryRequest = request(&server.last().calls[2]);
    assert_eq!(first.inventory.new_timestamp_ms, 1_000);
    assert_eq!(second.last_timestamp_ms, 1_000);
}

#[tokio::test]
async fn test_update_player_location_reports_obfuscated_position() {
    let server = GameServer::new();
    let mut client = established(&server).await;

    client
        .update_player_location(37.7749, -122.4194, 10.0)
        .await
        .unwrap();

    let location = client.location();
    assert_eq!((location.latitude, location.longitude), (37.7749, -122.4194));

    let envelope = server.last();
    let update: PlayerUpdateRequest = request(&envelope.calls[0]);
    assert_eq!(update.latitude, location.obfuscated_latitude);
    assert_eq!(update.longitude, location.obfuscated_longitude);
    assert_eq!(envelope.position, location.obfuscated_position());
    assert_ne!(update.latitude, 37.7749);
}

#[tokio::test]
async fn test_update_player_location_out_of_range_sends_nothing() {
    let server = GameServer::new();
    let mut client = established(&server).await;
    let before = server.requests().len();

    let result = client.update_player_location(120.0, 0.0, 0.0).await;

    assert!(matches!(result, Err(TrailheadError::Geo(_))));
    assert_eq!(server.requests().len(), before);
}

#[tokio::test]
async fn test_get_profile_uses_credential_auth() {
    let server = GameServer::new();
    let mut client = established(&server).await;

    let profile = client.get_profile().await.unwrap();

    assert_eq!(profile.profile.unwrap().username, "ash");
    let (url, envelope) = server.requests().pop().unwrap();
    assert_eq!(url, "http://game.test/rpc");
    assert!(matches!(envelope.auth, Authorization::Credential(_)));
    assert_eq!(envelope.kinds(), [RequestType::GetPlayer]);
}

#[tokio::test]
async fn test_use_incense_round_trips_item() {
    let server = GameServer::new();
    let mut client = established(&server).await;

    let applied = client.use_incense(ItemId(401)).await.unwrap();

    assert_eq!(applied.item_id, ItemId(401));
    assert_eq!(server.last().kinds(), [RequestType::UseIncense]);
}

// =========================================================================
// Failures
// =========================================================================

#[tokio::test]
async fn test_transport_failure_propagates_verbatim() {
    let server = GameServer::new();
    let mut client = established(&server).await;
    server.offline.store(true, Ordering::SeqCst);

    let result = client.get_settings().await;

    assert!(matches!(
        result,
        Err(TrailheadError::Transport(TransportError::ConnectionClosed(_)))
    ));
}

#[tokio::test]
async fn test_ticket_expired_status_needs_new_handshake() {
    let server = GameServer::with_handler(|_| ResponseEnvelope {
        status: ResponseStatus::TICKET_EXPIRED,
        endpoint: String::new(),
        ticket: None,
        sub_responses: vec![],
    });
    let mut client = established(&server).await;

    let first = client.get_item_templates().await;
    let second = client.release_creature(1).await;

    assert!(matches!(first, Err(TrailheadError::Session(SessionError::TicketExpired))));
    assert!(matches!(second, Err(TrailheadError::Session(SessionError::TicketExpired))));
    // Handshake plus the one call that came back expired.
    assert_eq!(server.requests().len(), 2);
}

// =========================================================================
// repeat()
// =========================================================================

#[tokio::test]
async fn test_repeat_runs_sequentially_and_collects() {
    let server = GameServer::new();
    let mut client = established(&server).await;
    let mut next_id = 0u64;

    let results = client
        .repeat(3, async |c: &mut Client| {
            next_id += 1;
            c.release_creature(next_id).await
        })
        .await
        .unwrap();

    let candy: Vec<i32> = results.iter().map(|r| r.candy_awarded).collect();
    assert_eq!(candy, [10, 20, 30]);
}

#[tokio::test]
async fn test_repeat_stops_at_first_error() {
    // The server refuses to release creature 3.
    let server = GameServer::with_handler(|envelope| {
        let req: ReleaseCreatureRequest = request(&envelope.calls[0]);
        if req.creature_id == 3 {
            ResponseEnvelope {
                status: 3,
                endpoint: String::new(),
                ticket: None,
                sub_responses: vec![],
            }
        } else {
            answer_all(envelope)
        }
    });
    let mut client = established(&server).await;
    let mut next_id = 0u64;

    let result = client
        .repeat(5, async |c: &mut Client| {
            next_id += 1;
            c.release_creature(next_id).await
        })
        .await;

    assert!(matches!(
        result,
        Err(TrailheadError::Protocol(ProtocolError::UnexpectedStatus(3)))
    ));
    assert_eq!(next_id, 3);
    // Handshake plus releases 1, 2 and 3; 4 and 5 never went out.
    assert_eq!(server.requests().len(), 4);
}

#[tokio::test]
async fn test_repeat_zero_times_sends_nothing() {
    let server = GameServer::new();
    let mut client = established(&server).await;

    let results = client
        .repeat(0, async |c: &mut Client| c.get_inventory().await)
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(server.requests().len(), 1);
}

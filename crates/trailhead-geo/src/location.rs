//! The player's location: the real coordinate, its obfuscated copy, and the
//! persisted "last known" value.

use trailhead_protocol::Position;

use crate::cell::CellIndexer;
use crate::noise::{self, UniformSampler};
use crate::store::{LAST_COORDS_KEY, SavedData};
use crate::GeoError;

/// A snapshot of the player's location.
///
/// The obfuscated pair is what leaves the process; the real pair is only
/// ever persisted locally.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub obfuscated_latitude: f64,
    pub obfuscated_longitude: f64,
}

impl Location {
    /// The position sent to the server.
    pub fn obfuscated_position(&self) -> Position {
        Position::new(
            self.obfuscated_latitude,
            self.obfuscated_longitude,
            self.altitude,
        )
    }

    pub fn real_position(&self) -> Position {
        Position::new(self.latitude, self.longitude, self.altitude)
    }

    /// Map cells around the obfuscated position.
    pub fn nearby_cells(&self, indexer: &CellIndexer) -> Vec<u64> {
        indexer.nearby_cells(self.obfuscated_latitude, self.obfuscated_longitude)
    }
}

fn in_range(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// Owns the current [`Location`] and keeps the persisted copy in sync.
pub struct LocationManager {
    location: Location,
    store: Box<dyn SavedData>,
    sampler: Box<dyn UniformSampler>,
}

impl LocationManager {
    /// A manager at `(0, 0, 0)` that has not touched the store yet.
    pub fn new(store: impl SavedData + 'static, sampler: impl UniformSampler + 'static) -> Self {
        Self {
            location: Location::default(),
            store: Box::new(store),
            sampler: Box::new(sampler),
        }
    }

    /// Builds a manager from the persisted coordinate, falling back to the
    /// given defaults.
    ///
    /// A persisted value is used only when it parses and neither component
    /// is zero. Whichever coordinate wins is obfuscated and persisted again.
    pub fn restore(
        store: impl SavedData + 'static,
        sampler: impl UniformSampler + 'static,
        default: Position,
    ) -> Self {
        let mut manager = Self::new(store, sampler);

        let (lat, lng) = match manager.load_persisted() {
            Some((lat, lng)) if lat != 0.0 && lng != 0.0 => {
                tracing::info!(lat, lng, "restored last coordinates");
                (lat, lng)
            }
            _ => {
                tracing::info!(
                    lat = default.latitude,
                    lng = default.longitude,
                    "no saved coordinates, using defaults"
                );
                (default.latitude, default.longitude)
            }
        };

        if let Err(e) = manager.set_coordinates(lat, lng, default.altitude) {
            tracing::error!(error = %e, "default coordinates rejected, staying at origin");
        }
        manager
    }

    /// Moves the player.
    ///
    /// NaN in either component is ignored and returns `Ok`. Out-of-range
    /// values are rejected. In both cases nothing changes. A store failure
    /// is logged; the in-memory location is still updated.
    pub fn set_coordinates(&mut self, lat: f64, lng: f64, altitude: f64) -> Result<(), GeoError> {
        if lat.is_nan() || lng.is_nan() {
            tracing::debug!("ignoring NaN coordinates");
            return Ok(());
        }
        if !in_range(lat, lng) {
            return Err(GeoError::InvalidLocation { lat, lng });
        }

        let (obfuscated_latitude, obfuscated_longitude) =
            noise::obfuscate(self.sampler.as_mut(), lat, lng);

        self.location = Location {
            latitude: lat,
            longitude: lng,
            altitude,
            obfuscated_latitude,
            obfuscated_longitude,
        };

        if let Err(e) = self
            .store
            .set_saved_data(LAST_COORDS_KEY, &format!("{lat}:{lng}"))
        {
            tracing::error!(error = %e, "failed to persist coordinates");
        }
        Ok(())
    }

    /// Reads the persisted `"lat:lng"` pair.
    ///
    /// Returns `None` for anything that does not start with two in-range
    /// numbers. Fields after the second are ignored, so `"1:2:3"` reads
    /// as `(1, 2)`.
    pub fn load_persisted(&self) -> Option<(f64, f64)> {
        let raw = self.store.get_saved_data(LAST_COORDS_KEY, "");
        let mut fields = raw.split(':');
        let (lat, lng) = (fields.next()?, fields.next()?);
        if lat.is_empty() || lng.is_empty() {
            return None;
        }

        match (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) {
            (Ok(lat), Ok(lng)) if in_range(lat, lng) => Some((lat, lng)),
            _ => {
                tracing::error!(value = %raw, "invalid saved coordinates");
                None
            }
        }
    }

    /// A copy of the current location.
    pub fn snapshot(&self) -> Location {
        self.location
    }
}

impl std::fmt::Debug for LocationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationManager")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

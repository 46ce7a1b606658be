//! Error types for the location layer.

/// Errors that can occur while managing the player's location.
///
/// None of these are fatal. An invalid coordinate leaves the stored
/// location untouched; a store failure only loses the persisted copy.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// The coordinate is NaN or outside `[-90, 90]` × `[-180, 180]`.
    #[error("invalid location {lat}, {lng}")]
    InvalidLocation {
        /// Latitude as supplied.
        lat: f64,
        /// Longitude as supplied.
        lng: f64,
    },

    /// The saved-data store could not be written.
    #[error("saved data store failed: {0}")]
    Store(#[source] std::io::Error),
}

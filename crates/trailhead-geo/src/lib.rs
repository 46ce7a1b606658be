//! Where the player is, and where the server thinks they are.
//!
//! - [`LocationManager`] owns the real coordinate and derives an obfuscated
//!   copy whenever it changes. Only the obfuscated copy is meant to be sent.
//! - [`noise`] holds the Gaussian offset and the injectable random source.
//! - [`cell`] turns a coordinate into the map cell ids an area query covers.
//! - [`SavedData`] persists the last real coordinate across restarts.

pub mod cell;
mod error;
mod location;
pub mod noise;
mod store;

pub use cell::{CellId, CellIndexer, nearby_cells};
pub use error::GeoError;
pub use location::{Location, LocationManager};
pub use noise::{RandSampler, SequenceSampler, UniformSampler};
pub use store::{FileStore, LAST_COORDS_KEY, MemoryStore, SavedData};

//! # depot-adapter-snapshot-json
//!
//! Flat JSON snapshot adapter.
//!
//! ## Layout
//!
//! ```json
//! {
//!   "time": {"year": "2024", "month": "01", "day": "01", "hour": "00", "minute": "00"},
//!   "facility 1": {
//!     "type": "...", "name": "...", "dimensions": {"dx": 1.0, "dy": 1.0, "dz": 1.0},
//!     "position": {"x": 0.0, "y": 0.0, "z": 0.0},
//!     "rooms": {
//!       "room 1": {
//!         "type": "...", "name": "...", "dimensions": {...}, "position": {...},
//!         "holding_areas": {
//!           "holding_area 1": {"name": "...", "position": {...}, "container": {...}}
//!         }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! The `time` block is optional; every facility needs at least one room.
//! `holdingAreas` is accepted as an alias of `holding_areas` on input.

pub mod error;
pub mod export;
pub mod load;
pub mod model;

use std::path::{Path, PathBuf};

use depot_app::ports::SnapshotStore;
use depot_app::world::World;
use depot_domain::error::DepotError;

pub use error::SnapshotError;
pub use export::{export_document, export_string};
pub use load::{load_document, load_str};

/// A snapshot stored in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonSnapshotFile {
    path: PathBuf,
}

impl JsonSnapshotFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for JsonSnapshotFile {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<World, DepotError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Ok(load_str(&text)?)
    }

    #[tracing::instrument(skip(self, world), fields(path = %self.path.display()))]
    fn save(&self, world: &World) -> Result<(), DepotError> {
        let text = export_string(world)?;
        std::fs::write(&self.path, text).map_err(|e| self.io_error(e))?;
        tracing::info!("snapshot written");
        Ok(())
    }
}

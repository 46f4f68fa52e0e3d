//! Port definitions: traits that adapters implement.
//!
//! The core never reads or writes snapshots itself. Whatever loads a model
//! must create objects through [`World`] parent-before-child and set the
//! clock before the first object so creation times are stamped correctly.

use depot_domain::error::DepotError;

use crate::world::World;

/// Loads a world from, and saves it to, a flat snapshot.
pub trait SnapshotStore {
    /// Build a fresh world from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::Snapshot`] for malformed input or IO failures,
    /// and the domain error of the first object that fails to build.
    fn load(&self) -> Result<World, DepotError>;

    /// Write the current tree and clock of `world`.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::Snapshot`] when serialization or IO fails.
    fn save(&self, world: &World) -> Result<(), DepotError>;
}

//! Complete histories: the merged, ordered ledger of an object and every
//! object nested beneath it.

use depot_domain::activation::HistoryCarrying;
use depot_domain::error::{DepotError, NotFoundError};
use depot_domain::history::History;
use depot_domain::id::{HoldingAreaId, ObjectId, RoomId};
use depot_domain::registry::Object;
use depot_domain::time::Timestamp;

use super::World;

impl World {
    /// Complete history of object `id`.
    ///
    /// A facility merges its own ledger with the complete history of each
    /// room, a room with each holding area, and a holding area with the
    /// ledger of the container currently on it. A container returns its own
    /// ledger. Every entry is tagged with the object it came from, and the
    /// result is ordered by end time, then by source type name.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if `id` is unknown, names a command,
    /// or the tree references an unknown child.
    pub fn complete_history(&self, id: ObjectId) -> Result<History, DepotError> {
        match self.registry.lookup(id)? {
            Object::Facility(facility) => {
                let rooms = facility
                    .room_ids()
                    .iter()
                    .map(|room| self.complete_history((*room).into()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(facility.history().merge_aggregate(facility.source(), rooms))
            }
            Object::Room(room) => {
                let areas = room
                    .holding_area_ids()
                    .iter()
                    .map(|area| self.complete_history((*area).into()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(room.history().merge_aggregate(room.source(), areas))
            }
            Object::HoldingArea(area) => {
                let container = area
                    .container()
                    .map(|container| {
                        self.registry
                            .container(container)
                            .map(|container| container.history().tagged(container.source()))
                    })
                    .transpose()?;
                Ok(area.history().merge_aggregate(area.source(), container))
            }
            Object::Container(container) => {
                Ok(container.history().tagged(container.source()).sorted())
            }
            Object::Command(_) => Err(NotFoundError::object("HistoryCarrying", id).into()),
        }
    }

    /// Complete history of `id` restricted to entries that ended strictly
    /// before `time`.
    ///
    /// # Errors
    ///
    /// Same as [`complete_history`](Self::complete_history).
    pub fn complete_history_as_of(&self, id: ObjectId, time: Timestamp) -> Result<History, DepotError> {
        Ok(self.complete_history(id)?.entries_as_of(time))
    }

    /// Complete history of a room; shorthand for [`complete_history`](Self::complete_history).
    ///
    /// # Errors
    ///
    /// Same as [`complete_history`](Self::complete_history).
    pub fn room_history(&self, room: RoomId) -> Result<History, DepotError> {
        self.complete_history(room.into())
    }

    /// Complete history of a holding area; shorthand for
    /// [`complete_history`](Self::complete_history).
    ///
    /// # Errors
    ///
    /// Same as [`complete_history`](Self::complete_history).
    pub fn holding_area_history(&self, holding_area: HoldingAreaId) -> Result<History, DepotError> {
        self.complete_history(holding_area.into())
    }
}

//! Facility: the root of the containment tree.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::activation::sealed::Apply;
use crate::activation::{ActivationOutcome, HistoryCarrying};
use crate::command::Command;
use crate::error::{DepotError, NotFoundError, ValidationError};
use crate::history::History;
use crate::id::{FacilityId, ObjectId, ObjectKind, RoomId};
use crate::location::Location;
use crate::room::Room;
use crate::time::Timestamp;
use crate::units::{Dimensions, Position};

/// A site made of rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    id: FacilityId,
    init_time: Timestamp,
    kind: String,
    name: String,
    dimensions: Dimensions,
    position: Position,
    rooms: BTreeSet<RoomId>,
    history: History,
}

impl Facility {
    /// Create a builder for constructing a [`Facility`].
    #[must_use]
    pub fn builder() -> FacilityBuilder {
        FacilityBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> FacilityId {
        self.id
    }

    /// Free-text category, e.g. "Interim storage".
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn set_kind(&mut self, kind: impl Into<String>) {
        self.kind = kind.into();
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the facility.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when `name` is empty.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.name = name;
        Ok(())
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.dimensions = dimensions;
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Location handed to a room added to this facility.
    #[must_use]
    pub fn child_location(&self) -> Location {
        Location::in_facility(self.id)
    }

    /// Ids of the rooms in this facility.
    #[must_use]
    pub fn room_ids(&self) -> &BTreeSet<RoomId> {
        &self.rooms
    }

    /// Place `room` in this facility and point its location here.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AlreadyPlaced`] when the room belongs to a
    /// facility already, or [`ValidationError::InvalidContainment`] when the
    /// resulting location does not fit a room.
    pub fn add_room(&mut self, room: &mut Room) -> Result<(), ValidationError> {
        if !room.location().is_unplaced() {
            return Err(ValidationError::AlreadyPlaced {
                child: room.id().into(),
            });
        }
        room.set_location(self.child_location())?;
        self.rooms.insert(room.id());
        Ok(())
    }

    /// Take `room` out of this facility and reset its location.
    ///
    /// Only an empty room can leave its facility, so no holding area below
    /// it is left pointing at the old facility.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] when the room is not in this
    /// facility, or [`ValidationError::NotEmpty`] when it still holds
    /// holding areas.
    pub fn remove_room(&mut self, room: &mut Room) -> Result<(), DepotError> {
        let id = room.id();
        if !self.rooms.contains(&id) {
            return Err(NotFoundError::object("Room", id).into());
        }
        if !room.holding_area_ids().is_empty() {
            return Err(ValidationError::NotEmpty { parent: id.into() }.into());
        }
        if self.rooms.len() == 1 {
            self.rooms.clear();
        } else {
            self.rooms.remove(&id);
        }
        room.detach();
        Ok(())
    }
}

impl Apply for Facility {
    fn apply(&mut self, _command: &Command) -> Result<ActivationOutcome, DepotError> {
        Err(ValidationError::NotActivatable {
            level: ObjectKind::Facility,
        }
        .into())
    }
}

impl HistoryCarrying for Facility {
    fn object_id(&self) -> ObjectId {
        self.id.into()
    }

    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Facility
    }

    fn init_time(&self) -> Timestamp {
        self.init_time
    }

    fn history(&self) -> &History {
        &self.history
    }
}

/// Step-by-step builder for [`Facility`].
#[derive(Debug, Default)]
pub struct FacilityBuilder {
    kind: Option<String>,
    name: Option<String>,
    dimensions: Option<Dimensions>,
    position: Option<Position>,
}

impl FacilityBuilder {
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Consume the builder, validate, and return a [`Facility`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if `name` is missing or empty,
    /// and [`ValidationError::MissingField`] if no dimensions were given.
    pub fn build(self, id: FacilityId, init_time: Timestamp) -> Result<Facility, ValidationError> {
        let name = self.name.unwrap_or_default();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let dimensions = self
            .dimensions
            .ok_or(ValidationError::MissingField { field: "dimensions" })?;
        Ok(Facility {
            id,
            init_time,
            kind: self.kind.unwrap_or_default(),
            name,
            dimensions,
            position: self.position.unwrap_or_default(),
            rooms: BTreeSet::new(),
            history: History::new(),
        })
    }
}

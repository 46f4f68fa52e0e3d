//! Room: second level of the containment tree, holds holding areas.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::activation::sealed::Apply;
use crate::activation::{ActivationOutcome, HistoryCarrying};
use crate::command::Command;
use crate::error::{DepotError, NotFoundError, ValidationError};
use crate::history::History;
use crate::holding_area::HoldingArea;
use crate::id::{HoldingAreaId, ObjectId, ObjectKind, RoomId};
use crate::location::Location;
use crate::time::Timestamp;
use crate::units::{Dimensions, Position};

/// A room inside a facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    init_time: Timestamp,
    kind: String,
    name: String,
    dimensions: Dimensions,
    position: Position,
    location: Location,
    holding_areas: BTreeSet<HoldingAreaId>,
    history: History,
}

impl Room {
    /// Create a builder for constructing a [`Room`].
    #[must_use]
    pub fn builder() -> RoomBuilder {
        RoomBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> RoomId {
        self.id
    }

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

    /// Rename the room.
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

    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Point the room at its facility.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidContainment`] unless only
    /// `facility` is set.
    pub fn set_location(&mut self, location: Location) -> Result<(), ValidationError> {
        location.validate_for(ObjectKind::Room)?;
        self.location = location;
        Ok(())
    }

    pub(crate) fn detach(&mut self) {
        self.location = Location::unplaced();
    }

    /// Location handed to a holding area added to this room. Only complete
    /// once the room itself sits in a facility.
    #[must_use]
    pub fn child_location(&self) -> Location {
        Location {
            facility: self.location.facility,
            room: Some(self.id),
            holding_area: None,
        }
    }

    #[must_use]
    pub fn holding_area_ids(&self) -> &BTreeSet<HoldingAreaId> {
        &self.holding_areas
    }

    /// Place `holding_area` in this room.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AlreadyPlaced`] when the holding area sits
    /// in a room already, or [`ValidationError::InvalidContainment`] when
    /// this room is not in a facility yet.
    pub fn add_holding_area(&mut self, holding_area: &mut HoldingArea) -> Result<(), ValidationError> {
        if !holding_area.location().is_unplaced() {
            return Err(ValidationError::AlreadyPlaced {
                child: holding_area.id().into(),
            });
        }
        holding_area.set_location(self.child_location())?;
        self.holding_areas.insert(holding_area.id());
        Ok(())
    }

    /// Take `holding_area` out of this room and reset its location.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] when the holding area is not in this
    /// room, or [`ValidationError::NotEmpty`] while it holds a container.
    pub fn remove_holding_area(&mut self, holding_area: &mut HoldingArea) -> Result<(), DepotError> {
        let id = holding_area.id();
        if !self.holding_areas.contains(&id) {
            return Err(NotFoundError::object("HoldingArea", id).into());
        }
        if holding_area.is_occupied() {
            return Err(ValidationError::NotEmpty { parent: id.into() }.into());
        }
        if self.holding_areas.len() == 1 {
            self.holding_areas.clear();
        } else {
            self.holding_areas.remove(&id);
        }
        holding_area.detach();
        Ok(())
    }
}

impl Apply for Room {
    fn apply(&mut self, _command: &Command) -> Result<ActivationOutcome, DepotError> {
        Err(ValidationError::NotActivatable {
            level: ObjectKind::Room,
        }
        .into())
    }
}

impl HistoryCarrying for Room {
    fn object_id(&self) -> ObjectId {
        self.id.into()
    }

    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Room
    }

    fn init_time(&self) -> Timestamp {
        self.init_time
    }

    fn history(&self) -> &History {
        &self.history
    }
}

/// Step-by-step builder for [`Room`]. The room starts unplaced.
#[derive(Debug, Default)]
pub struct RoomBuilder {
    kind: Option<String>,
    name: Option<String>,
    dimensions: Option<Dimensions>,
    position: Option<Position>,
}

impl RoomBuilder {
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

    /// Consume the builder, validate, and return a [`Room`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if `name` is missing or empty,
    /// and [`ValidationError::MissingField`] if no dimensions were given.
    pub fn build(self, id: RoomId, init_time: Timestamp) -> Result<Room, ValidationError> {
        let name = self.name.unwrap_or_default();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let dimensions = self
            .dimensions
            .ok_or(ValidationError::MissingField { field: "dimensions" })?;
        Ok(Room {
            id,
            init_time,
            kind: self.kind.unwrap_or_default(),
            name,
            dimensions,
            position: self.position.unwrap_or_default(),
            location: Location::unplaced(),
            holding_areas: BTreeSet::new(),
            history: History::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FacilityId;
    use crate::time::epoch;

    const FACILITY: FacilityId = FacilityId::from_raw(0);

    fn room() -> Room {
        Room::builder()
            .kind("Storage hall")
            .name("Room 1")
            .dimensions(Dimensions::new(4.0, 4.0, 3.0).unwrap())
            .build(RoomId::from_raw(1), epoch())
            .unwrap()
    }

    fn holding_area(raw: u64) -> HoldingArea {
        HoldingArea::builder()
            .name(format!("Holding area {raw}"))
            .build(HoldingAreaId::from_raw(raw), epoch())
            .unwrap()
    }

    #[test]
    fn should_start_unplaced() {
        let room = room();
        assert!(room.location().is_unplaced());
        assert_eq!(room.kind(), "Storage hall");
    }

    #[test]
    fn should_reject_location_with_room_set() {
        let mut room = room();
        let result = room.set_location(Location::in_room(FACILITY, RoomId::from_raw(7)));
        assert!(matches!(result, Err(ValidationError::InvalidContainment { .. })));
        assert!(room.location().is_unplaced());
    }

    #[test]
    fn should_reject_holding_area_while_room_is_unplaced() {
        let mut room = room();
        let mut area = holding_area(2);

        let result = room.add_holding_area(&mut area);

        assert!(matches!(result, Err(ValidationError::InvalidContainment { .. })));
        assert!(room.holding_area_ids().is_empty());
        assert!(area.location().is_unplaced());
    }

    #[test]
    fn should_set_holding_area_location_when_added() {
        let mut room = room();
        room.set_location(Location::in_facility(FACILITY)).unwrap();
        let mut area = holding_area(2);

        room.add_holding_area(&mut area).unwrap();

        assert_eq!(area.location(), Location::in_room(FACILITY, room.id()));
        assert!(room.holding_area_ids().contains(&area.id()));
    }

    #[test]
    fn should_detach_holding_area_when_removed() {
        let mut room = room();
        room.set_location(Location::in_facility(FACILITY)).unwrap();
        let mut first = holding_area(2);
        let mut second = holding_area(3);
        room.add_holding_area(&mut first).unwrap();
        room.add_holding_area(&mut second).unwrap();

        room.remove_holding_area(&mut second).unwrap();

        assert!(second.location().is_unplaced());
        assert_eq!(room.holding_area_ids().len(), 1);
        assert!(room.remove_holding_area(&mut second).is_err());
    }

    #[test]
    fn should_refuse_to_remove_occupied_holding_area() {
        let mut room = room();
        room.set_location(Location::in_facility(FACILITY)).unwrap();
        let mut area = holding_area(2);
        room.add_holding_area(&mut area).unwrap();
        let mut cask = crate::container::Container::builder()
            .name("Cask")
            .dimensions(Dimensions::new(1.0, 1.0, 1.0).unwrap())
            .build(crate::id::ContainerId::from_raw(3), epoch())
            .unwrap();
        area.add_container(&mut cask).unwrap();

        let result = room.remove_holding_area(&mut area);

        assert!(matches!(
            result,
            Err(DepotError::Validation(ValidationError::NotEmpty { .. }))
        ));
        assert_eq!(area.location(), Location::in_room(FACILITY, room.id()));
        assert!(room.holding_area_ids().contains(&area.id()));
    }

    #[test]
    fn should_reject_empty_name() {
        let mut room = room();
        assert_eq!(room.set_name(""), Err(ValidationError::EmptyName));
        assert_eq!(room.name(), "Room 1");
    }
}

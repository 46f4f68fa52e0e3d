//! Containment use-cases: attaching and detaching children, and reading
//! inventories.
//!
//! Inventories are returned as owned copies; an empty inventory is a
//! diagnostic, logged at debug level, never an error.

use std::collections::BTreeMap;

use depot_domain::container::Container;
use depot_domain::error::DepotError;
use depot_domain::holding_area::{HoldingArea, Placement};
use depot_domain::id::{ContainerId, FacilityId, HoldingAreaId, ObjectKind, RoomId};
use depot_domain::location::Location;
use depot_domain::room::Room;

use super::World;

impl World {
    /// Place `room` in `facility`.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if either id is unknown, and
    /// [`DepotError::Validation`] if the room is already placed.
    #[tracing::instrument(skip(self))]
    pub fn add_room(&mut self, facility: FacilityId, room: RoomId) -> Result<(), DepotError> {
        let (parent, child) = self.registry.facility_and_room_mut(facility, room)?;
        parent.add_room(child)?;
        Ok(())
    }

    /// Take `room` out of `facility`; the room becomes unplaced.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if either id is unknown or the room
    /// is not in the facility, and [`DepotError::Validation`] if the room
    /// still holds holding areas.
    #[tracing::instrument(skip(self))]
    pub fn remove_room(&mut self, facility: FacilityId, room: RoomId) -> Result<(), DepotError> {
        let (parent, child) = self.registry.facility_and_room_mut(facility, room)?;
        parent.remove_room(child)?;
        Ok(())
    }

    /// Place `holding_area` in `room`.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if either id is unknown, and
    /// [`DepotError::Validation`] if the holding area is already placed or
    /// the room is not in a facility.
    #[tracing::instrument(skip(self))]
    pub fn add_holding_area(
        &mut self,
        room: RoomId,
        holding_area: HoldingAreaId,
    ) -> Result<(), DepotError> {
        let (parent, child) = self.registry.room_and_holding_area_mut(room, holding_area)?;
        parent.add_holding_area(child)?;
        Ok(())
    }

    /// Take `holding_area` out of `room`; the holding area becomes unplaced.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if either id is unknown or the
    /// holding area is not in the room, and [`DepotError::Validation`] if a
    /// container still sits on it.
    #[tracing::instrument(skip(self))]
    pub fn remove_holding_area(
        &mut self,
        room: RoomId,
        holding_area: HoldingAreaId,
    ) -> Result<(), DepotError> {
        let (parent, child) = self.registry.room_and_holding_area_mut(room, holding_area)?;
        parent.remove_holding_area(child)?;
        Ok(())
    }

    /// Put `container` on `holding_area`.
    ///
    /// An occupied holding area leaves everything unchanged and yields
    /// [`Placement::AlreadyOccupied`].
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if either id is unknown, and
    /// [`DepotError::Validation`] if the container sits elsewhere or the
    /// holding area is not in a room.
    #[tracing::instrument(skip(self))]
    pub fn add_container(
        &mut self,
        holding_area: HoldingAreaId,
        container: ContainerId,
    ) -> Result<Placement, DepotError> {
        let (parent, child) = self
            .registry
            .holding_area_and_container_mut(holding_area, container)?;
        let placement = parent.add_container(child)?;
        if placement == Placement::AlreadyOccupied {
            tracing::warn!(%holding_area, %container, "holding area already occupied, container not added");
        }
        Ok(placement)
    }

    /// Empty `holding_area`, returning the container that was on it. The
    /// container becomes unplaced.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if the holding area is unknown.
    #[tracing::instrument(skip(self))]
    pub fn remove_container(
        &mut self,
        holding_area: HoldingAreaId,
    ) -> Result<Option<ContainerId>, DepotError> {
        let Some(container) = self.registry.holding_area(holding_area)?.container() else {
            tracing::debug!(%holding_area, "no container present");
            return Ok(None);
        };
        let (parent, child) = self
            .registry
            .holding_area_and_container_mut(holding_area, container)?;
        parent.detach_container(child)?;
        Ok(Some(container))
    }

    /// Copies of the rooms in `facility`.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if the facility or one of its rooms
    /// is unknown.
    pub fn room_inventory(&self, facility: FacilityId) -> Result<BTreeMap<RoomId, Room>, DepotError> {
        let ids = self.registry.facility(facility)?.room_ids();
        if ids.is_empty() {
            tracing::debug!(%facility, "room inventory empty");
        }
        ids.iter()
            .map(|id| {
                self.registry
                    .room(*id)
                    .map(|object| (*id, object.clone()))
                    .map_err(DepotError::from)
            })
            .collect()
    }

    /// Copies of the holding areas in `room`.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if the room or one of its holding
    /// areas is unknown.
    pub fn holding_area_inventory(
        &self,
        room: RoomId,
    ) -> Result<BTreeMap<HoldingAreaId, HoldingArea>, DepotError> {
        let ids = self.registry.room(room)?.holding_area_ids();
        if ids.is_empty() {
            tracing::debug!(%room, "holding area inventory empty");
        }
        ids.iter()
            .map(|id| {
                self.registry
                    .holding_area(*id)
                    .map(|object| (*id, object.clone()))
                    .map_err(DepotError::from)
            })
            .collect()
    }

    /// Copy of the container inventory of `holding_area`; at most one entry.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if the holding area or its container
    /// is unknown.
    pub fn container_inventory(
        &self,
        holding_area: HoldingAreaId,
    ) -> Result<BTreeMap<ContainerId, Container>, DepotError> {
        let ids = self.registry.holding_area(holding_area)?.container_ids();
        if ids.is_empty() {
            tracing::debug!(%holding_area, "container inventory empty");
        }
        ids.iter()
            .map(|id| {
                self.registry
                    .container(*id)
                    .map(|object| (*id, object.clone()))
                    .map_err(DepotError::from)
            })
            .collect()
    }

    /// Copy of the container on `holding_area`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if the holding area or its container
    /// is unknown.
    pub fn contained_container(
        &self,
        holding_area: HoldingAreaId,
    ) -> Result<Option<Container>, DepotError> {
        match self.registry.holding_area(holding_area)?.container() {
            Some(id) => Ok(Some(self.registry.container(id)?.clone())),
            None => {
                tracing::debug!(%holding_area, "no container present");
                Ok(None)
            }
        }
    }

    /// Full location a container gets when placed on `holding_area`.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if the holding area is unknown, and
    /// [`DepotError::Validation`] if it is not placed in a room.
    pub fn placement_at(&self, holding_area: HoldingAreaId) -> Result<Location, DepotError> {
        let location = self.registry.holding_area(holding_area)?.child_location();
        location.validate_for(ObjectKind::Container)?;
        Ok(location)
    }
}

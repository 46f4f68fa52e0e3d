//! Holding area: a spot in a room that holds at most one container.
//!
//! The capacity invariant is kept by [`HoldingArea::add_container`]: offering
//! a container to an occupied area is a no-op reported as
//! [`Placement::AlreadyOccupied`], never an error.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::activation::sealed::Apply;
use crate::activation::{ActivationOutcome, Diagnostic, HistoryCarrying};
use crate::command::{Command, TransportCmd};
use crate::container::Container;
use crate::error::{DepotError, NotFoundError, ValidationError};
use crate::history::{ChangedField, FieldValue, History};
use crate::id::{ContainerId, HoldingAreaId, ObjectId, ObjectKind};
use crate::location::Location;
use crate::time::Timestamp;
use crate::units::Position;

/// What happened to a container offered to a holding area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Placed,
    AlreadyOccupied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingArea {
    id: HoldingAreaId,
    init_time: Timestamp,
    name: String,
    position: Position,
    location: Location,
    occupied: bool,
    containers: BTreeSet<ContainerId>,
    history: History,
}

impl HoldingArea {
    /// Create a builder for constructing a [`HoldingArea`].
    #[must_use]
    pub fn builder() -> HoldingAreaBuilder {
        HoldingAreaBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> HoldingAreaId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the holding area.
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

    /// Point the holding area at its facility and room.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidContainment`] unless exactly
    /// `facility` and `room` are set.
    pub fn set_location(&mut self, location: Location) -> Result<(), ValidationError> {
        location.validate_for(ObjectKind::HoldingArea)?;
        self.location = location;
        Ok(())
    }

    pub(crate) fn detach(&mut self) {
        self.location = Location::unplaced();
    }

    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Location handed to a container placed here.
    #[must_use]
    pub fn child_location(&self) -> Location {
        Location {
            holding_area: Some(self.id),
            ..self.location
        }
    }

    /// Ids of the contained containers; never more than one.
    #[must_use]
    pub fn container_ids(&self) -> &BTreeSet<ContainerId> {
        &self.containers
    }

    /// The container held here, if any.
    #[must_use]
    pub fn container(&self) -> Option<ContainerId> {
        self.containers.first().copied()
    }

    /// Put `container` on this holding area.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AlreadyPlaced`] when the container sits on
    /// another holding area, or [`ValidationError::InvalidContainment`] when
    /// this holding area is not placed in a room yet.
    pub fn add_container(&mut self, container: &mut Container) -> Result<Placement, ValidationError> {
        if self.occupied {
            return Ok(Placement::AlreadyOccupied);
        }
        if !container.location().is_unplaced() {
            return Err(ValidationError::AlreadyPlaced {
                child: container.id().into(),
            });
        }
        container.set_location(self.child_location())?;
        self.take_in(container.id());
        Ok(Placement::Placed)
    }

    /// Empty the holding area, returning the container that was on it.
    pub fn remove_container(&mut self) -> Option<ContainerId> {
        let removed = self.container();
        self.containers.clear();
        self.occupied = false;
        removed
    }

    /// Take `container` off this holding area and reset its location.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when `container` is not the one held here.
    pub fn detach_container(&mut self, container: &mut Container) -> Result<(), NotFoundError> {
        if !self.containers.contains(&container.id()) {
            return Err(NotFoundError::object("Container", container.id()));
        }
        self.remove_container();
        container.detach();
        Ok(())
    }

    fn take_in(&mut self, container: ContainerId) {
        self.containers.insert(container);
        self.occupied = true;
    }

    fn log_change(&mut self, command: &Command, before: (BTreeSet<ContainerId>, bool)) {
        let (old_inventory, old_occupied) = before;
        self.history.append(
            command,
            ChangedField::ContainerInventory,
            FieldValue::ContainerInventory(old_inventory),
            FieldValue::ContainerInventory(self.containers.clone()),
        );
        self.history.append(
            command,
            ChangedField::OccupationStatus,
            FieldValue::Occupied(old_occupied),
            FieldValue::Occupied(self.occupied),
        );
    }

    fn apply_transport(
        &mut self,
        command: &Command,
        transport: &TransportCmd,
    ) -> Result<ActivationOutcome, DepotError> {
        let is_origin = transport.origin.holding_area == Some(self.id);
        let is_destination = transport.destination.holding_area == Some(self.id);
        if !is_origin && !is_destination {
            return Err(ValidationError::NotInvolved {
                object: self.id.into(),
                command: transport.id.into(),
            }
            .into());
        }

        let mut entries = 0;
        if is_origin && self.containers.contains(&transport.target) {
            let before = (self.containers.clone(), self.occupied);
            self.remove_container();
            self.log_change(command, before);
            entries += 2;
        }
        if is_destination {
            if self.occupied {
                return Ok(ActivationOutcome::Skipped(Diagnostic::AlreadyOccupied {
                    holding_area: self.id.into(),
                }));
            }
            let before = (self.containers.clone(), self.occupied);
            self.take_in(transport.target);
            self.log_change(command, before);
            entries += 2;
        }
        Ok(ActivationOutcome::Applied { entries })
    }
}

impl Apply for HoldingArea {
    fn apply(&mut self, command: &Command) -> Result<ActivationOutcome, DepotError> {
        match command {
            Command::Transport(transport) => self.apply_transport(command, transport),
        }
    }
}

impl HistoryCarrying for HoldingArea {
    fn object_id(&self) -> ObjectId {
        self.id.into()
    }

    fn object_kind(&self) -> ObjectKind {
        ObjectKind::HoldingArea
    }

    fn init_time(&self) -> Timestamp {
        self.init_time
    }

    fn history(&self) -> &History {
        &self.history
    }
}

/// Step-by-step builder for [`HoldingArea`]. The area starts unplaced and
/// empty.
#[derive(Debug, Default)]
pub struct HoldingAreaBuilder {
    name: Option<String>,
    position: Option<Position>,
}

impl HoldingAreaBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Consume the builder, validate, and return a [`HoldingArea`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if `name` is missing or empty.
    pub fn build(self, id: HoldingAreaId, init_time: Timestamp) -> Result<HoldingArea, ValidationError> {
        let name = self.name.unwrap_or_default();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(HoldingArea {
            id,
            init_time,
            name,
            position: self.position.unwrap_or_default(),
            location: Location::unplaced(),
            occupied: false,
            containers: BTreeSet::new(),
            history: History::new(),
        })
    }
}

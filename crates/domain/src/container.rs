//! Container: the leaf of the containment tree and the target of transports.

use serde::{Deserialize, Serialize};

use crate::activation::sealed::Apply;
use crate::activation::{ActivationOutcome, HistoryCarrying};
use crate::command::Command;
use crate::error::{DepotError, ValidationError};
use crate::history::{ChangedField, FieldValue, History};
use crate::id::{ContainerId, ObjectId, ObjectKind};
use crate::location::Location;
use crate::time::Timestamp;
use crate::units::Dimensions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    id: ContainerId,
    init_time: Timestamp,
    kind: String,
    name: String,
    dimensions: Dimensions,
    location: Location,
    history: History,
}

impl Container {
    /// Create a builder for constructing a [`Container`].
    #[must_use]
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> ContainerId {
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

    /// Rename the container.
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
    pub fn location(&self) -> Location {
        self.location
    }

    /// Place the container on a holding area.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidContainment`] unless all three
    /// location fields are set.
    pub fn set_location(&mut self, location: Location) -> Result<(), ValidationError> {
        location.validate_for(ObjectKind::Container)?;
        self.location = location;
        Ok(())
    }

    pub(crate) fn detach(&mut self) {
        self.location = Location::unplaced();
    }
}

impl Apply for Container {
    fn apply(&mut self, command: &Command) -> Result<ActivationOutcome, DepotError> {
        match command {
            Command::Transport(transport) => {
                if transport.target != self.id {
                    return Err(ValidationError::NotInvolved {
                        object: self.id.into(),
                        command: transport.id.into(),
                    }
                    .into());
                }
                let old = self.location;
                self.set_location(transport.destination)?;
                self.history.append(
                    command,
                    ChangedField::Location,
                    FieldValue::Location(old),
                    FieldValue::Location(self.location),
                );
                Ok(ActivationOutcome::Applied { entries: 1 })
            }
        }
    }
}

impl HistoryCarrying for Container {
    fn object_id(&self) -> ObjectId {
        self.id.into()
    }

    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Container
    }

    fn init_time(&self) -> Timestamp {
        self.init_time
    }

    fn history(&self) -> &History {
        &self.history
    }
}

/// Step-by-step builder for [`Container`]. The container starts unplaced.
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    kind: Option<String>,
    name: Option<String>,
    dimensions: Option<Dimensions>,
}

impl ContainerBuilder {
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

    /// Consume the builder, validate, and return a [`Container`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if `name` is missing or empty,
    /// and [`ValidationError::MissingField`] if no dimensions were given.
    pub fn build(self, id: ContainerId, init_time: Timestamp) -> Result<Container, ValidationError> {
        let name = self.name.unwrap_or_default();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let dimensions = self
            .dimensions
            .ok_or(ValidationError::MissingField { field: "dimensions" })?;
        Ok(Container {
            id,
            init_time,
            kind: self.kind.unwrap_or_default(),
            name,
            dimensions,
            location: Location::unplaced(),
            history: History::new(),
        })
    }
}

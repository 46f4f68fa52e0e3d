//! Location: back-references from an object to its ancestors.
//!
//! A location never owns anything: it stores ancestor ids which are resolved
//! through the registry when needed. How many fields are set depends on the
//! level of the object holding it (see [`Location::validate_for`]).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{FacilityId, HoldingAreaId, ObjectKind, RoomId};

/// Position of an object in the containment tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub facility: Option<FacilityId>,
    pub room: Option<RoomId>,
    pub holding_area: Option<HoldingAreaId>,
}

impl Location {
    /// A location with no ancestor set, held by objects not yet placed.
    #[must_use]
    pub const fn unplaced() -> Self {
        Self {
            facility: None,
            room: None,
            holding_area: None,
        }
    }

    /// Location of a room inside `facility`.
    #[must_use]
    pub const fn in_facility(facility: FacilityId) -> Self {
        Self {
            facility: Some(facility),
            room: None,
            holding_area: None,
        }
    }

    /// Location of a holding area inside `room` of `facility`.
    #[must_use]
    pub const fn in_room(facility: FacilityId, room: RoomId) -> Self {
        Self {
            facility: Some(facility),
            room: Some(room),
            holding_area: None,
        }
    }

    /// Location of a container placed on `holding_area`.
    #[must_use]
    pub const fn in_holding_area(
        facility: FacilityId,
        room: RoomId,
        holding_area: HoldingAreaId,
    ) -> Self {
        Self {
            facility: Some(facility),
            room: Some(room),
            holding_area: Some(holding_area),
        }
    }

    /// Whether no ancestor is set.
    #[must_use]
    pub fn is_unplaced(&self) -> bool {
        *self == Self::unplaced()
    }

    /// Whether all three ancestors are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.facility.is_some() && self.room.is_some() && self.holding_area.is_some()
    }

    /// Check that this location has the shape required for an object of
    /// `level`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidContainment`] when:
    /// - a room location does not have exactly `facility` set
    /// - a holding-area location does not have exactly `facility` and `room` set
    /// - a container location is missing any of the three fields
    /// - `level` is a facility or a command, which are never contained
    pub fn validate_for(&self, level: ObjectKind) -> Result<(), ValidationError> {
        let invalid = |reason| ValidationError::InvalidContainment { level, reason };
        match level {
            ObjectKind::Room => {
                if self.facility.is_none() {
                    return Err(invalid("facility must be set"));
                }
                if self.room.is_some() || self.holding_area.is_some() {
                    return Err(invalid("room and holding area must not be set"));
                }
            }
            ObjectKind::HoldingArea => {
                if self.facility.is_none() || self.room.is_none() {
                    return Err(invalid("facility and room must be set"));
                }
                if self.holding_area.is_some() {
                    return Err(invalid("holding area must not be set"));
                }
            }
            ObjectKind::Container => {
                if !self.is_complete() {
                    return Err(invalid("facility, room and holding area must be set"));
                }
            }
            ObjectKind::Facility | ObjectKind::Command => {
                return Err(invalid("object cannot be contained"));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn part<T: std::fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "-".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "facility={} room={} holding_area={}",
            part(self.facility),
            part(self.room),
            part(self.holding_area)
        )
    }
}

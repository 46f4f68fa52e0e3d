//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`DepotError`]
//! via `#[from]`. Diagnostics such as "inventory empty" are not errors and
//! never appear here.

use crate::id::{CommanderId, ObjectId, ObjectKind};

/// Top-level error returned by domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum DepotError {
    /// A lookup by id or by type found nothing.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A containment assignment or command request is malformed.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// An activation was attempted outside an authorization window.
    #[error("permission denied")]
    Permission(#[from] PermissionError),

    /// A snapshot adapter failed (malformed input, IO, serialization).
    #[error("snapshot error")]
    Snapshot(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A lookup did not yield any object.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of object that was looked up (`"Room"`, `"Container"`, …).
    pub entity: &'static str,
    /// Identifier or type name used for the lookup.
    pub id: String,
}

impl NotFoundError {
    /// Build a not-found error for an identifier.
    #[must_use]
    pub fn object(entity: &'static str, id: impl Into<ObjectId>) -> Self {
        Self {
            entity,
            id: id.into().to_string(),
        }
    }
}

/// Eagerly detected invalid input. Raised before any state is mutated.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("missing required field {field}")]
    MissingField { field: &'static str },

    #[error("dimension {axis} must be positive and finite, got {value}")]
    NonPositiveDimension { axis: &'static str, value: f64 },

    #[error("invalid containment for {level}: {reason}")]
    InvalidContainment { level: ObjectKind, reason: &'static str },

    #[error("object {child} is already placed; remove it from its parent first")]
    AlreadyPlaced { child: ObjectId },

    #[error("object {parent} still holds children; empty it before removing it")]
    NotEmpty { parent: ObjectId },

    #[error("origin mismatch")]
    OriginMismatch,

    #[error("incomplete destination")]
    IncompleteDestination,

    #[error("invalid timestamp {0:?}, expected YYYY:MM:DD.hh:mm")]
    InvalidTimestamp(String),

    #[error("command has no start or end time")]
    MissingTimeSpan,

    #[error("command ends before it starts")]
    EndBeforeStart,

    #[error("simulated time out of range")]
    TimeOutOfRange,

    #[error("object {object} is not involved in command {command}")]
    NotInvolved { object: ObjectId, command: ObjectId },

    #[error("{level} objects cannot be activated")]
    NotActivatable { level: ObjectKind },
}

/// An activation was attempted by a caller that is not the currently
/// authorized commander.
#[derive(Debug, thiserror::Error)]
#[error("activation requires the authorized commander, {caller} is not authorized")]
pub struct PermissionError {
    pub caller: CommanderId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::RoomId;

    #[test]
    fn should_format_not_found_with_entity_and_id() {
        let err = NotFoundError::object("Room", RoomId::from_raw(4));
        assert_eq!(err.to_string(), "Room 4 not found");
    }

    #[test]
    fn should_convert_validation_error_into_depot_error() {
        let err: DepotError = ValidationError::OriginMismatch.into();
        assert!(matches!(
            err,
            DepotError::Validation(ValidationError::OriginMismatch)
        ));
    }

    #[test]
    fn should_describe_containment_level() {
        let err = ValidationError::InvalidContainment {
            level: ObjectKind::Room,
            reason: "room must not be set",
        };
        assert_eq!(
            err.to_string(),
            "invalid containment for Room: room must not be set"
        );
    }

    #[test]
    fn should_keep_source_of_snapshot_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = DepotError::Snapshot(Box::new(io));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "gone");
    }
}

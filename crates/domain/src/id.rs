//! Typed identifier newtypes backed by the registry's integer counter.
//!
//! Every identified object draws from a single counter, so a [`RoomId`] and a
//! [`ContainerId`] never share a value. The typed wrappers exist so that a
//! [`Location`](crate::location::Location) cannot hold a room where a facility
//! is expected; all of them convert losslessly into the untyped [`ObjectId`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw counter value.
            #[must_use]
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// Access the raw counter value.
            #[must_use]
            pub const fn as_raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

macro_rules! define_typed_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        define_id!($(#[doc = $doc])* $name);

        impl From<$name> for ObjectId {
            fn from(id: $name) -> Self {
                ObjectId(id.0)
            }
        }

        impl From<ObjectId> for $name {
            fn from(id: ObjectId) -> Self {
                Self(id.0)
            }
        }
    };
}

define_id!(
    /// Untyped identifier of any object held by the [`Registry`](crate::registry::Registry).
    ObjectId
);

define_typed_id!(
    /// Unique identifier for a [`Facility`](crate::facility::Facility).
    FacilityId
);

define_typed_id!(
    /// Unique identifier for a [`Room`](crate::room::Room).
    RoomId
);

define_typed_id!(
    /// Unique identifier for a [`HoldingArea`](crate::holding_area::HoldingArea).
    HoldingAreaId
);

define_typed_id!(
    /// Unique identifier for a [`Container`](crate::container::Container).
    ContainerId
);

define_typed_id!(
    /// Unique identifier for a [`Command`](crate::command::Command).
    CommandId
);

/// Identity of a commander allowed to open an authorization window.
///
/// Commanders are not registry objects, so their ids come from a separate
/// counter owned by the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommanderId(u64);

impl CommanderId {
    /// Wrap a raw counter value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CommanderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "commander#{}", self.0)
    }
}

/// Concrete type of a registered object.
///
/// The variant order is alphabetical by [`type_name`](Self::type_name), which
/// is the tie-breaker used when ordering merged history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Command,
    Container,
    Facility,
    HoldingArea,
    Room,
}

impl ObjectKind {
    /// Name of the type, as used for display and ordering.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Command => "Command",
            Self::Container => "Container",
            Self::Facility => "Facility",
            Self::HoldingArea => "HoldingArea",
            Self::Room => "Room",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_through_display_and_from_str() {
        let id = RoomId::from_raw(42);
        let text = id.to_string();
        let parsed: RoomId = text.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_serialize_as_plain_integer() {
        let id = ContainerId::from_raw(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let parsed: ContainerId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn should_return_error_when_parsing_non_numeric_id() {
        let result = FacilityId::from_str("not-a-number");
        assert!(result.is_err());
    }

    #[test]
    fn should_preserve_raw_value_when_converting_to_object_id() {
        let id = HoldingAreaId::from_raw(3);
        let object: ObjectId = id.into();
        assert_eq!(object.as_raw(), 3);
        assert_eq!(HoldingAreaId::from(object), id);
    }

    #[test]
    fn should_order_kinds_alphabetically_by_type_name() {
        let mut kinds = vec![
            ObjectKind::Room,
            ObjectKind::Facility,
            ObjectKind::HoldingArea,
            ObjectKind::Container,
        ];
        kinds.sort();
        let names: Vec<_> = kinds.iter().map(|k| k.type_name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn should_order_by_raw_value() {
        assert!(CommandId::from_raw(1) < CommandId::from_raw(2));
    }
}

//! Identity registry: owns every identified object and hands out ids.
//!
//! Ids come from one counter starting at 0 and are never reused. Objects are
//! never removed either, so the id doubles as the object's index in the
//! backing vector and parent/child pairs can be borrowed mutably together.

use std::collections::BTreeMap;

use crate::activation::{ActivationOutcome, Authority, HistoryCarrying};
use crate::command::Command;
use crate::container::Container;
use crate::error::{DepotError, NotFoundError, ValidationError};
use crate::facility::Facility;
use crate::holding_area::HoldingArea;
use crate::id::{
    CommandId, CommanderId, ContainerId, FacilityId, HoldingAreaId, ObjectId, ObjectKind, RoomId,
};
use crate::room::Room;

/// Any object stored in the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Facility(Facility),
    Room(Room),
    HoldingArea(HoldingArea),
    Container(Container),
    Command(Command),
}

impl Object {
    #[must_use]
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Facility(facility) => facility.id().into(),
            Self::Room(room) => room.id().into(),
            Self::HoldingArea(area) => area.id().into(),
            Self::Container(container) => container.id().into(),
            Self::Command(command) => command.id().into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Facility(_) => ObjectKind::Facility,
            Self::Room(_) => ObjectKind::Room,
            Self::HoldingArea(_) => ObjectKind::HoldingArea,
            Self::Container(_) => ObjectKind::Container,
            Self::Command(_) => ObjectKind::Command,
        }
    }

    /// Dispatch [`HistoryCarrying::activate`] to the wrapped object.
    ///
    /// # Errors
    ///
    /// Commands cannot be activated and yield
    /// [`ValidationError::NotActivatable`]; other errors come from the
    /// object's own activation.
    pub fn activate(
        &mut self,
        command: &Command,
        caller: CommanderId,
        authority: &Authority,
    ) -> Result<ActivationOutcome, DepotError> {
        match self {
            Self::Facility(facility) => facility.activate(command, caller, authority),
            Self::Room(room) => room.activate(command, caller, authority),
            Self::HoldingArea(area) => area.activate(command, caller, authority),
            Self::Container(container) => container.activate(command, caller, authority),
            Self::Command(_) => Err(ValidationError::NotActivatable {
                level: ObjectKind::Command,
            }
            .into()),
        }
    }
}

macro_rules! object_accessors {
    ($variant:ident, $ty:ty, $as_ref:ident) => {
        impl Object {
            #[must_use]
            pub fn $as_ref(&self) -> Option<&$ty> {
                match self {
                    Self::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
    ($variant:ident, $ty:ty, $as_ref:ident, $as_mut:ident) => {
        object_accessors!($variant, $ty, $as_ref);

        impl Object {
            pub fn $as_mut(&mut self) -> Option<&mut $ty> {
                match self {
                    Self::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

object_accessors!(Facility, Facility, as_facility, as_facility_mut);
object_accessors!(Room, Room, as_room, as_room_mut);
object_accessors!(HoldingArea, HoldingArea, as_holding_area, as_holding_area_mut);
object_accessors!(Container, Container, as_container, as_container_mut);
// Commands are immutable once registered.
object_accessors!(Command, Command, as_command);

/// Id-indexed store of every object in one model.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    objects: Vec<Object>,
}

macro_rules! typed_lookup {
    ($id:ty, $ty:ty, $entity:literal, $get:ident, $as_ref:ident) => {
        #[doc = concat!("Look up a ", $entity, " by id.")]
        ///
        /// # Errors
        ///
        /// Returns [`NotFoundError`] if the id is unused or names another
        /// kind of object.
        pub fn $get(&self, id: $id) -> Result<&$ty, NotFoundError> {
            self.lookup(id.into())
                .ok()
                .and_then(Object::$as_ref)
                .ok_or_else(|| NotFoundError::object($entity, id))
        }
    };
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next successful registration will receive.
    #[must_use]
    pub fn next_id(&self) -> ObjectId {
        ObjectId::from_raw(self.objects.len() as u64)
    }

    /// Number of registered objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Build an object under the next id and store it.
    ///
    /// `make` receives the id the object must carry. The id is consumed only
    /// when `make` succeeds, so a rejected builder leaves no gap.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `make`.
    pub fn register<E>(
        &mut self,
        make: impl FnOnce(ObjectId) -> Result<Object, E>,
    ) -> Result<ObjectId, E> {
        let id = self.next_id();
        let object = make(id)?;
        debug_assert_eq!(object.id(), id, "object must carry the id it was built with");
        self.objects.push(object);
        Ok(id)
    }

    fn index(&self, id: ObjectId) -> Option<usize> {
        usize::try_from(id.as_raw())
            .ok()
            .filter(|index| *index < self.objects.len())
    }

    /// Look up any object by id.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if no object was registered under `id`.
    pub fn lookup(&self, id: ObjectId) -> Result<&Object, NotFoundError> {
        self.index(id)
            .and_then(|index| self.objects.get(index))
            .ok_or_else(|| NotFoundError::object("Object", id))
    }

    /// Look up any object by id for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if no object was registered under `id`.
    pub fn lookup_mut(&mut self, id: ObjectId) -> Result<&mut Object, NotFoundError> {
        match self.index(id) {
            Some(index) => Ok(&mut self.objects[index]),
            None => Err(NotFoundError::object("Object", id)),
        }
    }

    /// All objects of `kind`, keyed by id.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no object of that kind exists; an
    /// empty result is never returned.
    pub fn lookup_by_type(&self, kind: ObjectKind) -> Result<BTreeMap<ObjectId, &Object>, NotFoundError> {
        let found: BTreeMap<_, _> = self
            .list_all()
            .filter(|(_, object)| object.kind() == kind)
            .collect();
        if found.is_empty() {
            return Err(NotFoundError {
                entity: "objects of type",
                id: kind.type_name().to_string(),
            });
        }
        Ok(found)
    }

    /// Every registered object in id order.
    pub fn list_all(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects.iter().map(|object| (object.id(), object))
    }

    typed_lookup!(FacilityId, Facility, "Facility", facility, as_facility);
    typed_lookup!(RoomId, Room, "Room", room, as_room);
    typed_lookup!(HoldingAreaId, HoldingArea, "HoldingArea", holding_area, as_holding_area);
    typed_lookup!(ContainerId, Container, "Container", container, as_container);
    typed_lookup!(CommandId, Command, "Command", command, as_command);

    /// Borrow two distinct objects mutably at once.
    fn pair_mut(&mut self, first: usize, second: usize) -> Option<(&mut Object, &mut Object)> {
        use std::cmp::Ordering;

        match first.cmp(&second) {
            Ordering::Less => {
                let (head, tail) = self.objects.split_at_mut(second);
                Some((&mut head[first], &mut tail[0]))
            }
            Ordering::Greater => {
                let (head, tail) = self.objects.split_at_mut(first);
                Some((&mut tail[0], &mut head[second]))
            }
            Ordering::Equal => None,
        }
    }

    fn typed_pair_mut<P, C>(
        &mut self,
        parent: (ObjectId, &'static str, fn(&mut Object) -> Option<&mut P>),
        child: (ObjectId, &'static str, fn(&mut Object) -> Option<&mut C>),
    ) -> Result<(&mut P, &mut C), NotFoundError> {
        let (parent_id, parent_entity, as_parent) = parent;
        let (child_id, child_entity, as_child) = child;
        let parent_index = self
            .index(parent_id)
            .ok_or_else(|| NotFoundError::object(parent_entity, parent_id))?;
        let child_index = self
            .index(child_id)
            .ok_or_else(|| NotFoundError::object(child_entity, child_id))?;
        let (parent_object, child_object) = self
            .pair_mut(parent_index, child_index)
            .ok_or_else(|| NotFoundError::object(child_entity, child_id))?;
        let parent = as_parent(parent_object).ok_or_else(|| NotFoundError::object(parent_entity, parent_id))?;
        let child = as_child(child_object).ok_or_else(|| NotFoundError::object(child_entity, child_id))?;
        Ok((parent, child))
    }

    /// Borrow a facility and a room together.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if either id does not name an object of the
    /// expected kind.
    pub fn facility_and_room_mut(
        &mut self,
        facility: FacilityId,
        room: RoomId,
    ) -> Result<(&mut Facility, &mut Room), NotFoundError> {
        self.typed_pair_mut(
            (facility.into(), "Facility", Object::as_facility_mut),
            (room.into(), "Room", Object::as_room_mut),
        )
    }

    /// Borrow a room and a holding area together.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if either id does not name an object of the
    /// expected kind.
    pub fn room_and_holding_area_mut(
        &mut self,
        room: RoomId,
        holding_area: HoldingAreaId,
    ) -> Result<(&mut Room, &mut HoldingArea), NotFoundError> {
        self.typed_pair_mut(
            (room.into(), "Room", Object::as_room_mut),
            (holding_area.into(), "HoldingArea", Object::as_holding_area_mut),
        )
    }

    /// Borrow a holding area and a container together.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if either id does not name an object of the
    /// expected kind.
    pub fn holding_area_and_container_mut(
        &mut self,
        holding_area: HoldingAreaId,
        container: ContainerId,
    ) -> Result<(&mut HoldingArea, &mut Container), NotFoundError> {
        self.typed_pair_mut(
            (holding_area.into(), "HoldingArea", Object::as_holding_area_mut),
            (container.into(), "Container", Object::as_container_mut),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::epoch;
    use crate::units::Dimensions;

    fn register_facility(registry: &mut Registry, name: &str) -> Result<ObjectId, ValidationError> {
        registry.register(|id| {
            Facility::builder()
                .name(name)
                .dimensions(Dimensions::new(1.0, 1.0, 1.0).unwrap())
                .build(id.into(), epoch())
                .map(Object::Facility)
        })
    }

    fn register_room(registry: &mut Registry) -> ObjectId {
        registry
            .register(|id| {
                Room::builder()
                    .name("Room")
                    .dimensions(Dimensions::new(1.0, 1.0, 1.0).unwrap())
                    .build(id.into(), epoch())
                    .map(Object::Room)
            })
            .unwrap()
    }

    #[test]
    fn should_assign_strictly_increasing_ids_from_zero() {
        let mut registry = Registry::new();
        let ids: Vec<_> = (0..5)
            .map(|n| register_facility(&mut registry, &format!("F{n}")).unwrap())
            .collect();
        let raw: Vec<_> = ids.iter().map(|id| id.as_raw()).collect();
        assert_eq!(raw, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn should_not_consume_id_when_build_fails() {
        let mut registry = Registry::new();
        assert!(register_facility(&mut registry, "").is_err());
        let id = register_facility(&mut registry, "F").unwrap();
        assert_eq!(id, ObjectId::from_raw(0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn should_return_not_found_for_unused_id() {
        let registry = Registry::new();
        let err = registry.lookup(ObjectId::from_raw(3)).unwrap_err();
        assert_eq!(err.entity, "Object");
        assert_eq!(err.id, "3");
    }

    #[test]
    fn should_fail_lookup_by_type_when_empty() {
        let mut registry = Registry::new();
        register_facility(&mut registry, "F").unwrap();

        let err = registry.lookup_by_type(ObjectKind::Container).unwrap_err();
        assert_eq!(err.id, "Container");

        let facilities = registry.lookup_by_type(ObjectKind::Facility).unwrap();
        assert_eq!(facilities.len(), 1);
    }

    #[test]
    fn should_reject_typed_lookup_of_other_kind() {
        let mut registry = Registry::new();
        let id = register_facility(&mut registry, "F").unwrap();
        assert!(registry.facility(id.into()).is_ok());
        assert!(registry.room(id.into()).is_err());
    }

    #[test]
    fn should_borrow_parent_and_child_together() {
        let mut registry = Registry::new();
        let facility = register_facility(&mut registry, "F").unwrap();
        let room = register_room(&mut registry);

        let (facility, room) = registry
            .facility_and_room_mut(facility.into(), room.into())
            .unwrap();
        facility.add_room(room).unwrap();

        let room = registry.room(RoomId::from_raw(1)).unwrap();
        assert_eq!(room.location().facility, Some(FacilityId::from_raw(0)));
    }

    #[test]
    fn should_refuse_pair_with_wrong_kinds() {
        let mut registry = Registry::new();
        let facility = register_facility(&mut registry, "F").unwrap();
        let other = register_facility(&mut registry, "G").unwrap();
        let result = registry.facility_and_room_mut(facility.into(), other.into());
        assert!(result.is_err());
    }

    #[test]
    fn should_list_every_object_in_id_order() {
        let mut registry = Registry::new();
        register_facility(&mut registry, "F").unwrap();
        register_room(&mut registry);
        let kinds: Vec<_> = registry.list_all().map(|(_, object)| object.kind()).collect();
        assert_eq!(kinds, vec![ObjectKind::Facility, ObjectKind::Room]);
    }
}

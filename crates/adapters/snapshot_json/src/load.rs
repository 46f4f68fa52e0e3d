//! Build a [`World`] from a snapshot document.
//!
//! The clock is set first so every object is stamped with the snapshot
//! time. Objects are then created strictly parent-before-child, each one
//! attached to its parent right after it is built.

use serde::de::DeserializeOwned;
use serde_json::Value;

use depot_app::world::World;
use depot_domain::container::Container;
use depot_domain::error::DepotError;
use depot_domain::facility::Facility;
use depot_domain::holding_area::HoldingArea;
use depot_domain::id::{FacilityId, HoldingAreaId, RoomId};
use depot_domain::room::Room;

use crate::error::SnapshotError;
use crate::model::{
    ContainerDoc, FacilityDoc, HoldingAreaDoc, RoomDoc, Section, TIME_KEY, TimeDoc,
};

/// Parse `text` and build a world from it.
///
/// # Errors
///
/// See [`load_document`].
pub fn load_str(text: &str) -> Result<World, SnapshotError> {
    let document: Section = serde_json::from_str(text)?;
    load_document(&document)
}

/// Build a world from a parsed snapshot document.
///
/// # Errors
///
/// Returns [`SnapshotError::MissingSection`] when the document has no
/// facility or a facility has no rooms, [`SnapshotError::Json`] when a
/// section has the wrong shape, and [`SnapshotError::Domain`] when the model
/// rejects an object. A failure aborts the whole build.
#[tracing::instrument(skip_all, fields(sections = document.len()))]
pub fn load_document(document: &Section) -> Result<World, SnapshotError> {
    let facilities: Vec<_> = document
        .iter()
        .filter(|(key, _)| key.as_str() != TIME_KEY)
        .collect();
    if facilities.is_empty() {
        return Err(SnapshotError::missing("facility"));
    }

    let mut world = World::new();
    if let Some(time) = document.get(TIME_KEY) {
        let time: TimeDoc = section(time)?;
        world.set_time(time.timestamp().map_err(DepotError::from)?);
    }

    for (key, value) in facilities {
        load_facility(&mut world, key, section(value)?)?;
    }

    tracing::info!(objects = world.registry().len(), "snapshot loaded");
    Ok(world)
}

fn section<T: DeserializeOwned>(value: &Value) -> Result<T, SnapshotError> {
    Ok(T::deserialize(value)?)
}

fn load_facility(world: &mut World, key: &str, doc: FacilityDoc) -> Result<FacilityId, SnapshotError> {
    let rooms = doc
        .rooms
        .filter(|rooms| !rooms.is_empty())
        .ok_or_else(|| SnapshotError::missing(format!("{key}.rooms")))?;

    let facility = world.create_facility(
        Facility::builder()
            .kind(doc.kind)
            .name(doc.name)
            .dimensions(doc.dimensions)
            .position(doc.position),
    )?;
    tracing::debug!(%facility, key, "facility built");

    for value in rooms.values() {
        load_room(world, facility, section(value)?)?;
    }
    Ok(facility)
}

fn load_room(world: &mut World, facility: FacilityId, doc: RoomDoc) -> Result<RoomId, SnapshotError> {
    let room = world.create_room(
        Room::builder()
            .kind(doc.kind)
            .name(doc.name)
            .dimensions(doc.dimensions)
            .position(doc.position),
    )?;
    // Holding areas need the room to be placed first.
    world.add_room(facility, room)?;
    for value in doc.holding_areas.iter().flat_map(|areas| areas.values()) {
        load_holding_area(world, room, section(value)?)?;
    }
    Ok(room)
}

fn load_holding_area(world: &mut World, room: RoomId, doc: HoldingAreaDoc) -> Result<HoldingAreaId, SnapshotError> {
    let area = world.create_holding_area(
        HoldingArea::builder()
            .name(doc.name)
            .position(doc.position),
    )?;
    world.add_holding_area(room, area)?;
    if let Some(container) = doc.container {
        load_container(world, area, container)?;
    }
    Ok(area)
}

fn load_container(world: &mut World, area: HoldingAreaId, doc: ContainerDoc) -> Result<(), SnapshotError> {
    let container = world.create_container(
        Container::builder()
            .kind(doc.kind)
            .name(doc.name)
            .dimensions(doc.dimensions),
    )?;
    world.add_container(area, container)?;
    Ok(())
}

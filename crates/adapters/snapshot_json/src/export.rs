//! Write a [`World`] back into the snapshot layout.
//!
//! Only the tree and the clock are exported. Histories and commands are
//! runtime state and do not round-trip. Sections are keyed
//! `"facility n"`, `"room n"`, `"holding_area n"` with `n` counting from 1
//! inside each parent.

use serde::Serialize;
use serde_json::Value;

use depot_app::world::World;
use depot_domain::error::DepotError;
use depot_domain::id::{FacilityId, HoldingAreaId, ObjectKind, RoomId};

use crate::error::SnapshotError;
use crate::model::{
    ContainerDoc, FacilityDoc, HoldingAreaDoc, RoomDoc, Section, TIME_KEY, TimeDoc,
};

/// Build the snapshot document of `world`.
///
/// # Errors
///
/// Returns [`SnapshotError::Domain`] when the world holds no facility or
/// the tree references an unknown object, and
/// [`SnapshotError::MissingSection`] when a facility has no room, since
/// such a document could not be loaded back.
#[tracing::instrument(skip_all)]
pub fn export_document(world: &World) -> Result<Section, SnapshotError> {
    let mut document = Section::new();
    document.insert(TIME_KEY.to_owned(), to_value(TimeDoc::from(world.now()))?);

    let facilities = world
        .registry()
        .lookup_by_type(ObjectKind::Facility)
        .map_err(DepotError::from)?;
    for (n, id) in facilities.into_keys().enumerate() {
        let key = format!("facility {}", n + 1);
        let doc = facility_doc(world, FacilityId::from(id), &key)?;
        document.insert(key, to_value(doc)?);
    }

    tracing::debug!(sections = document.len(), "snapshot exported");
    Ok(document)
}

/// Pretty-printed JSON text of [`export_document`].
///
/// # Errors
///
/// Same as [`export_document`].
pub fn export_string(world: &World) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(&export_document(world)?)?)
}

fn to_value<T: Serialize>(doc: T) -> Result<Value, SnapshotError> {
    Ok(serde_json::to_value(doc)?)
}

fn facility_doc(world: &World, id: FacilityId, key: &str) -> Result<FacilityDoc, SnapshotError> {
    let facility = world.registry().facility(id).map_err(DepotError::from)?;
    let mut rooms = Section::new();
    for (n, room) in world.room_inventory(id)?.into_keys().enumerate() {
        rooms.insert(format!("room {}", n + 1), to_value(room_doc(world, room)?)?);
    }
    if rooms.is_empty() {
        return Err(SnapshotError::missing(format!("{key}.rooms")));
    }
    Ok(FacilityDoc {
        kind: facility.kind().to_owned(),
        name: facility.name().to_owned(),
        dimensions: facility.dimensions(),
        position: facility.position(),
        rooms: Some(rooms),
    })
}

fn room_doc(world: &World, id: RoomId) -> Result<RoomDoc, SnapshotError> {
    let room = world.registry().room(id).map_err(DepotError::from)?;
    let mut areas = Section::new();
    for (n, area) in world.holding_area_inventory(id)?.into_keys().enumerate() {
        areas.insert(
            format!("holding_area {}", n + 1),
            to_value(holding_area_doc(world, area)?)?,
        );
    }
    Ok(RoomDoc {
        kind: room.kind().to_owned(),
        name: room.name().to_owned(),
        dimensions: room.dimensions(),
        position: room.position(),
        holding_areas: (!areas.is_empty()).then_some(areas),
    })
}

fn holding_area_doc(world: &World, id: HoldingAreaId) -> Result<HoldingAreaDoc, SnapshotError> {
    let area = world.registry().holding_area(id).map_err(DepotError::from)?;
    let container = world.contained_container(id)?.map(|container| ContainerDoc {
        kind: container.kind().to_owned(),
        name: container.name().to_owned(),
        dimensions: container.dimensions(),
    });
    Ok(HoldingAreaDoc {
        name: area.name().to_owned(),
        position: area.position(),
        container,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::load_str;
    use depot_domain::facility::Facility;
    use depot_domain::room::Room;
    use depot_domain::time::parse_timestamp;
    use depot_domain::units::Dimensions;

    const MODEL: &str = r#"{
        "time": {"year": "2024", "month": "05", "day": "01", "hour": "12", "minute": "30"},
        "facility 1": {
            "type": "Storage", "name": "North",
            "dimensions": {"dx": 30.0, "dy": 20.0, "dz": 8.0},
            "position": {"x": 0.0, "y": 0.0, "z": 0.0},
            "rooms": {
                "room 1": {
                    "type": "Hall", "name": "Hall A",
                    "dimensions": {"dx": 10.0, "dy": 10.0, "dz": 5.0},
                    "position": {"x": 1.0, "y": 0.0, "z": 0.0},
                    "holdingAreas": {
                        "holdingArea 1": {
                            "name": "Slot 1",
                            "position": {"x": 1.0, "y": 1.0, "z": 0.0},
                            "container": {"type": "Castor", "name": "C-1", "dimensions": {"dx": 1.0, "dy": 1.0, "dz": 2.0}}
                        },
                        "holdingArea 2": {"name": "Slot 2", "position": {"x": 3.0, "y": 1.0, "z": 0.0}}
                    }
                }
            }
        },
        "facility 2": {
            "type": "Storage", "name": "South",
            "dimensions": {"dx": 15.0, "dy": 15.0, "dz": 6.0},
            "rooms": {
                "room 1": {"type": "Hall", "name": "Hall B", "dimensions": {"dx": 5.0, "dy": 5.0, "dz": 5.0}}
            }
        }
    }"#;

    #[test]
    fn should_export_tree_with_canonical_keys() {
        let world = load_str(MODEL).unwrap();

        let document = export_document(&world).unwrap();

        let keys: Vec<_> = document.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["time", "facility 1", "facility 2"]);
        let area = &document["facility 1"]["rooms"]["room 1"]["holding_areas"]["holding_area 1"];
        assert_eq!(area["name"], "Slot 1");
        assert_eq!(area["container"]["type"], "Castor");
        assert_eq!(area["container"]["dimensions"]["dz"], 2.0);
        assert!(
            document["facility 1"]["rooms"]["room 1"]["holding_areas"]["holding_area 2"]
                .get("container")
                .is_none()
        );
    }

    #[test]
    fn should_omit_holding_areas_of_empty_rooms() {
        let world = load_str(MODEL).unwrap();

        let document = export_document(&world).unwrap();

        assert!(
            document["facility 2"]["rooms"]["room 1"]
                .get("holding_areas")
                .is_none()
        );
    }

    #[test]
    fn should_export_clock_as_time_block() {
        let world = load_str(MODEL).unwrap();

        let document = export_document(&world).unwrap();

        assert_eq!(document["time"]["month"], "05");
        assert_eq!(document["time"]["minute"], "30");
    }

    #[test]
    fn should_rebuild_same_tree_from_export() {
        let world = load_str(MODEL).unwrap();
        let text = export_string(&world).unwrap();

        let reloaded = load_str(&text).unwrap();

        assert_eq!(reloaded.now(), world.now());
        assert_eq!(
            export_document(&reloaded).unwrap(),
            export_document(&world).unwrap()
        );
    }

    #[test]
    fn should_fail_to_export_world_without_facility() {
        let world = World::new();
        assert!(matches!(
            export_document(&world),
            Err(SnapshotError::Domain(DepotError::NotFound(_)))
        ));
    }

    #[test]
    fn should_refuse_to_export_facility_without_rooms() {
        let mut world = World::starting_at(parse_timestamp("2024:01:01.00:00").unwrap());
        let unit = Dimensions::new(1.0, 1.0, 1.0).unwrap();
        let facility = world
            .create_facility(Facility::builder().name("F").dimensions(unit))
            .unwrap();
        let room = world
            .create_room(Room::builder().name("R").dimensions(unit))
            .unwrap();
        world.add_room(facility, room).unwrap();
        world.remove_room(facility, room).unwrap();

        let exported = export_string(&world);

        assert!(matches!(
            exported,
            Err(SnapshotError::MissingSection { ref section }) if section == "facility 1.rooms"
        ));
        let written = r#"{"facility 1": {"type": "Storage", "name": "F",
            "dimensions": {"dx": 1.0, "dy": 1.0, "dz": 1.0}, "rooms": {}}}"#;
        assert!(matches!(
            load_str(written),
            Err(SnapshotError::MissingSection { ref section }) if section == "facility 1.rooms"
        ));
    }
}

//! End-to-end tests for the full depot stack.
//!
//! Each test loads the demo snapshot through the JSON adapter into a fresh
//! world, drives it through a real commander and reads the result back
//! through complete histories and the exporter. No file is touched unless
//! the test says so.

use depot_adapter_snapshot_json::{JsonSnapshotFile, export_document, load_str};
use depot_app::commander::Commander;
use depot_app::ports::SnapshotStore;
use depot_app::world::World;
use depot_domain::activation::HistoryCarrying;
use depot_domain::error::{DepotError, ValidationError};
use depot_domain::history::ChangedField;
use depot_domain::id::{ContainerId, FacilityId, HoldingAreaId, ObjectKind};
use depot_domain::location::Location;
use depot_domain::time::format_timestamp;

const DEMO: &str = include_str!("../../../../demos/model.json");

const NORTH: FacilityId = FacilityId::from_raw(0);
const A_01: HoldingAreaId = HoldingAreaId::from_raw(2);
const CASTOR_1: ContainerId = ContainerId::from_raw(3);
const A_02: HoldingAreaId = HoldingAreaId::from_raw(4);
const B_01: HoldingAreaId = HoldingAreaId::from_raw(6);
const SOUTH: FacilityId = FacilityId::from_raw(7);

fn demo() -> World {
    load_str(DEMO).expect("demo snapshot should load")
}

fn transport(
    world: &mut World,
    commander: &Commander,
    destination: HoldingAreaId,
    start: &str,
    end: &str,
) -> Result<(), DepotError> {
    let origin = world.registry().container(CASTOR_1)?.location();
    let destination = world.placement_at(destination)?;
    commander.issue_transport(world, CASTOR_1, origin, destination, start, end)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn should_load_demo_with_expected_ids() {
    let world = demo();

    assert_eq!(world.registry().len(), 11);
    assert_eq!(world.registry().facility(NORTH).unwrap().name(), "North store");
    assert_eq!(world.registry().facility(SOUTH).unwrap().name(), "South store");
    assert_eq!(
        world.contained_container(A_01).unwrap().unwrap().name(),
        "Castor 1"
    );
    assert_eq!(format_timestamp(world.now()), "2024:01:01.06:00");
}

#[test]
fn should_start_with_empty_histories() {
    let world = demo();

    for id in world
        .registry()
        .lookup_by_type(ObjectKind::Facility)
        .unwrap()
        .into_keys()
    {
        assert!(world.complete_history(id).unwrap().is_empty());
    }
}

// ---------------------------------------------------------------------------
// Transports
// ---------------------------------------------------------------------------

#[test]
fn should_move_container_through_two_rooms() {
    let mut world = demo();
    let commander = Commander::new(&mut world);

    transport(&mut world, &commander, A_02, "2024:01:01.08:00", "2024:01:01.09:30").unwrap();
    transport(&mut world, &commander, B_01, "2024:01:02.07:00", "2024:01:02.07:45").unwrap();

    let castor = world.registry().container(CASTOR_1).unwrap();
    assert_eq!(castor.location(), world.placement_at(B_01).unwrap());
    assert_eq!(castor.history().len(), 2);
    assert!(!world.registry().holding_area(A_01).unwrap().is_occupied());
    assert!(!world.registry().holding_area(A_02).unwrap().is_occupied());
    assert!(world.registry().holding_area(B_01).unwrap().is_occupied());
    assert_eq!(format_timestamp(world.now()), "2024:01:02.07:45");
}

#[test]
fn should_collect_every_change_in_facility_history() {
    let mut world = demo();
    let commander = Commander::new(&mut world);
    transport(&mut world, &commander, A_02, "2024:01:01.08:00", "2024:01:01.09:30").unwrap();
    transport(&mut world, &commander, B_01, "2024:01:02.07:00", "2024:01:02.07:45").unwrap();

    let north = world.complete_history(NORTH.into()).unwrap();
    let south = world.complete_history(SOUTH.into()).unwrap();

    // A-01: 2, A-02: 2 + 2, B-01: 2, Castor 1 (now on B-01): 2.
    assert_eq!(north.len(), 10);
    assert!(south.is_empty());
    let ends: Vec<_> = north.entries().map(|entry| entry.end_time).collect();
    assert!(ends.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(
        north
            .entries()
            .filter(|entry| entry.changed_field == ChangedField::Location)
            .count(),
        2
    );
}

#[test]
fn should_leave_world_untouched_when_origin_is_stale() {
    let mut world = demo();
    let commander = Commander::new(&mut world);
    let stale = world.placement_at(A_02).unwrap();
    let destination = world.placement_at(B_01).unwrap();
    let objects = world.registry().len();

    let result = commander.issue_transport(
        &mut world,
        CASTOR_1,
        stale,
        destination,
        "2024:01:01.08:00",
        "2024:01:01.09:00",
    );

    assert!(matches!(
        result,
        Err(DepotError::Validation(ValidationError::OriginMismatch))
    ));
    assert_eq!(world.registry().len(), objects);
    assert_eq!(format_timestamp(world.now()), "2024:01:01.06:00");
    assert!(world.complete_history(NORTH.into()).unwrap().is_empty());
}

#[test]
fn should_reject_destination_with_wrong_facility() {
    let mut world = demo();
    let commander = Commander::new(&mut world);
    let origin = world.registry().container(CASTOR_1).unwrap().location();
    let mut destination = world.placement_at(B_01).unwrap();
    destination.facility = Some(SOUTH);

    let result = commander.issue_transport(
        &mut world,
        CASTOR_1,
        origin,
        destination,
        "2024:01:01.08:00",
        "2024:01:01.09:00",
    );

    assert!(matches!(
        result,
        Err(DepotError::Validation(ValidationError::InvalidContainment { .. }))
    ));
}

#[test]
fn should_reject_destination_without_holding_area() {
    let mut world = demo();
    let commander = Commander::new(&mut world);
    let origin = world.registry().container(CASTOR_1).unwrap().location();
    let destination = Location {
        holding_area: None,
        ..world.placement_at(B_01).unwrap()
    };

    let result = commander.issue_transport(
        &mut world,
        CASTOR_1,
        origin,
        destination,
        "2024:01:01.08:00",
        "2024:01:01.09:00",
    );

    assert!(matches!(
        result,
        Err(DepotError::Validation(ValidationError::IncompleteDestination))
    ));
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[test]
fn should_export_moved_container_under_its_new_holding_area() {
    let mut world = demo();
    let commander = Commander::new(&mut world);
    transport(&mut world, &commander, B_01, "2024:01:01.08:00", "2024:01:01.08:40").unwrap();

    let document = export_document(&world).unwrap();

    let north = &document["facility 1"]["rooms"];
    assert!(
        north["room 1"]["holding_areas"]["holding_area 1"]
            .get("container")
            .is_none()
    );
    assert_eq!(
        north["room 2"]["holding_areas"]["holding_area 1"]["container"]["name"],
        "Castor 1"
    );
    assert_eq!(document["time"]["hour"], "08");
    assert_eq!(document["time"]["minute"], "40");
}

#[test]
fn should_reload_exported_file_with_final_state() {
    let path = std::env::temp_dir().join(format!("depot-it-{}.json", std::process::id()));
    let store = JsonSnapshotFile::new(&path);
    let mut world = demo();
    let commander = Commander::new(&mut world);
    transport(&mut world, &commander, A_02, "2024:01:01.08:00", "2024:01:01.09:30").unwrap();

    store.save(&world).unwrap();
    let reloaded = store.load().unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(reloaded.now(), world.now());
    assert_eq!(reloaded.registry().len(), 11);
    // A-01 is now empty, so A-02 and its container are built one id earlier.
    assert_eq!(
        reloaded
            .contained_container(HoldingAreaId::from_raw(3))
            .unwrap()
            .unwrap()
            .name(),
        "Castor 1"
    );
    assert!(
        reloaded
            .complete_history(NORTH.into())
            .unwrap()
            .is_empty()
    );
}

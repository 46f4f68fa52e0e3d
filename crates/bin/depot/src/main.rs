//! # depot: simulation runner
//!
//! Composition root that wires the snapshot adapter to the application
//! layer and runs one scripted simulation.
//!
//! ## Responsibilities
//! - Read configuration (`depot.toml`, environment overrides)
//! - Initialize logging
//! - Load the model snapshot into a fresh world
//! - Issue the configured transports through a single commander
//! - Print the complete history of every facility as JSON
//! - Export the final tree and clock when an export path is set
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer. No domain logic belongs here.

mod config;

use anyhow::{Context, Result};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use depot_adapter_snapshot_json::JsonSnapshotFile;
use depot_app::commander::Commander;
use depot_app::ports::SnapshotStore;
use depot_app::world::World;
use depot_domain::id::{ContainerId, FacilityId, HoldingAreaId, ObjectKind};
use depot_domain::time::format_timestamp;

use crate::config::{Config, TransportConfig};

fn main() -> Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let snapshot = JsonSnapshotFile::new(&config.model.path);
    let mut world = snapshot
        .load()
        .with_context(|| format!("loading model {}", config.model.path.display()))?;
    tracing::info!(
        path = %config.model.path.display(),
        now = %format_timestamp(world.now()),
        "model loaded"
    );

    let commander = Commander::new(&mut world);
    for (n, transport) in config.transports.iter().enumerate() {
        run_transport(&mut world, &commander, transport)
            .with_context(|| format!("transport {n} of container {}", transport.container))?;
    }

    report(&world)?;

    if let Some(path) = &config.export.path {
        JsonSnapshotFile::new(path)
            .save(&world)
            .with_context(|| format!("exporting model to {}", path.display()))?;
    }

    Ok(())
}

/// Move a container from wherever it currently sits onto the configured
/// holding area.
fn run_transport(world: &mut World, commander: &Commander, transport: &TransportConfig) -> Result<()> {
    let target = ContainerId::from_raw(transport.container);
    let origin = world.registry().container(target)?.location();
    let destination = world.placement_at(HoldingAreaId::from_raw(transport.destination))?;
    commander.issue_transport(
        world,
        target,
        origin,
        destination,
        &transport.start,
        &transport.end,
    )?;
    Ok(())
}

/// Print one JSON line per facility with its complete history.
fn report(world: &World) -> Result<()> {
    let facilities = world.registry().lookup_by_type(ObjectKind::Facility)?;
    for id in facilities.into_keys() {
        let facility = world.registry().facility(FacilityId::from(id))?;
        let history = world.complete_history(id)?;
        let line = json!({
            "facility": id,
            "name": facility.name(),
            "now": format_timestamp(world.now()),
            "entries": history.entries().collect::<Vec<_>>(),
        });
        println!("{line}");
    }
    Ok(())
}

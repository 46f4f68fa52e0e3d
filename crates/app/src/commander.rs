//! Commander: validates transport requests and drives their activation.
//!
//! A transport goes through three steps:
//! 1. **Validate**: the stated origin must be the target's current location
//!    and the destination must name an existing, placed holding area.
//!    Nothing is mutated when validation fails.
//! 2. **Construct**: the command is registered, reconciling the clock with
//!    its declared span.
//! 3. **Activate**: inside an authorization window held by this commander,
//!    the origin holding area, the destination holding area and the
//!    container are activated in that order.
//!
//! There is no rollback: an error during step 3 leaves the objects activated
//! so far in their new state.

use depot_domain::command::TransportCmd;
use depot_domain::error::{DepotError, ValidationError};
use depot_domain::id::{CommandId, CommanderId, ContainerId, ObjectId, ObjectKind};
use depot_domain::location::Location;
use depot_domain::time::parse_timestamp;

use crate::world::World;

/// Issues commands against a [`World`] under its own authorization.
///
/// A commander does not keep the commands it issues; they remain reachable
/// through the registry and through the ledgers they touched.
#[derive(Debug)]
pub struct Commander {
    id: CommanderId,
}

impl Commander {
    /// Create a commander with a fresh identity in `world`.
    pub fn new(world: &mut World) -> Self {
        Self {
            id: world.issue_commander_id(),
        }
    }

    #[must_use]
    pub fn id(&self) -> CommanderId {
        self.id
    }

    /// Move `target` from `origin` to `destination` over `start`..`end`
    /// (`YYYY:MM:DD.hh:mm`).
    ///
    /// # Errors
    ///
    /// Before anything changes:
    /// - [`ValidationError::OriginMismatch`] when `origin` is not the
    ///   target's current location
    /// - [`ValidationError::IncompleteDestination`] when any destination
    ///   field is missing
    /// - [`ValidationError::InvalidContainment`] when the destination does
    ///   not match where its holding area sits
    /// - [`ValidationError::InvalidTimestamp`] or
    ///   [`ValidationError::EndBeforeStart`] for a malformed span
    /// - [`DepotError::NotFound`] when the target or destination is unknown
    ///
    /// Errors raised while activating are returned as-is, with earlier
    /// activations already applied.
    #[tracing::instrument(skip(self, world), fields(commander = %self.id))]
    pub fn issue_transport(
        &self,
        world: &mut World,
        target: ContainerId,
        origin: Location,
        destination: Location,
        start: &str,
        end: &str,
    ) -> Result<CommandId, DepotError> {
        let (origin_area, destination_area) =
            Self::validate_transport(world, target, origin, destination)?;
        let start = parse_timestamp(start)?;
        let end = parse_timestamp(end)?;

        let command = world.create_transport(
            TransportCmd::builder()
                .target(target)
                .origin(origin)
                .destination(destination)
                .span(start, end),
        )?;

        let mut involved: Vec<ObjectId> = vec![origin_area, destination_area, target.into()];
        involved.dedup();

        let mut window = world.authorize(self.id);
        for object in involved {
            window.activate(object, command, self.id)?;
        }
        drop(window);

        tracing::info!(%command, %target, to = %destination, "transport committed");
        Ok(command)
    }

    /// Check a transport request against the current state of `world` and
    /// return the origin and destination holding areas.
    fn validate_transport(
        world: &World,
        target: ContainerId,
        origin: Location,
        destination: Location,
    ) -> Result<(ObjectId, ObjectId), DepotError> {
        let current = world.registry().container(target)?.location();
        let origin_area = match origin.holding_area {
            Some(area)
                if origin.facility == current.facility
                    && origin.room == current.room
                    && origin.holding_area == current.holding_area =>
            {
                area
            }
            _ => return Err(ValidationError::OriginMismatch.into()),
        };

        let Some(destination_area) = destination.holding_area.filter(|_| destination.is_complete())
        else {
            return Err(ValidationError::IncompleteDestination.into());
        };
        if world.placement_at(destination_area)? != destination {
            return Err(ValidationError::InvalidContainment {
                level: ObjectKind::Container,
                reason: "destination does not match where its holding area is placed",
            }
            .into());
        }

        Ok((origin_area.into(), destination_area.into()))
    }
}

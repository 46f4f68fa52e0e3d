//! The world: one self-contained simulation.
//!
//! A [`World`] owns the identity registry, the simulated clock and the
//! authorization flag. Every object is created through it so that ids and
//! creation times come from the same place, and every mutation of the tree
//! goes through it so that parent inventories and child locations agree.

mod containment;
mod history;

use depot_domain::activation::{ActivationOutcome, Authority};
use depot_domain::command::{Command, TransportCmdBuilder};
use depot_domain::container::ContainerBuilder;
use depot_domain::error::{DepotError, ValidationError};
use depot_domain::facility::FacilityBuilder;
use depot_domain::holding_area::HoldingAreaBuilder;
use depot_domain::id::{
    CommandId, CommanderId, ContainerId, FacilityId, HoldingAreaId, ObjectId, RoomId,
};
use depot_domain::registry::{Object, Registry};
use depot_domain::room::RoomBuilder;
use depot_domain::time::{
    Reconciliation, SimulatedClock, Timestamp, format_timestamp, parse_timestamp,
};

use crate::authorization::AuthorizationWindow;

/// Registry, clock and authorization flag of one simulation.
#[derive(Debug, Default)]
pub struct World {
    registry: Registry,
    clock: SimulatedClock,
    authority: Authority,
    next_commander: u64,
}

impl World {
    /// Create an empty world with the clock at the epoch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty world with the clock at `start`.
    #[must_use]
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            clock: SimulatedClock::starting_at(start),
            ..Self::default()
        }
    }

    /// Read access to every registered object.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Overwrite the simulated time.
    pub fn set_time(&mut self, now: Timestamp) {
        tracing::debug!(time = %format_timestamp(now), "clock set");
        self.clock.set(now);
    }

    /// Move simulated time forward (or back) by `minutes`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TimeOutOfRange`] when the resulting time
    /// cannot be represented; the clock is left untouched.
    pub fn advance_by(&mut self, minutes: i64) -> Result<(), ValidationError> {
        self.clock.advance_by(minutes)
    }

    /// Reconcile the clock with a `YYYY:MM:DD.hh:mm` span.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] if either string is
    /// malformed, or [`ValidationError::TimeOutOfRange`] if the clock cannot
    /// move that far; the clock is left untouched.
    pub fn reconcile(&mut self, start: &str, end: &str) -> Result<Reconciliation, ValidationError> {
        let start = parse_timestamp(start)?;
        let end = parse_timestamp(end)?;
        self.reconcile_span(start, end)
    }

    fn reconcile_span(
        &mut self,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Reconciliation, ValidationError> {
        let reconciliation = self.clock.reconcile(start, end)?;
        match reconciliation {
            Reconciliation::Advanced { lag_minutes, .. } if lag_minutes > 0 => {
                tracing::warn!(
                    start = %format_timestamp(start),
                    now = %format_timestamp(self.clock.now()),
                    lag_minutes,
                    "command starts before the current time"
                );
            }
            Reconciliation::Advanced { .. } | Reconciliation::JumpedToEnd => {}
        }
        Ok(reconciliation)
    }

    fn register(
        &mut self,
        make: impl FnOnce(ObjectId, Timestamp) -> Result<Object, ValidationError>,
    ) -> Result<ObjectId, DepotError> {
        let now = self.clock.now();
        let id = self.registry.register(|id| make(id, now))?;
        tracing::debug!(%id, "object registered");
        Ok(id)
    }

    /// Build and register a facility.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::Validation`] when the builder is incomplete.
    pub fn create_facility(&mut self, builder: FacilityBuilder) -> Result<FacilityId, DepotError> {
        self.register(|id, now| builder.build(id.into(), now).map(Object::Facility))
            .map(FacilityId::from)
    }

    /// Build and register an unplaced room.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::Validation`] when the builder is incomplete.
    pub fn create_room(&mut self, builder: RoomBuilder) -> Result<RoomId, DepotError> {
        self.register(|id, now| builder.build(id.into(), now).map(Object::Room))
            .map(RoomId::from)
    }

    /// Build and register an unplaced holding area.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::Validation`] when the builder is incomplete.
    pub fn create_holding_area(
        &mut self,
        builder: HoldingAreaBuilder,
    ) -> Result<HoldingAreaId, DepotError> {
        self.register(|id, now| builder.build(id.into(), now).map(Object::HoldingArea))
            .map(HoldingAreaId::from)
    }

    /// Build and register an unplaced container.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::Validation`] when the builder is incomplete.
    pub fn create_container(&mut self, builder: ContainerBuilder) -> Result<ContainerId, DepotError> {
        self.register(|id, now| builder.build(id.into(), now).map(Object::Container))
            .map(ContainerId::from)
    }

    /// Register a transport command, reconciling the clock with its span.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::Validation`] when the builder is incomplete or
    /// its span is inverted; the clock is only touched once the builder is
    /// known to be valid.
    pub fn create_transport(&mut self, builder: TransportCmdBuilder) -> Result<CommandId, DepotError> {
        builder.validate()?;
        let (Some(start), Some(end)) = (builder.start_time(), builder.end_time()) else {
            return Err(ValidationError::MissingTimeSpan.into());
        };
        self.reconcile_span(start, end)?;
        self.register(|id, _| builder.build(id.into()).map(|cmd| Object::Command(cmd.into())))
            .map(CommandId::from)
    }

    /// Hand out a fresh commander identity.
    pub(crate) fn issue_commander_id(&mut self) -> CommanderId {
        let id = CommanderId::from_raw(self.next_commander);
        self.next_commander += 1;
        id
    }

    /// Open an authorization window for `commander`.
    ///
    /// The window closes, and the previous holder is restored, when the
    /// returned guard is dropped.
    pub(crate) fn authorize(&mut self, commander: CommanderId) -> AuthorizationWindow<'_> {
        AuthorizationWindow::open(self, commander)
    }

    pub(crate) fn authority_mut(&mut self) -> &mut Authority {
        &mut self.authority
    }

    /// The commander currently allowed to activate objects, if any.
    #[must_use]
    pub fn authorized_commander(&self) -> Option<CommanderId> {
        self.authority.current()
    }

    /// Activate object `id` with the registered command `command` on behalf
    /// of `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] if either id is unknown,
    /// [`DepotError::Permission`] if `caller` does not hold the authorization
    /// window, and the object's own validation errors otherwise.
    pub fn activate(
        &mut self,
        id: ObjectId,
        command: CommandId,
        caller: CommanderId,
    ) -> Result<ActivationOutcome, DepotError> {
        let command: Command = self.registry.command(command)?.clone();
        let outcome = self
            .registry
            .lookup_mut(id)?
            .activate(&command, caller, &self.authority)?;
        match outcome {
            ActivationOutcome::Applied { entries } => {
                tracing::debug!(%id, command = %command.id(), entries, "command applied");
            }
            ActivationOutcome::Skipped(diagnostic) => {
                tracing::warn!(%id, command = %command.id(), "{diagnostic}");
            }
        }
        Ok(outcome)
    }
}

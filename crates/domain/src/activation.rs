//! Activation: the authorization-gated entry point through which commands
//! change history-carrying objects.
//!
//! [`HistoryCarrying::activate`] checks the caller against the [`Authority`]
//! before delegating to a per-type hook. The hook lives in a private trait,
//! so code outside this crate can only reach it through the gate.

use crate::command::Command;
use crate::error::{DepotError, PermissionError};
use crate::history::{History, Source};
use crate::id::{CommanderId, ObjectId, ObjectKind};
use crate::time::Timestamp;

/// Which commander, if any, is currently allowed to activate objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Authority {
    current: Option<CommanderId>,
}

impl Authority {
    /// The commander holding the window, if one is open.
    #[must_use]
    pub fn current(&self) -> Option<CommanderId> {
        self.current
    }

    /// Authorize `commander`, returning whoever held the window before.
    ///
    /// Only the application layer's authorization window calls this. An
    /// authority built elsewhere can only unlock objects it owns, never the
    /// ones held by a world's registry.
    #[doc(hidden)]
    pub fn grant(&mut self, commander: CommanderId) -> Option<CommanderId> {
        self.current.replace(commander)
    }

    /// Put back the holder returned by [`grant`](Self::grant).
    #[doc(hidden)]
    pub fn restore(&mut self, previous: Option<CommanderId>) {
        self.current = previous;
    }

    /// Check that `caller` holds the window.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError`] when no window is open or another
    /// commander holds it.
    pub fn check(&self, caller: CommanderId) -> Result<(), PermissionError> {
        if self.current == Some(caller) {
            Ok(())
        } else {
            Err(PermissionError { caller })
        }
    }
}

/// Non-error condition reported by an operation that turned into a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// A container was offered to a holding area that already holds one.
    AlreadyOccupied { holding_area: ObjectId },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyOccupied { holding_area } => {
                write!(f, "holding area {holding_area} is already occupied")
            }
        }
    }
}

/// Result of a successful activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The command was applied and this many ledger entries were appended.
    Applied { entries: usize },
    /// Nothing changed; the diagnostic says why.
    Skipped(Diagnostic),
}

pub(crate) mod sealed {
    use crate::activation::ActivationOutcome;
    use crate::command::Command;
    use crate::error::DepotError;

    /// Per-type effect of a command. Reachable only through
    /// [`HistoryCarrying::activate`](super::HistoryCarrying::activate).
    pub trait Apply {
        fn apply(&mut self, command: &Command) -> Result<ActivationOutcome, DepotError>;
    }
}

/// An identified object that owns a [`History`] and can be activated.
pub trait HistoryCarrying: sealed::Apply {
    fn object_id(&self) -> ObjectId;

    fn object_kind(&self) -> ObjectKind;

    /// Simulated time at which the object was created.
    fn init_time(&self) -> Timestamp;

    /// The object's own ledger, without any descendants.
    fn history(&self) -> &History;

    /// Source tag used when this object's entries are merged.
    fn source(&self) -> Source {
        Source {
            id: self.object_id(),
            kind: self.object_kind(),
        }
    }

    /// Apply `command` on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::Permission`] when `caller` does not hold the
    /// authorization window; the ledger is left untouched. Otherwise
    /// propagates the validation errors of the type-specific hook.
    fn activate(
        &mut self,
        command: &Command,
        caller: CommanderId,
        authority: &Authority,
    ) -> Result<ActivationOutcome, DepotError> {
        authority.check(caller)?;
        self.apply(command)
    }
}

//! Commands: requested state changes that are applied through activation.
//!
//! Only transports exist today. New kinds are added as [`Command`] variants,
//! and every `match` on a command is exhaustive so the compiler points at
//! each place that must learn about them.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{CommandId, ContainerId, ObjectId};
use crate::location::Location;
use crate::time::Timestamp;

/// Discriminant of a [`Command`], recorded in history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Transport,
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => f.write_str("transport"),
        }
    }
}

/// Move of one container from one holding area to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportCmd {
    pub id: CommandId,
    pub target: ContainerId,
    pub origin: Location,
    pub destination: Location,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

impl TransportCmd {
    /// Create a builder for constructing a [`TransportCmd`].
    #[must_use]
    pub fn builder() -> TransportCmdBuilder {
        TransportCmdBuilder::default()
    }
}

/// Step-by-step builder for [`TransportCmd`]. The id is assigned by the
/// registry when the command is built.
#[derive(Debug, Default)]
pub struct TransportCmdBuilder {
    target: Option<ContainerId>,
    origin: Location,
    destination: Location,
    start_time: Option<Timestamp>,
    end_time: Option<Timestamp>,
}

impl TransportCmdBuilder {
    #[must_use]
    pub fn target(mut self, target: ContainerId) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn origin(mut self, origin: Location) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn destination(mut self, destination: Location) -> Self {
        self.destination = destination;
        self
    }

    #[must_use]
    pub fn span(mut self, start_time: Timestamp, end_time: Timestamp) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }

    /// Declared start of the command, if set.
    #[must_use]
    pub fn start_time(&self) -> Option<Timestamp> {
        self.start_time
    }

    /// Declared end of the command, if set.
    #[must_use]
    pub fn end_time(&self) -> Option<Timestamp> {
        self.end_time
    }

    /// Check the builder without consuming it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteDestination`] when the target or
    /// any destination field is missing, [`ValidationError::MissingTimeSpan`]
    /// when the span was never set, and [`ValidationError::EndBeforeStart`]
    /// when the span is inverted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.target.is_none() || !self.destination.is_complete() {
            return Err(ValidationError::IncompleteDestination);
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if end < start => Err(ValidationError::EndBeforeStart),
            (Some(_), Some(_)) => Ok(()),
            _ => Err(ValidationError::MissingTimeSpan),
        }
    }

    /// Consume the builder, validate, and return a [`TransportCmd`].
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn build(self, id: CommandId) -> Result<TransportCmd, ValidationError> {
        self.validate()?;
        match (self.target, self.start_time, self.end_time) {
            (Some(target), Some(start_time), Some(end_time)) => Ok(TransportCmd {
                id,
                target,
                origin: self.origin,
                destination: self.destination,
                start_time,
                end_time,
            }),
            _ => Err(ValidationError::IncompleteDestination),
        }
    }
}

/// Any command the model knows how to activate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Command {
    Transport(TransportCmd),
}

impl Command {
    #[must_use]
    pub fn id(&self) -> CommandId {
        match self {
            Self::Transport(cmd) => cmd.id,
        }
    }

    #[must_use]
    pub fn command_type(&self) -> CommandType {
        match self {
            Self::Transport(_) => CommandType::Transport,
        }
    }

    /// The object the command was issued against.
    #[must_use]
    pub fn target(&self) -> ObjectId {
        match self {
            Self::Transport(cmd) => cmd.target.into(),
        }
    }

    #[must_use]
    pub fn start_time(&self) -> Timestamp {
        match self {
            Self::Transport(cmd) => cmd.start_time,
        }
    }

    #[must_use]
    pub fn end_time(&self) -> Timestamp {
        match self {
            Self::Transport(cmd) => cmd.end_time,
        }
    }
}

impl From<TransportCmd> for Command {
    fn from(cmd: TransportCmd) -> Self {
        Self::Transport(cmd)
    }
}

//! Simulated time: timestamps and the global clock.
//!
//! Time in the model never follows the wall clock. It starts at a fixed
//! epoch and only moves when commands are processed (see
//! [`SimulatedClock::reconcile`]).

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::ValidationError;

/// Simulated timestamp with minute resolution.
pub type Timestamp = NaiveDateTime;

/// Lexical pattern of a timestamp string: `YYYY:MM:DD.hh:mm`.
pub const TIMESTAMP_FORMAT: &str = "%Y:%m:%d.%H:%M";

const TIMESTAMP_LEN: usize = 16;

/// Default start of simulated time, `2024:01:01.00:00`.
#[must_use]
pub fn epoch() -> Timestamp {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Parse a `YYYY:MM:DD.hh:mm` string.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTimestamp`] when the string is not
/// exactly 16 characters or does not describe a valid date and time.
pub fn parse_timestamp(text: &str) -> Result<Timestamp, ValidationError> {
    if text.len() != TIMESTAMP_LEN {
        return Err(ValidationError::InvalidTimestamp(text.to_string()));
    }
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|_| ValidationError::InvalidTimestamp(text.to_string()))
}

/// Render a timestamp as `YYYY:MM:DD.hh:mm`.
#[must_use]
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// How the clock moved while reconciling a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The command starts in the future; the clock jumped straight to its end.
    JumpedToEnd,
    /// The command started at or before the current time and the clock was
    /// advanced by `increment_minutes`.
    ///
    /// A non-zero `lag_minutes` means the command claims to have begun before
    /// "now"; callers should surface it as a warning.
    Advanced {
        lag_minutes: i64,
        increment_minutes: i64,
    },
}

/// The single simulated time value of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedClock {
    now: Timestamp,
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::starting_at(epoch())
    }
}

impl SimulatedClock {
    /// Create a clock set to `start`.
    #[must_use]
    pub fn starting_at(start: Timestamp) -> Self {
        Self { now: start }
    }

    /// Current simulated time.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Overwrite the current time. Used when loading a snapshot.
    pub fn set(&mut self, now: Timestamp) {
        self.now = now;
    }

    /// Move the clock by a number of minutes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TimeOutOfRange`] when the result is not a
    /// representable timestamp; the clock is left unchanged.
    pub fn advance_by(&mut self, minutes: i64) -> Result<(), ValidationError> {
        self.now = TimeDelta::try_minutes(minutes)
            .and_then(|delta| self.now.checked_add_signed(delta))
            .ok_or(ValidationError::TimeOutOfRange)?;
        Ok(())
    }

    /// Reconcile the clock with the declared span of a command.
    ///
    /// A command starting after "now" moves the clock directly to `end`.
    /// Otherwise the clock advances by the command's duration minus the lag
    /// between its start and "now", which lands it on `end` as well.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TimeOutOfRange`] when the increment cannot
    /// be applied.
    pub fn reconcile(
        &mut self,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Reconciliation, ValidationError> {
        if start > self.now {
            self.now = end;
            return Ok(Reconciliation::JumpedToEnd);
        }
        let lag_minutes = (self.now - start).num_minutes();
        let total_minutes = (end - start).num_minutes();
        let increment_minutes = total_minutes - lag_minutes;
        self.advance_by(increment_minutes)?;
        Ok(Reconciliation::Advanced {
            lag_minutes,
            increment_minutes,
        })
    }
}

//! Serde mirror of the snapshot document.
//!
//! Nested sections are kept as ordered JSON maps (`serde_json` is built with
//! `preserve_order`) so children are created in the order they are written.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use depot_domain::error::ValidationError;
use depot_domain::time::{Timestamp, parse_timestamp};
use depot_domain::units::{Dimensions, Position};

/// Top-level key of the clock block.
pub const TIME_KEY: &str = "time";

/// Ordered `"<label> <n>" → section` map.
pub type Section = Map<String, Value>;

/// The clock, split into zero-padded string parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDoc {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minute: String,
}

impl TimeDoc {
    /// Reassemble the parts into a timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] when the parts do not
    /// form a valid `YYYY:MM:DD.hh:mm` value.
    pub fn timestamp(&self) -> Result<Timestamp, ValidationError> {
        parse_timestamp(&format!(
            "{}:{}:{}.{}:{}",
            self.year, self.month, self.day, self.hour, self.minute
        ))
    }
}

impl From<Timestamp> for TimeDoc {
    fn from(ts: Timestamp) -> Self {
        Self {
            year: format!("{:04}", ts.year()),
            month: format!("{:02}", ts.month()),
            day: format!("{:02}", ts.day()),
            hour: format!("{:02}", ts.hour()),
            minute: format!("{:02}", ts.minute()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityDoc {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub name: String,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub rooms: Option<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDoc {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub name: String,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub position: Position,
    #[serde(
        default,
        alias = "holdingAreas",
        skip_serializing_if = "Option::is_none"
    )]
    pub holding_areas: Option<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingAreaDoc {
    pub name: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerDoc {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub name: String,
    pub dimensions: Dimensions,
}

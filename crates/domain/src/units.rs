//! Physical value types: extents and positions.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Extent of an object along the three axes. All components are finite and
/// positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct Dimensions {
    dx: f64,
    dy: f64,
    dz: f64,
}

#[derive(Deserialize)]
struct RawDimensions {
    dx: f64,
    dy: f64,
    dz: f64,
}

impl TryFrom<RawDimensions> for Dimensions {
    type Error = ValidationError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Self::new(raw.dx, raw.dy, raw.dz)
    }
}

impl Dimensions {
    /// Create dimensions from three extents.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveDimension`] for the first
    /// extent that is not a finite positive number.
    pub fn new(dx: f64, dy: f64, dz: f64) -> Result<Self, ValidationError> {
        for (axis, value) in [("dx", dx), ("dy", dy), ("dz", dz)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::NonPositiveDimension { axis, value });
            }
        }
        Ok(Self { dx, dy, dz })
    }

    #[must_use]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    #[must_use]
    pub fn dy(&self) -> f64 {
        self.dy
    }

    #[must_use]
    pub fn dz(&self) -> f64 {
        self.dz
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(dx={}, dy={}, dz={})", self.dx, self.dy, self.dz)
    }
}

/// A point in Cartesian space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(x={}, y={}, z={})", self.x, self.y, self.z)
    }
}

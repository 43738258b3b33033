//! Two-dimensional (u, v) vectors and the scalars derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 2D vector, e.g. a wind sample with its eastward (u) and northward (v)
/// components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub u: f64,
    pub v: f64,
}

impl Vector {
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    /// Length of the vector.
    pub fn magnitude(&self) -> f64 {
        (self.u * self.u + self.v * self.v).sqrt()
    }

    /// Bearing the vector points towards, in degrees [0, 360).
    /// N is 0° and E is 90°.
    pub fn direction_to(&self) -> f64 {
        let degrees = self.u.atan2(self.v).to_degrees();
        if degrees < 0.0 {
            degrees + 360.0
        } else {
            degrees
        }
    }

    /// Bearing the vector comes from, in degrees [0, 360).
    /// Meteorological convention for winds.
    pub fn direction_from(&self) -> f64 {
        (self.direction_to() + 180.0) % 360.0
    }
}

/// Scalar quantities derivable from a vector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Magnitude,
    DirectionTo,
    DirectionFrom,
}

impl FieldKind {
    /// The derivation as a plain function.
    pub fn function(self) -> fn(&Vector) -> f64 {
        match self {
            Self::Magnitude => Vector::magnitude,
            Self::DirectionTo => Vector::direction_to,
            Self::DirectionFrom => Vector::direction_from,
        }
    }

    /// Apply the derivation to one vector.
    pub fn apply(self, vector: &Vector) -> f64 {
        (self.function())(vector)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Magnitude => "magnitude",
            Self::DirectionTo => "directionTo",
            Self::DirectionFrom => "directionFrom",
        }
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "magnitude" | "speed" => Ok(Self::Magnitude),
            "directionto" => Ok(Self::DirectionTo),
            "directionfrom" => Ok(Self::DirectionFrom),
            _ => Err(format!(
                "unknown field kind '{}', expected magnitude, directionTo or directionFrom",
                s
            )),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Configuration for grid queries.

use crate::types::InterpolationMethod;
use serde::{Deserialize, Serialize};

/// Configuration shared by regular and polar grids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Method used by `sample()`.
    pub interpolation: InterpolationMethod,

    /// Bearing correction applied by polar grids on projected planes.
    pub polar_angle_correction: AngleCorrection,

    /// Row/column stride used when scanning cells for the value range.
    pub range_stride: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMethod::Bilinear,
            polar_angle_correction: AngleCorrection::MeridianConvergence,
            range_stride: 1,
        }
    }
}

impl GridConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_INTERPOLATION") {
            config.interpolation = InterpolationMethod::from_str(&val);
        }

        if let Ok(val) = std::env::var("POLAR_ANGLE_CORRECTION") {
            config.polar_angle_correction = AngleCorrection::from_str(&val);
        }

        if let Ok(val) = std::env::var("GRID_RANGE_STRIDE") {
            if let Ok(stride) = val.parse() {
                config.range_stride = stride;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.range_stride == 0 {
            return Err("range_stride must be > 0".to_string());
        }

        Ok(())
    }
}

/// How a polar grid turns projected-plane angles into true bearings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleCorrection {
    /// Use the projected-plane angle as is.
    None,
    /// Add the meridian convergence of the projection at the grid centre.
    #[default]
    MeridianConvergence,
}

impl AngleCorrection {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" | "off" | "false" => Self::None,
            _ => Self::MeridianConvergence,
        }
    }

    /// Get the variant name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::MeridianConvergence => "meridian_convergence",
        }
    }
}

impl std::fmt::Display for AngleCorrection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

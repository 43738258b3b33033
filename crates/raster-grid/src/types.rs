//! Core types for grid definitions and query results.

use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
///
/// For geographic extents coordinates are degrees (x = longitude,
/// y = latitude); for projected extents they are in projection units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box enclosing all the given points.
    pub fn enclosing(points: &[(f64, f64)]) -> Self {
        let mut bbox = Self::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for &(x, y) in points {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
        bbox
    }

    /// `[xmin, ymin, xmax, ymax]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Get the width in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Get the height in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is contained within this bounding box.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Footprint of a grid cell in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSize {
    pub x: f64,
    pub y: f64,
}

impl CellSize {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Square cells, as produced by ASCII grids and GeoTIFF rasters.
    pub fn square(size: f64) -> Self {
        Self { x: size, y: size }
    }
}

/// Metadata of a regular grid.
///
/// Values are laid out row-major: row 0 is the northern-most row and
/// column 0 the western-most column (x-ascending, y-descending).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    /// Cell size in grid units
    pub cell_size: CellSize,
    /// Number of columns
    pub n_cols: usize,
    /// Number of rows
    pub n_rows: usize,
    /// Lower-left corner x, in grid units
    pub xll_corner: f64,
    /// Lower-left corner y, in grid units
    pub yll_corner: f64,
    /// Projection definition of the grid plane (geographic when absent)
    #[serde(default)]
    pub projection: Option<String>,
}

impl GridParams {
    /// Create grid metadata in geographic coordinates.
    pub fn new(
        cell_size: CellSize,
        n_cols: usize,
        n_rows: usize,
        xll_corner: f64,
        yll_corner: f64,
    ) -> Self {
        Self {
            cell_size,
            n_cols,
            n_rows,
            xll_corner,
            yll_corner,
            projection: None,
        }
    }

    /// Set the projection definition.
    pub fn with_projection(mut self, projection: impl Into<String>) -> Self {
        self.projection = Some(projection.into());
        self
    }

    /// Upper-right corner x.
    pub fn xur_corner(&self) -> f64 {
        self.xll_corner + self.n_cols as f64 * self.cell_size.x
    }

    /// Upper-right corner y.
    pub fn yur_corner(&self) -> f64 {
        self.yll_corner + self.n_rows as f64 * self.cell_size.y
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        self.n_cols.saturating_mul(self.n_rows)
    }

    /// Check that the metadata describes a usable grid.
    pub fn validate(&self) -> Result<()> {
        if self.n_cols == 0 || self.n_rows == 0 {
            return Err(GridError::invalid_params(format!(
                "grid must have at least one row and column, got {}x{}",
                self.n_cols, self.n_rows
            )));
        }
        if self.n_cols.checked_mul(self.n_rows).is_none() {
            return Err(GridError::invalid_params(format!(
                "{}x{} cells overflow the addressable size",
                self.n_cols, self.n_rows
            )));
        }
        let size = self.cell_size;
        if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(GridError::invalid_params(format!(
                "cell size must be positive, got {}x{}",
                size.x, size.y
            )));
        }
        if !(self.xll_corner.is_finite() && self.yll_corner.is_finite()) {
            return Err(GridError::invalid_params("lower-left corner is not finite"));
        }
        Ok(())
    }

    /// Same geometry (size, corners, dimensions); projection is not compared.
    pub fn same_geometry(&self, other: &GridParams) -> bool {
        self.n_cols == other.n_cols
            && self.n_rows == other.n_rows
            && self.cell_size == other.cell_size
            && self.xll_corner == other.xll_corner
            && self.yll_corner == other.yll_corner
    }
}

/// A geographic position (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

/// Minimum and maximum of the accepted values of a field.
///
/// Used by renderers as the domain of a color scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Fold values into a range; `None` for an empty iterator.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self::new(v, v)),
            Some(r) => Some(Self::new(r.min.min(v), r.max.max(v))),
        })
    }
}

/// Interpolation method for point sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMethod {
    /// Value of the containing cell.
    Nearest,
    /// Bilinear blend of the four surrounding cell centers.
    #[default]
    Bilinear,
}

impl InterpolationMethod {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "nearest" => Self::Nearest,
            _ => Self::Bilinear,
        }
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Bilinear => write!(f, "bilinear"),
        }
    }
}

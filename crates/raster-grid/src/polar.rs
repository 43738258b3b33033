//! Range/bearing grids around a centre point (radar sweeps).
//!
//! Storage rows are bearing bins and columns are radial bins:
//! cell `(i, j)` covers distances `r0 + [i, i + 1) dr` and bearings
//! `lambda0 + [j, j + 1) dlambda` measured clockwise from true north.
//! Distances are measured in the projected plane of the grid.
//!
//! The bearing axis is cyclic when the sweep covers a full circle, the
//! radial axis never is.

use crate::cell::Cell;
use crate::config::{AngleCorrection, GridConfig};
use crate::error::{GridError, Result};
use crate::storage::{wrap_fraction, RasterStorage, Wrapping};
use crate::types::{BoundingBox, CellSize, GeoPoint, InterpolationMethod, ValueRange};
use crate::value::FieldValue;
use crate::vector::{FieldKind, Vector};
use projection::Projection;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Metadata of a polar grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarParams {
    /// Footprint reported for each cell
    pub cell_size: CellSize,
    /// Centre longitude (degrees)
    pub x0: f64,
    /// Centre latitude (degrees)
    pub y0: f64,
    /// Inner radius, in projection units
    pub r0: f64,
    /// Radial bin length, in projection units
    pub dr: f64,
    /// Number of radial bins
    pub n_r_bins: usize,
    /// Bearing of the first bin edge (degrees from north)
    pub lambda0: f64,
    /// Angular bin width (degrees)
    pub dlambda: f64,
    /// Number of bearing bins
    pub n_angles: usize,
    /// Projection definition of the plane distances are measured in
    #[serde(default)]
    pub projection: Option<String>,
}

impl PolarParams {
    /// Outer radius of the sweep.
    pub fn r_length(&self) -> f64 {
        self.r0 + self.dr * self.n_r_bins as f64
    }

    /// Angular span of the sweep in degrees.
    pub fn angular_span(&self) -> f64 {
        self.dlambda * self.n_angles as f64
    }

    pub fn num_cells(&self) -> usize {
        self.n_r_bins.saturating_mul(self.n_angles)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_r_bins == 0 || self.n_angles == 0 {
            return Err(GridError::invalid_params(format!(
                "polar grid needs at least one radial and one angular bin, got {}x{}",
                self.n_r_bins, self.n_angles
            )));
        }
        if self.n_r_bins.checked_mul(self.n_angles).is_none() {
            return Err(GridError::invalid_params(format!(
                "{}x{} bins overflow the addressable size",
                self.n_r_bins, self.n_angles
            )));
        }
        if !(self.dr.is_finite() && self.dr > 0.0) {
            return Err(GridError::invalid_params(format!("dr must be positive, got {}", self.dr)));
        }
        if !(self.dlambda.is_finite() && self.dlambda > 0.0) {
            return Err(GridError::invalid_params(format!(
                "dlambda must be positive, got {}",
                self.dlambda
            )));
        }
        if !(self.r0.is_finite() && self.r0 >= 0.0) {
            return Err(GridError::invalid_params(format!("r0 must be >= 0, got {}", self.r0)));
        }
        if !(self.x0.is_finite() && self.y0.is_finite() && self.lambda0.is_finite()) {
            return Err(GridError::invalid_params("centre and start bearing must be finite"));
        }
        Ok(())
    }
}

/// A polar grid of optional `T` values.
#[derive(Debug, Clone)]
pub struct PolarGrid<T: FieldValue> {
    params: PolarParams,
    projection: Projection,
    storage: RasterStorage<T>,
    config: GridConfig,
    center: (f64, f64),
    convergence: f64,
    full_circle: bool,
}

pub type ScalarPolarGrid = PolarGrid<f64>;
pub type VectorialPolarGrid = PolarGrid<Vector>;

impl<T: FieldValue> PolarGrid<T> {
    /// Build from cells ordered bearing bin by bearing bin.
    pub fn new(params: PolarParams, cells: Vec<Option<T>>, config: GridConfig) -> Result<Self> {
        params.validate()?;
        config.validate().map_err(GridError::ConfigError)?;
        let projection = Projection::from_optional(params.projection.as_deref())?;
        let storage = RasterStorage::new(params.n_r_bins, params.n_angles, cells, config.range_stride)?;

        let center = projection.project(params.x0, params.y0);
        let convergence = match config.polar_angle_correction {
            AngleCorrection::None => 0.0,
            AngleCorrection::MeridianConvergence => projection.convergence(params.x0, params.y0),
        };
        let full_circle = params.angular_span() >= 360.0;

        tracing::debug!(
            n_r_bins = params.n_r_bins,
            n_angles = params.n_angles,
            projection = %projection,
            convergence,
            full_circle,
            range = ?storage.range(),
            "Built polar grid"
        );

        Ok(Self {
            params,
            projection,
            storage,
            config,
            center,
            convergence,
            full_circle,
        })
    }

    /// Replace every cell, keeping metadata and filter.
    pub fn update_data(&mut self, cells: Vec<Option<T>>) -> Result<()> {
        self.storage.replace(cells)?;
        tracing::debug!(range = ?self.storage.range(), "Updated polar grid data");
        Ok(())
    }

    pub fn params(&self) -> &PolarParams {
        &self.params
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Radial bins.
    pub fn n_cols(&self) -> usize {
        self.params.n_r_bins
    }

    /// Bearing bins.
    pub fn n_rows(&self) -> usize {
        self.params.n_angles
    }

    pub fn width(&self) -> usize {
        self.n_cols()
    }

    pub fn height(&self) -> usize {
        self.n_rows()
    }

    pub fn num_cells(&self) -> usize {
        self.params.num_cells()
    }

    /// Centre in the projected plane.
    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn center_lon_lat(&self) -> GeoPoint {
        GeoPoint::new(self.params.x0, self.params.y0)
    }

    /// Degrees added to projected-plane bearings to get true bearings.
    pub fn convergence(&self) -> f64 {
        self.convergence
    }

    /// The sweep covers 360°, so the bearing axis wraps.
    pub fn is_full_circle(&self) -> bool {
        self.full_circle
    }

    pub fn range(&self) -> Option<ValueRange> {
        self.storage.range()
    }

    pub fn set_filter<F>(&mut self, filter: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.storage.set_filter(Some(Arc::new(filter)));
        tracing::debug!(range = ?self.storage.range(), "Installed polar grid filter");
    }

    pub fn clear_filter(&mut self) {
        self.storage.set_filter(None);
    }

    /// Bearing bins closing the full circle.
    fn bearing_period(&self) -> Option<usize> {
        self.full_circle.then(|| {
            Wrapping::period(360.0, self.params.dlambda, self.params.n_angles)
        })
    }

    fn wrapping(&self) -> Wrapping {
        Wrapping {
            columns: None,
            rows: self.bearing_period(),
        }
    }

    /// Distance from the centre and true bearing of a point.
    pub fn distance_and_bearing(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = self.projection.project(lon, lat);
        let dx = x - self.center.0;
        let dy = y - self.center.1;
        let grid_bearing = dx.atan2(dy).to_degrees();
        (dx.hypot(dy), (grid_bearing + self.convergence).rem_euclid(360.0))
    }

    /// Bearing relative to the first bin edge, in [0, 360).
    fn relative_bearing(&self, bearing: f64) -> f64 {
        (bearing - self.params.lambda0).rem_euclid(360.0)
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let (distance, bearing) = self.distance_and_bearing(lon, lat);
        distance >= self.params.r0
            && distance <= self.params.r_length()
            && (self.full_circle || self.relative_bearing(bearing) <= self.params.angular_span())
    }

    pub fn not_contains(&self, lon: f64, lat: f64) -> bool {
        !self.contains(lon, lat)
    }

    /// Fractional (radial, bearing) indices of a point.
    pub fn decimal_indexes(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (distance, bearing) = self.distance_and_bearing(lon, lat);
        let i = (distance - self.params.r0) / self.params.dr - 0.5;
        let j = self.relative_bearing(bearing) / self.params.dlambda - 0.5;

        let i = i.clamp(0.0, (self.params.n_r_bins - 1) as f64);
        let j = match self.bearing_period() {
            Some(period) => wrap_fraction(j, period),
            None => j.clamp(0.0, (self.params.n_angles - 1) as f64),
        };
        (i, j)
    }

    /// Geographic position of the centre of bin `(i, j)`.
    pub fn lon_lat_at_indexes(&self, i: f64, j: f64) -> GeoPoint {
        let r = self.params.r0 + (i + 0.5) * self.params.dr;
        let theta = (self.params.lambda0 + (j + 0.5) * self.params.dlambda - self.convergence)
            .to_radians();
        let x = self.center.0 + r * theta.sin();
        let y = self.center.1 + r * theta.cos();
        let (lon, lat) = self.projection.unproject(x, y);
        GeoPoint::new(lon, lat)
    }

    /// Square around the sweep, in projected coordinates.
    pub fn extent(&self) -> BoundingBox {
        let r = self.params.r_length();
        let (cx, cy) = self.center;
        BoundingBox::new(cx - r, cy - r, cx + r, cy + r)
    }

    /// Geographic box enclosing the projected extent.
    pub fn ll_extent(&self) -> BoundingBox {
        let e = self.extent();
        let corners: Vec<(f64, f64)> = [
            (e.min_x, e.min_y),
            (e.max_x, e.min_y),
            (e.min_x, e.max_y),
            (e.max_x, e.max_y),
        ]
        .iter()
        .map(|&(x, y)| self.projection.unproject(x, y))
        .collect();
        BoundingBox::enclosing(&corners)
    }

    /// Alias of `ll_extent`.
    pub fn get_bounds(&self) -> BoundingBox {
        self.ll_extent()
    }

    /// Every `stride`-th bin, bearing bin by bearing bin.
    pub fn cells(&self, stride: usize) -> Vec<Cell<T>> {
        let stride = stride.max(1);
        let mut cells = Vec::new();
        for j in (0..self.params.n_angles).step_by(stride) {
            for i in (0..self.params.n_r_bins).step_by(stride) {
                let center = self.lon_lat_at_indexes(i as f64, j as f64);
                cells.push(Cell::new(center, self.storage.get(i, j), self.params.cell_size));
            }
        }
        cells
    }

    /// Random position, uniform in index space.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> GeoPoint {
        let i = rng.gen::<f64>() * self.params.n_r_bins as f64 - 0.5;
        let j = rng.gen::<f64>() * self.params.n_angles as f64 - 0.5;
        self.lon_lat_at_indexes(i, j)
    }

    /// Raw value of bin `(i, j)`, ignoring the filter.
    pub fn value_at_indexes(&self, i: usize, j: usize) -> Option<T> {
        self.storage.get(i, j)
    }

    pub fn value_at(&self, lon: f64, lat: f64) -> Option<T> {
        if self.not_contains(lon, lat) {
            return None;
        }
        let (i, j) = self.decimal_indexes(lon, lat);
        let (col, row) = self.storage.nearest(i, j, self.wrapping())?;
        self.storage
            .get(col, row)
            .filter(|value| self.storage.accepts(value))
    }

    pub fn has_value_at(&self, lon: f64, lat: f64) -> bool {
        self.value_at(lon, lat).is_some()
    }

    pub fn interpolated_value_at(&self, lon: f64, lat: f64) -> Option<T> {
        if self.not_contains(lon, lat) {
            return None;
        }
        let (i, j) = self.decimal_indexes(lon, lat);
        self.storage.interpolate(i, j, self.wrapping())
    }

    pub fn interpolated_value_at_indexes(&self, i: f64, j: f64) -> Option<T> {
        self.storage.interpolate(i, j, self.wrapping())
    }

    pub fn sample(&self, lon: f64, lat: f64) -> Option<T> {
        match self.config.interpolation {
            InterpolationMethod::Nearest => self.value_at(lon, lat),
            InterpolationMethod::Bilinear => self.interpolated_value_at(lon, lat),
        }
    }
}

impl PolarGrid<f64> {
    /// Build a scalar sweep with the default configuration.
    pub fn from_array(params: PolarParams, values: Vec<Option<f64>>) -> Result<Self> {
        Self::new(params, values, GridConfig::default())
    }
}

impl PolarGrid<Vector> {
    /// Build a vector sweep from u and v components.
    pub fn from_components(
        params: PolarParams,
        us: Vec<Option<f64>>,
        vs: Vec<Option<f64>>,
        config: GridConfig,
    ) -> Result<Self> {
        if us.len() != vs.len() {
            return Err(GridError::incompatible(format!(
                "{} u values but {} v values",
                us.len(),
                vs.len()
            )));
        }
        let cells = us
            .iter()
            .zip(&vs)
            .map(|(u, v)| Some(Vector::new((*u)?, (*v)?)))
            .collect();
        Self::new(params, cells, config)
    }

    /// Scalar sweep derived from every vector.
    pub fn get_scalar_field(&self, kind: FieldKind) -> PolarGrid<f64> {
        let derive = kind.function();
        PolarGrid {
            params: self.params.clone(),
            projection: self.projection.clone(),
            storage: self.storage.map(move |vector| derive(&vector)),
            config: self.config,
            center: self.center,
            convergence: self.convergence,
            full_circle: self.full_circle,
        }
    }
}

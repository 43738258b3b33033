//! Regular longitude/latitude (or projected) grid engine.
//!
//! A [`Grid`] owns the geometry of a raster and answers point queries
//! against its [`RasterStorage`]. Cell `(i, j)` is column `i` from the
//! west edge and row `j` from the north edge; its centre lies at
//! `(xll + (i + 0.5) dx, yur - (j + 0.5) dy)`.
//!
//! Fractional indices use the same centre-based convention, so integer
//! indices land exactly on cell centres and a bilinear blend at a cell
//! centre returns that cell's value.

use crate::cell::Cell;
use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::storage::{wrap_fraction, RasterStorage, Wrapping};
use crate::types::{BoundingBox, CellSize, GeoPoint, GridParams, InterpolationMethod, ValueRange};
use crate::value::FieldValue;
use projection::Projection;
use rand::Rng;
use std::sync::Arc;

/// A regular grid of optional `T` values.
#[derive(Debug, Clone)]
pub struct Grid<T: FieldValue> {
    params: GridParams,
    projection: Projection,
    storage: RasterStorage<T>,
    config: GridConfig,
    is_continuous: bool,
    longitude_needs_to_be_wrapped: bool,
}

impl<T: FieldValue> Grid<T> {
    /// Build a grid from cells already in canonical order.
    pub fn new(params: GridParams, cells: Vec<Option<T>>, config: GridConfig) -> Result<Self> {
        params.validate()?;
        config.validate().map_err(GridError::ConfigError)?;
        let projection = Projection::from_optional(params.projection.as_deref())?;
        let storage = RasterStorage::new(params.n_cols, params.n_rows, cells, config.range_stride)?;

        let (is_continuous, longitude_needs_to_be_wrapped) = if projection.is_geographic() {
            let xur = params.xur_corner();
            (xur - params.xll_corner >= 360.0, xur > 180.0)
        } else {
            (false, false)
        };

        tracing::debug!(
            n_cols = params.n_cols,
            n_rows = params.n_rows,
            projection = %projection,
            continuous = is_continuous,
            range = ?storage.range(),
            "Built grid"
        );

        Ok(Self {
            params,
            projection,
            storage,
            config,
            is_continuous,
            longitude_needs_to_be_wrapped,
        })
    }

    /// Replace every cell, preserving metadata and filter.
    pub(crate) fn replace_cells(&mut self, cells: Vec<Option<T>>) -> Result<()> {
        self.storage.replace(cells)?;
        tracing::debug!(
            n_cols = self.params.n_cols,
            n_rows = self.params.n_rows,
            range = ?self.storage.range(),
            "Updated grid data"
        );
        Ok(())
    }

    /// Same geometry, values mapped through `f`. The filter is dropped.
    pub(crate) fn map<U: FieldValue>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            params: self.params.clone(),
            projection: self.projection.clone(),
            storage: self.storage.map(f),
            config: self.config,
            is_continuous: self.is_continuous,
            longitude_needs_to_be_wrapped: self.longitude_needs_to_be_wrapped,
        }
    }

    pub(crate) fn storage(&self) -> &RasterStorage<T> {
        &self.storage
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn cell_size(&self) -> CellSize {
        self.params.cell_size
    }

    pub fn n_cols(&self) -> usize {
        self.params.n_cols
    }

    pub fn n_rows(&self) -> usize {
        self.params.n_rows
    }

    /// Alias of `n_cols`.
    pub fn width(&self) -> usize {
        self.params.n_cols
    }

    /// Alias of `n_rows`.
    pub fn height(&self) -> usize {
        self.params.n_rows
    }

    pub fn num_cells(&self) -> usize {
        self.params.num_cells()
    }

    /// The grid spans at least 360° of longitude.
    pub fn is_continuous(&self) -> bool {
        self.is_continuous
    }

    /// The right edge lies beyond 180° (e.g. a 0..360 global grid).
    pub fn longitude_needs_to_be_wrapped(&self) -> bool {
        self.longitude_needs_to_be_wrapped
    }

    /// Lower-left corner longitude.
    pub fn xll_corner(&self) -> f64 {
        self.lower_left().lon
    }

    /// Lower-left corner latitude.
    pub fn yll_corner(&self) -> f64 {
        self.lower_left().lat
    }

    /// Upper-right corner longitude.
    pub fn xur_corner(&self) -> f64 {
        self.upper_right().lon
    }

    /// Upper-right corner latitude.
    pub fn yur_corner(&self) -> f64 {
        self.upper_right().lat
    }

    fn lower_left(&self) -> GeoPoint {
        self.unproject(self.params.xll_corner, self.params.yll_corner)
    }

    fn upper_right(&self) -> GeoPoint {
        self.unproject(self.params.xur_corner(), self.params.yur_corner())
    }

    /// Min/max of accepted values; `None` when there are none.
    pub fn range(&self) -> Option<ValueRange> {
        self.storage.range()
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    /// Install an acceptance predicate.
    ///
    /// Rejected values stay in storage; they are excluded from the range and
    /// `value_at` reports them as missing.
    pub fn set_filter<F>(&mut self, filter: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.storage.set_filter(Some(Arc::new(filter)));
        tracing::debug!(range = ?self.storage.range(), "Installed grid filter");
    }

    pub fn clear_filter(&mut self) {
        self.storage.set_filter(None);
    }

    pub fn has_filter(&self) -> bool {
        self.storage.has_filter()
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Query position expressed in the grid plane.
    ///
    /// Geographic longitudes are re-expressed in `[xll, xll + 360)`, which
    /// covers continuous, antimeridian-spanning and 0..360 grids alike.
    fn to_grid_plane(&self, lon: f64, lat: f64) -> (f64, f64) {
        if self.projection.is_geographic() {
            let xll = self.params.xll_corner;
            (xll + (lon - xll).rem_euclid(360.0), lat)
        } else {
            self.projection.project(lon, lat)
        }
    }

    fn unproject(&self, x: f64, y: f64) -> GeoPoint {
        let (lon, lat) = self.projection.unproject(x, y);
        GeoPoint::new(lon, lat)
    }

    /// Columns closing the 360° seam on continuous grids.
    fn column_period(&self) -> Option<usize> {
        self.is_continuous.then(|| {
            Wrapping::period(360.0, self.params.cell_size.x, self.params.n_cols)
        })
    }

    fn wrapping(&self) -> Wrapping {
        Wrapping {
            columns: self.column_period(),
            rows: None,
        }
    }

    /// Whether the point falls inside the grid.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let (x, y) = self.to_grid_plane(lon, lat);
        let p = &self.params;
        x >= p.xll_corner && x <= p.xur_corner() && y >= p.yll_corner && y <= p.yur_corner()
    }

    pub fn not_contains(&self, lon: f64, lat: f64) -> bool {
        !self.contains(lon, lat)
    }

    /// Fractional (column, row) indices of a point.
    ///
    /// Columns wrap on continuous grids and clamp otherwise; rows always
    /// clamp.
    pub fn decimal_indexes(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = self.to_grid_plane(lon, lat);
        let p = &self.params;
        let i = (x - p.xll_corner) / p.cell_size.x - 0.5;
        let j = (p.yur_corner() - y) / p.cell_size.y - 0.5;

        let i = match self.column_period() {
            Some(period) => wrap_fraction(i, period),
            None => i.clamp(0.0, (p.n_cols - 1) as f64),
        };
        (i, j.clamp(0.0, (p.n_rows - 1) as f64))
    }

    /// Centre of cell `(i, j)`; fractional indices are accepted.
    pub fn lon_lat_at_indexes(&self, i: f64, j: f64) -> GeoPoint {
        let p = &self.params;
        let x = p.xll_corner + (i + 0.5) * p.cell_size.x;
        let y = p.yur_corner() - (j + 0.5) * p.cell_size.y;

        if self.projection.is_geographic() {
            let lon = if self.longitude_needs_to_be_wrapped && x > 180.0 {
                x - 360.0
            } else {
                x
            };
            GeoPoint::new(lon, y)
        } else {
            self.unproject(x, y)
        }
    }

    /// `[xmin, ymin, xmax, ymax]` in the longitude convention of `contains`.
    ///
    /// A 0..360 continuous grid reports -180..180; a grid lying wholly east
    /// of 180° is shifted by -360. A grid crossing the antimeridian keeps
    /// its raw corners, so `max_x > 180` signals the crossing.
    pub fn extent(&self) -> BoundingBox {
        if !self.projection.is_geographic() {
            return self.get_bounds();
        }
        let p = &self.params;
        let (yll, yur) = (p.yll_corner, p.yur_corner());
        if self.longitude_needs_to_be_wrapped && self.is_continuous {
            BoundingBox::new(-180.0, yll, 180.0, yur)
        } else if p.xll_corner >= 180.0 {
            BoundingBox::new(p.xll_corner - 360.0, yll, p.xur_corner() - 360.0, yur)
        } else {
            BoundingBox::new(p.xll_corner, yll, p.xur_corner(), yur)
        }
    }

    /// Geographic bounding box of the grid corners, without wrapping.
    pub fn get_bounds(&self) -> BoundingBox {
        let p = &self.params;
        if self.projection.is_geographic() {
            return BoundingBox::new(p.xll_corner, p.yll_corner, p.xur_corner(), p.yur_corner());
        }
        let corners: Vec<(f64, f64)> = [
            (p.xll_corner, p.yll_corner),
            (p.xur_corner(), p.yll_corner),
            (p.xll_corner, p.yur_corner()),
            (p.xur_corner(), p.yur_corner()),
        ]
        .iter()
        .map(|&(x, y)| self.projection.unproject(x, y))
        .collect();
        BoundingBox::enclosing(&corners)
    }

    /// Every `stride`-th cell, x-ascending and y-descending.
    pub fn cells(&self, stride: usize) -> Vec<Cell<T>> {
        let stride = stride.max(1);
        let size = self.params.cell_size;
        let mut cells = Vec::with_capacity(
            self.params.n_rows.div_ceil(stride) * self.params.n_cols.div_ceil(stride),
        );
        for row in (0..self.params.n_rows).step_by(stride) {
            for col in (0..self.params.n_cols).step_by(stride) {
                let center = self.lon_lat_at_indexes(col as f64, row as f64);
                cells.push(Cell::new(center, self.storage.get(col, row), size));
            }
        }
        cells
    }

    /// Uniformly distributed position inside the grid footprint.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> GeoPoint {
        let i = rng.gen::<f64>() * self.params.n_cols as f64 - 0.5;
        let j = rng.gen::<f64>() * self.params.n_rows as f64 - 0.5;
        self.lon_lat_at_indexes(i, j)
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    /// Raw value of cell `(i, j)`, ignoring the filter.
    pub fn value_at_indexes(&self, i: usize, j: usize) -> Option<T> {
        self.storage.get(i, j)
    }

    /// Value of the cell containing the point.
    ///
    /// `None` outside the grid, on missing data or when the filter rejects
    /// the value.
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

    /// Bilinear value at the point.
    ///
    /// `None` outside the grid or when any of the four surrounding cells is
    /// missing.
    pub fn interpolated_value_at(&self, lon: f64, lat: f64) -> Option<T> {
        if self.not_contains(lon, lat) {
            return None;
        }
        let (i, j) = self.decimal_indexes(lon, lat);
        self.storage.interpolate(i, j, self.wrapping())
    }

    /// Bilinear value at fractional indices.
    pub fn interpolated_value_at_indexes(&self, i: f64, j: f64) -> Option<T> {
        self.storage.interpolate(i, j, self.wrapping())
    }

    /// Nearest or bilinear value, as chosen by `GridConfig::interpolation`.
    pub fn sample(&self, lon: f64, lat: f64) -> Option<T> {
        match self.config.interpolation {
            InterpolationMethod::Nearest => self.value_at(lon, lat),
            InterpolationMethod::Bilinear => self.interpolated_value_at(lon, lat),
        }
    }
}

//! Raster grids for geophysical fields.
//!
//! This crate models scalar fields (temperature, height) and vector fields
//! (wind, currents) sampled on regular longitude/latitude or projected
//! grids, plus range/bearing sweeps around a centre point. It provides the
//! point-query primitives used by map renderers and particle animators:
//!
//! - **Point queries**: nearest-cell and bilinear values, with missing data
//!   propagated as `None` instead of a magic number
//! - **Longitude wrapping**: 0..360 and antimeridian-spanning grids, and
//!   continuous global grids whose seam interpolates across the wrap
//! - **Filtering and ranges**: an acceptance predicate governs which values
//!   count towards the [min, max] range used for color scales
//! - **Derived fields**: magnitude and directions of vector fields
//!
//! # Architecture
//!
//! ```text
//! flat arrays + GridParams
//!      │
//!      ▼
//! pack (reverse_x / reverse_y)  ──►  RasterStorage<T>  (cells, filter, range)
//!                                          │
//!               ┌──────────────────────────┼──────────────────────────┐
//!               ▼                          ▼                          ▼
//!      Grid<T> (row/column)        ScalarGrid / VectorialGrid   PolarGrid<T> (radius/bearing)
//!               │                          │                          │
//!               └──────── contains / value_at / interpolated_value_at ┘
//! ```
//!
//! # Example
//!
//! ```
//! use raster_grid::{CellSize, GridParams, ScalarGrid};
//!
//! let params = GridParams::new(CellSize::square(1.0), 2, 2, 0.0, 0.0);
//! let grid = ScalarGrid::from_array(params, vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)])?;
//!
//! assert_eq!(grid.value_at(0.5, 1.5), Some(10.0));
//! assert_eq!(grid.interpolated_value_at(1.0, 1.0), Some(25.0));
//! assert_eq!(grid.value_at(5.0, 5.0), None);
//! # Ok::<(), raster_grid::GridError>(())
//! ```

pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod polar;
pub mod scalar;
pub mod snapshot;
pub mod storage;
pub mod types;
pub mod value;
pub mod vector;
pub mod vectorial;

// Re-export commonly used types at crate root
pub use cell::Cell;
pub use config::{AngleCorrection, GridConfig};
pub use error::{GridError, Result};
pub use grid::Grid;
pub use polar::{PolarGrid, PolarParams, ScalarPolarGrid, VectorialPolarGrid};
pub use scalar::{ScalarGrid, DEFAULT_RECORD_FIELD};
pub use snapshot::SharedField;
pub use storage::{Filter, Packing};
pub use types::{BoundingBox, CellSize, GeoPoint, GridParams, InterpolationMethod, ValueRange};
pub use value::FieldValue;
pub use vector::{FieldKind, Vector};
pub use vectorial::VectorialGrid;
pub use projection::Projection;

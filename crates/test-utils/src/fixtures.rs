//! Common test fixtures for raster-grid tests.
//!
//! This module provides pre-defined grids and ASCII-grid documents that
//! represent common scenarios: small hand-checkable grids, global 0..360
//! grids, antimeridian crossings and NODATA handling.

use std::io::Write;

/// Common grid specifications for testing.
pub mod grid {
    /// Grid geometry without values.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub n_cols: usize,
        pub n_rows: usize,
        pub xll_corner: f64,
        pub yll_corner: f64,
        pub cell_size: f64,
    }

    impl GridSpec {
        /// Returns the total number of grid cells.
        pub fn size(&self) -> usize {
            self.n_cols * self.n_rows
        }

        /// Upper-right corner.
        pub fn upper_right(&self) -> (f64, f64) {
            (
                self.xll_corner + self.n_cols as f64 * self.cell_size,
                self.yll_corner + self.n_rows as f64 * self.cell_size,
            )
        }
    }

    /// 2x2 unit cells at the origin; values `[[10, 20], [30, 40]]`
    pub const TWO_BY_TWO: GridSpec = GridSpec {
        n_cols: 2,
        n_rows: 2,
        xll_corner: 0.0,
        yll_corner: 0.0,
        cell_size: 1.0,
    };

    /// Global 1° grid in 0..360 longitudes (continuous, needs wrapping)
    pub const GLOBAL_0_360: GridSpec = GridSpec {
        n_cols: 360,
        n_rows: 180,
        xll_corner: 0.0,
        yll_corner: -90.0,
        cell_size: 1.0,
    };

    /// Global 2.5° grid in -180..180 longitudes (continuous, no wrapping)
    pub const GLOBAL_180: GridSpec = GridSpec {
        n_cols: 144,
        n_rows: 72,
        xll_corner: -180.0,
        yll_corner: -90.0,
        cell_size: 2.5,
    };

    /// Pacific window crossing the antimeridian (160°E to 140°W)
    pub const PACIFIC: GridSpec = GridSpec {
        n_cols: 60,
        n_rows: 20,
        xll_corner: 160.0,
        yll_corner: -10.0,
        cell_size: 1.0,
    };

    /// Galician coast at 0.05° (typical regional ocean model)
    pub const GALICIA: GridSpec = GridSpec {
        n_cols: 100,
        n_rows: 80,
        xll_corner: -10.0,
        yll_corner: 41.0,
        cell_size: 0.05,
    };
}

/// ASCII-grid documents.
pub mod ascii {
    /// 4x3 temperature grid with one NODATA cell (row 1, col 2).
    pub const SMALL_TEMPERATURE: &str = "\
NCOLS 4
NROWS 3
XLLCORNER -10.0
YLLCORNER 40.0
CELLSIZE 0.5
NODATA_VALUE -9999
12.5 13.0 13.5 14.0
11.5 12.0 -9999 13.0
10.5 11.0 11.5 12.0
";

    /// u component matching `SMALL_TEMPERATURE` geometry.
    pub const SMALL_U: &str = "\
ncols 4
nrows 3
xllcorner -10.0
yllcorner 40.0
cellsize 0.5
nodata_value -9999
3 3 3 3
0 0 -9999 0
-1 -1 -1 -1
";

    /// v component matching `SMALL_TEMPERATURE` geometry.
    pub const SMALL_V: &str = "\
ncols 4
nrows 3
xllcorner -10.0
yllcorner 40.0
cellsize 0.5
nodata_value -9999
4 4 4 4
2 2 2 2
0 0 0 0
";

    /// Header keywords out of order.
    pub const BAD_HEADER: &str = "\
NROWS 3
NCOLS 4
XLLCORNER -10.0
YLLCORNER 40.0
CELLSIZE 0.5
NODATA_VALUE -9999
1 2 3 4
";

    /// Data stops before the grid is full.
    pub const SHORT_DATA: &str = "\
NCOLS 2
NROWS 2
XLLCORNER 0
YLLCORNER 0
CELLSIZE 1
NODATA_VALUE -9999
1 2
";
}

/// Write `contents` to a named temporary file with the given extension.
///
/// The file is removed when the returned handle is dropped.
pub fn temp_ascii_file(contents: &str, extension: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("raster_grid_")
        .suffix(&format!(".{}", extension))
        .tempfile()
        .expect("Failed to create temporary fixture file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temporary fixture file");
    file
}

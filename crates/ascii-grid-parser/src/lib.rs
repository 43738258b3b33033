//! ESRI ASCII-grid decoding.
//!
//! An ASCII grid is a six-line header followed by row-major numeric data,
//! north row first:
//!
//! ```text
//! NCOLS 4
//! NROWS 3
//! XLLCORNER -10.0
//! YLLCORNER 40.0
//! CELLSIZE 0.5
//! NODATA_VALUE -9999
//! 12.5 13.0 13.5 14.0
//! ...
//! ```
//!
//! The data block ends at the first empty line. NODATA tokens become missing
//! cells and every other value is multiplied by an optional scale factor
//! (e.g. to convert centimetres to metres) before the grid is built.

pub mod error;
pub mod header;

pub use error::{AsciiGridError, AsciiGridResult};
pub use header::{AsciiGridHeader, HEADER_KEYWORDS, HEADER_LINES};

use header::parse_number;
use raster_grid::{GridConfig, ScalarGrid, VectorialGrid};
use std::path::Path;

/// A decoded ASCII grid: header plus values in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiGrid {
    pub header: AsciiGridHeader,
    pub values: Vec<Option<f64>>,
}

impl AsciiGrid {
    /// Decode an ASCII-grid document.
    pub fn parse(text: &str, scale_factor: f64) -> AsciiGridResult<Self> {
        let lines: Vec<&str> = text.lines().collect();
        let header = AsciiGridHeader::parse(&lines)?;

        // Capacity follows the data actually present, not the header claim
        let mut values = Vec::new();
        for (offset, line) in lines.iter().skip(HEADER_LINES).enumerate() {
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            let line_number = HEADER_LINES + offset;
            for token in line.split_whitespace() {
                let value: f64 = parse_number(token, line_number)?;
                values.push(if value == header.nodata_value {
                    None
                } else {
                    Some(value * scale_factor)
                });
            }
        }

        if values.len() != header.num_cells() {
            return Err(AsciiGridError::DataLength {
                expected: header.num_cells(),
                actual: values.len(),
            });
        }

        tracing::debug!(
            n_cols = header.n_cols,
            n_rows = header.n_rows,
            cell_size = header.cell_size,
            missing = values.iter().filter(|v| v.is_none()).count(),
            "Parsed ASCII grid"
        );

        Ok(Self { header, values })
    }

    /// Read and decode an ASCII-grid file.
    pub fn read(path: impl AsRef<Path>, scale_factor: f64) -> AsciiGridResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&text, scale_factor)
    }

    /// Build a scalar grid from the decoded values.
    pub fn into_scalar_grid(self, config: GridConfig) -> AsciiGridResult<ScalarGrid> {
        let params = self.header.to_params();
        Ok(ScalarGrid::new(params, self.values, Default::default(), config)?)
    }
}

/// Decode a scalar grid from ASCII-grid text.
pub fn parse_scalar_grid(text: &str, scale_factor: f64) -> AsciiGridResult<ScalarGrid> {
    AsciiGrid::parse(text, scale_factor)?.into_scalar_grid(GridConfig::default())
}

/// Decode a vector field from two ASCII grids holding u and v.
pub fn parse_vectorial_grid(
    u_text: &str,
    v_text: &str,
    scale_factor: f64,
) -> AsciiGridResult<VectorialGrid> {
    let u = parse_scalar_grid(u_text, scale_factor)?;
    let v = parse_scalar_grid(v_text, scale_factor)?;
    Ok(VectorialGrid::from_grids(&u, &v)?)
}

/// Read a scalar grid from an ASCII-grid file.
pub fn read_scalar_grid(
    path: impl AsRef<Path>,
    scale_factor: f64,
    config: GridConfig,
) -> AsciiGridResult<ScalarGrid> {
    AsciiGrid::read(path, scale_factor)?.into_scalar_grid(config)
}

/// Read a vector field from two ASCII-grid files.
pub fn read_vectorial_grid(
    u_path: impl AsRef<Path>,
    v_path: impl AsRef<Path>,
    scale_factor: f64,
    config: GridConfig,
) -> AsciiGridResult<VectorialGrid> {
    let u = read_scalar_grid(u_path, scale_factor, config)?;
    let v = read_scalar_grid(v_path, scale_factor, config)?;
    Ok(VectorialGrid::from_grids(&u, &v)?)
}

//! Subcommand implementations. Every command returns the JSON document to
//! print.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

use ascii_grid_parser::{read_scalar_grid, read_vectorial_grid};
use raster_grid::{FieldKind, GridConfig, ScalarGrid, VectorialGrid};

/// A loaded scalar or vector field.
pub enum Field {
    Scalar(ScalarGrid),
    Vector(VectorialGrid),
}

impl Field {
    /// Read one ASCII grid, or two when a v component is given.
    pub fn load(grid: &Path, v_grid: Option<&Path>, scale: f64, config: GridConfig) -> Result<Self> {
        match v_grid {
            None => {
                let scalar = read_scalar_grid(grid, scale, config)
                    .with_context(|| format!("Failed to read {}", grid.display()))?;
                Ok(Self::Scalar(scalar))
            }
            Some(v_grid) => {
                let vector = read_vectorial_grid(grid, v_grid, scale, config).with_context(|| {
                    format!(
                        "Failed to read vector components {} and {}",
                        grid.display(),
                        v_grid.display()
                    )
                })?;
                Ok(Self::Vector(vector))
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Vector(_) => "vector",
        }
    }
}

pub fn value(field: &Field, lon: f64, lat: f64) -> Value {
    let (nearest, interpolated, sampled, contains) = match field {
        Field::Scalar(grid) => (
            json!(grid.value_at(lon, lat)),
            json!(grid.interpolated_value_at(lon, lat)),
            json!(grid.sample(lon, lat)),
            grid.contains(lon, lat),
        ),
        Field::Vector(grid) => (
            json!(grid.value_at(lon, lat)),
            json!(grid.interpolated_value_at(lon, lat)),
            json!(grid.sample(lon, lat)),
            grid.contains(lon, lat),
        ),
    };
    json!({
        "lon": lon,
        "lat": lat,
        "contains": contains,
        "nearest": nearest,
        "interpolated": interpolated,
        "sample": sampled,
    })
}

pub fn info(field: &Field) -> Value {
    let (params, extent, bounds, range, continuous) = match field {
        Field::Scalar(grid) => (
            grid.params().clone(),
            grid.extent(),
            grid.get_bounds(),
            grid.range(),
            grid.is_continuous(),
        ),
        Field::Vector(grid) => (
            grid.params().clone(),
            grid.extent(),
            grid.get_bounds(),
            grid.range(),
            grid.is_continuous(),
        ),
    };
    json!({
        "kind": field.kind(),
        "n_cols": params.n_cols,
        "n_rows": params.n_rows,
        "cell_size": params.cell_size,
        "continuous": continuous,
        "extent": extent.to_array(),
        "bounds": bounds.to_array(),
        "range": range,
    })
}

pub fn cells(field: &Field, stride: usize) -> Result<Value> {
    if stride == 0 {
        bail!("stride must be at least 1");
    }
    let cells = match field {
        Field::Scalar(grid) => serde_json::to_value(grid.cells(stride))?,
        Field::Vector(grid) => serde_json::to_value(grid.cells(stride))?,
    };
    Ok(cells)
}

pub fn derived_field(field: &Field, kind: FieldKind, point: Option<(f64, f64)>) -> Result<Value> {
    let Field::Vector(grid) = field else {
        bail!("{} needs a vector field, pass --v-grid", kind);
    };
    let derived = grid.get_scalar_field(kind);
    tracing::debug!(kind = %kind, range = ?derived.range(), "Derived scalar field");

    let mut output = json!({
        "kind": kind,
        "range": derived.range(),
    });
    if let Some((lon, lat)) = point {
        output["lon"] = json!(lon);
        output["lat"] = json!(lat);
        output["value"] = json!(derived.value_at(lon, lat));
        output["interpolated"] = json!(derived.interpolated_value_at(lon, lat));
    }
    Ok(output)
}

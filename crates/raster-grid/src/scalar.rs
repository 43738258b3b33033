//! Scalar fields (temperature, height, ...).

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::storage::{pack, Packing};
use crate::types::GridParams;
use serde_json::Value;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Default record field holding the value, as in `{"c": 12.5}`.
pub const DEFAULT_RECORD_FIELD: &str = "c";

/// A grid with one number per cell.
///
/// Dereferences to [`Grid<f64>`] for the whole query API.
#[derive(Debug, Clone)]
pub struct ScalarGrid {
    grid: Grid<f64>,
    zs: Arc<[Option<f64>]>,
    packing: Packing,
}

impl ScalarGrid {
    /// Build from a flat array in source order, re-indexed by `packing`.
    pub fn new(
        params: GridParams,
        zs: Vec<Option<f64>>,
        packing: Packing,
        config: GridConfig,
    ) -> Result<Self> {
        let cells = pack(&zs, params.n_cols, params.n_rows, packing)?;
        let grid = Grid::new(params, cells, config)?;
        Ok(Self {
            grid,
            zs: zs.into(),
            packing,
        })
    }

    /// Build from a flat array already in canonical order.
    pub fn from_array(params: GridParams, zs: Vec<Option<f64>>) -> Result<Self> {
        Self::new(params, zs, Packing::default(), GridConfig::default())
    }

    /// Build from plain numbers; `nodata` entries and NaN become missing.
    pub fn from_raw(params: GridParams, values: &[f64], nodata: Option<f64>) -> Result<Self> {
        Self::from_array(params, to_optional(values, nodata))
    }

    /// Build from JSON records, reading one numeric `field` of each.
    pub fn from_records(params: GridParams, records: &[Value], field: &str) -> Result<Self> {
        Self::from_array(params, values_from_records(records, field)?)
    }

    /// Wrap an already built grid; `zs` is its canonical storage.
    pub(crate) fn from_grid(grid: Grid<f64>) -> Self {
        let zs = grid.storage().cells().into();
        Self {
            grid,
            zs,
            packing: Packing::default(),
        }
    }

    /// Replace the values, keeping metadata, packing and filter.
    pub fn update_data(&mut self, zs: Vec<Option<f64>>) -> Result<()> {
        let params = self.grid.params();
        let cells = pack(&zs, params.n_cols, params.n_rows, self.packing)?;
        self.grid.replace_cells(cells)?;
        self.zs = zs.into();
        Ok(())
    }

    /// Replace the values with one numeric `field` of each JSON record.
    pub fn update_records(&mut self, records: &[Value], field: &str) -> Result<()> {
        self.update_data(values_from_records(records, field)?)
    }

    /// Values as supplied, before packing.
    pub fn zs(&self) -> &[Option<f64>] {
        &self.zs
    }

    pub fn packing(&self) -> Packing {
        self.packing
    }

    pub fn grid(&self) -> &Grid<f64> {
        &self.grid
    }

    pub fn into_grid(self) -> Grid<f64> {
        self.grid
    }
}

impl Deref for ScalarGrid {
    type Target = Grid<f64>;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}

impl DerefMut for ScalarGrid {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.grid
    }
}

/// Map a numeric sentinel and NaN to missing.
pub(crate) fn to_optional(values: &[f64], nodata: Option<f64>) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|&v| {
            if v.is_nan() || nodata == Some(v) {
                None
            } else {
                Some(v)
            }
        })
        .collect()
}

fn values_from_records(records: &[Value], field: &str) -> Result<Vec<Option<f64>>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| match record {
            Value::Object(map) => Ok(map.get(field).and_then(Value::as_f64)),
            Value::Null => Ok(None),
            other => Err(GridError::invalid_record(format!(
                "record {} is not an object: {}",
                index, other
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellSize, ValueRange};
    use serde_json::json;

    fn params() -> GridParams {
        GridParams::new(CellSize::square(1.0), 2, 2, 0.0, 0.0)
    }

    #[test]
    fn test_from_array() {
        let grid = ScalarGrid::from_array(params(), vec![Some(10.0), Some(20.0), None, Some(40.0)])
            .unwrap();
        assert_eq!(grid.value_at(0.5, 1.5), Some(10.0));
        assert_eq!(grid.value_at(0.5, 0.5), None);
        assert_eq!(grid.range(), Some(ValueRange::new(10.0, 40.0)));
        assert_eq!(grid.zs().len(), 4);
    }

    #[test]
    fn test_reverse_y_packing() {
        // Rows stored south to north
        let grid = ScalarGrid::new(
            params(),
            vec![Some(30.0), Some(40.0), Some(10.0), Some(20.0)],
            Packing::new(false, true),
            GridConfig::default(),
        )
        .unwrap();
        assert_eq!(grid.value_at(0.5, 1.5), Some(10.0));
        assert_eq!(grid.value_at(1.5, 0.5), Some(40.0));
        // zs keeps the source order
        assert_eq!(grid.zs()[0], Some(30.0));
    }

    #[test]
    fn test_from_raw_nodata() {
        let grid = ScalarGrid::from_raw(params(), &[1.0, -9999.0, f64::NAN, 4.0], Some(-9999.0))
            .unwrap();
        assert_eq!(grid.value_at_indexes(1, 0), None);
        assert_eq!(grid.value_at_indexes(0, 1), None);
        assert_eq!(grid.range(), Some(ValueRange::new(1.0, 4.0)));
    }

    #[test]
    fn test_update_data_keeps_filter() {
        let mut grid = ScalarGrid::from_array(params(), vec![Some(1.0); 4]).unwrap();
        grid.set_filter(|v| *v < 50.0);
        grid.update_data(vec![Some(5.0), Some(60.0), Some(7.0), Some(8.0)])
            .unwrap();
        assert_eq!(grid.range(), Some(ValueRange::new(5.0, 8.0)));
        assert_eq!(grid.value_at(1.5, 1.5), None);

        let err = grid.update_data(vec![Some(1.0)]).unwrap_err();
        assert!(matches!(err, GridError::DataLength { expected: 4, actual: 1 }));
    }

    #[test]
    fn test_from_records() {
        let records = vec![
            json!({"c": 1.5}),
            json!({"c": "n/a"}),
            json!({"other": 3.0}),
            json!({"c": 4}),
        ];
        let grid = ScalarGrid::from_records(params(), &records, DEFAULT_RECORD_FIELD).unwrap();
        assert_eq!(grid.zs(), &[Some(1.5), None, None, Some(4.0)]);

        let bad = vec![json!(1.0), json!({"c": 1.0}), json!({"c": 1.0}), json!({"c": 1.0})];
        assert!(matches!(
            ScalarGrid::from_records(params(), &bad, "c"),
            Err(GridError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_update_records() {
        let mut grid = ScalarGrid::from_array(params(), vec![None; 4]).unwrap();
        assert_eq!(grid.range(), None);
        let records: Vec<Value> = (1..=4).map(|v| json!({"t": v as f64})).collect();
        grid.update_records(&records, "t").unwrap();
        assert_eq!(grid.range(), Some(ValueRange::new(1.0, 4.0)));
    }
}

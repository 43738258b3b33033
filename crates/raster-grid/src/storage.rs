//! Row-major cell storage shared by Cartesian and polar grids.
//!
//! Storage knows nothing about geography: it holds `n_rows x n_cols`
//! optional values, the active filter and the cached range, and answers
//! index-space queries (nearest cell, four-corner bilinear blend).

use crate::error::{GridError, Result};
use crate::types::ValueRange;
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Acceptance predicate installed with `set_filter`.
pub type Filter<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Re-indexing applied when a flat source array is packed into storage.
///
/// Sources whose raster origin is not the north-west corner (e.g. rows
/// stored south to north) set the matching flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packing {
    /// Source columns run east to west.
    #[serde(default)]
    pub reverse_x: bool,
    /// Source rows run south to north.
    #[serde(default)]
    pub reverse_y: bool,
}

impl Packing {
    pub fn new(reverse_x: bool, reverse_y: bool) -> Self {
        Self {
            reverse_x,
            reverse_y,
        }
    }

    /// Whether packing is the identity.
    pub fn is_identity(&self) -> bool {
        !self.reverse_x && !self.reverse_y
    }
}

/// Pack a flat array into canonical order (row 0 north, column 0 west).
///
/// Non-finite values become missing.
pub fn pack<T: FieldValue>(
    values: &[Option<T>],
    n_cols: usize,
    n_rows: usize,
    packing: Packing,
) -> Result<Vec<Option<T>>> {
    let expected = cell_count(n_cols, n_rows)?;
    if values.len() != expected {
        return Err(GridError::DataLength {
            expected,
            actual: values.len(),
        });
    }

    let mut cells = vec![None; expected];
    for (index, value) in values.iter().enumerate() {
        let row = index / n_cols;
        let col = index % n_cols;
        let target_row = if packing.reverse_y { n_rows - 1 - row } else { row };
        let target_col = if packing.reverse_x { n_cols - 1 - col } else { col };
        cells[target_row * n_cols + target_col] = value.filter(FieldValue::is_valid);
    }
    Ok(cells)
}

fn cell_count(n_cols: usize, n_rows: usize) -> Result<usize> {
    n_cols.checked_mul(n_rows).ok_or_else(|| {
        GridError::invalid_params(format!("{}x{} cells overflow the addressable size", n_cols, n_rows))
    })
}

/// Wrapping period of each index axis, in cells; `None` saturates.
///
/// The period may be shorter than the axis when the last cells duplicate
/// the first ones (a repeated seam column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wrapping {
    pub columns: Option<usize>,
    pub rows: Option<usize>,
}

impl Wrapping {
    /// Period of `span` units covered by cells of size `step`, at most `len`.
    pub fn period(span: f64, step: f64, len: usize) -> usize {
        ((span / step).round() as usize).clamp(1, len)
    }
}

/// Dense grid of optional values plus filter and cached range.
#[derive(Clone)]
pub struct RasterStorage<T: FieldValue> {
    n_cols: usize,
    n_rows: usize,
    cells: Arc<[Option<T>]>,
    filter: Option<Filter<T>>,
    range: Option<ValueRange>,
    range_stride: usize,
}

impl<T: FieldValue> RasterStorage<T> {
    /// Wrap already packed cells.
    pub fn new(
        n_cols: usize,
        n_rows: usize,
        cells: Vec<Option<T>>,
        range_stride: usize,
    ) -> Result<Self> {
        let expected = cell_count(n_cols, n_rows)?;
        if cells.len() != expected {
            return Err(GridError::DataLength {
                expected,
                actual: cells.len(),
            });
        }

        let mut storage = Self {
            n_cols,
            n_rows,
            cells: cells
                .into_iter()
                .map(|c| c.filter(FieldValue::is_valid))
                .collect(),
            filter: None,
            range: None,
            range_stride: range_stride.max(1),
        };
        storage.update_range();
        Ok(storage)
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Canonical cells, row-major.
    pub fn cells(&self) -> &[Option<T>] {
        &self.cells
    }

    /// Raw value at (column, row), ignoring the filter.
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<T> {
        if col >= self.n_cols || row >= self.n_rows {
            return None;
        }
        self.cells[row * self.n_cols + col]
    }

    /// Whether the active filter accepts a value (always true without one).
    #[inline]
    pub fn accepts(&self, value: &T) -> bool {
        self.filter.as_ref().map_or(true, |f| f(value))
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub fn range(&self) -> Option<ValueRange> {
        self.range
    }

    /// Replace every cell, keeping the filter; the range is recomputed.
    pub fn replace(&mut self, cells: Vec<Option<T>>) -> Result<()> {
        if cells.len() != self.cells.len() {
            return Err(GridError::DataLength {
                expected: self.cells.len(),
                actual: cells.len(),
            });
        }
        self.cells = cells
            .into_iter()
            .map(|c| c.filter(FieldValue::is_valid))
            .collect();
        self.update_range();
        Ok(())
    }

    /// Install (or remove) the filter; the range is recomputed.
    pub fn set_filter(&mut self, filter: Option<Filter<T>>) {
        self.filter = filter;
        self.update_range();
    }

    /// Derive storage of another value type with the same shape.
    ///
    /// The filter is not carried over.
    pub fn map<U: FieldValue>(&self, f: impl Fn(T) -> U) -> RasterStorage<U> {
        let mut storage = RasterStorage {
            n_cols: self.n_cols,
            n_rows: self.n_rows,
            cells: self
                .cells
                .iter()
                .map(|c| c.map(&f).filter(FieldValue::is_valid))
                .collect(),
            filter: None,
            range: None,
            range_stride: self.range_stride,
        };
        storage.update_range();
        storage
    }

    fn update_range(&mut self) {
        self.range = self.compute_range();
    }

    fn compute_range(&self) -> Option<ValueRange> {
        let stride = self.range_stride;
        let values = (0..self.n_rows).step_by(stride).flat_map(|row| {
            (0..self.n_cols)
                .step_by(stride)
                .filter_map(move |col| self.get(col, row))
        });
        ValueRange::from_values(
            values
                .filter(|v| self.accepts(v))
                .map(|v| v.range_value())
                .filter(|v| v.is_finite()),
        )
    }

    /// Integer column index under the wrapping policy.
    #[inline]
    pub fn column_index(&self, i: i64, wrap: Option<usize>) -> usize {
        clamp_or_wrap(i, self.n_cols, wrap)
    }

    /// Integer row index under the wrapping policy.
    #[inline]
    pub fn row_index(&self, j: i64, wrap: Option<usize>) -> usize {
        clamp_or_wrap(j, self.n_rows, wrap)
    }

    /// Cell containing the fractional (centre-based) index position.
    #[inline]
    pub fn nearest(&self, i: f64, j: f64, wrapping: Wrapping) -> Option<(usize, usize)> {
        if !(i.is_finite() && j.is_finite()) {
            return None;
        }
        let col = self.column_index((i + 0.5).floor() as i64, wrapping.columns);
        let row = self.row_index((j + 0.5).floor() as i64, wrapping.rows);
        Some((col, row))
    }

    /// Bilinear blend of the four cells around a fractional index position.
    ///
    /// `None` when any of the four corners is missing. The filter is not
    /// consulted.
    pub fn interpolate(&self, i: f64, j: f64, wrapping: Wrapping) -> Option<T> {
        if !(i.is_finite() && j.is_finite()) {
            return None;
        }
        let i = wrapping.columns.map_or(i, |period| wrap_fraction(i, period));
        let j = wrapping.rows.map_or(j, |period| wrap_fraction(j, period));

        //   fi   i  ci
        //   g00 ----- g10   fj
        //    |    .    |     j
        //   g01 ----- g11   cj
        let fi = self.column_index(i.floor() as i64, wrapping.columns);
        let ci = self.column_index(fi as i64 + 1, wrapping.columns);
        let fj = self.row_index(j.floor() as i64, wrapping.rows);
        let cj = self.row_index(fj as i64 + 1, wrapping.rows);

        let g00 = self.get(fi, fj)?;
        let g10 = self.get(ci, fj)?;
        let g01 = self.get(fi, cj)?;
        let g11 = self.get(ci, cj)?;

        let x = (i - fi as f64).clamp(0.0, 1.0);
        let y = (j - fj as f64).clamp(0.0, 1.0);
        Some(T::interpolate(x, y, g00, g10, g01, g11))
    }
}

impl<T: FieldValue> fmt::Debug for RasterStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterStorage")
            .field("n_cols", &self.n_cols)
            .field("n_rows", &self.n_rows)
            .field("range", &self.range)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

#[inline]
fn clamp_or_wrap(index: i64, len: usize, period: Option<usize>) -> usize {
    let len = len as i64;
    match period {
        Some(period) => index.rem_euclid(period as i64).min(len - 1) as usize,
        None => index.clamp(0, len - 1) as usize,
    }
}

/// `rem_euclid` into `[0, len)`; guards against rounding up to `len`.
#[inline]
pub(crate) fn wrap_fraction(index: f64, len: usize) -> f64 {
    let len = len as f64;
    let wrapped = index.rem_euclid(len);
    if wrapped >= len {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> RasterStorage<f64> {
        RasterStorage::new(2, 2, vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)], 1).unwrap()
    }

    #[test]
    fn test_pack_identity() {
        let cells = pack(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)], 2, 2, Packing::default())
            .unwrap();
        assert_eq!(cells, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_pack_reversed() {
        let values = [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0), Some(6.0)];

        let flipped_y = pack(&values, 3, 2, Packing::new(false, true)).unwrap();
        assert_eq!(
            flipped_y,
            vec![Some(4.0), Some(5.0), Some(6.0), Some(1.0), Some(2.0), Some(3.0)]
        );

        let flipped_x = pack(&values, 3, 2, Packing::new(true, false)).unwrap();
        assert_eq!(
            flipped_x,
            vec![Some(3.0), Some(2.0), Some(1.0), Some(6.0), Some(5.0), Some(4.0)]
        );
    }

    #[test]
    fn test_pack_rejects_wrong_length() {
        let err = pack(&[Some(1.0); 5], 2, 2, Packing::default()).unwrap_err();
        assert!(matches!(err, GridError::DataLength { expected: 4, actual: 5 }));
    }

    #[test]
    fn test_overflowing_shape_is_rejected() {
        let err = pack::<f64>(&[Some(1.0)], usize::MAX, 2, Packing::default()).unwrap_err();
        assert!(matches!(err, GridError::InvalidParams(_)));
        let err = RasterStorage::<f64>::new(2, usize::MAX, vec![None], 1).unwrap_err();
        assert!(matches!(err, GridError::InvalidParams(_)));
    }

    #[test]
    fn test_non_finite_values_become_missing() {
        let storage =
            RasterStorage::new(2, 1, vec![Some(f64::NAN), Some(f64::INFINITY)], 1).unwrap();
        assert_eq!(storage.get(0, 0), None);
        assert_eq!(storage.get(1, 0), None);
        assert_eq!(storage.range(), None);
    }

    #[test]
    fn test_range_and_filter() {
        let mut storage = two_by_two();
        assert_eq!(storage.range(), Some(ValueRange::new(10.0, 40.0)));

        storage.set_filter(Some(Arc::new(|v: &f64| *v < 35.0)));
        assert_eq!(storage.range(), Some(ValueRange::new(10.0, 30.0)));
        assert!(!storage.accepts(&40.0));
        // Filtering never removes data
        assert_eq!(storage.get(1, 1), Some(40.0));

        storage.set_filter(None);
        assert_eq!(storage.range(), Some(ValueRange::new(10.0, 40.0)));
    }

    #[test]
    fn test_range_stride() {
        let storage = RasterStorage::new(
            3,
            3,
            (1..=9).map(|v| Some(v as f64)).collect(),
            2,
        )
        .unwrap();
        // Rows 0 and 2, columns 0 and 2 only
        assert_eq!(storage.range(), Some(ValueRange::new(1.0, 9.0)));

        let storage = RasterStorage::new(
            3,
            3,
            vec![Some(5.0), Some(100.0), Some(5.0), None, None, None, Some(1.0), None, Some(2.0)],
            2,
        )
        .unwrap();
        assert_eq!(storage.range(), Some(ValueRange::new(1.0, 5.0)));
    }

    #[test]
    fn test_interpolate_center() {
        let storage = two_by_two();
        let value = storage.interpolate(0.5, 0.5, Wrapping::default()).unwrap();
        assert!((value - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_missing_corner() {
        let storage = RasterStorage::new(2, 2, vec![Some(1.0), None, Some(3.0), Some(4.0)], 1)
            .unwrap();
        assert_eq!(storage.interpolate(0.5, 0.5, Wrapping::default()), None);
        // A corner away from the missing one still works
        assert_eq!(storage.interpolate(0.0, 1.0, Wrapping::default()), Some(3.0));
    }

    #[test]
    fn test_interpolate_saturates_outside() {
        let storage = two_by_two();
        assert_eq!(storage.interpolate(-3.0, -3.0, Wrapping::default()), Some(10.0));
        assert_eq!(storage.interpolate(7.0, 9.0, Wrapping::default()), Some(40.0));
        assert_eq!(storage.interpolate(f64::NAN, 0.0, Wrapping::default()), None);
    }

    #[test]
    fn test_interpolate_wrapped_seam() {
        let storage = two_by_two();
        let wrap = Wrapping {
            columns: Some(2),
            rows: None,
        };
        // Half way between the last column and the first
        let value = storage.interpolate(1.5, 0.0, wrap).unwrap();
        assert!((value - 15.0).abs() < 1e-12);
        let value = storage.interpolate(-0.5, 0.0, wrap).unwrap();
        assert!((value - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_duplicate_seam_column() {
        // Third column repeats the first; the seam closes after two columns
        let storage =
            RasterStorage::new(3, 1, vec![Some(0.0), Some(10.0), Some(0.0)], 1).unwrap();
        let wrap = Wrapping {
            columns: Some(2),
            rows: None,
        };
        let value = storage.interpolate(1.25, 0.0, wrap).unwrap();
        assert!((value - 7.5).abs() < 1e-12);
        assert_eq!(storage.nearest(2.0, 0.0, wrap), Some((0, 0)));
    }

    #[test]
    fn test_wrapping_period() {
        assert_eq!(Wrapping::period(360.0, 1.0, 361), 360);
        assert_eq!(Wrapping::period(360.0, 2.5, 144), 144);
        assert_eq!(Wrapping::period(360.0, 0.9999999, 360), 360);
    }

    #[test]
    fn test_nearest() {
        let storage = two_by_two();
        assert_eq!(storage.nearest(0.0, 0.0, Wrapping::default()), Some((0, 0)));
        assert_eq!(storage.nearest(0.6, 0.4, Wrapping::default()), Some((1, 0)));
        assert_eq!(storage.nearest(5.0, 5.0, Wrapping::default()), Some((1, 1)));
        let wrap = Wrapping {
            columns: Some(2),
            rows: None,
        };
        assert_eq!(storage.nearest(1.6, 0.0, wrap), Some((0, 0)));
    }

    #[test]
    fn test_map_keeps_shape() {
        let storage = two_by_two();
        let doubled = storage.map(|v| v * 2.0);
        assert_eq!(doubled.get(1, 1), Some(80.0));
        assert_eq!(doubled.range(), Some(ValueRange::new(20.0, 80.0)));
    }
}

//! A sampled grid cell.

use crate::types::{BoundingBox, CellSize, GeoPoint};
use crate::value::FieldValue;
use serde::Serialize;

/// One grid cell: centre position, value and footprint.
///
/// Equality compares centre, size and value (component-wise for vectors).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cell<T: FieldValue> {
    pub center: GeoPoint,
    /// `None` when the cell has no data.
    pub value: Option<T>,
    pub size: CellSize,
}

impl<T: FieldValue> Cell<T> {
    pub fn new(center: GeoPoint, value: Option<T>, size: CellSize) -> Self {
        Self {
            center,
            value,
            size,
        }
    }

    /// Footprint of the cell around its centre.
    pub fn bounds(&self) -> BoundingBox {
        let half_x = self.size.x / 2.0;
        let half_y = self.size.y / 2.0;
        BoundingBox::new(
            self.center.lon - half_x,
            self.center.lat - half_y,
            self.center.lon + half_x,
            self.center.lat + half_y,
        )
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

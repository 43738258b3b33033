//! Test data generators for synthetic geophysical fields.
//!
//! Every generator returns a flat row-major array in grid order: row 0 is
//! the northern-most row and column 0 the western-most column. Missing
//! cells are `None`.

/// Creates a field with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that packing and lookups hit the right
/// cell by checking that `value == col * 1000 + row`.
///
/// # Example
///
/// ```
/// use test_utils::index_field;
///
/// let field = index_field(10, 5);
/// assert_eq!(field.len(), 50);
/// assert_eq!(field[0], Some(0.0));     // col=0, row=0
/// assert_eq!(field[1], Some(1000.0));  // col=1, row=0
/// assert_eq!(field[10], Some(1.0));    // col=0, row=1
/// ```
pub fn index_field(n_cols: usize, n_rows: usize) -> Vec<Option<f64>> {
    let mut data = Vec::with_capacity(n_cols * n_rows);
    for row in 0..n_rows {
        for col in 0..n_cols {
            data.push(Some((col * 1000 + row) as f64));
        }
    }
    data
}

/// Value `index_field` holds at (col, row).
pub fn index_value(col: usize, row: usize) -> f64 {
    (col * 1000 + row) as f64
}

/// A field that is linear in both indices: `a + b * col + c * row`.
///
/// Bilinear interpolation reproduces such a field exactly, which makes it
/// handy for checking interpolation anywhere inside the grid.
pub fn plane_field(n_cols: usize, n_rows: usize, a: f64, b: f64, c: f64) -> Vec<Option<f64>> {
    let mut data = Vec::with_capacity(n_cols * n_rows);
    for row in 0..n_rows {
        for col in 0..n_cols {
            data.push(Some(a + b * col as f64 + c * row as f64));
        }
    }
    data
}

/// u and v wind components.
///
/// u varies with the row (trade-wind like bands, -20..20 m/s), v with the
/// column (-15..15 m/s).
pub fn wind_components(n_cols: usize, n_rows: usize) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut us = Vec::with_capacity(n_cols * n_rows);
    let mut vs = Vec::with_capacity(n_cols * n_rows);
    for row in 0..n_rows {
        for col in 0..n_cols {
            let lat_factor = (row as f64 / n_rows as f64 - 0.5) * 2.0;
            let lon_factor = (col as f64 / n_cols as f64 - 0.5) * 2.0;
            us.push(Some(lat_factor * 20.0));
            vs.push(Some(lon_factor * 15.0));
        }
    }
    (us, vs)
}

/// Marks the given (col, row) positions as missing.
pub fn with_missing(
    mut data: Vec<Option<f64>>,
    n_cols: usize,
    positions: &[(usize, usize)],
) -> Vec<Option<f64>> {
    for &(col, row) in positions {
        let index = row * n_cols + col;
        if col < n_cols && index < data.len() {
            data[index] = None;
        }
    }
    data
}

/// Deterministic pseudo-random precipitation (mm); most cells are dry.
pub fn precipitation_field(n_cols: usize, n_rows: usize, seed: u32) -> Vec<Option<f64>> {
    let mut data = Vec::with_capacity(n_cols * n_rows);
    for row in 0..n_rows {
        for col in 0..n_cols {
            let hash = simple_hash(col as u32, row as u32, seed);
            let precip = if hash % 4 == 0 {
                (hash % 5000) as f64 / 100.0
            } else {
                0.0
            };
            data.push(Some(precip));
        }
    }
    data
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Flip the row order (north-first ⇄ south-first).
pub fn flip_rows(data: &[Option<f64>], n_cols: usize) -> Vec<Option<f64>> {
    data.chunks(n_cols).rev().flatten().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_field() {
        let field = index_field(3, 2);
        assert_eq!(field.len(), 6);
        assert_eq!(field[4], Some(index_value(1, 1)));
        assert_eq!(field[5], Some(2001.0));
    }

    #[test]
    fn test_plane_field() {
        let field = plane_field(4, 3, 1.0, 2.0, 10.0);
        assert_eq!(field[0], Some(1.0));
        assert_eq!(field[4 + 3], Some(1.0 + 6.0 + 10.0));
    }

    #[test]
    fn test_wind_components_shape() {
        let (us, vs) = wind_components(8, 4);
        assert_eq!(us.len(), 32);
        assert_eq!(vs.len(), 32);
        assert_eq!(us[0], Some(-20.0));
        assert_eq!(vs[0], Some(-15.0));
    }

    #[test]
    fn test_with_missing() {
        let field = with_missing(plane_field(3, 3, 1.0, 0.0, 0.0), 3, &[(0, 0), (2, 1), (9, 9)]);
        assert_eq!(field.iter().filter(|v| v.is_none()).count(), 2);
        assert_eq!(field[5], None);
    }

    #[test]
    fn test_precipitation_is_deterministic() {
        assert_eq!(precipitation_field(16, 16, 7), precipitation_field(16, 16, 7));
        assert!(precipitation_field(16, 16, 7)
            .iter()
            .flatten()
            .all(|v| (0.0..50.0).contains(v)));
    }

    #[test]
    fn test_flip_rows() {
        let field = index_field(2, 3);
        let flipped = flip_rows(&field, 2);
        assert_eq!(flipped[0], Some(index_value(0, 2)));
        assert_eq!(flip_rows(&flipped, 2), field);
    }
}

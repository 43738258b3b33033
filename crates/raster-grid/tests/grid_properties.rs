//! Properties that must hold for any grid, checked over many cells and
//! seeded random points.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use raster_grid::{CellSize, FieldKind, GridParams, ScalarGrid, VectorialGrid};
use test_utils::grid::{GridSpec, GALICIA, GLOBAL_0_360, GLOBAL_180};
use test_utils::{index_field, precipitation_field, wind_components};

fn params(spec: GridSpec) -> GridParams {
    GridParams::new(
        CellSize::square(spec.cell_size),
        spec.n_cols,
        spec.n_rows,
        spec.xll_corner,
        spec.yll_corner,
    )
}

#[test]
fn test_integer_indexes_interpolate_to_cell_values() {
    let grid = ScalarGrid::from_array(
        params(GALICIA),
        precipitation_field(GALICIA.n_cols, GALICIA.n_rows, 3),
    )
    .unwrap();

    for row in 0..GALICIA.n_rows {
        for col in 0..GALICIA.n_cols {
            assert_eq!(
                grid.interpolated_value_at_indexes(col as f64, row as f64),
                grid.value_at_indexes(col, row),
                "cell ({}, {})",
                col,
                row
            );
        }
    }
}

#[test]
fn test_continuous_grid_is_periodic() {
    let mut rng = StdRng::seed_from_u64(360);
    for spec in [GLOBAL_0_360, GLOBAL_180] {
        let grid = ScalarGrid::from_array(params(spec), index_field(spec.n_cols, spec.n_rows)).unwrap();
        for _ in 0..500 {
            let lon = rng.gen_range(-180.0..180.0);
            let lat = rng.gen_range(-89.0..89.0);
            let value = grid.value_at(lon, lat);
            assert!(value.is_some());
            assert_eq!(grid.value_at(lon + 360.0, lat), value, "lon {}", lon);
            assert_eq!(grid.value_at(lon - 360.0, lat), value, "lon {}", lon);
        }
    }
}

#[test]
fn test_contains_matches_corner_box() {
    let grid = ScalarGrid::from_array(params(GALICIA), index_field(GALICIA.n_cols, GALICIA.n_rows))
        .unwrap();
    let (xur, yur) = GALICIA.upper_right();
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..1000 {
        let lon = rng.gen_range(-15.0..0.0);
        let lat = rng.gen_range(36.0..50.0);
        let inside = lon > GALICIA.xll_corner && lon < xur && lat > GALICIA.yll_corner && lat < yur;
        let outside = lon < GALICIA.xll_corner || lon > xur || lat < GALICIA.yll_corner || lat > yur;
        if inside {
            assert!(grid.contains(lon, lat), "({}, {}) should be inside", lon, lat);
        }
        if outside {
            assert!(grid.not_contains(lon, lat), "({}, {}) should be outside", lon, lat);
            assert_eq!(grid.value_at(lon, lat), None);
        }
    }
}

#[test]
fn test_magnitude_of_component_grids() {
    let (n_cols, n_rows) = (GLOBAL_180.n_cols, GLOBAL_180.n_rows);
    let (us, vs) = wind_components(n_cols, n_rows);
    let u = ScalarGrid::from_array(params(GLOBAL_180), us).unwrap();
    let v = ScalarGrid::from_array(params(GLOBAL_180), vs).unwrap();
    let speed = VectorialGrid::from_grids(&u, &v)
        .unwrap()
        .get_scalar_field(FieldKind::Magnitude);

    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..500 {
        let lon = rng.gen_range(-180.0..180.0);
        let lat = rng.gen_range(-90.0..90.0);
        let expected = match (u.value_at(lon, lat), v.value_at(lon, lat)) {
            (Some(u), Some(v)) => Some((u * u + v * v).sqrt()),
            _ => None,
        };
        assert_eq!(speed.value_at(lon, lat), expected);
    }
}

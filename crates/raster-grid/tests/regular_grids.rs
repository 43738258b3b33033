//! Point queries on regular grids: wrapping conventions, projected planes,
//! packing and filtering.

use rand::rngs::StdRng;
use rand::SeedableRng;
use raster_grid::{
    BoundingBox, CellSize, GridConfig, GridParams, Packing, ScalarGrid, SharedField, ValueRange,
};
use test_utils::grid::{GridSpec, GALICIA, GLOBAL_0_360, GLOBAL_180, PACIFIC, TWO_BY_TWO};
use test_utils::{
    assert_approx_eq, assert_coords_approx_eq, assert_some_approx_eq, flip_rows, index_field,
    index_value, plane_field, with_missing,
};

fn params(spec: GridSpec) -> GridParams {
    GridParams::new(
        CellSize::square(spec.cell_size),
        spec.n_cols,
        spec.n_rows,
        spec.xll_corner,
        spec.yll_corner,
    )
}

fn index_grid(spec: GridSpec) -> ScalarGrid {
    ScalarGrid::from_array(params(spec), index_field(spec.n_cols, spec.n_rows)).unwrap()
}

fn two_by_two() -> ScalarGrid {
    ScalarGrid::from_array(
        params(TWO_BY_TWO),
        vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)],
    )
    .unwrap()
}

#[test]
fn test_cell_centres_round_trip() {
    let grid = index_grid(GALICIA);
    for &(col, row) in &[(0, 0), (17, 3), (50, 40), (99, 79)] {
        let centre = grid.lon_lat_at_indexes(col as f64, row as f64);
        assert_eq!(grid.value_at(centre.lon, centre.lat), Some(index_value(col, row)));

        let (i, j) = grid.decimal_indexes(centre.lon, centre.lat);
        assert_approx_eq!(i, col as f64, 1e-9);
        assert_approx_eq!(j, row as f64, 1e-9);
    }
}

#[test]
fn test_bilinear_reproduces_plane() {
    let (a, b, c) = (5.0, 0.25, -1.5);
    let grid = ScalarGrid::from_array(
        params(GALICIA),
        plane_field(GALICIA.n_cols, GALICIA.n_rows, a, b, c),
    )
    .unwrap();

    for &(lon, lat) in &[(-9.93, 44.91), (-8.0, 43.0), (-5.31, 41.27), (-9.999, 41.001)] {
        let (i, j) = grid.decimal_indexes(lon, lat);
        assert_some_approx_eq!(grid.interpolated_value_at(lon, lat), a + b * i + c * j, 1e-9);
    }
}

#[test]
fn test_outside_points() {
    let grid = index_grid(GALICIA);
    assert!(grid.not_contains(-10.5, 43.0));
    assert!(grid.not_contains(-8.0, 45.5));
    assert_eq!(grid.value_at(-10.5, 43.0), None);
    assert_eq!(grid.interpolated_value_at(-8.0, 40.0), None);

    // Corners are inclusive
    assert!(grid.contains(-10.0, 41.0));
    assert!(grid.contains(-5.0, 45.0));
}

#[test]
fn test_missing_cells_block_interpolation() {
    let data = with_missing(index_field(4, 4), 4, &[(1, 1)]);
    let spec = GridSpec {
        n_cols: 4,
        n_rows: 4,
        xll_corner: 0.0,
        yll_corner: 0.0,
        cell_size: 1.0,
    };
    let grid = ScalarGrid::from_array(params(spec), data).unwrap();

    // Cell (1, 1) spans x 1..2, y 2..3
    assert_eq!(grid.value_at(1.5, 2.5), None);
    assert_eq!(grid.interpolated_value_at(1.0, 3.0), None);
    assert_eq!(grid.interpolated_value_at(2.0, 2.0), None);
    assert!(grid.interpolated_value_at(3.0, 1.0).is_some());
}

#[test]
fn test_global_0_360_grid() {
    let grid = index_grid(GLOBAL_0_360);
    assert!(grid.is_continuous());
    assert!(grid.longitude_needs_to_be_wrapped());

    // Negative longitudes land in the eastern half of the storage
    assert_eq!(grid.value_at(-170.5, 0.5), Some(index_value(189, 89)));
    assert_eq!(grid.value_at(189.5, 0.5), Some(index_value(189, 89)));

    let centre = grid.lon_lat_at_indexes(189.0, 89.0);
    assert_coords_approx_eq!((centre.lon, centre.lat), (-170.5, 0.5), 1e-9);

    assert_eq!(grid.extent(), BoundingBox::new(-180.0, -90.0, 180.0, 90.0));
    assert_eq!(grid.get_bounds(), BoundingBox::new(0.0, -90.0, 360.0, 90.0));
}

#[test]
fn test_continuous_seam_interpolation() {
    let grid = index_grid(GLOBAL_0_360);
    // Between the last column (359) and the first (0)
    let expected = 0.6 * index_value(359, 89) + 0.4 * index_value(0, 89);
    assert_some_approx_eq!(grid.interpolated_value_at(-0.1, 0.5), expected, 1e-4);
    assert_some_approx_eq!(grid.interpolated_value_at(359.9, 0.5), expected, 1e-4);
}

#[test]
fn test_duplicate_seam_column() {
    // 361 columns centred on 0..=360: the last column repeats the first
    let params = GridParams::new(CellSize::square(1.0), 361, 3, -0.5, -1.5);
    let values = (0..3)
        .flat_map(|_| (0..361).map(|col| Some((col % 360) as f64)))
        .collect();
    let grid = ScalarGrid::from_array(params, values).unwrap();
    assert!(grid.is_continuous());

    assert_some_approx_eq!(grid.interpolated_value_at(359.7, 0.0), 0.3 * 359.0, 1e-6);
    assert_some_approx_eq!(grid.interpolated_value_at(-0.3, 0.0), 0.3 * 359.0, 1e-6);
    assert_some_approx_eq!(grid.interpolated_value_at(180.5, 0.0), 180.5, 1e-6);
    assert_eq!(grid.value_at(359.2, 0.0), Some(359.0));
    assert_eq!(grid.value_at(359.7, 0.0), Some(0.0));
}

#[test]
fn test_global_180_seam() {
    let grid = index_grid(GLOBAL_180);
    assert!(grid.is_continuous());
    assert!(!grid.longitude_needs_to_be_wrapped());

    let east = 0.7 * index_value(143, 35) + 0.3 * index_value(0, 35);
    assert_some_approx_eq!(grid.interpolated_value_at(179.5, 1.25), east, 1e-6);

    let west = 0.3 * index_value(143, 35) + 0.7 * index_value(0, 35);
    assert_some_approx_eq!(grid.interpolated_value_at(-179.5, 1.25), west, 1e-6);
}

#[test]
fn test_antimeridian_window() {
    let grid = index_grid(PACIFIC);
    assert!(!grid.is_continuous());
    assert!(grid.longitude_needs_to_be_wrapped());

    assert!(grid.contains(170.0, 0.0));
    assert!(grid.contains(-150.0, 5.0));
    assert!(grid.not_contains(-130.0, 0.0));
    assert!(grid.not_contains(150.0, 0.0));

    assert_eq!(grid.value_at(-175.5, 0.5), Some(index_value(24, 9)));
    let centre = grid.lon_lat_at_indexes(24.0, 9.0);
    assert_coords_approx_eq!((centre.lon, centre.lat), (-175.5, 0.5), 1e-9);

    assert_eq!(grid.extent(), BoundingBox::new(160.0, -10.0, 220.0, 10.0));
}

#[test]
fn test_grid_east_of_antimeridian() {
    let spec = GridSpec {
        n_cols: 10,
        n_rows: 10,
        xll_corner: 200.0,
        yll_corner: 0.0,
        cell_size: 1.0,
    };
    let grid = index_grid(spec);
    assert_eq!(grid.extent(), BoundingBox::new(-160.0, 0.0, -150.0, 10.0));
    assert_eq!(grid.value_at(-159.5, 9.5), Some(index_value(0, 0)));
    assert_eq!(grid.value_at(200.5, 9.5), Some(index_value(0, 0)));
}

#[test]
fn test_projected_grid() {
    let params = GridParams::new(CellSize::square(1000.0), 50, 50, 500_000.0, 4_700_000.0)
        .with_projection("+proj=utm +zone=29 +ellps=WGS84 +units=m");
    let grid = ScalarGrid::from_array(params, index_field(50, 50)).unwrap();

    assert!(!grid.is_continuous());
    assert!(!grid.projection().is_geographic());

    let centre = grid.lon_lat_at_indexes(10.0, 20.0);
    assert_eq!(grid.value_at(centre.lon, centre.lat), Some(index_value(10, 20)));

    let bounds = grid.get_bounds();
    assert_approx_eq!(bounds.min_x, -9.0, 1e-9);
    assert!(bounds.max_x > -8.5 && bounds.max_x < -8.3, "max_x {}", bounds.max_x);
    assert!(grid.not_contains(-10.0, 42.5));
    assert_eq!(grid.extent(), bounds);
}

#[test]
fn test_unknown_projection_is_rejected() {
    let params = GridParams::new(CellSize::square(1.0), 2, 2, 0.0, 0.0).with_projection("+proj=robin");
    assert!(ScalarGrid::from_array(params, vec![Some(1.0); 4]).is_err());
}

#[test]
fn test_south_first_packing() {
    let spec = GALICIA;
    let north_first = index_field(spec.n_cols, spec.n_rows);
    let south_first = flip_rows(&north_first, spec.n_cols);

    let packed = ScalarGrid::new(
        params(spec),
        south_first.clone(),
        Packing::new(false, true),
        GridConfig::default(),
    )
    .unwrap();
    let canonical = ScalarGrid::from_array(params(spec), north_first).unwrap();

    assert_eq!(packed.zs(), south_first.as_slice());
    for &(lon, lat) in &[(-9.9, 44.9), (-7.3, 42.1), (-5.1, 41.1)] {
        assert_eq!(packed.value_at(lon, lat), canonical.value_at(lon, lat));
    }
}

#[test]
fn test_filter_and_range() {
    let mut grid = two_by_two();
    assert_eq!(grid.range(), Some(ValueRange::new(10.0, 40.0)));

    grid.set_filter(|v| *v >= 20.0);
    assert!(grid.has_filter());
    assert_eq!(grid.range(), Some(ValueRange::new(20.0, 40.0)));
    assert_eq!(grid.value_at(0.5, 1.5), None);
    assert_eq!(grid.value_at(1.5, 1.5), Some(20.0));
    // Interpolation ignores the filter
    assert_some_approx_eq!(grid.interpolated_value_at(1.0, 1.0), 25.0, 1e-12);

    grid.set_filter(|v| *v > 100.0);
    assert_eq!(grid.range(), None);

    grid.clear_filter();
    assert_eq!(grid.range(), Some(ValueRange::new(10.0, 40.0)));
}

#[test]
fn test_update_data_keeps_filter() {
    let mut grid = two_by_two();
    grid.set_filter(|v| *v >= 0.0);
    grid.update_data(vec![Some(-5.0), Some(1.0), None, Some(3.0)])
        .unwrap();

    assert!(grid.has_filter());
    assert_eq!(grid.range(), Some(ValueRange::new(1.0, 3.0)));
    assert_eq!(grid.value_at(0.5, 1.5), None);
    assert!(grid.update_data(vec![Some(1.0)]).is_err());
}

#[test]
fn test_range_stride() {
    let config = GridConfig {
        range_stride: 2,
        ..GridConfig::default()
    };
    let spec = GridSpec {
        n_cols: 4,
        n_rows: 4,
        xll_corner: 0.0,
        yll_corner: 0.0,
        cell_size: 1.0,
    };
    let grid = ScalarGrid::new(params(spec), index_field(4, 4), Packing::default(), config).unwrap();
    // Rows and columns 0 and 2 only
    assert_eq!(grid.range(), Some(ValueRange::new(0.0, 2002.0)));
}

#[test]
fn test_cells_with_stride() {
    let grid = index_grid(GALICIA);
    let cells = grid.cells(10);
    assert_eq!(cells.len(), 80);

    let first = cells[0];
    assert_coords_approx_eq!((first.center.lon, first.center.lat), (-9.975, 44.975), 1e-9);
    assert_eq!(first.value, Some(index_value(0, 0)));

    // x-ascending within a row, rows north to south
    assert!(cells[1].center.lon > first.center.lon);
    assert!(cells[10].center.lat < first.center.lat);

    assert_eq!(grid.cells(1).len(), GALICIA.size());
}

#[test]
fn test_random_positions_are_inside() {
    let mut rng = StdRng::seed_from_u64(42);
    for spec in [GALICIA, GLOBAL_0_360, PACIFIC] {
        let grid = index_grid(spec);
        for _ in 0..500 {
            let p = grid.random_position(&mut rng);
            assert!(grid.contains(p.lon, p.lat), "{:?} outside {:?}", p, spec);
            assert!(grid.has_value_at(p.lon, p.lat));
        }
    }
}

#[test]
fn test_shared_field_updates() {
    let shared = SharedField::new(two_by_two());
    let before = shared.snapshot();

    shared
        .update(|grid| grid.update_data(vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]))
        .unwrap();

    assert_eq!(before.value_at(0.5, 1.5), Some(10.0));
    assert_eq!(shared.snapshot().value_at(0.5, 1.5), Some(1.0));
    assert_eq!(shared.version(), 1);
}

#[test]
fn test_records_input() {
    let records: Vec<serde_json::Value> = serde_json::from_str(
        r#"[{"c": 1.5}, {"c": null}, {"c": 3, "other": 9}, {"c": 4.0}]"#,
    )
    .unwrap();
    let mut grid =
        ScalarGrid::from_records(params(TWO_BY_TWO), &records, raster_grid::DEFAULT_RECORD_FIELD)
            .unwrap();
    assert_eq!(grid.value_at(0.5, 1.5), Some(1.5));
    assert_eq!(grid.value_at(1.5, 1.5), None);
    assert_eq!(grid.range(), Some(ValueRange::new(1.5, 4.0)));

    let other: Vec<serde_json::Value> =
        serde_json::from_str(r#"[{"t": 7}, {"t": 8}, {"t": 9}, {"t": 10}]"#).unwrap();
    grid.update_records(&other, "t").unwrap();
    assert_eq!(grid.value_at(1.5, 1.5), Some(8.0));
}

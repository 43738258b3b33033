//! Vector fields (winds, currents) built from u and v components.

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::scalar::ScalarGrid;
use crate::storage::{pack, Packing};
use crate::types::GridParams;
use crate::vector::{FieldKind, Vector};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// A grid with one [`Vector`] per cell.
///
/// A cell is missing when either component is missing. The range is the
/// range of magnitudes.
#[derive(Debug, Clone)]
pub struct VectorialGrid {
    grid: Grid<Vector>,
    us: Arc<[Option<f64>]>,
    vs: Arc<[Option<f64>]>,
    packing: Packing,
}

impl VectorialGrid {
    /// Build from two flat component arrays in source order.
    pub fn new(
        params: GridParams,
        us: Vec<Option<f64>>,
        vs: Vec<Option<f64>>,
        packing: Packing,
        config: GridConfig,
    ) -> Result<Self> {
        let cells = vector_cells(&params, &us, &vs, packing)?;
        let grid = Grid::new(params, cells, config)?;
        Ok(Self {
            grid,
            us: us.into(),
            vs: vs.into(),
            packing,
        })
    }

    /// Build from canonical-order component arrays with default settings.
    pub fn from_arrays(params: GridParams, us: Vec<Option<f64>>, vs: Vec<Option<f64>>) -> Result<Self> {
        Self::new(params, us, vs, Packing::default(), GridConfig::default())
    }

    /// Combine two scalar grids holding the u and v components.
    ///
    /// Both must have the same number of rows and columns. Differing
    /// corners or cell sizes are not reconciled: the geometry of `u` wins
    /// and a warning is logged.
    pub fn from_grids(u: &ScalarGrid, v: &ScalarGrid) -> Result<Self> {
        Self::from_grids_with_params(u, v, u.params().clone())
    }

    /// Combine two component grids under explicit metadata.
    pub fn from_grids_with_params(u: &ScalarGrid, v: &ScalarGrid, params: GridParams) -> Result<Self> {
        if u.n_cols() != v.n_cols() || u.n_rows() != v.n_rows() {
            return Err(GridError::incompatible(format!(
                "u is {}x{} but v is {}x{}",
                u.n_cols(),
                u.n_rows(),
                v.n_cols(),
                v.n_rows()
            )));
        }
        if !u.params().same_geometry(v.params()) {
            tracing::warn!(
                u_xll = u.params().xll_corner,
                u_yll = u.params().yll_corner,
                v_xll = v.params().xll_corner,
                v_yll = v.params().yll_corner,
                "Vector components have different geometry, using the u grid"
            );
        }

        // Canonical storage of each component, so packing is not applied twice
        let us = u.storage().cells().to_vec();
        let vs = v.storage().cells().to_vec();
        Self::new(params, us, vs, Packing::default(), *u.config())
    }

    /// Replace both components, keeping metadata, packing and filter.
    pub fn update_data(&mut self, us: Vec<Option<f64>>, vs: Vec<Option<f64>>) -> Result<()> {
        let cells = vector_cells(self.grid.params(), &us, &vs, self.packing)?;
        self.grid.replace_cells(cells)?;
        self.us = us.into();
        self.vs = vs.into();
        Ok(())
    }

    /// Scalar field derived from every vector, on the same geometry.
    pub fn get_scalar_field(&self, kind: FieldKind) -> ScalarGrid {
        let derive = kind.function();
        ScalarGrid::from_grid(self.grid.map(move |vector| derive(&vector)))
    }

    /// u components as supplied.
    pub fn us(&self) -> &[Option<f64>] {
        &self.us
    }

    /// v components as supplied.
    pub fn vs(&self) -> &[Option<f64>] {
        &self.vs
    }

    pub fn packing(&self) -> Packing {
        self.packing
    }

    pub fn grid(&self) -> &Grid<Vector> {
        &self.grid
    }

    pub fn into_grid(self) -> Grid<Vector> {
        self.grid
    }
}

impl Deref for VectorialGrid {
    type Target = Grid<Vector>;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}

impl DerefMut for VectorialGrid {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.grid
    }
}

/// Zip components into vectors, then pack.
pub(crate) fn vector_cells(
    params: &GridParams,
    us: &[Option<f64>],
    vs: &[Option<f64>],
    packing: Packing,
) -> Result<Vec<Option<Vector>>> {
    if us.len() != vs.len() {
        return Err(GridError::incompatible(format!(
            "{} u values but {} v values",
            us.len(),
            vs.len()
        )));
    }
    let vectors: Vec<Option<Vector>> = us
        .iter()
        .zip(vs)
        .map(|(u, v)| Some(Vector::new((*u)?, (*v)?)))
        .collect();
    pack(&vectors, params.n_cols, params.n_rows, packing)
}

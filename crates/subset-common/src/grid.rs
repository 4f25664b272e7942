//! In-memory grid containers.
//!
//! Grids are dense row-major `f64` arrays. A [`Grid3`] has axis order
//! `(layer, row, col)`; rows run from the domain's south edge (row 0)
//! northward, matching the simulator's native array alignment.

use crate::error::{SubsetError, SubsetResult};

/// A single 2D grid plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2 {
    data: Vec<f64>,
    ny: usize,
    nx: usize,
}

impl Grid2 {
    /// Create a grid filled with one value.
    pub fn new_filled(ny: usize, nx: usize, value: f64) -> Self {
        Self {
            data: vec![value; ny * nx],
            ny,
            nx,
        }
    }

    /// Wrap a row-major vector; its length must equal `ny * nx`.
    pub fn from_vec(data: Vec<f64>, ny: usize, nx: usize) -> SubsetResult<Self> {
        if data.len() != ny * nx {
            return Err(SubsetError::shape_mismatch(
                format!("{} values for {ny}x{nx}", ny * nx),
                format!("{}", data.len()),
            ));
        }
        Ok(Self { data, ny, nx })
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, y: usize, x: usize) -> Option<f64> {
        if y >= self.ny || x >= self.nx {
            return None;
        }
        self.data.get(y * self.nx + x).copied()
    }

    /// Overwrite the value at `(row, col)`; panics outside the grid.
    pub fn set(&mut self, y: usize, x: usize, value: f64) {
        self.data[y * self.nx + x] = value;
    }

    /// The backing row-major slice.
    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

/// A layered 3D grid in `(layer, row, col)` order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid3 {
    data: Vec<f64>,
    nz: usize,
    ny: usize,
    nx: usize,
}

impl Grid3 {
    /// Create a grid filled with one value.
    pub fn new_filled(nz: usize, ny: usize, nx: usize, value: f64) -> Self {
        Self {
            data: vec![value; nz * ny * nx],
            nz,
            ny,
            nx,
        }
    }

    /// Wrap a row-major vector; its length must equal `nz * ny * nx`.
    pub fn from_vec(data: Vec<f64>, nz: usize, ny: usize, nx: usize) -> SubsetResult<Self> {
        if data.len() != nz * ny * nx {
            return Err(SubsetError::shape_mismatch(
                format!("{} values for {nz}x{ny}x{nx}", nz * ny * nx),
                format!("{}", data.len()),
            ));
        }
        Ok(Self { data, nz, ny, nx })
    }

    /// Lift a 2D plane into a singleton-layer 3D grid.
    pub fn from_plane(plane: Grid2) -> Self {
        let (ny, nx) = (plane.ny(), plane.nx());
        Self {
            data: plane.data,
            nz: 1,
            ny,
            nx,
        }
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    /// `(nz, ny, nx)` tuple.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nz, self.ny, self.nx)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(layer, row, col)`, or `None` outside the grid.
    pub fn get(&self, z: usize, y: usize, x: usize) -> Option<f64> {
        if z >= self.nz || y >= self.ny || x >= self.nx {
            return None;
        }
        self.data.get((z * self.ny + y) * self.nx + x).copied()
    }

    /// Overwrite the value at `(layer, row, col)`; panics outside the grid.
    pub fn set(&mut self, z: usize, y: usize, x: usize, value: f64) {
        self.data[(z * self.ny + y) * self.nx + x] = value;
    }

    /// Copy one layer out as a 2D plane.
    pub fn plane(&self, z: usize) -> Option<Grid2> {
        if z >= self.nz {
            return None;
        }
        let start = z * self.ny * self.nx;
        let end = start + self.ny * self.nx;
        Some(Grid2 {
            data: self.data[start..end].to_vec(),
            ny: self.ny,
            nx: self.nx,
        })
    }

    /// Extract the half-open box `[z0, z_end) x [y0, y_end) x [x0, x_end)`.
    ///
    /// Bounds that fall outside the grid are an error, never clamped; a
    /// caller that computed an overrunning box (e.g. from oversized padding)
    /// must hear about it.
    pub fn slice(
        &self,
        z_range: (i64, i64),
        y_range: (i64, i64),
        x_range: (i64, i64),
    ) -> SubsetResult<Grid3> {
        let check = |(start, end): (i64, i64), dim: usize| -> SubsetResult<(usize, usize)> {
            if start < 0 || end < start || end > dim as i64 {
                return Err(SubsetError::out_of_bounds(
                    format!("[{start}, {end})"),
                    format!("[0, {dim})"),
                ));
            }
            Ok((start as usize, end as usize))
        };
        let (z0, z_end) = check(z_range, self.nz)?;
        let (y0, y_end) = check(y_range, self.ny)?;
        let (x0, x_end) = check(x_range, self.nx)?;

        let (onz, ony, onx) = (z_end - z0, y_end - y0, x_end - x0);
        let mut data = Vec::with_capacity(onz * ony * onx);
        for z in z0..z_end {
            for y in y0..y_end {
                let row = (z * self.ny + y) * self.nx;
                data.extend_from_slice(&self.data[row + x0..row + x_end]);
            }
        }
        Ok(Grid3 {
            data,
            nz: onz,
            ny: ony,
            nx: onx,
        })
    }

    /// The backing row-major slice.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the backing row-major slice.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

//! Test data generators for synthetic grids and classified masks.
//!
//! Generators create predictable, verifiable patterns that can be checked
//! cell-by-cell across the test suite.

use subset_common::{Grid3, NO_DATA_VALUE};

/// Create a test grid with predictable values.
///
/// Each cell value is `layer * 100000 + row * 1000 + col`, which makes it
/// easy to verify that a clip picked up exactly the cells it should have.
pub fn sequential_grid(nz: usize, ny: usize, nx: usize) -> Grid3 {
    let mut data = Vec::with_capacity(nz * ny * nx);
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                data.push((z * 100_000 + y * 1000 + x) as f64);
            }
        }
    }
    // the vector length matches the shape by construction
    Grid3::from_vec(data, nz, ny, nx).expect("generator shape mismatch")
}

/// Create a single-layer classified mask: no-data everywhere except an
/// inner-object rectangle of 1s at the inclusive bounds
/// `(min_y, max_y, min_x, max_x)`.
pub fn classified_mask(ny: usize, nx: usize, inner: (usize, usize, usize, usize)) -> Grid3 {
    classified_mask_with_halo(ny, nx, inner, 0)
}

/// Create a single-layer classified mask with a bounding-box halo of 0s
/// `halo` cells wide around the inner rectangle of 1s; everything else is
/// no-data. The halo is clamped to the grid.
pub fn classified_mask_with_halo(
    ny: usize,
    nx: usize,
    inner: (usize, usize, usize, usize),
    halo: usize,
) -> Grid3 {
    let (min_y, max_y, min_x, max_x) = inner;
    let mut grid = Grid3::new_filled(1, ny, nx, NO_DATA_VALUE);
    for y in min_y.saturating_sub(halo)..=(max_y + halo).min(ny - 1) {
        for x in min_x.saturating_sub(halo)..=(max_x + halo).min(nx - 1) {
            grid.set(0, y, x, 0.0);
        }
    }
    for y in min_y..=max_y.min(ny - 1) {
        for x in min_x..=max_x.min(nx - 1) {
            grid.set(0, y, x, 1.0);
        }
    }
    grid
}

//! Boundary-patch grids derived from a clipped domain mask.

use subset_common::{Grid2, Grid3, SubsetError, SubsetResult};
use tracing::info;

/// Patch code stamped on the top surface (generic overland boundary).
pub const TOP_PATCH_CODE: f64 = 3.0;
/// Patch code stamped on the bottom surface.
pub const BOTTOM_PATCH_CODE: f64 = 6.0;

/// The six boundary-patch grids of a 3D domain shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchSet {
    pub top: Grid2,
    pub bottom: Grid2,
    pub left: Grid2,
    pub right: Grid2,
    pub front: Grid2,
    pub back: Grid2,
}

/// Build the six boundary patches from a binary domain mask.
///
/// The mask must be 2D in substance: a 3D input is accepted only with a
/// singleton layer axis. The top and bottom surfaces carry their fixed patch
/// codes wherever the mask is set. Each lateral patch marks the cells whose
/// neighbor in that direction (or the grid edge) lies outside the mask:
/// `left` looks west (−x), `right` east (+x), `front` south (−y), `back`
/// north (+y).
pub fn build_patches(mask: &Grid3) -> SubsetResult<PatchSet> {
    if mask.nz() != 1 {
        return Err(SubsetError::invalid_dimension(format!(
            "domain mask must be a single layer, got {} layers",
            mask.nz()
        )));
    }
    let (ny, nx) = (mask.ny(), mask.nx());
    let inside = |y: i64, x: i64| -> bool {
        if y < 0 || x < 0 || y >= ny as i64 || x >= nx as i64 {
            return false;
        }
        mask.get(0, y as usize, x as usize) == Some(1.0)
    };

    let mut top = Grid2::new_filled(ny, nx, 0.0);
    let mut bottom = Grid2::new_filled(ny, nx, 0.0);
    let mut left = Grid2::new_filled(ny, nx, 0.0);
    let mut right = Grid2::new_filled(ny, nx, 0.0);
    let mut front = Grid2::new_filled(ny, nx, 0.0);
    let mut back = Grid2::new_filled(ny, nx, 0.0);

    for y in 0..ny {
        for x in 0..nx {
            if !inside(y as i64, x as i64) {
                continue;
            }
            top.set(y, x, TOP_PATCH_CODE);
            bottom.set(y, x, BOTTOM_PATCH_CODE);
            if !inside(y as i64, x as i64 - 1) {
                left.set(y, x, 1.0);
            }
            if !inside(y as i64, x as i64 + 1) {
                right.set(y, x, 1.0);
            }
            if !inside(y as i64 - 1, x as i64) {
                front.set(y, x, 1.0);
            }
            if !inside(y as i64 + 1, x as i64) {
                back.set(y, x, 1.0);
            }
        }
    }
    info!(ny, nx, "built boundary patch grids");
    Ok(PatchSet {
        top,
        bottom,
        left,
        right,
        front,
        back,
    })
}

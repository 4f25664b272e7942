//! Clipping of explicitly specified rectangular regions.

use subset_common::{
    BoundingBox, Grid3, Padding, SubsetError, SubsetResult, NO_DATA_VALUE,
};
use tracing::info;

use crate::result::ClipResult;

/// Clip a rectangular region specified by 1-based box coordinates.
///
/// Extents default to the full source dimensions. With non-zero padding the
/// clipped data is centered inside a larger no-data-filled output array.
#[derive(Debug, Clone)]
pub struct BoxClipper {
    x0: usize,
    y0: usize,
    z0: usize,
    nx: usize,
    ny: usize,
    nz: usize,
    padding: Padding,
    no_data: f64,
}

impl BoxClipper {
    /// Create a clipper for a source of shape `(nz, ny, nx)`.
    ///
    /// `x`, `y`, `z` are 1-based; extents passed as `None` default to the
    /// full source dimension. All six values must be at least 1.
    pub fn new(
        source_shape: (usize, usize, usize),
        x: i64,
        y: i64,
        z: i64,
        nx: Option<i64>,
        ny: Option<i64>,
        nz: Option<i64>,
    ) -> SubsetResult<Self> {
        let (src_nz, src_ny, src_nx) = source_shape;
        let nx = nx.unwrap_or(src_nx as i64);
        let ny = ny.unwrap_or(src_ny as i64);
        let nz = nz.unwrap_or(src_nz as i64);
        if x < 1 || y < 1 || z < 1 || nx < 1 || ny < 1 || nz < 1 {
            return Err(SubsetError::invalid_dimension(format!(
                "x, y, z, nx, ny, nz must all be >= 1, got \
                 x={x}, y={y}, z={z}, nx={nx}, ny={ny}, nz={nz}"
            )));
        }
        Ok(Self {
            x0: (x - 1) as usize,
            y0: (y - 1) as usize,
            z0: (z - 1) as usize,
            nx: nx as usize,
            ny: ny as usize,
            nz: nz as usize,
            padding: Padding::default(),
            no_data: NO_DATA_VALUE,
        })
    }

    /// Create a clipper for the lateral region of a [`BoundingBox`], covering
    /// `nz` layers.
    pub fn from_bounding_box(
        bbox: &BoundingBox,
        nz: usize,
        source_shape: (usize, usize, usize),
    ) -> SubsetResult<Self> {
        Self::new(
            source_shape,
            bbox.x1,
            bbox.y1,
            1,
            Some(bbox.nx),
            Some(bbox.ny),
            Some(nz as i64),
        )
        .map(|c| c.with_padding(bbox.padding))
    }

    /// Attach no-data padding around the clipped region.
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Override the no-data fill value.
    pub fn with_no_data(mut self, no_data: f64) -> Self {
        self.no_data = no_data;
        self
    }

    /// Replace the box coordinates, re-validating them.
    pub fn update_box(
        &mut self,
        source_shape: (usize, usize, usize),
        x: i64,
        y: i64,
        z: i64,
        nx: Option<i64>,
        ny: Option<i64>,
        nz: Option<i64>,
    ) -> SubsetResult<()> {
        let replacement = Self::new(source_shape, x, y, z, nx, ny, nz)?
            .with_padding(self.padding)
            .with_no_data(self.no_data);
        *self = replacement;
        Ok(())
    }

    /// The box as a 1-based [`BoundingBox`] (laterally).
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            x1: self.x0 as i64 + 1,
            y1: self.y0 as i64 + 1,
            nx: self.nx as i64,
            ny: self.ny as i64,
            padding: self.padding,
        }
    }

    /// Clip the box region out of `source`.
    ///
    /// With all-zero padding this is a direct bounds-checked slice. With
    /// padding, the slice lands inside a `(nz, ny + pad_top + pad_bottom,
    /// nx + pad_left + pad_right)` output at row offset `pad_top` and column
    /// offset `pad_left`; every cell outside the copied interior holds the
    /// no-data value.
    pub fn subset(&self, source: &Grid3) -> SubsetResult<ClipResult> {
        let z = (self.z0 as i64, (self.z0 + self.nz) as i64);
        let y = (self.y0 as i64, (self.y0 + self.ny) as i64);
        let x = (self.x0 as i64, (self.x0 + self.nx) as i64);
        let inner = source.slice(z, y, x)?;

        let data = if self.padding.is_zero() {
            inner
        } else {
            let out_ny = self.ny + self.padding.top + self.padding.bottom;
            let out_nx = self.nx + self.padding.left + self.padding.right;
            let mut out = Grid3::new_filled(self.nz, out_ny, out_nx, self.no_data);
            for z in 0..self.nz {
                for y in 0..self.ny {
                    for x in 0..self.nx {
                        // in-bounds by construction of `inner`
                        let value = inner.get(z, y, x).unwrap_or(self.no_data);
                        out.set(z, y + self.padding.top, x + self.padding.left, value);
                    }
                }
            }
            info!(
                padding = ?self.padding,
                shape = ?out.shape(),
                "embedded box clip in padded no-data array"
            );
            out
        };

        Ok(ClipResult {
            data,
            geo_transform: None,
            mask: None,
            bounding_box: self.bounding_box(),
        })
    }
}

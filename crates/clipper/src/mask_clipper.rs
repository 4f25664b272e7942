//! Clipping of irregular regions described by a classified mask.

use mask_geometry::{SubsetMask, INNER_VALUE};
use subset_common::{BoundingBox, GeoTransform, Grid3, SubsetError, SubsetResult};
use tracing::info;

use crate::result::ClipResult;

/// How much of the clipped rectangle keeps valid data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropMode {
    /// Valid data only inside the tight inner shape; everything else in the
    /// rectangle is no-data.
    #[default]
    Inner,
    /// Valid data everywhere the coarse domain mask allows; the rectangle
    /// stays rectangular (used for land-surface inputs).
    BoundingBox,
}

/// Clip co-registered grids to the region a [`SubsetMask`] describes.
///
/// The clip window, the shifted geotransform and the 0/1 inner-cell mask are
/// precomputed once; each `subset` call re-reads fresh input, so clipping
/// many files in sequence shares no mutable state.
#[derive(Debug, Clone)]
pub struct MaskClipper {
    /// Full-extent invalid-cell flags (true = outside the domain), one plane.
    full_invalid: Vec<bool>,
    src_ny: usize,
    src_nx: usize,
    /// Half-open clip window rows/cols: `(y0, y_end, x0, x_end)`.
    window: (usize, usize, usize, usize),
    clipped_mask: Grid3,
    clipped_geo: GeoTransform,
    bounding_box: BoundingBox,
}

impl MaskClipper {
    /// Prepare a clipper from a mask.
    pub fn new(mask: &SubsetMask) -> Self {
        let edges = mask.bbox_edges();
        let window = (
            edges.min_y,
            edges.max_y + 1,
            edges.min_x,
            edges.max_x + 1,
        );
        let array = mask.array();
        let (_, src_ny, src_nx) = array.shape();

        let mut full_invalid = vec![true; src_ny * src_nx];
        for y in 0..src_ny {
            for x in 0..src_nx {
                let value = array.get(0, y, x).unwrap_or(mask.no_data_value());
                full_invalid[y * src_nx + x] = !mask.bbox_valid(value);
            }
        }

        let (h, w) = (window.1 - window.0, window.3 - window.2);
        let mut clipped_mask = Grid3::new_filled(1, h, w, 0.0);
        for y in 0..h {
            for x in 0..w {
                let value = array
                    .get(0, window.0 + y, window.2 + x)
                    .unwrap_or(mask.no_data_value());
                if mask.bbox_valid(value) && value == INNER_VALUE {
                    clipped_mask.set(0, y, x, 1.0);
                }
            }
        }

        let clipped_geo = mask
            .geo_transform()
            .shifted(edges.min_x as i64, edges.min_y as i64);
        info!(?window, ?clipped_geo, "prepared mask clipper");

        Self {
            full_invalid,
            src_ny,
            src_nx,
            window,
            clipped_mask,
            clipped_geo,
            bounding_box: mask.bounding_box(),
        }
    }

    /// The 0/1 inner-cell mask inside the clip window.
    pub fn clipped_mask(&self) -> &Grid3 {
        &self.clipped_mask
    }

    /// The geotransform recomputed for the clip window origin.
    pub fn geo_transform(&self) -> &GeoTransform {
        &self.clipped_geo
    }

    /// The clip window as a 1-based [`BoundingBox`].
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Clip `data` to the mask's bounding-box window.
    ///
    /// The source must share the mask's row/column extents; its layer count
    /// is free: the single mask plane applies to every layer (subsurface
    /// stacks and forcing time series share one 2D mask).
    pub fn subset(&self, data: &Grid3, no_data: f64, crop: CropMode) -> SubsetResult<ClipResult> {
        let (nz, ny, nx) = data.shape();
        if ny != self.src_ny || nx != self.src_nx {
            return Err(SubsetError::shape_mismatch(
                format!("{}x{} mask extents", self.src_ny, self.src_nx),
                format!("{ny}x{nx} data extents"),
            ));
        }
        if nz > 1 {
            info!(layers = nz, "broadcasting mask to multi-layer input");
        }

        let (y0, y_end, x0, x_end) = self.window;
        let (h, w) = (y_end - y0, x_end - x0);
        let mut out = data.slice(
            (0, nz as i64),
            (y0 as i64, y_end as i64),
            (x0 as i64, x_end as i64),
        )?;

        for z in 0..nz {
            for y in 0..h {
                for x in 0..w {
                    let invalid = self.full_invalid[(y0 + y) * self.src_nx + (x0 + x)];
                    let blanked = match crop {
                        CropMode::Inner => {
                            invalid || self.clipped_mask.get(0, y, x) != Some(1.0)
                        }
                        CropMode::BoundingBox => invalid,
                    };
                    if blanked {
                        out.set(z, y, x, no_data);
                    }
                }
            }
        }
        info!(
            input_shape = ?data.shape(),
            output_shape = ?out.shape(),
            ?crop,
            "clipped data to mask window"
        );

        Ok(ClipResult {
            data: out,
            geo_transform: Some(self.clipped_geo),
            mask: Some(self.clipped_mask.clone()),
            bounding_box: self.bounding_box,
        })
    }
}

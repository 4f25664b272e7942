//! The classified subset mask and its derived geometry.

use subset_common::{
    BoundingBox, GeoTransform, Grid3, Padding, SubsetError, SubsetResult, NO_DATA_VALUE,
};
use tracing::info;

use crate::dimensions::{calculate_buffer_edges, calculate_new_dimensions, BufferedExtent};

/// The conventional cell value marking the inner object.
pub const INNER_VALUE: f64 = 1.0;

/// Inclusive row/column bounds of a valid region inside a larger grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskEdges {
    pub min_y: usize,
    pub max_y: usize,
    pub min_x: usize,
    pub max_x: usize,
}

impl MaskEdges {
    /// Height of the region in cells.
    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }

    /// Width of the region in cells.
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }
}

/// Scan a mask array for the extremal row/column indices where `valid` holds.
///
/// Every usable mask must select at least one cell; an empty selection is an
/// error, not an empty box.
pub fn find_mask_edges<F>(array: &Grid3, valid: F, label: &str) -> SubsetResult<MaskEdges>
where
    F: Fn(f64) -> bool,
{
    let (nz, ny, nx) = array.shape();
    let mut edges: Option<MaskEdges> = None;
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                // index arithmetic is in-bounds by construction
                let value = array.data()[(z * ny + y) * nx + x];
                if !valid(value) {
                    continue;
                }
                edges = Some(match edges {
                    None => MaskEdges {
                        min_y: y,
                        max_y: y,
                        min_x: x,
                        max_x: x,
                    },
                    Some(e) => MaskEdges {
                        min_y: e.min_y.min(y),
                        max_y: e.max_y.max(y),
                        min_x: e.min_x.min(x),
                        max_x: e.max_x.max(x),
                    },
                });
            }
        }
    }
    match edges {
        Some(e) => {
            info!(label, ?e, "located mask edges");
            Ok(e)
        }
        None => Err(SubsetError::empty_selection(format!(
            "no {label} cells found in mask array"
        ))),
    }
}

/// A full-extent classified mask raster.
///
/// Cell values fall into three classes split by two thresholds: values at or
/// below `no_data_threshold` are outside the domain entirely, values of at
/// least `bbox_val` belong to the bounding box, and values strictly above
/// `bbox_val` are the inner object (conventionally no-data / 0 / 1). The
/// derived bbox and inner sub-masks each carry their own edge box.
#[derive(Debug, Clone)]
pub struct SubsetMask {
    array: Grid3,
    geo_transform: GeoTransform,
    bbox_val: f64,
    no_data_threshold: f64,
    no_data_value: f64,
    bbox_edges: MaskEdges,
    inner_edges: MaskEdges,
}

impl SubsetMask {
    /// Build a mask from a classified array.
    ///
    /// Fails when `bbox_val` does not exceed `no_data_threshold`, or when the
    /// array contains no bbox or no inner cells.
    pub fn new(
        array: Grid3,
        geo_transform: GeoTransform,
        bbox_val: f64,
        no_data_threshold: f64,
        no_data_value: f64,
    ) -> SubsetResult<Self> {
        if bbox_val <= no_data_threshold {
            return Err(SubsetError::MaskThreshold {
                bbox_val,
                no_data_threshold,
            });
        }
        let bbox_edges = find_mask_edges(&array, |v| v >= bbox_val, "bbox")?;
        let inner_edges = find_mask_edges(&array, |v| v > bbox_val, "inner")?;
        Ok(Self {
            array,
            geo_transform,
            bbox_val,
            no_data_threshold,
            no_data_value,
            bbox_edges,
            inner_edges,
        })
    }

    /// Build a mask using the conventional value scheme: bbox cells are 0,
    /// inner cells 1, and no-data cells the default no-data value.
    pub fn with_defaults(array: Grid3, geo_transform: GeoTransform) -> SubsetResult<Self> {
        Self::new(array, geo_transform, 0.0, NO_DATA_VALUE, NO_DATA_VALUE)
    }

    pub fn array(&self) -> &Grid3 {
        &self.array
    }

    pub fn geo_transform(&self) -> &GeoTransform {
        &self.geo_transform
    }

    pub fn bbox_val(&self) -> f64 {
        self.bbox_val
    }

    pub fn no_data_threshold(&self) -> f64 {
        self.no_data_threshold
    }

    pub fn no_data_value(&self) -> f64 {
        self.no_data_value
    }

    /// Edge box of the bounding-box sub-mask.
    pub fn bbox_edges(&self) -> &MaskEdges {
        &self.bbox_edges
    }

    /// Edge box of the inner-object sub-mask.
    pub fn inner_edges(&self) -> &MaskEdges {
        &self.inner_edges
    }

    /// `(height, width)` of the bounding-box region.
    pub fn bbox_shape(&self) -> (usize, usize) {
        (self.bbox_edges.height(), self.bbox_edges.width())
    }

    /// `(height, width)` of the inner-object region.
    pub fn inner_shape(&self) -> (usize, usize) {
        (self.inner_edges.height(), self.inner_edges.width())
    }

    /// True when a cell value belongs to the bounding box (or inner object).
    pub fn bbox_valid(&self, value: f64) -> bool {
        value >= self.bbox_val
    }

    /// True when a cell value belongs to the inner object.
    pub fn inner_valid(&self, value: f64) -> bool {
        value > self.bbox_val
    }

    /// The bounding-box region as a 1-based [`BoundingBox`].
    pub fn bounding_box(&self) -> BoundingBox {
        // an edge box always spans at least one cell, so the extents are valid
        BoundingBox {
            x1: self.bbox_edges.min_x as i64 + 1,
            y1: self.bbox_edges.min_y as i64 + 1,
            nx: self.bbox_edges.width() as i64,
            ny: self.bbox_edges.height() as i64,
            padding: Padding::default(),
        }
    }

    /// Derive a new mask with a fresh bounding box stamped `padding` cells
    /// around the inner object.
    ///
    /// Everything outside the inner object becomes no-data; inside the
    /// buffered window, non-inner cells become the bbox value 0. The input is
    /// untouched, so the operation is safely repeatable; both sub-mask edge
    /// boxes are recomputed for the returned mask. The buffered window is
    /// also returned so callers can inspect the (possibly grid-overrunning)
    /// extent that was requested.
    pub fn add_bbox(&self, padding: &Padding) -> SubsetResult<(SubsetMask, BufferedExtent)> {
        let extent = calculate_buffer_edges(&self.inner_edges, padding);
        let (nz, ny, nx) = self.array.shape();

        let mut new_array = self.array.clone();
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    let value = self.array.get(z, y, x).unwrap_or(self.no_data_value);
                    let stamped = if self.inner_valid(value) {
                        value
                    } else if in_window(&extent, y, x) {
                        0.0
                    } else {
                        self.no_data_value
                    };
                    new_array.set(z, y, x, stamped);
                }
            }
        }
        info!(?padding, ?extent, "stamped bounding box around inner object");
        let mask = SubsetMask::new(
            new_array,
            self.geo_transform,
            self.bbox_val,
            self.no_data_threshold,
            self.no_data_value,
        )?;
        Ok((mask, extent))
    }

    /// Derive a new mask whose bounding box is sized to a multiple of
    /// `side_multiple` along each axis, centered on the inner object.
    pub fn add_bbox_for_multiple(
        &self,
        side_multiple: usize,
    ) -> SubsetResult<(SubsetMask, BufferedExtent)> {
        let dims = calculate_new_dimensions(
            self.inner_edges.width(),
            self.inner_edges.height(),
            side_multiple,
        )?;
        self.add_bbox(&dims.padding)
    }
}

fn in_window(extent: &BufferedExtent, y: usize, x: usize) -> bool {
    let (y, x) = (y as i64, x as i64);
    y >= extent.y_start && y < extent.y_end && x >= extent.x_start && x < extent.x_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::classified_mask;

    /// 1 layer, 10 rows, 12 cols; inner object at rows 4..=5, cols 3..=7.
    fn sample_mask() -> SubsetMask {
        let array = classified_mask(10, 12, (4, 5, 3, 7));
        SubsetMask::with_defaults(array, GeoTransform::default()).unwrap()
    }

    #[test]
    fn test_threshold_invariant_enforced() {
        let array = classified_mask(4, 4, (1, 2, 1, 2));
        let err = SubsetMask::new(array, GeoTransform::default(), -999.0, -999.0, -999.0);
        assert!(matches!(err, Err(SubsetError::MaskThreshold { .. })));
    }

    #[test]
    fn test_empty_selection_fails() {
        let array = Grid3::new_filled(1, 4, 4, NO_DATA_VALUE);
        let err = SubsetMask::with_defaults(array, GeoTransform::default());
        assert!(matches!(err, Err(SubsetError::EmptySelection(_))));
    }

    #[test]
    fn test_edges_located() {
        let mask = sample_mask();
        assert_eq!(
            *mask.inner_edges(),
            MaskEdges {
                min_y: 4,
                max_y: 5,
                min_x: 3,
                max_x: 7
            }
        );
        // no bbox halo yet: bbox edges coincide with the inner edges
        assert_eq!(mask.inner_edges(), mask.bbox_edges());
        assert_eq!(mask.inner_shape(), (2, 5));
    }

    #[test]
    fn test_add_bbox_grows_bbox_only() {
        let mask = sample_mask();
        let (expanded, extent) = mask
            .add_bbox(&Padding::new(1, 1, 1, 1))
            .unwrap();

        assert_eq!(extent.y_start, 3);
        assert_eq!(extent.y_end, 7);
        assert_eq!(extent.x_start, 2);
        assert_eq!(extent.x_end, 9);

        // inner object is unchanged, bbox grew by one cell per side
        assert_eq!(expanded.inner_edges(), mask.inner_edges());
        assert_eq!(
            *expanded.bbox_edges(),
            MaskEdges {
                min_y: 3,
                max_y: 6,
                min_x: 2,
                max_x: 8
            }
        );

        // cell classes: inner keeps 1, halo is 0, outside is no-data
        assert_eq!(expanded.array().get(0, 4, 5), Some(1.0));
        assert_eq!(expanded.array().get(0, 3, 2), Some(0.0));
        assert_eq!(expanded.array().get(0, 0, 0), Some(NO_DATA_VALUE));
    }

    #[test]
    fn test_add_bbox_for_multiple_aligns_shape() {
        let mask = sample_mask();
        // inner shape is (2, 5): multiples of 1 grow to (3, 6)
        let (expanded, _) = mask.add_bbox_for_multiple(1).unwrap();
        assert_eq!(expanded.bbox_shape(), (3, 6));
        assert_eq!(expanded.inner_shape(), (2, 5));
    }

    #[test]
    fn test_add_bbox_is_pure() {
        let mask = sample_mask();
        let before = mask.array().clone();
        let (first, _) = mask.add_bbox(&Padding::new(1, 1, 1, 1)).unwrap();
        let (second, _) = mask.add_bbox(&Padding::new(1, 1, 1, 1)).unwrap();
        // input untouched, results identical
        assert_eq!(mask.array(), &before);
        assert_eq!(first.array(), second.array());
    }

    #[test]
    fn test_add_bbox_zero_padding_idempotent() {
        let mask = sample_mask();
        let (once, _) = mask.add_bbox(&Padding::default()).unwrap();
        let (twice, _) = once.add_bbox(&Padding::default()).unwrap();
        assert_eq!(once.array(), twice.array());
    }

    #[test]
    fn test_add_bbox_overrun_is_clamped_at_stamp() {
        // inner object touching the grid edge: the buffered window runs off
        // the grid; stamping covers the in-grid part and edges stay in range
        let array = classified_mask(6, 6, (0, 1, 0, 1));
        let mask = SubsetMask::with_defaults(array, GeoTransform::default()).unwrap();
        let (expanded, extent) = mask.add_bbox(&Padding::new(2, 2, 2, 2)).unwrap();
        assert!(extent.y_start < 0 && extent.x_start < 0);
        assert_eq!(
            *expanded.bbox_edges(),
            MaskEdges {
                min_y: 0,
                max_y: 3,
                min_x: 0,
                max_x: 3
            }
        );
    }

    #[test]
    fn test_bounding_box_is_one_based() {
        let mask = sample_mask();
        let bbox = mask.bounding_box();
        assert_eq!(bbox.human_bbox(), (4, 5, 5, 2));
    }
}

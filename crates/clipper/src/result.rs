//! The result record every clip operation returns.

use subset_common::{BoundingBox, GeoTransform, Grid3};

/// Everything a clip produces, owned by the caller.
///
/// Box-defined clips carry no georeferencing and no clip mask, so those
/// fields are optional rather than duck-typed placeholders.
#[derive(Debug, Clone)]
pub struct ClipResult {
    /// The extracted (and possibly padded) sub-array.
    pub data: Grid3,
    /// Recomputed geotransform for the clipped origin, when applicable.
    pub geo_transform: Option<GeoTransform>,
    /// 0/1 grid marking the inner-object cells inside the clip window,
    /// when applicable.
    pub mask: Option<Grid3>,
    /// The bounding box that defined the clip.
    pub bounding_box: BoundingBox,
}

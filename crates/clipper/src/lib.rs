//! Clipping engines for regional domain subsetting.
//!
//! Two clipper variants share one contract: [`BoxClipper`] extracts an
//! explicitly specified rectangular region, [`MaskClipper`] extracts the
//! region a prepared [`mask_geometry::SubsetMask`] describes. Both return a
//! [`ClipResult`]. The `bulk` module clips whole lists of co-registered
//! files; the `lsm` module prepares land-surface-model inputs.

pub mod box_clipper;
pub mod bulk;
pub mod lsm;
pub mod mask_clipper;
pub mod result;

pub use box_clipper::BoxClipper;
pub use mask_clipper::{CropMode, MaskClipper};
pub use result::ClipResult;

//! Mask geometry for regional domain subsetting.
//!
//! A full-extent classified mask raster partitions the domain into no-data
//! cells, bounding-box cells and inner-object cells. This crate locates the
//! edges of both regions, computes decomposition-friendly padded dimensions,
//! and derives expanded masks with a fresh bounding box stamped around the
//! inner object.

pub mod dimensions;
pub mod mask;

pub use dimensions::{calculate_buffer_edges, calculate_new_dimensions, BufferedExtent, NewDimensions};
pub use mask::{find_mask_edges, MaskEdges, SubsetMask, INNER_VALUE};

//! Solid-geometry generation for the simulator's mesh importer.
//!
//! A clipped binary domain mask becomes six boundary-patch grids, serialized
//! as ascii rasters and handed to the external mesh-conversion executable,
//! whose per-patch triangle counts are parsed from its output. The flow is a
//! one-way typestate: [`assemble`] → [`AssembledSolid`] → finalize →
//! [`FinalizedSolid`].

pub mod ascii_raster;
pub mod builder;
pub mod mesh_tool;
pub mod patches;

pub use ascii_raster::AsciiRasterGeometry;
pub use builder::{assemble, make_solid_file, AssembledSolid, FinalizedSolid, PatchFiles};
pub use mesh_tool::{parse_batch_counts, MeshTool, BATCH_MARKER};
pub use patches::{build_patches, PatchSet, BOTTOM_PATCH_CODE, TOP_PATCH_CODE};

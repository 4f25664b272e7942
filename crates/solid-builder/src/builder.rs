//! The assemble → write → finalize flow for solid-geometry generation.

use std::path::{Path, PathBuf};

use subset_common::{Grid3, SubsetError, SubsetResult};
use tracing::info;

use crate::ascii_raster::{self, AsciiRasterGeometry};
use crate::mesh_tool::{parse_batch_counts, MeshTool};
use crate::patches::{build_patches, PatchSet};

/// The six serialized patch raster paths handed to the mesh tool.
#[derive(Debug, Clone)]
pub struct PatchFiles {
    pub top: PathBuf,
    pub bottom: PathBuf,
    pub left: PathBuf,
    pub right: PathBuf,
    pub front: PathBuf,
    pub back: PathBuf,
}

/// Patch grids computed but not yet written or converted.
///
/// The only way forward is through [`AssembledSolid::write_patches`] and
/// [`AssembledSolid::finalize`]; there is no way back.
#[derive(Debug, Clone)]
pub struct AssembledSolid {
    patches: PatchSet,
}

/// The finished solid-geometry artifact and its parsed batch counts.
#[derive(Debug, Clone)]
pub struct FinalizedSolid {
    pub solid_path: PathBuf,
    pub vtk_path: PathBuf,
    pub batch_counts: Vec<u64>,
}

impl FinalizedSolid {
    /// The batch counts as the space-joined string downstream run scripts
    /// consume.
    pub fn batch_string(&self) -> String {
        self.batch_counts
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Compute the boundary patches for a clipped binary domain mask.
pub fn assemble(mask: &Grid3) -> SubsetResult<AssembledSolid> {
    Ok(AssembledSolid {
        patches: build_patches(mask)?,
    })
}

impl AssembledSolid {
    pub fn patches(&self) -> &PatchSet {
        &self.patches
    }

    /// Serialize the six patch grids as ascii rasters named
    /// `<out_name>_<Side>_Border.asc` under `out_dir`.
    pub fn write_patches(
        &self,
        out_dir: &Path,
        out_name: &str,
        geometry: &AsciiRasterGeometry,
    ) -> SubsetResult<PatchFiles> {
        let path = |side: &str| out_dir.join(format!("{out_name}_{side}_Border.asc"));
        let files = PatchFiles {
            top: path("Top"),
            bottom: path("Bottom"),
            left: path("Left"),
            right: path("Right"),
            front: path("Front"),
            back: path("Back"),
        };
        ascii_raster::write(&files.top, &self.patches.top, geometry)?;
        ascii_raster::write(&files.bottom, &self.patches.bottom, geometry)?;
        ascii_raster::write(&files.left, &self.patches.left, geometry)?;
        ascii_raster::write(&files.right, &self.patches.right, geometry)?;
        ascii_raster::write(&files.front, &self.patches.front, geometry)?;
        ascii_raster::write(&files.back, &self.patches.back, geometry)?;
        info!(out_dir = %out_dir.display(), out_name, "wrote patch rasters");
        Ok(files)
    }

    /// Drive the mesh tool over written patch files and parse its batch
    /// counts. Zero batches is a hard failure: a solid with no patches is
    /// unusable by the simulator.
    pub fn finalize(
        self,
        tool: &MeshTool,
        patch_files: &PatchFiles,
        out_dir: &Path,
        out_name: &str,
        z_top: f64,
        z_bottom: f64,
    ) -> SubsetResult<FinalizedSolid> {
        let out_base = out_dir.join(out_name);
        let output = tool.convert(patch_files, &out_base, z_top, z_bottom)?;
        let batch_counts = parse_batch_counts(&output);
        if batch_counts.is_empty() {
            return Err(SubsetError::EmptyBatches);
        }
        info!(?batch_counts, "finalized solid geometry");
        Ok(FinalizedSolid {
            solid_path: out_base.with_extension("sol"),
            vtk_path: out_base.with_extension("vtk"),
            batch_counts,
        })
    }
}

/// One-shot convenience: assemble, write and finalize in a single call.
pub fn make_solid_file(
    mask: &Grid3,
    tool: &MeshTool,
    out_dir: &Path,
    out_name: &str,
    geometry: &AsciiRasterGeometry,
    z_top: f64,
    z_bottom: f64,
) -> SubsetResult<FinalizedSolid> {
    let assembled = assemble(mask)?;
    let patch_files = assembled.write_patches(out_dir, out_name, geometry)?;
    assembled.finalize(tool, &patch_files, out_dir, out_name, z_top, z_bottom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn small_mask() -> Grid3 {
        let mut mask = Grid3::new_filled(1, 3, 3, 0.0);
        mask.set(0, 1, 1, 1.0);
        mask.set(0, 1, 2, 1.0);
        mask
    }

    #[test]
    fn test_write_patches_names_and_content() {
        let dir = tempdir().unwrap();
        let assembled = assemble(&small_mask()).unwrap();
        let files = assembled
            .write_patches(dir.path(), "region", &AsciiRasterGeometry::default())
            .unwrap();

        for file in [
            &files.top,
            &files.bottom,
            &files.left,
            &files.right,
            &files.front,
            &files.back,
        ] {
            assert!(file.exists(), "{} missing", file.display());
        }
        assert!(files.top.ends_with("region_Top_Border.asc"));

        let (top, _) = ascii_raster::read(&files.top).unwrap();
        assert_eq!(top.get(1, 1), Some(3.0));
        let (bottom, _) = ascii_raster::read(&files.bottom).unwrap();
        assert_eq!(bottom.get(1, 2), Some(6.0));
    }
}

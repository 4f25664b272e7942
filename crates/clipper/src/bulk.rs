//! Clipping whole lists of co-registered grid files.

use std::path::{Path, PathBuf};

use domain_io::{bbox_file, read_grid, write_grid};
use mask_geometry::SubsetMask;
use subset_common::{BoundingBox, GeoTransform, SubsetResult, NO_DATA_VALUE};
use tracing::info;

use crate::box_clipper::BoxClipper;
use crate::mask_clipper::{CropMode, MaskClipper};

/// Which output formats a bulk clip writes.
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub write_binary: bool,
    pub write_ascii: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            write_binary: true,
            write_ascii: false,
        }
    }
}

/// Clip every input file with a prepared mask clipper, writing `<stem>_clip`
/// outputs into `out_dir`.
pub fn clip_inputs(
    clipper: &MaskClipper,
    inputs: &[PathBuf],
    out_dir: &Path,
    options: &OutputOptions,
) -> SubsetResult<()> {
    for input in inputs {
        let data = read_grid(input)?;
        let result = clipper.subset(&data, NO_DATA_VALUE, CropMode::Inner)?;
        write_outputs(input, out_dir, options, &result.data)?;
    }
    Ok(())
}

/// Clip every input file to an explicit 1-based box `(x1, y1, nx, ny)`.
pub fn box_clip(
    bbox: &BoundingBox,
    inputs: &[PathBuf],
    out_dir: &Path,
    options: &OutputOptions,
) -> SubsetResult<()> {
    for input in inputs {
        let data = read_grid(input)?;
        let clipper = BoxClipper::from_bounding_box(bbox, data.nz(), data.shape())?;
        let result = clipper.subset(&data)?;
        write_outputs(input, out_dir, options, &result.data)?;
    }
    Ok(())
}

/// Clip every input file using a classified mask raster, and write the
/// bounding-box artifact alongside the clipped outputs.
pub fn mask_clip(
    mask_file: &Path,
    inputs: &[PathBuf],
    out_dir: &Path,
    options: &OutputOptions,
) -> SubsetResult<()> {
    let mask_array = read_grid(mask_file)?;
    let mask = SubsetMask::with_defaults(mask_array, GeoTransform::default())?;
    let clipper = MaskClipper::new(&mask);
    clip_inputs(&clipper, inputs, out_dir, options)?;
    bbox_file::write(&out_dir.join("bbox.txt"), &clipper.bounding_box())?;
    Ok(())
}

fn write_outputs(
    input: &Path,
    out_dir: &Path,
    options: &OutputOptions,
    data: &subset_common::Grid3,
) -> SubsetResult<()> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("clip");
    if options.write_binary {
        let out = out_dir.join(format!("{stem}_clip.bin"));
        write_grid(&out, data)?;
        info!(input = %input.display(), output = %out.display(), "wrote clipped binary grid");
    }
    if options.write_ascii {
        let out = out_dir.join(format!("{stem}_clip.sa"));
        write_grid(&out, data)?;
        info!(input = %input.display(), output = %out.display(), "wrote clipped ascii grid");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use test_utils::{classified_mask_with_halo, sequential_grid};

    #[test]
    fn test_mask_clip_writes_outputs_and_bbox() {
        let dir = tempdir().unwrap();
        let mask_path = dir.path().join("mask.sa");
        let data_path = dir.path().join("dem.sa");

        let mask = classified_mask_with_halo(8, 8, (2, 4, 2, 5), 1);
        domain_io::simple_ascii::write(&mask_path, &mask).unwrap();
        domain_io::simple_ascii::write(&data_path, &sequential_grid(1, 8, 8)).unwrap();

        mask_clip(
            &mask_path,
            &[data_path],
            dir.path(),
            &OutputOptions {
                write_binary: true,
                write_ascii: true,
            },
        )
        .unwrap();

        assert!(dir.path().join("dem_clip.bin").exists());
        assert!(dir.path().join("dem_clip.sa").exists());
        let bbox = bbox_file::read(&dir.path().join("bbox.txt")).unwrap();
        // one-cell halo around rows 2..=4, cols 2..=5, 1-based
        assert_eq!(bbox.human_bbox(), (2, 2, 6, 5));
    }

    #[test]
    fn test_box_clip_writes_expected_shape() {
        let dir = tempdir().unwrap();
        let data_path = dir.path().join("slope.sa");
        domain_io::simple_ascii::write(&data_path, &sequential_grid(2, 8, 8)).unwrap();

        let bbox = BoundingBox::new(2, 3, 4, 5).unwrap();
        box_clip(
            &bbox,
            &[data_path],
            dir.path(),
            &OutputOptions {
                write_binary: false,
                write_ascii: true,
            },
        )
        .unwrap();

        let clipped = domain_io::read_grid(&dir.path().join("slope_clip.sa")).unwrap();
        assert_eq!(clipped.shape(), (2, 5, 4));
    }
}

//! Land-surface-model input preparation.
//!
//! The land-surface model wants rectangular inputs, so these clips use the
//! bounding box rather than the irregular inner shape: a two-layer lat/lon
//! grid (layer 0 latitude, layer 1 longitude) and a single-layer land-cover
//! class grid, combined into the vegetation-map table the model reads.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use subset_common::{BoundingBox, Grid3, SubsetError, SubsetResult};
use tracing::info;

use crate::box_clipper::BoxClipper;

const SAND_FRACTION: f64 = 0.16;
const CLAY_FRACTION: f64 = 0.26;
const SOIL_COLOR: u32 = 2;
const VEGETATION_CLASSES: usize = 18;

/// One row of the vegetation-map table: a grid cell's coordinates, soil
/// constants and one-hot vegetation class coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct VegmRow {
    pub x: usize,
    pub y: usize,
    pub lat: f64,
    pub lon: f64,
    pub sand: f64,
    pub clay: f64,
    pub color: u32,
    pub classes: [u8; VEGETATION_CLASSES],
}

/// Clips land-surface-model inputs to a mask's bounding box.
#[derive(Debug, Clone)]
pub struct LsmClipper {
    bbox: BoundingBox,
}

impl LsmClipper {
    pub fn new(bbox: BoundingBox) -> Self {
        Self { bbox }
    }

    /// Clip the two-layer lat/lon grid to the bounding box.
    pub fn clip_latlon(&self, data: &Grid3) -> SubsetResult<Grid3> {
        if data.nz() != 2 {
            return Err(SubsetError::shape_mismatch(
                "2 layers (lat, lon)",
                format!("{} layers", data.nz()),
            ));
        }
        self.clip(data)
    }

    /// Clip the land-cover class grid to the bounding box.
    pub fn clip_land_cover(&self, data: &Grid3) -> SubsetResult<Grid3> {
        self.clip(data)
    }

    fn clip(&self, data: &Grid3) -> SubsetResult<Grid3> {
        let clipper = BoxClipper::from_bounding_box(&self.bbox, data.nz(), data.shape())?;
        Ok(clipper.subset(data)?.data)
    }
}

/// Combine clipped lat/lon and land-cover grids into vegetation-map rows.
///
/// Rows run x fastest, 1-based cell indices. Every land-cover value must be
/// a class index in `1..=18`.
pub fn vegetation_map(latlon: &Grid3, land_cover: &Grid3) -> SubsetResult<Vec<VegmRow>> {
    if latlon.ny() != land_cover.ny() || latlon.nx() != land_cover.nx() {
        return Err(SubsetError::shape_mismatch(
            format!("{}x{} lat/lon extents", latlon.ny(), latlon.nx()),
            format!("{}x{} land cover extents", land_cover.ny(), land_cover.nx()),
        ));
    }
    let (ny, nx) = (land_cover.ny(), land_cover.nx());
    let mut rows = Vec::with_capacity(ny * nx);
    for y in 0..ny {
        for x in 0..nx {
            let class = land_cover.get(0, y, x).unwrap_or(0.0);
            let class_idx = class as i64;
            if class_idx < 1 || class_idx > VEGETATION_CLASSES as i64 {
                return Err(SubsetError::invalid_dimension(format!(
                    "land cover class {class} at ({y}, {x}) outside 1..={VEGETATION_CLASSES}"
                )));
            }
            let mut classes = [0u8; VEGETATION_CLASSES];
            classes[(class_idx - 1) as usize] = 1;
            rows.push(VegmRow {
                x: x + 1,
                y: y + 1,
                lat: latlon.get(0, y, x).unwrap_or(0.0),
                lon: latlon.get(1, y, x).unwrap_or(0.0),
                sand: SAND_FRACTION,
                clay: CLAY_FRACTION,
                color: SOIL_COLOR,
                classes,
            });
        }
    }
    info!(rows = rows.len(), "built vegetation map");
    Ok(rows)
}

/// Write the vegetation-map table in the model's text format.
pub fn write_vegetation_map(path: &Path, rows: &[VegmRow]) -> SubsetResult<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    writeln!(
        out,
        "x y lat lon sand clay color fractional coverage of grid, by vegetation class \
         (Must/Should Add to 1.0)"
    )?;
    writeln!(
        out,
        "  (Deg) (Deg) (%/100) index 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18"
    )?;
    for row in rows {
        write!(
            out,
            "{} {} {:.6} {:.6} {:.2} {:.2} {}",
            row.x, row.y, row.lat, row.lon, row.sand, row.clay, row.color
        )?;
        for class in &row.classes {
            write!(out, " {class}")?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    info!(path = %path.display(), rows = rows.len(), "wrote vegetation map");
    Ok(())
}

/// Write the clipped lat/lon grid as paired `lat lon` text lines with an
/// `nx ny nz` header.
pub fn write_latlon(path: &Path, latlon: &Grid3) -> SubsetResult<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    let (_, ny, nx) = latlon.shape();
    writeln!(out, "{nx} {ny} 1")?;
    for y in 0..ny {
        for x in 0..nx {
            let lat = latlon.get(0, y, x).unwrap_or(0.0);
            let lon = latlon.get(1, y, x).unwrap_or(0.0);
            writeln!(out, "{lat} {lon}")?;
        }
    }
    out.flush()?;
    info!(path = %path.display(), "wrote lat/lon grid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latlon_grid(ny: usize, nx: usize) -> Grid3 {
        let mut grid = Grid3::new_filled(2, ny, nx, 0.0);
        for y in 0..ny {
            for x in 0..nx {
                grid.set(0, y, x, 34.0 + y as f64 * 0.01);
                grid.set(1, y, x, -98.0 + x as f64 * 0.01);
            }
        }
        grid
    }

    #[test]
    fn test_clip_latlon_requires_two_layers() {
        let clipper = LsmClipper::new(BoundingBox::new(1, 1, 2, 2).unwrap());
        let single = Grid3::new_filled(1, 4, 4, 0.0);
        assert!(clipper.clip_latlon(&single).is_err());

        let clipped = clipper.clip_latlon(&latlon_grid(4, 4)).unwrap();
        assert_eq!(clipped.shape(), (2, 2, 2));
    }

    #[test]
    fn test_vegetation_map_one_hot() {
        let latlon = latlon_grid(2, 2);
        let mut cover = Grid3::new_filled(1, 2, 2, 1.0);
        cover.set(0, 1, 1, 18.0);
        let rows = vegetation_map(&latlon, &cover).unwrap();
        assert_eq!(rows.len(), 4);

        // x runs fastest, 1-based
        assert_eq!((rows[0].x, rows[0].y), (1, 1));
        assert_eq!((rows[1].x, rows[1].y), (2, 1));
        assert_eq!(rows[0].classes[0], 1);
        assert_eq!(rows[0].classes.iter().map(|&c| c as u32).sum::<u32>(), 1);
        assert_eq!(rows[3].classes[17], 1);
        assert_eq!(rows[0].sand, 0.16);
        assert_eq!(rows[0].clay, 0.26);
        assert_eq!(rows[0].color, 2);
    }

    #[test]
    fn test_vegetation_map_rejects_bad_class() {
        let latlon = latlon_grid(2, 2);
        let cover = Grid3::new_filled(1, 2, 2, 19.0);
        assert!(vegetation_map(&latlon, &cover).is_err());
    }

    #[test]
    fn test_write_vegetation_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vegm.dat");
        let latlon = latlon_grid(2, 2);
        let cover = Grid3::new_filled(1, 2, 2, 3.0);
        let rows = vegetation_map(&latlon, &cover).unwrap();
        write_vegetation_map(&path, &rows).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("x y lat lon"));
        lines.next();
        let first = lines.next().unwrap();
        assert!(first.starts_with("1 1 34.000000 -98.000000 0.16 0.26 2"));
        assert!(first.ends_with("0 0 1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0"));
    }
}

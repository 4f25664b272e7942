//! File format codecs for the subsetting pipeline.
//!
//! Pure Rust readers/writers for the formats the pipeline produces and
//! consumes:
//! - `binary`: the simulator's packed big-endian grid format
//! - `simple_ascii`: the plain-text grid format (`.sa`)
//! - `bbox_file`: the tab-separated bounding-box artifact
//!
//! Georeferenced raster formats (GeoTIFF and friends) belong to an external
//! GIS backend and are intentionally not handled here.

pub mod bbox_file;
pub mod binary;
pub mod simple_ascii;

use std::path::Path;

use subset_common::{Grid3, SubsetError, SubsetResult};

pub use binary::GridOrigin;

/// Read a grid file, dispatching on the file extension.
///
/// `.bin` is the packed binary format, `.sa` the simple ascii format.
pub fn read_grid(path: &Path) -> SubsetResult<Grid3> {
    match extension(path)?.as_str() {
        "bin" => Ok(binary::read(path)?.0),
        "sa" => simple_ascii::read(path),
        other => Err(SubsetError::UnsupportedFormat(other.to_string())),
    }
}

/// Write a grid file, dispatching on the file extension.
///
/// Binary output uses the default [`GridOrigin`]; callers that need a
/// specific origin or spacing call [`binary::write`] directly.
pub fn write_grid(path: &Path, grid: &Grid3) -> SubsetResult<()> {
    match extension(path)?.as_str() {
        "bin" => binary::write(path, grid, &GridOrigin::default()),
        "sa" => simple_ascii::write(path, grid),
        other => Err(SubsetError::UnsupportedFormat(other.to_string())),
    }
}

fn extension(path: &Path) -> SubsetResult<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| SubsetError::UnsupportedFormat(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension_rejected() {
        let err = read_grid(Path::new("mask.tif"));
        assert!(matches!(err, Err(SubsetError::UnsupportedFormat(_))));
    }
}

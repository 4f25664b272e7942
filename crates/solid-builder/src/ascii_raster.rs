//! Ascii raster serialization for patch grids.
//!
//! The mesh tool reads a simple header-plus-values text format: column and
//! row counts, the lower-left corner origin, the cell size and a no-data
//! sentinel, followed by row-major values written north row first.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use subset_common::{Grid2, SubsetError, SubsetResult};
use tracing::info;

/// Georeferencing carried in an ascii raster header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsciiRasterGeometry {
    pub xllcorner: f64,
    pub yllcorner: f64,
    pub cellsize: f64,
    pub no_data: f64,
}

impl Default for AsciiRasterGeometry {
    fn default() -> Self {
        Self {
            xllcorner: 0.0,
            yllcorner: 0.0,
            cellsize: 1000.0,
            no_data: -999.0,
        }
    }
}

/// Write a patch grid as an ascii raster.
///
/// Grid rows run south to north; the file wants the north row first, so rows
/// are written in reverse.
pub fn write(path: &Path, grid: &Grid2, geometry: &AsciiRasterGeometry) -> SubsetResult<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "ncols {}", grid.nx())?;
    writeln!(out, "nrows {}", grid.ny())?;
    writeln!(out, "xllcorner {}", geometry.xllcorner)?;
    writeln!(out, "yllcorner {}", geometry.yllcorner)?;
    writeln!(out, "cellsize {}", geometry.cellsize)?;
    writeln!(out, "NODATA_value {}", geometry.no_data)?;
    for y in (0..grid.ny()).rev() {
        let mut row = String::with_capacity(grid.nx() * 4);
        for x in 0..grid.nx() {
            if x > 0 {
                row.push(' ');
            }
            row.push_str(&format!("{}", grid.get(y, x).unwrap_or(geometry.no_data)));
        }
        writeln!(out, "{row}")?;
    }
    out.flush()?;
    info!(path = %path.display(), ncols = grid.nx(), nrows = grid.ny(), "wrote ascii raster");
    Ok(())
}

/// Read an ascii raster back into a grid. Used by round-trip tests and
/// debugging; the pipeline itself only writes this format.
pub fn read(path: &Path) -> SubsetResult<(Grid2, AsciiRasterGeometry)> {
    let name = path.display().to_string();
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let mut header_value = |key: &str| -> SubsetResult<f64> {
        let line = lines
            .next()
            .ok_or_else(|| SubsetError::parse(&name, format!("missing header line {key}")))??;
        let mut parts = line.split_whitespace();
        let found = parts
            .next()
            .ok_or_else(|| SubsetError::parse(&name, "empty header line"))?;
        if !found.eq_ignore_ascii_case(key) {
            return Err(SubsetError::parse(
                &name,
                format!("expected header '{key}', got '{found}'"),
            ));
        }
        parts
            .next()
            .ok_or_else(|| SubsetError::parse(&name, format!("header '{key}' has no value")))?
            .parse()
            .map_err(|e| SubsetError::parse(&name, format!("bad '{key}' value: {e}")))
    };

    let ncols = header_value("ncols")? as usize;
    let nrows = header_value("nrows")? as usize;
    let geometry = AsciiRasterGeometry {
        xllcorner: header_value("xllcorner")?,
        yllcorner: header_value("yllcorner")?,
        cellsize: header_value("cellsize")?,
        no_data: header_value("NODATA_value")?,
    };

    let mut grid = Grid2::new_filled(nrows, ncols, geometry.no_data);
    let mut row = 0usize;
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if row >= nrows {
            return Err(SubsetError::parse(&name, "more rows than the header declares"));
        }
        let values: Vec<f64> = line
            .split_whitespace()
            .map(|t| t.parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| SubsetError::parse(&name, format!("bad value in row {row}: {e}")))?;
        if values.len() != ncols {
            return Err(SubsetError::parse(
                &name,
                format!("row {row} has {} values, expected {ncols}", values.len()),
            ));
        }
        // file rows are north first; grid rows are south first
        let y = nrows - 1 - row;
        for (x, value) in values.into_iter().enumerate() {
            grid.set(y, x, value);
        }
        row += 1;
    }
    if row != nrows {
        return Err(SubsetError::parse(
            &name,
            format!("{row} data rows, header declares {nrows}"),
        ));
    }
    Ok((grid, geometry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patch.asc");
        let mut grid = Grid2::new_filled(3, 4, 0.0);
        grid.set(0, 0, 3.0);
        grid.set(2, 3, 6.0);
        let geometry = AsciiRasterGeometry {
            xllcorner: -1885055.5,
            yllcorner: -604957.0,
            cellsize: 1000.0,
            no_data: -999.0,
        };
        write(&path, &grid, &geometry).unwrap();
        let (read_back, read_geometry) = read(&path).unwrap();
        assert_eq!(read_back, grid);
        assert_eq!(read_geometry, geometry);
    }

    #[test]
    fn test_north_row_written_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patch.asc");
        let mut grid = Grid2::new_filled(2, 2, 0.0);
        grid.set(1, 0, 9.0); // north-west cell
        write(&path, &grid, &AsciiRasterGeometry::default()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let data_lines: Vec<&str> = content.lines().skip(6).collect();
        assert_eq!(data_lines[0], "9 0");
        assert_eq!(data_lines[1], "0 0");
    }

    #[test]
    fn test_row_count_mismatch_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.asc");
        std::fs::write(
            &path,
            "ncols 2\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\nNODATA_value -999\n1 2\n",
        )
        .unwrap();
        assert!(matches!(read(&path), Err(SubsetError::ParseError { .. })));
    }
}

//! The simple ascii grid format (`.sa`).
//!
//! A header line `nx ny nz` followed by one value per line, x varying
//! fastest, then y, then z.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use subset_common::{Grid3, SubsetError, SubsetResult};
use tracing::info;

/// Read a simple ascii grid file.
pub fn read(path: &Path) -> SubsetResult<Grid3> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();
    let name = path.display().to_string();

    let header = lines
        .next()
        .ok_or_else(|| SubsetError::parse(&name, "missing header line"))??;
    let dims: Vec<usize> = header
        .split_whitespace()
        .map(|t| t.parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|e| SubsetError::parse(&name, format!("bad header '{header}': {e}")))?;
    let [nx, ny, nz] = dims[..] else {
        return Err(SubsetError::parse(
            &name,
            format!("header must be 'nx ny nz', got '{header}'"),
        ));
    };

    let mut data = Vec::with_capacity(nx * ny * nz);
    for line in lines {
        let line = line?;
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        let value: f64 = token
            .parse()
            .map_err(|e| SubsetError::parse(&name, format!("bad value '{token}': {e}")))?;
        data.push(value);
    }
    let grid = Grid3::from_vec(data, nz, ny, nx)?;
    info!(path = %path.display(), shape = ?grid.shape(), "read simple ascii grid");
    Ok(grid)
}

/// Write a grid as a simple ascii file.
pub fn write(path: &Path, grid: &Grid3) -> SubsetResult<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    let (nz, ny, nx) = grid.shape();
    writeln!(out, "{nx} {ny} {nz}")?;
    for value in grid.data() {
        writeln!(out, "{value}")?;
    }
    out.flush()?;
    info!(path = %path.display(), shape = ?grid.shape(), "wrote simple ascii grid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("values.sa");
        let data: Vec<f64> = (0..24).map(|i| i as f64 - 5.5).collect();
        let grid = Grid3::from_vec(data, 2, 3, 4).unwrap();
        write(&path, &grid).unwrap();
        assert_eq!(read(&path).unwrap(), grid);
    }

    #[test]
    fn test_header_value_count_mismatch_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.sa");
        std::fs::write(&path, "2 2 1\n1.0\n2.0\n3.0\n").unwrap();
        assert!(read(&path).is_err());
    }

    #[test]
    fn test_bad_header_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.sa");
        std::fs::write(&path, "2 2\n1\n2\n3\n4\n").unwrap();
        assert!(matches!(read(&path), Err(SubsetError::ParseError { .. })));
    }
}

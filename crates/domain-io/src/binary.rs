//! The simulator's packed binary grid format.
//!
//! Big-endian throughout. The file header carries the grid origin, the full
//! extents, the cell spacing and a subgrid count; each subgrid carries its
//! own offsets and extents followed by its cell values in `(z, y, x)` order.
//! A writer here always emits a single subgrid covering the whole grid; the
//! reader assembles any subgrid tiling.

use std::fs;
use std::path::Path;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use subset_common::{Grid3, SubsetError, SubsetResult};
use tracing::info;

/// World origin and cell spacing stored in a packed binary grid header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOrigin {
    pub x0: f64,
    pub y0: f64,
    pub z0: f64,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Default for GridOrigin {
    fn default() -> Self {
        // the continental grids this pipeline clips use 1km cells
        Self {
            x0: 0.0,
            y0: 0.0,
            z0: 0.0,
            dx: 1000.0,
            dy: 1000.0,
            dz: 1000.0,
        }
    }
}

/// Read a packed binary grid file.
pub fn read(path: &Path) -> SubsetResult<(Grid3, GridOrigin)> {
    let raw = fs::read(path)?;
    let grid = decode(Bytes::from(raw), &path.display().to_string())?;
    info!(path = %path.display(), shape = ?grid.0.shape(), "read packed binary grid");
    Ok(grid)
}

/// Write a grid as a packed binary file with a single subgrid.
pub fn write(path: &Path, grid: &Grid3, origin: &GridOrigin) -> SubsetResult<()> {
    let buf = encode(grid, origin);
    fs::write(path, &buf)?;
    info!(path = %path.display(), shape = ?grid.shape(), "wrote packed binary grid");
    Ok(())
}

fn decode(mut buf: Bytes, file: &str) -> SubsetResult<(Grid3, GridOrigin)> {
    let need = |buf: &Bytes, n: usize, what: &str| -> SubsetResult<()> {
        if buf.remaining() < n {
            return Err(SubsetError::parse(
                file,
                format!("truncated while reading {what}"),
            ));
        }
        Ok(())
    };

    need(&buf, 3 * 8 + 3 * 4 + 3 * 8 + 4, "header")?;
    let (x0, y0, z0) = (buf.get_f64(), buf.get_f64(), buf.get_f64());
    let nx = buf.get_i32();
    let ny = buf.get_i32();
    let nz = buf.get_i32();
    let (dx, dy, dz) = (buf.get_f64(), buf.get_f64(), buf.get_f64());
    let n_subgrids = buf.get_i32();

    if nx < 1 || ny < 1 || nz < 1 || n_subgrids < 1 {
        return Err(SubsetError::parse(
            file,
            format!("invalid header extents nx={nx}, ny={ny}, nz={nz}, subgrids={n_subgrids}"),
        ));
    }
    let (nx, ny, nz) = (nx as usize, ny as usize, nz as usize);
    let mut grid = Grid3::new_filled(nz, ny, nx, 0.0);

    for s in 0..n_subgrids {
        need(&buf, 9 * 4, "subgrid header")?;
        let ix = buf.get_i32();
        let iy = buf.get_i32();
        let iz = buf.get_i32();
        let snx = buf.get_i32();
        let sny = buf.get_i32();
        let snz = buf.get_i32();
        // refinement levels, unused by this pipeline
        let (_rx, _ry, _rz) = (buf.get_i32(), buf.get_i32(), buf.get_i32());

        if ix < 0
            || iy < 0
            || iz < 0
            || snx < 1
            || sny < 1
            || snz < 1
            || ix as usize + snx as usize > nx
            || iy as usize + sny as usize > ny
            || iz as usize + snz as usize > nz
        {
            return Err(SubsetError::parse(
                file,
                format!("subgrid {s} does not fit the grid extents"),
            ));
        }
        let (ix, iy, iz) = (ix as usize, iy as usize, iz as usize);
        let (snx, sny, snz) = (snx as usize, sny as usize, snz as usize);

        need(&buf, snx * sny * snz * 8, "subgrid values")?;
        for z in 0..snz {
            for y in 0..sny {
                for x in 0..snx {
                    grid.set(iz + z, iy + y, ix + x, buf.get_f64());
                }
            }
        }
    }

    let origin = GridOrigin {
        x0,
        y0,
        z0,
        dx,
        dy,
        dz,
    };
    Ok((grid, origin))
}

fn encode(grid: &Grid3, origin: &GridOrigin) -> BytesMut {
    let (nz, ny, nx) = grid.shape();
    let mut buf = BytesMut::with_capacity(64 + grid.len() * 8);
    buf.put_f64(origin.x0);
    buf.put_f64(origin.y0);
    buf.put_f64(origin.z0);
    buf.put_i32(nx as i32);
    buf.put_i32(ny as i32);
    buf.put_i32(nz as i32);
    buf.put_f64(origin.dx);
    buf.put_f64(origin.dy);
    buf.put_f64(origin.dz);
    buf.put_i32(1); // single subgrid

    buf.put_i32(0); // ix
    buf.put_i32(0); // iy
    buf.put_i32(0); // iz
    buf.put_i32(nx as i32);
    buf.put_i32(ny as i32);
    buf.put_i32(nz as i32);
    buf.put_i32(1); // rx
    buf.put_i32(1); // ry
    buf.put_i32(1); // rz
    for &value in grid.data() {
        buf.put_f64(value);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sequential(nz: usize, ny: usize, nx: usize) -> Grid3 {
        let data: Vec<f64> = (0..nz * ny * nx).map(|i| i as f64 * 0.5).collect();
        Grid3::from_vec(data, nz, ny, nx).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.bin");
        let grid = sequential(3, 4, 5);
        let origin = GridOrigin {
            x0: -1885055.5,
            y0: -604957.0,
            z0: 0.0,
            dx: 1000.0,
            dy: 1000.0,
            dz: 2.0,
        };
        write(&path, &grid, &origin).unwrap();
        let (read_back, read_origin) = read(&path).unwrap();
        assert_eq!(read_back, grid);
        assert_eq!(read_origin, origin);
    }

    #[test]
    fn test_truncated_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.bin");
        let grid = sequential(1, 2, 2);
        write(&path, &grid, &GridOrigin::default()).unwrap();

        let raw = fs::read(&path).unwrap();
        fs::write(&path, &raw[..raw.len() - 12]).unwrap();
        let err = read(&path);
        assert!(matches!(err, Err(SubsetError::ParseError { .. })));
    }

    #[test]
    fn test_subgrid_overrun_fails() {
        // hand-build a header whose subgrid claims more cells than the grid
        let mut buf = BytesMut::new();
        buf.put_f64(0.0);
        buf.put_f64(0.0);
        buf.put_f64(0.0);
        buf.put_i32(2);
        buf.put_i32(2);
        buf.put_i32(1);
        buf.put_f64(1.0);
        buf.put_f64(1.0);
        buf.put_f64(1.0);
        buf.put_i32(1);
        for v in [0, 0, 0, 3, 2, 1, 1, 1, 1] {
            buf.put_i32(v);
        }
        let err = decode(buf.freeze(), "synthetic");
        assert!(matches!(err, Err(SubsetError::ParseError { .. })));
    }
}

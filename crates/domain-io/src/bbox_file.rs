//! The tab-separated bounding-box artifact.
//!
//! A header line `x1\ty1\tnx\tny` followed by a single data row of 1-based
//! values.

use std::fs;
use std::path::Path;

use subset_common::{BoundingBox, SubsetError, SubsetResult};
use tracing::info;

/// Write a bounding box to its text artifact.
pub fn write(path: &Path, bbox: &BoundingBox) -> SubsetResult<()> {
    let (x1, y1, nx, ny) = bbox.human_bbox();
    fs::write(path, format!("x1\ty1\tnx\tny\n{x1}\t{y1}\t{nx}\t{ny}\n"))?;
    info!(path = %path.display(), ?bbox, "wrote bounding box file");
    Ok(())
}

/// Read a bounding box from its text artifact.
///
/// Invalid extents fail here rather than at first use.
pub fn read(path: &Path) -> SubsetResult<BoundingBox> {
    let name = path.display().to_string();
    let content = fs::read_to_string(path)?;
    let data_row = content
        .lines()
        .nth(1)
        .ok_or_else(|| SubsetError::parse(&name, "missing data row"))?;
    let values: Vec<i64> = data_row
        .split('\t')
        .map(|t| t.trim().parse::<i64>())
        .collect::<Result<_, _>>()
        .map_err(|e| SubsetError::parse(&name, format!("bad data row '{data_row}': {e}")))?;
    let [x1, y1, nx, ny] = values[..] else {
        return Err(SubsetError::parse(
            &name,
            format!("expected 4 tab-separated values, got '{data_row}'"),
        ));
    };
    BoundingBox::new(x1, y1, nx, ny)
}

//! Padding and dimension arithmetic for decomposition-friendly clips.

use subset_common::{Padding, SubsetError, SubsetResult};
use tracing::{info, warn};

use crate::mask::MaskEdges;

/// The padded dimensions computed for a clip region.
///
/// `padding.top`/`padding.left` apply on the low-index side of the row/column
/// axes, `padding.bottom`/`padding.right` on the high-index side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewDimensions {
    pub padding: Padding,
    pub new_len_x: usize,
    pub new_len_y: usize,
}

/// Compute the smallest dimensions that are multiples of `side_multiple` and
/// hold a `len_x` by `len_y` region, plus the per-side padding that centers
/// the region inside them.
///
/// The new length is `((len / side_multiple) + 1) * side_multiple`, so at
/// least one full multiple of slack is always added, even when `len` already
/// divides evenly. Callers needing exact multiples without slack must
/// special-case that themselves. Padding splits as floor/remainder, the
/// remainder going to the trailing side, so that
/// `pad_before + pad_after + len == new_len` exactly.
pub fn calculate_new_dimensions(
    len_x: usize,
    len_y: usize,
    side_multiple: usize,
) -> SubsetResult<NewDimensions> {
    if side_multiple < 1 || len_x < 1 || len_y < 1 {
        return Err(SubsetError::invalid_dimension(format!(
            "lengths and side multiple must be >= 1, got len_x={len_x}, len_y={len_y}, \
             side_multiple={side_multiple}"
        )));
    }
    let new_len_y = ((len_y / side_multiple) + 1) * side_multiple;
    let top_pad = (new_len_y - len_y) / 2;
    let bottom_pad = new_len_y - len_y - top_pad;
    let new_len_x = ((len_x / side_multiple) + 1) * side_multiple;
    let left_pad = (new_len_x - len_x) / 2;
    let right_pad = new_len_x - len_x - left_pad;
    info!(
        side_multiple,
        len_x,
        len_y,
        new_len_x,
        new_len_y,
        top_pad,
        bottom_pad,
        left_pad,
        right_pad,
        "calculated new dimensions"
    );
    Ok(NewDimensions {
        padding: Padding::new(top_pad, right_pad, bottom_pad, left_pad),
        new_len_x,
        new_len_y,
    })
}

/// Half-open row/column ranges of a buffered region.
///
/// Values are signed: a negative start means the requested buffer runs off
/// the source grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferedExtent {
    pub y_start: i64,
    pub y_end: i64,
    pub x_start: i64,
    pub x_end: i64,
}

impl BufferedExtent {
    /// Height of the buffered region in cells.
    pub fn height(&self) -> i64 {
        self.y_end - self.y_start
    }

    /// Width of the buffered region in cells.
    pub fn width(&self) -> i64 {
        self.x_end - self.x_start
    }
}

/// Expand a tight inclusive edge box outward by per-side padding.
///
/// The max sides become exclusive (`max + pad + 1`) so the result is ready
/// for half-open slicing. A negative start edge is logged, not raised: the
/// clip proceeds and the out-of-range slice fails loud downstream instead of
/// being silently clamped here.
pub fn calculate_buffer_edges(edges: &MaskEdges, padding: &Padding) -> BufferedExtent {
    let extent = BufferedExtent {
        y_start: edges.min_y as i64 - padding.top as i64,
        y_end: edges.max_y as i64 + padding.bottom as i64 + 1,
        x_start: edges.min_x as i64 - padding.left as i64,
        x_end: edges.max_x as i64 + padding.right as i64 + 1,
    };
    info!(?edges, ?padding, ?extent, "calculated buffer edges");
    if extent.x_start < 0 || extent.y_start < 0 {
        warn!(?extent, "buffered edge is negative, region runs off the source grid");
    }
    extent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dimensions_uneven_split() {
        let dims = calculate_new_dimensions(7, 31, 32).unwrap();
        assert_eq!(dims.new_len_x, 32);
        assert_eq!(dims.new_len_y, 32);
        assert_eq!(dims.padding.top, 0);
        assert_eq!(dims.padding.bottom, 1);
        assert_eq!(dims.padding.left, 12);
        assert_eq!(dims.padding.right, 13);
    }

    #[test]
    fn test_new_dimensions_exact_multiple_still_grows() {
        // A length that already divides evenly still gains a full multiple.
        let dims = calculate_new_dimensions(32, 32, 32).unwrap();
        assert_eq!(dims.new_len_x, 64);
        assert_eq!(dims.new_len_y, 64);
        assert_eq!(dims.padding, Padding::new(16, 16, 16, 16));
    }

    #[test]
    fn test_new_dimensions_small_multiples() {
        let dims = calculate_new_dimensions(4, 4, 2).unwrap();
        assert_eq!(dims.new_len_x, 6);
        assert_eq!(dims.new_len_y, 6);
        assert_eq!(dims.padding, Padding::new(1, 1, 1, 1));

        let dims = calculate_new_dimensions(3, 3, 1).unwrap();
        assert_eq!(dims.new_len_x, 4);
        assert_eq!(dims.new_len_y, 4);
        assert_eq!(dims.padding.top, 0);
        assert_eq!(dims.padding.bottom, 1);
        assert_eq!(dims.padding.left, 0);
        assert_eq!(dims.padding.right, 1);
    }

    #[test]
    fn test_new_dimensions_padding_sums() {
        for (len_x, len_y, multiple) in [(7, 31, 32), (1, 1, 1), (100, 3, 8), (15, 16, 16)] {
            let dims = calculate_new_dimensions(len_x, len_y, multiple).unwrap();
            assert_eq!(dims.padding.left + dims.padding.right + len_x, dims.new_len_x);
            assert_eq!(dims.padding.top + dims.padding.bottom + len_y, dims.new_len_y);
            assert_eq!(dims.new_len_x % multiple, 0);
            assert_eq!(dims.new_len_y % multiple, 0);
            assert!(dims.new_len_x >= len_x + 1);
            assert!(dims.new_len_y >= len_y + 1);
        }
    }

    #[test]
    fn test_new_dimensions_rejects_zero() {
        assert!(calculate_new_dimensions(0, 4, 2).is_err());
        assert!(calculate_new_dimensions(4, 4, 0).is_err());
    }

    #[test]
    fn test_buffer_edges_exclusive_max() {
        let edges = MaskEdges {
            min_y: 4,
            max_y: 5,
            min_x: 3,
            max_x: 7,
        };
        let extent = calculate_buffer_edges(&edges, &Padding::new(0, 1, 1, 0));
        assert_eq!(extent.y_start, 4);
        assert_eq!(extent.y_end, 7);
        assert_eq!(extent.x_start, 3);
        assert_eq!(extent.x_end, 9);
        assert_eq!(extent.height(), 3);
        assert_eq!(extent.width(), 6);
    }

    #[test]
    fn test_buffer_edges_can_go_negative() {
        let edges = MaskEdges {
            min_y: 1,
            max_y: 2,
            min_x: 0,
            max_x: 2,
        };
        let extent = calculate_buffer_edges(&edges, &Padding::new(3, 0, 0, 2));
        assert_eq!(extent.y_start, -2);
        assert_eq!(extent.x_start, -2);
    }
}

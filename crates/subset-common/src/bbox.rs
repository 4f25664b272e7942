//! Grid-index bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::error::{SubsetError, SubsetResult};

/// Per-side cell padding, specified clockwise from the top (CSS style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub left: usize,
}

impl Padding {
    /// Create a padding value, clockwise from top.
    pub fn new(top: usize, right: usize, bottom: usize, left: usize) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// True when every side is zero.
    pub fn is_zero(&self) -> bool {
        self.top == 0 && self.right == 0 && self.bottom == 0 && self.left == 0
    }
}

/// A rectangular region of grid cells.
///
/// The origin `(x1, y1)` is 1-based: a human reads `(1, 1)` as the lower-left
/// cell of the domain. The 0-based origin `(x0, y0)` used for array indexing
/// is derived, never stored. Rows run from the domain's south edge northward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i64,
    pub y1: i64,
    pub nx: i64,
    pub ny: i64,
    #[serde(default)]
    pub padding: Padding,
}

impl BoundingBox {
    /// Create a bounding box from a 1-based origin and extents.
    ///
    /// Extents must both be at least one cell.
    pub fn new(x1: i64, y1: i64, nx: i64, ny: i64) -> SubsetResult<Self> {
        if nx < 1 || ny < 1 {
            return Err(SubsetError::invalid_dimension(format!(
                "bounding box extents must be >= 1, got nx={nx}, ny={ny}"
            )));
        }
        Ok(Self {
            x1,
            y1,
            nx,
            ny,
            padding: Padding::default(),
        })
    }

    /// Return a copy with the given padding attached.
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// 0-based X origin.
    pub fn x0(&self) -> i64 {
        self.x1 - 1
    }

    /// 0-based Y origin.
    pub fn y0(&self) -> i64 {
        self.y1 - 1
    }

    /// Half-open row/column bounds without padding: `(y0, y_end, x0, x_end)`.
    pub fn inner_extents(&self) -> (i64, i64, i64, i64) {
        (self.y0(), self.y0() + self.ny, self.x0(), self.x0() + self.nx)
    }

    /// Half-open row/column bounds with padding applied on every side:
    /// `(y0, y_end, x0, x_end)`.
    ///
    /// The result may start below zero or run past the source grid; validating
    /// against real array bounds is the caller's responsibility.
    pub fn padded_extents(&self) -> (i64, i64, i64, i64) {
        let x0 = self.x0() - self.padding.left as i64;
        let x_end = x0 + (self.padding.left + self.padding.right) as i64 + self.nx;
        let y0 = self.y0() - self.padding.bottom as i64;
        let y_end = y0 + (self.padding.top + self.padding.bottom) as i64 + self.ny;
        (y0, y_end, x0, x_end)
    }

    /// 0-based `(x0, y0, nx, ny)` tuple.
    pub fn system_bbox(&self) -> (i64, i64, i64, i64) {
        (self.x0(), self.y0(), self.nx, self.ny)
    }

    /// 1-based `(x1, y1, nx, ny)` tuple.
    pub fn human_bbox(&self) -> (i64, i64, i64, i64) {
        (self.x1, self.y1, self.nx, self.ny)
    }

    /// Rebuild from a 0-based `(x0, y0, nx, ny)` tuple.
    pub fn from_system_bbox(x0: i64, y0: i64, nx: i64, ny: i64) -> SubsetResult<Self> {
        Self::new(x0 + 1, y0 + 1, nx, ny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_extents_rejected() {
        assert!(BoundingBox::new(1, 1, 0, 10).is_err());
        assert!(BoundingBox::new(1, 1, 10, 0).is_err());
        assert!(BoundingBox::new(1, 1, 10, 10).is_ok());
    }

    #[test]
    fn test_inner_extents() {
        let bbox = BoundingBox::new(3, 5, 10, 20).unwrap();
        assert_eq!(bbox.inner_extents(), (4, 24, 2, 12));
    }

    #[test]
    fn test_padded_extents() {
        let bbox = BoundingBox::new(3, 5, 10, 20)
            .unwrap()
            .with_padding(Padding::new(1, 2, 3, 4));
        // y range grows by bottom+top, x range by left+right
        assert_eq!(bbox.padded_extents(), (1, 25, -2, 14));
    }

    #[test]
    fn test_human_system_round_trip() {
        for (x1, y1, nx, ny) in [(1, 1, 1, 1), (10, 20, 30, 40), (1040, 717, 85, 30)] {
            let bbox = BoundingBox::new(x1, y1, nx, ny).unwrap();
            let (x0, y0, snx, sny) = bbox.system_bbox();
            let rebuilt = BoundingBox::from_system_bbox(x0, y0, snx, sny).unwrap();
            assert_eq!(rebuilt.human_bbox(), (x1, y1, nx, ny));
        }
    }

    #[test]
    fn test_zero_padding_is_noop() {
        let bbox = BoundingBox::new(3, 5, 10, 20).unwrap();
        assert_eq!(bbox.padded_extents(), bbox.inner_extents());
        assert!(bbox.padding.is_zero());
    }
}

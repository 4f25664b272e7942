//! Affine geotransform for georeferenced grids.

use serde::{Deserialize, Serialize};

/// The 6-coefficient affine transform mapping grid indices to world
/// coordinates, in the conventional `(origin_x, pixel_width, rot_x,
/// origin_y, rot_y, pixel_height)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub rot_x: f64,
    pub origin_y: f64,
    pub rot_y: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Build from the conventional 6-element coefficient array.
    pub fn from_coefficients(c: [f64; 6]) -> Self {
        Self {
            origin_x: c[0],
            pixel_width: c[1],
            rot_x: c[2],
            origin_y: c[3],
            rot_y: c[4],
            pixel_height: c[5],
        }
    }

    /// The conventional 6-element coefficient array.
    pub fn coefficients(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.rot_x,
            self.origin_y,
            self.rot_y,
            self.pixel_height,
        ]
    }

    /// Recompute the transform for a clipped region whose origin moved to
    /// grid position `(min_x, min_y)` inside the source grid.
    ///
    /// Only the origin terms move; pixel size and rotation carry over.
    pub fn shifted(&self, min_x: i64, min_y: i64) -> Self {
        Self {
            origin_x: self.origin_x + self.pixel_width * min_x as f64,
            origin_y: self.origin_y + self.pixel_height * min_y as f64,
            ..*self
        }
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        // Unit cells anchored at the world origin.
        Self::from_coefficients([0.0, 1.0, 0.0, 0.0, 0.0, -1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient_round_trip() {
        let coeffs = [-1885055.5, 1000.0, 0.0, 1283042.1, 0.0, -1000.0];
        let geo = GeoTransform::from_coefficients(coeffs);
        assert_eq!(geo.coefficients(), coeffs);
    }

    #[test]
    fn test_zero_shift_is_identity() {
        let geo = GeoTransform::from_coefficients([-1885055.5, 1000.0, 0.0, 1283042.1, 0.0, -1000.0]);
        assert_eq!(geo.shifted(0, 0), geo);
    }

    #[test]
    fn test_shift_moves_only_origin() {
        let geo = GeoTransform::from_coefficients([100.0, 10.0, 0.0, 500.0, 0.0, -10.0]);
        let shifted = geo.shifted(3, 7);
        assert_eq!(shifted.origin_x, 130.0);
        assert_eq!(shifted.origin_y, 430.0);
        assert_eq!(shifted.pixel_width, geo.pixel_width);
        assert_eq!(shifted.pixel_height, geo.pixel_height);
        assert_eq!(shifted.rot_x, geo.rot_x);
        assert_eq!(shifted.rot_y, geo.rot_y);
    }
}

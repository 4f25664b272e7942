//! Shared value types for the hydro-subset workspace.
//!
//! This crate holds the types every other crate agrees on:
//! - [`BoundingBox`] and [`Padding`] for grid-index box arithmetic
//! - [`GeoTransform`] for affine georeferencing
//! - [`Grid2`] / [`Grid3`] in-memory array containers
//! - [`SubsetError`] / [`SubsetResult`], the workspace error type

pub mod bbox;
pub mod error;
pub mod geotransform;
pub mod grid;

pub use bbox::{BoundingBox, Padding};
pub use error::{SubsetError, SubsetResult};
pub use geotransform::GeoTransform;
pub use grid::{Grid2, Grid3};

/// Default no-data value written to cells outside the domain of interest.
pub const NO_DATA_VALUE: f64 = -999.0;

//! Shared test utilities for the hydro-subset workspace.
//!
//! This crate provides common testing infrastructure:
//! - Synthetic grid and classified-mask generators
//! - Approximate-equality assertion macros
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod generators;

// Re-export commonly used items at the crate root
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro asserting that every cell of two grids agrees within an epsilon.
///
/// # Usage
///
/// ```ignore
/// use test_utils::{assert_grids_approx_eq, sequential_grid};
///
/// let a = sequential_grid(1, 2, 2);
/// let b = a.clone();
/// assert_grids_approx_eq!(&a, &b, 1e-12);
/// ```
#[macro_export]
macro_rules! assert_grids_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = $left;
        let right = $right;
        assert_eq!(left.shape(), right.shape(), "grid shapes differ");
        for (a, b) in left.data().iter().zip(right.data().iter()) {
            $crate::assert_approx_eq!(*a, *b, $epsilon);
        }
    }};
}

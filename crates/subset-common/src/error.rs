//! Error types for hydro-subset operations.

use thiserror::Error;

/// Result type alias using SubsetError.
pub type SubsetResult<T> = Result<T, SubsetError>;

/// Primary error type for subsetting operations.
#[derive(Debug, Error)]
pub enum SubsetError {
    // === Construction errors ===
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("bbox value {bbox_val} must be greater than no-data threshold {no_data_threshold}")]
    MaskThreshold {
        bbox_val: f64,
        no_data_threshold: f64,
    },

    // === Selection errors ===
    #[error("empty selection: {0}")]
    EmptySelection(String),

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("requested region {requested} is outside grid bounds {grid}")]
    OutOfBounds { requested: String, grid: String },

    // === I/O and format errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error in {file}: {message}")]
    ParseError { file: String, message: String },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    // === External mesh tool errors ===
    #[error("mesh tool executable not found: {0}")]
    MeshToolNotFound(String),

    #[error("mesh tool exited with status {status}: {stderr}")]
    MeshToolFailed { status: i32, stderr: String },

    #[error("mesh tool timed out after {seconds}s")]
    MeshToolTimeout { seconds: u64 },

    #[error("mesh tool produced no triangle batches")]
    EmptyBatches,
}

impl SubsetError {
    /// Create an InvalidDimension error.
    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    /// Create an EmptySelection error.
    pub fn empty_selection(msg: impl Into<String>) -> Self {
        Self::EmptySelection(msg.into())
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an OutOfBounds error.
    pub fn out_of_bounds(requested: impl Into<String>, grid: impl Into<String>) -> Self {
        Self::OutOfBounds {
            requested: requested.into(),
            grid: grid.into(),
        }
    }

    /// Create a ParseError.
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SubsetError::invalid_dimension("nx must be >= 1");
        assert!(err.to_string().contains("nx must be >= 1"));

        let err = SubsetError::MaskThreshold {
            bbox_val: 0.0,
            no_data_threshold: 0.0,
        };
        assert!(err.to_string().contains("no-data threshold"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SubsetError = io_err.into();
        assert!(matches!(err, SubsetError::Io(_)));
    }
}

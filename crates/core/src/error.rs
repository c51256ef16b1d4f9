//! Error types for the mesh warp core.

use thiserror::Error;

/// Errors produced by warp engine operations.
#[derive(Debug, Error)]
pub enum WarpError {
    /// Grid size was below the minimum of 2 points per axis.
    #[error("invalid grid size: must be at least 2, got {0}")]
    InvalidGridSize(usize),

    /// Width or height was zero (or overflowed) when creating a surface.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A (row, col) index was outside the control grid.
    #[error("point ({row}, {col}) out of range for {size}x{size} grid")]
    PointOutOfRange {
        row: usize,
        col: usize,
        size: usize,
    },

    /// A persisted state carried the wrong number of control points for its size.
    #[error("state mismatch: expected {expected} control points, got {got}")]
    StateMismatch { expected: usize, got: usize },

    /// A requested deformation strategy name was not recognized.
    #[error("unknown deformation strategy: {0}")]
    UnknownStrategy(String),

    /// A file read or write failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// State could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_grid_size_includes_value() {
        let err = WarpError::InvalidGridSize(1);
        let msg = format!("{err}");
        assert!(msg.contains('1'), "expected size in message, got: {msg}");
    }

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let err = WarpError::InvalidDimensions;
        let msg = format!("{err}");
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn point_out_of_range_includes_all_fields() {
        let err = WarpError::PointOutOfRange {
            row: 7,
            col: 3,
            size: 5,
        };
        let msg = format!("{err}");
        assert!(msg.contains('7'), "missing row in: {msg}");
        assert!(msg.contains('3'), "missing col in: {msg}");
        assert!(msg.contains('5'), "missing size in: {msg}");
    }

    #[test]
    fn state_mismatch_includes_both_counts() {
        let err = WarpError::StateMismatch {
            expected: 9,
            got: 4,
        };
        let msg = format!("{err}");
        assert!(msg.contains('9'), "missing expected count in: {msg}");
        assert!(msg.contains('4'), "missing got count in: {msg}");
    }

    #[test]
    fn unknown_strategy_includes_name() {
        let err = WarpError::UnknownStrategy("cubic".into());
        let msg = format!("{err}");
        assert!(
            msg.contains("cubic"),
            "expected message containing 'cubic', got: {msg}"
        );
    }

    #[test]
    fn io_error_includes_message() {
        let err = WarpError::Io("disk full".into());
        assert!(format!("{err}").contains("disk full"));
    }

    #[test]
    fn serialization_error_includes_message() {
        let err = WarpError::Serialization("bad json".into());
        assert!(format!("{err}").contains("bad json"));
    }

    #[test]
    fn warp_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WarpError>();
    }

    #[test]
    fn warp_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<WarpError>();
    }
}

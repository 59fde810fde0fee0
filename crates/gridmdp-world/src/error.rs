//! Error types for the `gridmdp-world` crate.
//!
//! All fallible operations in this crate return `Result<_, WorldError>`.

use crate::coordinate::Coordinate;

/// Errors that can occur during grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// A coordinate lies outside the grid.
    #[error("coordinate ({col}, {row}) out of range for {columns}x{rows} grid")]
    OutOfRange {
        /// Requested column.
        col: i64,
        /// Requested row.
        row: i64,
        /// Number of columns in the grid.
        columns: usize,
        /// Number of rows in the grid.
        rows: usize,
    },

    /// A grid must have at least one column and one row.
    #[error("invalid grid dimensions {columns}x{rows}")]
    InvalidDimensions {
        /// Requested number of columns.
        columns: usize,
        /// Requested number of rows.
        rows: usize,
    },

    /// Walls never carry a policy.
    #[error("cannot assign a policy to wall at {0}")]
    WallPolicy(Coordinate),

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in grid calculation")]
    ArithmeticOverflow,
}

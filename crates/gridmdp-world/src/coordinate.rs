//! Validated grid coordinates and boundary resolution.
//!
//! A [`Coordinate`] can only be constructed inside its [`GridDimensions`].
//! Movement never produces an invalid coordinate: a step that would leave
//! the grid resolves to the starting coordinate (bounce-back).

use gridmdp_types::Direction;

use crate::error::WorldError;

/// Extent of a rectangular grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    columns: usize,
    rows: usize,
}

impl GridDimensions {
    /// Create grid dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either extent is zero.
    pub const fn new(columns: usize, rows: usize) -> Result<Self, WorldError> {
        if columns == 0 || rows == 0 {
            return Err(WorldError::InvalidDimensions { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    /// Number of columns (`W`).
    pub const fn columns(self) -> usize {
        self.columns
    }

    /// Number of rows (`H`).
    pub const fn rows(self) -> usize {
        self.rows
    }

    /// Total number of cells.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if `W * H` overflows.
    pub const fn cell_count(self) -> Result<usize, WorldError> {
        match self.columns.checked_mul(self.rows) {
            Some(count) => Ok(count),
            None => Err(WorldError::ArithmeticOverflow),
        }
    }

    /// Whether `(col, row)` lies inside the grid.
    pub const fn contains(self, col: usize, row: usize) -> bool {
        col < self.columns && row < self.rows
    }
}

/// A `(column, row)` position inside a grid. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    col: usize,
    row: usize,
}

impl Coordinate {
    /// Create a coordinate, validating it against the grid extent.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfRange`] if either index is negative or not
    /// smaller than the corresponding extent.
    pub fn new(col: i64, row: i64, dims: GridDimensions) -> Result<Self, WorldError> {
        let out_of_range = || WorldError::OutOfRange {
            col,
            row,
            columns: dims.columns,
            rows: dims.rows,
        };
        let c = usize::try_from(col).map_err(|_err| out_of_range())?;
        let r = usize::try_from(row).map_err(|_err| out_of_range())?;
        if !dims.contains(c, r) {
            return Err(out_of_range());
        }
        Ok(Self { col: c, row: r })
    }

    /// Column index.
    pub const fn col(self) -> usize {
        self.col
    }

    /// Row index.
    pub const fn row(self) -> usize {
        self.row
    }

    /// The coordinate reached by moving `(d_col, d_row)`, or `None` if that
    /// position is off the grid.
    pub fn offset(self, d_col: i64, d_row: i64, dims: GridDimensions) -> Option<Self> {
        let col = i64::try_from(self.col).ok()?.checked_add(d_col)?;
        let row = i64::try_from(self.row).ok()?.checked_add(d_row)?;
        Self::new(col, row, dims).ok()
    }

    /// The three positions an action in `direction` can lead to, in the
    /// order `[forward, left, right]`.
    ///
    /// Any position that would fall off the grid is replaced by `self`.
    pub fn outcomes(self, direction: Direction, dims: GridDimensions) -> [Self; 3] {
        direction
            .outcome_offsets()
            .map(|(d_col, d_row)| self.offset(d_col, d_row, dims).unwrap_or(self))
    }
}

impl core::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn dims(columns: usize, rows: usize) -> GridDimensions {
        GridDimensions::new(columns, rows).unwrap()
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(GridDimensions::new(0, 3).is_err());
        assert!(GridDimensions::new(3, 0).is_err());
        assert_eq!(dims(6, 4).cell_count().unwrap(), 24);
    }

    #[test]
    fn construction_validates_bounds() {
        let d = dims(3, 2);
        assert!(Coordinate::new(0, 0, d).is_ok());
        assert!(Coordinate::new(2, 1, d).is_ok());
        assert_eq!(
            Coordinate::new(-1, 0, d),
            Err(WorldError::OutOfRange {
                col: -1,
                row: 0,
                columns: 3,
                rows: 2
            })
        );
        assert!(Coordinate::new(0, -1, d).is_err());
        assert!(Coordinate::new(3, 0, d).is_err());
        assert!(Coordinate::new(0, 2, d).is_err());
    }

    #[test]
    fn interior_outcomes_follow_offset_table() {
        let d = dims(6, 6);
        let at = Coordinate::new(2, 1, d).unwrap();
        let [forward, left, right] = at.outcomes(Direction::Up, d);
        assert_eq!(forward, Coordinate::new(2, 0, d).unwrap());
        assert_eq!(left, Coordinate::new(1, 1, d).unwrap());
        assert_eq!(right, Coordinate::new(3, 1, d).unwrap());

        let [forward, left, right] = at.outcomes(Direction::Down, d);
        assert_eq!(forward, Coordinate::new(2, 2, d).unwrap());
        assert_eq!(left, Coordinate::new(3, 1, d).unwrap());
        assert_eq!(right, Coordinate::new(1, 1, d).unwrap());
    }

    #[test]
    fn off_grid_outcomes_bounce_back() {
        let d = dims(3, 3);
        let corner = Coordinate::new(0, 0, d).unwrap();

        // Up from the top-left corner: forward and left leave the grid.
        let [forward, left, right] = corner.outcomes(Direction::Up, d);
        assert_eq!(forward, corner);
        assert_eq!(left, corner);
        assert_eq!(right, Coordinate::new(1, 0, d).unwrap());

        // Every edge cell pointing off-grid resolves to itself.
        let bottom_right = Coordinate::new(2, 2, d).unwrap();
        assert_eq!(bottom_right.outcomes(Direction::Right, d)[0], bottom_right);
        assert_eq!(bottom_right.outcomes(Direction::Down, d)[0], bottom_right);
    }

    #[test]
    fn single_cell_grid_always_stays() {
        let d = dims(1, 1);
        let only = Coordinate::new(0, 0, d).unwrap();
        for dir in Direction::ALL {
            assert_eq!(only.outcomes(dir, d), [only; 3]);
        }
    }

    #[test]
    fn display_is_col_row() {
        let d = dims(4, 4);
        assert_eq!(Coordinate::new(3, 1, d).unwrap().to_string(), "(3, 1)");
    }
}

//! The grid: a fixed rectangle of cells owning all mutable MDP state.
//!
//! Cells are stored column-major (`index = col * rows + row`), which is also
//! the sweep order used by both solvers. [`Grid::coordinates`] returns that
//! order explicitly so callers never depend on storage details.

use gridmdp_types::{CellKind, CellReport, Direction, RewardTable};

use crate::coordinate::{Coordinate, GridDimensions};
use crate::error::WorldError;

/// One state of the MDP.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    coordinate: Coordinate,
    kind: CellKind,
    utility: f64,
    /// `None` exactly when the cell is a wall.
    policy: Option<Direction>,
}

impl Cell {
    const fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            kind: CellKind::Empty,
            utility: 0.0,
            policy: Some(Direction::Up),
        }
    }

    /// Position of the cell.
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Kind of the cell.
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Current utility estimate.
    pub const fn utility(&self) -> f64 {
        self.utility
    }

    /// Current action, or `None` for a wall.
    pub const fn policy(&self) -> Option<Direction> {
        self.policy
    }

    /// Whether the cell is a wall.
    pub const fn is_wall(&self) -> bool {
        self.kind.is_wall()
    }
}

/// A rectangular grid world.
///
/// The set of cells is fixed at construction. Only kinds (while loading),
/// utilities and policies change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    dimensions: GridDimensions,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid of `Empty` cells with utility 0 and policy `Up`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if the cell count
    /// overflows.
    pub fn new(dimensions: GridDimensions) -> Result<Self, WorldError> {
        let mut cells = Vec::with_capacity(dimensions.cell_count()?);
        for col in 0..dimensions.columns() {
            for row in 0..dimensions.rows() {
                cells.push(Cell::new(Coordinate::new(
                    to_signed(col)?,
                    to_signed(row)?,
                    dimensions,
                )?));
            }
        }
        Ok(Self { dimensions, cells })
    }

    /// Grid extent.
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: dimensions are validated to be non-zero.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Build a coordinate valid for this grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfRange`] if the position is off the grid.
    pub fn coordinate(&self, col: i64, row: i64) -> Result<Coordinate, WorldError> {
        Coordinate::new(col, row, self.dimensions)
    }

    /// Every coordinate in sweep order: outer loop over columns, inner loop
    /// over rows.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.cells.iter().map(Cell::coordinate).collect()
    }

    /// Iterate over cells in sweep order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Look up a cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfRange`] if the coordinate belongs to a
    /// larger grid.
    pub fn cell(&self, coordinate: Coordinate) -> Result<&Cell, WorldError> {
        let index = self.index_of(coordinate)?;
        self.cells
            .get(index)
            .ok_or_else(|| self.out_of_range(coordinate))
    }

    /// Change the kind of a cell.
    ///
    /// Turning a cell into a wall clears its policy; turning a wall into
    /// anything else restores the default `Up` policy. Utility is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfRange`] for a foreign coordinate.
    pub fn set_kind(&mut self, coordinate: Coordinate, kind: CellKind) -> Result<(), WorldError> {
        let cell = self.cell_mut(coordinate)?;
        cell.kind = kind;
        if kind.is_wall() {
            cell.policy = None;
        } else if cell.policy.is_none() {
            cell.policy = Some(Direction::Up);
        }
        Ok(())
    }

    /// Overwrite a cell's utility, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfRange`] for a foreign coordinate.
    pub fn set_utility(&mut self, coordinate: Coordinate, utility: f64) -> Result<f64, WorldError> {
        let cell = self.cell_mut(coordinate)?;
        Ok(core::mem::replace(&mut cell.utility, utility))
    }

    /// Assign an action to a non-wall cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::WallPolicy`] if the cell is a wall, or
    /// [`WorldError::OutOfRange`] for a foreign coordinate.
    pub fn set_policy(
        &mut self,
        coordinate: Coordinate,
        direction: Direction,
    ) -> Result<(), WorldError> {
        let cell = self.cell_mut(coordinate)?;
        if cell.is_wall() {
            return Err(WorldError::WallPolicy(coordinate));
        }
        cell.policy = Some(direction);
        Ok(())
    }

    /// Set every cell's utility to the immediate reward of its kind.
    pub fn seed_utilities(&mut self, rewards: &RewardTable) {
        for cell in &mut self.cells {
            cell.utility = rewards.reward(cell.kind);
        }
    }

    /// Kinds of all cells in sweep order.
    pub fn kinds(&self) -> Vec<CellKind> {
        self.cells.iter().map(Cell::kind).collect()
    }

    /// Utilities of all cells in sweep order, walls included.
    pub fn utilities(&self) -> Vec<f64> {
        self.cells.iter().map(Cell::utility).collect()
    }

    /// Number of cells that are not walls.
    pub fn open_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_wall()).count()
    }

    /// Per-cell summary in sweep order.
    pub fn reports(&self) -> Vec<CellReport> {
        self.cells
            .iter()
            .map(|cell| CellReport {
                col: cell.coordinate.col(),
                row: cell.coordinate.row(),
                kind: cell.kind,
                utility: cell.utility,
                policy: cell.policy,
            })
            .collect()
    }

    fn cell_mut(&mut self, coordinate: Coordinate) -> Result<&mut Cell, WorldError> {
        let index = self.index_of(coordinate)?;
        let err = self.out_of_range(coordinate);
        self.cells.get_mut(index).ok_or(err)
    }

    fn index_of(&self, coordinate: Coordinate) -> Result<usize, WorldError> {
        if !self
            .dimensions
            .contains(coordinate.col(), coordinate.row())
        {
            return Err(self.out_of_range(coordinate));
        }
        coordinate
            .col()
            .checked_mul(self.dimensions.rows())
            .and_then(|base| base.checked_add(coordinate.row()))
            .ok_or(WorldError::ArithmeticOverflow)
    }

    fn out_of_range(&self, coordinate: Coordinate) -> WorldError {
        WorldError::OutOfRange {
            col: to_signed(coordinate.col()).unwrap_or(i64::MAX),
            row: to_signed(coordinate.row()).unwrap_or(i64::MAX),
            columns: self.dimensions.columns(),
            rows: self.dimensions.rows(),
        }
    }
}

/// Convert a grid index to the signed form used by [`Coordinate::new`].
pub(crate) fn to_signed(index: usize) -> Result<i64, WorldError> {
    i64::try_from(index).map_err(|_err| WorldError::ArithmeticOverflow)
}

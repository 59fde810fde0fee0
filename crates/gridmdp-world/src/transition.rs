//! Stochastic action outcomes: the slip model applied to a grid.
//!
//! An action reaches one of three cells: the intended one, or one of the two
//! perpendicular ones. Off-grid and wall targets both resolve to the cell
//! the agent started in. Probabilities are fixed by [`SlipProbabilities`]
//! and never depend on the grid's contents.

use gridmdp_types::{Direction, SlipProbabilities};

use crate::coordinate::Coordinate;
use crate::error::WorldError;
use crate::grid::{Cell, Grid};

/// Resolves actions to their reachable cells and expected utilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionModel {
    slip: SlipProbabilities,
}

impl TransitionModel {
    /// Create a transition model from slip probabilities.
    pub const fn new(slip: SlipProbabilities) -> Self {
        Self { slip }
    }

    /// The outcome probabilities `[forward, left, right]`.
    pub const fn probabilities(&self) -> &SlipProbabilities {
        &self.slip
    }

    /// The three cells an action can lead to, in the order
    /// `[forward, left, right]`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfRange`] if `coordinate` does not belong to
    /// `grid`.
    pub fn neighbours<'g>(
        &self,
        grid: &'g Grid,
        coordinate: Coordinate,
        direction: Direction,
    ) -> Result<[&'g Cell; 3], WorldError> {
        let origin = grid.cell(coordinate)?;
        let [forward, left, right] = coordinate.outcomes(direction, grid.dimensions());
        let resolve = |target: Coordinate| -> Result<&'g Cell, WorldError> {
            let cell = grid.cell(target)?;
            Ok(if cell.is_wall() { origin } else { cell })
        };
        Ok([resolve(forward)?, resolve(left)?, resolve(right)?])
    }

    /// Expected utility of taking `direction` from `coordinate`, reading
    /// the utilities currently stored in the grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfRange`] for a foreign coordinate.
    pub fn expected_utility(
        &self,
        grid: &Grid,
        coordinate: Coordinate,
        direction: Direction,
    ) -> Result<f64, WorldError> {
        let [forward, left, right] = self.neighbours(grid, coordinate, direction)?;
        let f = self.slip.forward * forward.utility();
        let l = self.slip.left * left.utility();
        let r = self.slip.right * right.utility();
        Ok(f + l + r)
    }

    /// Expected utility of every action, indexed by [`Direction::index`].
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfRange`] for a foreign coordinate.
    pub fn expected_utilities(
        &self,
        grid: &Grid,
        coordinate: Coordinate,
    ) -> Result<[f64; Direction::COUNT], WorldError> {
        let mut values = [0.0; Direction::COUNT];
        for (slot, direction) in values.iter_mut().zip(Direction::ALL) {
            *slot = self.expected_utility(grid, coordinate, direction)?;
        }
        Ok(values)
    }
}

impl Default for TransitionModel {
    fn default() -> Self {
        Self::new(SlipProbabilities::default())
    }
}

/// The best action for a set of expected utilities.
///
/// Scans in index order and only moves on for a strictly greater value, so
/// ties resolve to the lowest-indexed direction.
pub fn best_action(expected: &[f64; Direction::COUNT]) -> (Direction, f64) {
    let [first, ..] = *expected;
    Direction::ALL
        .into_iter()
        .zip(expected.iter().copied())
        .skip(1)
        .fold((Direction::Up, first), |best, (direction, value)| {
            if value > best.1 { (direction, value) } else { best }
        })
}

//! Solver dispatch, observation hooks, and run results.
//!
//! This module provides [`run_solver`], the entry point that runs one of the
//! two dynamic-programming solvers over a grid and reports a
//! [`SolveOutcome`]. Progress is exposed through the [`SweepObserver`]
//! callback trait, called once before the first iteration and once after
//! every iteration, which is how the iteration history is recorded without
//! the solvers knowing about files.

use gridmdp_types::{CellReport, RunId, SolverKind};
use gridmdp_world::{Coordinate, Grid, WorldError};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::MdpConfig;
use crate::policy_iteration::PolicyIteration;
use crate::value_iteration::ValueIteration;

/// Errors that can occur while solving.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// A grid operation failed.
    #[error("grid error: {source}")]
    World {
        /// The underlying grid error.
        #[from]
        source: WorldError,
    },

    /// A Bellman update produced NaN or an infinite utility.
    #[error("utility at ({col}, {row}) is not finite")]
    NonFinite {
        /// Column of the offending cell.
        col: usize,
        /// Row of the offending cell.
        row: usize,
    },
}

/// Why a solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Convergence {
    /// Value iteration: the largest utility change fell to the threshold.
    UtilityThreshold {
        /// The stopping threshold `ε (1 - γ) / γ`.
        threshold: f64,
        /// Largest utility change in the final sweep.
        final_max_delta: f64,
    },
    /// Policy iteration: an improvement pass changed no action.
    PolicyStable {
        /// Fixed-policy sweeps per evaluation step.
        evaluation_sweeps: u32,
    },
}

/// Result of one solver run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveOutcome {
    /// Identifier of this run.
    pub run_id: RunId,
    /// Which solver produced the result.
    pub solver: SolverKind,
    /// Sweeps (value iteration) or evaluate+improve rounds (policy
    /// iteration), including the final one.
    pub iterations: u64,
    /// Stopping condition that was met.
    pub convergence: Convergence,
    /// Final utility and action of every cell, in sweep order.
    pub cells: Vec<CellReport>,
}

/// Callback invoked as a solver progresses.
///
/// Implementations receive a shared view of the grid, so they can read but
/// never alter the state the solver is working on.
pub trait SweepObserver {
    /// Called once before the first iteration.
    fn on_start(&mut self, grid: &Grid);

    /// Called after each sweep or round; `iteration` starts at 1.
    fn on_iteration(&mut self, iteration: u64, grid: &Grid);
}

/// A no-op observer for testing.
pub struct NoOpObserver;

impl SweepObserver for NoOpObserver {
    fn on_start(&mut self, _grid: &Grid) {}

    fn on_iteration(&mut self, _iteration: u64, _grid: &Grid) {}
}

/// Run one solver over `grid` until it converges.
///
/// The grid is updated in place: on return it holds the final utilities and
/// policy. Cell kinds are never changed.
///
/// # Errors
///
/// Returns [`SolverError`] if a grid lookup fails or an update is not
/// finite.
pub fn run_solver(
    solver: SolverKind,
    config: &MdpConfig,
    grid: &mut Grid,
    observer: &mut dyn SweepObserver,
) -> Result<SolveOutcome, SolverError> {
    info!(
        %solver,
        columns = grid.dimensions().columns(),
        rows = grid.dimensions().rows(),
        open_cells = grid.open_cell_count(),
        discount = config.solver.discount,
        "Solver starting"
    );
    match solver {
        SolverKind::ValueIteration => ValueIteration::new(config).solve(grid, observer),
        SolverKind::PolicyIteration => PolicyIteration::new(config).solve(grid, observer),
    }
}

/// Log the end of a solver run.
pub fn log_solve_end(outcome: &SolveOutcome) {
    match outcome.convergence {
        Convergence::UtilityThreshold {
            threshold,
            final_max_delta,
        } => info!(
            run_id = %outcome.run_id,
            solver = %outcome.solver,
            iterations = outcome.iterations,
            threshold,
            final_max_delta,
            "Solver converged"
        ),
        Convergence::PolicyStable { evaluation_sweeps } => info!(
            run_id = %outcome.run_id,
            solver = %outcome.solver,
            iterations = outcome.iterations,
            evaluation_sweeps,
            "Solver converged"
        ),
    }

    if outcome.cells.is_empty() {
        warn!(run_id = %outcome.run_id, "Solver finished with no cells");
    }
}

/// Reject NaN and infinite utilities before they are written to the grid.
pub(crate) fn finite_utility(coordinate: Coordinate, value: f64) -> Result<f64, SolverError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SolverError::NonFinite {
            col: coordinate.col(),
            row: coordinate.row(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use gridmdp_types::{CellKind, Direction, RewardTable};
    use gridmdp_world::{GridDimensions, assignment_world};

    use super::*;

    /// Counts callbacks.
    #[derive(Default)]
    struct CountingObserver {
        started: usize,
        iterations: Vec<u64>,
    }

    impl SweepObserver for CountingObserver {
        fn on_start(&mut self, _grid: &Grid) {
            self.started = self.started.saturating_add(1);
        }

        fn on_iteration(&mut self, iteration: u64, _grid: &Grid) {
            self.iterations.push(iteration);
        }
    }

    fn corridor() -> Grid {
        let mut grid = Grid::new(GridDimensions::new(3, 1).unwrap()).unwrap();
        let goal = grid.coordinate(2, 0).unwrap();
        grid.set_kind(goal, CellKind::PositiveTerminal).unwrap();
        grid
    }

    #[test]
    fn observer_sees_every_iteration() {
        let config = MdpConfig::default();
        for solver in [SolverKind::ValueIteration, SolverKind::PolicyIteration] {
            let mut grid = corridor();
            let mut observer = CountingObserver::default();
            let outcome = run_solver(solver, &config, &mut grid, &mut observer).unwrap();

            assert_eq!(observer.started, 1);
            let expected: Vec<u64> = (1..=outcome.iterations).collect();
            assert_eq!(observer.iterations, expected);
            assert_eq!(outcome.solver, solver);
        }
    }

    #[test]
    fn outcome_matches_grid_state() {
        let config = MdpConfig::default();
        let mut grid = assignment_world(&RewardTable::default()).unwrap();
        let outcome = run_solver(
            SolverKind::ValueIteration,
            &config,
            &mut grid,
            &mut NoOpObserver,
        )
        .unwrap();

        assert_eq!(outcome.cells, grid.reports());
        assert!(matches!(
            outcome.convergence,
            Convergence::UtilityThreshold { .. }
        ));
        log_solve_end(&outcome);
    }

    #[test]
    fn non_finite_update_is_rejected() {
        let mut config = MdpConfig::default();
        config.rewards.empty = f64::INFINITY;
        let mut grid = Grid::new(GridDimensions::new(1, 1).unwrap()).unwrap();
        let result = run_solver(
            SolverKind::ValueIteration,
            &config,
            &mut grid,
            &mut NoOpObserver,
        );
        assert!(matches!(
            result,
            Err(SolverError::NonFinite { col: 0, row: 0 })
        ));
    }

    #[test]
    fn outcome_serializes_with_tagged_convergence() {
        let config = MdpConfig::default();
        let mut grid = corridor();
        let outcome = run_solver(
            SolverKind::PolicyIteration,
            &config,
            &mut grid,
            &mut NoOpObserver,
        )
        .unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["solver"], "policy_iteration");
        assert_eq!(json["convergence"]["kind"], "policy_stable");
        assert_eq!(json["convergence"]["evaluation_sweeps"], 40);
        assert_eq!(json["cells"].as_array().unwrap().len(), 3);
        assert_eq!(
            outcome.cells.first().unwrap().policy,
            Some(Direction::Right)
        );
    }
}

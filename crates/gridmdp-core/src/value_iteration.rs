//! Value iteration: Bellman-optimal sweeps until utilities settle.
//!
//! Each sweep visits the non-wall cells column by column, top to bottom, and
//! overwrites each utility as soon as it is computed, so later cells in the
//! same sweep already see the new values. Sweeps repeat until the largest
//! change in a sweep is at most `ε (1 - γ) / γ`.

use gridmdp_types::{RewardTable, RunId, SolverKind};
use gridmdp_world::{Grid, TransitionModel, best_action};
use tracing::{debug, trace};

use crate::config::MdpConfig;
use crate::runner::{Convergence, SolveOutcome, SolverError, SweepObserver, finite_utility};

/// Value-iteration solver configured from an [`MdpConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueIteration {
    model: TransitionModel,
    rewards: RewardTable,
    discount: f64,
    threshold: f64,
}

impl ValueIteration {
    /// Create a solver from validated configuration.
    pub fn new(config: &MdpConfig) -> Self {
        Self {
            model: TransitionModel::new(config.transition),
            rewards: config.rewards,
            discount: config.solver.discount,
            threshold: config.solver.threshold(),
        }
    }

    /// Largest per-sweep change at which the solver stops.
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Run one in-place sweep and return the largest absolute utility change.
    ///
    /// Every non-wall cell gets `reward + γ · max E[dir]` as its utility and
    /// the maximising direction as its policy.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::NonFinite`] if an update is NaN or infinite.
    pub fn sweep(&self, grid: &mut Grid) -> Result<f64, SolverError> {
        let mut max_delta: f64 = 0.0;
        for coordinate in grid.coordinates() {
            let cell = grid.cell(coordinate)?;
            if cell.is_wall() {
                continue;
            }
            let reward = self.rewards.reward(cell.kind());

            let expected = self.model.expected_utilities(grid, coordinate)?;
            let (direction, best) = best_action(&expected);
            let updated = finite_utility(coordinate, self.discount.mul_add(best, reward))?;

            let previous = grid.set_utility(coordinate, updated)?;
            grid.set_policy(coordinate, direction)?;

            let delta = (updated - previous).abs();
            trace!(%coordinate, ?direction, utility = updated, delta, "Cell updated");
            max_delta = max_delta.max(delta);
        }
        Ok(max_delta)
    }

    /// Sweep until the largest change is at most [`Self::threshold`].
    ///
    /// At least one sweep always runs.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] if a sweep fails.
    pub fn solve(
        &self,
        grid: &mut Grid,
        observer: &mut dyn SweepObserver,
    ) -> Result<SolveOutcome, SolverError> {
        let run_id = RunId::new();
        observer.on_start(grid);

        let mut iterations: u64 = 0;
        let final_max_delta = loop {
            let max_delta = self.sweep(grid)?;
            iterations = iterations.saturating_add(1);
            observer.on_iteration(iterations, grid);
            debug!(%run_id, iteration = iterations, max_delta, "Value iteration sweep");
            if max_delta <= self.threshold {
                break max_delta;
            }
        };

        Ok(SolveOutcome {
            run_id,
            solver: SolverKind::ValueIteration,
            iterations,
            convergence: Convergence::UtilityThreshold {
                threshold: self.threshold,
                final_max_delta,
            },
            cells: grid.reports(),
        })
    }
}

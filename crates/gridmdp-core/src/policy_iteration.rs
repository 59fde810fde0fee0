//! Policy iteration: alternate fixed-policy evaluation with greedy
//! improvement until no action changes.
//!
//! Evaluation runs `k` in-place sweeps of `reward + γ · E[policy(cell)]`.
//! Improvement switches a cell to its best action only when that action is
//! strictly better than the current one, so ties never count as a change
//! and the loop terminates.

use gridmdp_types::{Direction, RewardTable, RunId, SolverKind};
use gridmdp_world::{Grid, TransitionModel, best_action};
use tracing::{debug, trace};

use crate::config::MdpConfig;
use crate::runner::{Convergence, SolveOutcome, SolverError, SweepObserver, finite_utility};

/// Policy-iteration solver configured from an [`MdpConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyIteration {
    model: TransitionModel,
    rewards: RewardTable,
    discount: f64,
    evaluation_sweeps: u32,
}

impl PolicyIteration {
    /// Create a solver from validated configuration.
    pub fn new(config: &MdpConfig) -> Self {
        Self {
            model: TransitionModel::new(config.transition),
            rewards: config.rewards,
            discount: config.solver.discount,
            evaluation_sweeps: config.solver.evaluation_sweeps,
        }
    }

    /// Fixed-policy sweeps per evaluation step (`k`).
    pub const fn evaluation_sweeps(&self) -> u32 {
        self.evaluation_sweeps
    }

    /// Approximate the utilities of the current policy with `k` sweeps.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::NonFinite`] if an update is NaN or infinite.
    pub fn evaluate(&self, grid: &mut Grid) -> Result<(), SolverError> {
        let coordinates = grid.coordinates();
        for _ in 0..self.evaluation_sweeps {
            for &coordinate in &coordinates {
                let cell = grid.cell(coordinate)?;
                // Walls carry no policy.
                let Some(direction) = cell.policy() else {
                    continue;
                };
                let reward = self.rewards.reward(cell.kind());

                let expected = self.model.expected_utility(grid, coordinate, direction)?;
                let updated = finite_utility(coordinate, self.discount.mul_add(expected, reward))?;
                grid.set_utility(coordinate, updated)?;
            }
        }
        Ok(())
    }

    /// Switch each cell to its best action where that is a strict
    /// improvement, returning how many cells changed.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::World`] if a grid lookup fails.
    pub fn improve(&self, grid: &mut Grid) -> Result<usize, SolverError> {
        let mut changed: usize = 0;
        for coordinate in grid.coordinates() {
            let Some(current) = grid.cell(coordinate)?.policy() else {
                continue;
            };
            let expected = self.model.expected_utilities(grid, coordinate)?;
            let (best, best_value) = best_action(&expected);
            let current_value = current_value(&expected, current);

            if best_value > current_value {
                grid.set_policy(coordinate, best)?;
                changed = changed.saturating_add(1);
                trace!(%coordinate, from = ?current, to = ?best, "Policy changed");
            }
        }
        Ok(changed)
    }

    /// Evaluate and improve until an improvement pass changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] if evaluation or improvement fails.
    pub fn solve(
        &self,
        grid: &mut Grid,
        observer: &mut dyn SweepObserver,
    ) -> Result<SolveOutcome, SolverError> {
        let run_id = RunId::new();
        observer.on_start(grid);

        let mut rounds: u64 = 0;
        loop {
            self.evaluate(grid)?;
            let changed = self.improve(grid)?;
            rounds = rounds.saturating_add(1);
            observer.on_iteration(rounds, grid);
            debug!(%run_id, iteration = rounds, changed, "Policy iteration round");
            if changed == 0 {
                break;
            }
        }

        Ok(SolveOutcome {
            run_id,
            solver: SolverKind::PolicyIteration,
            iterations: rounds,
            convergence: Convergence::PolicyStable {
                evaluation_sweeps: self.evaluation_sweeps,
            },
            cells: grid.reports(),
        })
    }
}

fn current_value(expected: &[f64; Direction::COUNT], current: Direction) -> f64 {
    expected
        .get(current.index())
        .copied()
        .unwrap_or(f64::NEG_INFINITY)
}

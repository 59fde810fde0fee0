//! End-to-end solver runs on the built-in 6x6 world.
//!
//! Both solvers are run on fresh copies of the grid loaded from
//! [`ASSIGNMENT_PRESET`], checking the properties that must hold for any
//! converged result rather than exact utilities.

// Integration tests use unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::unwrap_used,
    clippy::unreachable,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::float_cmp
)]

use gridmdp_core::{
    Convergence, IterationHistory, MdpConfig, NoOpObserver, PolicyIteration, ValueIteration,
    run_solver,
};
use gridmdp_types::{CellKind, SolverKind};
use gridmdp_world::{ASSIGNMENT_PRESET, Grid, grid_from_preset};

fn world(config: &MdpConfig) -> Grid {
    let (grid, summary) =
        grid_from_preset(config.dimensions().unwrap(), ASSIGNMENT_PRESET, &config.rewards)
            .unwrap();
    assert!(summary.is_exact());
    grid
}

#[test]
fn solving_never_changes_cell_kinds() {
    let config = MdpConfig::default();
    for solver in config.solver.algorithm.solvers() {
        let mut grid = world(&config);
        let kinds = grid.kinds();
        run_solver(solver, &config, &mut grid, &mut NoOpObserver).unwrap();
        assert_eq!(grid.kinds(), kinds);
    }
}

#[test]
fn walls_stay_at_reward_without_policy() {
    let config = MdpConfig::default();
    for solver in config.solver.algorithm.solvers() {
        let mut grid = world(&config);
        let outcome = run_solver(solver, &config, &mut grid, &mut NoOpObserver).unwrap();
        for report in outcome.cells.iter().filter(|c| c.kind == CellKind::Wall) {
            assert_eq!(report.utility, config.rewards.wall);
            assert_eq!(report.policy, None);
        }
        for report in outcome.cells.iter().filter(|c| c.kind != CellKind::Wall) {
            assert!(report.policy.is_some());
        }
    }
}

#[test]
fn utilities_respect_upper_bound() {
    let config = MdpConfig::default();
    let bound = config.solver.utility_upper_bound();
    for solver in config.solver.algorithm.solvers() {
        let mut grid = world(&config);
        run_solver(solver, &config, &mut grid, &mut NoOpObserver).unwrap();
        for utility in grid.utilities() {
            assert!(utility.is_finite());
            assert!(utility.abs() <= bound);
        }
    }
}

#[test]
fn value_iteration_terminates_within_threshold() {
    let config = MdpConfig::default();
    let vi = ValueIteration::new(&config);
    let mut grid = world(&config);
    let outcome = vi.solve(&mut grid, &mut NoOpObserver).unwrap();

    let Convergence::UtilityThreshold {
        threshold,
        final_max_delta,
    } = outcome.convergence
    else {
        unreachable!("value iteration stops on the utility threshold");
    };
    assert!(outcome.iterations > 1);
    assert!(final_max_delta <= threshold);
    assert!(vi.sweep(&mut grid).unwrap() <= threshold);
}

#[test]
fn policy_iteration_is_idempotent() {
    let config = MdpConfig::default();
    let pi = PolicyIteration::new(&config);
    let mut grid = world(&config);
    let outcome = pi.solve(&mut grid, &mut NoOpObserver).unwrap();
    assert!(outcome.iterations >= 1);

    assert_eq!(pi.improve(&mut grid).unwrap(), 0);
}

#[test]
fn history_has_initial_row_plus_one_per_iteration() {
    let config = MdpConfig::default();
    for solver in [SolverKind::ValueIteration, SolverKind::PolicyIteration] {
        let mut grid = world(&config);
        let mut history = IterationHistory::new(solver, config.solver.evaluation_sweeps);
        let outcome = run_solver(solver, &config, &mut grid, &mut history).unwrap();

        assert_eq!(
            history.snapshots().len(),
            usize::try_from(outcome.iterations).unwrap() + 1
        );
        assert_eq!(history.headers().len(), 36);
        assert_eq!(
            history.headers().iter().filter(|h| h.starts_with("Wall")).count(),
            5
        );
        // The initial snapshot is the preset's seeded rewards.
        let first = &history.snapshots()[0];
        assert_eq!(first.iteration, 0);
        assert_eq!(first.utilities[0], config.rewards.positive_terminal);
    }
}

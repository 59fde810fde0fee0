//! Configuration and the dynamic-programming solvers for gridmdp.
//!
//! This crate turns a [`Grid`](gridmdp_world::Grid) into an optimal policy.
//! Both solvers update the grid in place, in column-major order, and report
//! their progress through the [`SweepObserver`] trait.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `gridmdp-config.yaml` into
//!   strongly-typed structs.
//! - [`history`] -- [`IterationHistory`] CSV export and JSON result reports.
//! - [`policy_iteration`] -- [`PolicyIteration`]: `k`-sweep evaluation plus
//!   greedy improvement until the policy is stable.
//! - [`runner`] -- [`run_solver`], [`SweepObserver`], and [`SolveOutcome`].
//! - [`value_iteration`] -- [`ValueIteration`]: Bellman-optimal sweeps until
//!   the utility change drops below the error-bound threshold.

pub mod config;
pub mod history;
pub mod policy_iteration;
pub mod runner;
pub mod value_iteration;

pub use config::{Algorithm, ConfigError, MdpConfig};
pub use history::{HistoryError, IterationHistory, write_report};
pub use policy_iteration::PolicyIteration;
pub use runner::{
    Convergence, NoOpObserver, SolveOutcome, SolverError, SweepObserver, log_solve_end,
    run_solver,
};
pub use value_iteration::ValueIteration;

//! Per-iteration utility history and result export.
//!
//! [`IterationHistory`] is a [`SweepObserver`] that snapshots every cell's
//! utility before the first iteration and after each one. The snapshots are
//! written as CSV (one row per iteration, one column per cell) so that
//! convergence can be plotted; the final [`SolveOutcome`] is written as
//! pretty JSON next to it.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use gridmdp_types::{SolverKind, UtilitySnapshot};
use gridmdp_world::Grid;
use tracing::info;

use crate::runner::{SolveOutcome, SweepObserver};

/// Errors that can occur when exporting results.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// Failed to create the output directory or write a file.
    #[error("failed to write output: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to serialize a report.
    #[error("failed to serialize report: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Utility snapshots of one solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationHistory {
    solver: SolverKind,
    evaluation_sweeps: u32,
    headers: Vec<String>,
    snapshots: Vec<UtilitySnapshot>,
}

impl IterationHistory {
    /// Create an empty history. `evaluation_sweeps` only appears in the
    /// file name of policy-iteration histories.
    pub const fn new(solver: SolverKind, evaluation_sweeps: u32) -> Self {
        Self {
            solver,
            evaluation_sweeps,
            headers: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    /// Column labels, one per cell in sweep order: `State: (c, r)` or
    /// `Wall: (c, r)`.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Recorded snapshots; the first one is the grid before any iteration.
    pub fn snapshots(&self) -> &[UtilitySnapshot] {
        &self.snapshots
    }

    /// Render the history as CSV with a leading `Iteration` column.
    pub fn to_csv(&self) -> String {
        let header: String = self
            .headers
            .iter()
            .map(|header| format!(",{}", csv_field(header)))
            .collect();
        let rows: String = self
            .snapshots
            .iter()
            .map(|snapshot| {
                let values: String = snapshot
                    .utilities
                    .iter()
                    .map(|utility| format!(",{utility}"))
                    .collect();
                format!("{}{values}\n", snapshot.iteration)
            })
            .collect();
        format!("Iteration{header}\n{rows}")
    }

    /// File name for this history, dated `date`.
    ///
    /// `ValueIteration_2026-10-18.csv` or `PolicyIteration_2026-10-18_K=40.csv`.
    pub fn file_name(&self, date: NaiveDate) -> String {
        let date = date.format("%Y-%m-%d");
        match self.solver {
            SolverKind::ValueIteration => format!("{}_{date}.csv", self.solver.label()),
            SolverKind::PolicyIteration => format!(
                "{}_{date}_K={}.csv",
                self.solver.label(),
                self.evaluation_sweeps
            ),
        }
    }

    /// Write the CSV into `dir` under today's [`Self::file_name`], creating
    /// the directory if needed. Returns the written path.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Io`] if the directory or file cannot be
    /// written.
    pub fn write_csv(&self, dir: &Path) -> Result<PathBuf, HistoryError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name(chrono::Local::now().date_naive()));
        std::fs::write(&path, self.to_csv())?;
        info!(
            solver = %self.solver,
            path = %path.display(),
            rows = self.snapshots.len(),
            "Iteration history written"
        );
        Ok(path)
    }
}

impl SweepObserver for IterationHistory {
    fn on_start(&mut self, grid: &Grid) {
        self.headers = grid
            .cells()
            .map(|cell| {
                let label = if cell.is_wall() { "Wall" } else { "State" };
                format!("{label}: {}", cell.coordinate())
            })
            .collect();
        self.snapshots.clear();
        self.on_iteration(0, grid);
    }

    fn on_iteration(&mut self, iteration: u64, grid: &Grid) {
        self.snapshots.push(UtilitySnapshot {
            iteration,
            utilities: grid.utilities(),
        });
    }
}

/// Write the final result of a run as pretty JSON into `dir`, named
/// `<Solver>_<run-id>.json`. Returns the written path.
///
/// # Errors
///
/// Returns [`HistoryError`] if serialization or writing fails.
pub fn write_report(dir: &Path, outcome: &SolveOutcome) -> Result<PathBuf, HistoryError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}_{}.json", outcome.solver.label(), outcome.run_id));
    let json = serde_json::to_string_pretty(outcome)?;
    std::fs::write(&path, json)?;
    info!(
        run_id = %outcome.run_id,
        path = %path.display(),
        "Result report written"
    );
    Ok(path)
}

/// Quote a CSV field if it contains a separator or quote.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use gridmdp_types::{CellKind, RunId};
    use gridmdp_world::GridDimensions;

    use super::*;
    use crate::config::MdpConfig;
    use crate::runner::run_solver;

    fn small_grid() -> Grid {
        let mut grid = Grid::new(GridDimensions::new(2, 2).unwrap()).unwrap();
        let wall = grid.coordinate(1, 0).unwrap();
        let goal = grid.coordinate(1, 1).unwrap();
        grid.set_kind(wall, CellKind::Wall).unwrap();
        grid.set_kind(goal, CellKind::PositiveTerminal).unwrap();
        grid
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gridmdp_{name}_{}", RunId::new()))
    }

    #[test]
    fn headers_label_walls_in_sweep_order() {
        let grid = small_grid();
        let mut history = IterationHistory::new(SolverKind::ValueIteration, 40);
        history.on_start(&grid);
        assert_eq!(
            history.headers(),
            [
                "State: (0, 0)",
                "State: (0, 1)",
                "Wall: (1, 0)",
                "State: (1, 1)"
            ]
        );
        assert_eq!(history.snapshots().len(), 1);
        assert_eq!(history.snapshots()[0].iteration, 0);
    }

    #[test]
    fn one_row_per_iteration_plus_initial() {
        let config = MdpConfig::default();
        for solver in [SolverKind::ValueIteration, SolverKind::PolicyIteration] {
            let mut grid = small_grid();
            let mut history = IterationHistory::new(solver, config.solver.evaluation_sweeps);
            let outcome = run_solver(solver, &config, &mut grid, &mut history).unwrap();

            let rows = usize::try_from(outcome.iterations).unwrap() + 1;
            assert_eq!(history.snapshots().len(), rows);
            assert_eq!(history.snapshots().last().unwrap().utilities, grid.utilities());

            let csv = history.to_csv();
            let lines: Vec<&str> = csv.lines().collect();
            assert_eq!(lines.len(), rows + 1);
            assert!(lines[0].starts_with("Iteration,\"State: (0, 0)\""));
            assert!(lines[1].starts_with("0,"));
            // Leading iteration column plus one column per cell.
            assert_eq!(lines[1].split(',').count(), 5);
        }
    }

    #[test]
    fn file_names_carry_date_and_k() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let vi = IterationHistory::new(SolverKind::ValueIteration, 40);
        let pi = IterationHistory::new(SolverKind::PolicyIteration, 40);
        assert_eq!(vi.file_name(date), "ValueIteration_2026-10-18.csv");
        assert_eq!(pi.file_name(date), "PolicyIteration_2026-10-18_K=40.csv");
    }

    #[test]
    fn csv_and_report_are_written() {
        let dir = scratch_dir("write");
        let config = MdpConfig::default();
        let mut grid = small_grid();
        let mut history = IterationHistory::new(SolverKind::ValueIteration, 40);
        let outcome = run_solver(
            SolverKind::ValueIteration,
            &config,
            &mut grid,
            &mut history,
        )
        .unwrap();

        let csv_path = history.write_csv(&dir).unwrap();
        assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), history.to_csv());

        let report_path = write_report(&dir, &outcome).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(json["iterations"], outcome.iterations);
        assert_eq!(json["cells"].as_array().unwrap().len(), 4);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn csv_field_quotes_separators() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}

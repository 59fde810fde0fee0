//! Solver binary for gridmdp.
//!
//! This is the main entry point that wires together configuration, the
//! grid world, the two solvers and result export. It loads configuration,
//! builds the grid, and runs each configured solver on its own copy of it.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `gridmdp-config.yaml`
//! 3. Build the grid from the configured preset (or the built-in world)
//! 4. Run each configured solver, recording the iteration history
//! 5. Render the results to stdout
//! 6. Write the history CSV and the JSON report

mod display;
mod error;

use std::path::Path;

use gridmdp_core::{
    IterationHistory, MdpConfig, SolveOutcome, log_solve_end, run_solver, write_report,
};
use gridmdp_types::SolverKind;
use gridmdp_world::{Grid, assignment_world, grid_from_preset};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, grid loading, solving or export fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("gridmdp-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        columns = config.grid.columns,
        rows = config.grid.rows,
        algorithm = ?config.solver.algorithm,
        discount = config.solver.discount,
        evaluation_sweeps = config.solver.evaluation_sweeps,
        "Configuration loaded"
    );

    // 3. Build the grid.
    let world = load_world(&config)?;
    print!("{}", display::render_grid_world(&world));

    // 4-6. Solve, render, export.
    for solver in config.solver.algorithm.solvers() {
        let outcome = solve(solver, &config, world.clone())?;
        info!(
            run_id = %outcome.run_id,
            solver = %outcome.solver,
            iterations = outcome.iterations,
            "Run complete"
        );
    }

    info!("gridmdp-engine shutdown complete");
    Ok(())
}

/// Load configuration from `gridmdp-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
/// Environment overrides apply even when the file is absent.
fn load_config() -> Result<MdpConfig, EngineError> {
    let config_path = Path::new("gridmdp-config.yaml");
    if config_path.exists() {
        Ok(MdpConfig::from_file(config_path)?)
    } else {
        info!("Config file not found, using defaults");
        let mut config = MdpConfig::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }
}

/// Build the grid from the configured preset file, or the built-in world
/// when none is set. Configuration validation guarantees the built-in world
/// is only used at its own size.
fn load_world(config: &MdpConfig) -> Result<Grid, EngineError> {
    let Some(path) = &config.grid.preset else {
        let grid = assignment_world(&config.rewards)?;
        info!(open_cells = grid.open_cell_count(), "Built-in grid loaded");
        return Ok(grid);
    };

    let text = std::fs::read_to_string(path).map_err(|source| EngineError::Preset {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "Preset file loaded");

    let (grid, summary) = grid_from_preset(config.dimensions()?, &text, &config.rewards)?;
    info!(
        applied = summary.applied,
        unrecognised = summary.unrecognised,
        missing = summary.missing,
        surplus = summary.surplus,
        open_cells = grid.open_cell_count(),
        "Grid built"
    );
    Ok(grid)
}

/// Run one solver on `grid`, print the results and write the configured
/// artefacts.
fn solve(
    solver: SolverKind,
    config: &MdpConfig,
    mut grid: Grid,
) -> Result<SolveOutcome, EngineError> {
    let mut history = IterationHistory::new(solver, config.solver.evaluation_sweeps);
    let outcome = run_solver(solver, config, &mut grid, &mut history)?;
    log_solve_end(&outcome);

    print!("{}", display::render_parameters(solver, &config.solver));
    println!("Iterations: {}", outcome.iterations);
    print!("{}", display::render_cells(&grid));
    print!("{}", display::render_policy(&grid));
    print!("{}", display::render_state_utilities(&grid));
    print!("{}", display::render_utility_grid(&grid));

    let dir = &config.output.directory;
    if config.output.write_history {
        history.write_csv(dir)?;
    }
    if config.output.write_report {
        write_report(dir, &outcome)?;
    }
    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridmdp_types::{CellKind, RunId};

    use super::*;

    #[test]
    fn builtin_world_is_used_without_preset() {
        let config = MdpConfig::default();
        let grid = load_world(&config).unwrap();
        assert_eq!(grid, assignment_world(&config.rewards).unwrap());
        let penalty = grid.coordinate(1, 1).unwrap();
        assert_eq!(grid.cell(penalty).unwrap().kind(), CellKind::NegativeTerminal);
    }

    #[test]
    fn preset_file_sets_size() {
        let path = std::env::temp_dir().join(format!("gridmdp_preset_{}.txt", RunId::new()));
        std::fs::write(&path, "G X\nB W\nW W").unwrap();
        let yaml = format!(
            "grid:\n  columns: 2\n  rows: 3\n  preset: {}\n",
            path.display()
        );
        let config = MdpConfig::parse(&yaml).unwrap();

        let grid = load_world(&config).unwrap();
        assert_eq!(grid.dimensions().rows(), 3);
        let wall = grid.coordinate(1, 0).unwrap();
        assert_eq!(grid.cell(wall).unwrap().kind(), CellKind::Wall);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_preset_file_is_reported() {
        let yaml = "grid:\n  preset: /nonexistent/gridmdp/preset.txt\n";
        let config = MdpConfig::parse(yaml).unwrap();
        assert!(matches!(
            load_world(&config),
            Err(EngineError::Preset { .. })
        ));
    }
}

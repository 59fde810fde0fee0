//! Error types for the solver binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, solving and export.

use std::path::PathBuf;

/// Top-level error for the solver binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: gridmdp_core::ConfigError,
    },

    /// The preset file could not be read.
    #[error("failed to read preset {}: {source}", .path.display())]
    Preset {
        /// Path that was configured.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Grid construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: gridmdp_world::WorldError,
    },

    /// A solver failed.
    #[error("solver error: {source}")]
    Solver {
        /// The underlying solver error.
        #[from]
        source: gridmdp_core::SolverError,
    },

    /// Writing the history or report failed.
    #[error("output error: {source}")]
    History {
        /// The underlying export error.
        #[from]
        source: gridmdp_core::HistoryError,
    },
}

//! Shared type definitions for the gridmdp grid-world solver.
//!
//! This crate is the single source of truth for the plain data types used
//! across the workspace: the action set, cell kinds, reward and slip tables,
//! run identifiers, and the serializable report types.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers (solver run identifiers)
//! - [`enums`] -- Directions, cell kinds, solver kinds
//! - [`structs`] -- Reward table, slip probabilities, reports and snapshots

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CellKind, Direction, SolverKind};
pub use ids::RunId;
pub use structs::{CellReport, RewardTable, SlipProbabilities, UtilitySnapshot};

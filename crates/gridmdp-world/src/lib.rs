//! Grid geometry, cells, and the transition model for the gridmdp solver.
//!
//! This crate models the physical world of the MDP: validated coordinates
//! with bounce-back at the boundary, the grid of cells holding utilities and
//! policies, the slip model resolving an action to its three outcomes, and
//! the text presets used to describe a grid.
//!
//! # Modules
//!
//! - [`coordinate`] -- [`GridDimensions`] and validated [`Coordinate`]s.
//! - [`error`] -- Error types for grid operations.
//! - [`grid`] -- [`Grid`] and [`Cell`], stored in column-major sweep order.
//! - [`preset`] -- Lenient preset parsing and the built-in 6x6 world.
//! - [`transition`] -- [`TransitionModel`]: neighbour resolution with wall
//!   bounce-back and expected utilities.

pub mod coordinate;
pub mod error;
pub mod grid;
pub mod preset;
pub mod transition;

// Re-export primary types at crate root.
pub use coordinate::{Coordinate, GridDimensions};
pub use error::WorldError;
pub use grid::{Cell, Grid};
pub use preset::{
    ASSIGNMENT_EXTENT, ASSIGNMENT_PRESET, PresetSummary, apply_preset, assignment_world, grid_from_preset,
};
pub use transition::{TransitionModel, best_action};

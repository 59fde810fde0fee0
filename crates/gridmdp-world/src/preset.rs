//! Grid presets: whitespace-separated cell codes read in row-major order.
//!
//! Loading is deliberately lenient. Unknown codes leave a cell at its
//! current kind, a short preset leaves the remaining cells untouched and
//! surplus tokens are ignored. Every irregularity is counted in the returned
//! [`PresetSummary`] so callers needing strict validation can check it.

use gridmdp_types::{CellKind, RewardTable};
use tracing::{debug, warn};

use crate::coordinate::{Coordinate, GridDimensions};
use crate::error::WorldError;
use crate::grid::{Grid, to_signed};

/// Width and height of [`ASSIGNMENT_PRESET`].
pub const ASSIGNMENT_EXTENT: usize = 6;

/// The classic 6x6 grid: six goals, five penalties and five walls.
pub const ASSIGNMENT_PRESET: &str = "\
G X G W W G
W B W G X B
W W B W G W
W W W B W G
W X X X B W
W W W W W W
";

/// What happened while applying a preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresetSummary {
    /// Cells whose kind was set from a recognised code.
    pub applied: usize,
    /// Tokens whose code was not recognised (cell left unchanged).
    pub unrecognised: usize,
    /// Cells for which the preset had no token.
    pub missing: usize,
    /// Tokens left over after every cell was visited.
    pub surplus: usize,
}

impl PresetSummary {
    /// Whether every cell received a recognised code and nothing was left
    /// over.
    pub const fn is_exact(&self) -> bool {
        self.unrecognised == 0 && self.missing == 0 && self.surplus == 0
    }
}

/// Apply preset text to an existing grid.
///
/// Tokens fill row 0 across all columns, then row 1, and so on. Only the
/// first character of a token is significant. Each cell that receives a
/// recognised code also has its utility seeded with that kind's reward.
///
/// # Errors
///
/// Returns a [`WorldError`] only on internal index overflow; malformed
/// content never fails.
pub fn apply_preset(
    grid: &mut Grid,
    text: &str,
    rewards: &RewardTable,
) -> Result<PresetSummary, WorldError> {
    let dims = grid.dimensions();
    let mut tokens = text.split_whitespace();
    let mut summary = PresetSummary::default();

    for row in 0..dims.rows() {
        for col in 0..dims.columns() {
            let Some(token) = tokens.next() else {
                summary.missing = summary.missing.saturating_add(1);
                continue;
            };
            let coordinate = Coordinate::new(to_signed(col)?, to_signed(row)?, dims)?;
            match token.chars().next().and_then(CellKind::from_code) {
                Some(kind) => {
                    grid.set_kind(coordinate, kind)?;
                    grid.set_utility(coordinate, rewards.reward(kind))?;
                    summary.applied = summary.applied.saturating_add(1);
                }
                None => {
                    warn!(%coordinate, token, "unrecognised preset code, cell left unchanged");
                    summary.unrecognised = summary.unrecognised.saturating_add(1);
                }
            }
        }
    }
    summary.surplus = tokens.count();

    if summary.missing > 0 || summary.surplus > 0 {
        warn!(
            missing = summary.missing,
            surplus = summary.surplus,
            columns = dims.columns(),
            rows = dims.rows(),
            "preset size does not match grid"
        );
    }
    debug!(
        applied = summary.applied,
        unrecognised = summary.unrecognised,
        "preset applied"
    );
    Ok(summary)
}

/// Build a fresh grid and load a preset into it.
///
/// # Errors
///
/// Returns a [`WorldError`] if the grid cannot be allocated.
pub fn grid_from_preset(
    dims: GridDimensions,
    text: &str,
    rewards: &RewardTable,
) -> Result<(Grid, PresetSummary), WorldError> {
    let mut grid = Grid::new(dims)?;
    let summary = apply_preset(&mut grid, text, rewards)?;
    Ok((grid, summary))
}

/// The built-in 6x6 world.
///
/// # Errors
///
/// Returns a [`WorldError`] if the grid cannot be allocated.
pub fn assignment_world(rewards: &RewardTable) -> Result<Grid, WorldError> {
    let dims = GridDimensions::new(ASSIGNMENT_EXTENT, ASSIGNMENT_EXTENT)?;
    let (grid, _summary) = grid_from_preset(dims, ASSIGNMENT_PRESET, rewards)?;
    Ok(grid)
}

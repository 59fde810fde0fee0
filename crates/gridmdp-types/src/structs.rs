//! Core value structs shared across the workspace.
//!
//! Covers the reward lookup table, the slip model probabilities, and the
//! serializable per-cell report and per-iteration snapshot types.

use serde::{Deserialize, Serialize};

use crate::enums::{CellKind, Direction};

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

/// Immediate reward for entering (or staying in) each kind of cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardTable {
    /// Step cost for an ordinary cell.
    #[serde(default = "default_empty_reward")]
    pub empty: f64,
    /// Reward of a goal cell.
    #[serde(default = "default_positive_reward")]
    pub positive_terminal: f64,
    /// Reward of a penalty cell.
    #[serde(default = "default_negative_reward")]
    pub negative_terminal: f64,
    /// Fixed value of a wall. Walls are never updated by the solvers.
    #[serde(default)]
    pub wall: f64,
}

impl RewardTable {
    /// Look up the reward for a cell kind.
    pub const fn reward(&self, kind: CellKind) -> f64 {
        match kind {
            CellKind::Empty => self.empty,
            CellKind::PositiveTerminal => self.positive_terminal,
            CellKind::NegativeTerminal => self.negative_terminal,
            CellKind::Wall => self.wall,
        }
    }

    /// Largest absolute reward in the table.
    pub fn max_magnitude(&self) -> f64 {
        [
            self.empty,
            self.positive_terminal,
            self.negative_terminal,
            self.wall,
        ]
        .iter()
        .fold(0.0_f64, |acc, r| acc.max(r.abs()))
    }
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            empty: default_empty_reward(),
            positive_terminal: default_positive_reward(),
            negative_terminal: default_negative_reward(),
            wall: 0.0,
        }
    }
}

const fn default_empty_reward() -> f64 {
    -0.04
}

const fn default_positive_reward() -> f64 {
    1.0
}

const fn default_negative_reward() -> f64 {
    -1.0
}

// ---------------------------------------------------------------------------
// Slip model
// ---------------------------------------------------------------------------

/// Outcome probabilities of an action: the intended direction and the two
/// perpendicular slips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlipProbabilities {
    /// Probability of moving in the intended direction.
    #[serde(default = "default_forward")]
    pub forward: f64,
    /// Probability of slipping to the left of the intended direction.
    #[serde(default = "default_slip")]
    pub left: f64,
    /// Probability of slipping to the right of the intended direction.
    #[serde(default = "default_slip")]
    pub right: f64,
}

impl SlipProbabilities {
    /// Tolerance used when checking that the probabilities sum to one.
    pub const SUM_TOLERANCE: f64 = 1e-9;

    /// Probabilities in outcome order `[forward, left, right]`.
    pub const fn as_array(&self) -> [f64; 3] {
        [self.forward, self.left, self.right]
    }

    /// Whether every probability is finite and non-negative and they sum
    /// to one.
    pub fn is_valid(&self) -> bool {
        let parts = self.as_array();
        let all_sane = parts.iter().all(|p| p.is_finite() && *p >= 0.0);
        let sum: f64 = parts.iter().sum();
        all_sane && (sum - 1.0).abs() <= Self::SUM_TOLERANCE
    }
}

impl Default for SlipProbabilities {
    fn default() -> Self {
        Self {
            forward: default_forward(),
            left: default_slip(),
            right: default_slip(),
        }
    }
}

const fn default_forward() -> f64 {
    0.8
}

const fn default_slip() -> f64 {
    0.1
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Final state of one cell after a solver run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellReport {
    /// Column index (0 = leftmost).
    pub col: usize,
    /// Row index (0 = top).
    pub row: usize,
    /// Kind of the cell.
    pub kind: CellKind,
    /// Converged utility estimate.
    pub utility: f64,
    /// Chosen action, or `None` for walls.
    pub policy: Option<Direction>,
}

/// Utilities of every cell after one iteration, in column-major order.
///
/// Walls are included so that every snapshot of a grid has the same width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilitySnapshot {
    /// Iteration that produced this snapshot (0 = initial grid).
    pub iteration: u64,
    /// One utility per cell.
    pub utilities: Vec<f64>,
}

//! Enumeration types for the grid-world MDP.
//!
//! Every variant-indexed fact (direction offsets, preset codes, display
//! symbols) is expressed as an explicit lookup on the enum rather than as
//! conditionals scattered through the solvers.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Directions (the action set)
// ---------------------------------------------------------------------------

/// A compass direction the agent may choose as its action.
///
/// The discriminant order is significant: solvers scan directions in
/// [`Direction::ALL`] order and break ties toward the lowest index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward row 0.
    Up,
    /// Toward the last row.
    Down,
    /// Toward column 0.
    Left,
    /// Toward the last column.
    Right,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Number of available actions.
    pub const COUNT: usize = 4;

    /// Zero-based index of this direction (`Up` = 0 ... `Right` = 3).
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }

    /// Look up a direction by its index.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Up),
            1 => Some(Self::Down),
            2 => Some(Self::Left),
            3 => Some(Self::Right),
            _ => None,
        }
    }

    /// Movement offsets `(d_col, d_row)` for the three possible outcomes
    /// of this action, in the order `[forward, left, right]`.
    ///
    /// "Left" and "right" are relative to the direction of travel, so
    /// moving `Down` slips left toward the *higher* column.
    pub const fn outcome_offsets(self) -> [(i64, i64); 3] {
        match self {
            Self::Up => [(0, -1), (-1, 0), (1, 0)],
            Self::Down => [(0, 1), (1, 0), (-1, 0)],
            Self::Left => [(-1, 0), (0, 1), (0, -1)],
            Self::Right => [(1, 0), (0, -1), (0, 1)],
        }
    }

    /// Arrow used when rendering a policy.
    pub const fn symbol(self) -> char {
        match self {
            Self::Up => '\u{2191}',
            Self::Down => '\u{2193}',
            Self::Left => '\u{2190}',
            Self::Right => '\u{2192}',
        }
    }
}

// ---------------------------------------------------------------------------
// Cell kinds
// ---------------------------------------------------------------------------

/// The kind of a grid cell, which determines its immediate reward.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CellKind {
    /// Ordinary walkable cell carrying the step cost.
    #[default]
    Empty,
    /// Goal cell with a large positive reward.
    PositiveTerminal,
    /// Penalty cell with a large negative reward.
    NegativeTerminal,
    /// Impassable cell. Moving into it leaves the agent in place.
    Wall,
}

impl CellKind {
    /// Parse a preset code (`W`, `G`, `B`, `X`).
    ///
    /// Returns `None` for any other character; preset loading treats that
    /// as "leave the cell unchanged".
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'W' => Some(Self::Empty),
            'G' => Some(Self::PositiveTerminal),
            'B' => Some(Self::NegativeTerminal),
            'X' => Some(Self::Wall),
            _ => None,
        }
    }

    /// The preset code for this kind.
    pub const fn code(self) -> char {
        match self {
            Self::Empty => 'W',
            Self::PositiveTerminal => 'G',
            Self::NegativeTerminal => 'B',
            Self::Wall => 'X',
        }
    }

    /// Whether this is a wall.
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }
}

// ---------------------------------------------------------------------------
// Solvers
// ---------------------------------------------------------------------------

/// Which dynamic-programming algorithm produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// Bellman-optimal sweeps until the utility change is below a threshold.
    ValueIteration,
    /// Alternating fixed-policy evaluation and greedy improvement.
    PolicyIteration,
}

impl SolverKind {
    /// `CamelCase` label used in file names and rendered output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ValueIteration => "ValueIteration",
            Self::PolicyIteration => "PolicyIteration",
        }
    }
}

impl core::fmt::Display for SolverKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn direction_index_round_trips() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_index(dir.index()), Some(dir));
        }
        assert_eq!(Direction::from_index(4), None);
    }

    #[test]
    fn perpendicular_offsets_are_orthogonal_to_forward() {
        for dir in Direction::ALL {
            let [forward, left, right] = dir.outcome_offsets();
            assert_eq!(forward.0 * left.0 + forward.1 * left.1, 0);
            assert_eq!(forward.0 * right.0 + forward.1 * right.1, 0);
            // left and right are opposite each other
            assert_eq!((left.0 + right.0, left.1 + right.1), (0, 0));
        }
    }

    #[test]
    fn up_slips_sideways() {
        assert_eq!(
            Direction::Up.outcome_offsets(),
            [(0, -1), (-1, 0), (1, 0)]
        );
    }

    #[test]
    fn cell_codes_round_trip() {
        for kind in [
            CellKind::Empty,
            CellKind::PositiveTerminal,
            CellKind::NegativeTerminal,
            CellKind::Wall,
        ] {
            assert_eq!(CellKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(CellKind::from_code('?'), None);
        assert_eq!(CellKind::from_code('w'), None);
    }

    #[test]
    fn solver_kind_serializes_snake_case() {
        let json = serde_json::to_string(&SolverKind::PolicyIteration).unwrap();
        assert_eq!(json, "\"policy_iteration\"");
        assert_eq!(SolverKind::ValueIteration.to_string(), "ValueIteration");
    }
}

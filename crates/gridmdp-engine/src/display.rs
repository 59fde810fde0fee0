//! Console rendering of grids, policies, utilities and run parameters.
//!
//! Every renderer returns a `String`; `main` decides where it goes. Boards
//! are drawn row by row from the top, one fixed-width box per cell.

use gridmdp_core::config::SolverConfig;
use gridmdp_types::SolverKind;
use gridmdp_world::{Cell, Grid};

/// Inner width of one board cell.
const CELL_WIDTH: usize = 8;

/// Inner width of a cell that shows kind, utility and policy together.
const WIDE_CELL_WIDTH: usize = 13;

/// Section title framed in asterisks.
pub fn frame_title(title: &str) -> String {
    let border = "*".repeat(title.chars().count().saturating_add(4));
    format!("\n{border}\n* {title} *\n{border}\n\n")
}

/// The grid of cell kinds, using preset codes and `Wall` for walls.
pub fn render_grid_world(grid: &Grid) -> String {
    render_board("Grid Environment", grid, CELL_WIDTH, |cell| {
        cell.kind().code().to_string()
    })
}

/// The policy as arrows.
pub fn render_policy(grid: &Grid) -> String {
    render_board("Optimal Policy", grid, CELL_WIDTH, |cell| {
        cell.policy()
            .map_or_else(String::new, |direction| direction.symbol().to_string())
    })
}

/// The utilities laid out as a board.
pub fn render_utility_grid(grid: &Grid) -> String {
    render_board("Optimal Policy Utilities", grid, CELL_WIDTH, |cell| {
        format!("{:.3}", cell.utility())
    })
}

/// Kind code, utility and policy arrow of every cell on one board.
pub fn render_cells(grid: &Grid) -> String {
    render_board("Grid World", grid, WIDE_CELL_WIDTH, |cell| {
        let arrow = cell.policy().map_or(' ', |direction| direction.symbol());
        format!("{} {:7.3} {arrow}", cell.kind().code(), cell.utility())
    })
}

/// One line per cell in sweep order: `(c, r): utility`, or `WALL`.
pub fn render_state_utilities(grid: &Grid) -> String {
    let lines: String = grid
        .cells()
        .map(|cell| {
            if cell.is_wall() {
                format!("{}: WALL\n", cell.coordinate())
            } else {
                format!("{}: {:.3}\n", cell.coordinate(), cell.utility())
            }
        })
        .collect();
    format!("{}{lines}", frame_title("Utilities of States"))
}

/// The parameters a solver ran with.
pub fn render_parameters(solver: SolverKind, params: &SolverConfig) -> String {
    let rows = match solver {
        SolverKind::ValueIteration => vec![
            ("Discount Factor", params.discount.to_string()),
            ("Max Reward (Rmax)", params.r_max.to_string()),
            ("Constant 'c'", params.c.to_string()),
            ("Epsilon (c * Rmax)", params.epsilon().to_string()),
            (
                "Utility Upper Bound",
                format!("{:.5}", params.utility_upper_bound()),
            ),
            ("Convergence Threshold", format!("{:.5e}", params.threshold())),
        ],
        SolverKind::PolicyIteration => vec![
            ("Discount Factor", params.discount.to_string()),
            ("k", params.evaluation_sweeps.to_string()),
        ],
    };
    let body: String = rows
        .into_iter()
        .map(|(name, value)| format!("{name:<28}: {value}\n"))
        .collect();
    format!("{}{body}", frame_title(&format!("Experiment Setup: {solver}")))
}

fn render_board(
    title: &str,
    grid: &Grid,
    width: usize,
    label: impl Fn(&Cell) -> String,
) -> String {
    let dims = grid.dimensions();
    let mut rows: Vec<Vec<&Cell>> = vec![Vec::with_capacity(dims.columns()); dims.rows()];
    // Cells arrive column by column, so each row fills left to right.
    for cell in grid.cells() {
        if let Some(row) = rows.get_mut(cell.coordinate().row()) {
            row.push(cell);
        }
    }

    let separator = border_line('-', width, dims.columns());
    let padding = border_line(' ', width, dims.columns());

    let board: String = rows
        .iter()
        .map(|row| {
            let boxes: String = row
                .iter()
                .map(|cell| {
                    let text = if cell.is_wall() {
                        "Wall".to_owned()
                    } else {
                        label(cell)
                    };
                    format!("{text:^width$}|")
                })
                .collect();
            format!("{padding}|{boxes}\n{padding}{separator}")
        })
        .collect();
    format!("{}{separator}{board}", frame_title(title))
}

/// `|` followed by one `fill`-filled box per column.
fn border_line(fill: char, width: usize, columns: usize) -> String {
    let cell = format!("{}|", fill.to_string().repeat(width));
    format!("|{}\n", cell.repeat(columns))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use gridmdp_types::{CellKind, Direction, RewardTable};
    use gridmdp_world::{GridDimensions, grid_from_preset};

    use super::*;

    fn grid() -> Grid {
        let (grid, _) = grid_from_preset(
            GridDimensions::new(3, 2).unwrap(),
            "G X B\nW W W",
            &RewardTable::default(),
        )
        .unwrap();
        grid
    }

    #[test]
    fn title_is_framed() {
        assert_eq!(frame_title("Grid"), "\n********\n* Grid *\n********\n\n");
    }

    #[test]
    fn grid_world_draws_rows_top_down() {
        let out = render_grid_world(&grid());
        let lines: Vec<&str> = out.lines().collect();
        // Blank, border, title, border, blank, then the board.
        assert_eq!(lines[5], "|--------|--------|--------|");
        assert_eq!(lines[7], "|   G    |  Wall  |   B    |");
        assert_eq!(lines[11], "|   W    |   W    |   W    |");
        assert_eq!(lines.len(), 5 + 1 + 2 * 4);
    }

    #[test]
    fn policy_uses_arrows() {
        let mut g = grid();
        let at = g.coordinate(2, 1).unwrap();
        g.set_policy(at, Direction::Left).unwrap();
        let out = render_policy(&g);
        assert!(out.contains("Optimal Policy"));
        assert!(out.contains('←'));
        assert!(out.contains('↑'));
        assert!(out.contains("Wall"));
    }

    #[test]
    fn utilities_are_listed_in_sweep_order() {
        let out = render_state_utilities(&grid());
        let lines: Vec<&str> = out.lines().skip(5).collect();
        assert_eq!(
            lines,
            vec![
                "(0, 0): 1.000",
                "(0, 1): -0.040",
                "(1, 0): WALL",
                "(1, 1): -0.040",
                "(2, 0): -1.000",
                "(2, 1): -0.040",
            ]
        );
        let board = render_utility_grid(&grid());
        assert!(board.contains(" 1.000  |"));
    }

    #[test]
    fn parameters_depend_on_solver() {
        let params = SolverConfig::default();
        let vi = render_parameters(SolverKind::ValueIteration, &params);
        assert!(vi.contains("Convergence Threshold"));
        assert!(vi.contains("Utility Upper Bound"));
        assert!(!vi.contains("\nk "));

        let pi = render_parameters(SolverKind::PolicyIteration, &params);
        assert!(pi.contains(&format!("{:<28}: 40", "k")));
        assert!(!pi.contains("Threshold"));
        assert!(pi.contains(SolverKind::PolicyIteration.label()));
    }

    #[test]
    fn cells_show_kind_utility_and_policy() {
        let mut g = grid();
        let at = g.coordinate(2, 1).unwrap();
        g.set_policy(at, Direction::Left).unwrap();
        let out = render_cells(&g);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "* Grid World *");
        assert_eq!(lines[5], format!("|{}", "-------------|".repeat(3)));
        assert_eq!(lines[7], "| G   1.000   |    Wall     | B  -1.000   |");
        assert_eq!(lines[11], "| W  -0.040   | W  -0.040   | W  -0.040 ← |");
    }

    #[test]
    fn wall_kind_renders_as_wall() {
        let g = grid();
        let wall = g.cell(g.coordinate(1, 0).unwrap()).unwrap();
        assert_eq!(wall.kind(), CellKind::Wall);
        assert!(render_utility_grid(&g).contains("Wall"));
    }
}

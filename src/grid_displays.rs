use std::fmt;

use crate::cells::{CellIndex, CompassPrimary};
use crate::maze::Maze;
use crate::utils::{fnv_hashset, FnvHashSet};

/// What to draw inside each cell of a text rendered maze.
#[derive(Debug, Clone)]
pub enum CellBodies {
    /// `S` on the start cell, `E` on the end cell.
    StartEnd,
    /// Distance from the start, lowercase hexadecimal.
    Distances,
    /// `S` and `E` plus `.` on every other cell of the path.
    Path(FnvHashSet<CellIndex>),
}

impl CellBodies {
    pub fn path(path: &[CellIndex]) -> CellBodies {
        let mut on_path = fnv_hashset(path.len());
        on_path.extend(path.iter().cloned());
        CellBodies::Path(on_path)
    }
}

/// Box drawing rendering of a maze.
#[derive(Debug)]
pub struct MazeText<'a> {
    maze: &'a Maze,
    bodies: CellBodies,
}

impl<'a> MazeText<'a> {
    pub fn new(maze: &'a Maze, bodies: CellBodies) -> MazeText<'a> {
        MazeText { maze, bodies }
    }

    /// Render the contents of a cell, always 3 glyphs wide.
    fn render_cell_body(&self, index: CellIndex) -> String {
        let start_or_end = || {
            if index == self.maze.start() {
                Some(String::from(" S "))
            } else if index == self.maze.end() {
                Some(String::from(" E "))
            } else {
                None
            }
        };

        match self.bodies {
            CellBodies::StartEnd => start_or_end().unwrap_or_else(|| String::from("   ")),
            CellBodies::Distances => {
                // centre align, padding 3, lowercase hexadecimal
                format!("{:^3x}", self.maze.cells()[index].distance)
            }
            CellBodies::Path(ref on_path) => {
                start_or_end().unwrap_or_else(|| if on_path.contains(&index) {
                    String::from(" . ")
                } else {
                    String::from("   ")
                })
            }
        }
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        MazeText::new(self, CellBodies::StartEnd).fmt(f)
    }
}

/// Box drawing glyph joining the wall segments that leave a point,
/// indexed by bits left 1, right 2, up 4, down 8.
const JUNCTIONS: [&str; 16] = [
    " ", "╴", "╶", "─", "╵", "┘", "└", "┴", "╷", "┐", "┌", "┬", "│", "┤", "├", "┼",
];

fn junction(left: bool, right: bool, up: bool, down: bool) -> &'static str {
    let bits = left as usize | (right as usize) << 1 | (up as usize) << 2 | (down as usize) << 3;
    JUNCTIONS[bits]
}

const HORIZONTAL_WALL: &str = "───";
const NO_HORIZONTAL_WALL: &str = "   ";

impl<'a> fmt::Display for MazeText<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let maze = self.maze;
        let columns_count = maze.settings().width();
        let rows_count = maze.settings().height();
        let linked = |cell: CellIndex, direction| maze.is_neighbour_linked(cell, direction);

        // The north boundary. A wall segment hangs down from each joint unless the two cells
        // either side of it are linked.
        let mut output = String::from(junction(false, true, false, true));
        for column in 0..columns_count {
            let is_last_column = column == columns_count - 1;
            output.push_str(HORIZONTAL_WALL);
            output.push_str(junction(true,
                                     !is_last_column,
                                     false,
                                     !linked(column, CompassPrimary::East)));
        }
        output.push('\n');

        for row in 0..rows_count {
            let is_last_row = row == rows_count - 1;

            // Each row draws the cell bodies with their east walls, then the south walls and the
            // joints below them. The north walls were drawn by the row above.
            let mut bodies = String::from(junction(false, false, true, true));
            let mut south_walls = String::new();

            for column in 0..columns_count {
                let cell = row * columns_count + column;
                let is_last_column = column == columns_count - 1;
                let east_open = linked(cell, CompassPrimary::East);
                let south_open = linked(cell, CompassPrimary::South);

                bodies.push_str(&self.render_cell_body(cell));
                bodies.push_str(if east_open { " " } else { junction(false, false, true, true) });

                if column == 0 {
                    south_walls.push_str(junction(false, !south_open, true, !is_last_row));
                }
                south_walls.push_str(if south_open { NO_HORIZONTAL_WALL } else { HORIZONTAL_WALL });

                // The joint at the south east corner of the cell. Its four arms are the south
                // wall of this cell, the south wall of the east cell, the east wall of this cell
                // and the east wall of the south cell.
                let east_cell_south_open = maze.neighbour_at_direction(cell, CompassPrimary::East)
                    .map_or(false, |c| linked(c, CompassPrimary::South));
                let south_cell_east_open = maze.neighbour_at_direction(cell, CompassPrimary::South)
                    .map_or(false, |c| linked(c, CompassPrimary::East));

                south_walls.push_str(junction(!south_open,
                                              !is_last_column && !east_cell_south_open,
                                              !east_open,
                                              !is_last_row && !south_cell_east_open));
            }

            output.push_str(&bodies);
            output.push('\n');
            output.push_str(&south_walls);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}

#[cfg(test)]
mod tests {

    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::generators::generate_maze;
    use crate::grid::{generate_grid, GridSettings};
    use crate::pathing::solution_path;
    use crate::units::{Height, Width};

    fn maze(w: usize, h: usize, seed: u64) -> Maze {
        let g = generate_grid(GridSettings::rectangle(Width(w), Height(h))).unwrap();
        generate_maze(&g, &mut XorShiftRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn two_cell_corridor() {
        let m = maze(2, 1, 1);
        let (left, right) = if m.start() == 0 { (" S ", " E ") } else { (" E ", " S ") };
        let expected = format!("┌───────┐\n│{} {}│\n└───────┘\n", left, right);
        assert_eq!(m.to_string(), expected);
    }

    #[test]
    fn single_cell() {
        let m = maze(1, 1, 0);
        assert_eq!(m.to_string(), "┌───┐\n│ S │\n└───┘\n");
    }

    #[test]
    fn vertical_corridor_distances() {
        // Every cell of a one wide corridor is on the boundary, so the start may be the middle one.
        for seed in 0..10 {
            let m = maze(1, 3, seed);
            let text = MazeText::new(&m, CellBodies::Distances).to_string();
            let lines = text.lines().collect::<Vec<_>>();
            assert_eq!(lines.len(), 7);
            assert_eq!(lines[0], "┌───┐");
            assert_eq!(lines[2], "│   │");
            assert_eq!(lines[4], "│   │");
            assert_eq!(lines[6], "└───┘");
            for (index, cell) in m.iter().enumerate() {
                let body = lines[1 + 2 * index].trim_matches('│');
                assert_eq!(body, format!("{:^3x}", cell.distance));
            }
            assert_eq!(lines[1 + 2 * m.start()], "│ 0 │");
        }
    }

    #[test]
    fn text_dimensions() {
        let m = maze(7, 5, 2);
        let text = m.to_string();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 1 + 2 * 5);
        for line in lines {
            assert_eq!(line.chars().count(), 1 + 4 * 7);
        }
        assert_eq!(text.matches('S').count(), 1);
        assert_eq!(text.matches('E').count(), 1);
    }

    #[test]
    fn path_bodies_mark_route() {
        let m = maze(8, 8, 6);
        let path = solution_path(&m).unwrap();
        let text = MazeText::new(&m, CellBodies::path(&path)).to_string();
        assert_eq!(text.matches('.').count(), path.len() - 2);
    }
}

use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::convert::From;

/// Row major index of a cell within a grid or maze.
pub type CellIndex = usize;

/// At most 4 neighbours or connections per cell on a rectangular grid.
pub type IndexSmallVec = SmallVec<[CellIndex; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Position {
        Position { x, y }
    }
}

impl From<(u32, u32)> for Position {
    fn from(x_y_pair: (u32, u32)) -> Position {
        Position::new(x_y_pair.0, x_y_pair.1)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    /// The order neighbours are probed in when a rectangular grid is built.
    /// The maze generator picks from neighbour lists by position, so this order is part of the
    /// reproducibility contract for seeded generation.
    pub const PROBE_ORDER: [CompassPrimary; 4] = [CompassPrimary::West,
                                                  CompassPrimary::North,
                                                  CompassPrimary::East,
                                                  CompassPrimary::South];

    /// The position one step away in this direction, if it is inside a `width` x `height` grid.
    /// There is no wrap around.
    pub fn offset(self, pos: Position, width: usize, height: usize) -> Option<Position> {
        let (x, y) = (pos.x as usize, pos.y as usize);
        match self {
            CompassPrimary::North => {
                if y > 0 {
                    Some(Position::new(pos.x, pos.y - 1))
                } else {
                    None
                }
            }
            CompassPrimary::South => {
                if y + 1 < height {
                    Some(Position::new(pos.x, pos.y + 1))
                } else {
                    None
                }
            }
            CompassPrimary::East => {
                if x + 1 < width {
                    Some(Position::new(pos.x + 1, pos.y))
                } else {
                    None
                }
            }
            CompassPrimary::West => {
                if x > 0 {
                    Some(Position::new(pos.x - 1, pos.y))
                } else {
                    None
                }
            }
        }
    }
}

/// A grid position and the indices of the cells adjacent to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub position: Position,
    pub neighbours: IndexSmallVec,
}

impl GridCell {
    /// Boundary cells are missing at least one neighbour.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.neighbours.len() < 4
    }
}

/// A grid cell plus the passages carved from it and its tree distance from the maze start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeCell {
    pub position: Position,
    pub neighbours: IndexSmallVec,
    pub connections: IndexSmallVec,
    pub distance: usize,
}

impl MazeCell {
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.neighbours.len() < 4
    }

    #[inline]
    pub fn is_linked(&self, other: CellIndex) -> bool {
        self.connections.contains(&other)
    }

    /// Exactly one open passage, a leaf of the maze's spanning tree.
    #[inline]
    pub fn is_dead_end(&self) -> bool {
        self.connections.len() == 1
    }
}

impl<'a> From<&'a GridCell> for MazeCell {
    fn from(cell: &'a GridCell) -> MazeCell {
        MazeCell {
            position: cell.position,
            neighbours: cell.neighbours.clone(),
            connections: IndexSmallVec::new(),
            distance: 0,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn offsets_stay_in_bounds() {
        let gc = |x, y| Position::new(x, y);
        let check = |pos, dir: CompassPrimary, expected| {
            assert_eq!(dir.offset(pos, 2, 2), expected);
        };
        check(gc(0, 0), CompassPrimary::North, None);
        check(gc(0, 0), CompassPrimary::South, Some(gc(0, 1)));
        check(gc(0, 0), CompassPrimary::East, Some(gc(1, 0)));
        check(gc(0, 0), CompassPrimary::West, None);

        check(gc(1, 1), CompassPrimary::North, Some(gc(1, 0)));
        check(gc(1, 1), CompassPrimary::South, None);
        check(gc(1, 1), CompassPrimary::East, None);
        check(gc(1, 1), CompassPrimary::West, Some(gc(0, 1)));
    }

    #[test]
    fn maze_cell_starts_closed() {
        let grid_cell = GridCell {
            position: Position::new(1, 0),
            neighbours: [0, 2, 4].iter().cloned().collect(),
        };
        let maze_cell = MazeCell::from(&grid_cell);
        assert_eq!(maze_cell.position, grid_cell.position);
        assert_eq!(&*maze_cell.neighbours, &[0, 2, 4]);
        assert!(maze_cell.connections.is_empty());
        assert_eq!(maze_cell.distance, 0);
        assert!(maze_cell.is_boundary());
        assert!(!maze_cell.is_dead_end());
    }

    #[test]
    fn position_from_pair() {
        assert_eq!(Position::from((3, 7)), Position::new(3, 7));
    }

    #[test]
    fn position_json() {
        let json = serde_json::to_string(&Position::new(3, 7)).unwrap();
        assert_eq!(json, r#"{"x":3,"y":7}"#);
        assert_eq!(serde_json::from_str::<Position>(&json).unwrap(), Position::new(3, 7));
    }
}

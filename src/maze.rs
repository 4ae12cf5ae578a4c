use std::fmt;
use std::slice;

use crate::cells::{CellIndex, CompassPrimary, MazeCell};
use crate::grid::GridSettings;

/// A perfect maze: grid cells annotated with open passages and distances from `start`.
///
/// Only `generators::generate_maze` builds these. Consumers treat them as read only.
#[derive(Clone, PartialEq, Eq)]
pub struct Maze {
    settings: GridSettings,
    cells: Vec<MazeCell>,
    start: CellIndex,
    end: CellIndex,
}

impl fmt::Debug for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Maze :: settings: {:?}, cells: {}, links: {}, start: {}, end: {}",
               self.settings,
               self.cells.len(),
               self.links_count(),
               self.start,
               self.end)
    }
}

impl Maze {
    pub(crate) fn new(settings: GridSettings,
                      cells: Vec<MazeCell>,
                      start: CellIndex,
                      end: CellIndex)
                      -> Maze {
        Maze { settings, cells, start, end }
    }

    #[inline]
    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    #[inline]
    pub fn cells(&self) -> &[MazeCell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, index: CellIndex) -> Option<&MazeCell> {
        self.cells.get(index)
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<MazeCell> {
        self.cells.iter()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn start(&self) -> CellIndex {
        self.start
    }

    #[inline]
    pub fn end(&self) -> CellIndex {
        self.end
    }

    #[inline]
    pub fn start_cell(&self) -> &MazeCell {
        &self.cells[self.start]
    }

    #[inline]
    pub fn end_cell(&self) -> &MazeCell {
        &self.cells[self.end]
    }

    /// Number of undirected passages.
    pub fn links_count(&self) -> usize {
        self.cells.iter().map(|c| c.connections.len()).sum::<usize>() / 2
    }

    pub fn max_distance(&self) -> usize {
        self.cells.iter().map(|c| c.distance).max().unwrap_or(0)
    }

    /// Are two cells joined by a passage? False for invalid indices.
    pub fn is_linked(&self, a: CellIndex, b: CellIndex) -> bool {
        self.cells.get(a).map_or(false, |cell| cell.is_linked(b))
    }

    pub fn neighbour_at_direction(&self,
                                  index: CellIndex,
                                  direction: CompassPrimary)
                                  -> Option<CellIndex> {
        let cell = self.cells.get(index)?;
        match self.settings {
            GridSettings::Rectangle(ref rect) => {
                direction.offset(cell.position, rect.width, rect.height)
                         .and_then(|pos| rect.index_of(pos))
            }
        }
    }

    pub fn is_neighbour_linked(&self, index: CellIndex, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(index, direction)
            .map_or(false, |neighbour| self.is_linked(index, neighbour))
    }

    /// Each passage once, as `(lower index, higher index)`.
    pub fn iter_links(&self) -> LinksIter {
        LinksIter {
            cells: self.cells.iter().enumerate(),
            current: None,
        }
    }

    /// Cells in rows, top to bottom.
    pub fn iter_row(&self) -> slice::Chunks<MazeCell> {
        self.cells.chunks(self.settings.width())
    }
}

pub struct LinksIter<'a> {
    cells: std::iter::Enumerate<slice::Iter<'a, MazeCell>>,
    current: Option<(CellIndex, slice::Iter<'a, CellIndex>)>,
}

impl<'a> Iterator for LinksIter<'a> {
    type Item = (CellIndex, CellIndex);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((src, ref mut connections)) = self.current {
                if let Some(&dst) = connections.find(|&&dst| dst > src) {
                    return Some((src, dst));
                }
            }
            let (index, cell) = self.cells.next()?;
            self.current = Some((index, cell.connections.iter()));
        }
    }
}

impl<'a> fmt::Debug for LinksIter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: current: {:?}", self.current.as_ref().map(|c| c.0))
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;

    use super::*;
    use crate::cells::{IndexSmallVec, Position};
    use crate::units::{Height, Width};

    // 2x2 maze shaped like a U: 0 - 2 - 3 - 1
    fn u_maze() -> Maze {
        let links: [&[usize]; 4] = [&[2], &[3], &[0, 3], &[2, 1]];
        let distances = [0, 3, 1, 2];
        let neighbours: [&[usize]; 4] = [&[1, 2], &[0, 3], &[0, 3], &[2, 1]];
        let cells = (0..4)
            .map(|i| {
                MazeCell {
                    position: Position::new(i as u32 % 2, i as u32 / 2),
                    neighbours: neighbours[i].iter().cloned().collect::<IndexSmallVec>(),
                    connections: links[i].iter().cloned().collect::<IndexSmallVec>(),
                    distance: distances[i],
                }
            })
            .collect();
        Maze::new(GridSettings::rectangle(Width(2), Height(2)), cells, 0, 1)
    }

    #[test]
    fn link_queries() {
        let m = u_maze();
        assert!(m.is_linked(0, 2) && m.is_linked(2, 0));
        assert!(m.is_linked(3, 1) && m.is_linked(1, 3));
        assert!(!m.is_linked(0, 1));
        assert!(!m.is_linked(0, 100));
        assert!(!m.is_linked(100, 0));
        assert_eq!(m.links_count(), 3);
        assert_eq!(m.max_distance(), 3);
        assert_eq!(m.start_cell().distance, 0);
        assert_eq!(m.end_cell().position, Position::new(1, 0));
    }

    #[test]
    fn directional_links() {
        let m = u_maze();
        assert_eq!(m.neighbour_at_direction(0, CompassPrimary::North), None);
        assert_eq!(m.neighbour_at_direction(0, CompassPrimary::East), Some(1));
        assert_eq!(m.neighbour_at_direction(0, CompassPrimary::South), Some(2));
        assert!(m.is_neighbour_linked(0, CompassPrimary::South));
        assert!(!m.is_neighbour_linked(0, CompassPrimary::East));
        assert!(m.is_neighbour_linked(2, CompassPrimary::East));
        assert!(m.is_neighbour_linked(1, CompassPrimary::South));
        assert!(!m.is_neighbour_linked(3, CompassPrimary::South));
    }

    #[test]
    fn links_iterated_once() {
        let m = u_maze();
        let links = m.iter_links().sorted().collect::<Vec<_>>();
        assert_eq!(links, vec![(0, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn rows() {
        let m = u_maze();
        let rows = m.iter_row()
                    .map(|row| row.iter().map(|c| c.position.x).collect::<Vec<_>>())
                    .collect::<Vec<_>>();
        assert_eq!(rows, vec![vec![0, 1], vec![0, 1]]);
    }
}

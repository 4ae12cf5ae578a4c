use bit_set::BitSet;
use log::{debug, trace};
use rand::Rng;
use smallvec::SmallVec;

use crate::cells::{CellIndex, MazeCell};
use crate::errors::*;
use crate::grid::{Grid, GridSettings, RectangleSettings};
use crate::maze::Maze;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
enum BoundarySide {
    Top,
    Right,
    Bottom,
    Left,
}

const SIDES: [BoundarySide; 4] = [BoundarySide::Top,
                                  BoundarySide::Right,
                                  BoundarySide::Bottom,
                                  BoundarySide::Left];

/// Carve a perfect maze out of a grid.
///
/// A start cell is sampled on the grid boundary, then a randomized depth first walk with an
/// optional bound on branch length connects every cell into a spanning tree, recording each cell's
/// distance from the start. The end is the furthest boundary dead end.
///
/// The grid is only read, the maze gets its own copy of the cells.
pub fn generate_maze<R>(grid: &Grid, rng: &mut R) -> Result<Maze>
    where R: Rng + ?Sized
{
    let settings = *grid.settings();
    settings.validate()?;

    let start = random_start_cell(&settings, rng);
    let cells = carve_passages(grid, start, rng);
    let end = furthest_dead_end(&cells, &settings).unwrap_or(start);

    debug!("Generated {}x{} maze, start {} end {} (distance {})",
           settings.width(),
           settings.height(),
           start,
           end,
           cells[end].distance);

    Ok(Maze::new(settings, cells, start, end))
}

/// Pick a side uniformly, then a position along that side uniformly.
/// On a non square grid this does not sample boundary cells uniformly.
fn random_start_cell<R>(settings: &GridSettings, rng: &mut R) -> CellIndex
    where R: Rng + ?Sized
{
    match *settings {
        GridSettings::Rectangle(ref rect) => random_rectangle_boundary_cell(rect, rng),
    }
}

fn random_rectangle_boundary_cell<R>(rect: &RectangleSettings, rng: &mut R) -> CellIndex
    where R: Rng + ?Sized
{
    let side = SIDES[rng.gen_range(0..SIDES.len())];

    let (x, y) = match side {
        BoundarySide::Top => (rng.gen_range(0..rect.width), 0),
        BoundarySide::Bottom => (rng.gen_range(0..rect.width), rect.height - 1),
        BoundarySide::Left => (0, rng.gen_range(0..rect.height)),
        BoundarySide::Right => (rect.width - 1, rng.gen_range(0..rect.height)),
    };

    x + y * rect.width
}

/// Randomized depth first walk over the grid.
///
/// The cursor is tracked as a position in the visited order. Backtracking always steps back
/// exactly one position in that order, whether the cursor ran out of unvisited neighbours or the
/// branch hit the maximum branch distance. Stepping back from the first position wraps to the
/// last one.
fn carve_passages<R>(grid: &Grid, start: CellIndex, rng: &mut R) -> Vec<MazeCell>
    where R: Rng + ?Sized
{
    let mut cells = grid.iter().map(MazeCell::from).collect::<Vec<_>>();
    let cells_count = cells.len();
    let max_branch_distance = grid.settings().max_branch_distance().map(|d| d.get());

    let mut visited = BitSet::with_capacity(cells_count);
    let mut visit_order = Vec::with_capacity(cells_count);
    visited.insert(start);
    visit_order.push(start);

    let mut cursor = 0;
    let mut branch_distance = 0;

    while visit_order.len() < cells_count {
        let current = visit_order[cursor];
        let available_neighbours = cells[current].neighbours
            .iter()
            .cloned()
            .filter(|n| !visited.contains(*n))
            .collect::<SmallVec<[CellIndex; 4]>>();

        let branch_exhausted = max_branch_distance.map_or(false, |max| branch_distance >= max);

        if available_neighbours.is_empty() || branch_exhausted {
            cursor = if cursor == 0 { visit_order.len() - 1 } else { cursor - 1 };
            branch_distance = 0;
            trace!("Backtrack from {} to {}", current, visit_order[cursor]);
            continue;
        }

        let next = available_neighbours[rng.gen_range(0..available_neighbours.len())];

        cells[current].connections.push(next);
        cells[next].connections.push(current);
        cells[next].distance = cells[current].distance + 1;

        visited.insert(next);
        visit_order.push(next);
        cursor = visit_order.len() - 1;
        branch_distance += 1;
    }

    cells
}

/// The boundary dead end with the greatest distance, the lowest index winning ties.
/// None if there is no boundary dead end at all, e.g. on a single cell grid.
fn furthest_dead_end(cells: &[MazeCell], settings: &GridSettings) -> Option<CellIndex> {
    let mut furthest: Option<CellIndex> = None;

    for (index, cell) in cells.iter().enumerate() {
        if !is_valid_end_cell(cell, settings) {
            continue;
        }
        let further = furthest.map_or(true, |f| cell.distance > cells[f].distance);
        if further {
            furthest = Some(index);
        }
    }

    furthest
}

fn is_valid_end_cell(cell: &MazeCell, settings: &GridSettings) -> bool {
    match *settings {
        GridSettings::Rectangle(_) => cell.is_boundary() && cell.is_dead_end(),
    }
}

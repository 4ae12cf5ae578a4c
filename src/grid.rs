use error_chain::bail;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::slice;
use std::str::FromStr;

use crate::cells::{CellIndex, CompassPrimary, GridCell, IndexSmallVec, Position};
use crate::errors::*;
use crate::units::{Height, Width};

/// Topology tags that can be named in configuration.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Topology {
    Rectangle,
}

impl Topology {
    /// Build the settings for this topology.
    pub fn settings(self,
                    width: Width,
                    height: Height,
                    max_branch_distance: Option<NonZeroUsize>)
                    -> GridSettings {
        match self {
            Topology::Rectangle => {
                GridSettings::Rectangle(RectangleSettings {
                    width: width.0,
                    height: height.0,
                    max_branch_distance,
                })
            }
        }
    }
}

impl FromStr for Topology {
    type Err = Error;

    fn from_str(name: &str) -> Result<Topology> {
        match name.trim().to_lowercase().as_str() {
            "rectangle" | "rect" => Ok(Topology::Rectangle),
            _ => Err(ErrorKind::UnsupportedTopology(name.to_owned()).into()),
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Topology::Rectangle => write!(f, "rectangle"),
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub struct RectangleSettings {
    pub width: usize,
    pub height: usize,
    /// Consecutive forward steps a depth first branch may take before it is forced to backtrack.
    /// `None` is unbounded.
    #[serde(default)]
    pub max_branch_distance: Option<NonZeroUsize>,
}

impl RectangleSettings {
    pub fn new(width: Width, height: Height) -> RectangleSettings {
        RectangleSettings {
            width: width.0,
            height: height.0,
            max_branch_distance: None,
        }
    }

    pub fn with_max_branch_distance(mut self, distance: Option<NonZeroUsize>) -> RectangleSettings {
        self.max_branch_distance = distance;
        self
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    /// Row major index of a position, None if the position is outside the rectangle.
    #[inline]
    pub fn index_of(&self, pos: Position) -> Option<CellIndex> {
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    #[inline]
    pub fn position_of(&self, index: CellIndex) -> Position {
        Position::new((index % self.width) as u32, (index / self.width) as u32)
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!(ErrorKind::InvalidDimensions(self.width, self.height));
        }
        Ok(())
    }
}

/// One case per supported topology, each carrying its own parameters.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GridSettings {
    Rectangle(RectangleSettings),
}

impl GridSettings {
    pub fn rectangle(width: Width, height: Height) -> GridSettings {
        GridSettings::Rectangle(RectangleSettings::new(width, height))
    }

    pub fn topology(&self) -> Topology {
        match *self {
            GridSettings::Rectangle(_) => Topology::Rectangle,
        }
    }

    pub fn width(&self) -> usize {
        match *self {
            GridSettings::Rectangle(ref rect) => rect.width,
        }
    }

    pub fn height(&self) -> usize {
        match *self {
            GridSettings::Rectangle(ref rect) => rect.height,
        }
    }

    pub fn size(&self) -> usize {
        match *self {
            GridSettings::Rectangle(ref rect) => rect.size(),
        }
    }

    pub fn max_branch_distance(&self) -> Option<NonZeroUsize> {
        match *self {
            GridSettings::Rectangle(ref rect) => rect.max_branch_distance,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            GridSettings::Rectangle(ref rect) => rect.validate(),
        }
    }
}

/// The static topology: every cell's position and adjacency. Built once by `generate_grid`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    settings: GridSettings,
    cells: Vec<GridCell>,
}

impl Grid {
    #[inline]
    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    #[inline]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, index: CellIndex) -> Option<&GridCell> {
        self.cells.get(index)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<GridCell> {
        self.cells.iter()
    }
}

/// Build the grid topology described by `settings`.
///
/// Cells are enumerated in row major order and each cell's neighbours are probed
/// west, north, east, south against the grid bounds.
pub fn generate_grid(settings: GridSettings) -> Result<Grid> {
    settings.validate()?;

    let cells = match settings {
        GridSettings::Rectangle(ref rect) => rectangle_cells(rect),
    };

    Ok(Grid { settings, cells })
}

fn rectangle_cells(rect: &RectangleSettings) -> Vec<GridCell> {
    let mut cells = Vec::with_capacity(rect.size());

    for y in 0..rect.height {
        for x in 0..rect.width {
            let position = Position::new(x as u32, y as u32);
            let neighbours = CompassPrimary::PROBE_ORDER
                .iter()
                .filter_map(|dir| dir.offset(position, rect.width, rect.height))
                .filter_map(|adjacent| rect.index_of(adjacent))
                .collect::<IndexSmallVec>();
            cells.push(GridCell { position, neighbours });
        }
    }

    cells
}

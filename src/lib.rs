//! **mazerunner** generates perfect mazes on a rectangular grid, renders them as text or images
//! and runs a small walk-to-the-exit game over the rendered image.
//!
//! ```ignore
//! let grid = generate_grid(GridSettings::rectangle(Width(20), Height(10)))?;
//! let maze = generate_maze(&grid, &mut rand::thread_rng())?;
//! println!("{}", maze);
//! ```

pub mod cells;
pub mod errors;
pub mod game;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod maze;
pub mod pathing;
pub mod renderers;
pub mod units;
mod utils;

pub use crate::generators::generate_maze;
pub use crate::grid::generate_grid;

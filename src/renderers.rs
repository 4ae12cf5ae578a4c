use std::path::Path;

use error_chain::bail;
use image::{Rgb, RgbImage};
use log::debug;

use crate::cells::{CellIndex, Position};
use crate::errors::*;
use crate::grid::GridSettings;
use crate::maze::Maze;

pub type Colour = Rgb<u8>;

pub const BLACK: Colour = Rgb([0, 0, 0]);
pub const WHITE: Colour = Rgb([0xff, 0xff, 0xff]);
pub const RED: Colour = Rgb([0xff, 0, 0]);
pub const GREEN: Colour = Rgb([0, 0xff, 0]);
pub const BLUE: Colour = Rgb([0, 0, 0xff]);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Style {
    pub wall_colour: Colour,
    pub cell_colour: Colour,
    pub start_colour: Colour,
    pub end_colour: Colour,
    pub path_colour: Colour,
    pub cell_size: u32,
    pub wall_size: u32,
}

impl Default for Style {
    fn default() -> Style {
        Style {
            wall_colour: BLACK,
            cell_colour: WHITE,
            start_colour: RED,
            end_colour: GREEN,
            path_colour: BLUE,
            cell_size: 30,
            wall_size: 5,
        }
    }
}

impl Style {
    /// Distance in pixels between the top left corners of two adjacent cells.
    #[inline]
    fn pitch(&self) -> u32 {
        self.cell_size + self.wall_size
    }
}

#[derive(Debug)]
pub struct RenderOptions<'path> {
    style: Style,
    path: Option<Vec<CellIndex>>,
    output_file: Option<&'path Path>,
}

#[derive(Debug)]
pub struct RenderOptionsBuilder<'path> {
    options: RenderOptions<'path>,
}

impl<'path> RenderOptionsBuilder<'path> {
    pub fn new() -> RenderOptionsBuilder<'path> {
        RenderOptionsBuilder {
            options: RenderOptions {
                style: Style::default(),
                path: None,
                output_file: None,
            },
        }
    }
    pub fn style(mut self, style: Style) -> Self {
        self.options.style = style;
        self
    }
    pub fn cell_size(mut self, pixels: u32) -> Self {
        self.options.style.cell_size = pixels;
        self
    }
    pub fn wall_size(mut self, pixels: u32) -> Self {
        self.options.style.wall_size = pixels;
        self
    }
    /// Mark the cells of a path (e.g. the solution) with a small square.
    pub fn path(mut self, path: Option<Vec<CellIndex>>) -> Self {
        self.options.path = path;
        self
    }
    pub fn output_file(mut self, output_file: Option<&'path Path>) -> Self {
        self.options.output_file = output_file;
        self
    }
    pub fn build(self) -> RenderOptions<'path> {
        self.options
    }
}

impl<'path> Default for RenderOptionsBuilder<'path> {
    fn default() -> Self {
        RenderOptionsBuilder::new()
    }
}

/// Pixel dimensions of the canvas needed to draw a maze with the given settings.
pub fn canvas_size(settings: &GridSettings, style: &Style) -> (u32, u32) {
    match *settings {
        GridSettings::Rectangle(ref rect) => {
            (style.wall_size + rect.width as u32 * style.pitch(),
             style.wall_size + rect.height as u32 * style.pitch())
        }
    }
}

/// Draw the maze, saving it as a PNG when the options name an output file.
pub fn render_maze(maze: &Maze, options: &RenderOptions) -> Result<RgbImage> {
    let image = draw_maze(maze, &options.style, options.path.as_ref().map(|p| p.as_slice()))?;

    if let Some(file_path) = options.output_file {
        image.save(file_path)?;
        debug!("Saved maze image to {}", file_path.display());
    }

    Ok(image)
}

/// Paint walls, cells, passages, optional path markers and the two doors onto a new canvas.
pub fn draw_maze(maze: &Maze, style: &Style, path: Option<&[CellIndex]>) -> Result<RgbImage> {
    let (width, height) = canvas_size(maze.settings(), style);
    let mut canvas = RgbImage::from_pixel(width, height, style.wall_colour);

    for cell in maze.iter() {
        draw_cell(&mut canvas, style, cell.position);
    }

    // Each passage once, painted from the lower index cell so the span is always east or south.
    for (a, b) in maze.iter_links() {
        draw_connection(&mut canvas,
                        style,
                        maze.cells()[a].position,
                        maze.cells()[b].position);
    }

    if let Some(path_cells) = path {
        for &index in path_cells {
            if let Some(cell) = maze.cell(index) {
                draw_path_marker(&mut canvas, style, cell.position);
            }
        }
    }

    draw_door(&mut canvas, maze, style, maze.start(), style.start_colour)?;
    draw_door(&mut canvas, maze, style, maze.end(), style.end_colour)?;

    Ok(canvas)
}

fn fill_rect(canvas: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, colour: Colour) {
    let x_end = x.saturating_add(w).min(canvas.width());
    let y_end = y.saturating_add(h).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, colour);
        }
    }
}

fn draw_cell(canvas: &mut RgbImage, style: &Style, pos: Position) {
    fill_rect(canvas,
              style.wall_size + style.pitch() * pos.x,
              style.wall_size + style.pitch() * pos.y,
              style.cell_size,
              style.cell_size,
              style.cell_colour);
}

/// `to` must be east or south of `from`.
fn draw_connection(canvas: &mut RgbImage, style: &Style, from: Position, to: Position) {
    let span_x = 1 + to.x - from.x;
    let span_y = 1 + to.y - from.y;

    fill_rect(canvas,
              style.wall_size + style.pitch() * from.x,
              style.wall_size + style.pitch() * from.y,
              style.cell_size * span_x + style.wall_size * (span_x - 1),
              style.cell_size * span_y + style.wall_size * (span_y - 1),
              style.cell_colour);
}

/// Nothing is drawn for zero sized cells.
fn draw_path_marker(canvas: &mut RgbImage, style: &Style, pos: Position) {
    if style.cell_size == 0 {
        return;
    }
    let marker = (style.cell_size / 3).max(1);
    let inset = style.cell_size.saturating_sub(marker) / 2;
    fill_rect(canvas,
              style.wall_size + style.pitch() * pos.x + inset,
              style.wall_size + style.pitch() * pos.y + inset,
              marker,
              marker,
              style.path_colour);
}

fn draw_door(canvas: &mut RgbImage,
             maze: &Maze,
             style: &Style,
             index: CellIndex,
             colour: Colour)
             -> Result<()> {
    let pos = maze.cells()[index].position;

    let door = match *maze.settings() {
        GridSettings::Rectangle(ref rect) => {
            let (w, h) = (rect.width as u32, rect.height as u32);
            if pos.x == 0 {
                Some((0, style.wall_size + style.pitch() * pos.y, style.wall_size, style.cell_size))
            } else if pos.y == 0 {
                Some((style.wall_size + style.pitch() * pos.x, 0, style.cell_size, style.wall_size))
            } else if pos.x == w - 1 {
                Some((style.pitch() * w,
                      style.wall_size + style.pitch() * pos.y,
                      style.wall_size,
                      style.cell_size))
            } else if pos.y == h - 1 {
                Some((style.wall_size + style.pitch() * pos.x,
                      style.pitch() * h,
                      style.cell_size,
                      style.wall_size))
            } else {
                None
            }
        }
    };

    match door {
        Some((x, y, door_w, door_h)) => {
            fill_rect(canvas, x, y, door_w, door_h, colour);
            Ok(())
        }
        None => bail!(ErrorKind::InvalidDoorPosition(index)),
    }
}

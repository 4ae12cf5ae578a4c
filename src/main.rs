use docopt::Docopt;
use error_chain::bail;
use log::{debug, info, LevelFilter};
use mazerunner::{
    game::{GameSession, GameStatus, Key},
    generate_grid, generate_maze,
    grid::Topology,
    grid_displays::{CellBodies, MazeText},
    maze::Maze,
    pathing,
    renderers,
    units::{Height, Width},
};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
    num::NonZeroUsize,
    path::Path,
};

const USAGE: &str = "Mazerunner

Usage:
    mazerunner -h | --help
    mazerunner [options]
    mazerunner play <moves> [options]

Options:
    -h --help              Show this screen.
    --topology=<name>      Grid topology, only rectangle is supported [default: rectangle].
    --width=<w>            The grid width in a w*h grid [default: 10].
    --height=<h>           The grid height in a w*h grid [default: 10].
    --max-branch=<n>       Longest run of the depth first walk before it backs up one cell. 0 is unbounded [default: 0].
    --seed=<n>             Random seed. A random one is chosen and logged when absent.
    --text-out=<path>      Output file path for a textual rendering of a maze. Printed to stdout when no output is given.
    --show-distances       Show the distance from the start to every cell in the text rendering.
    --show-path            Show the path from the start to the end point.
    --image-out=<path>     Output file path for an image rendering of a maze. Always PNG format.
    --cell-pixels=<n>      Pixel length of a cell side in the image [default: 30].
    --wall-pixels=<n>      Pixel thickness of a wall in the image [default: 5].
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --frame-ms=<n>         Milliseconds per simulated game frame [default: 16].

Moves for play are comma separated key:frames pairs, e.g. d:30,s:12 holds d for 30 frames then s for 12.
Keys are w, a, s, d or ArrowUp, ArrowLeft, ArrowDown, ArrowRight.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_play: bool,
    arg_moves: String,
    flag_topology: String,
    flag_width: usize,
    flag_height: usize,
    flag_max_branch: usize,
    flag_seed: Option<u64>,
    flag_text_out: String,
    flag_show_distances: bool,
    flag_show_path: bool,
    flag_image_out: String,
    flag_cell_pixels: u32,
    flag_wall_pixels: u32,
    flag_save_edges: String,
    flag_frame_ms: f64,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazerunner::errors::Error, ::mazerunner::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let seed = args.flag_seed.unwrap_or_else(rand::random);
    info!("Maze seed {}", seed);
    let mut rng = XorShiftRng::seed_from_u64(seed);

    let topology = args.flag_topology.parse::<Topology>()?;
    let settings = topology.settings(Width(args.flag_width),
                                     Height(args.flag_height),
                                     NonZeroUsize::new(args.flag_max_branch));
    let grid = generate_grid(settings)?;
    let maze = generate_maze(&grid, &mut rng)?;

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze, &args.flag_save_edges)?;
    }

    let path = if args.flag_show_path {
        pathing::solution_path(&maze)
    } else {
        None
    };

    let style = renderers::Style {
        cell_size: args.flag_cell_pixels,
        wall_size: args.flag_wall_pixels,
        ..renderers::Style::default()
    };

    let do_image_render = !args.flag_image_out.is_empty();
    let do_text_render = !args.flag_text_out.is_empty() || (!do_image_render && !args.cmd_play);

    if do_text_render {
        let bodies = if args.flag_show_distances {
            CellBodies::Distances
        } else if let Some(ref path) = path {
            CellBodies::path(path)
        } else {
            CellBodies::StartEnd
        };
        let text = MazeText::new(&maze, bodies).to_string();

        if args.flag_text_out.is_empty() {
            print!("{}", text);
        } else {
            write_text_to_file(&text, &args.flag_text_out)
                .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
        }
    }

    if do_image_render {
        let render_options = renderers::RenderOptionsBuilder::new()
            .style(style)
            .path(path.clone())
            .output_file(Some(Path::new(&args.flag_image_out)))
            .build();
        renderers::render_maze(&maze, &render_options)
            .chain_err(|| format!("Failed to render maze to image file {}", args.flag_image_out))?;
    }

    if args.cmd_play {
        play(&maze, &style, &args.arg_moves, args.flag_frame_ms)?;
    }

    Ok(())
}

/// Replay scripted key holds against a game session and report where the player ended up.
fn play(maze: &Maze, style: &renderers::Style, moves: &str, frame_ms: f64) -> Result<()> {

    let moves = parse_moves(moves)?;
    let canvas = renderers::draw_maze(maze, style, None)?;
    let mut session = GameSession::new(canvas, maze);

    let mut frames_played = 0;
    'moves: for (key, frames) in moves {
        session.key_event(&key, true);
        for _ in 0..frames {
            frames_played += 1;
            if session.update(frame_ms) == GameStatus::Finished {
                break 'moves;
            }
        }
        session.key_event(&key, false);
    }

    let position = session.position();
    if session.is_finished() {
        println!("Finished after {} frames", frames_played);
    } else {
        println!("Still playing after {} frames at ({:.3}, {:.3})",
                 frames_played,
                 position.x,
                 position.y);
    }
    debug!("Final speed {:?}", session.speed());

    Ok(())
}

fn parse_moves(moves: &str) -> Result<Vec<(String, usize)>> {
    moves.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| {
            let mut parts = m.splitn(2, ':');
            let key = parts.next().unwrap_or_default();
            let frames = parts.next().ok_or_else(|| format!("Move '{}' has no frame count", m))?;
            if Key::from_name(key).is_none() {
                bail!("Unknown key '{}' in move '{}'", key, m);
            }
            let frames = frames.parse::<usize>()
                .chain_err(|| format!("Invalid frame count in move '{}'", m))?;
            Ok((key.to_owned(), frames))
        })
        .collect()
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze: &Maze, file_path: &str) -> Result<()> {
    write_text_to_file(&pathing::edge_list(maze), file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;
    Ok(())
}

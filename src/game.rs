//! A headless "walk to the exit" session over a rendered maze.
//!
//! The player is a point moving over the rendered canvas. Walls are found by sampling canvas
//! pixels a short distance away from the player in the four compass directions, and the game is
//! won when one of those samples lands on the end door's colour.
//!
//! A session is created when a game starts and dropped once `update` reports it finished.

use image::RgbImage;
use log::{debug, info};

use crate::maze::Maze;
use crate::utils::{fnv_hashset, FnvHashSet};

/// Diagonal movement splits speed across both axes.
const DIAGONAL_FACTOR: f64 = 0.7071;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tuning {
    /// Fraction of the canvas per second at full input.
    pub movement_speed: f64,
    /// Fraction of the canvas per second the player is pushed back off a wall.
    pub wall_push_speed: f64,
    /// Input units per pixel of pointer drag movement.
    pub gesture_speed: f64,
    /// Cap on the combined input magnitude.
    pub drag_speed_limit: f64,
    /// Speed damping per second.
    pub drag: f64,
    /// Distance in pixels from the player to each wall probe.
    pub probe_offset: i64,
    /// A probe whose channels sum below this is a wall.
    pub wall_threshold: u32,
}

impl Default for Tuning {
    fn default() -> Tuning {
        Tuning {
            movement_speed: 0.2,
            wall_push_speed: 0.1,
            gesture_speed: 0.1,
            drag_speed_limit: 2.5,
            drag: 5.0,
            probe_offset: 10,
            wall_threshold: 20,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// WASD and arrow key names.
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "w" | "ArrowUp" => Some(Key::Up),
            "s" | "ArrowDown" => Some(Key::Down),
            "a" | "ArrowLeft" => Some(Key::Left),
            "d" | "ArrowRight" => Some(Key::Right),
            _ => None,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GameStatus {
    Playing,
    Finished,
}

/// A point in canvas fractions, or a per update displacement in the same units.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default)]
struct InputState {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    dragging: bool,
    horizontal: f64,
    vertical: f64,
}

/// Canvas samples around the player.
#[derive(Debug, Copy, Clone)]
struct Probes {
    right: [u8; 3],
    left: [u8; 3],
    down: [u8; 3],
    up: [u8; 3],
}

impl Probes {
    fn all(&self) -> [[u8; 3]; 4] {
        [self.right, self.left, self.down, self.up]
    }
}

#[derive(Debug)]
pub struct GameSession {
    canvas: RgbImage,
    tuning: Tuning,
    position: Vector2,
    speed: Vector2,
    input: InputState,
    active_keys: FnvHashSet<String>,
    finished: bool,
}

impl GameSession {
    /// Start a game on a canvas the maze was rendered onto, with the player at its start cell.
    pub fn new(canvas: RgbImage, maze: &Maze) -> GameSession {
        GameSession::with_tuning(canvas, maze, Tuning::default())
    }

    pub fn with_tuning(canvas: RgbImage, maze: &Maze, tuning: Tuning) -> GameSession {
        let start = maze.start_cell().position;
        let position = Vector2 {
            x: (start.x as f64 + 0.5) / maze.settings().width() as f64,
            y: (start.y as f64 + 0.5) / maze.settings().height() as f64,
        };
        debug!("Game starts at {:?}", position);

        GameSession {
            canvas,
            tuning,
            position,
            speed: Vector2::default(),
            input: InputState::default(),
            active_keys: fnv_hashset(8),
            finished: false,
        }
    }

    #[inline]
    pub fn position(&self) -> Vector2 {
        self.position
    }

    #[inline]
    pub fn speed(&self) -> Vector2 {
        self.speed
    }

    #[inline]
    pub fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// A key went down or up. Repeats of the current state of a key are ignored.
    pub fn key_event(&mut self, key: &str, pressed: bool) {
        if pressed == self.active_keys.contains(key) {
            return;
        }
        if pressed {
            self.active_keys.insert(key.to_owned());
        } else {
            self.active_keys.remove(key);
        }

        match Key::from_name(key) {
            Some(Key::Right) => self.input.right = pressed,
            Some(Key::Left) => self.input.left = pressed,
            Some(Key::Down) => self.input.down = pressed,
            Some(Key::Up) => self.input.up = pressed,
            None => {}
        }
    }

    pub fn drag_start(&mut self) {
        self.toggle_drag(true);
    }

    pub fn drag_end(&mut self) {
        self.toggle_drag(false);
    }

    /// Pointer moved while dragging. The player moves against the drag, like panning a map.
    pub fn drag_move(&mut self, movement_x: f64, movement_y: f64) {
        if !self.input.dragging {
            return;
        }
        self.input.horizontal = -movement_x * self.tuning.gesture_speed;
        self.input.vertical = -movement_y * self.tuning.gesture_speed;
    }

    fn toggle_drag(&mut self, active: bool) {
        if active == self.input.dragging {
            return;
        }
        self.input.horizontal = 0.0;
        self.input.vertical = 0.0;
        self.input.dragging = active;
    }

    /// Advance the game by `delta_ms` milliseconds.
    pub fn update(&mut self, delta_ms: f64) -> GameStatus {
        if self.check_finish() {
            return GameStatus::Finished;
        }

        self.apply_drag(delta_ms);
        self.update_speed_from_input(delta_ms);
        self.update_speed_from_maze(delta_ms);

        self.position.x = clamp(self.position.x + self.speed.x, 0.0, 1.0);
        self.position.y = clamp(self.position.y + self.speed.y, 0.0, 1.0);

        GameStatus::Playing
    }

    fn check_finish(&mut self) -> bool {
        if self.finished {
            return true;
        }
        let reached_exit = self.probe().all().iter().any(|p| p[0] < 50 && p[1] > 200 && p[2] < 50);
        if reached_exit {
            info!("Maze solved at {:?}", self.position);
            self.finished = true;
        }
        self.finished
    }

    fn apply_drag(&mut self, delta_ms: f64) {
        let damping = 1.0 - self.tuning.drag * delta_ms / 1000.0;
        self.speed.x *= damping;
        self.speed.y *= damping;
    }

    fn update_speed_from_input(&mut self, delta_ms: f64) {
        let input = &mut self.input;
        let mut horizontal = if input.dragging { input.horizontal } else { 0.0 };
        let mut vertical = if input.dragging { input.vertical } else { 0.0 };
        input.horizontal = 0.0;
        input.vertical = 0.0;

        let vertical_held = input.down || input.up;
        let horizontal_held = input.right || input.left;
        let horizontal_step = if vertical_held { DIAGONAL_FACTOR } else { 1.0 };
        let vertical_step = if horizontal_held { DIAGONAL_FACTOR } else { 1.0 };

        if input.right {
            horizontal += horizontal_step;
        }
        if input.left {
            horizontal -= horizontal_step;
        }
        if input.down {
            vertical += vertical_step;
        }
        if input.up {
            vertical -= vertical_step;
        }

        let total = (horizontal * horizontal + vertical * vertical).sqrt();
        if total > self.tuning.drag_speed_limit {
            horizontal /= total / self.tuning.drag_speed_limit;
            vertical /= total / self.tuning.drag_speed_limit;
        }

        let scale = self.tuning.movement_speed * delta_ms / 1000.0;
        if horizontal != 0.0 {
            self.speed.x = horizontal * scale;
        }
        if vertical != 0.0 {
            self.speed.y = vertical * scale;
        }
    }

    fn update_speed_from_maze(&mut self, delta_ms: f64) {
        let probes = self.probe();
        let is_wall = |p: [u8; 3]| {
            (p[0] as u32 + p[1] as u32 + p[2] as u32) < self.tuning.wall_threshold
        };
        let wall_right = is_wall(probes.right);
        let wall_left = is_wall(probes.left);
        let wall_down = is_wall(probes.down);
        let wall_up = is_wall(probes.up);

        if wall_right {
            self.input.right = false;
        }
        if wall_left {
            self.input.left = false;
        }
        if wall_down {
            self.input.down = false;
        }
        if wall_up {
            self.input.up = false;
        }
        if wall_right || wall_left || wall_down || wall_up {
            self.input.dragging = false;
        }

        let horizontal = if wall_right { -1.0 } else if wall_left { 1.0 } else { 0.0 };
        let vertical = if wall_down { -1.0 } else if wall_up { 1.0 } else { 0.0 };
        let axis_speed = if horizontal != 0.0 && vertical != 0.0 {
            DIAGONAL_FACTOR * self.tuning.wall_push_speed
        } else {
            self.tuning.wall_push_speed
        };

        let scale = axis_speed * delta_ms / 1000.0;
        if horizontal != 0.0 {
            self.speed.x = horizontal * scale;
        }
        if vertical != 0.0 {
            self.speed.y = vertical * scale;
        }
    }

    fn probe(&self) -> Probes {
        let x = (self.position.x * self.canvas.width() as f64).floor() as i64;
        let y = (self.position.y * self.canvas.height() as f64).floor() as i64;
        let offset = self.tuning.probe_offset;

        Probes {
            right: self.sample(x + offset, y),
            left: self.sample(x - offset, y),
            down: self.sample(x, y + offset),
            up: self.sample(x, y - offset),
        }
    }

    /// Pixels off the canvas read as black.
    fn sample(&self, x: i64, y: i64) -> [u8; 3] {
        let inside = x >= 0 && y >= 0 && (x as u64) < self.canvas.width() as u64 &&
                     (y as u64) < self.canvas.height() as u64;
        if inside {
            self.canvas.get_pixel(x as u32, y as u32).0
        } else {
            [0, 0, 0]
        }
    }
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

#[cfg(test)]
mod tests {

    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::generators::generate_maze;
    use crate::grid::{generate_grid, GridSettings};
    use crate::renderers::{draw_maze, Style};
    use crate::units::{Height, Width};

    const FRAME_MS: f64 = 16.0;

    fn session(w: usize, h: usize, seed: u64) -> (GameSession, Maze) {
        let g = generate_grid(GridSettings::rectangle(Width(w), Height(h))).unwrap();
        let maze = generate_maze(&g, &mut XorShiftRng::seed_from_u64(seed)).unwrap();
        let canvas = draw_maze(&maze, &Style::default(), None).unwrap();
        (GameSession::new(canvas, &maze), maze)
    }

    #[test]
    fn starts_in_start_cell() {
        let (game, maze) = session(4, 2, 5);
        let start = maze.start_cell().position;
        let pos = game.position();
        assert_eq!(pos.x, (start.x as f64 + 0.5) / 4.0);
        assert_eq!(pos.y, (start.y as f64 + 0.5) / 2.0);
        assert!(!game.is_finished());
    }

    #[test]
    fn key_names() {
        assert_eq!(Key::from_name("w"), Some(Key::Up));
        assert_eq!(Key::from_name("ArrowDown"), Some(Key::Down));
        assert_eq!(Key::from_name("a"), Some(Key::Left));
        assert_eq!(Key::from_name("ArrowRight"), Some(Key::Right));
        assert_eq!(Key::from_name("q"), None);
    }

    #[test]
    fn repeated_key_events_are_ignored() {
        let (mut game, _) = session(1, 1, 0);
        game.key_event("d", true);
        game.key_event("ArrowRight", true);
        game.key_event("d", true);
        game.key_event("d", false);
        // ArrowRight is still down but shares the flag, which the release of "d" cleared
        assert!(!game.input.right);
        game.key_event("ArrowRight", false);
        game.key_event("ArrowRight", true);
        assert!(game.input.right);
    }

    #[test]
    fn no_input_no_movement() {
        let (mut game, _) = session(1, 1, 0);
        let before = game.position();
        for _ in 0..10 {
            assert_eq!(game.update(FRAME_MS), GameStatus::Playing);
        }
        assert_eq!(game.position(), before);
    }

    #[test]
    fn moves_with_held_key() {
        let (mut game, _) = session(1, 1, 0);
        let before = game.position();
        game.key_event("s", true);
        game.update(FRAME_MS);
        let after = game.position();
        assert_eq!(after.x, before.x);
        assert!(after.y > before.y);
    }

    #[test]
    fn walls_push_back() {
        // A single cell canvas is 40x40 with the only door on the west wall.
        let (mut game, _) = session(1, 1, 0);
        game.key_event("w", true);
        for _ in 0..300 {
            assert_eq!(game.update(FRAME_MS), GameStatus::Playing);
        }
        let y_pixels = game.position().y * game.canvas().height() as f64;
        assert!(y_pixels >= 13.0, "walked into the wall at {}", y_pixels);
        assert!(!game.input.up);
    }

    #[test]
    fn reaching_the_exit_finishes() {
        let (mut game, _) = session(1, 1, 0);
        game.key_event("a", true);
        let mut status = GameStatus::Playing;
        for _ in 0..200 {
            status = game.update(FRAME_MS);
            if status == GameStatus::Finished {
                break;
            }
        }
        assert_eq!(status, GameStatus::Finished);
        assert!(game.is_finished());
        let at_finish = game.position();
        assert_eq!(game.update(FRAME_MS), GameStatus::Finished);
        assert_eq!(game.position(), at_finish);
    }

    #[test]
    fn drag_moves_against_pointer() {
        let (mut game, _) = session(1, 1, 0);
        let before = game.position();
        game.drag_move(-10.0, 0.0);
        game.update(FRAME_MS);
        assert_eq!(game.position(), before);

        game.drag_start();
        game.drag_move(-10.0, 0.0);
        game.update(FRAME_MS);
        assert!(game.position().x > before.x);
        game.drag_end();
        assert!(!game.input.dragging);
    }

    #[test]
    fn input_magnitude_is_capped() {
        let (mut game, _) = session(1, 1, 0);
        game.drag_start();
        game.drag_move(-1000.0, 0.0);
        game.update(FRAME_MS);
        let expected = 2.5 * 0.2 * FRAME_MS / 1000.0;
        assert!((game.speed().x - expected).abs() < 1e-12);
    }

    #[test]
    fn off_canvas_samples_are_black() {
        let (game, _) = session(1, 1, 0);
        assert_eq!(game.sample(-1, 0), [0, 0, 0]);
        assert_eq!(game.sample(0, 1000), [0, 0, 0]);
        assert_eq!(game.sample(20, 20), [0xff, 0xff, 0xff]);
    }
}

/// Game entity types: plain data plus their per-type update and render
/// behaviour.

use std::io;

use crate::config::GameConfig;
use crate::render::{Renderer, Sprite};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Top-left corner in playfield pixels; y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle used for hit tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Strict point-in-rectangle: points on an edge are outside.
    pub fn contains_strict(&self, p: Position) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }

    /// Open-rectangle overlap; rectangles that only touch do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub pos: Position,
    /// Downward drift in px/ms.
    pub speed: f64,
    pub width: f64,
    pub height: f64,
}

impl Enemy {
    /// A fresh enemy sitting just above the top edge of `lane`.
    pub fn spawn(lane: usize, speed: f64, config: &GameConfig) -> Self {
        Self {
            pos: Position::new(lane as f64 * config.enemy_width, -config.enemy_height),
            speed,
            width: config.enemy_width,
            height: config.enemy_height,
        }
    }

    pub fn update(&mut self, dt: f64) {
        self.pos.y += dt * self.speed;
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.pos.x,
            y: self.pos.y,
            width: self.width,
            height: self.height,
        }
    }

    /// The area covered while drifting down from `from_y` to the current y.
    pub fn path_since(&self, from_y: f64) -> Rect {
        let top = from_y.min(self.pos.y);
        Rect {
            x: self.pos.x,
            y: top,
            width: self.width,
            height: (self.pos.y - from_y).abs() + self.height,
        }
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> io::Result<()> {
        renderer.draw_sprite(Sprite::Enemy, self.pos.x, self.pos.y)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Position,
    pub width: f64,
    pub height: f64,
}

impl Player {
    /// Player on its fixed row, in the lane nearest the playfield centre.
    pub fn new(config: &GameConfig) -> Self {
        let lanes = (config.screen_width / config.player_width).floor().max(1.0);
        let x = ((lanes / 2.0).floor() * config.player_width).min(config.player_max_x());
        Self {
            pos: Position::new(x.max(0.0), config.player_y()),
            width: config.player_width,
            height: config.player_height,
        }
    }

    /// Move one sprite-width in `direction`, never leaving the playfield.
    pub fn step(&mut self, direction: Direction, config: &GameConfig) {
        let max_x = config.player_max_x();
        match direction {
            Direction::Left if self.pos.x > 0.0 => {
                self.pos.x = (self.pos.x - self.width).max(0.0);
            }
            Direction::Right if self.pos.x < max_x => {
                self.pos.x = (self.pos.x + self.width).min(max_x);
            }
            _ => {}
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.pos.x,
            y: self.pos.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> io::Result<()> {
        renderer.draw_sprite(Sprite::Player, self.pos.x, self.pos.y)
    }
}

// ── Projectile ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub pos: Position,
    /// Vertical speed in px/ms; negative means upward.
    pub speed: f64,
    pub width: f64,
    pub height: f64,
    pub on_screen: bool,
}

impl Projectile {
    /// A projectile parked off-screen, ready to be fired.
    pub fn parked(config: &GameConfig) -> Self {
        Self {
            pos: Self::park_position(config.projectile_width, config.projectile_height),
            speed: config.projectile_speed,
            width: config.projectile_width,
            height: config.projectile_height,
            on_screen: false,
        }
    }

    fn park_position(width: f64, height: f64) -> Position {
        Position::new(-width, -height)
    }

    /// Put the projectile back into its off-screen parking spot.
    pub fn recycle(&mut self) {
        self.pos = Self::park_position(self.width, self.height);
        self.on_screen = false;
    }

    /// Bring the projectile on-screen at `at`.
    pub fn launch(&mut self, at: Position) {
        self.pos = at;
        self.on_screen = true;
    }

    /// Move while on-screen; a move that would reach the top threshold
    /// recycles the projectile instead.
    pub fn update(&mut self, dt: f64) {
        if !self.on_screen {
            return;
        }
        let next = self.pos.y + dt * self.speed;
        if next <= -self.height {
            self.recycle();
        } else {
            self.pos.y = next;
        }
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> io::Result<()> {
        if !self.on_screen {
            return Ok(());
        }
        renderer.draw_sprite(Sprite::Projectile, self.pos.x, self.pos.y)
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can return a
/// new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    /// One slot per lane; `None` marks an empty lane.
    pub enemies: Vec<Option<Enemy>>,
    pub projectile: Projectile,
    pub score: u64,
    /// Total simulated milliseconds.
    pub elapsed_ms: u64,
    pub status: GameStatus,
}

impl GameState {
    pub fn enemy_count(&self) -> usize {
        self.enemies.iter().filter(|slot| slot.is_some()).count()
    }

    /// Present enemies with their lane index.
    pub fn live_enemies(&self) -> impl Iterator<Item = (usize, &Enemy)> {
        self.enemies
            .iter()
            .enumerate()
            .filter_map(|(lane, slot)| slot.as_ref().map(|e| (lane, e)))
    }

    pub fn empty_lanes(&self) -> Vec<usize> {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(lane, _)| lane)
            .collect()
    }
}

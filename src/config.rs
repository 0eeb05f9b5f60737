/// Named game constants, handed to the engine at construction.
///
/// Every field has a compiled-in default; a TOML file may override any
/// subset of them.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: f64 = 505.0;
pub const SCREEN_HEIGHT: f64 = 606.0;

pub const ENEMY_WIDTH: f64 = 101.0;
pub const ENEMY_HEIGHT: f64 = 77.0;
/// Enemy speeds are drawn from `[ENEMY_SPEED_MIN, ENEMY_SPEED_MAX)` px/ms.
pub const ENEMY_SPEED_MIN: f64 = 0.25;
pub const ENEMY_SPEED_MAX: f64 = 0.75;
pub const MAX_ENEMIES: usize = 3;

pub const PLAYER_WIDTH: f64 = 101.0;
pub const PLAYER_HEIGHT: f64 = 90.0;

pub const PROJECTILE_WIDTH: f64 = 75.0;
pub const PROJECTILE_HEIGHT: f64 = 40.0;
/// Negative: projectiles travel up.
pub const PROJECTILE_SPEED: f64 = -0.5;
/// Horizontal offset from the player's x at which a projectile spawns.
pub const FIRE_OFFSET_X: f64 = 13.0;

pub const KILL_SCORE: u64 = 1000;
pub const FRAME_RATE: u32 = 60;

// ── Config ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f64,
    pub screen_height: f64,
    pub enemy_width: f64,
    pub enemy_height: f64,
    pub enemy_speed_min: f64,
    pub enemy_speed_max: f64,
    pub max_enemies: usize,
    pub player_width: f64,
    pub player_height: f64,
    pub projectile_width: f64,
    pub projectile_height: f64,
    pub projectile_speed: f64,
    pub fire_offset_x: f64,
    pub kill_score: u64,
    /// Target ticks per second for the scheduler.
    pub frame_rate: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            enemy_width: ENEMY_WIDTH,
            enemy_height: ENEMY_HEIGHT,
            enemy_speed_min: ENEMY_SPEED_MIN,
            enemy_speed_max: ENEMY_SPEED_MAX,
            max_enemies: MAX_ENEMIES,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            projectile_width: PROJECTILE_WIDTH,
            projectile_height: PROJECTILE_HEIGHT,
            projectile_speed: PROJECTILE_SPEED,
            fire_offset_x: FIRE_OFFSET_X,
            kill_score: KILL_SCORE,
            frame_rate: FRAME_RATE,
        }
    }
}

impl GameConfig {
    /// Number of enemy lanes across the playfield.
    pub fn lane_count(&self) -> usize {
        (self.screen_width / self.enemy_width).floor().max(0.0) as usize
    }

    /// Fixed row the player lives on.
    pub fn player_y(&self) -> f64 {
        self.screen_height - self.player_height
    }

    /// Right-most x the player may occupy.
    pub fn player_max_x(&self) -> f64 {
        self.screen_width - self.player_width
    }

    /// Milliseconds between scheduled ticks.
    pub fn frame_millis(&self) -> u64 {
        1000 / u64::from(self.frame_rate.max(1))
    }

    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("projectile_width", self.projectile_width),
            ("projectile_height", self.projectile_height),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                bail!("{name} must be a positive number, got {value}");
            }
        }

        if self.max_enemies == 0 {
            bail!("max_enemies must be at least 1");
        }
        if self.lane_count() < self.max_enemies {
            bail!(
                "playfield has {} lanes but max_enemies is {}",
                self.lane_count(),
                self.max_enemies
            );
        }
        if self.player_width > self.screen_width || self.player_height > self.screen_height {
            bail!("player sprite does not fit on the playfield");
        }
        if !(self.enemy_speed_min >= 0.0
            && self.enemy_speed_min < self.enemy_speed_max
            && self.enemy_speed_max.is_finite())
        {
            bail!(
                "enemy speed range [{}, {}) is empty, negative or unbounded",
                self.enemy_speed_min,
                self.enemy_speed_max
            );
        }
        if !(self.projectile_speed.is_finite() && self.projectile_speed < 0.0) {
            bail!("projectile_speed must be negative, got {}", self.projectile_speed);
        }
        if !self.fire_offset_x.is_finite() {
            bail!("fire_offset_x must be finite, got {}", self.fire_offset_x);
        }
        if self.frame_rate == 0 {
            bail!("frame_rate must be at least 1");
        }
        Ok(())
    }

    /// Parse a TOML document; missing fields keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(text).context("Failed to parse game config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Resolve the config: an explicit path must exist; otherwise the user
    /// config file is used when present, falling back to defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// `<config_dir>/lane_shooter/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lane_shooter").join("config.toml"))
}

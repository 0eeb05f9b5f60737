/// The game engine: exclusive owner of the `GameState`.
///
/// Input handlers mutate the state between ticks; `tick` runs one complete
/// update → render → collide → refill → game-over cycle.  Once the game is
/// over the engine is inert until `restart`.

use std::io;

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info, trace};

use crate::compute::{self, Sweep};
use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus};
use crate::render::{Renderer, Sprite, TextStyle};

/// What happened during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub kills: u32,
    pub escaped: u32,
    pub status: GameStatus,
}

#[derive(Debug)]
pub struct Engine {
    config: GameConfig,
    state: GameState,
}

impl Engine {
    /// Validate `config` and build a fresh game.
    pub fn new(config: GameConfig, rng: &mut impl Rng) -> Result<Self> {
        config.validate()?;
        let state = compute::init_state(&config, rng);
        info!(
            lanes = config.lane_count(),
            max_enemies = config.max_enemies,
            "engine started"
        );
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios.
    #[doc(hidden)]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    // ── Input handlers ───────────────────────────────────────────────────────

    pub fn on_move_left(&mut self) {
        self.state = compute::move_player_left(&self.state, &self.config);
    }

    pub fn on_move_right(&mut self) {
        self.state = compute::move_player_right(&self.state, &self.config);
    }

    /// Returns whether a projectile was actually fired.
    pub fn on_fire(&mut self) -> bool {
        let fired_before = self.state.projectile.on_screen;
        self.state = compute::player_shoot(&self.state, &self.config);
        let fired = !fired_before && self.state.projectile.on_screen;
        if fired {
            debug!(x = self.state.projectile.pos.x, "projectile fired");
        }
        fired
    }

    /// Throw away the current game and start over with the same config.
    pub fn restart(&mut self, rng: &mut impl Rng) {
        info!(final_score = self.state.score, "restarting");
        self.state = compute::init_state(&self.config, rng);
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    /// Advance the game by `dt_ms` milliseconds and draw the frame.
    pub fn tick<R: Renderer>(
        &mut self,
        dt_ms: u64,
        rng: &mut impl Rng,
        renderer: &mut R,
    ) -> io::Result<TickReport> {
        if self.state.status == GameStatus::GameOver {
            return Ok(TickReport {
                kills: 0,
                escaped: 0,
                status: GameStatus::GameOver,
            });
        }
        trace!(dt_ms, "tick");

        // ── 1–2. Score and motion ─────────────────────────────────────────────
        self.state = compute::advance(&self.state, dt_ms);

        // ── 3. Frame, back to front ───────────────────────────────────────────
        self.render(renderer)?;

        // ── 4–6. Sweep, refill, game over ─────────────────────────────────────
        let Sweep {
            state,
            kills,
            escaped,
        } = compute::resolve(&self.state, &self.config, rng);
        self.state = state;

        if self.state.status == GameStatus::GameOver {
            info!(score = self.state.score, elapsed_ms = self.state.elapsed_ms, "game over");
            self.draw_game_over(renderer)?;
        } else {
            self.draw_score(renderer)?;
        }

        Ok(TickReport {
            kills,
            escaped,
            status: self.state.status,
        })
    }

    /// Draw the current frame again without advancing time, e.g. after the
    /// terminal was resized.  A finished game gets its overlay back.
    pub fn redraw<R: Renderer>(&self, renderer: &mut R) -> io::Result<()> {
        self.render(renderer)?;
        if self.state.status == GameStatus::GameOver {
            self.draw_game_over(renderer)
        } else {
            self.draw_score(renderer)
        }
    }

    fn render<R: Renderer>(&self, renderer: &mut R) -> io::Result<()> {
        renderer.draw_sprite(Sprite::Background, 0.0, 0.0)?;
        for (_, enemy) in self.state.live_enemies() {
            enemy.render(renderer)?;
        }
        self.state.player.render(renderer)?;
        self.state.projectile.render(renderer)
    }

    fn draw_score<R: Renderer>(&self, renderer: &mut R) -> io::Result<()> {
        renderer.draw_text(
            &format!("Score: {}", self.state.score),
            4.0,
            4.0,
            TextStyle::Hud,
        )
    }

    fn draw_game_over<R: Renderer>(&self, renderer: &mut R) -> io::Result<()> {
        let cx = self.config.screen_width / 2.0;
        let cy = self.config.screen_height / 2.0;
        renderer.draw_text("GAME OVER", cx, cy, TextStyle::Banner)?;
        renderer.draw_text(
            &format!("Final Score: {}", self.state.score),
            cx,
            cy + self.config.enemy_height / 2.0,
            TextStyle::Banner,
        )
    }
}

/// Pure game-logic functions.
///
/// Every state transition takes an immutable reference to the current
/// `GameState` (plus the `GameConfig` and, where needed, an RNG handle) and
/// returns a brand-new `GameState`.  Side effects are limited to the injected
/// RNG.  A full tick is split in two halves, `advance` and `resolve`, because
/// the frame is rendered between them.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::entities::{Direction, Enemy, GameState, GameStatus, Player, Position, Projectile};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state: player centred, projectile parked and every
/// enemy slot filled up to the cap.
pub fn init_state(config: &GameConfig, rng: &mut impl Rng) -> GameState {
    let empty = GameState {
        player: Player::new(config),
        enemies: vec![None; config.lane_count()],
        projectile: Projectile::parked(config),
        score: 0,
        elapsed_ms: 0,
        status: GameStatus::Playing,
    };
    refill_enemies(&empty, config, rng)
}

// ── Enemy lanes ──────────────────────────────────────────────────────────────

/// Choose uniformly among the currently empty lanes.
pub fn pick_empty_lane(state: &GameState, rng: &mut impl Rng) -> Option<usize> {
    state.empty_lanes().choose(rng).copied()
}

/// Spawn one enemy in a random empty lane.  With no empty lane the state is
/// returned unchanged.
pub fn spawn_enemy(state: &GameState, config: &GameConfig, rng: &mut impl Rng) -> GameState {
    let Some(lane) = pick_empty_lane(state, rng) else {
        return state.clone();
    };
    let speed = rng.gen_range(config.enemy_speed_min..config.enemy_speed_max);
    debug!(lane, speed, "enemy spawned");

    let mut enemies = state.enemies.clone();
    enemies[lane] = Some(Enemy::spawn(lane, speed, config));
    GameState {
        enemies,
        ..state.clone()
    }
}

/// Spawn enemies until the occupied slot count reaches `max_enemies`.
pub fn refill_enemies(state: &GameState, config: &GameConfig, rng: &mut impl Rng) -> GameState {
    let missing = config.max_enemies.saturating_sub(state.enemy_count());
    (0..missing).fold(state.clone(), |s, _| spawn_enemy(&s, config, rng))
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player(state: &GameState, direction: Direction, config: &GameConfig) -> GameState {
    if state.status == GameStatus::GameOver {
        return state.clone();
    }
    let mut player = state.player.clone();
    player.step(direction, config);
    GameState {
        player,
        ..state.clone()
    }
}

pub fn move_player_left(state: &GameState, config: &GameConfig) -> GameState {
    move_player(state, Direction::Left, config)
}

pub fn move_player_right(state: &GameState, config: &GameConfig) -> GameState {
    move_player(state, Direction::Right, config)
}

/// Fire the projectile from the player, unless it is already on-screen.
pub fn player_shoot(state: &GameState, config: &GameConfig) -> GameState {
    if state.projectile.on_screen || state.status == GameStatus::GameOver {
        return state.clone();
    }
    let mut projectile = state.projectile.clone();
    projectile.launch(Position::new(
        state.player.pos.x + config.fire_offset_x,
        state.player.pos.y,
    ));
    GameState {
        projectile,
        ..state.clone()
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// First half of a tick: accrue time score and move everything.
///
/// An enemy whose path this tick crossed the player ends the game here,
/// before the sweep can retire it as an escape, so a long frame cannot carry
/// an enemy clean through the player's row.
pub fn advance(state: &GameState, dt_ms: u64) -> GameState {
    let dt = dt_ms as f64;
    let player = state.player.rect();
    let mut struck = false;

    let enemies = state
        .enemies
        .iter()
        .map(|slot| {
            slot.clone().map(|mut e| {
                let from_y = e.pos.y;
                e.update(dt);
                struck |= e.path_since(from_y).overlaps(&player);
                e
            })
        })
        .collect();

    let mut projectile = state.projectile.clone();
    projectile.update(dt);

    let status = if struck {
        debug!("enemy ran into the player");
        GameStatus::GameOver
    } else {
        state.status
    };

    GameState {
        enemies,
        projectile,
        score: state.score.saturating_add(dt_ms),
        elapsed_ms: state.elapsed_ms.saturating_add(dt_ms),
        status,
        ..state.clone()
    }
}

/// Result of the enemy sweep.
#[derive(Clone, Debug)]
pub struct Sweep {
    pub state: GameState,
    pub kills: u32,
    pub escaped: u32,
}

/// Remove escaped enemies and resolve projectile hits.
///
/// An enemy below the bottom edge is removed without being hit-tested.  Hit
/// tests use the projectile's top-left corner against each enemy rectangle;
/// every enemy containing that point dies in the same sweep.
pub fn sweep(state: &GameState, config: &GameConfig) -> Sweep {
    let shot = state.projectile.on_screen.then_some(state.projectile.pos);
    let mut enemies = state.enemies.clone();
    let mut kills = 0;
    let mut escaped = 0;

    for (lane, slot) in enemies.iter_mut().enumerate() {
        let Some(enemy) = slot.as_ref() else { continue };

        if enemy.pos.y > config.screen_height {
            debug!(lane, "enemy escaped past the bottom");
            *slot = None;
            escaped += 1;
            continue;
        }

        if shot.is_some_and(|p| enemy.rect().contains_strict(p)) {
            debug!(lane, "enemy destroyed");
            *slot = None;
            kills += 1;
        }
    }

    let mut projectile = state.projectile.clone();
    if kills > 0 {
        projectile.recycle();
    }

    Sweep {
        state: GameState {
            enemies,
            projectile,
            score: state
                .score
                .saturating_add(u64::from(kills).saturating_mul(config.kill_score)),
            ..state.clone()
        },
        kills,
        escaped,
    }
}

/// The player dies when any enemy rectangle overlaps the player's.
pub fn player_is_dead(state: &GameState) -> bool {
    let player = state.player.rect();
    state.live_enemies().any(|(_, e)| e.rect().overlaps(&player))
}

/// Second half of a tick: sweep, refill, then check for game over.  A game
/// already lost during `advance` stays lost.
pub fn resolve(state: &GameState, config: &GameConfig, rng: &mut impl Rng) -> Sweep {
    let Sweep {
        state,
        kills,
        escaped,
    } = sweep(state, config);
    let state = refill_enemies(&state, config, rng);

    let status = if player_is_dead(&state) {
        GameStatus::GameOver
    } else {
        state.status
    };

    Sweep {
        state: GameState { status, ..state },
        kills,
        escaped,
    }
}

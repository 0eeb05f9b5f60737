use std::io;

use lane_shooter::config::GameConfig;
use lane_shooter::engine::Engine;
use lane_shooter::entities::{Enemy, GameStatus, Position};
use lane_shooter::render::{Renderer, Sprite, TextStyle};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Sprite(Sprite, f64, f64),
    Text(String, TextStyle),
}

/// Records every draw call of a frame.
#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Recorder {
    fn sprites(&self) -> Vec<Sprite> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Sprite(s, _, _) => Some(*s),
                Call::Text(..) => None,
            })
            .collect()
    }

    fn texts(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Text(t, _) => Some(t.clone()),
                Call::Sprite(..) => None,
            })
            .collect()
    }
}

impl Renderer for Recorder {
    fn draw_sprite(&mut self, sprite: Sprite, x: f64, y: f64) -> io::Result<()> {
        self.calls.push(Call::Sprite(sprite, x, y));
        Ok(())
    }

    fn draw_text(&mut self, text: &str, _x: f64, _y: f64, style: TextStyle) -> io::Result<()> {
        self.calls.push(Call::Text(text.to_string(), style));
        Ok(())
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn make_engine(rng: &mut StdRng) -> Engine {
    Engine::new(GameConfig::default(), rng).unwrap()
}

/// Replace all enemies with a single motionless one.
fn place_only_enemy(engine: &mut Engine, lane: usize, y: f64) {
    let config = engine.config().clone();
    let state = engine.state_mut();
    for slot in state.enemies.iter_mut() {
        *slot = None;
    }
    let mut enemy = Enemy::spawn(lane, 0.0, &config);
    enemy.pos.y = y;
    state.enemies[lane] = Some(enemy);
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn fresh_engine_has_three_enemies_at_top() {
    let mut rng = seeded_rng();
    let engine = make_engine(&mut rng);
    let state = engine.state();
    assert_eq!(engine.status(), GameStatus::Playing);
    assert_eq!(state.enemy_count(), 3);
    for (lane, e) in state.live_enemies() {
        assert_eq!(e.pos, Position::new(lane as f64 * 101.0, -77.0));
    }
}

#[test]
fn engine_rejects_invalid_config() {
    let config = GameConfig {
        max_enemies: 9,
        ..GameConfig::default()
    };
    assert!(Engine::new(config, &mut seeded_rng()).is_err());
}

// ── Input handlers ────────────────────────────────────────────────────────────

#[test]
fn fire_once_then_rejected() {
    let mut rng = seeded_rng();
    let mut engine = make_engine(&mut rng);
    assert!(engine.on_fire());
    let p = engine.state().projectile.clone();
    assert!(p.on_screen);
    assert_eq!(p.pos, Position::new(202.0 + 13.0, 606.0 - 90.0));

    assert!(!engine.on_fire());
    assert_eq!(engine.state().projectile, p);
}

#[test]
fn movement_stays_within_bounds() {
    let mut rng = seeded_rng();
    let mut engine = make_engine(&mut rng);
    let max_x = engine.config().player_max_x();
    for i in 0..200 {
        if rng.gen_bool(0.5) {
            engine.on_move_left();
        } else {
            engine.on_move_right();
        }
        let x = engine.state().player.pos.x;
        assert!((0.0..=max_x).contains(&x), "step {i}: x = {x}");
    }
}

// ── Tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_draws_back_to_front_then_score() {
    let mut rng = seeded_rng();
    let mut engine = make_engine(&mut rng);
    engine.on_fire();
    let mut r = Recorder::default();
    engine.tick(16, &mut rng, &mut r).unwrap();

    assert_eq!(
        r.sprites(),
        vec![
            Sprite::Background,
            Sprite::Enemy,
            Sprite::Enemy,
            Sprite::Enemy,
            Sprite::Player,
            Sprite::Projectile,
        ]
    );
    assert_eq!(r.texts(), vec!["Score: 16".to_string()]);
    assert!(matches!(r.calls.last(), Some(Call::Text(_, TextStyle::Hud))));
}

#[test]
fn tick_skips_parked_projectile() {
    let mut rng = seeded_rng();
    let mut engine = make_engine(&mut rng);
    let mut r = Recorder::default();
    engine.tick(16, &mut rng, &mut r).unwrap();
    assert!(!r.sprites().contains(&Sprite::Projectile));
}

#[test]
fn tick_hit_adds_exactly_kill_score() {
    let mut rng = seeded_rng();
    let mut engine = make_engine(&mut rng);
    place_only_enemy(&mut engine, 2, 300.0);
    engine.state_mut().projectile.launch(Position::new(215.0, 350.0));
    let before = engine.score();

    let report = engine.tick(10, &mut rng, &mut Recorder::default()).unwrap();
    assert_eq!(report.kills, 1);
    assert_eq!(engine.score(), before + 10 + 1000);
    assert!(!engine.state().projectile.on_screen);
    assert_eq!(engine.state().enemy_count(), 3);
}

#[test]
fn tick_escape_is_free_and_refilled() {
    let mut rng = seeded_rng();
    let mut engine = make_engine(&mut rng);
    place_only_enemy(&mut engine, 0, 607.0);
    let before = engine.score();

    let report = engine.tick(5, &mut rng, &mut Recorder::default()).unwrap();
    assert_eq!(report.escaped, 1);
    assert_eq!(report.kills, 0);
    assert_eq!(engine.score(), before + 5);
    assert_eq!(engine.state().enemy_count(), 3);
    assert!(engine
        .state()
        .live_enemies()
        .all(|(_, e)| e.pos.y == -77.0));
}

#[test]
fn tick_frame_shows_positions_before_collision() {
    let mut rng = seeded_rng();
    let mut engine = make_engine(&mut rng);
    place_only_enemy(&mut engine, 2, 300.0);
    engine.state_mut().projectile.launch(Position::new(215.0, 350.0));
    let mut r = Recorder::default();
    engine.tick(0, &mut rng, &mut r).unwrap();
    // The enemy that dies this tick is still on the frame
    assert!(r.calls.contains(&Call::Sprite(Sprite::Enemy, 202.0, 300.0)));
    assert!(r.calls.contains(&Call::Sprite(Sprite::Projectile, 215.0, 350.0)));
}

#[test]
fn game_over_draws_overlay_and_is_absorbing() {
    let mut rng = seeded_rng();
    let mut engine = make_engine(&mut rng);
    // Lane 2 is the player's lane; overlap the player's row
    place_only_enemy(&mut engine, 2, 500.0);

    let mut r = Recorder::default();
    let report = engine.tick(16, &mut rng, &mut r).unwrap();
    assert_eq!(report.status, GameStatus::GameOver);
    assert_eq!(engine.status(), GameStatus::GameOver);
    let texts = r.texts();
    assert_eq!(texts[0], "GAME OVER");
    assert!(!texts.iter().any(|t| t.starts_with("Score:")));
    assert!(matches!(r.calls.last(), Some(Call::Text(_, TextStyle::Banner))));

    let frozen = engine.state().clone();
    let mut r2 = Recorder::default();
    let report = engine.tick(16, &mut rng, &mut r2).unwrap();
    assert_eq!(report.status, GameStatus::GameOver);
    assert!(r2.calls.is_empty());
    assert_eq!(engine.state(), &frozen);

    // Input is ignored too
    engine.on_move_left();
    assert!(!engine.on_fire());
    assert_eq!(engine.state(), &frozen);
}

#[test]
fn long_frame_cannot_skip_enemy_past_player() {
    let mut rng = seeded_rng();
    let mut engine = make_engine(&mut rng);
    place_only_enemy(&mut engine, 2, 400.0);
    if let Some(e) = engine.state_mut().enemies[2].as_mut() {
        e.speed = 0.75;
    }

    let report = engine.tick(300, &mut rng, &mut Recorder::default()).unwrap();
    assert_eq!(report.status, GameStatus::GameOver);
    assert_eq!(engine.status(), GameStatus::GameOver);
}

#[test]
fn redraw_repaints_game_over_overlay() {
    let mut rng = seeded_rng();
    let mut engine = make_engine(&mut rng);
    place_only_enemy(&mut engine, 2, 500.0);
    engine.tick(16, &mut rng, &mut Recorder::default()).unwrap();
    let frozen = engine.state().clone();

    let mut r = Recorder::default();
    engine.redraw(&mut r).unwrap();
    assert_eq!(r.sprites()[0], Sprite::Background);
    assert!(r.sprites().contains(&Sprite::Player));
    assert_eq!(r.texts(), vec!["GAME OVER".to_string(), "Final Score: 16".to_string()]);
    assert_eq!(engine.state(), &frozen);
}

#[test]
fn redraw_while_playing_shows_score() {
    let mut rng = seeded_rng();
    let engine = make_engine(&mut rng);
    let mut r = Recorder::default();
    engine.redraw(&mut r).unwrap();
    assert_eq!(r.texts(), vec!["Score: 0".to_string()]);
}

#[test]
fn restart_after_game_over() {
    let mut rng = seeded_rng();
    let mut engine = make_engine(&mut rng);
    place_only_enemy(&mut engine, 2, 500.0);
    engine.tick(16, &mut rng, &mut Recorder::default()).unwrap();
    assert_eq!(engine.status(), GameStatus::GameOver);

    engine.restart(&mut rng);
    assert_eq!(engine.status(), GameStatus::Playing);
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.state().enemy_count(), 3);
}

// ── Properties over a long random run ────────────────────────────────────────

#[test]
fn random_run_keeps_invariants() {
    let mut rng = seeded_rng();
    let mut engine = make_engine(&mut rng);
    let max_x = engine.config().player_max_x();
    let proj_h = engine.config().projectile_height;

    for _ in 0..2_000 {
        match rng.gen_range(0..4) {
            0 => engine.on_move_left(),
            1 => engine.on_move_right(),
            2 => {
                engine.on_fire();
            }
            _ => {}
        }

        let dt = rng.gen_range(0..40);
        let before = engine.score();
        let report = engine.tick(dt, &mut rng, &mut Recorder::default()).unwrap();
        let state = engine.state();

        assert_eq!(state.score, before + dt + 1000 * u64::from(report.kills));
        assert_eq!(state.enemy_count(), 3);
        assert!((0.0..=max_x).contains(&state.player.pos.x));
        if state.projectile.on_screen {
            assert!(state.projectile.pos.y > -proj_h);
        }

        if report.status == GameStatus::GameOver {
            engine.restart(&mut rng);
        }
    }
}

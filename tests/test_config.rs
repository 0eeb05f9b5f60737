use std::io::Write;

use lane_shooter::config::*;

#[test]
fn defaults_are_valid() {
    let c = GameConfig::default();
    c.validate().unwrap();
    assert_eq!(c.lane_count(), 5);
    assert_eq!(c.max_enemies, 3);
    assert_eq!(c.player_y(), 516.0);
    assert_eq!(c.player_max_x(), 404.0);
    assert_eq!(c.frame_millis(), 16);
}

#[test]
fn partial_toml_keeps_defaults() {
    let c = GameConfig::from_toml_str("max_enemies = 4\nframe_rate = 30\n").unwrap();
    assert_eq!(c.max_enemies, 4);
    assert_eq!(c.frame_rate, 30);
    assert_eq!(c.screen_width, SCREEN_WIDTH);
    assert_eq!(c.kill_score, KILL_SCORE);
}

#[test]
fn empty_toml_is_default() {
    assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
}

#[test]
fn rejects_more_enemies_than_lanes() {
    let err = GameConfig::from_toml_str("max_enemies = 6").unwrap_err();
    assert!(format!("{err:#}").contains("lanes"));
}

#[test]
fn rejects_bad_values() {
    for doc in [
        "max_enemies = 0",
        "projectile_speed = 0.5",
        "enemy_speed_min = 0.8",
        "enemy_width = 0.0",
        "player_width = 600.0",
        "frame_rate = 0",
        "enemy_speed_max = inf",
        "fire_offset_x = nan",
    ] {
        assert!(GameConfig::from_toml_str(doc).is_err(), "accepted {doc:?}");
    }
}

#[test]
fn rejects_malformed_toml() {
    assert!(GameConfig::from_toml_str("max_enemies = \"three\"").is_err());
}

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "kill_score = 250").unwrap();
    let c = GameConfig::load(file.path()).unwrap();
    assert_eq!(c.kill_score, 250);
}

#[test]
fn explicit_missing_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(GameConfig::resolve(Some(&missing)).is_err());
}

#[test]
fn default_path_lives_under_app_dir() {
    if let Some(path) = default_config_path() {
        assert!(path.ends_with("lane_shooter/config.toml"));
    }
}

#[test]
fn unbounded_enemy_speed_cannot_reach_the_engine() {
    let config = GameConfig {
        enemy_speed_max: f64::INFINITY,
        ..GameConfig::default()
    };
    assert!(config.validate().is_err());
}

//! Integration tests for configuration and timer-state persistence.

use pomolock_core::storage::{load_snapshot_from, save_snapshot_to};
use pomolock_core::{
    Config, Language, ManualClock, Session, TimerEngine, TimerState,
};

#[test]
fn test_saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut cfg = Config::default();
    cfg.apply("work_time", "45").unwrap();
    cfg.apply("language", "RU").unwrap();
    cfg.appearance
        .insert("theme".into(), toml::Value::String("dark".into()));
    cfg.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, cfg);
    assert_eq!(loaded.timer_settings().work_secs, 45 * 60);
}

#[test]
fn test_corrupt_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "work_time = [this is not toml").unwrap();

    assert!(Config::load_from(&path).is_err());
    assert_eq!(Config::load_from_or_default(&path), Config::default());
}

#[test]
fn test_out_of_range_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "work_time = 25\npomodoros_for_long_break = 11\n").unwrap();

    assert_eq!(Config::load_from_or_default(&path), Config::default());
}

#[test]
fn test_missing_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nowhere.toml");
    assert_eq!(Config::load_from_or_default(&path), Config::default());
}

#[test]
fn test_config_drives_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "work_time = 1\nbreak_time = 2\nlong_break_time = 3\npomodoros_for_long_break = 2\nauto_start = false\n",
    )
    .unwrap();
    let cfg = Config::load_from_or_default(&path);

    let clock = ManualClock::new();
    let engine = TimerEngine::with_clock(cfg.timer_settings(), clock.clone());
    let mut session = Session::with_engine(engine, cfg.language);

    session.start();
    clock.advance_secs(60.0);
    session.tick();
    assert_eq!(session.engine().remaining_break_secs(), 120);
    clock.advance_secs(120.0);
    session.tick();
    assert_eq!(session.engine().state(), TimerState::Stopped);

    session.start();
    clock.advance_secs(60.0);
    session.tick();
    assert!(session.engine().cycle().is_long_break);
    assert_eq!(session.engine().remaining_break_secs(), 180);
}

#[test]
fn test_snapshot_file_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timer_state.json");
    let cfg = Config::default();

    let clock = ManualClock::new();
    let engine = TimerEngine::with_clock(cfg.timer_settings(), clock.clone());
    let mut session = Session::with_engine(engine, Language::En);
    session.start();
    clock.advance_secs(600.0);
    session.tick();
    session.pause();
    save_snapshot_to(&path, &session.snapshot()).unwrap();

    let snapshot = load_snapshot_from(&path).expect("snapshot was just written");
    assert_eq!(snapshot.state, TimerState::Paused);
    let engine = TimerEngine::restore(cfg.timer_settings(), ManualClock::new(), &snapshot);
    assert_eq!(engine.state(), TimerState::Stopped);
    assert!((engine.time_left_secs() - 900.0).abs() < 1e-6);
}

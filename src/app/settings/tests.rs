use clap::Parser;
use tempfile::{NamedTempFile, tempdir};

use super::{
    RuntimeSettings, load_runtime_settings, load_runtime_settings_from, save_runtime_settings,
};
use crate::cli::Cli;

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("atmos-fx").chain(args.iter().copied()))
}

#[test]
fn from_cli_defaults_maps_flags() {
    let settings =
        RuntimeSettings::from_cli_defaults(&cli(&["--condition", "fog", "--night", "--no-flash"]));
    assert_eq!(settings.condition_code, 45);
    assert!(!settings.is_day);
    assert!(settings.no_flash);
    assert!(settings.pointer_wind);
    assert_eq!(settings.fps, 30);
}

#[test]
fn load_without_disk_returns_cli_defaults() {
    let (settings, path) = load_runtime_settings(&cli(&[]), false);
    assert!(path.is_none());
    assert_eq!(settings, RuntimeSettings::default());
}

#[test]
fn saved_settings_roundtrip() {
    let file = NamedTempFile::new().expect("create temp settings file");
    let settings = RuntimeSettings {
        condition_code: 75,
        is_day: false,
        fps: 45,
        no_flash: true,
        pointer_wind: false,
    };
    save_runtime_settings(file.path(), &settings).expect("save settings");

    let restored = load_runtime_settings_from(&cli(&[]), Some(file.path()));
    assert_eq!(restored.condition_code, 75);
    assert!(!restored.is_day);
    assert_eq!(restored.fps, 45);
}

#[test]
fn flash_and_pointer_toggles_are_not_remembered() {
    let file = NamedTempFile::new().expect("create temp settings file");
    let from_flags = load_runtime_settings_from(
        &cli(&["--no-flash", "--no-pointer-wind", "--condition", "rain"]),
        None,
    );
    save_runtime_settings(file.path(), &from_flags).expect("save settings");

    let saved = std::fs::read_to_string(file.path()).expect("read settings");
    assert!(!saved.contains("no_flash"));
    assert!(!saved.contains("pointer_wind"));

    let next_run = load_runtime_settings_from(&cli(&[]), Some(file.path()));
    assert_eq!(next_run.condition_code, 61);
    assert!(!next_run.no_flash);
    assert!(next_run.pointer_wind);
}

#[test]
fn cli_flags_override_saved_values() {
    let file = NamedTempFile::new().expect("create temp settings file");
    let saved = RuntimeSettings {
        condition_code: 75,
        fps: 45,
        ..RuntimeSettings::default()
    };
    save_runtime_settings(file.path(), &saved).expect("save settings");

    let merged = load_runtime_settings_from(
        &cli(&["--condition", "thunderstorm", "--night", "--fps", "20"]),
        Some(file.path()),
    );
    assert_eq!(merged.condition_code, 95);
    assert!(!merged.is_day);
    assert_eq!(merged.fps, 20);

    let untouched = load_runtime_settings_from(&cli(&[]), Some(file.path()));
    assert_eq!(untouched.fps, 45);
    assert_eq!(untouched.condition_code, 75);
}

#[test]
fn partial_or_corrupt_files_fall_back() {
    let dir = tempdir().expect("create temp dir");
    let partial = dir.path().join("partial.json");
    std::fs::write(&partial, r#"{"condition_code": 61}"#).expect("write partial");
    let loaded = load_runtime_settings_from(&cli(&[]), Some(&partial));
    assert_eq!(loaded.condition_code, 61);
    assert!(loaded.is_day);
    assert_eq!(loaded.fps, 30);

    let corrupt = dir.path().join("corrupt.json");
    std::fs::write(&corrupt, "{not json").expect("write corrupt");
    let loaded = load_runtime_settings_from(&cli(&["--night"]), Some(&corrupt));
    assert_eq!(loaded, RuntimeSettings::from_cli_defaults(&cli(&["--night"])));

    let missing = dir.path().join("missing.json");
    assert_eq!(
        load_runtime_settings_from(&cli(&[]), Some(&missing)),
        RuntimeSettings::default()
    );
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("nested").join("atmos-fx").join("settings.json");
    save_runtime_settings(&path, &RuntimeSettings::default()).expect("save settings");
    assert!(path.exists());
}

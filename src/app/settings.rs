use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, DEFAULT_FPS};

pub const CONFIG_DIR_ENV: &str = "ATMOS_FX_CONFIG_DIR";

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Last manually chosen condition code.
    pub condition_code: u8,
    pub is_day: bool,
    pub fps: u8,
    /// Per-run toggles; only the command line sets them.
    #[serde(skip)]
    pub no_flash: bool,
    #[serde(skip)]
    pub pointer_wind: bool,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            condition_code: 0,
            is_day: true,
            fps: DEFAULT_FPS,
            no_flash: false,
            pointer_wind: true,
        }
    }
}

impl RuntimeSettings {
    #[must_use]
    pub fn from_cli_defaults(cli: &Cli) -> Self {
        Self {
            condition_code: cli.condition.unwrap_or(0),
            is_day: !cli.night,
            fps: cli.fps,
            no_flash: cli.no_flash,
            pointer_wind: !cli.no_pointer_wind,
        }
    }

    /// Applies every CLI flag that differs from its default on top of `self`.
    fn overlay_cli(mut self, cli: &Cli) -> Self {
        if let Some(code) = cli.condition {
            self.condition_code = code;
        }
        if cli.night {
            self.is_day = false;
        }
        if cli.fps != DEFAULT_FPS {
            self.fps = cli.fps;
        }
        if cli.no_flash {
            self.no_flash = true;
        }
        if cli.no_pointer_wind {
            self.pointer_wind = false;
        }
        self
    }
}

pub fn load_runtime_settings(cli: &Cli, enable_disk: bool) -> (RuntimeSettings, Option<PathBuf>) {
    if !enable_disk {
        return (RuntimeSettings::from_cli_defaults(cli), None);
    }
    let Some(path) = settings_path() else {
        return (RuntimeSettings::from_cli_defaults(cli), None);
    };
    let settings = load_runtime_settings_from(cli, Some(&path));
    (settings, Some(path))
}

/// Saved settings at `path` (if readable) with CLI overrides applied.
#[must_use]
pub fn load_runtime_settings_from(cli: &Cli, path: Option<&Path>) -> RuntimeSettings {
    let saved = path
        .and_then(|path| fs::read_to_string(path).ok())
        .and_then(|content| serde_json::from_str::<RuntimeSettings>(&content).ok());
    match saved {
        Some(saved) => saved.overlay_cli(cli),
        None => RuntimeSettings::from_cli_defaults(cli),
    }
}

pub fn save_runtime_settings(path: &Path, settings: &RuntimeSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating settings directory failed")?;
    }
    let payload =
        serde_json::to_string_pretty(settings).context("serializing settings payload failed")?;
    fs::write(path, payload).context("writing settings file failed")
}

#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(base).join("settings.json"));
    }

    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("atmos-fx")
            .join("settings.json"),
    )
}

#[cfg(test)]
mod tests;

use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "ATMOS_FX_LOG";
const DEFAULT_DIRECTIVE: &str = "atmos_fx=info";

/// Log file from `--log-file`, falling back to `ATMOS_FX_LOG`.
#[must_use]
pub fn log_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    cli_path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(LOG_ENV).map(PathBuf::from))
        .filter(|path| !path.as_os_str().is_empty())
}

/// Filter from `RUST_LOG` directives, or `atmos_fx=info` when unset or unparsable.
pub(crate) fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the global subscriber. The terminal belongs to the UI, so without
/// a log file nothing is recorded.
pub fn init(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .with(env_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .try_init()
        .context("installing tracing subscriber")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "atmos-fx starting");
    Ok(())
}

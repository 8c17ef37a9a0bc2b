#![allow(dead_code)]

use atmos_fx::{
    app::{settings::RuntimeSettings, state::AppState},
    cli::Cli,
    domain::weather::{CurrentConditions, Location},
};
use chrono::Utc;
use clap::Parser;

pub fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("atmos-fx").chain(args.iter().copied()))
}

/// State sized for an 80x24 terminal, with settings kept off disk.
pub fn sized_state(cli: &Cli) -> AppState {
    let settings = RuntimeSettings::from_cli_defaults(cli);
    let mut state = AppState::with_settings(cli, settings, None);
    state.resize_viewport(80, 24);
    state
}

pub fn stockholm_conditions(code: u8, is_day: bool) -> CurrentConditions {
    CurrentConditions {
        location: Location::from_coords(59.3293, 18.0686),
        temperature_2m_c: 1.5,
        weather_code: code,
        wind_speed_10m: 14.0,
        is_day,
        fetched_at: Utc::now(),
    }
}

/// Advances the engine `frames` times, 16 ms apart.
pub fn run_frames(state: &mut AppState, frames: usize) {
    for frame in 0..frames {
        state.handle_tick_frame(frame as f64 * 16.0);
    }
}

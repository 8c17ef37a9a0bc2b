#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::Parser;

use crate::domain::weather::parse_condition;

pub const DEFAULT_FPS: u8 = 30;
pub const DEFAULT_REFRESH_SECS: u64 = 600;

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "atmos-fx",
    version,
    about = "Animated weather sky for the terminal"
)]
pub struct Cli {
    /// Weather code or preset name (e.g. 65, heavy-rain, thunderstorm)
    #[arg(long, value_parser = parse_condition)]
    pub condition: Option<u8>,

    /// Start with the night sky
    #[arg(long)]
    pub night: bool,

    /// Latitude for live conditions (requires --lon)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude for live conditions (requires --lat)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Target FPS (15..60)
    #[arg(long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: u8,

    /// Disable thunder flash
    #[arg(long)]
    pub no_flash: bool,

    /// Ignore the mouse pointer for rain wind
    #[arg(long)]
    pub no_pointer_wind: bool,

    /// Forecast refresh interval in seconds
    #[arg(long, default_value_t = DEFAULT_REFRESH_SECS)]
    pub refresh_interval: u64,

    /// Override the forecast endpoint
    #[arg(long)]
    pub forecast_url: Option<String>,

    /// Seed for reproducible particle layouts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file (also ATMOS_FX_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            (Some(lat), Some(lon))
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) =>
            {
                anyhow::bail!("coordinates out of range: {lat}, {lon}")
            }
            _ => Ok(()),
        }
    }

    /// Whether the sky follows live conditions instead of a manual preset.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn parses_condition_by_name_and_code() {
        let cli = Cli::parse_from(["atmos-fx", "--condition", "heavy-snow"]);
        assert_eq!(cli.condition, Some(75));
        let cli = Cli::parse_from(["atmos-fx", "--condition", "95"]);
        assert_eq!(cli.condition, Some(95));
    }

    #[test]
    fn rejects_unknown_condition() {
        let err = Cli::try_parse_from(["atmos-fx", "--condition", "sleet-tornado"])
            .expect_err("expected invalid condition");
        assert!(err.to_string().contains("sleet-tornado"));
    }

    #[test]
    fn defaults_are_manual_day_sky() {
        let cli = Cli::parse_from(["atmos-fx"]);
        assert_eq!(cli.condition, None);
        assert!(!cli.night);
        assert_eq!(cli.fps, 30);
        assert_eq!(cli.refresh_interval, 600);
        assert!(!cli.has_coordinates());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn fps_is_range_checked() {
        assert!(Cli::try_parse_from(["atmos-fx", "--fps", "10"]).is_err());
        assert_eq!(Cli::parse_from(["atmos-fx", "--fps", "60"]).fps, 60);
    }

    #[test]
    fn negative_coordinates_parse() {
        let cli = Cli::parse_from(["atmos-fx", "--lat", "-33.87", "--lon", "151.21"]);
        assert_eq!(cli.lat, Some(-33.87));
        assert!(cli.has_coordinates());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn lat_without_lon_is_rejected() {
        let cli = Cli::parse_from(["atmos-fx", "--lat", "59.3"]);
        assert!(cli.validate().is_err());
        let cli = Cli::parse_from(["atmos-fx", "--lat", "120", "--lon", "0"]);
        assert!(cli.validate().is_err());
    }
}

mod conditions;

use chrono::{DateTime, Utc};

pub use conditions::{
    CONDITION_PRESETS, ConditionParseError, SnowProfile, WeatherCategory, condition_class,
    cycle_preset, daylight_class, is_fog, is_storm, parse_condition, rain_intensity,
    snow_profile, weather_code_to_category, weather_icon, weather_label, weather_label_for_time,
};

use crate::resilience::freshness::FreshnessState;

/// The pair the particle engine is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub code: u8,
    pub is_day: bool,
}

impl Condition {
    #[must_use]
    pub fn new(code: u8, is_day: bool) -> Self {
        Self { code, is_day }
    }

    #[must_use]
    pub fn category(self) -> WeatherCategory {
        weather_code_to_category(self.code)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        weather_label_for_time(self.code, self.is_day)
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        weather_icon(self.code, self.is_day)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn from_coords(lat: f64, lon: f64) -> Self {
        Self {
            name: format!("{lat:.4}, {lon:.4}"),
            latitude: lat,
            longitude: lon,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CurrentConditions {
    pub location: Location,
    pub temperature_2m_c: f32,
    pub weather_code: u8,
    pub wind_speed_10m: f32,
    pub is_day: bool,
    pub fetched_at: DateTime<Utc>,
}

impl CurrentConditions {
    #[must_use]
    pub fn condition(&self) -> Condition {
        Condition::new(self.weather_code, self.is_day)
    }
}

#[derive(Debug, Clone)]
pub struct RefreshMetadata {
    pub last_success: Option<DateTime<Utc>>,
    pub last_attempt: Option<DateTime<Utc>>,
    pub state: FreshnessState,
    pub consecutive_failures: u32,
}

impl Default for RefreshMetadata {
    fn default() -> Self {
        Self {
            last_success: None,
            last_attempt: None,
            state: FreshnessState::Stale,
            consecutive_failures: 0,
        }
    }
}

impl RefreshMetadata {
    pub fn mark_success(&mut self) {
        let now = Utc::now();
        self.last_attempt = Some(now);
        self.last_success = Some(now);
        self.consecutive_failures = 0;
        self.state = FreshnessState::Fresh;
    }

    pub fn mark_failure(&mut self) {
        self.last_attempt = Some(Utc::now());
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.state = evaluate_freshness(self.last_success, self.consecutive_failures);
    }

    pub fn age_minutes(&self) -> Option<i64> {
        self.last_success.map(|ts| (Utc::now() - ts).num_minutes())
    }
}

#[must_use]
pub fn evaluate_freshness(
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
) -> FreshnessState {
    crate::resilience::freshness::evaluate_freshness(last_success, consecutive_failures)
}

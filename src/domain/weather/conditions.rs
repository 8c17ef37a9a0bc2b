use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCategory {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Fog,
    Thunder,
    Unknown,
}

/// Intensity scale and ground-accumulation ceiling for a snowing condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowProfile {
    pub intensity: f32,
    pub depth_max: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionParseError {
    #[error("unknown weather code {0}; expected a WMO code such as 0, 61 or 95")]
    UnknownCode(u8),
    #[error("unrecognized condition `{0}`; use a WMO code or a preset name like `heavy-rain`")]
    UnknownName(String),
}

#[must_use]
pub fn weather_code_to_category(code: u8) -> WeatherCategory {
    match code {
        0 | 1 => WeatherCategory::Clear,
        2 | 3 => WeatherCategory::Cloudy,
        45 | 48 => WeatherCategory::Fog,
        51..=57 | 61..=67 | 80..=82 => WeatherCategory::Rain,
        71 | 73 | 75 | 77 | 85 | 86 => WeatherCategory::Snow,
        95 | 96 | 99 => WeatherCategory::Thunder,
        _ => WeatherCategory::Unknown,
    }
}

#[must_use]
pub fn is_storm(code: u8) -> bool {
    weather_code_to_category(code) == WeatherCategory::Thunder
}

#[must_use]
pub fn is_fog(code: u8) -> bool {
    weather_code_to_category(code) == WeatherCategory::Fog
}

/// Rain multiplier for codes that produce falling drops, storms included.
/// Snow codes 71–77 sit inside 51–82 but never rain.
#[must_use]
pub fn rain_intensity(code: u8) -> Option<f32> {
    match weather_code_to_category(code) {
        WeatherCategory::Thunder => Some(3.5),
        WeatherCategory::Rain => Some(match code {
            65 | 67 | 82 => 3.0,
            63 | 66 | 81 => 2.0,
            _ => 1.0,
        }),
        _ => None,
    }
}

#[must_use]
pub fn snow_profile(code: u8) -> Option<SnowProfile> {
    let (intensity, depth_max) = match code {
        75 | 86 => (3.0, 0.18),
        73 | 85 => (1.8, 0.10),
        71 | 77 => (1.0, 0.05),
        _ => return None,
    };
    Some(SnowProfile {
        intensity,
        depth_max,
    })
}

/// Presentation class for the condition bucket. Unknown codes fall back to a calm sky.
#[must_use]
pub fn condition_class(category: WeatherCategory) -> &'static str {
    match category {
        WeatherCategory::Clear | WeatherCategory::Unknown => "cond-clear",
        WeatherCategory::Cloudy => "cond-cloudy",
        WeatherCategory::Fog => "cond-fog",
        WeatherCategory::Rain => "cond-rain",
        WeatherCategory::Snow => "cond-snow",
        WeatherCategory::Thunder => "cond-storm",
    }
}

#[must_use]
pub fn daylight_class(is_day: bool) -> &'static str {
    if is_day { "is-day" } else { "is-night" }
}

#[must_use]
pub fn weather_label(code: u8) -> &'static str {
    weather_label_for_time(code, true)
}

#[must_use]
pub fn weather_label_for_time(code: u8, is_day: bool) -> &'static str {
    match code {
        0 if !is_day => "Clear night",
        1 if !is_day => "Mainly clear night",
        _ => weather_label_lookup(code).unwrap_or("Unknown"),
    }
}

#[must_use]
pub fn weather_icon(code: u8, is_day: bool) -> &'static str {
    match weather_code_to_category(code) {
        WeatherCategory::Clear if is_day => "☀",
        WeatherCategory::Clear => "☾",
        WeatherCategory::Cloudy => "☁",
        WeatherCategory::Rain => "☂",
        WeatherCategory::Snow => "❄",
        WeatherCategory::Fog => "░",
        WeatherCategory::Thunder => "⚡",
        WeatherCategory::Unknown => "·",
    }
}

const WEATHER_LABELS: &[(u8, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Fog"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (56, "Light freezing drizzle"),
    (57, "Dense freezing drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (66, "Light freezing rain"),
    (67, "Heavy freezing rain"),
    (71, "Slight snowfall"),
    (73, "Moderate snowfall"),
    (75, "Heavy snowfall"),
    (77, "Snow grains"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm + light hail"),
    (99, "Thunderstorm + heavy hail"),
];

fn weather_label_lookup(code: u8) -> Option<&'static str> {
    WEATHER_LABELS
        .iter()
        .find_map(|(candidate, label)| (*candidate == code).then_some(*label))
}

/// Named conditions accepted on the command line and cycled with the arrow keys.
pub const CONDITION_PRESETS: &[(&str, u8)] = &[
    ("clear", 0),
    ("mainly-clear", 1),
    ("partly-cloudy", 2),
    ("overcast", 3),
    ("fog", 45),
    ("rime-fog", 48),
    ("drizzle", 51),
    ("rain", 61),
    ("moderate-rain", 63),
    ("heavy-rain", 65),
    ("violent-showers", 82),
    ("light-snow", 71),
    ("snow", 73),
    ("heavy-snow", 75),
    ("snow-showers", 85),
    ("thunderstorm", 95),
    ("hail-storm", 99),
];

pub fn parse_condition(input: &str) -> Result<u8, ConditionParseError> {
    let trimmed = input.trim();
    if let Ok(code) = trimmed.parse::<u8>() {
        return weather_label_lookup(code)
            .map(|_| code)
            .ok_or(ConditionParseError::UnknownCode(code));
    }
    let wanted = trimmed.to_ascii_lowercase().replace(['_', ' '], "-");
    CONDITION_PRESETS
        .iter()
        .find_map(|(name, code)| (*name == wanted).then_some(*code))
        .ok_or_else(|| ConditionParseError::UnknownName(trimmed.to_string()))
}

/// Next preset after `code` in cycling order; codes outside the list restart at the first preset.
#[must_use]
pub fn cycle_preset(code: u8, forward: bool) -> u8 {
    let len = CONDITION_PRESETS.len();
    let Some(idx) = CONDITION_PRESETS.iter().position(|(_, c)| *c == code) else {
        return CONDITION_PRESETS[0].1;
    };
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    CONDITION_PRESETS[next].1
}

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::match_same_arms
)]

use ratatui::style::Color;

use crate::domain::weather::WeatherCategory;

pub type Rgb = (u8, u8, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Xterm256,
    Basic16,
}

/// Sky gradient and chrome colors for one set of presentation classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyTheme {
    pub top: Rgb,
    pub bottom: Rgb,
    pub accent: Rgb,
    pub text: Color,
    pub muted_text: Color,
    pub status_bg: Color,
    pub warning: Color,
    pub danger: Color,
}

pub fn detect_color_capability() -> ColorCapability {
    let term = std::env::var("TERM").ok();
    let colorterm = std::env::var("COLORTERM").ok();
    let no_color = std::env::var("NO_COLOR").ok();
    capability_from(term.as_deref(), colorterm.as_deref(), no_color.as_deref())
}

pub(crate) fn capability_from(
    term: Option<&str>,
    colorterm: Option<&str>,
    no_color: Option<&str>,
) -> ColorCapability {
    let term = term.unwrap_or_default().to_lowercase();
    let colorterm = colorterm.unwrap_or_default().to_lowercase();
    if no_color.is_some_and(|value| !value.is_empty()) || term == "dumb" {
        return ColorCapability::Basic16;
    }
    if colorterm.contains("truecolor") || colorterm.contains("24bit") || term.ends_with("direct")
    {
        return ColorCapability::TrueColor;
    }
    if term.contains("256color") {
        ColorCapability::Xterm256
    } else {
        ColorCapability::Basic16
    }
}

/// Reads the `is-day`/`is-night` and `cond-*` classes back into a palette key.
#[must_use]
pub fn palette_key(classes: &[&str]) -> (WeatherCategory, bool) {
    let is_day = !classes.contains(&"is-night");
    let category = classes
        .iter()
        .find_map(|class| match *class {
            "cond-clear" => Some(WeatherCategory::Clear),
            "cond-cloudy" => Some(WeatherCategory::Cloudy),
            "cond-fog" => Some(WeatherCategory::Fog),
            "cond-rain" => Some(WeatherCategory::Rain),
            "cond-snow" => Some(WeatherCategory::Snow),
            "cond-storm" => Some(WeatherCategory::Thunder),
            _ => None,
        })
        .unwrap_or(WeatherCategory::Unknown);
    (category, is_day)
}

#[must_use]
pub fn sky_theme(classes: &[&str]) -> SkyTheme {
    let (category, is_day) = palette_key(classes);
    let (top, bottom, accent) = match (category, is_day) {
        (WeatherCategory::Clear, true) => ((13, 53, 102), (30, 102, 158), (255, 215, 117)),
        (WeatherCategory::Clear, false) => ((9, 18, 44), (21, 43, 79), (173, 216, 255)),
        (WeatherCategory::Cloudy, true) => ((25, 36, 51), (48, 63, 84), (210, 223, 235)),
        (WeatherCategory::Cloudy, false) => ((20, 26, 40), (34, 42, 62), (194, 207, 224)),
        (WeatherCategory::Rain, true) => ((17, 47, 88), (32, 73, 126), (153, 214, 255)),
        (WeatherCategory::Rain, false) => ((12, 25, 52), (25, 44, 78), (143, 196, 255)),
        (WeatherCategory::Snow, true) => ((27, 51, 77), (43, 74, 106), (237, 247, 255)),
        (WeatherCategory::Snow, false) => ((19, 35, 55), (34, 55, 80), (226, 241, 255)),
        (WeatherCategory::Fog, true) => ((30, 34, 40), (50, 55, 62), (216, 220, 224)),
        (WeatherCategory::Fog, false) => ((21, 24, 30), (33, 37, 43), (201, 207, 211)),
        (WeatherCategory::Thunder, true) => ((28, 25, 66), (42, 40, 97), (255, 223, 112)),
        (WeatherCategory::Thunder, false) => ((18, 15, 44), (28, 24, 63), (255, 208, 95)),
        (WeatherCategory::Unknown, true) => ((28, 36, 51), (42, 53, 73), (205, 219, 234)),
        (WeatherCategory::Unknown, false) => ((19, 24, 35), (31, 39, 53), (195, 205, 215)),
    };
    let shade = mix_rgb(top, (0, 0, 0), 0.5);
    SkyTheme {
        top,
        bottom,
        accent,
        text: Color::Rgb(236, 242, 250),
        muted_text: Color::Rgb(150, 163, 182),
        status_bg: Color::Rgb(shade.0, shade.1, shade.2),
        warning: Color::Yellow,
        danger: Color::LightRed,
    }
}

#[must_use]
pub fn mix_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| -> u8 {
        (f32::from(x) + (f32::from(y) - f32::from(x)) * t)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

#[must_use]
pub fn quantize(color: Color, capability: ColorCapability) -> Color {
    match (capability, color) {
        (ColorCapability::TrueColor, c) => c,
        (ColorCapability::Xterm256, Color::Rgb(r, g, b)) => {
            let to_cube = |v: u8| -> u8 { ((f32::from(v) / 255.0) * 5.0).round() as u8 };
            Color::Indexed(16 + 36 * to_cube(r) + 6 * to_cube(g) + to_cube(b))
        }
        (ColorCapability::Basic16, Color::Rgb(r, g, b)) => basic16_from_rgb(r, g, b),
        (_, c) => c,
    }
}

#[must_use]
pub fn quantize_rgb(rgb: Rgb, capability: ColorCapability) -> Color {
    quantize(Color::Rgb(rgb.0, rgb.1, rgb.2), capability)
}

fn basic16_from_rgb(r: u8, g: u8, b: u8) -> Color {
    let rf = f32::from(r) / 255.0;
    let gf = f32::from(g) / 255.0;
    let bf = f32::from(b) / 255.0;

    let max = rf.max(gf.max(bf));
    let min = rf.min(gf.min(bf));
    let delta = max - min;
    let light = (max + min) / 2.0;

    if delta < 0.08 {
        return match light {
            l if l < 0.20 => Color::Black,
            l if l < 0.40 => Color::DarkGray,
            l if l < 0.72 => Color::Gray,
            _ => Color::White,
        };
    }

    let hue = if (max - rf).abs() < f32::EPSILON {
        60.0 * ((gf - bf) / delta).rem_euclid(6.0)
    } else if (max - gf).abs() < f32::EPSILON {
        60.0 * (((bf - rf) / delta) + 2.0)
    } else {
        60.0 * (((rf - gf) / delta) + 4.0)
    };

    let bright = light >= 0.55;
    let (dim, lit) = match hue {
        h if !(30.0..330.0).contains(&h) => (Color::Red, Color::LightRed),
        h if h < 90.0 => (Color::Yellow, Color::LightYellow),
        h if h < 150.0 => (Color::Green, Color::LightGreen),
        h if h < 210.0 => (Color::Cyan, Color::LightCyan),
        h if h < 270.0 => (Color::Blue, Color::LightBlue),
        _ => (Color::Magenta, Color::LightMagenta),
    };
    if bright { lit } else { dim }
}

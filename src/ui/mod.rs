pub mod layout;
pub mod raster;
pub mod sky;
pub mod theme;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::state::{AppMode, AppState, ConditionSource},
    domain::weather::CurrentConditions,
    fx::Census,
    resilience::freshness::FreshnessState,
};

use self::{
    layout::{MIN_HEIGHT, MIN_WIDTH, fits, screen_layout},
    sky::SkyCanvas,
    theme::{ColorCapability, SkyTheme, quantize_rgb, sky_theme},
};

pub const HINTS: &str = "←/→ condition  d day/night  space pause  r refresh  q quit";

pub fn render(frame: &mut Frame, state: &AppState, capability: ColorCapability) {
    let area = frame.area();

    if !fits(area) {
        let warning = Paragraph::new(format!(
            "Terminal too small. Resize to at least {MIN_WIDTH}x{MIN_HEIGHT}."
        ))
        .block(Block::default().borders(Borders::ALL).title("atmos-fx"));
        frame.render_widget(warning, area);
        return;
    }

    let layout = screen_layout(area);
    let overlay = state.engine.overlay();
    let theme = sky_theme(overlay.classes());

    frame.render_widget(
        SkyCanvas {
            raster: &state.raster,
            theme: &theme,
            overlay,
            flash_opacity: state.engine.flash_opacity(),
            capability,
        },
        layout.sky,
    );
    render_status(frame, layout.status, state, &theme, capability);
    frame.render_widget(
        Paragraph::new(HINTS).style(Style::default().fg(theme.muted_text).bg(Color::Reset)),
        layout.hints,
    );
    render_freshness_badge(frame, area, state, &theme);
}

fn render_status(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    theme: &SkyTheme,
    capability: ColorCapability,
) {
    let accent = quantize_rgb(theme.accent, capability);
    let condition = state.condition;
    let mut spans = vec![
        Span::styled(
            format!(" {} {} ", condition.icon(), condition.label()),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("[{}] ", state.engine.overlay().class_name()),
            Style::default().fg(theme.muted_text),
        ),
    ];

    if let Some(live) = &state.live
        && state.source == ConditionSource::Forecast
    {
        spans.push(Span::styled(
            format!("{} · ", live_text(live)),
            Style::default().fg(theme.text),
        ));
    }

    spans.push(Span::styled(
        census_text(&state.engine.census()),
        Style::default().fg(theme.text),
    ));

    if state.engine.snow_depth_max() > 0.0 {
        spans.push(Span::styled(
            format!(" · snow {:.0}%", snow_depth_percent(state)),
            Style::default().fg(theme.text),
        ));
    }

    let (run_label, run_color) = if state.engine.is_running() {
        (" · ▶ running", theme.muted_text)
    } else {
        (" · ‖ paused", theme.warning)
    };
    spans.push(Span::styled(run_label, Style::default().fg(run_color)));

    match state.mode {
        AppMode::Loading => spans.push(Span::styled(
            " · fetching…",
            Style::default().fg(theme.muted_text),
        )),
        AppMode::Error => {
            if let Some(err) = &state.last_error {
                spans.push(Span::styled(
                    format!(" · {err}"),
                    Style::default().fg(theme.danger),
                ));
            }
        }
        AppMode::Ready | AppMode::Quit => {}
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.status_bg)),
        area,
    );
}

#[must_use]
pub fn live_text(live: &CurrentConditions) -> String {
    format!(
        "{:.0}°C {:.0} km/h {}",
        live.temperature_2m_c, live.wind_speed_10m, live.location.name
    )
}

/// Compact per-kind particle counts, skipping kinds that are absent.
#[must_use]
pub fn census_text(census: &Census) -> String {
    let parts: Vec<String> = [
        ("stars", census.stars),
        ("rays", census.sunrays),
        ("clouds", census.clouds),
        ("rain", census.rain),
        ("snow", census.snow),
        ("fog", census.fog),
    ]
    .iter()
    .filter(|(_, count)| *count > 0)
    .map(|(name, count)| format!("{name} {count}"))
    .collect();
    if parts.is_empty() {
        "calm sky".to_string()
    } else {
        parts.join(" ")
    }
}

fn snow_depth_percent(state: &AppState) -> f32 {
    let max = state.engine.snow_depth_max();
    if max <= 0.0 {
        return 0.0;
    }
    (state.engine.snow_depth() / max * 100.0).clamp(0.0, 100.0)
}

fn render_freshness_badge(frame: &mut Frame, area: Rect, state: &AppState, theme: &SkyTheme) {
    if state.location.is_none() {
        return;
    }
    let freshness = state.refresh_meta.state;
    let color = if freshness == FreshnessState::Offline {
        theme.danger
    } else {
        theme.warning
    };

    if let Some(text) = freshness.badge() {
        let width = (text.chars().count() as u16 + 2).min(area.width);
        let badge_area = Rect {
            x: area.right().saturating_sub(width + 1),
            y: area.y,
            width,
            height: 1,
        };
        let badge = Paragraph::new(Line::from(text)).style(
            Style::default()
                .fg(color)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(badge, badge_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weather::Location;

    #[test]
    fn census_text_lists_present_kinds() {
        let census = Census {
            rain: 140,
            fog: 18,
            ..Census::default()
        };
        assert_eq!(census_text(&census), "rain 140 fog 18");
        assert_eq!(census_text(&Census::default()), "calm sky");
    }

    #[test]
    fn live_text_includes_wind() {
        let live = CurrentConditions {
            location: Location::from_coords(60.17, 24.94),
            temperature_2m_c: -4.4,
            weather_code: 71,
            wind_speed_10m: 21.6,
            is_day: true,
            fetched_at: chrono::Utc::now(),
        };
        assert_eq!(live_text(&live), "-4°C 22 km/h 60.1700, 24.9400");
    }
}

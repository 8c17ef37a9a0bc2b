use crate::domain::weather::{Condition, condition_class, daylight_class};

use super::surface::Point;

pub const SPLASH_TTL_MS: f64 = 600.0;
pub const THUNDER_FLASH_MS: f64 = 700.0;

/// Blur and dimming applied over the whole scene in fog.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FogVeil {
    pub blur_px: f32,
    pub opacity: f32,
}

impl FogVeil {
    pub const FOG: Self = Self {
        blur_px: 8.0,
        opacity: 0.1,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splash {
    pub at: Point,
    pub born_ms: f64,
}

/// Presentation state around the canvas: condition classes, transient rain
/// splashes, the thunder flash and the fog veil.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    classes: Vec<&'static str>,
    splashes: Vec<Splash>,
    thunder_until_ms: Option<f64>,
    fog_veil: FogVeil,
}

impl Overlay {
    pub fn apply_condition(&mut self, condition: Condition, fog_veil: FogVeil) {
        self.classes = vec![
            daylight_class(condition.is_day),
            condition_class(condition.category()),
        ];
        self.fog_veil = fog_veil;
    }

    #[must_use]
    pub fn classes(&self) -> &[&'static str] {
        &self.classes
    }

    #[must_use]
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|class| *class == name)
    }

    pub fn spawn_splash(&mut self, at: Point, now_ms: f64) {
        self.splashes.push(Splash { at, born_ms: now_ms });
    }

    #[must_use]
    pub fn splashes(&self) -> &[Splash] {
        &self.splashes
    }

    pub fn flash_thunder(&mut self, now_ms: f64) {
        self.thunder_until_ms = Some(now_ms + THUNDER_FLASH_MS);
    }

    #[must_use]
    pub fn thunder_active(&self) -> bool {
        self.thunder_until_ms.is_some()
    }

    #[must_use]
    pub fn fog_veil(&self) -> FogVeil {
        self.fog_veil
    }

    /// Drops splashes and the thunder flash whose time is up.
    pub fn expire(&mut self, now_ms: f64) {
        self.splashes
            .retain(|splash| now_ms - splash.born_ms < SPLASH_TTL_MS);
        if self.thunder_until_ms.is_some_and(|until| now_ms >= until) {
            self.thunder_until_ms = None;
        }
    }
}

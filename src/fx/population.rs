use rand::Rng;

use crate::domain::weather::{Condition, is_fog, is_storm, rain_intensity, snow_profile};

use super::{
    overlay::FogVeil,
    particle::{Cloud, Fog, Particle, Rain, Snow, Star, Sunray},
    surface::CanvasSize,
};

pub const STAR_BASE: f32 = 120.0;
pub const RAIN_BASE: f32 = 140.0;
pub const SNOW_BASE: f32 = 80.0;
/// Fixed counts; viewport density only thins stars, rain and snow.
pub const SUNRAY_COUNT: usize = 10;
pub const FOG_WISPS: usize = 18;
pub const CLOUDS_SCATTERED: usize = 4;
pub const CLOUDS_OVERCAST: usize = 8;

pub const NARROW_VIEWPORT_PX: f32 = 600.0;
pub const NARROW_DENSITY: f32 = 0.6;

#[must_use]
pub fn density_for_viewport(viewport_width: f32) -> f32 {
    if viewport_width < NARROW_VIEWPORT_PX {
        NARROW_DENSITY
    } else {
        1.0
    }
}

/// Everything a condition turns into, before any particle is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PopulationPlan {
    pub stars: usize,
    pub sunrays: usize,
    pub clouds: usize,
    pub overcast: bool,
    pub rain: usize,
    pub snow: usize,
    pub fog: usize,
    pub snow_depth_max: f32,
    pub fog_veil: FogVeil,
    pub lightning: bool,
}

impl PopulationPlan {
    #[must_use]
    pub fn for_condition(condition: Condition, density: f32) -> Self {
        let Condition { code, is_day } = condition;
        let mut plan = Self::default();

        if !is_day && matches!(code, 0..=2) {
            plan.stars = scaled(STAR_BASE, 1.0, density);
        }
        if is_day && matches!(code, 0 | 1) {
            plan.sunrays = SUNRAY_COUNT;
        }
        match code {
            2 => plan.clouds = CLOUDS_SCATTERED,
            3 => {
                plan.clouds = CLOUDS_OVERCAST;
                plan.overcast = true;
            }
            _ => {}
        }
        if let Some(intensity) = rain_intensity(code) {
            plan.rain = scaled(RAIN_BASE, intensity, density);
        }
        if let Some(profile) = snow_profile(code) {
            plan.snow = scaled(SNOW_BASE, profile.intensity, density);
            plan.snow_depth_max = profile.depth_max;
        }
        if is_fog(code) {
            plan.fog = FOG_WISPS;
            plan.fog_veil = FogVeil::FOG;
        }
        plan.lightning = is_storm(code);
        plan
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.stars + self.sunrays + self.clouds + self.rain + self.snow + self.fog
    }

    /// Spawns the planned particles, back layers first.
    pub fn spawn<R: Rng + ?Sized>(&self, size: CanvasSize, rng: &mut R) -> Vec<Particle> {
        let mut particles = Vec::with_capacity(self.total());
        particles.extend((0..self.stars).map(|_| Particle::Star(Star::spawn(rng, size))));
        particles.extend(
            (0..self.sunrays).map(|i| Particle::Sunray(Sunray::spawn(rng, i, self.sunrays))),
        );
        particles.extend(
            (0..self.clouds).map(|_| Particle::Cloud(Cloud::spawn(rng, size, self.overcast))),
        );
        particles.extend((0..self.fog).map(|_| Particle::Fog(Fog::spawn(rng, size))));
        particles.extend((0..self.rain).map(|_| Particle::Rain(Rain::spawn(rng, size))));
        particles.extend((0..self.snow).map(|_| Particle::Snow(Snow::spawn(rng, size))));
        particles
    }
}

fn scaled(base: f32, intensity: f32, density: f32) -> usize {
    (base * intensity * density).round() as usize
}

//! Weather particle engine.
//!
//! A [`WeatherEngine`] owns the particle population for one canvas. The host
//! picks a condition with [`WeatherEngine::set_condition`], arms the frame loop
//! with [`WeatherEngine::start`] and calls [`WeatherEngine::tick`] from its
//! frame callback with a millisecond timestamp and the surface to draw on.

pub mod accumulation;
pub mod lightning;
pub mod overlay;
pub mod particle;
pub mod population;
pub mod render;
pub mod surface;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::domain::weather::{Condition, is_storm};

use accumulation::SnowPiles;
use lightning::{Bolt, FlashFade, LightningTrigger};
use overlay::Overlay;
use particle::{Particle, ParticleKind, Rain, RainStep, Snow, SnowStep, pointer_wind};
use population::{PopulationPlan, density_for_viewport};
use surface::{CanvasSize, Point, Surface};

pub const MAX_FRAME_DT_MS: f32 = 50.0;
pub const SNOW_DEPTH_EASE: f32 = 0.00002;
pub const SPLASH_CHANCE: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Width of the whole viewport, used to thin particle counts on narrow screens.
    pub viewport_width: f32,
    pub seed: Option<u64>,
    pub pointer_wind: bool,
    /// Toggle the overlay thunder flash on strikes. Bolts are drawn either way.
    pub thunder_flash: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1024.0,
            seed: None,
            pointer_wind: true,
            thunder_flash: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub rendered: bool,
    pub dt_ms: f32,
    pub particles: usize,
    pub landed: usize,
    pub splashes: usize,
    pub lightning: bool,
    pub drew_piles: bool,
}

/// Particle counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    pub stars: usize,
    pub sunrays: usize,
    pub clouds: usize,
    pub rain: usize,
    pub snow: usize,
    pub fog: usize,
}

impl Census {
    #[must_use]
    pub fn total(&self) -> usize {
        self.stars + self.sunrays + self.clouds + self.rain + self.snow + self.fog
    }
}

#[derive(Debug)]
pub struct WeatherEngine {
    canvas: Option<CanvasSize>,
    config: EngineConfig,
    density: f32,
    condition: Option<Condition>,
    pub(crate) particles: Vec<Particle>,
    piles: SnowPiles,
    snow_depth: f32,
    snow_depth_max: f32,
    lightning: LightningTrigger,
    flash: FlashFade,
    overlay: Overlay,
    pointer: Option<Point>,
    frame_handle: Option<u64>,
    next_handle: u64,
    last_frame_ms: Option<f64>,
    rng: StdRng,
}

impl WeatherEngine {
    /// Engine bound to a canvas. Without one the engine stays inert: every call is a no-op.
    #[must_use]
    pub fn for_canvas(canvas: Option<CanvasSize>, config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            canvas,
            config,
            density: density_for_viewport(config.viewport_width),
            condition: None,
            particles: Vec::new(),
            piles: canvas.map(|size| SnowPiles::new(size, 0.0)).unwrap_or_default(),
            snow_depth: 0.0,
            snow_depth_max: 0.0,
            lightning: LightningTrigger::default(),
            flash: FlashFade::default(),
            overlay: Overlay::default(),
            pointer: None,
            frame_handle: None,
            next_handle: 0,
            last_frame_ms: None,
            rng,
        }
    }

    #[must_use]
    pub fn new(canvas: CanvasSize, config: EngineConfig) -> Self {
        Self::for_canvas(Some(canvas), config)
    }

    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.canvas.is_none()
    }

    /// Rebuilds the particle population when `(code, is_day)` differs from the current one.
    pub fn set_condition(&mut self, code: u8, is_day: bool) {
        let Some(size) = self.canvas else {
            return;
        };
        let condition = Condition::new(code, is_day);
        if self.condition == Some(condition) {
            return;
        }
        self.condition = Some(condition);

        let plan = PopulationPlan::for_condition(condition, self.density);
        self.snow_depth = 0.0;
        self.snow_depth_max = plan.snow_depth_max;
        self.piles.reset(size, plan.snow_depth_max);
        self.overlay.apply_condition(condition, plan.fog_veil);
        if plan.lightning {
            self.lightning.arm(&mut self.rng);
        } else {
            self.lightning.disarm();
        }
        self.particles = plan.spawn(size, &mut self.rng);

        info!(
            code,
            is_day,
            particles = self.particles.len(),
            classes = %self.overlay.class_name(),
            "weather condition changed"
        );
    }

    pub fn start(&mut self) {
        if self.canvas.is_none() || self.frame_handle.is_some() {
            return;
        }
        self.last_frame_ms = None;
        self.schedule_frame();
        debug!("particle loop started");
    }

    pub fn stop(&mut self) {
        if self.frame_handle.take().is_some() {
            debug!("particle loop stopped");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.frame_handle.is_some()
    }

    /// Canvas size changed. Piles restart; particles keep their positions and recycle naturally.
    pub fn resize(&mut self, canvas: CanvasSize, viewport_width: f32) {
        if self.canvas.is_none() {
            return;
        }
        self.canvas = Some(canvas);
        self.density = density_for_viewport(viewport_width);
        self.piles.reset(canvas, self.snow_depth_max);
    }

    pub fn pointer_moved(&mut self, at: Point) {
        self.pointer = Some(at);
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    #[must_use]
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// One host frame at `now_ms`.
    ///
    /// The flash fade and overlay timers advance on every call; the particle
    /// pass only runs while the loop is started.
    pub fn tick<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) -> FrameStats {
        self.flash.advance(now_ms);
        self.overlay.expire(now_ms);

        let mut stats = FrameStats::default();
        let Some(size) = self.canvas else {
            return stats;
        };
        if self.frame_handle.is_none() {
            return stats;
        }

        let dt = self.last_frame_ms.map_or(0.0, |last| {
            ((now_ms - last) as f32).clamp(0.0, MAX_FRAME_DT_MS)
        });
        self.last_frame_ms = Some(now_ms);
        stats.rendered = true;
        stats.dt_ms = dt;

        surface.clear();

        let condition = self.condition;
        if condition.is_some_and(|c| is_storm(c.code)) && self.lightning.advance(dt, &mut self.rng)
        {
            self.strike(now_ms, size, surface);
            stats.lightning = true;
        }
        if self.snow_depth_max > 0.0 {
            self.snow_depth += (self.snow_depth_max - self.snow_depth) * SNOW_DEPTH_EASE * dt;
        }

        let is_day = condition.is_none_or(|c| c.is_day);
        let pointer = self.pointer.filter(|_| self.config.pointer_wind);
        let rng = &mut self.rng;
        let piles = &mut self.piles;
        let overlay = &mut self.overlay;

        for particle in &mut self.particles {
            match particle {
                Particle::Star(star) => {
                    star.advance(dt);
                    render::draw_star(surface, star);
                }
                Particle::Sunray(ray) => {
                    ray.advance(dt);
                    render::draw_sunray(surface, ray, size);
                }
                Particle::Cloud(cloud) => {
                    cloud.advance(dt, size, rng);
                    render::draw_cloud(surface, cloud, is_day);
                }
                Particle::Rain(drop) => {
                    let wind = pointer_wind(pointer, drop.x, size.width);
                    if let RainStep::Exited { x } = drop.advance(dt, wind, size) {
                        if rng.random_bool(SPLASH_CHANCE) {
                            overlay.spawn_splash(Point::new(x, size.height), now_ms);
                            stats.splashes += 1;
                        }
                        *drop = Rain::recycled(rng, size);
                    }
                    render::draw_rain(surface, drop, wind);
                }
                Particle::Snow(flake) => match flake.advance(dt, size, piles) {
                    SnowStep::Settled => {}
                    SnowStep::Landed { column } => {
                        piles.deposit(column, flake.radius);
                        *flake = Snow::recycled(rng, size);
                        stats.landed += 1;
                        render::draw_snow(surface, flake);
                    }
                    SnowStep::Falling => render::draw_snow(surface, flake),
                },
                Particle::Fog(wisp) => {
                    wisp.advance(dt, size);
                    render::draw_fog(surface, wisp);
                }
            }
        }

        if self.piles.is_visible() {
            render::draw_snow_piles(surface, &self.piles, size);
            stats.drew_piles = true;
        }

        stats.particles = self.particles.len();
        self.schedule_frame();
        stats
    }

    fn schedule_frame(&mut self) {
        self.next_handle = self.next_handle.wrapping_add(1);
        self.frame_handle = Some(self.next_handle);
    }

    fn strike<S: Surface + ?Sized>(&mut self, now_ms: f64, size: CanvasSize, surface: &mut S) {
        self.flash.ignite(now_ms);
        if self.config.thunder_flash {
            self.overlay.flash_thunder(now_ms);
        }
        let bolt = Bolt::generate(&mut self.rng, size);
        render::draw_bolt(surface, &bolt);
        debug!(
            strikes = self.lightning.strikes(),
            segments = bolt.points.len().saturating_sub(1),
            next_in_ms = self.lightning.next_flash_ms(),
            "lightning strike"
        );
    }

    #[must_use]
    pub fn condition(&self) -> Option<Condition> {
        self.condition
    }

    #[must_use]
    pub fn canvas(&self) -> Option<CanvasSize> {
        self.canvas
    }

    #[must_use]
    pub fn density(&self) -> f32 {
        self.density
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for particle in &self.particles {
            match particle.kind() {
                ParticleKind::Star => census.stars += 1,
                ParticleKind::Sunray => census.sunrays += 1,
                ParticleKind::Cloud => census.clouds += 1,
                ParticleKind::Rain => census.rain += 1,
                ParticleKind::Snow => census.snow += 1,
                ParticleKind::Fog => census.fog += 1,
            }
        }
        census
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[must_use]
    pub fn snow_piles(&self) -> &SnowPiles {
        &self.piles
    }

    /// Eased overall snow depth in `0..=snow_depth_max`. Informational; the
    /// ground silhouette is drawn from the per-column piles.
    #[must_use]
    pub fn snow_depth(&self) -> f32 {
        self.snow_depth
    }

    #[must_use]
    pub fn snow_depth_max(&self) -> f32 {
        self.snow_depth_max
    }

    /// Brightness left from the latest strike, for hosts that tint the scene.
    #[must_use]
    pub fn flash_opacity(&self) -> f32 {
        self.flash.opacity()
    }

    #[must_use]
    pub fn lightning(&self) -> &LightningTrigger {
        &self.lightning
    }
}

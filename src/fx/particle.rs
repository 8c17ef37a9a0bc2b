use std::{
    f32::consts::{FRAC_PI_2, TAU},
    ops::Range,
};

use rand::Rng;

use super::{
    accumulation::SnowPiles,
    surface::{CanvasSize, Point},
};

/// Vertical band above/below the canvas a drop travels through before it is recycled.
pub const RAIN_MARGIN: f32 = 20.0;
pub const RAIN_LENGTH: Range<f32> = 12.0..28.0;
pub const RAIN_SPEED: Range<f32> = 0.55..0.95;
pub const RAIN_DRIFT: Range<f32> = -0.04..0.06;
pub const RAIN_ALPHA: Range<f32> = 0.25..0.6;
pub const RAIN_WIDTH: Range<f32> = 1.0..1.8;
/// Horizontal px/ms a drop receives at a full canvas width from the pointer.
pub const POINTER_WIND: f32 = 0.35;

pub const STAR_BAND: f32 = 0.7;
pub const STAR_RADIUS: Range<f32> = 0.5..2.2;

pub const CLOUD_WRAP_MARGIN: f32 = 300.0;
pub const CLOUD_BAND: f32 = 0.45;

pub const SNOW_RADIUS: Range<f32> = 1.0..3.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Star,
    Sunray,
    Cloud,
    Rain,
    Snow,
    Fog,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Particle {
    Star(Star),
    Sunray(Sunray),
    Cloud(Cloud),
    Rain(Rain),
    Snow(Snow),
    Fog(Fog),
}

impl Particle {
    #[must_use]
    pub fn kind(&self) -> ParticleKind {
        match self {
            Self::Star(_) => ParticleKind::Star,
            Self::Sunray(_) => ParticleKind::Sunray,
            Self::Cloud(_) => ParticleKind::Cloud,
            Self::Rain(_) => ParticleKind::Rain,
            Self::Snow(_) => ParticleKind::Snow,
            Self::Fog(_) => ParticleKind::Fog,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub phase: f32,
    pub speed: f32,
    pub max_alpha: f32,
}

impl Star {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, size: CanvasSize) -> Self {
        Self {
            x: rng.random_range(0.0..size.width),
            y: rng.random_range(0.0..size.height * STAR_BAND),
            radius: rng.random_range(STAR_RADIUS),
            phase: rng.random_range(0.0..TAU),
            speed: rng.random_range(0.0008..0.003),
            max_alpha: rng.random_range(0.5..1.0),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.phase = (self.phase + self.speed * dt) % TAU;
    }

    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.max_alpha * (0.5 + 0.5 * self.phase.sin())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sunray {
    pub angle: f32,
    pub length: f32,
    pub speed: f32,
    pub width: f32,
    pub alpha: f32,
}

impl Sunray {
    /// Ray `index` of `count`, fanned between straight down and straight left.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, index: usize, count: usize) -> Self {
        let spread = (index as f32 + 0.5) / count.max(1) as f32;
        Self {
            angle: FRAC_PI_2 + spread * FRAC_PI_2 + rng.random_range(-0.05..0.05),
            length: rng.random_range(260.0..480.0),
            speed: rng.random_range(0.00003..0.00008),
            width: rng.random_range(20.0..44.0),
            alpha: rng.random_range(0.035..0.07),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.angle = (self.angle + self.speed * dt) % TAU;
    }

    #[must_use]
    pub fn tip(&self, origin: Point) -> Point {
        Point::new(
            origin.x + self.angle.cos() * self.length,
            origin.y + self.angle.sin() * self.length,
        )
    }
}

/// Fixed point the sun rays fan out from.
#[must_use]
pub fn sun_origin(size: CanvasSize) -> Point {
    Point::new(size.width * 0.85, size.height * 0.08)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub rx: f32,
    pub ry: f32,
    pub vx: f32,
    pub alpha: f32,
}

impl Cloud {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, size: CanvasSize, overcast: bool) -> Self {
        let rx = rng.random_range(120.0..260.0);
        let alpha = if overcast {
            rng.random_range(0.35..0.6)
        } else {
            rng.random_range(0.25..0.45)
        };
        Self {
            x: rng.random_range(-200.0..size.width),
            y: rng.random_range(0.0..size.height * CLOUD_BAND),
            rx,
            ry: rx * rng.random_range(0.35..0.55),
            vx: rng.random_range(0.008..0.025),
            alpha,
        }
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f32, size: CanvasSize, rng: &mut R) {
        self.x += self.vx * dt;
        if self.x > size.width + CLOUD_WRAP_MARGIN {
            self.x = -CLOUD_WRAP_MARGIN - rng.random_range(0.0..200.0);
            self.y = rng.random_range(0.0..size.height * CLOUD_BAND);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rain {
    pub x: f32,
    pub y: f32,
    pub length: f32,
    pub speed: f32,
    pub drift: f32,
    pub alpha: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RainStep {
    Falling,
    /// Crossed the bottom margin at horizontal position `x`.
    Exited { x: f32 },
}

impl Rain {
    /// A drop anywhere in the sky, for the initial population.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, size: CanvasSize) -> Self {
        let y = rng.random_range(0.0..size.height);
        Self::spawn_at(rng, size, y)
    }

    /// A fresh drop just above the top edge.
    pub fn recycled<R: Rng + ?Sized>(rng: &mut R, size: CanvasSize) -> Self {
        Self::spawn_at(rng, size, -RAIN_MARGIN)
    }

    fn spawn_at<R: Rng + ?Sized>(rng: &mut R, size: CanvasSize, y: f32) -> Self {
        Self {
            x: rng.random_range(0.0..size.width),
            y,
            length: rng.random_range(RAIN_LENGTH),
            speed: rng.random_range(RAIN_SPEED),
            drift: rng.random_range(RAIN_DRIFT),
            alpha: rng.random_range(RAIN_ALPHA),
            width: rng.random_range(RAIN_WIDTH),
        }
    }

    pub fn advance(&mut self, dt: f32, wind: f32, size: CanvasSize) -> RainStep {
        self.y += self.speed * dt;
        self.x += (self.drift + wind) * dt;
        if self.y > size.height + RAIN_MARGIN {
            RainStep::Exited { x: self.x }
        } else {
            RainStep::Falling
        }
    }
}

/// Sideways pull on a drop at `x` towards the pointer, zero when no pointer is over the canvas.
#[must_use]
pub fn pointer_wind(pointer: Option<Point>, x: f32, width: f32) -> f32 {
    pointer.map_or(0.0, |p| {
        ((p.x - x) / width.max(1.0)).clamp(-1.0, 1.0) * POINTER_WIND
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snow {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed: f32,
    pub drift: f32,
    pub swing: f32,
    pub swing_speed: f32,
    pub swing_phase: f32,
    pub alpha: f32,
    pub settled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnowStep {
    Falling,
    Landed { column: usize },
    Settled,
}

impl Snow {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, size: CanvasSize) -> Self {
        let y = rng.random_range(0.0..size.height);
        Self::spawn_at(rng, size, y)
    }

    pub fn recycled<R: Rng + ?Sized>(rng: &mut R, size: CanvasSize) -> Self {
        let y: f32 = -rng.random_range(4.0..24.0);
        Self::spawn_at(rng, size, y)
    }

    fn spawn_at<R: Rng + ?Sized>(rng: &mut R, size: CanvasSize, y: f32) -> Self {
        Self {
            x: rng.random_range(0.0..size.width),
            y,
            radius: rng.random_range(SNOW_RADIUS),
            speed: rng.random_range(0.03..0.08),
            drift: rng.random_range(-0.015..0.015),
            swing: rng.random_range(0.01..0.04),
            swing_speed: rng.random_range(0.001..0.003),
            swing_phase: rng.random_range(0.0..TAU),
            alpha: rng.random_range(0.55..0.95),
            settled: false,
        }
    }

    pub fn advance(&mut self, dt: f32, size: CanvasSize, piles: &SnowPiles) -> SnowStep {
        if self.settled {
            return SnowStep::Settled;
        }
        self.swing_phase = (self.swing_phase + self.swing_speed * dt) % TAU;
        self.y += self.speed * dt;
        self.x = (self.x + (self.drift + self.swing_phase.sin() * self.swing) * dt)
            .rem_euclid(size.width);

        let column = piles.column_for(self.x);
        let ground = size.height - piles.height(column);
        if self.y + self.radius >= ground {
            SnowStep::Landed { column }
        } else {
            SnowStep::Falling
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fog {
    pub x: f32,
    pub y: f32,
    pub rx: f32,
    pub ry: f32,
    pub vx: f32,
    pub vy: f32,
    pub alpha: f32,
    pub phase: f32,
    pub phase_speed: f32,
}

impl Fog {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, size: CanvasSize) -> Self {
        let direction: f32 = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        Self {
            x: rng.random_range(0.0..size.width),
            y: rng.random_range(size.height * 0.15..size.height),
            rx: rng.random_range(180.0..380.0),
            ry: rng.random_range(40.0..90.0),
            vx: direction * rng.random_range(0.006..0.02),
            vy: rng.random_range(-0.004..0.004),
            alpha: rng.random_range(0.06..0.14),
            phase: rng.random_range(0.0..TAU),
            phase_speed: rng.random_range(0.0004..0.0012),
        }
    }

    pub fn advance(&mut self, dt: f32, size: CanvasSize) {
        self.phase = (self.phase + self.phase_speed * dt) % TAU;
        self.x += self.vx * dt;
        self.y += self.vy * dt;

        if self.x > size.width + self.rx {
            self.x = -self.rx;
        } else if self.x < -self.rx {
            self.x = size.width + self.rx;
        }
        if self.y > size.height + self.ry {
            self.y = -self.ry;
        } else if self.y < -self.ry {
            self.y = size.height + self.ry;
        }
    }

    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha * (0.6 + 0.4 * self.phase.sin())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn size() -> CanvasSize {
        CanvasSize::new(1024.0, 768.0)
    }

    #[test]
    fn star_twinkle_stays_within_max_alpha() {
        let mut star = Star::spawn(&mut rng(), size());
        for _ in 0..500 {
            star.advance(16.0);
            let alpha = star.alpha();
            assert!((0.0..=star.max_alpha).contains(&alpha));
        }
    }

    #[test]
    fn stars_spawn_in_upper_band() {
        let mut rng = rng();
        for _ in 0..200 {
            let star = Star::spawn(&mut rng, size());
            assert!(star.y < 768.0 * STAR_BAND);
            assert!(STAR_RADIUS.contains(&star.radius));
        }
    }

    #[test]
    fn sunray_tip_follows_angle() {
        let ray = Sunray {
            angle: FRAC_PI_2,
            length: 100.0,
            speed: 0.0,
            width: 20.0,
            alpha: 0.05,
        };
        let tip = ray.tip(Point::new(10.0, 10.0));
        assert!((tip.x - 10.0).abs() < 1e-3);
        assert!((tip.y - 110.0).abs() < 1e-3);
    }

    #[test]
    fn cloud_wraps_to_left_of_frame() {
        let mut rng = rng();
        let mut cloud = Cloud::spawn(&mut rng, size(), false);
        cloud.x = 1024.0 + CLOUD_WRAP_MARGIN - 0.1;
        cloud.vx = 0.02;
        cloud.advance(50.0, size(), &mut rng);
        assert!(cloud.x <= -CLOUD_WRAP_MARGIN);
        assert!(cloud.y < 768.0 * CLOUD_BAND);
    }

    #[test]
    fn rain_exits_past_bottom_margin() {
        let mut drop = Rain::spawn(&mut rng(), size());
        drop.y = 768.0 + RAIN_MARGIN - 1.0;
        drop.speed = 0.5;
        assert!(matches!(
            drop.advance(10.0, 0.0, size()),
            RainStep::Exited { .. }
        ));
    }

    #[test]
    fn recycled_rain_starts_above_top_edge() {
        let drop = Rain::recycled(&mut rng(), size());
        assert_eq!(drop.y, -RAIN_MARGIN);
    }

    #[test]
    fn pointer_wind_pulls_towards_pointer() {
        assert_eq!(pointer_wind(None, 100.0, 1000.0), 0.0);
        let right = pointer_wind(Some(Point::new(600.0, 0.0)), 100.0, 1000.0);
        let left = pointer_wind(Some(Point::new(0.0, 0.0)), 100.0, 1000.0);
        assert!(right > 0.0);
        assert!(left < 0.0);
        assert!((right - 0.5 * POINTER_WIND).abs() < 1e-6);
    }

    #[test]
    fn settled_snow_is_left_alone() {
        let piles = SnowPiles::new(size(), 0.1);
        let mut flake = Snow::spawn(&mut rng(), size());
        flake.settled = true;
        let before = flake.clone();
        assert_eq!(flake.advance(16.0, size(), &piles), SnowStep::Settled);
        assert_eq!(flake, before);
    }

    #[test]
    fn snow_lands_on_top_of_pile() {
        let mut piles = SnowPiles::new(size(), 0.18);
        let mut flake = Snow::spawn(&mut rng(), size());
        flake.x = 30.0;
        flake.drift = 0.0;
        flake.swing = 0.0;
        let column = piles.column_for(30.0);
        for _ in 0..20 {
            piles.deposit(column, 3.0);
        }
        flake.y = 768.0 - piles.height(column) - flake.radius - 0.5;
        flake.speed = 0.05;
        assert_eq!(
            flake.advance(16.0, size(), &piles),
            SnowStep::Landed { column }
        );
    }

    #[test]
    fn snow_wraps_horizontally() {
        let piles = SnowPiles::new(size(), 0.1);
        let mut flake = Snow::spawn(&mut rng(), size());
        flake.y = 0.0;
        flake.x = 1023.9;
        flake.drift = 0.015;
        flake.swing = 0.0;
        flake.advance(50.0, size(), &piles);
        assert!(flake.x >= 0.0 && flake.x < 1024.0);
    }

    #[test]
    fn fog_wraps_on_every_edge() {
        let mut wisp = Fog::spawn(&mut rng(), size());
        wisp.vy = 0.0;
        wisp.vx = 0.02;
        wisp.x = 1024.0 + wisp.rx;
        wisp.advance(10.0, size());
        assert_eq!(wisp.x, -wisp.rx);

        wisp.vx = 0.0;
        wisp.vy = -0.004;
        wisp.y = -wisp.ry;
        wisp.advance(10.0, size());
        assert_eq!(wisp.y, 768.0 + wisp.ry);
    }
}

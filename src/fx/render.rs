use super::{
    accumulation::SnowPiles,
    lightning::{BOLT_CORE, BOLT_GLOW, Bolt},
    particle::{Cloud, Fog, Rain, Snow, Star, Sunray, sun_origin},
    surface::{CanvasSize, Point, Rgba, Stroke, Surface},
};

const STAR_COLOR: Rgba = Rgba::rgb(255, 250, 235);
const SUN_COLOR: Rgba = Rgba::rgb(255, 236, 170);
const CLOUD_DAY: Rgba = Rgba::rgb(250, 252, 255);
const CLOUD_NIGHT: Rgba = Rgba::rgb(150, 160, 185);
const RAIN_COLOR: Rgba = Rgba::rgb(170, 200, 235);
const SNOW_COLOR: Rgba = Rgba::rgb(255, 255, 255);
const FOG_COLOR: Rgba = Rgba::rgb(215, 220, 228);
const PILE_FILL: Rgba = Rgba::new(240, 245, 252, 0.92);
const PILE_HIGHLIGHT: Stroke = Stroke {
    color: Rgba::new(255, 255, 255, 0.6),
    width: 1.5,
    blur: 0.0,
};

pub fn draw_star<S: Surface + ?Sized>(surface: &mut S, star: &Star) {
    surface.fill_circle(
        Point::new(star.x, star.y),
        star.radius,
        STAR_COLOR.with_alpha(star.alpha()),
        0.0,
    );
}

pub fn draw_sunray<S: Surface + ?Sized>(surface: &mut S, ray: &Sunray, size: CanvasSize) {
    let origin = sun_origin(size);
    surface.stroke_line(
        origin,
        ray.tip(origin),
        Stroke {
            color: SUN_COLOR.with_alpha(ray.alpha),
            width: ray.width,
            blur: 0.0,
        },
    );
}

pub fn draw_cloud<S: Surface + ?Sized>(surface: &mut S, cloud: &Cloud, is_day: bool) {
    let base = if is_day { CLOUD_DAY } else { CLOUD_NIGHT };
    surface.fill_radial_ellipse(
        Point::new(cloud.x, cloud.y),
        cloud.rx,
        cloud.ry,
        base.with_alpha(cloud.alpha),
    );
}

/// Streak pointing back along the drop's direction of travel.
pub fn draw_rain<S: Surface + ?Sized>(surface: &mut S, drop: &Rain, wind: f32) {
    let vx = drop.drift + wind;
    let vy = drop.speed;
    let norm = vx.hypot(vy).max(f32::EPSILON);
    let head = Point::new(drop.x, drop.y);
    let tail = Point::new(
        drop.x - vx / norm * drop.length,
        drop.y - vy / norm * drop.length,
    );
    surface.stroke_line(
        tail,
        head,
        Stroke {
            color: RAIN_COLOR.with_alpha(drop.alpha),
            width: drop.width,
            blur: 0.0,
        },
    );
}

pub fn draw_snow<S: Surface + ?Sized>(surface: &mut S, flake: &Snow) {
    surface.fill_circle(
        Point::new(flake.x, flake.y),
        flake.radius,
        SNOW_COLOR.with_alpha(flake.alpha),
        flake.radius * 2.0,
    );
}

pub fn draw_fog<S: Surface + ?Sized>(surface: &mut S, wisp: &Fog) {
    surface.fill_radial_ellipse(
        Point::new(wisp.x, wisp.y),
        wisp.rx,
        wisp.ry,
        FOG_COLOR.with_alpha(wisp.alpha()),
    );
}

pub fn draw_snow_piles<S: Surface + ?Sized>(surface: &mut S, piles: &SnowPiles, size: CanvasSize) {
    surface.fill_polygon(&piles.outline(size), PILE_FILL);
    surface.stroke_polyline(&piles.surface(size), PILE_HIGHLIGHT);
}

/// Glow pass first, bright core on top.
pub fn draw_bolt<S: Surface + ?Sized>(surface: &mut S, bolt: &Bolt) {
    surface.stroke_polyline(&bolt.points, BOLT_GLOW);
    surface.stroke_polyline(&bolt.points, BOLT_CORE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::surface::{DrawOp, RecordingSurface};

    #[test]
    fn rain_streak_trails_behind_head() {
        let drop = Rain {
            x: 100.0,
            y: 50.0,
            length: 20.0,
            speed: 0.8,
            drift: 0.0,
            alpha: 0.5,
            width: 1.0,
        };
        let mut surface = RecordingSurface::new();
        draw_rain(&mut surface, &drop, 0.0);
        let DrawOp::Line { from, to, .. } = &surface.ops[0] else {
            panic!("expected a line");
        };
        assert_eq!(*to, Point::new(100.0, 50.0));
        assert!((from.x - 100.0).abs() < 1e-4);
        assert!((from.y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn wind_tilts_streak() {
        let drop = Rain {
            x: 100.0,
            y: 50.0,
            length: 20.0,
            speed: 0.5,
            drift: 0.0,
            alpha: 0.5,
            width: 1.0,
        };
        let mut surface = RecordingSurface::new();
        draw_rain(&mut surface, &drop, 0.5);
        let DrawOp::Line { from, .. } = &surface.ops[0] else {
            panic!("expected a line");
        };
        assert!(from.x < 100.0);
    }

    #[test]
    fn bolt_draws_glow_then_core() {
        let bolt = Bolt {
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 50.0)],
        };
        let mut surface = RecordingSurface::new();
        draw_bolt(&mut surface, &bolt);
        let widths: Vec<f32> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Polyline { stroke, .. } => Some(stroke.width),
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![BOLT_GLOW.width, BOLT_CORE.width]);
    }

    #[test]
    fn snow_piles_fill_then_highlight() {
        let size = CanvasSize::new(30.0, 100.0);
        let mut piles = SnowPiles::new(size, 0.18);
        piles.deposit(2, 3.0);
        let mut surface = RecordingSurface::new();
        draw_snow_piles(&mut surface, &piles, size);
        assert!(matches!(surface.ops[0], DrawOp::Polygon { .. }));
        assert!(matches!(surface.ops[1], DrawOp::Polyline { .. }));
    }
}

use std::ops::Range;

use rand::Rng;

use super::surface::{CanvasSize, Point, Rgba, Stroke};

/// Delay before the first strike after switching into a storm.
pub const FIRST_DELAY_MS: Range<f32> = 1500.0..5000.0;
/// Delay between consecutive strikes.
pub const NEXT_DELAY_MS: Range<f32> = 2000.0..8000.0;

pub const FLASH_PEAK: f32 = 0.85;
pub const FADE_DELAY_MS: f64 = 80.0;
pub const FADE_STEP: f32 = 0.06;

pub const BOLT_GLOW: Stroke = Stroke {
    color: Rgba::new(200, 210, 255, 0.35),
    width: 6.0,
    blur: 25.0,
};
pub const BOLT_CORE: Stroke = Stroke {
    color: Rgba::new(255, 255, 255, 0.95),
    width: 2.0,
    blur: 8.0,
};

/// Decides when the next strike happens.
#[derive(Debug, Clone, Default)]
pub struct LightningTrigger {
    armed: bool,
    flash_timer: f32,
    next_flash: f32,
    strikes: u64,
}

impl LightningTrigger {
    pub fn arm<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.armed = true;
        self.flash_timer = 0.0;
        self.next_flash = rng.random_range(FIRST_DELAY_MS);
    }

    pub fn disarm(&mut self) {
        self.armed = false;
        self.flash_timer = 0.0;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    #[must_use]
    pub fn next_flash_ms(&self) -> f32 {
        self.next_flash
    }

    #[must_use]
    pub fn strikes(&self) -> u64 {
        self.strikes
    }

    /// Adds `dt` to the timer; returns true when a strike is due.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> bool {
        if !self.armed {
            return false;
        }
        self.flash_timer += dt;
        if self.flash_timer < self.next_flash {
            return false;
        }
        self.flash_timer = 0.0;
        self.next_flash = rng.random_range(NEXT_DELAY_MS);
        self.strikes += 1;
        true
    }
}

/// Flash brightness left over from the latest strike.
///
/// Advanced on every host tick whether or not the frame loop is running, so a
/// fade always runs to zero once it has begun.
#[derive(Debug, Clone, Default)]
pub struct FlashFade {
    opacity: f32,
    fade_from_ms: f64,
}

impl FlashFade {
    pub fn ignite(&mut self, now_ms: f64) {
        self.opacity = FLASH_PEAK;
        self.fade_from_ms = now_ms + FADE_DELAY_MS;
    }

    pub fn advance(&mut self, now_ms: f64) {
        if self.opacity > 0.0 && now_ms >= self.fade_from_ms {
            self.opacity = (self.opacity - FADE_STEP).max(0.0);
        }
    }

    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.opacity > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bolt {
    pub points: Vec<Point>,
}

impl Bolt {
    /// Jagged path from the top edge down to 80% of the canvas height.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, size: CanvasSize) -> Self {
        let floor = size.height * 0.8;
        let mut x = size.width * rng.random_range(0.2..0.8);
        let mut y = 0.0;
        let mut points = vec![Point::new(x, y)];
        while y < floor {
            y += rng.random_range(40.0..100.0);
            x += rng.random_range(-60.0..60.0);
            points.push(Point::new(x, y));
        }
        Self { points }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn disarmed_trigger_never_fires() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut trigger = LightningTrigger::default();
        for _ in 0..10_000 {
            assert!(!trigger.advance(50.0, &mut rng));
        }
    }

    #[test]
    fn first_strike_lands_inside_storm_window() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut trigger = LightningTrigger::default();
        trigger.arm(&mut rng);
        assert!(FIRST_DELAY_MS.contains(&trigger.next_flash_ms()));

        let mut elapsed = 0.0;
        while !trigger.advance(10.0, &mut rng) {
            elapsed += 10.0;
        }
        elapsed += 10.0;
        assert!(elapsed >= FIRST_DELAY_MS.start);
        assert!(elapsed <= FIRST_DELAY_MS.end + 10.0);
        assert!(NEXT_DELAY_MS.contains(&trigger.next_flash_ms()));
        assert_eq!(trigger.strikes(), 1);
    }

    #[test]
    fn fade_waits_then_steps_down_to_zero() {
        let mut fade = FlashFade::default();
        fade.ignite(1_000.0);
        fade.advance(1_050.0);
        assert_eq!(fade.opacity(), FLASH_PEAK);

        let mut ticks = 0;
        let mut now = 1_080.0;
        while fade.is_fading() {
            fade.advance(now);
            now += 16.0;
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(fade.opacity(), 0.0);
        assert_eq!(ticks, 15);
    }

    #[test]
    fn bolt_descends_to_eighty_percent() {
        let size = CanvasSize::new(1000.0, 500.0);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let bolt = Bolt::generate(&mut rng, size);
            let first = bolt.points[0];
            assert_eq!(first.y, 0.0);
            assert!((200.0..=800.0).contains(&first.x));
            let last = bolt.points.last().expect("bolt has a tip");
            assert!(last.y >= 400.0);
            assert!(last.y < 500.0);
            for pair in bolt.points.windows(2) {
                let dy = pair[1].y - pair[0].y;
                assert!((39.99..=100.01).contains(&dy));
                assert!((pair[1].x - pair[0].x).abs() <= 60.01);
            }
        }
    }
}
